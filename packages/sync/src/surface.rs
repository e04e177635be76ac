//! Presentation surface adapters.
//!
//! Surfaces only draw. Each one is bound to its own container when it is
//! constructed and receives fully derived data from the view controller.
//! The map and table also receive a [`SiteToggleSink`] with every draw and
//! report clicks on a drawn site through it; surfaces never decide
//! selection semantics themselves.

use std::sync::{Arc, Mutex, PoisonError};

use parking_map_dataset_models::Dataset;
use parking_map_site_models::{MunicipalitySelection, SiteId, SiteRecord};

use crate::slider::{BrushExtent, SliderChart, SliderScaffold};
use crate::table::{TableColumn, TableRow};
use crate::view::{Overlay, PhaseButton, ViewKind};

/// Opaque handle of one drawn element (a map marker or a table row).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementHandle(pub String);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the element that represents a site in a given view.
///
/// Injected into every controller so surfaces and the selection side
/// channel agree on element identity without string-prefix conventions.
pub trait ElementLookup {
    /// Handle of the map marker for `site_id` in `view`.
    fn site_marker(&self, view: ViewKind, site_id: &SiteId) -> ElementHandle;

    /// Handle of the table row for `site_id` in `view`.
    fn table_row(&self, view: ViewKind, site_id: &SiteId) -> ElementHandle;
}

/// Default lookup producing `"<view>/<element>/<site id>"` handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedElementLookup;

impl ElementLookup for KeyedElementLookup {
    fn site_marker(&self, view: ViewKind, site_id: &SiteId) -> ElementHandle {
        ElementHandle(format!("{view}/marker/{site_id}"))
    }

    fn table_row(&self, view: ViewKind, site_id: &SiteId) -> ElementHandle {
        ElementHandle(format!("{view}/row/{site_id}"))
    }
}

/// Clicks queued by surfaces, tagged with the generation they were drawn in.
pub(crate) type ToggleQueue = Arc<Mutex<Vec<(u64, SiteId)>>>;

/// Click channel handed to the map and table on every draw.
///
/// Surfaces keep a clone for as long as their elements are on screen and
/// call [`SiteToggleSink::toggle`] when a site is clicked. The controller
/// applies queued clicks in
/// [`crate::FilterViewController::apply_site_toggles`] and drops those made
/// on an earlier generation.
#[derive(Debug, Clone)]
pub struct SiteToggleSink {
    generation: u64,
    queue: ToggleQueue,
}

impl SiteToggleSink {
    pub(crate) const fn new(generation: u64, queue: ToggleQueue) -> Self {
        Self { generation, queue }
    }

    /// Generation of the elements this sink was handed out with.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Reports a click on `site_id`.
    pub fn toggle(&self, site_id: &SiteId) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((self.generation, site_id.clone()));
    }
}

/// A site to draw on the map together with its element handle.
#[derive(Debug, Clone, Copy)]
pub struct SiteMarker<'a> {
    /// Element handle the marker must be drawn with.
    pub handle: &'a ElementHandle,
    /// The site.
    pub site: &'a SiteRecord,
}

/// Draws the base map and the site markers.
pub trait MapSurface {
    /// Draws boundaries, transit lines, and job regions. Called once per
    /// view initialisation; overlays start hidden.
    fn draw_base_layers(&mut self, dataset: &Dataset);

    /// Removes every site marker.
    fn clear_sites(&mut self);

    /// Draws one marker per site. Marker clicks go to `on_toggle`.
    fn draw_sites(&mut self, markers: &[SiteMarker<'_>], on_toggle: &SiteToggleSink);

    /// Highlights the selected municipality's boundary, or clears the
    /// highlight for "all".
    fn highlight_municipality(&mut self, selection: &MunicipalitySelection);

    /// Shows or hides an overlay layer.
    fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool);

    /// Applies or removes the selected styling of a marker.
    fn set_site_selected(&mut self, marker: &ElementHandle, selected: bool);

    /// Removes everything, base layers included.
    fn clear_all(&mut self);
}

/// Draws the site table.
pub trait TableSurface {
    /// Removes the header and every row.
    fn clear(&mut self);

    /// Draws the header and rows in the given order. Row clicks go to
    /// `on_toggle`.
    fn render(&mut self, columns: &[TableColumn], rows: &[TableRow], on_toggle: &SiteToggleSink);

    /// Applies or removes the selected styling of a row.
    fn set_row_selected(&mut self, row: &ElementHandle, selected: bool);
}

/// Draws the demand/utilization scatterplot and its brush.
pub trait SliderSurface {
    /// Removes the chart group.
    fn clear(&mut self);

    /// Draws axes, points, and the brush.
    fn render_chart(&mut self, chart: &SliderChart);

    /// Draws axes only, with no points and no brush handles.
    fn render_scaffold(&mut self, scaffold: &SliderScaffold);

    /// Moves the brush and restyles points without rebuilding axes or
    /// scales. `None` means the brush is inactive: every point drops its
    /// out-of-range styling.
    fn update_brush(&mut self, brush: Option<&BrushExtent>);
}

/// Filter controls of a view: phase buttons, municipality dropdown, and
/// overlay toggles.
pub trait ControlPanel {
    /// Replaces the municipality dropdown options (the "all" entry is
    /// implicit) and sets the shown value.
    fn set_municipality_options(&mut self, options: &[String], selected: &MunicipalitySelection);

    /// Sets the toggled styling of a phase button.
    fn set_phase_button(&mut self, button: PhaseButton, toggled: bool);

    /// Sets an overlay toggle's label.
    fn set_overlay_toggle(&mut self, overlay: Overlay, label: &str);
}

/// The four surfaces of one view.
pub struct ViewSurfaces {
    /// Map renderer.
    pub map: Box<dyn MapSurface>,
    /// Table renderer.
    pub table: Box<dyn TableSurface>,
    /// Slider renderer.
    pub slider: Box<dyn SliderSurface>,
    /// Filter controls.
    pub controls: Box<dyn ControlPanel>,
}

impl std::fmt::Debug for ViewSurfaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSurfaces").finish_non_exhaustive()
    }
}
