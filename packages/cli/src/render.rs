//! Text presentation surfaces that print to stdout.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use parking_map_dataset_models::Dataset;
use parking_map_site_models::{MunicipalitySelection, SiteId};
use parking_map_sync::slider::{
    BrushExtent, SliderChart, SliderScaffold, X_AXIS_LABEL, Y_AXIS_LABEL,
};
use parking_map_sync::{
    ControlPanel, ElementHandle, MapSurface, Overlay, PhaseButton, SiteMarker, SiteToggleSink,
    SliderSurface, TableColumn, TableRow, TableSurface, ViewKind, ViewSurfaces,
};

/// Rows printed before the table is truncated.
const TABLE_PREVIEW_ROWS: usize = 15;

/// Widest a table cell is printed.
const MAX_CELL_WIDTH: usize = 24;

/// Stands in for a pointer on the text map and table: holds the click
/// channel they were last drawn with.
#[derive(Debug, Clone, Default)]
pub struct SiteClicks(Rc<RefCell<Option<SiteToggleSink>>>);

impl SiteClicks {
    fn keep(&self, sink: &SiteToggleSink) {
        *self.0.borrow_mut() = Some(sink.clone());
    }

    /// Clicks `site_id`. Returns `false` if nothing has been drawn yet.
    pub fn click(&self, site_id: &SiteId) -> bool {
        self.0.borrow().as_ref().is_some_and(|sink| {
            sink.toggle(site_id);
            true
        })
    }
}

/// Builds the four text surfaces for `view`, plus the handle used to click
/// on the sites they draw.
pub fn text_surfaces(view: ViewKind, dataset: Arc<Dataset>) -> (ViewSurfaces, SiteClicks) {
    let clicks = SiteClicks::default();
    let surfaces = ViewSurfaces {
        map: Box::new(TextMap {
            view,
            dataset,
            clicks: clicks.clone(),
        }),
        table: Box::new(TextTable {
            view,
            clicks: clicks.clone(),
        }),
        slider: Box::new(TextSlider { view }),
        controls: Box::new(TextControls { view }),
    };
    (surfaces, clicks)
}

struct TextMap {
    view: ViewKind,
    dataset: Arc<Dataset>,
    clicks: SiteClicks,
}

impl MapSurface for TextMap {
    fn draw_base_layers(&mut self, dataset: &Dataset) {
        println!(
            "[{}] base map: {} municipalities, {} commuter rail lines, {} rapid transit lines, {} job regions",
            self.view,
            dataset.municipalities.len(),
            dataset.commuter_rail.len(),
            dataset.rapid_transit.len(),
            dataset.job_regions.len(),
        );
        for line in &dataset.rapid_transit {
            log::debug!(
                "[{}] rapid transit {} drawn in {}",
                self.view,
                line.name.as_deref().unwrap_or("(unnamed)"),
                line.stroke(),
            );
        }
        if let Some(extent) = dataset.extent() {
            println!(
                "[{}] extent: ({:.4}, {:.4}) to ({:.4}, {:.4})",
                self.view,
                extent.min().x,
                extent.min().y,
                extent.max().x,
                extent.max().y,
            );
        }
    }

    fn clear_sites(&mut self) {}

    fn draw_sites(&mut self, markers: &[SiteMarker<'_>], on_toggle: &SiteToggleSink) {
        self.clicks.keep(on_toggle);
        let located = markers
            .iter()
            .filter(|marker| marker.site.coordinates.is_some())
            .count();
        println!(
            "[{}] map: {} site markers ({} without coordinates)",
            self.view,
            markers.len(),
            markers.len() - located,
        );
    }

    fn highlight_municipality(&mut self, selection: &MunicipalitySelection) {
        match selection {
            MunicipalitySelection::All => {}
            MunicipalitySelection::Named(name) => match self.dataset.boundary(name) {
                Some(boundary) => println!(
                    "[{}] map: highlighting {name} ({} polygon(s))",
                    self.view,
                    boundary.polygon.0.len(),
                ),
                None => println!("[{}] map: {name} has no boundary to highlight", self.view),
            },
        }
    }

    fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool) {
        log::debug!("[{}] overlay {overlay} visible={visible}", self.view);
    }

    fn set_site_selected(&mut self, marker: &ElementHandle, selected: bool) {
        let state = if selected { "selected" } else { "deselected" };
        println!("[{}] map: {marker} {state}", self.view);
    }

    fn clear_all(&mut self) {
        println!("[{}] map cleared", self.view);
    }
}

struct TextTable {
    view: ViewKind,
    clicks: SiteClicks,
}

impl TableSurface for TextTable {
    fn clear(&mut self) {}

    fn render(&mut self, columns: &[TableColumn], rows: &[TableRow], on_toggle: &SiteToggleSink) {
        self.clicks.keep(on_toggle);
        println!("[{}] table: {} rows", self.view, rows.len());
        let header: Vec<String> = columns.iter().map(|c| cell(&c.to_string())).collect();
        println!("  {}", header.join(" | "));
        for row in rows.iter().take(TABLE_PREVIEW_ROWS) {
            let cells: Vec<String> = row.cells.iter().map(|c| cell(c)).collect();
            println!("  {}", cells.join(" | "));
        }
        if rows.len() > TABLE_PREVIEW_ROWS {
            println!("  ... {} more", rows.len() - TABLE_PREVIEW_ROWS);
        }
    }

    fn set_row_selected(&mut self, row: &ElementHandle, selected: bool) {
        let marker = if selected { "*" } else { " " };
        println!("[{}] table: {marker} {row}", self.view);
    }
}

fn cell(text: &str) -> String {
    let truncated: String = text.chars().take(MAX_CELL_WIDTH).collect();
    format!("{truncated:<MAX_CELL_WIDTH$}")
}

struct TextSlider {
    view: ViewKind,
}

impl SliderSurface for TextSlider {
    fn clear(&mut self) {}

    fn render_chart(&mut self, chart: &SliderChart) {
        let (low, high) = chart.x_scale.domain();
        let (util_low, util_high) = chart.y_scale.domain();
        println!(
            "[{}] slider: {} points, {X_AXIS_LABEL} {low:.2}..{high:.2}, {Y_AXIS_LABEL} {util_low:.2}..{util_high:.2}, plot {:.0}x{:.0}px",
            self.view,
            chart.points.len(),
            chart.frame.width,
            chart.frame.height,
        );
        self.update_brush(chart.brush.as_ref());
        if let Some(brush) = &chart.brush {
            let covered = chart.points.iter().filter(|p| brush.covers(p)).count();
            println!("[{}] slider: {covered} point(s) inside the brush", self.view);
        }
    }

    fn render_scaffold(&mut self, scaffold: &SliderScaffold) {
        println!(
            "[{}] slider: axes only ({:?})",
            self.view, scaffold.reason
        );
    }

    fn update_brush(&mut self, brush: Option<&BrushExtent>) {
        match brush {
            Some(brush) => println!(
                "[{}] slider: brush {} ({:.0}..{:.0}px)",
                self.view, brush.range, brush.pixels.0, brush.pixels.1
            ),
            None => println!("[{}] slider: no brush", self.view),
        }
    }
}

struct TextControls {
    view: ViewKind,
}

impl ControlPanel for TextControls {
    fn set_municipality_options(&mut self, options: &[String], selected: &MunicipalitySelection) {
        println!(
            "[{}] municipality: {selected} ({} options)",
            self.view,
            options.len()
        );
    }

    fn set_phase_button(&mut self, button: PhaseButton, toggled: bool) {
        let mark = if toggled { "x" } else { " " };
        println!("[{}] [{mark}] {button}", self.view);
    }

    fn set_overlay_toggle(&mut self, overlay: Overlay, label: &str) {
        log::debug!("[{}] {overlay} toggle reads '{label}'", self.view);
    }
}
