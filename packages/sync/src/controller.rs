//! The per-view controller that keeps the map, table, and slider on one
//! filtered subset.
//!
//! Every interaction mutates the view's own [`FilterStateStore`], then
//! recomputes the subset from scratch and redraws the affected surfaces
//! before returning. Surfaces are always cleared before they are drawn, so
//! exactly one generation of elements is live at any time.
//!
//! Every full redraw that follows a phase or municipality change places the
//! demand brush over the whole demand axis of the new subset, so sites
//! without a demand ratio stay hidden until the brush is cleared.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError};

use parking_map_dataset_models::Dataset;
use parking_map_filter::{
    FilterState, FilterStateStore, FilterUpdate, compose_filters, filter_by_demand_range,
    filter_by_municipality, filter_by_phase, municipality_options,
};
use parking_map_site_models::{DemandRange, MunicipalitySelection, PhaseTag, SiteId, SiteRecord};

use crate::slider::{BrushEvent, BrushResolution, ContainerSize, SliderChart, SliderLayout};
use crate::surface::{
    ElementHandle, ElementLookup, SiteMarker, SiteToggleSink, ToggleQueue, ViewSurfaces,
};
use crate::table::{TableColumn, TableRow, TableSort};
use crate::view::{Overlay, OverlayState, PhaseButton, ViewKind, ViewLifecycle};

/// Drives one dashboard view.
///
/// The main page and the fullscreen popup each own an instance. Nothing
/// mutable is shared between instances; the dataset is shared read-only.
pub struct FilterViewController {
    kind: ViewKind,
    dataset: Arc<Dataset>,
    lookup: Arc<dyn ElementLookup>,
    surfaces: ViewSurfaces,
    slider_container: ContainerSize,
    store: FilterStateStore,
    lifecycle: ViewLifecycle,
    generation: u64,
    /// Sites drawn on the map and table in the live generation.
    drawn: BTreeSet<SiteId>,
    selected: BTreeSet<SiteId>,
    options: Vec<String>,
    slider: Option<SliderLayout>,
    overlays: OverlayState,
    table_sort: Option<TableSort>,
    toggles: ToggleQueue,
}

/// How a full redraw treats the demand brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrushReset {
    /// Keep the current range, cleared or not.
    Keep,
    /// Span the demand extent of the new subset.
    FullExtent,
}

impl std::fmt::Debug for FilterViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterViewController")
            .field("kind", &self.kind)
            .field("lifecycle", &self.lifecycle)
            .field("generation", &self.generation)
            .field("state", self.store.state())
            .finish_non_exhaustive()
    }
}

impl FilterViewController {
    /// Creates an uninitialised controller with default filter state.
    #[must_use]
    pub fn new(
        kind: ViewKind,
        dataset: Arc<Dataset>,
        lookup: Arc<dyn ElementLookup>,
        surfaces: ViewSurfaces,
        slider_container: ContainerSize,
    ) -> Self {
        Self {
            kind,
            dataset,
            lookup,
            surfaces,
            slider_container,
            store: FilterStateStore::new(),
            lifecycle: ViewLifecycle::Uninitialized,
            generation: 0,
            drawn: BTreeSet::new(),
            selected: BTreeSet::new(),
            options: Vec::new(),
            slider: None,
            overlays: OverlayState::default(),
            table_sort: None,
            toggles: ToggleQueue::default(),
        }
    }

    /// Which view this controller drives.
    #[must_use]
    pub const fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> ViewLifecycle {
        self.lifecycle
    }

    /// Current filter state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        self.store.state()
    }

    /// Number of map/table redraws performed so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Municipalities offered by the dropdown: those with at least one site
    /// in the current phase selection.
    #[must_use]
    pub fn municipality_options(&self) -> &[String] {
        &self.options
    }

    /// Sites currently marked as selected.
    #[must_use]
    pub const fn selected_sites(&self) -> &BTreeSet<SiteId> {
        &self.selected
    }

    /// Overlay visibility.
    #[must_use]
    pub const fn overlays(&self) -> OverlayState {
        self.overlays
    }

    /// Current table sort, if any.
    #[must_use]
    pub const fn table_sort(&self) -> Option<TableSort> {
        self.table_sort
    }

    /// Last slider layout.
    #[must_use]
    pub const fn slider_layout(&self) -> Option<&SliderLayout> {
        self.slider.as_ref()
    }

    /// The subset currently shown on the map and table.
    #[must_use]
    pub fn visible_sites(&self) -> Vec<&SiteRecord> {
        compose_filters(&self.dataset.sites, self.store.state())
    }

    /// Whether a phase button shows as toggled (all its tags active).
    #[must_use]
    pub fn is_button_toggled(&self, button: PhaseButton) -> bool {
        self.store.state().active_phases.contains_all(button.tags())
    }

    /// Draws everything for the first time: base layers, controls, and the
    /// three data surfaces.
    pub fn initialize(&mut self) {
        if self.lifecycle != ViewLifecycle::Uninitialized {
            log::warn!("{} view initialised twice, ignoring", self.kind);
            return;
        }
        log::debug!(
            "Initialising {} view with {} sites",
            self.kind,
            self.dataset.sites.len()
        );

        self.surfaces.map.draw_base_layers(&self.dataset);
        for overlay in [Overlay::Transit, Overlay::JobsHeatmap] {
            let visible = self.overlays.is_visible(overlay);
            self.surfaces.map.set_overlay_visible(overlay, visible);
            self.surfaces
                .controls
                .set_overlay_toggle(overlay, overlay.toggle_label(visible));
        }

        self.lifecycle = ViewLifecycle::Ready;
        self.redraw_all(BrushReset::FullExtent);
    }

    /// Redraws every surface from the current state without changing it.
    pub fn refresh(&mut self) {
        if self.ensure_ready("refresh") {
            self.redraw_all(BrushReset::Keep);
        }
    }

    /// Presses a phase button. Buttons that do not exist in this view are
    /// ignored.
    pub fn press_phase_button(&mut self, button: PhaseButton) {
        if !self.ensure_ready("phase button") {
            return;
        }
        if !self.kind.has_button(button) {
            log::warn!("{} view has no {button:?} button", self.kind);
            return;
        }
        self.store.toggle_phase_group(button.tags());
        self.redraw_all(BrushReset::FullExtent);
    }

    /// Flips a single phase tag by pressing the view's button for it.
    ///
    /// Tags without a button of their own in this view are ignored: phase 1
    /// in both views and phase 2 in the fullscreen view are only reachable
    /// through [`PhaseButton::Phases1And2`].
    pub fn toggle_phase(&mut self, tag: PhaseTag) {
        let button = self
            .kind
            .phase_buttons()
            .iter()
            .find(|button| button.tags() == [tag]);
        match button {
            Some(button) => self.press_phase_button(*button),
            None => log::warn!("{} view has no button for phase {tag}", self.kind),
        }
    }

    /// Selects a municipality by dropdown value (`"all"` for none).
    ///
    /// Choosing a specific municipality switches every phase back on.
    pub fn select_municipality(&mut self, value: &str) {
        if !self.ensure_ready("municipality change") {
            return;
        }
        self.store.set_state(
            FilterUpdate::default().municipality(MunicipalitySelection::from_value(value)),
        );
        self.redraw_all(BrushReset::FullExtent);
    }

    /// Handles a brush gesture from the slider.
    ///
    /// Every intermediate move updates the range and redraws the map and
    /// table; the slider itself only moves its brush and restyles points.
    pub fn handle_brush(&mut self, event: BrushEvent) {
        if !self.ensure_ready("brush") {
            return;
        }
        let Some(chart) = self.slider.as_ref().and_then(SliderLayout::chart) else {
            log::debug!("{} view has no brush, ignoring {event:?}", self.kind);
            return;
        };
        match chart.resolve_brush(event) {
            BrushResolution::Apply(extent) => self.apply_brush(Some(extent.range)),
            BrushResolution::Clear => self.apply_brush(None),
            BrushResolution::Ignore => {}
        }
    }

    /// Sets or clears the demand range directly in data units.
    pub fn set_demand_range(&mut self, range: Option<DemandRange>) {
        if self.ensure_ready("demand range") {
            self.apply_brush(range);
        }
    }

    /// Flips the selected styling of a site's marker and row. Returns
    /// whether the site was toggled.
    ///
    /// Only sites drawn in the live generation can be selected; selection
    /// is dropped by the next redraw.
    pub fn toggle_site(&mut self, site_id: &SiteId) -> bool {
        if !self.ensure_ready("site toggle") {
            return false;
        }
        if !self.drawn.contains(site_id) {
            log::debug!("Site {site_id} is not drawn in the {} view", self.kind);
            return false;
        }
        let selected = if self.selected.remove(site_id) {
            false
        } else {
            self.selected.insert(site_id.clone());
            true
        };
        let marker = self.lookup.site_marker(self.kind, site_id);
        let row = self.lookup.table_row(self.kind, site_id);
        self.surfaces.map.set_site_selected(&marker, selected);
        self.surfaces.table.set_row_selected(&row, selected);
        true
    }

    /// Applies the site clicks the map and table queued on their
    /// [`SiteToggleSink`] since the last call, in click order.
    ///
    /// Clicks on elements of an earlier generation are dropped. Returns how
    /// many clicks were applied.
    pub fn apply_site_toggles(&mut self) -> usize {
        let queued = std::mem::take(
            &mut *self
                .toggles
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if queued.is_empty() || !self.ensure_ready("site click") {
            return 0;
        }

        let mut applied = 0;
        for (generation, site_id) in queued {
            if generation != self.generation {
                log::debug!(
                    "Dropping click on {site_id} from stale generation {generation} of the {} view",
                    self.kind
                );
                continue;
            }
            if self.toggle_site(&site_id) {
                applied += 1;
            }
        }
        applied
    }

    /// Shows or hides an overlay. Filter state is untouched.
    pub fn toggle_overlay(&mut self, overlay: Overlay) {
        if !self.ensure_ready("overlay toggle") {
            return;
        }
        let visible = self.overlays.toggle(overlay);
        self.surfaces.map.set_overlay_visible(overlay, visible);
        self.surfaces
            .controls
            .set_overlay_toggle(overlay, overlay.toggle_label(visible));
    }

    /// Sorts the table by `column`, flipping direction on repeated clicks.
    /// Rows are reordered in place; selection is kept.
    pub fn sort_table(&mut self, column: TableColumn) {
        if !self.ensure_ready("table sort") {
            return;
        }
        self.table_sort = Some(TableSort::after_click(self.table_sort, column));
        let visible = self.visible_sites();
        let rows = self.table_rows(visible);
        let sink = self.toggle_sink();
        self.surfaces.table.clear();
        self.surfaces.table.render(TableColumn::ALL, &rows, &sink);
        for site_id in &self.selected {
            let row = self.lookup.table_row(self.kind, site_id);
            self.surfaces.table.set_row_selected(&row, true);
        }
    }

    /// Tears the view down and discards its filter state.
    pub fn destroy(&mut self) {
        if self.lifecycle == ViewLifecycle::Destroyed {
            return;
        }
        log::debug!("Destroying {} view", self.kind);
        self.surfaces.map.clear_all();
        self.surfaces.table.clear();
        self.surfaces.slider.clear();
        self.store.reset_to_defaults();
        self.toggles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.drawn.clear();
        self.selected.clear();
        self.options.clear();
        self.slider = None;
        self.lifecycle = ViewLifecycle::Destroyed;
    }

    fn ensure_ready(&self, action: &str) -> bool {
        if self.lifecycle == ViewLifecycle::Ready {
            return true;
        }
        log::warn!(
            "Ignoring {action} on {} view in state {}",
            self.kind,
            self.lifecycle
        );
        false
    }

    fn apply_brush(&mut self, range: Option<DemandRange>) {
        self.store.set_state(FilterUpdate::default().brush(range));

        let brush = match (range, self.slider.as_ref().and_then(SliderLayout::chart)) {
            (Some(range), Some(chart)) => Some(chart.extent_for(range)),
            _ => None,
        };
        if let Some(SliderLayout::Chart(chart)) = self.slider.as_mut() {
            chart.brush = brush;
        }
        self.surfaces.slider.update_brush(brush.as_ref());

        let dataset = Arc::clone(&self.dataset);
        let state = self.store.state();
        let base = filter_by_municipality(
            filter_by_phase(&dataset.sites, &state.active_phases),
            &state.selected_municipality,
        );
        let visible = match range {
            Some(range) => filter_by_demand_range(base, &range),
            None => base,
        };
        self.redraw_sites(&visible);
    }

    fn toggle_sink(&self) -> SiteToggleSink {
        SiteToggleSink::new(self.generation, Arc::clone(&self.toggles))
    }

    fn redraw_all(&mut self, reset: BrushReset) {
        let dataset = Arc::clone(&self.dataset);
        let mut state = self.store.snapshot();

        let phase_subset = filter_by_phase(&dataset.sites, &state.active_phases);
        self.options = municipality_options(phase_subset.iter().copied());
        let base = filter_by_municipality(phase_subset, &state.selected_municipality);

        self.surfaces
            .controls
            .set_municipality_options(&self.options, &state.selected_municipality);
        for button in self.kind.phase_buttons() {
            self.surfaces
                .controls
                .set_phase_button(*button, state.active_phases.contains_all(button.tags()));
        }
        self.surfaces
            .map
            .highlight_municipality(&state.selected_municipality);

        self.surfaces.slider.clear();
        let mut layout = SliderLayout::compute(&base, self.slider_container, state.demand_brush);
        if reset == BrushReset::FullExtent {
            let full = layout.chart().and_then(SliderChart::full_range);
            if let SliderLayout::Chart(chart) = &mut layout {
                chart.brush = full.map(|range| chart.extent_for(range));
            }
            self.store.set_state(FilterUpdate::default().brush(full));
            state.demand_brush = full;
        }
        match &layout {
            SliderLayout::Chart(chart) => self.surfaces.slider.render_chart(chart),
            SliderLayout::Scaffold(scaffold) => {
                log::warn!(
                    "{} slider drawn as axes only: {:?}",
                    self.kind,
                    scaffold.reason
                );
                self.surfaces.slider.render_scaffold(scaffold);
            }
        }
        self.slider = Some(layout);

        let visible = match &state.demand_brush {
            Some(range) => filter_by_demand_range(base, range),
            None => base,
        };
        self.redraw_sites(&visible);
    }

    /// Clears and redraws the map markers and table rows.
    fn redraw_sites(&mut self, visible: &[&SiteRecord]) {
        self.generation += 1;
        self.selected.clear();
        self.drawn = visible.iter().map(|site| site.site_id.clone()).collect();

        self.surfaces.map.clear_sites();
        self.surfaces.table.clear();

        let handles: Vec<ElementHandle> = visible
            .iter()
            .map(|site| self.lookup.site_marker(self.kind, &site.site_id))
            .collect();
        let markers: Vec<SiteMarker<'_>> = visible
            .iter()
            .zip(&handles)
            .map(|(site, handle)| SiteMarker { handle, site: *site })
            .collect();
        let sink = self.toggle_sink();
        self.surfaces.map.draw_sites(&markers, &sink);

        let rows = self.table_rows(visible.to_vec());
        self.surfaces.table.render(TableColumn::ALL, &rows, &sink);

        log::debug!(
            "{} view generation {} shows {} sites",
            self.kind,
            self.generation,
            visible.len()
        );
    }

    fn table_rows(&self, mut sites: Vec<&SiteRecord>) -> Vec<TableRow> {
        if let Some(sort) = &self.table_sort {
            sort.apply(&mut sites);
        }
        sites
            .into_iter()
            .map(|site| TableRow::format(site, self.lookup.table_row(self.kind, &site.site_id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{
        Event, click, last_drawn, sample_dataset, surfaces, surfaces_with_clicks, take,
    };
    use crate::slider::{BrushStage, ScaffoldReason};
    use crate::surface::KeyedElementLookup;

    const CONTAINER: ContainerSize = ContainerSize {
        width: 560.0,
        height: 280.0,
    };

    fn controller(kind: ViewKind) -> (FilterViewController, crate::recording::Log) {
        let (surfaces, log) = surfaces();
        let mut controller = FilterViewController::new(
            kind,
            Arc::new(sample_dataset()),
            Arc::new(KeyedElementLookup),
            surfaces,
            CONTAINER,
        );
        controller.initialize();
        (controller, log)
    }

    fn brush(stage: BrushStage, from: f64, to: f64) -> BrushEvent {
        BrushEvent {
            stage,
            selection: Some((from, to)),
        }
    }

    #[test]
    fn initialize_draws_base_layers_and_every_site_under_the_full_brush() {
        let (controller, log) = controller(ViewKind::Main);
        let events = take(&log);

        assert_eq!(events[0], Event::BaseLayers);
        assert!(events.contains(&Event::Overlay(Overlay::Transit, false)));
        assert!(events.contains(&Event::OverlayLabel(
            Overlay::JobsHeatmap,
            "Show Jobs Heatmap".to_owned()
        )));
        // s5 has no demand ratio, so the initial full-extent brush hides it.
        assert_eq!(last_drawn(&events), Some(vec!["s1", "s2", "s3", "s4"]));
        assert!(events.contains(&Event::Chart {
            points: 4,
            brush: Some((0.5, 2.0))
        }));
        assert_eq!(controller.state().demand_brush, DemandRange::new(0.5, 2.0));
        assert_eq!(
            controller.municipality_options(),
            ["BOSTON", "CAMBRIDGE", "SALEM"]
        );
        assert_eq!(controller.lifecycle(), ViewLifecycle::Ready);
        assert_eq!(controller.generation(), 1);
    }

    #[test]
    fn surfaces_are_cleared_before_they_are_drawn() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        controller.toggle_phase(PhaseTag::Three);
        let events = take(&log);

        let position = |wanted: &Event| events.iter().position(|e| e == wanted);
        let clear_sites = position(&Event::ClearSites).unwrap();
        let table_clear = position(&Event::TableClear).unwrap();
        let slider_clear = position(&Event::SliderClear).unwrap();
        let draw = events
            .iter()
            .position(|e| matches!(e, Event::DrawSites(_)))
            .unwrap();
        let render = events
            .iter()
            .position(|e| matches!(e, Event::TableRender(_)))
            .unwrap();
        let chart = events
            .iter()
            .position(|e| matches!(e, Event::Chart { .. }))
            .unwrap();

        assert!(clear_sites < draw);
        assert!(table_clear < render);
        assert!(slider_clear < chart);
        assert_eq!(
            events.iter().filter(|e| matches!(e, Event::DrawSites(_))).count(),
            1
        );
    }

    #[test]
    fn phase_toggle_updates_options_and_subset() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        controller.toggle_phase(PhaseTag::Five);
        let events = take(&log);

        assert_eq!(last_drawn(&events), Some(vec!["s1", "s2", "s3", "s4"]));
        assert_eq!(controller.municipality_options(), ["BOSTON", "CAMBRIDGE"]);
        assert!(events.contains(&Event::Button(PhaseButton::Phase5, false)));
    }

    #[test]
    fn combined_button_toggles_both_phases() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        controller.press_phase_button(PhaseButton::Phases1And2);
        assert!(!controller.state().active_phases.contains(PhaseTag::One));
        assert!(!controller.state().active_phases.contains(PhaseTag::Two));
        // s2 is tagged "2 3" and still passes through phase 3.
        assert_eq!(last_drawn(&take(&log)), Some(vec!["s2", "s3", "s4"]));

        controller.press_phase_button(PhaseButton::Phase2);
        assert!(!controller.is_button_toggled(PhaseButton::Phases1And2));
        controller.press_phase_button(PhaseButton::Phases1And2);
        assert!(controller.is_button_toggled(PhaseButton::Phases1And2));
        assert!(controller.state().active_phases.is_full());
    }

    #[test]
    fn fullscreen_ignores_the_phase_two_button() {
        let (mut controller, log) = controller(ViewKind::Fullscreen);
        take(&log);
        let generation = controller.generation();

        controller.press_phase_button(PhaseButton::Phase2);

        assert!(take(&log).is_empty());
        assert_eq!(controller.generation(), generation);
        assert!(controller.state().active_phases.is_full());
    }

    #[test]
    fn municipality_selection_reactivates_every_phase() {
        let (mut controller, log) = controller(ViewKind::Main);
        controller.toggle_phase(PhaseTag::Three);
        take(&log);

        controller.select_municipality("CAMBRIDGE");
        let events = take(&log);

        assert!(controller.state().active_phases.is_full());
        assert_eq!(last_drawn(&events), Some(vec!["s3", "s4"]));
        assert!(events.contains(&Event::Highlight(MunicipalitySelection::Named(
            "CAMBRIDGE".to_owned()
        ))));

        controller.select_municipality("all");
        assert_eq!(controller.visible_sites().len(), 4);
    }

    #[test]
    fn unknown_municipality_yields_empty_views_and_scaffold() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        controller.select_municipality("NOWHERE");
        let events = take(&log);

        assert_eq!(last_drawn(&events), Some(vec![]));
        assert!(events.contains(&Event::Scaffold(ScaffoldReason::EmptySubset)));
    }

    #[test]
    fn brush_moves_redraw_map_and_table_but_not_the_chart() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        // Frame is 400px wide over demand 0.5..2.0; 0..200px is 0.5..1.25.
        controller.handle_brush(brush(BrushStage::Move, 0.0, 200.0));
        let events = take(&log);

        assert_eq!(last_drawn(&events), Some(vec!["s1", "s2"]));
        assert!(!events.contains(&Event::SliderClear));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, Event::Chart { .. } | Event::Options(..)))
        );
        assert!(events.contains(&Event::BrushUpdate(Some((0.5, 1.25)))));
        assert_eq!(
            controller.state().demand_brush,
            DemandRange::new(0.5, 1.25)
        );
    }

    #[test]
    fn cleared_brush_restores_the_base_subset() {
        let (mut controller, log) = controller(ViewKind::Main);
        controller.handle_brush(brush(BrushStage::End, 0.0, 200.0));
        take(&log);

        controller.handle_brush(BrushEvent {
            stage: BrushStage::End,
            selection: None,
        });
        let events = take(&log);

        assert!(controller.state().demand_brush.is_none());
        assert!(events.contains(&Event::BrushUpdate(None)));
        assert_eq!(
            last_drawn(&events),
            Some(vec!["s1", "s2", "s3", "s4", "s5"])
        );

        controller.refresh();
        assert!(controller.state().demand_brush.is_none());
        assert_eq!(last_drawn(&take(&log)).map(|ids| ids.len()), Some(5));
    }

    #[test]
    fn brush_outside_the_plot_is_ignored_until_release() {
        let (mut controller, log) = controller(ViewKind::Main);
        controller.handle_brush(brush(BrushStage::End, 0.0, 200.0));
        take(&log);

        controller.handle_brush(brush(BrushStage::Move, 500.0, 600.0));
        assert!(take(&log).is_empty());
        assert!(controller.state().demand_brush.is_some());

        controller.handle_brush(brush(BrushStage::End, 500.0, 600.0));
        assert!(controller.state().demand_brush.is_none());
    }

    #[test]
    fn phase_change_moves_the_brush_to_the_new_extent() {
        let (mut controller, log) = controller(ViewKind::Main);
        controller.handle_brush(brush(BrushStage::End, 0.0, 200.0));
        controller.handle_brush(BrushEvent {
            stage: BrushStage::End,
            selection: None,
        });
        take(&log);

        controller.toggle_phase(PhaseTag::Four);
        let events = take(&log);

        assert_eq!(controller.state().demand_brush, DemandRange::new(0.5, 1.5));
        assert!(events.contains(&Event::Chart {
            points: 3,
            brush: Some((0.5, 1.5))
        }));
        assert_eq!(last_drawn(&events), Some(vec!["s1", "s2", "s3"]));
    }

    #[test]
    fn unplottable_subset_draws_a_scaffold_and_leaves_demand_unrestricted() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);

        controller.select_municipality("SALEM");
        let events = take(&log);

        assert!(events.contains(&Event::Scaffold(ScaffoldReason::NoPlottableSites)));
        assert!(controller.state().demand_brush.is_none());
        assert_eq!(last_drawn(&events), Some(vec!["s5"]));
    }

    #[test]
    fn filters_compose_across_phase_municipality_and_demand() {
        let dataset = Dataset::from_sites(vec![
            SiteRecord::new("A", "BOSTON", "1 2")
                .with_demand_ratio(1.0)
                .with_utilization_rate(0.5),
            SiteRecord::new("B", "BOSTON", "3")
                .with_demand_ratio(3.0)
                .with_utilization_rate(0.9),
        ]);
        let (surfaces, log) = surfaces();
        let mut controller = FilterViewController::new(
            ViewKind::Main,
            Arc::new(dataset),
            Arc::new(KeyedElementLookup),
            surfaces,
            CONTAINER,
        );
        controller.initialize();
        assert_eq!(last_drawn(&take(&log)), Some(vec!["A", "B"]));

        controller.press_phase_button(PhaseButton::Phases1And2);
        assert_eq!(last_drawn(&take(&log)), Some(vec!["B"]));

        controller.select_municipality("BOSTON");
        assert!(controller.state().active_phases.is_full());
        assert_eq!(last_drawn(&take(&log)), Some(vec!["A", "B"]));

        controller.set_demand_range(DemandRange::new(0.5, 2.0));
        assert_eq!(last_drawn(&take(&log)), Some(vec!["A"]));
    }

    #[test]
    fn selection_toggles_and_is_dropped_by_redraw() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);
        let s3 = SiteId::from("s3");

        controller.toggle_site(&s3);
        let events = take(&log);
        assert!(events.contains(&Event::MarkerSelected(
            ElementHandle("main/marker/s3".to_owned()),
            true
        )));
        assert!(events.contains(&Event::RowSelected(
            ElementHandle("main/row/s3".to_owned()),
            true
        )));
        assert!(controller.selected_sites().contains(&s3));

        controller.toggle_site(&s3);
        assert!(controller.selected_sites().is_empty());

        controller.toggle_site(&s3);
        controller.refresh();
        assert!(controller.selected_sites().is_empty());
    }

    #[test]
    fn surface_clicks_toggle_sites_of_the_live_generation() {
        let (surfaces, log, clicks) = surfaces_with_clicks();
        let mut controller = FilterViewController::new(
            ViewKind::Main,
            Arc::new(sample_dataset()),
            Arc::new(KeyedElementLookup),
            surfaces,
            CONTAINER,
        );
        controller.initialize();
        take(&log);

        click(&clicks, "s2");
        click(&clicks, "s4");
        click(&clicks, "s2");
        assert!(take(&log).is_empty());

        assert_eq!(controller.apply_site_toggles(), 3);
        assert_eq!(
            controller.selected_sites().iter().collect::<Vec<_>>(),
            [&SiteId::from("s4")]
        );
        assert!(take(&log).contains(&Event::RowSelected(
            ElementHandle("main/row/s4".to_owned()),
            true
        )));
        assert_eq!(controller.apply_site_toggles(), 0);
    }

    #[test]
    fn clicks_from_a_replaced_generation_are_dropped() {
        let (surfaces, log, clicks) = surfaces_with_clicks();
        let mut controller = FilterViewController::new(
            ViewKind::Main,
            Arc::new(sample_dataset()),
            Arc::new(KeyedElementLookup),
            surfaces,
            CONTAINER,
        );
        controller.initialize();
        let stale = clicks.borrow().clone().unwrap();

        controller.refresh();
        take(&log);
        stale.toggle(&SiteId::from("s1"));

        assert_eq!(controller.apply_site_toggles(), 0);
        assert!(controller.selected_sites().is_empty());
        assert!(take(&log).is_empty());

        click(&clicks, "s1");
        assert_eq!(controller.apply_site_toggles(), 1);
    }

    #[test]
    fn fullscreen_cannot_toggle_phase_two_alone() {
        let (mut controller, log) = controller(ViewKind::Fullscreen);
        take(&log);

        controller.toggle_phase(PhaseTag::Two);
        controller.toggle_phase(PhaseTag::One);
        assert!(take(&log).is_empty());
        assert!(controller.state().active_phases.is_full());

        controller.toggle_phase(PhaseTag::Three);
        assert!(!controller.state().active_phases.contains(PhaseTag::Three));
        assert!(last_drawn(&take(&log)).is_some());
    }

    #[test]
    fn hidden_sites_cannot_be_selected() {
        let (mut controller, log) = controller(ViewKind::Main);
        controller.select_municipality("BOSTON");
        take(&log);

        controller.toggle_site(&SiteId::from("s3"));

        assert!(take(&log).is_empty());
        assert!(controller.selected_sites().is_empty());
    }

    #[test]
    fn overlay_toggle_leaves_filters_alone() {
        let (mut controller, log) = controller(ViewKind::Main);
        take(&log);
        let generation = controller.generation();

        controller.toggle_overlay(Overlay::Transit);
        let events = take(&log);

        assert_eq!(
            events,
            [
                Event::Overlay(Overlay::Transit, true),
                Event::OverlayLabel(Overlay::Transit, "Hide Public Transit".to_owned()),
            ]
        );
        assert_eq!(controller.generation(), generation);
        assert!(controller.overlays().transit);
    }

    #[test]
    fn sorting_keeps_the_selection() {
        let (mut controller, log) = controller(ViewKind::Main);
        let s1 = SiteId::from("s1");
        controller.toggle_site(&s1);
        take(&log);

        controller.sort_table(TableColumn::Demand);
        controller.sort_table(TableColumn::Demand);
        let events = take(&log);

        assert!(events.contains(&Event::TableRender(vec![
            SiteId::from("s4"),
            SiteId::from("s3"),
            SiteId::from("s2"),
            SiteId::from("s1"),
        ])));
        assert!(events.contains(&Event::RowSelected(
            ElementHandle("main/row/s1".to_owned()),
            true
        )));
        assert!(controller.selected_sites().contains(&s1));
    }

    #[test]
    fn degenerate_container_draws_a_scaffold_without_brush() {
        let (surfaces, log) = surfaces();
        let mut controller = FilterViewController::new(
            ViewKind::Main,
            Arc::new(sample_dataset()),
            Arc::new(KeyedElementLookup),
            surfaces,
            ContainerSize {
                width: 100.0,
                height: 50.0,
            },
        );
        controller.initialize();
        let events = take(&log);

        assert!(events.contains(&Event::Scaffold(ScaffoldReason::DegenerateDimensions)));
        assert_eq!(last_drawn(&events).map(|ids| ids.len()), Some(5));

        controller.handle_brush(brush(BrushStage::End, 0.0, 10.0));
        assert!(take(&log).is_empty());
        assert!(controller.state().demand_brush.is_none());
    }

    #[test]
    fn destroyed_controller_ignores_interactions() {
        let (mut controller, log) = controller(ViewKind::Fullscreen);
        controller.select_municipality("SALEM");
        controller.destroy();
        let events = take(&log);

        assert!(events.contains(&Event::ClearAll));
        assert_eq!(controller.lifecycle(), ViewLifecycle::Destroyed);
        assert_eq!(controller.state(), &FilterState::default());

        controller.toggle_phase(PhaseTag::One);
        controller.refresh();
        assert!(take(&log).is_empty());
    }
}
