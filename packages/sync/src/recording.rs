//! In-memory surfaces that record every call, for controller tests.

use std::cell::RefCell;
use std::rc::Rc;

use parking_map_dataset_models::Dataset;
use parking_map_site_models::{MunicipalitySelection, SiteId, SiteRecord};

use crate::slider::{BrushExtent, ScaffoldReason, SliderChart, SliderScaffold};
use crate::surface::{
    ControlPanel, ElementHandle, MapSurface, SiteMarker, SiteToggleSink, SliderSurface,
    TableSurface, ViewSurfaces,
};
use crate::table::{TableColumn, TableRow};
use crate::view::{Overlay, PhaseButton};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BaseLayers,
    ClearSites,
    DrawSites(Vec<SiteId>),
    Highlight(MunicipalitySelection),
    Overlay(Overlay, bool),
    MarkerSelected(ElementHandle, bool),
    ClearAll,
    TableClear,
    TableRender(Vec<SiteId>),
    RowSelected(ElementHandle, bool),
    SliderClear,
    Chart { points: usize, brush: Option<(f64, f64)> },
    Scaffold(ScaffoldReason),
    BrushUpdate(Option<(f64, f64)>),
    Options(Vec<String>, MunicipalitySelection),
    Button(PhaseButton, bool),
    OverlayLabel(Overlay, String),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

/// The click channel most recently handed to the map or table.
pub type Clicks = Rc<RefCell<Option<SiteToggleSink>>>;

struct Recorder {
    log: Log,
    clicks: Clicks,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }

    fn keep_sink(&self, sink: &SiteToggleSink) {
        *self.clicks.borrow_mut() = Some(sink.clone());
    }
}

impl MapSurface for Recorder {
    fn draw_base_layers(&mut self, _dataset: &Dataset) {
        self.push(Event::BaseLayers);
    }

    fn clear_sites(&mut self) {
        self.push(Event::ClearSites);
    }

    fn draw_sites(&mut self, markers: &[SiteMarker<'_>], on_toggle: &SiteToggleSink) {
        self.keep_sink(on_toggle);
        self.push(Event::DrawSites(
            markers.iter().map(|m| m.site.site_id.clone()).collect(),
        ));
    }

    fn highlight_municipality(&mut self, selection: &MunicipalitySelection) {
        self.push(Event::Highlight(selection.clone()));
    }

    fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool) {
        self.push(Event::Overlay(overlay, visible));
    }

    fn set_site_selected(&mut self, marker: &ElementHandle, selected: bool) {
        self.push(Event::MarkerSelected(marker.clone(), selected));
    }

    fn clear_all(&mut self) {
        self.push(Event::ClearAll);
    }
}

impl TableSurface for Recorder {
    fn clear(&mut self) {
        self.push(Event::TableClear);
    }

    fn render(&mut self, _columns: &[TableColumn], rows: &[TableRow], on_toggle: &SiteToggleSink) {
        self.keep_sink(on_toggle);
        self.push(Event::TableRender(
            rows.iter().map(|r| r.site_id.clone()).collect(),
        ));
    }

    fn set_row_selected(&mut self, row: &ElementHandle, selected: bool) {
        self.push(Event::RowSelected(row.clone(), selected));
    }
}

impl SliderSurface for Recorder {
    fn clear(&mut self) {
        self.push(Event::SliderClear);
    }

    fn render_chart(&mut self, chart: &SliderChart) {
        self.push(Event::Chart {
            points: chart.points.len(),
            brush: chart.brush.map(|b| b.range).map(|r| (r.low(), r.high())),
        });
    }

    fn render_scaffold(&mut self, scaffold: &SliderScaffold) {
        self.push(Event::Scaffold(scaffold.reason));
    }

    fn update_brush(&mut self, brush: Option<&BrushExtent>) {
        self.push(Event::BrushUpdate(
            brush.map(|b| (b.range.low(), b.range.high())),
        ));
    }
}

impl ControlPanel for Recorder {
    fn set_municipality_options(&mut self, options: &[String], selected: &MunicipalitySelection) {
        self.push(Event::Options(options.to_vec(), selected.clone()));
    }

    fn set_phase_button(&mut self, button: PhaseButton, toggled: bool) {
        self.push(Event::Button(button, toggled));
    }

    fn set_overlay_toggle(&mut self, overlay: Overlay, label: &str) {
        self.push(Event::OverlayLabel(overlay, label.to_owned()));
    }
}

/// Surfaces that all append to one shared log.
pub fn surfaces() -> (ViewSurfaces, Log) {
    let (surfaces, log, _clicks) = surfaces_with_clicks();
    (surfaces, log)
}

/// Like [`surfaces`], also exposing the click channel the map and table
/// were last drawn with.
pub fn surfaces_with_clicks() -> (ViewSurfaces, Log, Clicks) {
    let log = Log::default();
    let clicks = Clicks::default();
    let recorder = || Recorder {
        log: Rc::clone(&log),
        clicks: Rc::clone(&clicks),
    };
    let surfaces = ViewSurfaces {
        map: Box::new(recorder()),
        table: Box::new(recorder()),
        slider: Box::new(recorder()),
        controls: Box::new(recorder()),
    };
    (surfaces, log, clicks)
}

/// Clicks `site_id` through the last handed-out channel.
pub fn click(clicks: &Clicks, site_id: &str) {
    clicks
        .borrow()
        .as_ref()
        .expect("nothing drawn yet")
        .toggle(&SiteId::from(site_id));
}

/// Drains and returns the recorded events.
pub fn take(log: &Log) -> Vec<Event> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Five sites across three municipalities and all phases.
pub fn sample_dataset() -> Dataset {
    Dataset::from_sites(vec![
        SiteRecord::new("s1", "BOSTON", "1")
            .with_demand_ratio(0.5)
            .with_utilization_rate(0.6),
        SiteRecord::new("s2", "BOSTON", "2 3")
            .with_demand_ratio(1.0)
            .with_utilization_rate(0.8),
        SiteRecord::new("s3", "CAMBRIDGE", "3")
            .with_demand_ratio(1.5)
            .with_utilization_rate(0.7),
        SiteRecord::new("s4", "CAMBRIDGE", "4")
            .with_demand_ratio(2.0)
            .with_utilization_rate(0.9),
        SiteRecord::new("s5", "SALEM", "5"),
    ])
}

/// Site ids of the last map draw.
pub fn last_drawn(events: &[Event]) -> Option<Vec<&str>> {
    events.iter().rev().find_map(|event| match event {
        Event::DrawSites(ids) => Some(ids.iter().map(SiteId::as_str).collect()),
        _ => None,
    })
}
