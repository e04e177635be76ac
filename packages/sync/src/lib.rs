#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Keeps the map, table, and demand slider of each dashboard view in sync.
//!
//! A [`FilterViewController`] owns one view's filter state and surfaces.
//! Every interaction recomputes the visible subset from the shared
//! [`parking_map_dataset_models::Dataset`] and redraws, clearing each
//! surface before drawing it. The [`Dashboard`] holds the main view and an
//! optional fullscreen view whose state never leaks into the main one.

pub mod controller;
pub mod dashboard;
pub mod slider;
pub mod surface;
pub mod table;
pub mod view;

#[cfg(test)]
mod recording;

pub use controller::FilterViewController;
pub use dashboard::Dashboard;
pub use slider::{
    BrushEvent, BrushExtent, BrushResolution, BrushStage, ContainerSize, SliderChart,
    SliderLayout, SliderScaffold,
};
pub use surface::{
    ControlPanel, ElementHandle, ElementLookup, KeyedElementLookup, MapSurface, SiteMarker,
    SiteToggleSink, SliderSurface, TableSurface, ViewSurfaces,
};
pub use table::{TableColumn, TableRow, TableSort};
pub use view::{Overlay, OverlayState, PhaseButton, ViewKind, ViewLifecycle};
