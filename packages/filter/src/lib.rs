#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and filtering for parking survey sites.
//!
//! Each dashboard view owns one [`FilterStateStore`]. The [`engine`]
//! functions derive the visible subset of sites from the immutable dataset
//! and a [`FilterState`] snapshot; they never mutate their input and hold
//! no state of their own.

pub mod engine;
pub mod store;

pub use engine::{
    compose_filters, filter_by_demand_range, filter_by_municipality, filter_by_phase,
    municipality_options, site_passes,
};
pub use store::{FilterState, FilterStateStore, FilterUpdate};
