#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory dataset types for the parking map.
//!
//! A [`Dataset`] is built once by the loader and is read-only afterwards.
//! Views share it behind an `Arc` and only ever derive subsets from it.

use geo::{BoundingRect, MultiPolygon, Rect};
use parking_map_site_models::SiteRecord;

/// Colour ramp for the jobs-accessibility heatmap, indexed by category 1-8.
pub const JOB_CATEGORY_COLORS: [&str; 8] = [
    "#ffffff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594",
];

/// Colour used for commuter rail lines.
pub const COMMUTER_RAIL_COLOR: &str = "#80276c";

/// A surveyed municipality's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityBoundary {
    /// Municipality name as found in the boundary file.
    pub name: String,
    /// Boundary geometry (lon/lat).
    pub polygon: MultiPolygon<f64>,
}

impl MunicipalityBoundary {
    /// Whether this boundary belongs to `municipality`, ignoring case.
    #[must_use]
    pub fn is_named(&self, municipality: &str) -> bool {
        self.name.eq_ignore_ascii_case(municipality)
    }
}

/// Which transit network a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitKind {
    /// Commuter rail.
    CommuterRail,
    /// Subway and light rail.
    RapidTransit,
}

/// One transit line geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitLine {
    /// Network the line belongs to.
    pub kind: TransitKind,
    /// Line name, if the source carries one.
    pub name: Option<String>,
    /// Stroke colour. Rapid transit lines carry their own colour.
    pub color: Option<String>,
    /// Line geometry (lon/lat).
    pub geometry: geo::Geometry<f64>,
}

impl TransitLine {
    /// Stroke colour to draw this line with.
    #[must_use]
    pub fn stroke(&self) -> &str {
        self.color.as_deref().unwrap_or(COMMUTER_RAIL_COLOR)
    }
}

/// A region of the jobs-accessibility heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRegion {
    /// Accessibility category, 1 (lowest) to 8 (highest).
    pub category: u8,
    /// Region geometry (lon/lat).
    pub polygon: MultiPolygon<f64>,
}

impl JobRegion {
    /// Fill colour for this region's category. Out-of-range categories use
    /// the lowest colour.
    #[must_use]
    pub fn color(&self) -> &'static str {
        usize::from(self.category)
            .checked_sub(1)
            .and_then(|idx| JOB_CATEGORY_COLORS.get(idx))
            .copied()
            .unwrap_or(JOB_CATEGORY_COLORS[0])
    }
}

/// Everything the dashboard draws, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Survey sites in file order. Identifiers are unique.
    pub sites: Vec<SiteRecord>,
    /// Boundaries of the surveyed municipalities only.
    pub municipalities: Vec<MunicipalityBoundary>,
    /// Commuter rail lines.
    pub commuter_rail: Vec<TransitLine>,
    /// Rapid transit lines.
    pub rapid_transit: Vec<TransitLine>,
    /// Jobs-accessibility regions.
    pub job_regions: Vec<JobRegion>,
}

impl Dataset {
    /// A dataset with sites and no map layers.
    #[must_use]
    pub fn from_sites(sites: Vec<SiteRecord>) -> Self {
        Self {
            sites,
            ..Self::default()
        }
    }

    /// Looks up a municipality boundary by name, ignoring case.
    #[must_use]
    pub fn boundary(&self, municipality: &str) -> Option<&MunicipalityBoundary> {
        self.municipalities
            .iter()
            .find(|boundary| boundary.is_named(municipality))
    }

    /// Bounding rectangle of all municipality boundaries.
    #[must_use]
    pub fn extent(&self) -> Option<Rect<f64>> {
        self.municipalities
            .iter()
            .filter_map(|boundary| boundary.polygon.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }
}
