#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parking survey site records and the value types used to filter them.
//!
//! Site records are created once when the dataset is loaded and are
//! read-only afterwards. Every view of the dashboard filters the same
//! records by [`PhaseSet`], [`MunicipalitySelection`], and an optional
//! [`DemandRange`].

use std::collections::BTreeSet;
use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel value used by municipality selectors for "no restriction".
pub const ALL_MUNICIPALITIES: &str = "all";

/// Unique identifier of a surveyed site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl SiteId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Project rollout phase a site belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum PhaseTag {
    /// Phase 1
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    One = 1,
    /// Phase 2
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Two = 2,
    /// Phase 3
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Three = 3,
    /// Phase 4
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Four = 4,
    /// Phase 5
    #[strum(serialize = "5")]
    #[serde(rename = "5")]
    Five = 5,
}

impl PhaseTag {
    /// Returns the numeric value of this phase.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a phase tag from its numeric value.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::One, Self::Two, Self::Three, Self::Four, Self::Five]
    }
}

/// Parses a free-text phase label such as `"1 2"` into phase tags.
///
/// The label is split on spaces and every token that is exactly one of the
/// known phase numbers becomes a tag. Anything else (empty labels, `"TBD"`,
/// `"6"`, `"01"`) contributes nothing, so a label may parse to no tags at
/// all. Duplicate tokens are collapsed and label order is kept.
#[must_use]
pub fn parse_phase_tags(label: &str) -> Vec<PhaseTag> {
    let mut tags = Vec::new();
    for token in label.split(' ') {
        let Ok(tag) = PhaseTag::from_str(token) else {
            continue;
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// A set of phase tags, e.g. the phases currently switched on in a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseSet(BTreeSet<PhaseTag>);

impl PhaseSet {
    /// Every phase.
    #[must_use]
    pub fn full() -> Self {
        Self(PhaseTag::all().iter().copied().collect())
    }

    /// No phases.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `tag` is in the set.
    #[must_use]
    pub fn contains(&self, tag: PhaseTag) -> bool {
        self.0.contains(&tag)
    }

    /// Whether every one of `tags` is in the set.
    #[must_use]
    pub fn contains_all(&self, tags: &[PhaseTag]) -> bool {
        tags.iter().all(|tag| self.0.contains(tag))
    }

    /// Whether any of `tags` is in the set.
    #[must_use]
    pub fn contains_any(&self, tags: &[PhaseTag]) -> bool {
        tags.iter().any(|tag| self.0.contains(tag))
    }

    /// Whether all five phases are in the set.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() == PhaseTag::all().len()
    }

    /// Whether no phase is in the set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds `tag`.
    pub fn insert(&mut self, tag: PhaseTag) {
        self.0.insert(tag);
    }

    /// Removes `tag`.
    pub fn remove(&mut self, tag: PhaseTag) {
        self.0.remove(&tag);
    }

    /// Flips membership of `tag`. Returns whether the tag is now present.
    pub fn toggle(&mut self, tag: PhaseTag) -> bool {
        if self.0.remove(&tag) {
            false
        } else {
            self.0.insert(tag);
            true
        }
    }

    /// Iterates the phases in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PhaseTag> + '_ {
        self.0.iter().copied()
    }
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self::full()
    }
}

impl FromIterator<PhaseTag> for PhaseSet {
    fn from_iter<T: IntoIterator<Item = PhaseTag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The municipality a view is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum MunicipalitySelection {
    /// No restriction.
    #[default]
    All,
    /// Only sites whose municipality equals this name exactly.
    Named(String),
}

impl MunicipalitySelection {
    /// Builds a selection from a selector value, mapping the
    /// [`ALL_MUNICIPALITIES`] sentinel to [`Self::All`].
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == ALL_MUNICIPALITIES {
            Self::All
        } else {
            Self::Named(value.to_owned())
        }
    }

    /// The selector value for this selection.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::All => ALL_MUNICIPALITIES,
            Self::Named(name) => name,
        }
    }

    /// Whether a site in `municipality` passes this selection.
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn matches(&self, municipality: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == municipality,
        }
    }

    /// Whether this is the "all" sentinel.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for MunicipalitySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Closed interval over the parking-demand-ratio axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandRange {
    low: f64,
    high: f64,
}

impl DemandRange {
    /// Creates a range from two bounds in either order.
    ///
    /// Returns `None` if either bound is NaN.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Option<Self> {
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Whether `value` lies within `[low, high]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// The smallest range covering every value, or `None` if there are no
    /// finite values.
    #[must_use]
    pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut bounds: Option<(f64, f64)> = None;
        for value in values.into_iter().filter(|v| v.is_finite()) {
            bounds = Some(match bounds {
                None => (value, value),
                Some((low, high)) => (low.min(value), high.max(value)),
            });
        }
        bounds.and_then(|(low, high)| Self::new(low, high))
    }
}

impl std::fmt::Display for DemandRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}..{:.2}", self.low, self.high)
    }
}

/// Error returned when a `LOW..HIGH` string cannot be parsed into a
/// [`DemandRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDemandRangeError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for InvalidDemandRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid demand range '{}': expected LOW..HIGH",
            self.input
        )
    }
}

impl std::error::Error for InvalidDemandRangeError {}

impl std::str::FromStr for DemandRange {
    type Err = InvalidDemandRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidDemandRangeError {
            input: s.to_owned(),
        };
        let (low, high) = s.split_once("..").ok_or_else(err)?;
        let low: f64 = low.trim().parse().map_err(|_| err())?;
        let high: f64 = high.trim().parse().map_err(|_| err())?;
        Self::new(low, high).ok_or_else(err)
    }
}

/// Geographic position of a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// One surveyed parking site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    /// Unique site identifier.
    pub site_id: SiteId,
    /// Display name (property name, or street address when unnamed).
    pub name: String,
    /// Municipality name as written in the survey (upper case).
    pub municipality: String,
    /// Phase label verbatim, e.g. `"1 2"`.
    pub phase_label: String,
    /// Tags parsed from [`Self::phase_label`].
    pub phase_tags: Vec<PhaseTag>,
    /// Position, if the survey recorded one.
    pub coordinates: Option<Coordinates>,
    /// Parked cars per unit.
    pub demand_ratio: Option<f64>,
    /// Share of spaces in use. Usually 0-1 but not clamped.
    pub utilization_rate: Option<f64>,
    /// Parking spaces per unit.
    pub supply_per_unit: Option<f64>,
    /// Share of units that are affordable.
    pub affordable_share: Option<f64>,
    /// Walk Score.
    pub walk_score: Option<f64>,
    /// Jobs reachable by transit within 30 minutes.
    pub jobs_accessible: Option<f64>,
}

impl SiteRecord {
    /// Creates a record with no position or numeric attributes.
    #[must_use]
    pub fn new(site_id: impl Into<String>, municipality: &str, phase_label: &str) -> Self {
        let site_id = SiteId(site_id.into());
        Self {
            name: site_id.0.clone(),
            site_id,
            municipality: municipality.to_owned(),
            phase_label: phase_label.to_owned(),
            phase_tags: parse_phase_tags(phase_label),
            coordinates: None,
            demand_ratio: None,
            utilization_rate: None,
            supply_per_unit: None,
            affordable_share: None,
            walk_score: None,
            jobs_accessible: None,
        }
    }

    /// Sets the demand ratio.
    #[must_use]
    pub const fn with_demand_ratio(mut self, demand_ratio: f64) -> Self {
        self.demand_ratio = Some(demand_ratio);
        self
    }

    /// Sets the utilization rate.
    #[must_use]
    pub const fn with_utilization_rate(mut self, utilization_rate: f64) -> Self {
        self.utilization_rate = Some(utilization_rate);
        self
    }

    /// Demand ratio if it is a usable number.
    #[must_use]
    pub fn valid_demand_ratio(&self) -> Option<f64> {
        self.demand_ratio.filter(|v| v.is_finite())
    }

    /// Utilization rate if it is a usable number.
    #[must_use]
    pub fn valid_utilization_rate(&self) -> Option<f64> {
        self.utilization_rate.filter(|v| v.is_finite())
    }
}
