//! Pure derivation of the visible site subset.
//!
//! Every function takes sites by shared reference and returns a new vector
//! of references in input order. The three filters are intersective:
//! [`compose_filters`] keeps exactly the sites that pass all of them.

use std::collections::BTreeSet;

use parking_map_site_models::{DemandRange, MunicipalitySelection, PhaseSet, SiteRecord};

use crate::FilterState;

/// Keeps sites with at least one parsed phase tag in `active_phases`.
///
/// A site whose label parsed to no tags never passes, even when every phase
/// is active.
pub fn filter_by_phase<'a>(
    sites: impl IntoIterator<Item = &'a SiteRecord>,
    active_phases: &PhaseSet,
) -> Vec<&'a SiteRecord> {
    sites
        .into_iter()
        .filter(|site| passes_phase(site, active_phases))
        .collect()
}

/// Keeps sites in the selected municipality. Identity for "all".
pub fn filter_by_municipality<'a>(
    sites: impl IntoIterator<Item = &'a SiteRecord>,
    selection: &MunicipalitySelection,
) -> Vec<&'a SiteRecord> {
    sites
        .into_iter()
        .filter(|site| selection.matches(&site.municipality))
        .collect()
}

/// Keeps sites whose demand ratio lies within `range` (both ends inclusive).
/// Sites without a usable demand ratio never pass.
pub fn filter_by_demand_range<'a>(
    sites: impl IntoIterator<Item = &'a SiteRecord>,
    range: &DemandRange,
) -> Vec<&'a SiteRecord> {
    sites
        .into_iter()
        .filter(|site| passes_demand(site, range))
        .collect()
}

/// Applies the phase filter, then the municipality filter, then the demand
/// brush if one is set.
pub fn compose_filters<'a>(
    sites: impl IntoIterator<Item = &'a SiteRecord>,
    state: &FilterState,
) -> Vec<&'a SiteRecord> {
    let by_phase = filter_by_phase(sites, &state.active_phases);
    let by_municipality = filter_by_municipality(by_phase, &state.selected_municipality);
    match &state.demand_brush {
        Some(range) => filter_by_demand_range(by_municipality, range),
        None => by_municipality,
    }
}

/// The conjunction of every active predicate for a single site.
#[must_use]
pub fn site_passes(site: &SiteRecord, state: &FilterState) -> bool {
    passes_phase(site, &state.active_phases)
        && state.selected_municipality.matches(&site.municipality)
        && state
            .demand_brush
            .as_ref()
            .is_none_or(|range| passes_demand(site, range))
}

/// Sorted, de-duplicated municipality names present in `sites`.
pub fn municipality_options<'a>(sites: impl IntoIterator<Item = &'a SiteRecord>) -> Vec<String> {
    sites
        .into_iter()
        .map(|site| site.municipality.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn passes_phase(site: &SiteRecord, active_phases: &PhaseSet) -> bool {
    active_phases.contains_any(&site.phase_tags)
}

fn passes_demand(site: &SiteRecord, range: &DemandRange) -> bool {
    site.valid_demand_ratio()
        .is_some_and(|demand| range.contains(demand))
}
