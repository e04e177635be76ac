//! The per-view filter state store.

use parking_map_site_models::{DemandRange, MunicipalitySelection, PhaseSet, PhaseTag};
use serde::{Deserialize, Serialize};

/// One view's current filter selections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Phases currently included.
    pub active_phases: PhaseSet,
    /// Municipality restriction.
    pub selected_municipality: MunicipalitySelection,
    /// Demand-ratio brush. `None` means no range restriction; views place
    /// it over the full demand extent whenever they rebuild their slider.
    pub demand_brush: Option<DemandRange>,
}

/// A partial update merged into a [`FilterState`] by
/// [`FilterStateStore::set_state`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    active_phases: Option<PhaseSet>,
    selected_municipality: Option<MunicipalitySelection>,
    demand_brush: Option<Option<DemandRange>>,
}

impl FilterUpdate {
    /// Replaces the active phases.
    #[must_use]
    pub fn phases(mut self, phases: PhaseSet) -> Self {
        self.active_phases = Some(phases);
        self
    }

    /// Replaces the municipality selection.
    #[must_use]
    pub fn municipality(mut self, selection: MunicipalitySelection) -> Self {
        self.selected_municipality = Some(selection);
        self
    }

    /// Sets (`Some`) or clears (`None`) the demand brush.
    #[must_use]
    pub const fn brush(mut self, range: Option<DemandRange>) -> Self {
        self.demand_brush = Some(range);
        self
    }
}

/// Holds exactly one view's filter state.
///
/// Stores are never shared between views; every mutation goes through
/// `&mut self`, so an update to one view's store cannot be observed from
/// another.
#[derive(Debug, Clone, Default)]
pub struct FilterStateStore {
    state: FilterState,
}

impl FilterStateStore {
    /// Creates a store holding the default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the current state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FilterState {
        self.state.clone()
    }

    /// Merges `update` into the current state.
    ///
    /// Selecting a specific municipality switches every phase back on as
    /// part of the same update, overriding any phases the update carries.
    /// The next state is built completely before it replaces the current
    /// one. Returns whether the state changed.
    pub fn set_state(&mut self, update: FilterUpdate) -> bool {
        let mut next = self.state.clone();

        if let Some(phases) = update.active_phases {
            next.active_phases = phases;
        }
        if let Some(selection) = update.selected_municipality {
            if !selection.is_all() {
                log::debug!("Municipality {selection} selected, enabling all phases");
                next.active_phases = PhaseSet::full();
            }
            next.selected_municipality = selection;
        }
        if let Some(brush) = update.demand_brush {
            next.demand_brush = brush;
        }

        self.replace(next)
    }

    /// Flips a single phase tag. Returns whether the tag is now active.
    pub fn toggle_phase(&mut self, tag: PhaseTag) -> bool {
        let mut phases = self.state.active_phases.clone();
        let active = phases.toggle(tag);
        self.set_state(FilterUpdate::default().phases(phases));
        active
    }

    /// Flips a group of tags as one control: if every tag in the group is
    /// active they are all removed, otherwise they are all added.
    ///
    /// Repeated tags in `tags` count once. Returns whether the group is now
    /// fully active.
    pub fn toggle_phase_group(&mut self, tags: &[PhaseTag]) -> bool {
        let mut phases = self.state.active_phases.clone();
        let activate = !phases.contains_all(tags);
        for tag in tags {
            if activate {
                phases.insert(*tag);
            } else {
                phases.remove(*tag);
            }
        }
        self.set_state(FilterUpdate::default().phases(phases));
        activate
    }

    /// Restores the default state: every phase, every municipality, no brush.
    pub fn reset_to_defaults(&mut self) {
        self.replace(FilterState::default());
    }

    fn replace(&mut self, next: FilterState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }
}
