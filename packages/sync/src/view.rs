//! View identity, per-view controls, and lifecycle states.

use parking_map_site_models::PhaseTag;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which of the two dashboard views a controller drives.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewKind {
    /// The embedded page view.
    Main,
    /// The fullscreen popup.
    Fullscreen,
}

impl ViewKind {
    /// Phase buttons shown in this view, in display order.
    ///
    /// The main view has a dedicated phase 2 button next to the combined
    /// phase 1 & 2 button; the fullscreen view only has the combined one.
    #[must_use]
    pub const fn phase_buttons(self) -> &'static [PhaseButton] {
        match self {
            Self::Main => &[
                PhaseButton::Phases1And2,
                PhaseButton::Phase2,
                PhaseButton::Phase3,
                PhaseButton::Phase4,
                PhaseButton::Phase5,
            ],
            Self::Fullscreen => &[
                PhaseButton::Phases1And2,
                PhaseButton::Phase3,
                PhaseButton::Phase4,
                PhaseButton::Phase5,
            ],
        }
    }

    /// Whether `button` exists in this view.
    #[must_use]
    pub fn has_button(self, button: PhaseButton) -> bool {
        self.phase_buttons().contains(&button)
    }
}

/// A phase toggle button.
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
pub enum PhaseButton {
    /// Controls phases 1 and 2 together.
    #[strum(serialize = "bp1", to_string = "Phases 1 & 2")]
    Phases1And2,
    /// Controls phase 2 only.
    #[strum(serialize = "bp2", to_string = "Phase 2")]
    Phase2,
    /// Controls phase 3.
    #[strum(serialize = "bp3", to_string = "Phase 3")]
    Phase3,
    /// Controls phase 4.
    #[strum(serialize = "bp4", to_string = "Phase 4")]
    Phase4,
    /// Controls phase 5.
    #[strum(serialize = "bp5", to_string = "Phase 5")]
    Phase5,
}

impl PhaseButton {
    /// The phase tags this button switches.
    #[must_use]
    pub const fn tags(self) -> &'static [PhaseTag] {
        match self {
            Self::Phases1And2 => &[PhaseTag::One, PhaseTag::Two],
            Self::Phase2 => &[PhaseTag::Two],
            Self::Phase3 => &[PhaseTag::Three],
            Self::Phase4 => &[PhaseTag::Four],
            Self::Phase5 => &[PhaseTag::Five],
        }
    }
}

/// A map overlay that can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Overlay {
    /// Commuter rail and rapid transit lines.
    Transit,
    /// Jobs-accessibility heatmap and its legend.
    JobsHeatmap,
}

impl Overlay {
    /// Label for the toggle that flips this overlay.
    #[must_use]
    pub const fn toggle_label(self, visible: bool) -> &'static str {
        match (self, visible) {
            (Self::Transit, false) => "Show Public Transit",
            (Self::Transit, true) => "Hide Public Transit",
            (Self::JobsHeatmap, false) => "Show Jobs Heatmap",
            (Self::JobsHeatmap, true) => "Hide Jobs Heatmap",
        }
    }
}

/// Visibility of each overlay. Everything starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    /// Transit lines shown.
    pub transit: bool,
    /// Jobs heatmap shown.
    pub jobs_heatmap: bool,
}

impl OverlayState {
    /// Whether `overlay` is shown.
    #[must_use]
    pub const fn is_visible(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Transit => self.transit,
            Overlay::JobsHeatmap => self.jobs_heatmap,
        }
    }

    /// Flips `overlay`. Returns whether it is now shown.
    pub const fn toggle(&mut self, overlay: Overlay) -> bool {
        let slot = match overlay {
            Overlay::Transit => &mut self.transit,
            Overlay::JobsHeatmap => &mut self.jobs_heatmap,
        };
        *slot = !*slot;
        *slot
    }
}

/// Lifecycle of a view controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ViewLifecycle {
    /// Created, nothing drawn yet.
    Uninitialized,
    /// Drawn and accepting interactions.
    Ready,
    /// Torn down. Interactions are ignored.
    Destroyed,
}
