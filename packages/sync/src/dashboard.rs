//! The main view plus an optional fullscreen popup.

use std::sync::Arc;

use parking_map_dataset_models::Dataset;

use crate::controller::FilterViewController;
use crate::slider::ContainerSize;
use crate::surface::{ElementLookup, ViewSurfaces};
use crate::view::ViewKind;

/// Owns the main view controller and, while it is open, the fullscreen
/// controller. Both share the dataset and element lookup; their filter
/// state is independent.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    lookup: Arc<dyn ElementLookup>,
    main: FilterViewController,
    fullscreen: Option<FilterViewController>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("sites", &self.dataset.sites.len())
            .field("main", &self.main)
            .field("fullscreen", &self.fullscreen)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Builds the dashboard and draws the main view.
    #[must_use]
    pub fn new(
        dataset: Arc<Dataset>,
        lookup: Arc<dyn ElementLookup>,
        surfaces: ViewSurfaces,
        container: ContainerSize,
    ) -> Self {
        let mut main = FilterViewController::new(
            ViewKind::Main,
            Arc::clone(&dataset),
            Arc::clone(&lookup),
            surfaces,
            container,
        );
        main.initialize();
        log::info!("Dashboard ready with {} sites", dataset.sites.len());
        Self {
            dataset,
            lookup,
            main,
            fullscreen: None,
        }
    }

    /// The shared dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The main view.
    #[must_use]
    pub const fn main(&self) -> &FilterViewController {
        &self.main
    }

    /// The main view, mutably.
    pub const fn main_mut(&mut self) -> &mut FilterViewController {
        &mut self.main
    }

    /// The fullscreen view, if open.
    #[must_use]
    pub const fn fullscreen(&self) -> Option<&FilterViewController> {
        self.fullscreen.as_ref()
    }

    /// The fullscreen view, mutably, if open.
    pub const fn fullscreen_mut(&mut self) -> Option<&mut FilterViewController> {
        self.fullscreen.as_mut()
    }

    /// The fullscreen view if open, otherwise the main view.
    #[must_use]
    pub fn active(&self) -> &FilterViewController {
        self.fullscreen.as_ref().unwrap_or(&self.main)
    }

    /// Mutable form of [`Self::active`].
    pub fn active_mut(&mut self) -> &mut FilterViewController {
        match self.fullscreen.as_mut() {
            Some(fullscreen) => fullscreen,
            None => &mut self.main,
        }
    }

    /// Whether the fullscreen view is open.
    #[must_use]
    pub const fn is_fullscreen_open(&self) -> bool {
        self.fullscreen.is_some()
    }

    /// Opens the fullscreen view with default filter state, replacing any
    /// view that is already open.
    pub fn open_fullscreen(&mut self, surfaces: ViewSurfaces, container: ContainerSize) {
        if let Some(mut previous) = self.fullscreen.take() {
            log::debug!("Replacing open fullscreen view");
            previous.destroy();
        }
        let mut controller = FilterViewController::new(
            ViewKind::Fullscreen,
            Arc::clone(&self.dataset),
            Arc::clone(&self.lookup),
            surfaces,
            container,
        );
        controller.initialize();
        self.fullscreen = Some(controller);
    }

    /// Closes the fullscreen view and redraws the main view so its slider
    /// picks up any layout change. Returns whether a view was open.
    pub fn close_fullscreen(&mut self) -> bool {
        let Some(mut fullscreen) = self.fullscreen.take() else {
            return false;
        };
        fullscreen.destroy();
        self.main.refresh();
        true
    }

    /// Handles the escape key: closes the fullscreen view if it is open.
    pub fn escape(&mut self) -> bool {
        self.close_fullscreen()
    }
}
