//! Menu-driven exploration of the dashboard using `dialoguer`.

use std::sync::Arc;

use dialoguer::{Input, Select};
use parking_map_dataset_models::Dataset;
use parking_map_site_models::{ALL_MUNICIPALITIES, DemandRange, SiteId};
use parking_map_sync::{
    BrushEvent, BrushStage, Dashboard, FilterViewController, KeyedElementLookup, Overlay,
    SliderLayout, TableColumn, ViewKind,
};

use crate::config::DashboardConfig;
use crate::render::{SiteClicks, text_surfaces};

/// Actions offered in the menu.
enum Action {
    PhaseButton,
    Municipality,
    DemandRange,
    Brush,
    Overlay,
    SelectSite,
    SortTable,
    ToggleFullscreen,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::PhaseButton,
        Self::Municipality,
        Self::DemandRange,
        Self::Brush,
        Self::Overlay,
        Self::SelectSite,
        Self::SortTable,
        Self::ToggleFullscreen,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self, fullscreen_open: bool) -> &'static str {
        match self {
            Self::PhaseButton => "Toggle a phase button",
            Self::Municipality => "Choose municipality",
            Self::DemandRange => "Set demand range",
            Self::Brush => "Drag the slider brush (pixels)",
            Self::Overlay => "Toggle an overlay",
            Self::SelectSite => "Select or deselect a site",
            Self::SortTable => "Sort the table",
            Self::ToggleFullscreen => {
                if fullscreen_open {
                    "Close fullscreen (escape)"
                } else {
                    "Open fullscreen"
                }
            }
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// Every action applies to the fullscreen view while it is open and to the
/// main view otherwise.
///
/// # Errors
///
/// Returns an error if a prompt fails (for example when stdin is not a
/// terminal).
pub fn run(dataset: Arc<Dataset>, config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (main_surfaces, main_clicks) = text_surfaces(ViewKind::Main, Arc::clone(&dataset));
    let mut dashboard = Dashboard::new(
        Arc::clone(&dataset),
        Arc::new(KeyedElementLookup),
        main_surfaces,
        config.slider.main,
    );
    let mut fullscreen_clicks: Option<SiteClicks> = None;

    loop {
        println!();
        let open = dashboard.is_fullscreen_open();
        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label(open)).collect();
        let prompt = format!("Parking map ({} view)", dashboard.active().kind());

        let idx = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::PhaseButton => press_phase_button(dashboard.active_mut())?,
            Action::Municipality => choose_municipality(dashboard.active_mut())?,
            Action::DemandRange => set_demand_range(dashboard.active_mut())?,
            Action::Brush => drag_brush(dashboard.active_mut())?,
            Action::Overlay => toggle_overlay(dashboard.active_mut())?,
            Action::SelectSite => {
                let clicks = fullscreen_clicks.as_ref().unwrap_or(&main_clicks);
                select_site(dashboard.active_mut(), clicks)?;
            }
            Action::SortTable => sort_table(dashboard.active_mut())?,
            Action::ToggleFullscreen => {
                if open {
                    dashboard.escape();
                    fullscreen_clicks = None;
                } else {
                    let (surfaces, clicks) =
                        text_surfaces(ViewKind::Fullscreen, Arc::clone(&dataset));
                    dashboard.open_fullscreen(surfaces, config.slider.fullscreen);
                    fullscreen_clicks = Some(clicks);
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn press_phase_button(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    let buttons = view.kind().phase_buttons();
    let labels: Vec<String> = buttons
        .iter()
        .map(|button| {
            let mark = if view.is_button_toggled(*button) {
                "x"
            } else {
                " "
            };
            format!("[{mark}] {button}")
        })
        .collect();

    let idx = Select::new()
        .with_prompt("Phase button")
        .items(&labels)
        .default(0)
        .interact()?;
    view.press_phase_button(buttons[idx]);
    Ok(())
}

fn choose_municipality(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    let mut labels = vec![ALL_MUNICIPALITIES.to_owned()];
    labels.extend(view.municipality_options().iter().cloned());
    let current = labels
        .iter()
        .position(|label| label.as_str() == view.state().selected_municipality.value())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Municipality")
        .items(&labels)
        .default(current)
        .interact()?;
    view.select_municipality(&labels[idx]);
    Ok(())
}

fn set_demand_range(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    let text: String = Input::new()
        .with_prompt("Demand range LOW..HIGH (empty to clear)")
        .allow_empty(true)
        .interact_text()?;
    let text = text.trim();
    if text.is_empty() {
        view.set_demand_range(None);
        return Ok(());
    }
    match text.parse::<DemandRange>() {
        Ok(range) => view.set_demand_range(Some(range)),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn drag_brush(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    if view.slider_layout().and_then(SliderLayout::chart).is_none() {
        println!("The slider has no brush right now.");
        return Ok(());
    }
    let text: String = Input::new()
        .with_prompt("Brush pixels FROM..TO (empty to clear)")
        .allow_empty(true)
        .interact_text()?;
    let text = text.trim();

    let selection = if text.is_empty() {
        None
    } else {
        let parsed = text.split_once("..").and_then(|(from, to)| {
            Some((from.trim().parse::<f64>().ok()?, to.trim().parse::<f64>().ok()?))
        });
        let Some(pixels) = parsed else {
            println!("invalid pixel span '{text}': expected FROM..TO");
            return Ok(());
        };
        Some(pixels)
    };

    view.handle_brush(BrushEvent {
        stage: BrushStage::End,
        selection,
    });
    Ok(())
}

fn toggle_overlay(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    let overlays = [Overlay::Transit, Overlay::JobsHeatmap];
    let labels: Vec<&str> = overlays
        .iter()
        .map(|overlay| overlay.toggle_label(view.overlays().is_visible(*overlay)))
        .collect();

    let idx = Select::new()
        .with_prompt("Overlay")
        .items(&labels)
        .default(0)
        .interact()?;
    view.toggle_overlay(overlays[idx]);
    Ok(())
}

fn select_site(
    view: &mut FilterViewController,
    clicks: &SiteClicks,
) -> Result<(), dialoguer::Error> {
    let sites: Vec<(SiteId, String)> = view
        .visible_sites()
        .into_iter()
        .map(|site| {
            let mark = if view.selected_sites().contains(&site.site_id) {
                "*"
            } else {
                " "
            };
            (
                site.site_id.clone(),
                format!("{mark} {} ({})", site.name, site.municipality),
            )
        })
        .collect();
    if sites.is_empty() {
        println!("No sites are visible.");
        return Ok(());
    }

    let labels: Vec<&str> = sites.iter().map(|(_, label)| label.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Site")
        .items(&labels)
        .default(0)
        .max_length(15)
        .interact()?;
    if clicks.click(&sites[idx].0) {
        view.apply_site_toggles();
    }
    Ok(())
}

fn sort_table(view: &mut FilterViewController) -> Result<(), dialoguer::Error> {
    let labels: Vec<String> = TableColumn::ALL.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Sort by")
        .items(&labels)
        .default(0)
        .interact()?;
    view.sort_table(TableColumn::ALL[idx]);
    Ok(())
}
