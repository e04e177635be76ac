#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the parking utilization dashboard.
//!
//! ```text
//! parking_map summary
//! parking_map filter [--press bp1,bp3] [--municipality NAME] [--demand LOW..HIGH] [--fullscreen]
//! parking_map interactive
//! ```
//!
//! Running `parking_map` with no subcommand enters interactive mode. Views
//! are drawn through text surfaces that print every redraw.

mod config;
mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use parking_map_dataset::load_dataset;
use parking_map_dataset_models::Dataset;
use parking_map_filter::municipality_options;
use parking_map_site_models::{DemandRange, PhaseTag};
use parking_map_sync::{Dashboard, KeyedElementLookup, PhaseButton, TableColumn, ViewKind};

use crate::config::DashboardConfig;
use crate::render::text_surfaces;

#[derive(Parser)]
#[command(
    name = "parking_map",
    about = "Explore parking utilization survey sites by phase, municipality, and demand"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the data files (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dataset counts and the municipality list
    Summary,
    /// Apply filters to one view and print the result
    Filter {
        /// Phase buttons to press in order, comma separated (bp1 = phases 1
        /// and 2, bp2-bp5 = single phases; the fullscreen view has no bp2)
        #[arg(long, value_delimiter = ',')]
        press: Vec<PhaseButton>,
        /// Municipality to restrict to
        #[arg(long)]
        municipality: Option<String>,
        /// Demand range as LOW..HIGH
        #[arg(long)]
        demand: Option<DemandRange>,
        /// Sort the table by this column (name, muni, supply, demand, ...)
        #[arg(long)]
        sort: Option<TableColumn>,
        /// Apply the filters in the fullscreen view instead of the main one
        #[arg(long)]
        fullscreen: bool,
    },
    /// Menu-driven exploration
    Interactive,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.dataset = config.dataset.with_data_dir(data_dir);
    }

    let dataset = Arc::new(load_dataset(&config.dataset)?);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Summary => print_summary(&dataset),
        Commands::Filter {
            press,
            municipality,
            demand,
            sort,
            fullscreen,
        } => {
            let (main_surfaces, _) = text_surfaces(ViewKind::Main, Arc::clone(&dataset));
            let mut dashboard = Dashboard::new(
                Arc::clone(&dataset),
                Arc::new(KeyedElementLookup),
                main_surfaces,
                config.slider.main,
            );
            if fullscreen {
                let (full_surfaces, _) = text_surfaces(ViewKind::Fullscreen, dataset);
                dashboard.open_fullscreen(full_surfaces, config.slider.fullscreen);
            }

            let view = dashboard.active_mut();
            if let Some(municipality) = municipality {
                view.select_municipality(&municipality);
            }
            for button in press {
                if !view.kind().has_button(button) {
                    println!("The {} view has no {button} button", view.kind());
                }
                view.press_phase_button(button);
            }
            if demand.is_some() {
                view.set_demand_range(demand);
            }
            if let Some(column) = sort {
                view.sort_table(column);
            }

            println!();
            println!("{} sites visible", view.visible_sites().len());
        }
        Commands::Interactive => interactive::run(dataset, &config)?,
    }

    Ok(())
}

fn print_summary(dataset: &Dataset) {
    println!("Sites:                 {}", dataset.sites.len());
    println!("Municipality outlines: {}", dataset.municipalities.len());
    println!("Commuter rail lines:   {}", dataset.commuter_rail.len());
    println!("Rapid transit lines:   {}", dataset.rapid_transit.len());
    println!("Job regions:           {}", dataset.job_regions.len());
    println!();

    println!("{:<8} SITES", "PHASE");
    for tag in PhaseTag::all() {
        let count = dataset
            .sites
            .iter()
            .filter(|site| site.phase_tags.contains(tag))
            .count();
        println!("{tag:<8} {count}");
    }
    let untagged = dataset
        .sites
        .iter()
        .filter(|site| site.phase_tags.is_empty())
        .count();
    if untagged > 0 {
        println!("{:<8} {untagged}", "(none)");
    }
    let unplottable = dataset
        .sites
        .iter()
        .filter(|site| {
            site.valid_demand_ratio().is_none() || site.valid_utilization_rate().is_none()
        })
        .count();
    println!("\n{unplottable} site(s) cannot be plotted on the demand slider");

    let options = municipality_options(&dataset.sites);
    println!("\n{} municipalities:", options.len());
    for name in options {
        println!("  {name}");
    }
}
