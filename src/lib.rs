//! Garage: a vehicle garage simulator.
//!
//! Garages are fixed-size, slot-addressed containers of vehicles keyed by license
//! plate. A registry persisted to a flat JSON file keeps plates well-formed and
//! unique across every garage.
//!
//! # Architecture
//!
//! - [`core::store::GarageStore`]: power-of-two slot table with a logical vehicle
//!   limit, slot reuse after removal, and case-insensitive plate lookup.
//! - [`core::registry::LicensePlateRegistry`]: plate syntax, uniqueness and
//!   persistence through a [`core::registry::PlateStore`].
//! - [`vehicles`]: the five vehicle kinds, their range checks, filters and the
//!   sample catalog.
//! - [`core::catalog::GarageCatalog`] and [`core::console::Console`]: numbered
//!   garages and the line-oriented console that drives them.
//!
//! # Examples
//!
//! ```bash
//! garage plates validate ABC123
//! garage plates register ABC123
//! garage demo --size 5 --filter kind=car
//! garage shell
//! ```

pub mod core;
pub mod vehicles;

mod cli;

use crate::cli::{Cli, Command, DemoCli, PlatesCommand};
use crate::core::config::GarageConfig;
use crate::core::console::Console;
use crate::core::error::GarageError;
use crate::core::registry::{LicensePlateRegistry, MemoryPlateStore, PlateStore};
use crate::core::store::GarageStore;
use crate::core::output;
use crate::core::time::Report;
use crate::vehicles::filter::{VehicleFilter, count_by_kind};
use crate::vehicles::samples::SAMPLE_COUNT;
use crate::vehicles::Vehicle;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;

pub fn run() -> Result<(), GarageError> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema())?);
            Ok(())
        }
        Command::Demo(demo) => run_demo(demo),
        Command::Plates(plates) => {
            let config = GarageConfig::resolve(cli.config.as_deref(), &cwd)?;
            let mut registry = LicensePlateRegistry::open(config.plate_store())?;
            run_plates(&mut registry, plates.command)
        }
        Command::Shell => {
            let config = GarageConfig::resolve(cli.config.as_deref(), &cwd)?;
            let mut registry = LicensePlateRegistry::open(config.plate_store())?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            Console::new(&mut registry, config.garage.clone()).run(stdin.lock(), &mut stdout)
        }
    }
}

#[derive(Serialize)]
struct PlateListing<'a> {
    count: usize,
    plates: &'a [&'a str],
}

#[derive(Serialize)]
struct DemoSummary<'a> {
    capacity: usize,
    vehicle_limit: usize,
    used_spaces: usize,
    registered_plates: usize,
    by_kind: BTreeMap<&'static str, usize>,
    filtered: bool,
    vehicles: Vec<&'a Vehicle>,
}

fn check_format(format: &str) -> Result<bool, GarageError> {
    match format {
        "text" => Ok(false),
        "json" => Ok(true),
        other => Err(GarageError::ValidationError(format!(
            "unknown format '{}' (expected text or json)",
            other
        ))),
    }
}

fn run_plates<S: PlateStore>(
    registry: &mut LicensePlateRegistry<S>,
    command: PlatesCommand,
) -> Result<(), GarageError> {
    match command {
        PlatesCommand::Validate { plate } => {
            registry.is_valid_license_plate(&plate)?;
            println!(
                "{} {} is a valid, unregistered license plate",
                "✓".bright_green(),
                plate.bright_cyan()
            );
        }
        PlatesCommand::Register { plate } => {
            registry.register_license_plate(&plate)?;
            println!("{} Registered {}", "✓".bright_green(), plate.bright_cyan());
        }
        PlatesCommand::Remove { plate } => {
            if registry.remove_license_plate(&plate)? {
                println!("{} Removed {}", "✓".bright_green(), plate.bright_cyan());
            } else {
                println!(
                    "{} {} was not registered",
                    "▸".bright_yellow(),
                    plate.bright_cyan()
                );
            }
        }
        PlatesCommand::Clear => {
            let n = registry.len();
            registry.clear_all_license_plates()?;
            println!("{} Cleared {} license plates", "✓".bright_green(), n);
        }
        PlatesCommand::List { format } => {
            let plates: Vec<&str> = registry.plates().collect();
            if check_format(&format)? {
                let report = Report::ok(
                    "plates.list",
                    PlateListing {
                        count: plates.len(),
                        plates: &plates,
                    },
                );
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if plates.is_empty() {
                println!("No registered license plates");
            } else {
                for p in plates {
                    println!("{}", p);
                }
            }
        }
    }
    Ok(())
}

fn run_demo(demo: DemoCli) -> Result<(), GarageError> {
    let json = check_format(&demo.format)?;
    let filter = VehicleFilter::parse_terms(demo.filters.iter().map(String::as_str))?;
    let size = demo.size.unwrap_or(SAMPLE_COUNT);

    let mut registry = LicensePlateRegistry::open(MemoryPlateStore::new())?;
    let mut garage: GarageStore<Vehicle> = GarageStore::new(size)?;
    match garage.add_sample_vehicles(registry.registrar()) {
        Ok(_) | Err(GarageError::GarageFull { .. }) => {}
        Err(e) => return Err(e),
    }

    let listed: Vec<&Vehicle> =
        garage.perform_query(|vs| vs.filter(|v| filter.matches(*v)).collect());
    let counts = garage.perform_query(|vs| count_by_kind(vs));

    if json {
        let report = Report::ok(
            "demo",
            DemoSummary {
                capacity: garage.capacity(),
                vehicle_limit: garage.vehicle_limit(),
                used_spaces: garage.used_spaces(),
                registered_plates: registry.len(),
                by_kind: counts.iter().map(|(k, n)| (k.as_str(), *n)).collect(),
                filtered: !filter.is_empty(),
                vehicles: listed,
            },
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", output::garage_status(0, &garage).bright_white().bold());
    println!(
        "{}",
        output::numbered(listed.iter().map(|v| v.to_string()))
    );
    println!("{} {}", "By kind:".bright_cyan(), output::kind_counts(&counts));
    Ok(())
}

/// Machine-readable description of the CLI and console surface.
pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "garage",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Capacity-managed vehicle garages with a persistent license plate registry",
        "commands": [
            { "name": "plates", "subcommands": ["validate", "register", "remove", "clear", "list"] },
            { "name": "demo", "parameters": ["size", "filter", "format"] },
            { "name": "shell", "description": "Line-oriented garage console on stdin/stdout" },
            { "name": "schema", "description": "Print this schema" }
        ],
        "console_commands": [
            "create", "garages", "select", "add", "remove", "show", "list",
            "seed", "filter", "count", "status", "help", "quit"
        ],
        "storage": ["licensePlates.json", "licensePlates.events.jsonl"]
    })
}
