//! Line-oriented console over a [`GarageCatalog`] and a plate registry.
//!
//! One command per line. Input mistakes (bad plate, full garage, unknown
//! command) are reported on the output and the loop keeps reading; storage
//! failures end the session with an error.

use crate::core::catalog::GarageCatalog;
use crate::core::config::GarageDefaults;
use crate::core::error::GarageError;
use crate::core::output;
use crate::core::registry::{LicensePlateRegistry, PlateStore};
use crate::vehicles::filter::{VehicleFilter, count_by_kind};
use crate::vehicles::{Color, Vehicle, VehicleKind};
use std::io::{BufRead, Write};

pub const HELP: &str = "\
commands:
  create [size]                               create a garage (1 - 524288) and select it
  garages                                     list garages
  select <id>                                 select a garage
  add <kind> <plate> <color> <wheels> <field> park a vehicle in the selected garage
  remove <plate>                              take a vehicle out and release its plate
  show <plate>                                show one vehicle
  list                                        list every vehicle
  seed                                        park the 40 sample vehicles
  filter [kind=..] [color=..] [wheels<op><n>] list matching vehicles
  count                                       vehicles per kind
  status                                      usage of the selected garage
  help                                        this text
  quit                                        leave
kinds: airplane (engines), boat (fuel), bus (doors), car (seats), motorcycle (sidecar yes/no)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Create(Option<usize>),
    Garages,
    Select(usize),
    Add {
        kind: VehicleKind,
        plate: String,
        color: Color,
        wheels: u32,
        field: String,
    },
    Remove(String),
    Show(String),
    List,
    Seed,
    Filter(VehicleFilter),
    Count,
    Status,
    Help,
    Quit,
}

fn number<N: std::str::FromStr>(what: &str, token: &str) -> Result<N, GarageError> {
    token.parse::<N>().map_err(|_| {
        GarageError::ValidationError(format!("{} must be a number (got '{}')", what, token))
    })
}

fn usage(text: &str) -> GarageError {
    GarageError::ValidationError(format!("usage: {}", text))
}

impl ShellCommand {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<ShellCommand>, GarageError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = tokens.split_first() else {
            return Ok(None);
        };
        if head.starts_with('#') {
            return Ok(None);
        }

        let cmd = match (head.to_ascii_lowercase().as_str(), args) {
            ("create", []) => ShellCommand::Create(None),
            ("create", [size]) => ShellCommand::Create(Some(number("garage size", size)?)),
            ("create", _) => return Err(usage("create [size]")),
            ("garages", []) => ShellCommand::Garages,
            ("select", [id]) => ShellCommand::Select(number("garage id", id)?),
            ("select", _) => return Err(usage("select <id>")),
            ("add", [kind, plate, color, wheels, field]) => ShellCommand::Add {
                kind: kind.parse()?,
                plate: plate.to_string(),
                color: color.parse()?,
                wheels: number("wheels", wheels)?,
                field: field.to_string(),
            },
            ("add", _) => return Err(usage("add <kind> <plate> <color> <wheels> <field>")),
            ("remove", [plate]) => ShellCommand::Remove(plate.to_string()),
            ("remove", _) => return Err(usage("remove <plate>")),
            ("show", [plate]) => ShellCommand::Show(plate.to_string()),
            ("show", _) => return Err(usage("show <plate>")),
            ("list", []) => ShellCommand::List,
            ("seed", []) => ShellCommand::Seed,
            ("filter", terms) => {
                ShellCommand::Filter(VehicleFilter::parse_terms(terms.iter().copied())?)
            }
            ("count", []) => ShellCommand::Count,
            ("status", []) => ShellCommand::Status,
            ("help", _) | ("?", _) => ShellCommand::Help,
            ("quit", []) | ("exit", []) => ShellCommand::Quit,
            _ => {
                return Err(GarageError::ValidationError(format!(
                    "unknown command '{}' (try 'help')",
                    output::one_line(line, 40)
                )));
            }
        };
        Ok(Some(cmd))
    }
}

pub struct Console<'r, S: PlateStore> {
    catalog: GarageCatalog<Vehicle>,
    registry: &'r mut LicensePlateRegistry<S>,
    defaults: GarageDefaults,
}

impl<'r, S: PlateStore> Console<'r, S> {
    pub fn new(registry: &'r mut LicensePlateRegistry<S>, defaults: GarageDefaults) -> Self {
        Self {
            catalog: GarageCatalog::new(),
            registry,
            defaults,
        }
    }

    pub fn catalog(&self) -> &GarageCatalog<Vehicle> {
        &self.catalog
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), GarageError> {
        writeln!(out, "garage console. type 'help' for commands.")?;
        for line in input.lines() {
            let line = line?;
            let outcome = ShellCommand::parse(&line).and_then(|cmd| match cmd {
                Some(ShellCommand::Quit) => Ok(false),
                Some(cmd) => self.execute(cmd, out).map(|_| true),
                None => Ok(true),
            });
            match outcome {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_recoverable() => writeln!(out, "error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
        writeln!(out, "bye")?;
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, cmd: ShellCommand, out: &mut W) -> Result<(), GarageError> {
        match cmd {
            ShellCommand::Create(size) => {
                let size = size.unwrap_or(self.defaults.default_size);
                let id = self.catalog.create_garage(size)?;
                self.catalog.select(id)?;
                writeln!(out, "Garage {} of size {} created and selected.", id, size)?;
                if self.defaults.seed_samples {
                    self.seed(out)?;
                }
            }
            ShellCommand::Garages => {
                if self.catalog.is_empty() {
                    writeln!(out, "There are no created garages yet!")?;
                }
                for (id, garage) in self.catalog.garages() {
                    let marker = if self.catalog.selected_id() == Some(id) { "*" } else { " " };
                    writeln!(out, "{} {}", marker, output::garage_status(id, garage))?;
                }
            }
            ShellCommand::Select(id) => {
                self.catalog.select(id)?;
                writeln!(out, "Garage {} selected.", id)?;
            }
            ShellCommand::Add {
                kind,
                plate,
                color,
                wheels,
                field,
            } => {
                let garage = self.catalog.current_mut()?;
                if garage.is_full() {
                    return Err(GarageError::GarageFull {
                        limit: garage.vehicle_limit(),
                    });
                }
                let vehicle =
                    Vehicle::build(kind, self.registry.registrar(), &plate, color, wheels, &field)?;
                let slot = garage.add_vehicle(vehicle)?;
                writeln!(out, "Parked {} in slot {}.", plate, slot)?;
            }
            ShellCommand::Remove(plate) => {
                match self.catalog.current_mut()?.remove_vehicle(&plate) {
                    Some(v) => {
                        self.registry.remove_license_plate(&plate)?;
                        writeln!(out, "Removed {}", v)?;
                    }
                    None => writeln!(out, "No vehicle with license plate {} found.", plate)?,
                }
            }
            ShellCommand::Show(plate) => {
                match self.catalog.current()?.get_vehicle_information(&plate) {
                    Some(info) => writeln!(out, "{}", info)?,
                    None => writeln!(out, "No vehicle with license plate {} found.", plate)?,
                }
            }
            ShellCommand::List => {
                let garage = self.catalog.current()?;
                writeln!(out, "{}", output::numbered(garage.get_all_vehicles_information()))?;
            }
            ShellCommand::Seed => self.seed(out)?,
            ShellCommand::Filter(filter) => {
                let matches = self.catalog.current()?.perform_query(|vehicles| {
                    vehicles
                        .filter(|v| filter.matches(*v))
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                });
                writeln!(out, "{}", output::numbered(matches))?;
            }
            ShellCommand::Count => {
                let counts = self.catalog.current()?.perform_query(|vs| count_by_kind(vs));
                writeln!(out, "{}", output::kind_counts(&counts))?;
            }
            ShellCommand::Status => {
                let id = self.catalog.selected_id().ok_or(GarageError::NoGarageSelected)?;
                writeln!(out, "{}", output::garage_status(id, self.catalog.current()?))?;
            }
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    fn seed<W: Write>(&mut self, out: &mut W) -> Result<(), GarageError> {
        let garage = self.catalog.current_mut()?;
        let before = garage.used_spaces();
        let result = garage.add_sample_vehicles(self.registry.registrar());
        let added = garage.used_spaces() - before;
        match result {
            Ok(_) => writeln!(out, "Seeded {} sample vehicles.", added)?,
            Err(GarageError::GarageFull { limit }) => writeln!(
                out,
                "Seeded {} sample vehicles before the garage filled up ({} spaces).",
                added, limit
            )?,
            Err(e) => {
                writeln!(out, "Seeded {} sample vehicles.", added)?;
                return Err(e);
            }
        }
        Ok(())
    }
}
