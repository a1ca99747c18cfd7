//! Vehicle model.
//!
//! Every kind shares a plate, a color and a wheel count ([`VehicleBase`]) and adds one
//! field of its own. [`VehicleRecord`] is the capability set the garage relies on;
//! [`Vehicle`] is the tagged union stored in mixed garages.
//!
//! Construction is the only validation boundary. Range checks run first, then the
//! injected plate validator runs exactly once. Nothing escapes a failed construction.

pub mod filter;
pub mod kinds;
pub mod samples;

pub use kinds::{Airplane, Boat, Bus, Car, Motorcycle};

use crate::core::error::GarageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const WHEELS: RangeInclusive<u32> = 0..=56;
pub const ENGINES: RangeInclusive<u32> = 0..=10;
pub const DOORS: RangeInclusive<u32> = 1..=2;
pub const SEATS: RangeInclusive<u32> = 0..=7;

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<u32, GarageError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(GarageError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    None,
    Diesel,
    Gasoline,
    Electric,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::None,
        FuelType::Diesel,
        FuelType::Gasoline,
        FuelType::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::None => "None",
            FuelType::Diesel => "Diesel",
            FuelType::Gasoline => "Gasoline",
            FuelType::Electric => "Electric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleKind {
    Airplane,
    Boat,
    Bus,
    Car,
    Motorcycle,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 5] = [
        VehicleKind::Airplane,
        VehicleKind::Boat,
        VehicleKind::Bus,
        VehicleKind::Car,
        VehicleKind::Motorcycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Airplane => "Airplane",
            VehicleKind::Boat => "Boat",
            VehicleKind::Bus => "Bus",
            VehicleKind::Car => "Car",
            VehicleKind::Motorcycle => "Motorcycle",
        }
    }

    /// Console menu numbering, 1-based in declaration order.
    pub fn menu_number(&self) -> u32 {
        match self {
            VehicleKind::Airplane => 1,
            VehicleKind::Boat => 2,
            VehicleKind::Bus => 3,
            VehicleKind::Car => 4,
            VehicleKind::Motorcycle => 5,
        }
    }

    pub fn from_menu_number(n: u32) -> Option<VehicleKind> {
        VehicleKind::ALL.into_iter().find(|k| k.menu_number() == n)
    }

    /// Name of the kind-specific field, in prompt order after plate, color and wheels.
    pub fn field_name(&self) -> &'static str {
        match self {
            VehicleKind::Airplane => "engines",
            VehicleKind::Boat => "fuel",
            VehicleKind::Bus => "doors",
            VehicleKind::Car => "seats",
            VehicleKind::Motorcycle => "sidecar",
        }
    }
}

fn parse_named<T: Copy>(
    what: &str,
    input: &str,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
) -> Result<T, GarageError> {
    all.iter()
        .copied()
        .find(|v| name(v).eq_ignore_ascii_case(input.trim()))
        .ok_or_else(|| {
            let options = all.iter().map(|v| name(v)).collect::<Vec<_>>().join(", ");
            GarageError::ValidationError(format!(
                "unknown {} '{}' (expected one of: {})",
                what, input, options
            ))
        })
}

impl FromStr for Color {
    type Err = GarageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("color", s, &Color::ALL, Color::as_str)
    }
}

impl FromStr for FuelType {
    type Err = GarageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("fuel type", s, &FuelType::ALL, FuelType::as_str)
    }
}

impl FromStr for VehicleKind {
    type Err = GarageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = s
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(VehicleKind::from_menu_number)
        {
            return Ok(kind);
        }
        parse_named("vehicle kind", s, &VehicleKind::ALL, VehicleKind::as_str)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a garage needs from anything it stores.
pub trait VehicleRecord: fmt::Display {
    fn plate(&self) -> &str;
    fn color(&self) -> Color;
    fn wheels(&self) -> u32;
    fn kind(&self) -> VehicleKind;

    fn describe(&self) -> String {
        self.to_string()
    }

    fn has_plate(&self, plate: &str) -> bool {
        self.plate().eq_ignore_ascii_case(plate)
    }
}

/// Attributes common to every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleBase {
    plate: String,
    color: Color,
    wheels: u32,
}

impl VehicleBase {
    pub(crate) fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let wheels = check_range("Wheels", wheels, WHEELS)?;
        validator(plate)?;
        Ok(Self {
            plate: plate.to_string(),
            color,
            wheels,
        })
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn wheels(&self) -> u32 {
        self.wheels
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Vehicle {
    Airplane(Airplane),
    Boat(Boat),
    Bus(Bus),
    Car(Car),
    Motorcycle(Motorcycle),
}

impl Vehicle {
    fn record(&self) -> &dyn VehicleRecord {
        match self {
            Vehicle::Airplane(v) => v,
            Vehicle::Boat(v) => v,
            Vehicle::Bus(v) => v,
            Vehicle::Car(v) => v,
            Vehicle::Motorcycle(v) => v,
        }
    }

    /// Builds a vehicle from console tokens. `field` is the kind-specific value
    /// named by [`VehicleKind::field_name`].
    pub fn build<V>(
        kind: VehicleKind,
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        field: &str,
    ) -> Result<Vehicle, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let field = field.trim();
        let vehicle = match kind {
            VehicleKind::Airplane => {
                let engines = parse_count(kind, field)?;
                Airplane::new(validator, plate, color, wheels, engines)?.into()
            }
            VehicleKind::Boat => {
                let fuel: FuelType = field.parse()?;
                Boat::new(validator, plate, color, wheels, fuel)?.into()
            }
            VehicleKind::Bus => {
                let doors = parse_count(kind, field)?;
                Bus::new(validator, plate, color, wheels, doors)?.into()
            }
            VehicleKind::Car => {
                let seats = parse_count(kind, field)?;
                Car::new(validator, plate, color, wheels, seats)?.into()
            }
            VehicleKind::Motorcycle => {
                let sidecar = parse_yes_no(field)?;
                Motorcycle::new(validator, plate, color, wheels, sidecar)?.into()
            }
        };
        Ok(vehicle)
    }
}

fn parse_count(kind: VehicleKind, field: &str) -> Result<u32, GarageError> {
    field.parse::<u32>().map_err(|_| {
        GarageError::ValidationError(format!(
            "{} must be a non-negative number (got '{}')",
            kind.field_name(),
            field
        ))
    })
}

pub(crate) fn parse_yes_no(field: &str) -> Result<bool, GarageError> {
    match field.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(GarageError::ValidationError(format!(
            "expected yes or no (got '{}')",
            other
        ))),
    }
}

impl VehicleRecord for Vehicle {
    fn plate(&self) -> &str {
        self.record().plate()
    }

    fn color(&self) -> Color {
        self.record().color()
    }

    fn wheels(&self) -> u32 {
        self.record().wheels()
    }

    fn kind(&self) -> VehicleKind {
        self.record().kind()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.record(), f)
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for Vehicle {
                fn from(v: $kind) -> Self {
                    Vehicle::$kind(v)
                }
            }
        )*
    };
}

impl_from_kind!(Airplane, Boat, Bus, Car, Motorcycle);
