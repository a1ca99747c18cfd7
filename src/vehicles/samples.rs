//! Fixed demo catalog: eight vehicles of each kind, plates ABC111..=ABC150.

use super::{Airplane, Boat, Bus, Car, Color, FuelType, Motorcycle, Vehicle};
use crate::core::error::GarageError;
use self::Extra::{Doors, Engines, Fuel, Seats, Sidecar};
use super::Color::{Blue, Green, Red, Yellow};

pub const SAMPLE_COUNT: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extra {
    Engines(u32),
    Fuel(FuelType),
    Doors(u32),
    Seats(u32),
    Sidecar(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub plate: &'static str,
    pub color: Color,
    pub wheels: u32,
    extra: Extra,
}

const fn sample(plate: &'static str, color: Color, wheels: u32, extra: Extra) -> Sample {
    Sample {
        plate,
        color,
        wheels,
        extra,
    }
}

pub const SAMPLES: [Sample; SAMPLE_COUNT] = [
    sample("ABC111", Red, 4, Engines(2)),
    sample("ABC112", Blue, 6, Engines(4)),
    sample("ABC113", Green, 8, Engines(4)),
    sample("ABC114", Yellow, 6, Engines(2)),
    sample("ABC115", Red, 8, Engines(1)),
    sample("ABC116", Blue, 12, Engines(1)),
    sample("ABC117", Green, 6, Engines(3)),
    sample("ABC118", Red, 9, Engines(3)),
    sample("ABC119", Red, 0, Fuel(FuelType::Diesel)),
    sample("ABC120", Green, 0, Fuel(FuelType::Gasoline)),
    sample("ABC121", Blue, 0, Fuel(FuelType::Gasoline)),
    sample("ABC122", Yellow, 0, Fuel(FuelType::Electric)),
    sample("ABC123", Blue, 0, Fuel(FuelType::None)),
    sample("ABC124", Red, 0, Fuel(FuelType::None)),
    sample("ABC125", Green, 0, Fuel(FuelType::Diesel)),
    sample("ABC126", Green, 0, Fuel(FuelType::Gasoline)),
    sample("ABC127", Green, 4, Doors(1)),
    sample("ABC128", Red, 6, Doors(2)),
    sample("ABC129", Red, 6, Doors(2)),
    sample("ABC130", Green, 4, Doors(1)),
    sample("ABC131", Blue, 8, Doors(2)),
    sample("ABC132", Blue, 4, Doors(2)),
    sample("ABC133", Yellow, 12, Doors(2)),
    sample("ABC134", Yellow, 12, Doors(2)),
    sample("ABC135", Red, 4, Seats(5)),
    sample("ABC136", Red, 4, Seats(6)),
    sample("ABC137", Green, 4, Seats(6)),
    sample("ABC138", Blue, 4, Seats(7)),
    sample("ABC139", Blue, 4, Seats(7)),
    sample("ABC140", Yellow, 4, Seats(2)),
    sample("ABC141", Yellow, 4, Seats(2)),
    sample("ABC142", Green, 4, Seats(5)),
    sample("ABC143", Red, 2, Sidecar(false)),
    sample("ABC144", Red, 2, Sidecar(false)),
    sample("ABC145", Green, 2, Sidecar(false)),
    sample("ABC146", Blue, 2, Sidecar(false)),
    sample("ABC147", Blue, 2, Sidecar(true)),
    sample("ABC148", Yellow, 2, Sidecar(true)),
    sample("ABC149", Yellow, 2, Sidecar(true)),
    sample("ABC150", Green, 2, Sidecar(true)),
];

impl Sample {
    pub fn build<V>(&self, validator: V) -> Result<Vehicle, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let (plate, color, wheels) = (self.plate, self.color, self.wheels);
        let vehicle = match self.extra {
            Engines(n) => Airplane::new(validator, plate, color, wheels, n)?.into(),
            Fuel(fuel) => Boat::new(validator, plate, color, wheels, fuel)?.into(),
            Doors(n) => Bus::new(validator, plate, color, wheels, n)?.into(),
            Seats(n) => Car::new(validator, plate, color, wheels, n)?.into(),
            Sidecar(s) => Motorcycle::new(validator, plate, color, wheels, s)?.into(),
        };
        Ok(vehicle)
    }
}

/// Builds the whole catalog in order, running every plate through `validator`.
/// Stops at the first rejected vehicle.
pub fn sample_vehicles<V>(mut validator: V) -> Result<Vec<Vehicle>, GarageError>
where
    V: FnMut(&str) -> Result<(), GarageError>,
{
    SAMPLES.iter().map(|s| s.build(&mut validator)).collect()
}
