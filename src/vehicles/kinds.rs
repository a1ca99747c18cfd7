use super::{
    Color, DOORS, ENGINES, FuelType, SEATS, VehicleBase, VehicleKind, VehicleRecord, check_range,
};
use crate::core::error::GarageError;
use serde::Serialize;
use std::fmt;

macro_rules! delegate_base {
    ($ty:ident, $kind:expr) => {
        impl VehicleRecord for $ty {
            fn plate(&self) -> &str {
                self.base.plate()
            }

            fn color(&self) -> Color {
                self.base.color()
            }

            fn wheels(&self) -> u32 {
                self.base.wheels()
            }

            fn kind(&self) -> VehicleKind {
                $kind
            }
        }
    };
}

fn write_common(f: &mut fmt::Formatter<'_>, kind: VehicleKind, base: &VehicleBase) -> fmt::Result {
    write!(
        f,
        "{}: License plate: {}, Color: {}, Wheels: {}",
        kind,
        base.plate(),
        base.color(),
        base.wheels()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Airplane {
    #[serde(flatten)]
    base: VehicleBase,
    engines: u32,
}

impl Airplane {
    pub fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        engines: u32,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let engines = check_range("Number of engines", engines, ENGINES)?;
        Ok(Self {
            base: VehicleBase::new(validator, plate, color, wheels)?,
            engines,
        })
    }

    pub fn engines(&self) -> u32 {
        self.engines
    }
}

delegate_base!(Airplane, VehicleKind::Airplane);

impl fmt::Display for Airplane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_common(f, VehicleKind::Airplane, &self.base)?;
        write!(f, ", Engines: {}", self.engines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Boat {
    #[serde(flatten)]
    base: VehicleBase,
    fuel_type: FuelType,
}

impl Boat {
    pub fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        fuel_type: FuelType,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        Ok(Self {
            base: VehicleBase::new(validator, plate, color, wheels)?,
            fuel_type,
        })
    }

    pub fn fuel_type(&self) -> FuelType {
        self.fuel_type
    }
}

delegate_base!(Boat, VehicleKind::Boat);

impl fmt::Display for Boat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_common(f, VehicleKind::Boat, &self.base)?;
        write!(f, ", Fuel type: {}", self.fuel_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bus {
    #[serde(flatten)]
    base: VehicleBase,
    doors: u32,
}

impl Bus {
    pub fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        doors: u32,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let doors = check_range("Number of doors", doors, DOORS)?;
        Ok(Self {
            base: VehicleBase::new(validator, plate, color, wheels)?,
            doors,
        })
    }

    pub fn doors(&self) -> u32 {
        self.doors
    }
}

delegate_base!(Bus, VehicleKind::Bus);

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_common(f, VehicleKind::Bus, &self.base)?;
        write!(f, ", Doors: {}", self.doors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    #[serde(flatten)]
    base: VehicleBase,
    seats: u32,
}

impl Car {
    pub fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        seats: u32,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        let seats = check_range("Number of seats", seats, SEATS)?;
        Ok(Self {
            base: VehicleBase::new(validator, plate, color, wheels)?,
            seats,
        })
    }

    pub fn seats(&self) -> u32 {
        self.seats
    }
}

delegate_base!(Car, VehicleKind::Car);

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_common(f, VehicleKind::Car, &self.base)?;
        write!(f, ", Seats: {}", self.seats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Motorcycle {
    #[serde(flatten)]
    base: VehicleBase,
    has_sidecar: bool,
}

impl Motorcycle {
    pub fn new<V>(
        validator: V,
        plate: &str,
        color: Color,
        wheels: u32,
        has_sidecar: bool,
    ) -> Result<Self, GarageError>
    where
        V: FnOnce(&str) -> Result<(), GarageError>,
    {
        Ok(Self {
            base: VehicleBase::new(validator, plate, color, wheels)?,
            has_sidecar,
        })
    }

    pub fn has_sidecar(&self) -> bool {
        self.has_sidecar
    }
}

delegate_base!(Motorcycle, VehicleKind::Motorcycle);

impl fmt::Display for Motorcycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_common(f, VehicleKind::Motorcycle, &self.base)?;
        write!(
            f,
            ", Sidecar: {}",
            if self.has_sidecar { "yes" } else { "no" }
        )
    }
}
