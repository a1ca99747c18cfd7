//! Garage storage engine.
//!
//! A `GarageStore` is a slot table sized to a power of two. Two numbers bound it:
//!
//! - `capacity`: physical slot count, `next_pow2_capacity(size)`.
//! - `vehicle_limit`: the size the caller asked for. `add_vehicle` refuses once
//!   `used_spaces` reaches it, whatever the physical capacity.
//!
//! Inserts append at index `used_spaces`. After an interior removal that index may
//! already hold a vehicle; the insert then takes the first empty slot found by a
//! linear scan. Removed slots are reused without compaction, so slot order is
//! stable and an insert after removals is O(capacity) in the worst case.

use crate::core::error::GarageError;
use crate::vehicles::samples::SAMPLES;
use crate::vehicles::{Vehicle, VehicleRecord};
use std::iter::Flatten;
use std::slice;

pub const GARAGE_SIZE_MIN: usize = 1;
/// 2^19
pub const GARAGE_SIZE_MAX: usize = 524_288;
pub const MIN_CAPACITY: usize = 4;

/// Slot count for a requested garage size: 4 for sizes up to 4, otherwise the
/// smallest power of two >= `size`, capped at [`GARAGE_SIZE_MAX`].
pub fn next_pow2_capacity(size: usize) -> usize {
    size.max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .unwrap_or(GARAGE_SIZE_MAX)
        .min(GARAGE_SIZE_MAX)
}

pub fn check_garage_size(size: usize) -> Result<usize, GarageError> {
    if (GARAGE_SIZE_MIN..=GARAGE_SIZE_MAX).contains(&size) {
        Ok(size)
    } else {
        Err(GarageError::GarageSize {
            size,
            min: GARAGE_SIZE_MIN,
            max: GARAGE_SIZE_MAX,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GarageStore<T> {
    slots: Vec<Option<T>>,
    vehicle_limit: usize,
    used_spaces: usize,
}

impl<T: VehicleRecord> GarageStore<T> {
    pub fn new(size: usize) -> Result<Self, GarageError> {
        let size = check_garage_size(size)?;
        let capacity = next_pow2_capacity(size);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots,
            vehicle_limit: size,
            used_spaces: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn vehicle_limit(&self) -> usize {
        self.vehicle_limit
    }

    pub fn used_spaces(&self) -> usize {
        self.used_spaces
    }

    pub fn free_spaces(&self) -> usize {
        self.vehicle_limit - self.used_spaces
    }

    pub fn is_full(&self) -> bool {
        self.used_spaces == self.vehicle_limit
    }

    pub fn is_empty(&self) -> bool {
        self.used_spaces == 0
    }

    /// Stores `vehicle` and returns the slot index it landed in.
    ///
    /// Fails with [`GarageError::GarageFull`] once `vehicle_limit` vehicles are
    /// stored; the garage is unchanged in that case.
    pub fn add_vehicle(&mut self, vehicle: T) -> Result<usize, GarageError> {
        if self.is_full() {
            return Err(GarageError::GarageFull {
                limit: self.vehicle_limit,
            });
        }

        let mut index = self.used_spaces;
        if self.slots.get(index).is_some_and(Option::is_some) {
            index = self
                .slots
                .iter()
                .position(Option::is_none)
                .unwrap_or(self.slots.len());
        }

        self.ensure_capacity(index + 1);
        let slot = self.slots.get_mut(index).ok_or(GarageError::GarageFull {
            limit: self.vehicle_limit,
        })?;
        *slot = Some(vehicle);
        self.used_spaces += 1;
        Ok(index)
    }

    /// Grows the slot table to `next_pow2_capacity(required)` when it is
    /// smaller. Never shrinks; existing slots keep their positions.
    fn ensure_capacity(&mut self, required: usize) {
        let target = next_pow2_capacity(required);
        if target > self.slots.len() {
            self.slots.resize_with(target, || None);
        }
    }

    /// Takes out the first vehicle whose plate matches, ignoring case.
    /// `None` is a plain miss, not an error.
    pub fn remove_vehicle(&mut self, plate: &str) -> Option<T> {
        let index = self.slot_of(plate)?;
        let removed = self.slots[index].take();
        if removed.is_some() {
            self.used_spaces -= 1;
        }
        removed
    }

    pub fn find(&self, plate: &str) -> Option<&T> {
        self.iter().find(|v| v.has_plate(plate))
    }

    /// Slot index holding `plate`, if any.
    pub fn slot_of(&self, plate: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|v| v.has_plate(plate)))
    }

    pub fn get_vehicle_information(&self, plate: &str) -> Option<String> {
        self.find(plate).map(|v| v.describe())
    }

    /// Display strings of every stored vehicle in slot order. Each call walks
    /// the slots afresh.
    pub fn get_all_vehicles_information(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|v| v.describe())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter().flatten(),
        }
    }

    /// Hands the stored vehicles to `query` without exposing slot layout.
    pub fn perform_query<'a, R, F>(&'a self, query: F) -> R
    where
        F: FnOnce(Iter<'a, T>) -> R,
    {
        query(self.iter())
    }
}

impl<T: VehicleRecord + From<Vehicle>> GarageStore<T> {
    /// Seeds the fixed 40-vehicle catalog, running each plate through `validator`.
    ///
    /// Vehicles go in one at a time: a full garage stops the seeding before the
    /// next plate is validated, and a rejected plate stops it before the vehicle
    /// is stored. Returns the number of vehicles added.
    pub fn add_sample_vehicles<V>(&mut self, mut validator: V) -> Result<usize, GarageError>
    where
        V: FnMut(&str) -> Result<(), GarageError>,
    {
        let mut added = 0;
        for sample in SAMPLES.iter() {
            if self.is_full() {
                return Err(GarageError::GarageFull {
                    limit: self.vehicle_limit,
                });
            }
            let vehicle = sample.build(&mut validator)?;
            self.add_vehicle(T::from(vehicle))?;
            added += 1;
        }
        Ok(added)
    }
}

/// Stored vehicles in slot order, empty slots skipped.
pub struct Iter<'a, T> {
    inner: Flatten<slice::Iter<'a, Option<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, T: VehicleRecord> IntoIterator for &'a GarageStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
