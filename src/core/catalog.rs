//! Garage catalog: numbered garages and the one currently selected.

use crate::core::error::GarageError;
use crate::core::store::GarageStore;
use crate::vehicles::{Vehicle, VehicleRecord};
use std::collections::BTreeMap;

pub struct GarageCatalog<T = Vehicle> {
    garages: BTreeMap<usize, GarageStore<T>>,
    selected: Option<usize>,
}

impl<T> Default for GarageCatalog<T> {
    fn default() -> Self {
        Self {
            garages: BTreeMap::new(),
            selected: None,
        }
    }
}

impl<T: VehicleRecord> GarageCatalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a garage and returns its id: 0 for the first, then one past the
    /// highest id in use. Size errors leave the catalog untouched.
    pub fn create_garage(&mut self, size: usize) -> Result<usize, GarageError> {
        let store = GarageStore::new(size)?;
        let id = self
            .garages
            .last_key_value()
            .map(|(id, _)| id + 1)
            .unwrap_or(0);
        self.garages.insert(id, store);
        Ok(id)
    }

    pub fn select(&mut self, id: usize) -> Result<(), GarageError> {
        if !self.garages.contains_key(&id) {
            return Err(GarageError::GarageNotFound(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn selected_id(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Result<&GarageStore<T>, GarageError> {
        let id = self.selected.ok_or(GarageError::NoGarageSelected)?;
        self.garages.get(&id).ok_or(GarageError::GarageNotFound(id))
    }

    pub fn current_mut(&mut self) -> Result<&mut GarageStore<T>, GarageError> {
        let id = self.selected.ok_or(GarageError::NoGarageSelected)?;
        self.garages
            .get_mut(&id)
            .ok_or(GarageError::GarageNotFound(id))
    }

    pub fn get(&self, id: usize) -> Option<&GarageStore<T>> {
        self.garages.get(&id)
    }

    pub fn garages(&self) -> impl Iterator<Item = (usize, &GarageStore<T>)> {
        self.garages.iter().map(|(id, g)| (*id, g))
    }

    pub fn len(&self) -> usize {
        self.garages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.garages.is_empty()
    }
}
