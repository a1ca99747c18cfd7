//! License plate registry: the single authority on plate syntax and uniqueness.
//!
//! The registry owns the set of accepted plates and persists it through a
//! [`PlateStore`] after every mutation. Plates are compared case-insensitively;
//! the set stores the upper-cased form.
//!
//! Validation and registration are separate operations. [`is_valid_license_plate`]
//! never mutates; [`register_license_plate`] validates and then records. Call sites
//! that want "accept and reserve" compose them through [`LicensePlateRegistry::registrar`].
//!
//! [`is_valid_license_plate`]: LicensePlateRegistry::is_valid_license_plate
//! [`register_license_plate`]: LicensePlateRegistry::register_license_plate

use crate::core::audit::AuditLog;
use crate::core::error::GarageError;
use regex::Regex;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const PLATE_LEN: usize = 6;
pub const DEFAULT_PLATES_FILE: &str = "licensePlates.json";

fn plate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").unwrap_or_else(|e| panic!("plate regex: {e}"))
    })
}

/// Syntax-only plate check: non-blank, six characters, three letters then three digits.
///
/// Usable directly as a vehicle plate validator when uniqueness is not wanted.
pub fn validate_plate_format(plate: &str) -> Result<(), GarageError> {
    if plate.trim().is_empty() {
        return Err(GarageError::PlateMissing);
    }
    if plate.chars().count() != PLATE_LEN {
        return Err(GarageError::PlateLength(plate.to_string()));
    }
    if !plate_pattern().is_match(plate) {
        return Err(GarageError::PlateFormat(plate.to_string()));
    }
    Ok(())
}

/// Canonical form used as the set key.
pub fn normalize_plate(plate: &str) -> String {
    plate.to_ascii_uppercase()
}

/// Key-value sink holding the serialized plate set.
pub trait PlateStore {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<BTreeSet<String>>, GarageError>;
    fn save(&self, plates: &BTreeSet<String>) -> Result<(), GarageError>;
    fn audit_log(&self) -> Option<AuditLog> {
        None
    }
}

/// Plate set stored as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePlateStore {
    path: PathBuf,
    audit: bool,
}

impl JsonFilePlateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            audit: true,
        }
    }

    pub fn without_audit(mut self) -> Self {
        self.audit = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlateStore for JsonFilePlateStore {
    fn load(&self) -> Result<Option<BTreeSet<String>>, GarageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Some(BTreeSet::new()));
        }
        let plates: Vec<String> = serde_json::from_str(&content)?;
        Ok(Some(plates.iter().map(|p| normalize_plate(p)).collect()))
    }

    fn save(&self, plates: &BTreeSet<String>) -> Result<(), GarageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(plates)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn audit_log(&self) -> Option<AuditLog> {
        self.audit.then(|| AuditLog::beside(&self.path))
    }
}

/// In-process store for demos and tests. Nothing touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryPlateStore {
    saved: RefCell<Option<BTreeSet<String>>>,
    saves: RefCell<usize>,
}

impl MemoryPlateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded<I, P>(plates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let set = plates.into_iter().map(|p| normalize_plate(p.as_ref())).collect();
        Self {
            saved: RefCell::new(Some(set)),
            saves: RefCell::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<BTreeSet<String>> {
        self.saved.borrow().clone()
    }

    /// Number of full-set rewrites performed so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl PlateStore for MemoryPlateStore {
    fn load(&self) -> Result<Option<BTreeSet<String>>, GarageError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, plates: &BTreeSet<String>) -> Result<(), GarageError> {
        *self.saved.borrow_mut() = Some(plates.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

pub struct LicensePlateRegistry<S: PlateStore = JsonFilePlateStore> {
    store: S,
    audit: Option<AuditLog>,
    audit_failures: usize,
    plates: BTreeSet<String>,
}

impl LicensePlateRegistry<JsonFilePlateStore> {
    /// Opens the registry at `path`, or at [`DEFAULT_PLATES_FILE`] when `None`.
    pub fn open_file(path: Option<&Path>) -> Result<Self, GarageError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLATES_FILE));
        Self::open(JsonFilePlateStore::new(path))
    }
}

impl<S: PlateStore> LicensePlateRegistry<S> {
    /// Loads the persisted set. A store with nothing saved yet starts empty and
    /// is written immediately.
    pub fn open(store: S) -> Result<Self, GarageError> {
        let audit = store.audit_log();
        let plates = match store.load()? {
            Some(plates) => plates,
            None => {
                let empty = BTreeSet::new();
                store.save(&empty)?;
                empty
            }
        };
        Ok(Self {
            store,
            audit,
            audit_failures: 0,
            plates,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    pub fn contains(&self, plate: &str) -> bool {
        self.plates.contains(&normalize_plate(plate))
    }

    /// Registered plates in sorted, upper-cased form.
    pub fn plates(&self) -> impl Iterator<Item = &str> {
        self.plates.iter().map(String::as_str)
    }

    pub fn is_unique_license_plate(&self, plate: &str) -> Result<(), GarageError> {
        if self.contains(plate) {
            return Err(GarageError::PlateDuplicate(plate.to_string()));
        }
        Ok(())
    }

    /// Format and uniqueness check. Does not register.
    pub fn is_valid_license_plate(&self, plate: &str) -> Result<bool, GarageError> {
        validate_plate_format(plate)?;
        self.is_unique_license_plate(plate)?;
        Ok(true)
    }

    /// Validates `plate` and records it. On failure the set is left as it was,
    /// and the error returned is the validation or storage error.
    pub fn register_license_plate(&mut self, plate: &str) -> Result<(), GarageError> {
        if let Err(e) = self.is_valid_license_plate(plate) {
            self.audit("plates.register", Some(plate), false);
            return Err(e);
        }

        let key = normalize_plate(plate);
        self.plates.insert(key.clone());
        if let Err(e) = self.store.save(&self.plates) {
            self.plates.remove(&key);
            return Err(e);
        }
        self.audit("plates.register", Some(&key), true);
        Ok(())
    }

    /// Removes `plate` if present. Returns whether it was registered.
    pub fn remove_license_plate(&mut self, plate: &str) -> Result<bool, GarageError> {
        let key = normalize_plate(plate);
        let removed = self.plates.remove(&key);
        if let Err(e) = self.store.save(&self.plates) {
            if removed {
                self.plates.insert(key);
            }
            return Err(e);
        }
        self.audit("plates.remove", Some(&key), removed);
        Ok(removed)
    }

    pub fn clear_all_license_plates(&mut self) -> Result<(), GarageError> {
        let previous = std::mem::take(&mut self.plates);
        if let Err(e) = self.store.save(&self.plates) {
            self.plates = previous;
            return Err(e);
        }
        self.audit("plates.clear", None, true);
        Ok(())
    }

    /// A registering validator for vehicle construction: each accepted plate is
    /// reserved in this registry.
    pub fn registrar(&mut self) -> impl FnMut(&str) -> Result<(), GarageError> + '_ {
        move |plate| self.register_license_plate(plate)
    }

    /// Ledger lines that could not be written. The plate set never depends on
    /// the ledger, so a failed append is counted instead of returned.
    pub fn audit_failures(&self) -> usize {
        self.audit_failures
    }

    fn audit(&mut self, op: &str, plate: Option<&str>, ok: bool) {
        let written = match &self.audit {
            Some(log) => log.record(op, plate, ok),
            None => Ok(()),
        };
        if written.is_err() {
            self.audit_failures += 1;
        }
    }
}
