use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GarageError {
    #[error("A license plate value must be provided.")]
    PlateMissing,
    #[error("License plate '{0}' must contain exactly six characters.")]
    PlateLength(String),
    #[error("License plate '{0}' must be three letters followed by three digits (aaa123 or AAA123).")]
    PlateFormat(String),
    #[error("License plate '{0}' already exists.")]
    PlateDuplicate(String),
    #[error("{field} must be within the range of {min} - {max} (got {value}).")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("Garage size must be within the range of {min} - {max} (got {size}).")]
    GarageSize { size: usize, min: usize, max: usize },
    #[error("Garage is full ({limit} of {limit} spaces used).")]
    GarageFull { limit: usize },
    #[error("Garage {0} does not exist.")]
    GarageNotFound(usize),
    #[error("No garage selected.")]
    NoGarageSelected,
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl GarageError {
    /// Input-level failures the console can re-prompt on. Storage and config
    /// failures are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            GarageError::IoError(_) | GarageError::JsonError(_) | GarageError::ConfigError(_)
        )
    }
}
