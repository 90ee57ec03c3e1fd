use std::fmt::{self, Debug, Display};
use std::io;

use crate::population::PersonId;

/// Provides `SimError` and maps other errors to
/// convert to a `SimError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SimError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// A fraction, probability, threshold, size or dimension was outside its domain.
    InvalidParameter(String),
    CannotMakeEdgeToSelf,
    DuplicateEdge,
    UnknownPerson(PersonId),
    ReportError(String),
    SimError(String),
}

impl SimError {
    pub(crate) fn invalid_parameter(name: &str, value: impl Display, expected: &str) -> Self {
        SimError::InvalidParameter(format!("{name} must be {expected}, got {value}"))
    }
}

impl From<io::Error> for SimError {
    fn from(error: io::Error) -> Self {
        SimError::IoError(error)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(error: serde_json::Error) -> Self {
        SimError::JsonError(error)
    }
}

impl From<csv::Error> for SimError {
    fn from(error: csv::Error) -> Self {
        SimError::CSVError(error)
    }
}

impl From<String> for SimError {
    fn from(error: String) -> Self {
        SimError::SimError(error)
    }
}

impl From<&str> for SimError {
    fn from(error: &str) -> Self {
        SimError::SimError(error.to_string())
    }
}

impl std::error::Error for SimError {}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::InvalidParameter(message) => write!(f, "Invalid parameter: {message}"),
            SimError::UnknownPerson(person_id) => write!(f, "Unknown person: {person_id}"),
            _ => write!(f, "Error: {self:?}"),
        }
    }
}

/// Checks that `value` is a finite number in `[0, 1]`.
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(name, value, "in [0, 1]"))
    }
}

/// Checks that `value` is finite and not negative.
pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(name, value, "finite and non-negative"))
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(name, value, "finite and positive"))
    }
}
