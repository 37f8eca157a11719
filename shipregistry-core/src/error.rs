//! Error types for the ship registry core.

use std::{error::Error, fmt};

use crate::domain::ShipField;

/// Why a request was rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadRequest {
    /// A field required on creation was absent.
    MissingRequiredField,
    /// One or more present fields failed their bound check.
    InvalidFields(Vec<ShipField>),
    /// The identifier is negative or zero.
    InvalidId(String),
    /// The identifier is not an integer.
    IdNotANumber(String),
}

impl fmt::Display for BadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredField => write!(f, "missing required field"),
            Self::InvalidFields(fields) => {
                let labels: Vec<&str> = fields.iter().map(ShipField::label).collect();
                write!(f, "incorrect data params: {}", labels.join(", "))
            }
            Self::InvalidId(raw) => write!(f, "incorrect id: {raw:?}"),
            Self::IdNotANumber(raw) => write!(f, "id isn't a number: {raw:?}"),
        }
    }
}

/// Error type for ship registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed or out-of-range input.
    BadRequest(BadRequest),
    /// A well-formed identifier with no matching record.
    NotFound(i64),
    /// Failure reported by the storage collaborator.
    Storage(String),
}

impl RegistryError {
    /// Whether the error was caused by the caller's input.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Whether the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(reason) => write!(f, "bad request: {reason}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for RegistryError {}

impl From<BadRequest> for RegistryError {
    fn from(value: BadRequest) -> Self {
        Self::BadRequest(value)
    }
}

/// Convenience result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::{BadRequest, RegistryError};
    use crate::domain::ShipField;

    #[test]
    fn invalid_fields_lists_every_label() {
        let error: RegistryError =
            BadRequest::InvalidFields(vec![ShipField::Name, ShipField::Speed]).into();
        assert_eq!(
            format!("{error}"),
            "bad request: incorrect data params: ship's name, ship's speed"
        );
    }

    #[test]
    fn not_found_formats_identifier() {
        let error = RegistryError::NotFound(42);
        assert_eq!(format!("{error}"), "ship 42 not found");
        assert!(error.is_not_found());
        assert!(!error.is_bad_request());
    }

    #[test]
    fn storage_error_formats_message() {
        let error = RegistryError::Storage("connection refused".to_string());
        assert_eq!(format!("{error}"), "storage error: connection refused");
    }
}
