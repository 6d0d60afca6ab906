//! Ledger error model.

use std::fmt;

use thiserror::Error;

/// Result type used by the domain and session layers.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Kind of entity referenced by a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A business in the catalog.
    Business,
    /// A ware owned by a business.
    Ware,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Business => f.write_str("Business"),
            EntityKind::Ware => f.write_str("Ware"),
        }
    }
}

/// Failures reported back to the user. None of them end a session.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced business or ware does not exist.
    #[error("{kind} '{name}' does not exist.")]
    NotFound {
        /// What was being looked up.
        kind: EntityKind,
        /// Name used for the lookup.
        name: String,
    },

    /// A sale asked for more units than are on hand.
    #[error("Not enough stock of {ware} to sell ({requested} requested, {available} available).")]
    InsufficientStock {
        /// Ware being sold.
        ware: String,
        /// Units requested.
        requested: u32,
        /// Units on hand (0 when the ware is unknown).
        available: u32,
    },

    /// Unrecognized command or malformed entry.
    #[error("Invalid input, please try again: {0}")]
    InvalidInput(String),

    /// Well-formed value outside its allowed range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A business with the same name is already in the catalog.
    #[error("Business '{0}' already exists.")]
    AlreadyExists(String),

    /// Persisting the catalog failed.
    #[error("Failed to save catalog: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl LedgerError {
    /// Lookup failure for a business name.
    pub fn business_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Business,
            name: name.into(),
        }
    }

    /// Lookup failure for a ware name.
    pub fn ware_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Ware,
            name: name.into(),
        }
    }

    /// Malformed or unrecognized entry.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Out-of-range value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let err = LedgerError::ware_not_found("Apple");
        assert_eq!(err.to_string(), "Ware 'Apple' does not exist.");

        let err = LedgerError::business_not_found("Shop");
        assert_eq!(err.to_string(), "Business 'Shop' does not exist.");

        let err = LedgerError::InsufficientStock {
            ware: "Apple".to_string(),
            requested: 100,
            available: 6,
        };
        assert!(err.to_string().starts_with("Not enough stock of Apple"));
    }
}
