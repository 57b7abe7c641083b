// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard_domain::{DayOffWarning, DomainError, StoreId};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Self-registration is closed for the store.
    RegistrationClosed {
        /// The store whose gate is closed.
        store_id: StoreId,
    },
    /// A referenced record does not exist.
    NotFound {
        /// The kind of record (e.g., "registration", "employee").
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// The caller may not act on the record.
    Forbidden {
        /// Why the action was refused.
        reason: String,
    },
    /// The submission produced warnings that must be confirmed.
    ConfirmationRequired {
        /// The unconfirmed warnings.
        warnings: Vec<DayOffWarning>,
    },
    /// The published slot changed since the caller last saw it.
    Conflict {
        /// The version the caller expected.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },
    /// The draft scratch store failed.
    ScratchStorage(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::RegistrationClosed { store_id } => {
                write!(f, "Registration is closed for store '{store_id}'")
            }
            Self::NotFound { kind, id } => write!(f, "{kind} '{id}' not found"),
            Self::Forbidden { reason } => write!(f, "Forbidden: {reason}"),
            Self::ConfirmationRequired { warnings } => {
                write!(
                    f,
                    "{} day-off warning(s) must be confirmed before saving",
                    warnings.len()
                )
            }
            Self::Conflict { expected, actual } => {
                write!(
                    f,
                    "Schedule was published by someone else (expected version {expected}, found {actual})"
                )
            }
            Self::ScratchStorage(msg) => write!(f, "Draft storage error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
