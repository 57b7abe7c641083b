// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftboard::CoreError;
use shiftboard_domain::DomainError;
use shiftboard_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires the {required_permission} permission"
                )
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: String,
    },
    /// The actor may not act on the record.
    Forbidden {
        /// Why the action was refused.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The requested shift is full.
    CapacityExceeded {
        /// A human-readable description including `occupied/capacity`.
        message: String,
    },
    /// Self-registration is closed for the store.
    RegistrationClosed {
        /// The store whose gate is closed.
        store_id: String,
    },
    /// The submission has warnings that must be confirmed first.
    ConfirmationRequired {
        /// The warnings, one message each.
        warnings: Vec<String>,
    },
    /// The schedule slot was published by someone else in the meantime.
    Conflict {
        /// The version the caller expected.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires the {required_permission} permission"
                )
            }
            Self::Forbidden { reason } => write!(f, "Forbidden: {reason}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::CapacityExceeded { message } => write!(f, "Capacity exceeded: {message}"),
            Self::RegistrationClosed { store_id } => {
                write!(f, "Registration is closed for store '{store_id}'")
            }
            Self::ConfirmationRequired { warnings } => {
                write!(f, "Confirmation required: {}", warnings.join("; "))
            }
            Self::Conflict { expected, actual } => {
                write!(
                    f,
                    "Schedule was published by someone else (expected version {expected}, found {actual})"
                )
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_permission,
            } => Self::Unauthorized {
                action,
                required_permission,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidIdentifier { kind } => ApiError::InvalidInput {
            field: format!("{kind}_id"),
            message,
        },
        DomainError::InvalidEmployeeType(_) => ApiError::InvalidInput {
            field: String::from("employee_type"),
            message,
        },
        DomainError::InvalidRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message,
        },
        DomainError::InvalidEntryOrigin(_) => ApiError::InvalidInput {
            field: String::from("origin"),
            message,
        },
        DomainError::InvalidWeekStart { .. } => ApiError::InvalidInput {
            field: String::from("week_start"),
            message,
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidTimezone(_) | DomainError::InvalidScheduleTime { .. } => {
            ApiError::InvalidInput {
                field: String::from("registration_schedule"),
                message,
            }
        }
        DomainError::CapacityExceeded { .. } => ApiError::CapacityExceeded { message },
        DomainError::DateOutsideWeek { .. } => ApiError::DomainRuleViolation {
            rule: String::from("date_outside_week"),
            message,
        },
        DomainError::MultipleShiftsOnDay { .. } => ApiError::DomainRuleViolation {
            rule: String::from("one_shift_per_day"),
            message,
        },
        DomainError::NoWorkingDays => ApiError::DomainRuleViolation {
            rule: String::from("no_working_days"),
            message,
        },
        DomainError::MissingDayOff | DomainError::TooManyDaysOff { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("exactly_one_day_off"),
                message,
            }
        }
        DomainError::WeekendDayOff { .. } => ApiError::DomainRuleViolation {
            rule: String::from("weekday_day_off"),
            message,
        },
        DomainError::UnknownShift(_) => ApiError::DomainRuleViolation {
            rule: String::from("unknown_shift"),
            message,
        },
        DomainError::UnknownCounter(_) => ApiError::DomainRuleViolation {
            rule: String::from("unknown_counter"),
            message,
        },
        DomainError::DuplicateCounterAssignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("one_counter_per_employee"),
            message,
        },
        DomainError::ManagerFlagWithoutAssignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("manager_flag_subset"),
            message,
        },
        DomainError::EmployeeNotInCounter { .. } => ApiError::DomainRuleViolation {
            rule: String::from("employee_not_in_counter"),
            message,
        },
        DomainError::DateArithmeticOverflow { .. } => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::RegistrationClosed { store_id } => ApiError::RegistrationClosed {
            store_id: store_id.to_string(),
        },
        CoreError::NotFound { kind, id } => ApiError::ResourceNotFound {
            resource_type: kind.to_string(),
            message: format!("{kind} '{id}' does not exist"),
        },
        CoreError::Forbidden { reason } => ApiError::Forbidden { reason },
        CoreError::ConfirmationRequired { warnings } => ApiError::ConfirmationRequired {
            warnings: warnings.iter().map(ToString::to_string).collect(),
        },
        CoreError::Conflict { expected, actual } => ApiError::Conflict { expected, actual },
        CoreError::ScratchStorage(msg) => ApiError::Internal {
            message: format!("Draft storage failed: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Commit-time guard failures keep their meaning; every other storage
/// failure is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::StoreNotFound(store_id) => ApiError::ResourceNotFound {
            resource_type: String::from("store"),
            message: format!("store '{store_id}' does not exist"),
        },
        PersistenceError::RegistrationClosed(store_id) => ApiError::RegistrationClosed { store_id },
        PersistenceError::VersionConflict { expected, actual } => {
            ApiError::Conflict { expected, actual }
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
