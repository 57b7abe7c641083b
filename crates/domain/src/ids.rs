// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! String-backed identifiers for reference entities.
//!
//! Employees, stores, shifts and counters are owned by external
//! collaborators; the engine only ever sees their opaque ids.

use crate::error::DomainError;

/// Defines a string-backed identifier newtype.
///
/// Values are trimmed on construction. `parse` additionally rejects
/// empty values; `new` does not, so that rows read back from storage
/// never fail to load.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name {
            value: String,
        }

        impl $name {
            /// The kind of entity this id refers to.
            pub const KIND: &'static str = $kind;

            /// Creates a new id from a raw value.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self {
                    value: value.trim().to_string(),
                }
            }

            /// Parses an id, rejecting empty values.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidIdentifier` if the trimmed value is empty.
            pub fn parse(value: &str) -> Result<Self, DomainError> {
                let id: Self = Self::new(value);
                if id.value.is_empty() {
                    return Err(DomainError::InvalidIdentifier { kind: Self::KIND });
                }
                Ok(id)
            }

            /// Returns the id value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.value
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.value)
            }
        }
    };
}

string_id!(
    /// Identifies an employee across stores.
    EmployeeId,
    "employee"
);

string_id!(
    /// Identifies a store.
    StoreId,
    "store"
);

string_id!(
    /// Identifies a named shift (e.g., "Sáng", "Chiều").
    ShiftId,
    "shift"
);

string_id!(
    /// Identifies a counter (work position) within a store.
    CounterId,
    "counter"
);
