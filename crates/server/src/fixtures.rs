// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading of store, counter, and employee records.
//!
//! Stores, their settings, counters and employees are owned by other
//! services. For standalone runs the server can seed them from a JSON
//! file shaped like:
//!
//! ```json
//! {
//!   "stores": [
//!     {
//!       "store_id": "store-1",
//!       "settings": { "registration_open": true, "shift_times": ["Sáng", "Chiều"] },
//!       "counters": [{ "id": "A", "name": "Counter A" }]
//!     }
//!   ],
//!   "employees": [
//!     {
//!       "id": "e-1", "name": "An", "employee_type": "PT", "role": "employee",
//!       "store_id": "store-1", "is_active": true
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use shiftboard_domain::{Counter, Employee, Settings, StoreId};
use shiftboard_persistence::{Persistence, PersistenceError};
use std::path::Path;
use tracing::info;

/// One store and its configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFixture {
    /// The store id.
    pub store_id: StoreId,
    /// The store's scheduling settings.
    #[serde(default)]
    pub settings: Settings,
    /// The store's counters, in display order.
    #[serde(default)]
    pub counters: Vec<Counter>,
}

/// The contents of a fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixtures {
    /// Stores to create or update.
    #[serde(default)]
    pub stores: Vec<StoreFixture>,
    /// Employees to create or update.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// Errors raised while loading fixtures.
#[derive(Debug)]
pub enum FixtureError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid fixture JSON.
    Parse(serde_json::Error),
    /// Writing a record failed.
    Persistence(PersistenceError),
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Failed to read fixtures: {err}"),
            Self::Parse(err) => write!(f, "Failed to parse fixtures: {err}"),
            Self::Persistence(err) => write!(f, "Failed to store fixtures: {err}"),
        }
    }
}

impl std::error::Error for FixtureError {}

impl From<PersistenceError> for FixtureError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl Fixtures {
    /// Parses fixtures from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Parse` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        serde_json::from_str(json).map_err(FixtureError::Parse)
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let json: String = std::fs::read_to_string(path).map_err(FixtureError::Io)?;
        Self::from_json(&json)
    }

    /// Writes every store, counter list, and employee.
    ///
    /// Stores are written first so employees can reference them.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Persistence` on the first failed write.
    pub fn apply(&self, persistence: &mut Persistence) -> Result<(), FixtureError> {
        for store in &self.stores {
            persistence.upsert_store(&store.store_id, &store.settings)?;
            persistence.replace_counters(&store.store_id, &store.counters)?;
        }
        for employee in &self.employees {
            persistence.upsert_employee(employee)?;
        }

        info!(
            stores = self.stores.len(),
            employees = self.employees.len(),
            "Loaded fixtures"
        );
        Ok(())
    }
}
