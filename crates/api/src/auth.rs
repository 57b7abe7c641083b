// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity is established by an external collaborator. This module only
//! turns the identity it hands over into an [`AuthenticatedActor`] and
//! decides what that actor may do.

use shiftboard_audit::Actor;
use shiftboard_domain::{EmployeeId, EmployeeRole, StoreId};
use std::str::FromStr;

use crate::error::AuthError;

/// Store-scoped permissions granted by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// May force-assign, publish and edit drafts for the store.
    ManageSchedule,
}

impl Permission {
    /// Returns the string representation of this permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManageSchedule => "manage_schedule",
        }
    }
}

impl FromStr for Permission {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "manage_schedule" | "manageschedule" => Ok(Self::ManageSchedule),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown permission '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated caller acting within one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's employee id.
    pub employee_id: EmployeeId,
    /// The caller's role.
    pub role: EmployeeRole,
    /// The store the caller acts in.
    pub store_id: StoreId,
    /// Permissions held for that store.
    pub permissions: Vec<Permission>,
    /// The manager UI session, when the caller edits drafts.
    pub session_id: Option<String>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor without permissions or session.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The caller's employee id
    /// * `role` - The caller's role
    /// * `store_id` - The store the caller acts in
    #[must_use]
    pub const fn new(employee_id: EmployeeId, role: EmployeeRole, store_id: StoreId) -> Self {
        Self {
            employee_id,
            role,
            store_id,
            permissions: Vec::new(),
            session_id: None,
        }
    }

    /// Grants a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
        self
    }

    /// Attaches a manager UI session.
    #[must_use]
    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    /// Returns whether the actor holds a permission.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.employee_id.clone(), self.role.as_str().to_string())
    }
}

/// Builds actors from the identity collaborator's claims.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates the identity claims of one request.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The caller's employee id
    /// * `role` - The caller's role name
    /// * `store_id` - The store the caller acts in
    /// * `permissions` - Comma-separated permission names (may be empty)
    /// * `session_id` - The manager UI session, if any
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if a claim is missing or
    /// malformed.
    pub fn authenticate(
        employee_id: &str,
        role: &str,
        store_id: &str,
        permissions: &str,
        session_id: Option<&str>,
    ) -> Result<AuthenticatedActor, AuthError> {
        let employee_id: EmployeeId =
            EmployeeId::parse(employee_id).map_err(|e| AuthError::AuthenticationFailed {
                reason: e.to_string(),
            })?;
        let store_id: StoreId =
            StoreId::parse(store_id).map_err(|e| AuthError::AuthenticationFailed {
                reason: e.to_string(),
            })?;
        let role: EmployeeRole =
            EmployeeRole::from_str(role).map_err(|e| AuthError::AuthenticationFailed {
                reason: e.to_string(),
            })?;

        let mut actor: AuthenticatedActor = AuthenticatedActor::new(employee_id, role, store_id);
        for name in permissions.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            actor = actor.with_permission(Permission::from_str(name)?);
        }
        if let Some(session_id) = session_id.map(str::trim).filter(|s| !s.is_empty()) {
            actor = actor.with_session(session_id);
        }
        Ok(actor)
    }
}

/// Authorization service for enforcing permission-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may change the published schedule of their store.
    ///
    /// Force-assign, force-unassign, publish and every draft operation go
    /// through this check.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The attempted action, for the error message
    ///
    /// # Errors
    ///
    /// Returns an error if the actor lacks the `ManageSchedule` permission.
    pub fn authorize_manage_schedule(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.has_permission(Permission::ManageSchedule) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_permission: Permission::ManageSchedule.to_string(),
            })
        }
    }

    /// Checks if an actor may read another employee's registrations.
    ///
    /// Everyone may read their own.
    ///
    /// # Errors
    ///
    /// Returns an error if `employee_id` is someone else and the actor lacks
    /// the `ManageSchedule` permission.
    pub fn authorize_view_registrations(
        actor: &AuthenticatedActor,
        employee_id: &EmployeeId,
    ) -> Result<(), AuthError> {
        if &actor.employee_id == employee_id {
            return Ok(());
        }
        Self::authorize_manage_schedule(actor, "view_registrations")
    }
}
