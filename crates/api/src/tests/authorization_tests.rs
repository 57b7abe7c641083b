// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, AuthError, AuthenticatedActor, AuthenticationService, AuthorizationService,
    Permission,
};
use shiftboard_audit::Actor;
use shiftboard_domain::{EmployeeId, EmployeeRole};

use super::helpers::{create_test_employee, create_test_manager};

#[test]
fn test_authenticate_parses_identity_claims() {
    let actor: AuthenticatedActor = AuthenticationService::authenticate(
        "m-1",
        "manager",
        "store-1",
        "manage_schedule",
        Some("sess-1"),
    )
    .unwrap();

    assert_eq!(actor.employee_id, EmployeeId::new("m-1"));
    assert_eq!(actor.role, EmployeeRole::Manager);
    assert_eq!(actor.store_id.value(), "store-1");
    assert!(actor.has_permission(Permission::ManageSchedule));
    assert_eq!(actor.session_id.as_deref(), Some("sess-1"));
}

#[test]
fn test_authenticate_without_permissions_or_session() {
    let actor: AuthenticatedActor =
        AuthenticationService::authenticate("e-1", "employee", "store-1", "", Some("  "))
            .unwrap();

    assert!(actor.permissions.is_empty());
    assert!(actor.session_id.is_none());
}

#[test]
fn test_authenticate_rejects_missing_employee_id() {
    let result: Result<AuthenticatedActor, AuthError> =
        AuthenticationService::authenticate("  ", "employee", "store-1", "", None);

    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_authenticate_rejects_unknown_role_and_permission() {
    assert!(AuthenticationService::authenticate("e-1", "owner", "store-1", "", None).is_err());
    assert!(
        AuthenticationService::authenticate("e-1", "employee", "store-1", "fly", None).is_err()
    );
}

#[test]
fn test_manage_schedule_is_required_for_scheduling() {
    assert!(
        AuthorizationService::authorize_manage_schedule(
            &create_test_manager("m-1", "sess-1"),
            "publish_schedule"
        )
        .is_ok()
    );

    let denied: AuthError = AuthorizationService::authorize_manage_schedule(
        &create_test_employee("e-1"),
        "publish_schedule",
    )
    .unwrap_err();
    assert_eq!(
        denied,
        AuthError::Unauthorized {
            action: String::from("publish_schedule"),
            required_permission: String::from("manage_schedule"),
        }
    );
}

#[test]
fn test_manager_role_alone_does_not_grant_scheduling() {
    let manager_without_permission: AuthenticatedActor = AuthenticatedActor::new(
        EmployeeId::new("m-1"),
        EmployeeRole::Manager,
        super::helpers::store_id(),
    );

    assert!(
        AuthorizationService::authorize_manage_schedule(&manager_without_permission, "force_assign")
            .is_err()
    );
}

#[test]
fn test_everyone_may_view_their_own_registrations() {
    let employee: AuthenticatedActor = create_test_employee("e-1");

    assert!(
        AuthorizationService::authorize_view_registrations(&employee, &EmployeeId::new("e-1"))
            .is_ok()
    );
    assert!(
        AuthorizationService::authorize_view_registrations(&employee, &EmployeeId::new("e-2"))
            .is_err()
    );
}

#[test]
fn test_audit_actor_carries_role() {
    let actor: Actor = create_test_manager("m-1", "sess-1").to_audit_actor();

    assert_eq!(actor.employee_id, EmployeeId::new("m-1"));
    assert_eq!(actor.role, "manager");
}

#[test]
fn test_auth_error_converts_to_api_error() {
    let api_err: ApiError = ApiError::from(AuthError::AuthenticationFailed {
        reason: String::from("missing header"),
    });

    assert!(matches!(api_err, ApiError::AuthenticationFailed { .. }));
}
