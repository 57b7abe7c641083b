// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request identity extraction for the server.
//!
//! Authentication itself belongs to the platform in front of this
//! service. It forwards the verified caller as headers, and this module
//! turns those headers into an [`AuthenticatedActor`] and the [`Cause`]
//! recorded with any audit event the request produces.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use shiftboard_api::{AuthenticatedActor, AuthenticationService};
use shiftboard_audit::Cause;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::{AppState, ErrorResponse};

/// Header carrying the caller's employee id.
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";
/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-role";
/// Header carrying the store the caller acts in.
pub const STORE_ID_HEADER: &str = "x-store-id";
/// Header carrying comma-separated permission names.
pub const PERMISSIONS_HEADER: &str = "x-permissions";
/// Header carrying the manager UI session id.
pub const SESSION_ID_HEADER: &str = "x-session-id";
/// Header carrying the caller's correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extractor for the authenticated caller of a request.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     RequestIdentity { actor, cause }: RequestIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // cause: Cause
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the employee id, role, or store id header is
/// missing, is not valid UTF-8, or does not parse.
pub struct RequestIdentity {
    /// The authenticated caller.
    pub actor: AuthenticatedActor,
    /// The correlation recorded with audit events.
    pub cause: Cause,
}

impl FromRequestParts<AppState> for RequestIdentity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let employee_id: &str = required_header(&parts.headers, EMPLOYEE_ID_HEADER)?;
        let role: &str = required_header(&parts.headers, ROLE_HEADER)?;
        let store_id: &str = required_header(&parts.headers, STORE_ID_HEADER)?;
        let permissions: &str = optional_header(&parts.headers, PERMISSIONS_HEADER)?.unwrap_or("");
        let session_id: Option<&str> = optional_header(&parts.headers, SESSION_ID_HEADER)?;

        let actor: AuthenticatedActor = AuthenticationService::authenticate(
            employee_id,
            role,
            store_id,
            permissions,
            session_id,
        )
        .map_err(|e| {
            warn!(error = %e, "Identity headers rejected");
            IdentityError::InvalidIdentity(e.to_string())
        })?;

        let cause_id: String = optional_header(&parts.headers, REQUEST_ID_HEADER)?
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(generated_request_id, str::to_string);
        let cause: Cause = Cause::new(cause_id, format!("{} {}", parts.method, parts.uri.path()));

        debug!(
            employee_id = %actor.employee_id,
            role = %actor.role,
            store_id = %actor.store_id,
            cause_id = %cause.id,
            "Request identity extracted"
        );

        Ok(Self { actor, cause })
    }
}

/// Correlation id for requests that arrive without `x-request-id`.
#[must_use]
pub fn generated_request_id() -> String {
    format!("req-{}", Ulid::new())
}

fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<&'a str, IdentityError> {
    optional_header(headers, name)?.ok_or_else(|| {
        debug!(header = name, "Missing identity header");
        IdentityError::MissingHeader(name)
    })
}

fn optional_header<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<Option<&'a str>, IdentityError> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!(header = name, "Invalid identity header encoding");
                IdentityError::InvalidHeaderEncoding(name)
            })
        })
        .transpose()
}

/// Identity extraction errors.
#[derive(Debug)]
pub enum IdentityError {
    /// A required header is absent.
    MissingHeader(&'static str),
    /// A header is not valid UTF-8.
    InvalidHeaderEncoding(&'static str),
    /// The headers were present but did not authenticate.
    InvalidIdentity(String),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader(name) => write!(f, "Missing {name} header"),
            Self::InvalidHeaderEncoding(name) => write!(f, "Invalid {name} header encoding"),
            Self::InvalidIdentity(reason) => write!(f, "Authentication failed: {reason}"),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let body: axum::Json<ErrorResponse> = axum::Json(ErrorResponse {
            error: true,
            kind: String::from("authentication_failed"),
            message: self.to_string(),
            warnings: Vec::new(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
