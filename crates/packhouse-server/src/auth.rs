//! Caller identity for packing endpoints.
//!
//! Sessions are resolved upstream; the gateway forwards the caller as
//! `x-tenant-id`, `x-user-id` and `x-role` headers.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use domain::tenant::{AccessScope, Role, TenantId};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-role";

/// Authenticated caller; missing or malformed identity is a 401
#[derive(Debug, Clone)]
pub struct Caller(pub AccessScope);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::unauthorized(format!("Falta el encabezado {name}")))
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = TenantId::new(header(parts, TENANT_HEADER)?)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;
        let user = header(parts, USER_HEADER)?.to_string();
        let role: Role = header(parts, ROLE_HEADER)?
            .parse()
            .map_err(|e: domain::DomainError| ApiError::unauthorized(e.to_string()))?;

        Ok(Caller(AccessScope::new(tenant, user, role)))
    }
}
