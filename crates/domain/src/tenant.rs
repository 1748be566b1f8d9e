use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Value object identifying an isolated customer organization
///
/// Rules:
/// - Must be non-empty
/// - Max length 64 characters
/// - Alphanumeric, underscore and hyphen only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(DomainError::MissingField("tenant"));
        }

        if id.len() > 64 {
            return Err(DomainError::invalid_value(
                "tenant",
                format!("demasiado largo: {} caracteres (máx. 64)", id.len()),
            ));
        }

        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::invalid_value(
                "tenant",
                format!("'{id}' contiene caracteres no permitidos"),
            ));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    Operator,
}

impl Role {
    /// Roles allowed to run packing-house actions
    pub const PACKING_ROLES: &'static [Role] = &[Role::Admin, Role::Supervisor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Supervisor => "SUPERVISOR",
            Self::Operator => "OPERATOR",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "SUPERVISOR" => Ok(Self::Supervisor),
            "OPERATOR" => Ok(Self::Operator),
            other => Err(DomainError::invalid_value(
                "role",
                format!("rol desconocido '{other}'"),
            )),
        }
    }
}

/// Authenticated caller, resolved by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessScope {
    pub tenant_id: TenantId,
    pub user_id: String,
    pub role: Role,
}

impl AccessScope {
    pub fn new(tenant_id: TenantId, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            tenant_id,
            user_id: user_id.into(),
            role,
        }
    }

    /// Returns true when the caller holds one of `roles`
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
