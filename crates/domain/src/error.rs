use std::fmt;
use thiserror::Error;

/// Entities that can be looked up by id inside a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    TruckEntry,
    Bin,
    Preselection,
    Chamber,
    ProcessSession,
    PackedBox,
    Pallet,
    Dispatch,
}

impl EntityKind {
    /// Spanish label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::TruckEntry => "Ingreso",
            Self::Bin => "Bin",
            Self::Preselection => "Preselección",
            Self::Chamber => "Cámara",
            Self::ProcessSession => "Sesión de proceso",
            Self::PackedBox => "Caja",
            Self::Pallet => "Pallet",
            Self::Dispatch => "Despacho",
        }
    }

    fn is_feminine(&self) -> bool {
        matches!(
            self,
            Self::Preselection | Self::Chamber | Self::ProcessSession | Self::PackedBox
        )
    }

    pub fn not_found_message(&self) -> String {
        let suffix = if self.is_feminine() { "a" } else { "o" };
        format!("{} no encontrad{}", self.label(), suffix)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse classification used by outer layers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Internal,
}

/// Domain-level errors
///
/// Display strings are shown to operators as-is, so they are in Spanish.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Complete los campos obligatorios: {0}")]
    MissingField(&'static str),

    #[error("Valor inválido para {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("{}.", .0.not_found_message())]
    NotFound(EntityKind, String),

    #[error("Transición inválida de {entity}: {from} → {to}")]
    InvalidTransition {
        entity: EntityKind,
        from: String,
        to: String,
    },

    #[error("Código con formato inesperado: {0}")]
    MalformedCode(String),

    #[error("No autorizado")]
    Unauthorized,

    #[error("Conflicto al guardar: {0}")]
    Conflict(String),

    #[error("Error de base de datos: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        Self::NotFound(entity, id.to_string())
    }

    pub fn invalid_transition(
        entity: EntityKind,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingField(_) | Self::InvalidValue { .. } => ErrorClass::Validation,
            Self::NotFound(..) => ErrorClass::NotFound,
            Self::Unauthorized => ErrorClass::Forbidden,
            Self::InvalidTransition { .. } | Self::Conflict(_) => ErrorClass::Conflict,
            Self::MalformedCode(_) | Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages_are_spanish() {
        assert_eq!(
            DomainError::not_found(EntityKind::Chamber, "x").to_string(),
            "Cámara no encontrada."
        );
        assert_eq!(
            DomainError::not_found(EntityKind::TruckEntry, "x").to_string(),
            "Ingreso no encontrado."
        );
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(
            DomainError::MissingField("remito").class(),
            ErrorClass::Validation
        );
        assert_eq!(
            DomainError::invalid_transition(EntityKind::Bin, "IN_YARD", "PROCESSED").class(),
            ErrorClass::Conflict
        );
        assert_eq!(
            DomainError::Repository("boom".into()).class(),
            ErrorClass::Internal
        );
    }
}
