use crate::error::{DomainError, EntityKind, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    pub enum PalletStatus("status") {
        OnFloor => "ON_FLOOR",
        Dispatched => "DISPATCHED",
    }
}

impl Default for PalletStatus {
    fn default() -> Self {
        Self::OnFloor
    }
}

impl PalletStatus {
    /// ON_FLOOR → DISPATCHED; a pallet ships once
    pub fn dispatch(self) -> Result<Self> {
        match self {
            Self::OnFloor => Ok(Self::Dispatched),
            Self::Dispatched => Err(DomainError::invalid_transition(
                EntityKind::Pallet,
                self,
                Self::Dispatched,
            )),
        }
    }
}

/// Palletized bundle of finished boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pallet {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub number: i32,
    pub code: String,
    pub status: PalletStatus,
    pub destination: Option<String>,
    pub operator_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Pallet {
    pub fn assemble(
        tenant_id: TenantId,
        number: i32,
        code: String,
        operator_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            number,
            code,
            status: PalletStatus::OnFloor,
            destination: None,
            operator_name: super::optional(operator_name),
            created_at: now,
        }
    }
}
