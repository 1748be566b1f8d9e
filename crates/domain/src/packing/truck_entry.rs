use super::{optional, required};
use crate::error::{DomainError, EntityKind, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Weigh-in lifecycle of a truck at the scale
    pub enum TruckEntryStatus("status") {
        Pending => "PENDING",
        Finalized => "FINALIZED",
    }
}

impl Default for TruckEntryStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TruckEntryStatus {
    /// One-way PENDING → FINALIZED
    pub fn finalize(self) -> Result<Self> {
        match self {
            Self::Pending => Ok(Self::Finalized),
            Self::Finalized => Err(DomainError::invalid_transition(
                EntityKind::TruckEntry,
                self,
                Self::Finalized,
            )),
        }
    }
}

/// A truck arriving at the packing-house scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckEntry {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub remito_number: String,
    pub dtv: String,
    pub transport: String,
    pub chassis: Option<String>,
    pub trailer: Option<String>,
    pub driver_name: String,
    pub driver_dni: String,
    pub operator_id: Option<String>,
    pub producer_unit: Option<String>,
    pub field_origin: Option<String>,
    pub entry_date: DateTime<Utc>,
    pub status: TruckEntryStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTruckEntry {
    pub remito_number: String,
    pub dtv: String,
    pub transport: String,
    #[serde(default)]
    pub chassis: Option<String>,
    #[serde(default)]
    pub trailer: Option<String>,
    pub driver_name: String,
    pub driver_dni: String,
    #[serde(default)]
    pub producer_unit: Option<String>,
    #[serde(default)]
    pub field_origin: Option<String>,
}

impl TruckEntry {
    /// Validates the weigh-in form and builds a PENDING entry
    pub fn register(
        tenant_id: TenantId,
        operator_id: Option<String>,
        new: NewTruckEntry,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            remito_number: required(&new.remito_number, "remitoNumber")?,
            dtv: required(&new.dtv, "dtv")?,
            transport: required(&new.transport, "transport")?,
            chassis: optional(new.chassis),
            trailer: optional(new.trailer),
            driver_name: required(&new.driver_name, "driverName")?,
            driver_dni: required(&new.driver_dni, "driverDni")?,
            operator_id,
            producer_unit: optional(new.producer_unit),
            field_origin: optional(new.field_origin),
            entry_date: now,
            status: TruckEntryStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewTruckEntry {
        NewTruckEntry {
            remito_number: " R-0001 ".into(),
            dtv: "DTV-9".into(),
            transport: "Transportes Sur".into(),
            chassis: Some("  ".into()),
            trailer: None,
            driver_name: "Juan Pérez".into(),
            driver_dni: "30111222".into(),
            producer_unit: None,
            field_origin: Some("Finca Norte".into()),
        }
    }

    #[test]
    fn test_register_trims_and_starts_pending() {
        let entry =
            TruckEntry::register(TenantId::new("t1").unwrap(), None, form(), Utc::now()).unwrap();
        assert_eq!(entry.remito_number, "R-0001");
        assert_eq!(entry.chassis, None);
        assert_eq!(entry.field_origin.as_deref(), Some("Finca Norte"));
        assert_eq!(entry.status, TruckEntryStatus::Pending);
    }

    #[test]
    fn test_register_requires_driver() {
        let mut new = form();
        new.driver_dni = String::new();
        let err = TruckEntry::register(TenantId::new("t1").unwrap(), None, new, Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::MissingField("driverDni"));
    }

    #[test]
    fn test_finalize_is_one_way() {
        let finalized = TruckEntryStatus::Pending.finalize().unwrap();
        assert_eq!(finalized, TruckEntryStatus::Finalized);
        assert!(finalized.finalize().is_err());
        assert_eq!("FINALIZED".parse::<TruckEntryStatus>().unwrap(), finalized);
    }
}
