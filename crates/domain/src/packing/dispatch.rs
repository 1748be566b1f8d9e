use super::{optional, required};
use crate::error::{DomainError, EntityKind, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Shipment progress; advances strictly one step at a time
    pub enum DispatchStatus("status") {
        Preparing => "PREPARING",
        Loaded => "LOADED",
        InTransit => "IN_TRANSIT",
        Delivered => "DELIVERED",
    }
}

impl Default for DispatchStatus {
    fn default() -> Self {
        Self::Preparing
    }
}

impl DispatchStatus {
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Preparing => Some(Self::Loaded),
            Self::Loaded => Some(Self::InTransit),
            Self::InTransit => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Accepts `target` only when it is the immediate successor
    pub fn advance_to(self, target: Self) -> Result<Self> {
        if self.next() == Some(target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(
                EntityKind::Dispatch,
                self,
                target,
            ))
        }
    }
}

/// Shipment bundling one or more pallets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    pub client_name: String,
    pub client_type: Option<String>,
    pub sale_type: Option<String>,
    pub delivery_address: Option<String>,
    pub remito_number: Option<String>,
    pub dtv: Option<String>,
    pub dtc: Option<String>,
    pub closing_code: Option<String>,
    pub destination: Option<String>,
    pub discharge: Option<String>,
    pub transport: Option<String>,
    pub driver_name: Option<String>,
    pub license_plate: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<String>,
    pub status: DispatchStatus,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDispatch {
    pub client_name: String,
    pub client_type: Option<String>,
    pub sale_type: Option<String>,
    pub delivery_address: Option<String>,
    pub remito_number: Option<String>,
    pub dtv: Option<String>,
    pub dtc: Option<String>,
    pub closing_code: Option<String>,
    pub destination: Option<String>,
    pub discharge: Option<String>,
    pub transport: Option<String>,
    pub driver_name: Option<String>,
    pub license_plate: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<String>,
    pub observations: Option<String>,
    pub pallet_ids: Vec<Uuid>,
}

impl Dispatch {
    /// Builds a PREPARING dispatch; the pallet ids stay with the caller
    pub fn prepare(
        tenant_id: TenantId,
        code: String,
        new: NewDispatch,
        now: DateTime<Utc>,
    ) -> Result<(Self, Vec<Uuid>)> {
        let dispatch = Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            client_name: required(&new.client_name, "clientName")?,
            client_type: optional(new.client_type),
            sale_type: optional(new.sale_type),
            delivery_address: optional(new.delivery_address),
            remito_number: optional(new.remito_number),
            dtv: optional(new.dtv),
            dtc: optional(new.dtc),
            closing_code: optional(new.closing_code),
            destination: optional(new.destination),
            discharge: optional(new.discharge),
            transport: optional(new.transport),
            driver_name: optional(new.driver_name),
            license_plate: optional(new.license_plate),
            departure_date: new.departure_date,
            departure_time: optional(new.departure_time),
            status: DispatchStatus::Preparing,
            observations: optional(new.observations),
            created_at: now,
        };

        let mut pallet_ids = new.pallet_ids;
        pallet_ids.sort();
        pallet_ids.dedup();
        Ok((dispatch, pallet_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_sequence() {
        let mut status = DispatchStatus::Preparing;
        for expected in [
            DispatchStatus::Loaded,
            DispatchStatus::InTransit,
            DispatchStatus::Delivered,
        ] {
            status = status.advance_to(expected).unwrap();
        }
        assert_eq!(status, DispatchStatus::Delivered);
        assert_eq!(status.next(), None);
    }

    #[test]
    fn test_skips_and_rewinds_rejected() {
        assert!(
            DispatchStatus::Preparing
                .advance_to(DispatchStatus::InTransit)
                .is_err()
        );
        assert!(
            DispatchStatus::Loaded
                .advance_to(DispatchStatus::Preparing)
                .is_err()
        );
        assert!(
            DispatchStatus::Loaded
                .advance_to(DispatchStatus::Loaded)
                .is_err()
        );
    }

    #[test]
    fn test_prepare_dedups_pallets() {
        let p1 = Uuid::new_v4();
        let (dispatch, pallets) = Dispatch::prepare(
            TenantId::new("t1").unwrap(),
            "D-2024-0001".into(),
            NewDispatch {
                client_name: "Frutas del Sur".into(),
                pallet_ids: vec![p1, p1],
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(dispatch.status, DispatchStatus::Preparing);
        assert_eq!(pallets, vec![p1]);
    }

    #[test]
    fn test_prepare_requires_client() {
        let result = Dispatch::prepare(
            TenantId::new("t1").unwrap(),
            "D-2024-0001".into(),
            NewDispatch::default(),
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), DomainError::MissingField("clientName"));
    }
}
