use super::{SessionTiming, non_negative, positive, required};
use crate::error::{EntityKind, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Packing-line run consuming READY_FOR_PROCESS bins and producing boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSession {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    #[serde(flatten)]
    pub timing: SessionTiming,
    pub clean_discard_kg: f64,
    pub contaminated_discard_kg: f64,
    pub notes: Option<String>,
}

/// Consumable applied on the line (wax, fungicide, labels, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProduct {
    pub id: Uuid,
    pub process_session_id: Uuid,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProcessProduct {
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl ProcessSession {
    pub fn start(tenant_id: TenantId, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            timing: SessionTiming::start(now),
            clean_discard_kg: 0.0,
            contaminated_discard_kg: 0.0,
            notes: None,
        }
    }

    pub fn ensure_open(&self) -> Result<()> {
        self.timing.ensure_open(EntityKind::ProcessSession)
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.timing.pause(EntityKind::ProcessSession, now)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.timing.resume(EntityKind::ProcessSession, now)
    }

    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.timing.finalize(EntityKind::ProcessSession, now)
    }

    pub fn total_discard_kg(&self) -> f64 {
        self.clean_discard_kg + self.contaminated_discard_kg
    }

    /// Checks a discard increment; both buckets accumulate, never replace
    pub fn validate_discard(clean_kg: f64, contaminated_kg: f64) -> Result<(f64, f64)> {
        Ok((
            non_negative(clean_kg, "cleanDiscardKg")?,
            non_negative(contaminated_kg, "contaminatedDiscardKg")?,
        ))
    }
}

impl NewProcessProduct {
    pub fn into_product(self, process_session_id: Uuid) -> Result<ProcessProduct> {
        Ok(ProcessProduct {
            id: Uuid::new_v4(),
            process_session_id,
            product_name: required(&self.product_name, "productName")?,
            quantity: positive(self.quantity, "quantity")?,
            unit: required(&self.unit, "unit")?,
            cost: self.cost,
        })
    }
}
