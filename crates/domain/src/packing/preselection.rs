use super::{SessionTiming, optional, positive, required};
use crate::error::{DomainError, EntityKind, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Fixed configuration of one output chute of the preselection line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSlot {
    pub output_number: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub caliber: Option<String>,
    #[serde(default)]
    pub is_discard: bool,
    #[serde(default)]
    pub label: Option<String>,
}

/// First-pass manual sorting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreselectionSession {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    #[serde(flatten)]
    pub timing: SessionTiming,
    pub discard_kg: f64,
    pub notes: Option<String>,
    pub output_config: Vec<OutputSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreselectionWorker {
    pub id: Uuid,
    pub preselection_id: Uuid,
    pub worker_id: String,
    pub role: Option<String>,
    pub hours_worked: Option<f64>,
}

/// Consumable used during a session (bags, wax, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub id: Uuid,
    pub preselection_id: Uuid,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    pub worker_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionInput {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl PreselectionSession {
    pub fn start(
        tenant_id: TenantId,
        code: String,
        output_config: Vec<OutputSlot>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(output_config.len());
        for slot in output_config {
            if slot.output_number <= 0 {
                return Err(DomainError::invalid_value(
                    "outputNumber",
                    "debe ser mayor a 0",
                ));
            }
            if !seen.insert(slot.output_number) {
                return Err(DomainError::invalid_value(
                    "outputNumber",
                    format!("salida {} repetida", slot.output_number),
                ));
            }
            slots.push(OutputSlot {
                output_number: slot.output_number,
                color: optional(slot.color),
                caliber: optional(slot.caliber),
                is_discard: slot.is_discard,
                label: optional(slot.label),
            });
        }
        slots.sort_by_key(|s| s.output_number);

        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            timing: SessionTiming::start(now),
            discard_kg: 0.0,
            notes: None,
            output_config: slots,
        })
    }

    pub fn ensure_open(&self) -> Result<()> {
        self.timing.ensure_open(EntityKind::Preselection)
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.timing.pause(EntityKind::Preselection, now)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.timing.resume(EntityKind::Preselection, now)
    }

    pub fn finalize(&mut self, now: DateTime<Utc>, discard_kg: f64) -> Result<()> {
        let discard_kg = super::non_negative(discard_kg, "discardKg")?;
        self.timing.finalize(EntityKind::Preselection, now)?;
        self.discard_kg = discard_kg;
        Ok(())
    }
}

impl NewWorker {
    pub fn into_worker(self, preselection_id: Uuid) -> Result<PreselectionWorker> {
        let hours_worked = self
            .hours_worked
            .map(|h| super::non_negative(h, "hoursWorked"))
            .transpose()?;
        Ok(PreselectionWorker {
            id: Uuid::new_v4(),
            preselection_id,
            worker_id: required(&self.worker_id, "workerId")?,
            role: optional(self.role),
            hours_worked,
        })
    }
}

impl NewSessionInput {
    pub fn into_input(self, preselection_id: Uuid) -> Result<SessionInput> {
        Ok(SessionInput {
            id: Uuid::new_v4(),
            preselection_id,
            item_name: required(&self.item_name, "itemName")?,
            quantity: positive(self.quantity, "quantity")?,
            unit: required(&self.unit, "unit")?,
            cost: self.cost,
        })
    }
}
