use super::required;
use crate::error::{DomainError, Result};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    pub enum ChamberKind("type") {
        Ethylene => "ETHYLENE",
        Cold => "COLD",
    }
}

impl Default for ChamberKind {
    fn default() -> Self {
        Self::Ethylene
    }
}

pub const DEFAULT_CHAMBER_CAPACITY: i32 = 30;

/// Cold or ethylene storage unit; capacity is advisory only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chamber {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChamberKind,
    pub capacity: i32,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChamber {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<ChamberKind>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Maintenance or dosing event logged against a chamber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChamberTask {
    pub id: Uuid,
    pub chamber_id: Uuid,
    #[serde(rename = "type")]
    pub task_type: String,
    pub description: String,
    pub cost: Option<f64>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChamberTask {
    #[serde(rename = "type")]
    pub task_type: String,
    pub description: String,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl Chamber {
    pub fn create(tenant_id: TenantId, new: NewChamber, now: DateTime<Utc>) -> Result<Self> {
        let capacity = new.capacity.unwrap_or(DEFAULT_CHAMBER_CAPACITY);
        if capacity <= 0 {
            return Err(DomainError::invalid_value("capacity", "debe ser mayor a 0"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: required(&new.name, "name")?,
            kind: new.kind.unwrap_or_default(),
            capacity,
            temperature: new.temperature,
            humidity: new.humidity,
            created_at: now,
        })
    }

    /// Whether holding `bin_count` bins exceeds the nominal capacity
    pub fn is_over_capacity(&self, bin_count: usize) -> bool {
        bin_count > self.capacity.max(0) as usize
    }
}

impl NewChamberTask {
    pub fn into_task(self, chamber_id: Uuid, now: DateTime<Utc>) -> Result<ChamberTask> {
        Ok(ChamberTask {
            id: Uuid::new_v4(),
            chamber_id,
            task_type: required(&self.task_type, "type")?,
            description: required(&self.description, "description")?,
            cost: self.cost,
            date: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chamber_defaults() {
        let chamber = Chamber::create(
            TenantId::new("t1").unwrap(),
            NewChamber {
                name: " Cámara 1 ".into(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(chamber.name, "Cámara 1");
        assert_eq!(chamber.kind, ChamberKind::Ethylene);
        assert_eq!(chamber.capacity, 30);
        assert!(!chamber.is_over_capacity(30));
        assert!(chamber.is_over_capacity(31));
    }

    #[test]
    fn test_chamber_requires_name() {
        let result = Chamber::create(
            TenantId::new("t1").unwrap(),
            NewChamber::default(),
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), DomainError::MissingField("name"));
    }

    #[test]
    fn test_task_requires_description() {
        let task = NewChamberTask {
            task_type: "Dosificación".into(),
            description: " ".into(),
            cost: Some(1200.0),
        };
        assert!(task.into_task(Uuid::new_v4(), Utc::now()).is_err());
    }
}
