use super::{optional, positive, required};
use crate::error::Result;
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Pipeline position of a bin; doubles as its physical location
    pub enum BinStatus("status") {
        InYard => "IN_YARD",
        InPreselection => "IN_PRESELECTION",
        InChamber => "IN_CHAMBER",
        ReadyForProcess => "READY_FOR_PROCESS",
        InProcess => "IN_PROCESS",
        Processed => "PROCESSED",
        Discarded => "DISCARDED",
    }
}

/// Output colours that denote under-ripe fruit needing chamber maturation
pub const CHAMBER_COLORS: [&str; 2] = ["Color 3", "Color 4"];

impl BinStatus {
    /// Initial status of a preselection output bin given its fruit colour
    pub fn for_output_color(color: &str) -> Self {
        if CHAMBER_COLORS.contains(&color.trim()) {
            Self::InYard
        } else {
            Self::ReadyForProcess
        }
    }
}

/// Physical fruit container tracked through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    pub bin_identifier: Option<String>,
    pub field_name: String,
    pub fruit_type: String,
    pub lot_name: String,
    pub contractor: Option<String>,
    pub harvest_type: Option<String>,
    pub bin_type: Option<String>,
    pub empty_weight: Option<f64>,
    pub net_weight: f64,
    pub is_trazable: bool,
    pub status: BinStatus,
    pub truck_entry_id: Option<Uuid>,
    pub preselection_id: Option<Uuid>,
    pub internal_lot: Option<String>,
    pub fruit_color: Option<String>,
    pub fruit_quality: Option<String>,
    pub caliber: Option<String>,
    pub chamber_id: Option<Uuid>,
    pub chamber_entry_date: Option<DateTime<Utc>>,
    pub chamber_exit_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Weigh-in form for a bin unloaded from a truck (or registered loose)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBin {
    #[serde(default)]
    pub truck_entry_id: Option<Uuid>,
    #[serde(default)]
    pub bin_identifier: Option<String>,
    pub field_name: String,
    pub fruit_type: String,
    pub lot_name: String,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub harvest_type: Option<String>,
    #[serde(default)]
    pub bin_type: Option<String>,
    #[serde(default)]
    pub empty_weight: Option<f64>,
    pub net_weight: f64,
    #[serde(default)]
    pub is_trazable: bool,
}

impl NewBin {
    /// Trims text fields and checks mandatory ones
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            truck_entry_id: self.truck_entry_id,
            bin_identifier: optional(self.bin_identifier),
            field_name: required(&self.field_name, "fieldName")?,
            fruit_type: required(&self.fruit_type, "fruitType")?,
            lot_name: required(&self.lot_name, "lotName")?,
            contractor: optional(self.contractor),
            harvest_type: optional(self.harvest_type),
            bin_type: optional(self.bin_type),
            empty_weight: self.empty_weight,
            net_weight: positive(self.net_weight, "netWeight")?,
            is_trazable: self.is_trazable,
        })
    }
}

/// Bin produced by a preselection output slot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOutputBin {
    pub fruit_color: String,
    pub fruit_quality: String,
    pub net_weight: f64,
    #[serde(default)]
    pub fruit_type: String,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub lot_name: String,
    #[serde(default)]
    pub caliber: Option<String>,
}

impl NewOutputBin {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            fruit_color: required(&self.fruit_color, "fruitColor")?,
            fruit_quality: required(&self.fruit_quality, "fruitQuality")?,
            net_weight: positive(self.net_weight, "netWeight")?,
            fruit_type: self.fruit_type.trim().to_string(),
            field_name: self.field_name.trim().to_string(),
            lot_name: self.lot_name.trim().to_string(),
            caliber: optional(self.caliber),
        })
    }
}

impl Bin {
    /// Bin weighed in at the scale; starts in the yard
    pub fn weigh_in(tenant_id: TenantId, code: String, new: NewBin, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            bin_identifier: new.bin_identifier,
            field_name: new.field_name,
            fruit_type: new.fruit_type,
            lot_name: new.lot_name,
            contractor: new.contractor,
            harvest_type: new.harvest_type,
            bin_type: new.bin_type,
            empty_weight: new.empty_weight,
            net_weight: new.net_weight,
            is_trazable: new.is_trazable,
            status: BinStatus::InYard,
            truck_entry_id: new.truck_entry_id,
            preselection_id: None,
            internal_lot: None,
            fruit_color: None,
            fruit_quality: None,
            caliber: None,
            chamber_id: None,
            chamber_entry_date: None,
            chamber_exit_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Output of a preselection run; its colour decides where it goes next
    pub fn preselection_output(
        tenant_id: TenantId,
        code: String,
        session_id: Uuid,
        session_code: &str,
        new: NewOutputBin,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            bin_identifier: None,
            field_name: new.field_name,
            fruit_type: new.fruit_type,
            lot_name: new.lot_name,
            contractor: None,
            harvest_type: None,
            bin_type: None,
            empty_weight: None,
            net_weight: new.net_weight,
            is_trazable: true,
            status: BinStatus::for_output_color(&new.fruit_color),
            truck_entry_id: None,
            preselection_id: Some(session_id),
            internal_lot: Some(session_code.to_string()),
            fruit_color: Some(new.fruit_color),
            fruit_quality: Some(new.fruit_quality),
            caliber: new.caliber,
            chamber_id: None,
            chamber_entry_date: None,
            chamber_exit_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    fn output(color: &str) -> NewOutputBin {
        NewOutputBin {
            fruit_color: color.into(),
            fruit_quality: "Primera".into(),
            net_weight: 380.0,
            fruit_type: "Limón".into(),
            field_name: "Finca Norte".into(),
            lot_name: "L4".into(),
            caliber: None,
        }
    }

    #[test]
    fn test_color_policy() {
        assert_eq!(BinStatus::for_output_color("Color 3"), BinStatus::InYard);
        assert_eq!(BinStatus::for_output_color("Color 4"), BinStatus::InYard);
        assert_eq!(
            BinStatus::for_output_color("Color 1"),
            BinStatus::ReadyForProcess
        );
        assert_eq!(
            BinStatus::for_output_color("Color 2"),
            BinStatus::ReadyForProcess
        );
    }

    #[test]
    fn test_preselection_output_bins() {
        let tenant = TenantId::new("t1").unwrap();
        let session = Uuid::new_v4();

        let green = Bin::preselection_output(
            tenant.clone(),
            "B-2024-0010".into(),
            session,
            "LI-2024-001",
            output("Color 3").normalized().unwrap(),
            Utc::now(),
        );
        assert_eq!(green.status, BinStatus::InYard);
        assert!(green.is_trazable);
        assert_eq!(green.internal_lot.as_deref(), Some("LI-2024-001"));
        assert_eq!(green.preselection_id, Some(session));

        let ripe = Bin::preselection_output(
            tenant,
            "B-2024-0011".into(),
            session,
            "LI-2024-001",
            output("Color 1").normalized().unwrap(),
            Utc::now(),
        );
        assert_eq!(ripe.status, BinStatus::ReadyForProcess);
    }

    #[test]
    fn test_new_bin_validation() {
        let new = NewBin {
            field_name: "Finca Norte".into(),
            fruit_type: "Limón".into(),
            lot_name: "L1".into(),
            net_weight: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            new.normalized(),
            Err(DomainError::InvalidValue {
                field: "netWeight",
                ..
            })
        ));

        let missing = NewBin {
            net_weight: 400.0,
            ..Default::default()
        };
        assert_eq!(
            missing.normalized().unwrap_err(),
            DomainError::MissingField("fieldName")
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(
            " READY_FOR_PROCESS ".parse::<BinStatus>().unwrap(),
            BinStatus::ReadyForProcess
        );
        assert!("SOMEWHERE".parse::<BinStatus>().is_err());
    }
}
