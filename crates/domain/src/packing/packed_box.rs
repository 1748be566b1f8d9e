use super::{optional, positive, required};
use crate::error::Result;
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    pub enum BoxDestination("destination") {
        MercadoInterno => "MERCADO_INTERNO",
        Exportacion => "EXPORTACION",
    }
}

impl Default for BoxDestination {
    fn default() -> Self {
        Self::MercadoInterno
    }
}

/// Packed unit; immutable after creation except for its pallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedBox {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub code: String,
    pub product: String,
    pub producer: Option<String>,
    pub caliber: String,
    pub category: String,
    pub packaging_code: Option<String>,
    pub destination: BoxDestination,
    pub weight_kg: f64,
    pub process_session_id: Option<Uuid>,
    pub pallet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBox {
    pub product: String,
    #[serde(default)]
    pub producer: Option<String>,
    pub caliber: String,
    pub category: String,
    #[serde(default)]
    pub packaging_code: Option<String>,
    #[serde(default)]
    pub destination: Option<BoxDestination>,
    pub weight_kg: f64,
    #[serde(default)]
    pub process_session_id: Option<Uuid>,
}

impl NewBox {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            product: required(&self.product, "product")?,
            producer: optional(self.producer),
            caliber: required(&self.caliber, "caliber")?,
            category: required(&self.category, "category")?,
            packaging_code: optional(self.packaging_code),
            destination: self.destination,
            weight_kg: positive(self.weight_kg, "weightKg")?,
            process_session_id: self.process_session_id,
        })
    }
}

impl PackedBox {
    pub fn pack(tenant_id: TenantId, code: String, new: NewBox, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            code,
            product: new.product,
            producer: new.producer,
            caliber: new.caliber,
            category: new.category,
            packaging_code: new.packaging_code,
            destination: new.destination.unwrap_or_default(),
            weight_kg: new.weight_kg,
            process_session_id: new.process_session_id,
            pallet_id: None,
            created_at: now,
        }
    }
}
