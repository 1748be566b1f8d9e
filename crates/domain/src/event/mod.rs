use crate::packing::{BinStatus, DispatchStatus, SessionStatus};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod publisher;
pub use publisher::{EventPublisher, NoopPublisher, PublishError};

/// Facts announced after a packing mutation commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PackingEvent {
    TruckEntryRegistered {
        tenant_id: TenantId,
        entry_id: Uuid,
        remito_number: String,
        timestamp: DateTime<Utc>,
    },

    TruckEntryFinalized {
        tenant_id: TenantId,
        entry_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A new bin exists, weighed in or produced by preselection
    BinRegistered {
        tenant_id: TenantId,
        bin_id: Uuid,
        code: String,
        status: BinStatus,
        timestamp: DateTime<Utc>,
    },

    BinsMoved {
        tenant_id: TenantId,
        bin_ids: Vec<Uuid>,
        status: BinStatus,
        timestamp: DateTime<Utc>,
    },

    PreselectionUpdated {
        tenant_id: TenantId,
        session_id: Uuid,
        code: String,
        status: SessionStatus,
        timestamp: DateTime<Utc>,
    },

    ChamberUpdated {
        tenant_id: TenantId,
        chamber_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    ProcessUpdated {
        tenant_id: TenantId,
        session_id: Uuid,
        code: String,
        status: SessionStatus,
        timestamp: DateTime<Utc>,
    },

    BoxPacked {
        tenant_id: TenantId,
        box_id: Uuid,
        code: String,
        timestamp: DateTime<Utc>,
    },

    PalletAssembled {
        tenant_id: TenantId,
        pallet_id: Uuid,
        code: String,
        box_count: usize,
        timestamp: DateTime<Utc>,
    },

    DispatchUpdated {
        tenant_id: TenantId,
        dispatch_id: Uuid,
        code: String,
        status: DispatchStatus,
        timestamp: DateTime<Utc>,
    },
}

impl PackingEvent {
    pub fn tenant_id(&self) -> &TenantId {
        match self {
            Self::TruckEntryRegistered { tenant_id, .. }
            | Self::TruckEntryFinalized { tenant_id, .. }
            | Self::BinRegistered { tenant_id, .. }
            | Self::BinsMoved { tenant_id, .. }
            | Self::PreselectionUpdated { tenant_id, .. }
            | Self::ChamberUpdated { tenant_id, .. }
            | Self::ProcessUpdated { tenant_id, .. }
            | Self::BoxPacked { tenant_id, .. }
            | Self::PalletAssembled { tenant_id, .. }
            | Self::DispatchUpdated { tenant_id, .. } => tenant_id,
        }
    }

    /// Event name, also used as the SSE event field
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TruckEntryRegistered { .. } => "TruckEntryRegistered",
            Self::TruckEntryFinalized { .. } => "TruckEntryFinalized",
            Self::BinRegistered { .. } => "BinRegistered",
            Self::BinsMoved { .. } => "BinsMoved",
            Self::PreselectionUpdated { .. } => "PreselectionUpdated",
            Self::ChamberUpdated { .. } => "ChamberUpdated",
            Self::ProcessUpdated { .. } => "ProcessUpdated",
            Self::BoxPacked { .. } => "BoxPacked",
            Self::PalletAssembled { .. } => "PalletAssembled",
            Self::DispatchUpdated { .. } => "DispatchUpdated",
        }
    }
}
