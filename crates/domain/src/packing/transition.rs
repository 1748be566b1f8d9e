//! Bin status transition table.
//!
//! Every bin status change goes through [`plan_bin`], which validates the
//! move against the table and returns the side effect the store has to
//! apply in the same transaction.

use super::{Bin, BinStatus};
use crate::error::{DomainError, EntityKind, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Requested change of a bin's pipeline position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinEvent {
    AddToPreselection { session_id: Uuid },
    IngressChamber { chamber_id: Uuid },
    EgressChamber,
    AddToProcess { session_id: Uuid },
    FinishProcess,
    Discard,
}

impl BinEvent {
    fn target(&self) -> BinStatus {
        match self {
            Self::AddToPreselection { .. } => BinStatus::InPreselection,
            Self::IngressChamber { .. } => BinStatus::InChamber,
            Self::EgressChamber => BinStatus::ReadyForProcess,
            Self::AddToProcess { .. } => BinStatus::InProcess,
            Self::FinishProcess => BinStatus::Processed,
            Self::Discard => BinStatus::Discarded,
        }
    }

    fn accepts(&self, from: BinStatus) -> bool {
        use BinStatus::*;
        match self {
            Self::AddToPreselection { .. } => from == InYard,
            Self::IngressChamber { .. } => matches!(from, InYard | ReadyForProcess),
            Self::EgressChamber => from == InChamber,
            Self::AddToProcess { .. } => from == ReadyForProcess,
            Self::FinishProcess => from == InProcess,
            Self::Discard => matches!(from, InYard | ReadyForProcess | InChamber),
        }
    }
}

/// Writes that accompany a status change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinEffect {
    None,
    JoinPreselection { session_id: Uuid },
    JoinProcess { session_id: Uuid },
    EnterChamber { chamber_id: Uuid, at: DateTime<Utc> },
    LeaveChamber { at: DateTime<Utc> },
    ClearChamber,
}

/// Validated status change, applied by the store guarded on `from`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinTransition {
    pub bin_id: Uuid,
    pub from: BinStatus,
    pub to: BinStatus,
    pub effect: BinEffect,
}

pub fn plan_bin(bin: &Bin, event: BinEvent, now: DateTime<Utc>) -> Result<BinTransition> {
    let to = event.target();
    if !event.accepts(bin.status) {
        return Err(DomainError::invalid_transition(
            EntityKind::Bin,
            bin.status,
            to,
        ));
    }

    let effect = match event {
        BinEvent::AddToPreselection { session_id } => BinEffect::JoinPreselection { session_id },
        BinEvent::IngressChamber { chamber_id } => BinEffect::EnterChamber { chamber_id, at: now },
        BinEvent::EgressChamber => BinEffect::LeaveChamber { at: now },
        BinEvent::AddToProcess { session_id } => BinEffect::JoinProcess { session_id },
        BinEvent::FinishProcess => BinEffect::None,
        BinEvent::Discard if bin.chamber_id.is_some() => BinEffect::ClearChamber,
        BinEvent::Discard => BinEffect::None,
    };

    Ok(BinTransition {
        bin_id: bin.id,
        from: bin.status,
        to,
        effect,
    })
}
