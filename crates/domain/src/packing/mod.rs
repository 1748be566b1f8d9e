//! Packing-house pipeline: truck weigh-in → preselection → chambers →
//! process → boxes → pallets → dispatch.

mod bin;
mod chamber;
mod dispatch;
mod packed_box;
mod pallet;
mod preselection;
mod process;
mod repository;
mod session;
mod summary;
mod transition;
mod truck_entry;

pub use bin::{Bin, BinStatus, NewBin, NewOutputBin};
pub use chamber::{Chamber, ChamberKind, ChamberTask, NewChamber, NewChamberTask};
pub use dispatch::{Dispatch, DispatchStatus, NewDispatch};
pub use packed_box::{BoxDestination, NewBox, PackedBox};
pub use pallet::{Pallet, PalletStatus};
pub use preselection::{
    NewSessionInput, NewWorker, OutputSlot, PreselectionSession, PreselectionWorker,
    SessionInput,
};
pub use process::{NewProcessProduct, ProcessProduct, ProcessSession};
pub use repository::{
    BinFilter, BinRepository, BoxFilter, ChamberRepository, CodeSequence, DispatchRepository,
    PackingStore, PalletRepository, PreselectionRepository, ProcessRepository,
    TruckEntryRepository,
};
pub use session::{SessionStatus, SessionTiming};
pub use summary::{
    ChamberSummary, DispatchSummary, FlowCounts, PackingDashboard, PalletSummary,
    PreselectionSummary, ProcessSummary, TruckEntrySummary,
};
pub use transition::{BinEffect, BinEvent, BinTransition, plan_bin};
pub use truck_entry::{NewTruckEntry, TruckEntry, TruckEntryStatus};

use crate::error::{DomainError, Result};

/// Trims a mandatory text field, rejecting blanks
pub(crate) fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blanks become `None`
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn positive(value: f64, field: &'static str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::invalid_value(field, "debe ser mayor a 0"));
    }
    Ok(value)
}

pub(crate) fn non_negative(value: f64, field: &'static str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::invalid_value(field, "no puede ser negativo"));
    }
    Ok(value)
}
