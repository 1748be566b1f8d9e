use super::{
    Bin, BinStatus, BinTransition, Chamber, ChamberTask, Dispatch, DispatchStatus, PackedBox,
    Pallet, PalletStatus, PreselectionSession, PreselectionWorker, ProcessProduct,
    ProcessSession, SessionInput, SessionStatus, TruckEntry, TruckEntryStatus,
};
use crate::code::CodeKind;
use crate::error::Result;
use crate::tenant::TenantId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Narrows bin listings; empty fields do not filter
#[derive(Debug, Clone, Default)]
pub struct BinFilter {
    pub statuses: Vec<BinStatus>,
    pub truck_entry_id: Option<Uuid>,
    pub chamber_id: Option<Uuid>,
    /// Output bins of a preselection run
    pub preselection_id: Option<Uuid>,
    pub updated_since: Option<DateTime<Utc>>,
}

impl BinFilter {
    pub fn status(status: BinStatus) -> Self {
        Self {
            statuses: vec![status],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoxFilter {
    pub process_session_id: Option<Uuid>,
    pub pallet_id: Option<Uuid>,
    pub created_since: Option<DateTime<Utc>>,
}

/// Issues human-readable codes, one counter per tenant/prefix/year
#[async_trait]
pub trait CodeSequence: Send + Sync {
    async fn next_code(&self, tenant: &TenantId, kind: CodeKind, year: i32) -> Result<String>;
}

#[async_trait]
pub trait TruckEntryRepository: Send + Sync {
    async fn insert_truck_entry(&self, entry: &TruckEntry) -> Result<()>;
    async fn find_truck_entry(&self, tenant: &TenantId, id: Uuid) -> Result<Option<TruckEntry>>;
    /// Newest first
    async fn list_truck_entries(&self, tenant: &TenantId) -> Result<Vec<TruckEntry>>;
    /// Fails with `Conflict` when the entry is no longer in `from`
    async fn update_truck_entry_status(
        &self,
        tenant: &TenantId,
        id: Uuid,
        from: TruckEntryStatus,
        to: TruckEntryStatus,
    ) -> Result<()>;
}

#[async_trait]
pub trait BinRepository: Send + Sync {
    async fn insert_bin(&self, bin: &Bin) -> Result<()>;
    async fn find_bin(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Bin>>;
    /// Bins among `ids` that belong to the tenant
    async fn find_bins(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<Bin>>;
    async fn list_bins(&self, tenant: &TenantId, filter: &BinFilter) -> Result<Vec<Bin>>;

    /// Applies every transition and its effect in one transaction.
    ///
    /// Each row is guarded on its `from` status; if any bin moved in the
    /// meantime the whole batch is rolled back with `Conflict`.
    async fn apply_bin_transitions(
        &self,
        tenant: &TenantId,
        transitions: &[BinTransition],
        now: DateTime<Utc>,
    ) -> Result<()>;
}

#[async_trait]
pub trait PreselectionRepository: Send + Sync {
    async fn insert_preselection(&self, session: &PreselectionSession) -> Result<()>;
    async fn find_preselection(
        &self,
        tenant: &TenantId,
        id: Uuid,
    ) -> Result<Option<PreselectionSession>>;
    /// Newest first
    async fn list_preselections(&self, tenant: &TenantId) -> Result<Vec<PreselectionSession>>;
    /// Persists timing, discard and notes if the stored status is still `expected`
    async fn save_preselection(
        &self,
        session: &PreselectionSession,
        expected: SessionStatus,
    ) -> Result<()>;
    async fn preselection_input_bins(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Bin>>;
    async fn insert_preselection_worker(&self, worker: &PreselectionWorker) -> Result<()>;
    async fn preselection_workers(&self, id: Uuid) -> Result<Vec<PreselectionWorker>>;
    async fn insert_preselection_input(&self, input: &SessionInput) -> Result<()>;
    async fn preselection_inputs(&self, id: Uuid) -> Result<Vec<SessionInput>>;
}

#[async_trait]
pub trait ChamberRepository: Send + Sync {
    async fn insert_chamber(&self, chamber: &Chamber) -> Result<()>;
    async fn find_chamber(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Chamber>>;
    async fn list_chambers(&self, tenant: &TenantId) -> Result<Vec<Chamber>>;
    async fn update_chamber_settings(
        &self,
        tenant: &TenantId,
        id: Uuid,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> Result<()>;
    async fn insert_chamber_task(&self, task: &ChamberTask) -> Result<()>;
    /// Newest first, at most `limit`
    async fn chamber_tasks(&self, chamber_id: Uuid, limit: u64) -> Result<Vec<ChamberTask>>;
}

#[async_trait]
pub trait ProcessRepository: Send + Sync {
    async fn insert_process(&self, session: &ProcessSession) -> Result<()>;
    async fn find_process(&self, tenant: &TenantId, id: Uuid) -> Result<Option<ProcessSession>>;
    /// Newest first
    async fn list_processes(&self, tenant: &TenantId) -> Result<Vec<ProcessSession>>;
    async fn save_process(&self, session: &ProcessSession, expected: SessionStatus)
    -> Result<()>;

    /// Completes the session and moves its bins to PROCESSED atomically
    async fn complete_process(
        &self,
        session: &ProcessSession,
        expected: SessionStatus,
        bins: &[BinTransition],
    ) -> Result<()>;

    /// Adds to both discard buckets with an in-place increment
    async fn add_process_discard(
        &self,
        tenant: &TenantId,
        id: Uuid,
        clean_kg: f64,
        contaminated_kg: f64,
    ) -> Result<()>;
    async fn process_input_bins(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Bin>>;
    async fn insert_process_product(&self, product: &ProcessProduct) -> Result<()>;
    async fn process_products(&self, id: Uuid) -> Result<Vec<ProcessProduct>>;
}

/// Boxes and the pallets they are stacked on
#[async_trait]
pub trait PalletRepository: Send + Sync {
    async fn insert_box(&self, packed: &PackedBox) -> Result<()>;
    async fn find_boxes(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<PackedBox>>;
    async fn list_boxes(&self, tenant: &TenantId, filter: &BoxFilter) -> Result<Vec<PackedBox>>;

    /// Inserts the pallet and claims the boxes in one transaction.
    ///
    /// Boxes already on a pallet make the whole operation fail with `Conflict`.
    async fn insert_pallet(&self, pallet: &Pallet, box_ids: &[Uuid]) -> Result<()>;
    async fn find_pallets(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<Pallet>>;
    async fn list_pallets(
        &self,
        tenant: &TenantId,
        status: Option<PalletStatus>,
    ) -> Result<Vec<Pallet>>;
}

#[async_trait]
pub trait DispatchRepository: Send + Sync {
    /// Inserts the dispatch, links the pallets and flips them to DISPATCHED
    async fn insert_dispatch(&self, dispatch: &Dispatch, pallet_ids: &[Uuid]) -> Result<()>;
    async fn find_dispatch(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Dispatch>>;
    /// Newest first
    async fn list_dispatches(&self, tenant: &TenantId) -> Result<Vec<Dispatch>>;
    async fn dispatch_pallets(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Pallet>>;
    async fn update_dispatch_status(
        &self,
        tenant: &TenantId,
        id: Uuid,
        from: DispatchStatus,
        to: DispatchStatus,
    ) -> Result<()>;
}

/// Everything the packing use cases need from storage
pub trait PackingStore:
    CodeSequence
    + TruckEntryRepository
    + BinRepository
    + PreselectionRepository
    + ChamberRepository
    + ProcessRepository
    + PalletRepository
    + DispatchRepository
{
}

impl<T> PackingStore for T where
    T: CodeSequence
        + TruckEntryRepository
        + BinRepository
        + PreselectionRepository
        + ChamberRepository
        + ProcessRepository
        + PalletRepository
        + DispatchRepository
{
}
