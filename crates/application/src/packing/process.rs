use super::PackingService;
use domain::PackingEvent;
use domain::code::CodeKind;
use domain::error::Result;
use domain::packing::{
    Bin, BinEvent, BinStatus, BinTransition, BoxFilter, NewBox, NewProcessProduct, PackedBox,
    ProcessProduct, ProcessSession, ProcessSummary, plan_bin,
};
use domain::tenant::{AccessScope, TenantId};
use tracing::{debug, info};
use uuid::Uuid;

impl PackingService {
    pub async fn start_process(&self, scope: &AccessScope) -> Result<ProcessSession> {
        let tenant = self.authorize(scope)?;
        let now = self.now();

        let code = self.next_code(tenant, CodeKind::Process, now).await?;
        let session = ProcessSession::start(tenant.clone(), code, now);
        self.store.insert_process(&session).await?;

        info!(tenant_id = %tenant, code = %session.code, id = %session.id, "Process started");
        self.publish_process(&session).await;
        Ok(session)
    }

    pub async fn add_bin_to_process(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        bin_id: Uuid,
    ) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let session = self.process(tenant, session_id).await?;
        session.ensure_open()?;

        let bin = self.bin(tenant, bin_id).await?;
        let bin = self
            .move_bin(tenant, bin, BinEvent::AddToProcess { session_id })
            .await?;

        info!(tenant_id = %tenant, code = %bin.code, session = %session.code, "Bin added to process");
        Ok(bin)
    }

    pub async fn register_process_product(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        new: NewProcessProduct,
    ) -> Result<ProcessProduct> {
        let tenant = self.authorize(scope)?;
        let session = self.process(tenant, session_id).await?;
        session.ensure_open()?;

        let product = new.into_product(session.id)?;
        self.store.insert_process_product(&product).await?;

        info!(tenant_id = %tenant, session = %session.code, product = %product.product_name, quantity = product.quantity, "Process product registered");
        self.publish_process(&session).await;
        Ok(product)
    }

    /// Adds to the running discard totals; concurrent calls both count
    pub async fn register_discard(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        clean_kg: f64,
        contaminated_kg: f64,
    ) -> Result<ProcessSession> {
        let tenant = self.authorize(scope)?;
        let (clean_kg, contaminated_kg) = ProcessSession::validate_discard(clean_kg, contaminated_kg)?;
        let session = self.process(tenant, session_id).await?;
        session.ensure_open()?;

        self.store
            .add_process_discard(tenant, session_id, clean_kg, contaminated_kg)
            .await?;
        let session = self.process(tenant, session_id).await?;

        info!(
            tenant_id = %tenant,
            code = %session.code,
            clean_kg,
            contaminated_kg,
            total_discard_kg = session.total_discard_kg(),
            "Process discard registered"
        );
        self.publish_process(&session).await;
        Ok(session)
    }

    pub async fn pause_process(&self, scope: &AccessScope, session_id: Uuid) -> Result<ProcessSession> {
        let tenant = self.authorize(scope)?;
        let mut session = self.process(tenant, session_id).await?;
        let expected = session.timing.status;

        session.pause(self.now())?;
        self.store.save_process(&session, expected).await?;

        info!(tenant_id = %tenant, code = %session.code, pause_count = session.timing.pause_count, "Process paused");
        self.publish_process(&session).await;
        Ok(session)
    }

    pub async fn resume_process(&self, scope: &AccessScope, session_id: Uuid) -> Result<ProcessSession> {
        let tenant = self.authorize(scope)?;
        let mut session = self.process(tenant, session_id).await?;
        let expected = session.timing.status;

        session.resume(self.now())?;
        self.store.save_process(&session, expected).await?;

        info!(tenant_id = %tenant, code = %session.code, total_pause_hours = session.timing.total_pause_hours, "Process resumed");
        self.publish_process(&session).await;
        Ok(session)
    }

    /// Completes the session and marks its bins PROCESSED in one transaction
    pub async fn finalize_process(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
    ) -> Result<ProcessSummary> {
        let tenant = self.authorize(scope)?;
        let mut session = self.process(tenant, session_id).await?;
        let expected = session.timing.status;
        let now = self.now();

        session.finalize(now)?;
        let input_bins = self.store.process_input_bins(tenant, session_id).await?;
        let transitions = input_bins
            .iter()
            .filter(|b| b.status == BinStatus::InProcess)
            .map(|b| plan_bin(b, BinEvent::FinishProcess, now))
            .collect::<Result<Vec<BinTransition>>>()?;
        self.store
            .complete_process(&session, expected, &transitions)
            .await?;

        let summary = self.summarize_process(tenant, session).await?;
        info!(
            tenant_id = %tenant,
            code = %summary.session.code,
            bins = transitions.len(),
            boxes = summary.box_count,
            efficiency = summary.efficiency,
            "Process finalized"
        );
        if !transitions.is_empty() {
            self.publish(PackingEvent::BinsMoved {
                tenant_id: tenant.clone(),
                bin_ids: transitions.iter().map(|t| t.bin_id).collect(),
                status: BinStatus::Processed,
                timestamp: now,
            })
            .await;
        }
        self.publish_process(&summary.session).await;
        Ok(summary)
    }

    pub async fn create_box(&self, scope: &AccessScope, new: NewBox) -> Result<PackedBox> {
        let tenant = self.authorize(scope)?;
        let new = new.normalized()?;
        if let Some(session_id) = new.process_session_id {
            self.process(tenant, session_id).await?;
        }

        let now = self.now();
        let code = self.next_code(tenant, CodeKind::PackedBox, now).await?;
        let packed = PackedBox::pack(tenant.clone(), code, new, now);
        self.store.insert_box(&packed).await?;

        info!(tenant_id = %tenant, code = %packed.code, destination = %packed.destination, weight_kg = packed.weight_kg, "Box packed");
        self.publish(PackingEvent::BoxPacked {
            tenant_id: tenant.clone(),
            box_id: packed.id,
            code: packed.code.clone(),
            timestamp: now,
        })
        .await;
        Ok(packed)
    }

    pub async fn process_summary(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
    ) -> Result<ProcessSummary> {
        let tenant = self.authorize(scope)?;
        let session = self.process(tenant, session_id).await?;
        self.summarize_process(tenant, session).await
    }

    pub async fn list_processes(&self, scope: &AccessScope) -> Result<Vec<ProcessSession>> {
        let tenant = self.authorize(scope)?;
        self.store.list_processes(tenant).await
    }

    pub async fn list_boxes(&self, scope: &AccessScope, filter: &BoxFilter) -> Result<Vec<PackedBox>> {
        let tenant = self.authorize(scope)?;
        self.store.list_boxes(tenant, filter).await
    }

    pub(super) async fn summarize_process(
        &self,
        tenant: &TenantId,
        session: ProcessSession,
    ) -> Result<ProcessSummary> {
        let input_bins = self.store.process_input_bins(tenant, session.id).await?;
        let box_filter = BoxFilter {
            process_session_id: Some(session.id),
            ..Default::default()
        };
        let boxes = self.store.list_boxes(tenant, &box_filter).await?;
        let products = self.store.process_products(session.id).await?;

        let summary = ProcessSummary::new(session, input_bins, &boxes, products);
        debug!(
            tenant_id = %tenant,
            code = %summary.session.code,
            input_kg = summary.total_input_kg,
            box_kg = summary.total_box_kg,
            "Process summary"
        );
        Ok(summary)
    }

    async fn publish_process(&self, session: &ProcessSession) {
        self.publish(PackingEvent::ProcessUpdated {
            tenant_id: session.tenant_id.clone(),
            session_id: session.id,
            code: session.code.clone(),
            status: session.timing.status,
            timestamp: self.now(),
        })
        .await;
    }
}
