use super::PackingService;
use domain::PackingEvent;
use domain::code::CodeKind;
use domain::error::Result;
use domain::packing::{
    Bin, BinEvent, BinFilter, NewOutputBin, NewSessionInput, NewWorker, OutputSlot,
    PreselectionSession, PreselectionSummary, PreselectionWorker, SessionInput,
};
use domain::tenant::{AccessScope, TenantId};
use tracing::{debug, info, warn};
use uuid::Uuid;

impl PackingService {
    pub async fn start_preselection(
        &self,
        scope: &AccessScope,
        output_config: Vec<OutputSlot>,
    ) -> Result<PreselectionSession> {
        let tenant = self.authorize(scope)?;
        let now = self.now();

        let mut session = PreselectionSession::start(tenant.clone(), String::new(), output_config, now)?;
        session.code = self.next_code(tenant, CodeKind::Preselection, now).await?;
        self.store.insert_preselection(&session).await?;

        info!(tenant_id = %tenant, code = %session.code, id = %session.id, slots = session.output_config.len(), "Preselection started");
        self.publish_preselection(&session).await;
        Ok(session)
    }

    /// Moves a yard bin onto the preselection line
    pub async fn add_bin_to_preselection(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        bin_id: Uuid,
    ) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let session = self.preselection(tenant, session_id).await?;
        session.ensure_open()?;

        let bin = self.bin(tenant, bin_id).await?;
        let bin = self
            .move_bin(tenant, bin, BinEvent::AddToPreselection { session_id })
            .await?;

        info!(tenant_id = %tenant, code = %bin.code, session = %session.code, "Bin added to preselection");
        Ok(bin)
    }

    pub async fn add_worker_to_preselection(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        new: NewWorker,
    ) -> Result<PreselectionWorker> {
        let tenant = self.authorize(scope)?;
        let session = self.preselection(tenant, session_id).await?;
        session.ensure_open()?;

        let worker = new.into_worker(session.id)?;
        self.store.insert_preselection_worker(&worker).await?;

        info!(tenant_id = %tenant, session = %session.code, worker_id = %worker.worker_id, "Worker added to preselection");
        self.publish_preselection(&session).await;
        Ok(worker)
    }

    pub async fn register_preselection_input(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        new: NewSessionInput,
    ) -> Result<SessionInput> {
        let tenant = self.authorize(scope)?;
        let session = self.preselection(tenant, session_id).await?;
        session.ensure_open()?;

        let input = new.into_input(session.id)?;
        self.store.insert_preselection_input(&input).await?;

        info!(tenant_id = %tenant, session = %session.code, item = %input.item_name, quantity = input.quantity, "Preselection input registered");
        self.publish_preselection(&session).await;
        Ok(input)
    }

    pub async fn pause_preselection(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
    ) -> Result<PreselectionSession> {
        let tenant = self.authorize(scope)?;
        let mut session = self.preselection(tenant, session_id).await?;
        let expected = session.timing.status;

        session.pause(self.now())?;
        self.store.save_preselection(&session, expected).await?;

        info!(tenant_id = %tenant, code = %session.code, pause_count = session.timing.pause_count, "Preselection paused");
        self.publish_preselection(&session).await;
        Ok(session)
    }

    pub async fn resume_preselection(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
    ) -> Result<PreselectionSession> {
        let tenant = self.authorize(scope)?;
        let mut session = self.preselection(tenant, session_id).await?;
        let expected = session.timing.status;

        session.resume(self.now())?;
        self.store.save_preselection(&session, expected).await?;

        info!(tenant_id = %tenant, code = %session.code, total_pause_hours = session.timing.total_pause_hours, "Preselection resumed");
        self.publish_preselection(&session).await;
        Ok(session)
    }

    pub async fn finalize_preselection(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        discard_kg: f64,
    ) -> Result<PreselectionSummary> {
        let tenant = self.authorize(scope)?;
        let mut session = self.preselection(tenant, session_id).await?;
        let expected = session.timing.status;

        session.finalize(self.now(), discard_kg)?;
        self.store.save_preselection(&session, expected).await?;

        let summary = self.summarize_preselection(tenant, session).await?;
        info!(
            tenant_id = %tenant,
            code = %summary.session.code,
            duration_hours = ?summary.session.timing.total_duration_hours,
            merma = summary.merma,
            "Preselection finalized"
        );
        self.publish_preselection(&summary.session).await;
        Ok(summary)
    }

    /// Registers a sorted output bin; colour decides whether it waits in the
    /// yard for a chamber or goes straight to process
    pub async fn generate_output_bin(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
        new: NewOutputBin,
    ) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let new = new.normalized()?;
        let session = self.preselection(tenant, session_id).await?;
        session.ensure_open()?;

        let now = self.now();
        let code = self.next_code(tenant, CodeKind::Bin, now).await?;
        let bin = Bin::preselection_output(tenant.clone(), code, session.id, &session.code, new, now);
        self.store.insert_bin(&bin).await?;

        info!(tenant_id = %tenant, code = %bin.code, session = %session.code, status = %bin.status, "Output bin generated");
        self.publish(PackingEvent::BinRegistered {
            tenant_id: tenant.clone(),
            bin_id: bin.id,
            code: bin.code.clone(),
            status: bin.status,
            timestamp: now,
        })
        .await;
        Ok(bin)
    }

    pub async fn preselection_summary(
        &self,
        scope: &AccessScope,
        session_id: Uuid,
    ) -> Result<PreselectionSummary> {
        let tenant = self.authorize(scope)?;
        let session = self.preselection(tenant, session_id).await?;
        self.summarize_preselection(tenant, session).await
    }

    pub async fn list_preselections(&self, scope: &AccessScope) -> Result<Vec<PreselectionSession>> {
        let tenant = self.authorize(scope)?;
        self.store.list_preselections(tenant).await
    }

    pub(super) async fn summarize_preselection(
        &self,
        tenant: &TenantId,
        session: PreselectionSession,
    ) -> Result<PreselectionSummary> {
        let input_bins = self.store.preselection_input_bins(tenant, session.id).await?;
        let output_filter = BinFilter {
            preselection_id: Some(session.id),
            ..Default::default()
        };
        let output_bins = self.store.list_bins(tenant, &output_filter).await?;
        let workers = self.store.preselection_workers(session.id).await?;
        let inputs = self.store.preselection_inputs(session.id).await?;

        let summary = PreselectionSummary::new(session, input_bins, output_bins, workers, inputs);
        debug!(
            tenant_id = %tenant,
            code = %summary.session.code,
            input_kg = summary.total_input_kg,
            output_kg = summary.total_output_kg,
            "Preselection summary"
        );
        if summary.has_negative_merma() {
            warn!(
                tenant_id = %tenant,
                code = %summary.session.code,
                merma = summary.merma,
                "Preselection output plus discard exceeds input"
            );
        }
        Ok(summary)
    }

    async fn publish_preselection(&self, session: &PreselectionSession) {
        self.publish(PackingEvent::PreselectionUpdated {
            tenant_id: session.tenant_id.clone(),
            session_id: session.id,
            code: session.code.clone(),
            status: session.timing.status,
            timestamp: self.now(),
        })
        .await;
    }
}
