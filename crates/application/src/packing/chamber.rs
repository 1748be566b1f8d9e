use super::{PackingService, RECENT_TASKS, first_missing, unique_ids};
use domain::{DomainError, PackingEvent};
use domain::error::{EntityKind, Result};
use domain::packing::{
    Bin, BinEvent, BinFilter, BinStatus, BinTransition, Chamber, ChamberSummary, ChamberTask,
    NewChamber, NewChamberTask, plan_bin,
};
use domain::tenant::{AccessScope, TenantId};
use tracing::{info, warn};
use uuid::Uuid;

impl PackingService {
    pub async fn create_chamber(&self, scope: &AccessScope, new: NewChamber) -> Result<Chamber> {
        let tenant = self.authorize(scope)?;
        let now = self.now();

        let chamber = Chamber::create(tenant.clone(), new, now)?;
        self.store.insert_chamber(&chamber).await?;

        info!(tenant_id = %tenant, id = %chamber.id, name = %chamber.name, kind = %chamber.kind, "Chamber created");
        self.publish_chamber(tenant, chamber.id).await;
        Ok(chamber)
    }

    /// Loads a batch of bins into a chamber in one transaction.
    ///
    /// Capacity is advisory: exceeding it is logged, never rejected.
    pub async fn ingress_bins_to_chamber(
        &self,
        scope: &AccessScope,
        chamber_id: Uuid,
        bin_ids: &[Uuid],
    ) -> Result<ChamberSummary> {
        let tenant = self.authorize(scope)?;
        let ids = unique_ids(bin_ids, "binIds")?;
        let chamber = self.chamber(tenant, chamber_id).await?;

        let bins = self.store.find_bins(tenant, &ids).await?;
        if let Some(missing) = first_missing(&ids, bins.iter().map(|b| b.id)) {
            return Err(DomainError::not_found(EntityKind::Bin, missing));
        }

        let now = self.now();
        let transitions = bins
            .iter()
            .map(|bin| plan_bin(bin, BinEvent::IngressChamber { chamber_id }, now))
            .collect::<Result<Vec<BinTransition>>>()?;
        self.store
            .apply_bin_transitions(tenant, &transitions, now)
            .await?;

        let summary = self.summarize_chamber(tenant, chamber).await?;
        info!(
            tenant_id = %tenant,
            chamber = %summary.chamber.name,
            moved = transitions.len(),
            bin_count = summary.bin_count,
            "Bins entered chamber"
        );
        self.publish(PackingEvent::BinsMoved {
            tenant_id: tenant.clone(),
            bin_ids: ids,
            status: BinStatus::InChamber,
            timestamp: now,
        })
        .await;
        self.publish_chamber(tenant, chamber_id).await;
        Ok(summary)
    }

    /// Takes a bin out of its chamber; it becomes ready for process
    pub async fn egress_bin_from_chamber(&self, scope: &AccessScope, bin_id: Uuid) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let bin = self.bin(tenant, bin_id).await?;
        let chamber_id = bin.chamber_id;

        let bin = self.move_bin(tenant, bin, BinEvent::EgressChamber).await?;
        info!(tenant_id = %tenant, code = %bin.code, "Bin left chamber");
        if let Some(chamber_id) = chamber_id {
            self.publish_chamber(tenant, chamber_id).await;
        }
        Ok(bin)
    }

    pub async fn discard_bin(&self, scope: &AccessScope, bin_id: Uuid) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let bin = self.bin(tenant, bin_id).await?;
        let chamber_id = bin.chamber_id;

        let bin = self.move_bin(tenant, bin, BinEvent::Discard).await?;
        info!(tenant_id = %tenant, code = %bin.code, "Bin discarded");
        if let Some(chamber_id) = chamber_id {
            self.publish_chamber(tenant, chamber_id).await;
        }
        Ok(bin)
    }

    pub async fn register_chamber_task(
        &self,
        scope: &AccessScope,
        chamber_id: Uuid,
        new: NewChamberTask,
    ) -> Result<ChamberTask> {
        let tenant = self.authorize(scope)?;
        let chamber = self.chamber(tenant, chamber_id).await?;

        let task = new.into_task(chamber.id, self.now())?;
        self.store.insert_chamber_task(&task).await?;

        info!(tenant_id = %tenant, chamber = %chamber.name, task_type = %task.task_type, "Chamber task registered");
        self.publish_chamber(tenant, chamber.id).await;
        Ok(task)
    }

    pub async fn update_chamber_settings(
        &self,
        scope: &AccessScope,
        chamber_id: Uuid,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> Result<Chamber> {
        let tenant = self.authorize(scope)?;
        let mut chamber = self.chamber(tenant, chamber_id).await?;

        self.store
            .update_chamber_settings(tenant, chamber_id, temperature, humidity)
            .await?;
        chamber.temperature = temperature;
        chamber.humidity = humidity;

        info!(tenant_id = %tenant, chamber = %chamber.name, ?temperature, ?humidity, "Chamber settings updated");
        self.publish_chamber(tenant, chamber_id).await;
        Ok(chamber)
    }

    pub async fn list_chambers(&self, scope: &AccessScope) -> Result<Vec<ChamberSummary>> {
        let tenant = self.authorize(scope)?;
        self.chamber_summaries(tenant).await
    }

    pub(super) async fn chamber_summaries(&self, tenant: &TenantId) -> Result<Vec<ChamberSummary>> {
        let chambers = self.store.list_chambers(tenant).await?;
        let mut summaries = Vec::with_capacity(chambers.len());
        for chamber in chambers {
            summaries.push(self.summarize_chamber(tenant, chamber).await?);
        }
        Ok(summaries)
    }

    async fn summarize_chamber(&self, tenant: &TenantId, chamber: Chamber) -> Result<ChamberSummary> {
        let filter = BinFilter {
            statuses: vec![BinStatus::InChamber],
            chamber_id: Some(chamber.id),
            ..Default::default()
        };
        let bins = self.store.list_bins(tenant, &filter).await?;
        let tasks = self.store.chamber_tasks(chamber.id, RECENT_TASKS).await?;

        let summary = ChamberSummary::new(chamber, bins, tasks);
        if summary.over_capacity {
            warn!(
                tenant_id = %tenant,
                chamber = %summary.chamber.name,
                bin_count = summary.bin_count,
                capacity = summary.chamber.capacity,
                "Chamber over capacity"
            );
        }
        Ok(summary)
    }

    async fn publish_chamber(&self, tenant: &TenantId, chamber_id: Uuid) {
        self.publish(PackingEvent::ChamberUpdated {
            tenant_id: tenant.clone(),
            chamber_id,
            timestamp: self.now(),
        })
        .await;
    }
}
