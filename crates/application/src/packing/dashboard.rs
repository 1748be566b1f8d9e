use super::PackingService;
use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Utc};
use domain::error::Result;
use domain::kpi::{round2, total_kg};
use domain::packing::{
    BinFilter, BinStatus, BoxFilter, FlowCounts, PackingDashboard, PalletStatus,
};
use domain::tenant::{AccessScope, TenantId};
use tracing::debug;

impl PackingService {
    /// Live snapshot of the whole pipeline for the packing home screen
    pub async fn dashboard(&self, scope: &AccessScope) -> Result<PackingDashboard> {
        let tenant = self.authorize(scope)?;
        let now = self.now();
        let today = start_of_day(now);

        let bins_in_yard = self.count_bins(tenant, BinStatus::InYard).await?;
        let processed_filter = BinFilter {
            statuses: vec![BinStatus::InProcess, BinStatus::Processed],
            updated_since: Some(today),
            ..Default::default()
        };
        let processed = self.store.list_bins(tenant, &processed_filter).await?;
        let kg_processed_today = round2(total_kg(processed.iter().map(|b| b.net_weight)));

        let box_filter = BoxFilter {
            created_since: Some(today),
            ..Default::default()
        };
        let boxes_today = self.store.list_boxes(tenant, &box_filter).await?.len();

        let flow = FlowCounts {
            truck_entries_today: self
                .store
                .list_truck_entries(tenant)
                .await?
                .iter()
                .filter(|e| e.entry_date >= today)
                .count(),
            bins_in_preselection: self.count_bins(tenant, BinStatus::InPreselection).await?,
            bins_in_chamber: self.count_bins(tenant, BinStatus::InChamber).await?,
            bins_in_process: self.count_bins(tenant, BinStatus::InProcess).await?,
            pallets_on_floor: self
                .store
                .list_pallets(tenant, Some(PalletStatus::OnFloor))
                .await?
                .len(),
            dispatches_this_month: self
                .store
                .list_dispatches(tenant)
                .await?
                .iter()
                .filter(|d| d.created_at >= start_of_month(now))
                .count(),
        };

        let chambers = self.chamber_summaries(tenant).await?;

        let active_preselection = match self
            .store
            .list_preselections(tenant)
            .await?
            .into_iter()
            .find(|s| s.timing.status.is_open())
        {
            Some(session) => Some(self.summarize_preselection(tenant, session).await?),
            None => None,
        };
        let active_process = match self
            .store
            .list_processes(tenant)
            .await?
            .into_iter()
            .find(|s| s.timing.status.is_open())
        {
            Some(session) => Some(self.summarize_process(tenant, session).await?),
            None => None,
        };
        let line_efficiency = active_process.as_ref().map_or(0.0, |p| p.efficiency);

        debug!(
            tenant_id = %tenant,
            bins_in_yard,
            kg_processed_today,
            boxes_today,
            line_efficiency,
            "Dashboard computed"
        );
        Ok(PackingDashboard {
            bins_in_yard,
            kg_processed_today,
            boxes_today,
            line_efficiency,
            flow,
            chambers,
            active_preselection,
            active_process,
        })
    }

    async fn count_bins(&self, tenant: &TenantId, status: BinStatus) -> Result<usize> {
        Ok(self
            .store
            .list_bins(tenant, &BinFilter::status(status))
            .await?
            .len())
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_and_month_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 17, 42, 5).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            start_of_month(now),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }
}
