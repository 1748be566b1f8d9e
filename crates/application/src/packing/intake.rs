//! Balanza: truck entries and weighed-in bins.

use super::PackingService;
use domain::PackingEvent;
use domain::code::CodeKind;
use domain::error::Result;
use domain::packing::{
    Bin, BinFilter, NewBin, NewTruckEntry, TruckEntry, TruckEntrySummary,
};
use domain::tenant::AccessScope;
use tracing::{debug, info};
use uuid::Uuid;

impl PackingService {
    pub async fn create_truck_entry(
        &self,
        scope: &AccessScope,
        new: NewTruckEntry,
    ) -> Result<TruckEntry> {
        let tenant = self.authorize(scope)?;
        let now = self.now();

        let entry = TruckEntry::register(tenant.clone(), Some(scope.user_id.clone()), new, now)?;
        self.store.insert_truck_entry(&entry).await?;

        info!(tenant_id = %tenant, id = %entry.id, remito = %entry.remito_number, "Truck entry registered");
        self.publish(PackingEvent::TruckEntryRegistered {
            tenant_id: tenant.clone(),
            entry_id: entry.id,
            remito_number: entry.remito_number.clone(),
            timestamp: now,
        })
        .await;

        Ok(entry)
    }

    pub async fn finalize_truck_entry(&self, scope: &AccessScope, id: Uuid) -> Result<TruckEntry> {
        let tenant = self.authorize(scope)?;
        let mut entry = self.truck_entry(tenant, id).await?;

        let from = entry.status;
        let to = from.finalize()?;
        self.store
            .update_truck_entry_status(tenant, id, from, to)
            .await?;
        entry.status = to;

        info!(tenant_id = %tenant, id = %id, "Truck entry finalized");
        self.publish(PackingEvent::TruckEntryFinalized {
            tenant_id: tenant.clone(),
            entry_id: id,
            timestamp: self.now(),
        })
        .await;

        Ok(entry)
    }

    /// Weighs a bin in; it starts its life in the yard
    pub async fn create_bin(&self, scope: &AccessScope, new: NewBin) -> Result<Bin> {
        let tenant = self.authorize(scope)?;
        let new = new.normalized()?;
        if let Some(entry_id) = new.truck_entry_id {
            // Finalized entries still accept late bins
            self.truck_entry(tenant, entry_id).await?;
        }

        let now = self.now();
        let code = self.next_code(tenant, CodeKind::Bin, now).await?;
        let bin = Bin::weigh_in(tenant.clone(), code, new, now);
        self.store.insert_bin(&bin).await?;

        info!(tenant_id = %tenant, code = %bin.code, id = %bin.id, net_weight = bin.net_weight, "Bin weighed in");
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

    pub async fn list_truck_entries(&self, scope: &AccessScope) -> Result<Vec<TruckEntrySummary>> {
        let tenant = self.authorize(scope)?;
        let entries = self.store.list_truck_entries(tenant).await?;
        debug!(tenant_id = %tenant, count = entries.len(), "Listing truck entries");

        let mut summaries = Vec::with_capacity(entries.len());
        for entry in entries {
            let filter = BinFilter {
                truck_entry_id: Some(entry.id),
                ..Default::default()
            };
            let bins = self.store.list_bins(tenant, &filter).await?;
            summaries.push(TruckEntrySummary::new(entry, bins));
        }
        Ok(summaries)
    }

    pub async fn list_bins(&self, scope: &AccessScope, filter: &BinFilter) -> Result<Vec<Bin>> {
        let tenant = self.authorize(scope)?;
        self.store.list_bins(tenant, filter).await
    }
}
