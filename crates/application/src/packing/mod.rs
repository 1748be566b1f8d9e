//! Packing-house use cases.
//!
//! `PackingService` is the only entry point the HTTP layer talks to. Every
//! action checks the caller's role, works inside the caller's tenant,
//! validates before touching storage and publishes a `PackingEvent` once
//! the write has committed.

mod chamber;
mod dashboard;
mod dispatch;
mod intake;
mod palletizing;
mod preselection;
mod process;

use chrono::{DateTime, Datelike, Utc};
use domain::code::CodeKind;
use domain::error::{EntityKind, Result};
use domain::packing::{
    Bin, BinEffect, BinEvent, Chamber, Dispatch, PackingStore, PreselectionSession,
    ProcessSession, TruckEntry, plan_bin,
};
use domain::tenant::{AccessScope, Role, TenantId};
use domain::{Clock, DomainError, EventPublisher, PackingEvent};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Recent chamber tasks shown with each chamber
const RECENT_TASKS: u64 = 5;

pub struct PackingService {
    store: Arc<dyn PackingStore>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl PackingService {
    pub fn new(
        store: Arc<dyn PackingStore>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
        }
    }

    /// Resolves the tenant of a caller allowed to run packing actions
    fn authorize<'a>(&self, scope: &'a AccessScope) -> Result<&'a TenantId> {
        if scope.has_any(Role::PACKING_ROLES) {
            Ok(&scope.tenant_id)
        } else {
            warn!(
                tenant_id = %scope.tenant_id,
                user_id = %scope.user_id,
                role = scope.role.as_str(),
                "Packing action denied"
            );
            Err(DomainError::Unauthorized)
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn next_code(
        &self,
        tenant: &TenantId,
        kind: CodeKind,
        now: DateTime<Utc>,
    ) -> Result<String> {
        self.store.next_code(tenant, kind, now.year()).await
    }

    /// Publication never fails the action that produced the event
    async fn publish(&self, event: PackingEvent) {
        let event_type = event.event_type();
        if let Err(e) = self.publisher.publish(event).await {
            warn!(event_type, error = %e, "Failed to publish packing event");
        }
    }

    /// Applies a single-bin transition and announces it
    async fn move_bin(
        &self,
        tenant: &TenantId,
        mut bin: Bin,
        event: BinEvent,
    ) -> Result<Bin> {
        let now = self.now();
        let transition = plan_bin(&bin, event, now)?;
        self.store
            .apply_bin_transitions(tenant, &[transition], now)
            .await?;

        bin.status = transition.to;
        bin.updated_at = now;
        match transition.effect {
            BinEffect::LeaveChamber { at } => {
                bin.chamber_id = None;
                bin.chamber_exit_date = Some(at);
            }
            BinEffect::ClearChamber => bin.chamber_id = None,
            _ => {}
        }

        self.publish(PackingEvent::BinsMoved {
            tenant_id: tenant.clone(),
            bin_ids: vec![bin.id],
            status: bin.status,
            timestamp: now,
        })
        .await;
        Ok(bin)
    }

    async fn truck_entry(&self, tenant: &TenantId, id: Uuid) -> Result<TruckEntry> {
        self.store
            .find_truck_entry(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::TruckEntry, id))
    }

    async fn bin(&self, tenant: &TenantId, id: Uuid) -> Result<Bin> {
        self.store
            .find_bin(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Bin, id))
    }

    async fn preselection(&self, tenant: &TenantId, id: Uuid) -> Result<PreselectionSession> {
        self.store
            .find_preselection(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Preselection, id))
    }

    async fn chamber(&self, tenant: &TenantId, id: Uuid) -> Result<Chamber> {
        self.store
            .find_chamber(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Chamber, id))
    }

    async fn process(&self, tenant: &TenantId, id: Uuid) -> Result<ProcessSession> {
        self.store
            .find_process(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::ProcessSession, id))
    }

    async fn dispatch(&self, tenant: &TenantId, id: Uuid) -> Result<Dispatch> {
        self.store
            .find_dispatch(tenant, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Dispatch, id))
    }
}

/// Sorted, deduplicated id list; empty input is a missing field
fn unique_ids(ids: &[Uuid], field: &'static str) -> Result<Vec<Uuid>> {
    if ids.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// First requested id that the store did not return
fn first_missing(requested: &[Uuid], found: impl IntoIterator<Item = Uuid>) -> Option<Uuid> {
    let found: Vec<Uuid> = found.into_iter().collect();
    requested.iter().copied().find(|id| !found.contains(id))
}
