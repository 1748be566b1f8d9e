use super::{PackingService, first_missing};
use domain::code::CodeKind;
use domain::error::{EntityKind, Result};
use domain::packing::{Dispatch, DispatchStatus, DispatchSummary, NewDispatch};
use domain::tenant::AccessScope;
use domain::{DomainError, PackingEvent};
use tracing::info;
use uuid::Uuid;

impl PackingService {
    /// Ships pallets still on the floor; each pallet ships once
    pub async fn create_dispatch(&self, scope: &AccessScope, new: NewDispatch) -> Result<Dispatch> {
        let tenant = self.authorize(scope)?;
        let now = self.now();

        let (mut dispatch, pallet_ids) = Dispatch::prepare(tenant.clone(), String::new(), new, now)?;
        if !pallet_ids.is_empty() {
            let pallets = self.store.find_pallets(tenant, &pallet_ids).await?;
            if let Some(missing) = first_missing(&pallet_ids, pallets.iter().map(|p| p.id)) {
                return Err(DomainError::not_found(EntityKind::Pallet, missing));
            }
            for pallet in &pallets {
                pallet.status.dispatch()?;
            }
        }

        dispatch.code = self.next_code(tenant, CodeKind::Dispatch, now).await?;
        self.store.insert_dispatch(&dispatch, &pallet_ids).await?;

        info!(
            tenant_id = %tenant,
            code = %dispatch.code,
            client = %dispatch.client_name,
            pallets = pallet_ids.len(),
            "Dispatch created"
        );
        self.publish_dispatch(&dispatch).await;
        Ok(dispatch)
    }

    /// Moves a dispatch exactly one step along PREPARING → LOADED →
    /// IN_TRANSIT → DELIVERED
    pub async fn update_dispatch_status(
        &self,
        scope: &AccessScope,
        dispatch_id: Uuid,
        status: &str,
    ) -> Result<Dispatch> {
        let tenant = self.authorize(scope)?;
        let target: DispatchStatus = status.parse()?;
        let mut dispatch = self.dispatch(tenant, dispatch_id).await?;

        let from = dispatch.status;
        let to = from.advance_to(target)?;
        self.store
            .update_dispatch_status(tenant, dispatch_id, from, to)
            .await?;
        dispatch.status = to;

        info!(tenant_id = %tenant, code = %dispatch.code, %from, %to, "Dispatch status updated");
        self.publish_dispatch(&dispatch).await;
        Ok(dispatch)
    }

    pub async fn list_dispatches(&self, scope: &AccessScope) -> Result<Vec<DispatchSummary>> {
        let tenant = self.authorize(scope)?;
        let dispatches = self.store.list_dispatches(tenant).await?;

        let mut summaries = Vec::with_capacity(dispatches.len());
        for dispatch in dispatches {
            let pallets = self.store.dispatch_pallets(tenant, dispatch.id).await?;
            let pallets = self.pallet_summaries(tenant, pallets).await?;
            summaries.push(DispatchSummary::new(dispatch, pallets));
        }
        Ok(summaries)
    }

    async fn publish_dispatch(&self, dispatch: &Dispatch) {
        self.publish(PackingEvent::DispatchUpdated {
            tenant_id: dispatch.tenant_id.clone(),
            dispatch_id: dispatch.id,
            code: dispatch.code.clone(),
            status: dispatch.status,
            timestamp: self.now(),
        })
        .await;
    }
}
