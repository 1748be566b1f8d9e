use super::{PackingService, first_missing, unique_ids};
use domain::code::CodeKind;
use domain::error::{EntityKind, Result};
use domain::packing::{BoxFilter, Pallet, PalletStatus, PalletSummary};
use domain::tenant::{AccessScope, TenantId};
use domain::{DomainError, PackingEvent};
use tracing::info;
use uuid::Uuid;

impl PackingService {
    /// Stacks loose boxes onto a new pallet.
    ///
    /// A box already on another pallet rejects the whole pallet.
    pub async fn create_pallet(
        &self,
        scope: &AccessScope,
        box_ids: &[Uuid],
        operator_name: Option<String>,
    ) -> Result<Pallet> {
        let tenant = self.authorize(scope)?;
        let ids = unique_ids(box_ids, "boxIds")?;

        let boxes = self.store.find_boxes(tenant, &ids).await?;
        if let Some(missing) = first_missing(&ids, boxes.iter().map(|b| b.id)) {
            return Err(DomainError::not_found(EntityKind::PackedBox, missing));
        }
        if let Some(taken) = boxes.iter().find(|b| b.pallet_id.is_some()) {
            return Err(DomainError::Conflict(format!(
                "la caja {} ya está en un pallet",
                taken.code
            )));
        }

        let now = self.now();
        let code = self.next_code(tenant, CodeKind::Pallet, now).await?;
        let number = pallet_number(&code)?;
        let pallet = Pallet::assemble(tenant.clone(), number, code, operator_name, now);
        self.store.insert_pallet(&pallet, &ids).await?;

        info!(tenant_id = %tenant, code = %pallet.code, number = pallet.number, boxes = ids.len(), "Pallet assembled");
        self.publish(PackingEvent::PalletAssembled {
            tenant_id: tenant.clone(),
            pallet_id: pallet.id,
            code: pallet.code.clone(),
            box_count: ids.len(),
            timestamp: now,
        })
        .await;
        Ok(pallet)
    }

    pub async fn list_pallets(
        &self,
        scope: &AccessScope,
        status: Option<PalletStatus>,
    ) -> Result<Vec<PalletSummary>> {
        let tenant = self.authorize(scope)?;
        let pallets = self.store.list_pallets(tenant, status).await?;
        self.pallet_summaries(tenant, pallets).await
    }

    pub(super) async fn pallet_summaries(
        &self,
        tenant: &TenantId,
        pallets: Vec<Pallet>,
    ) -> Result<Vec<PalletSummary>> {
        let mut summaries = Vec::with_capacity(pallets.len());
        for pallet in pallets {
            let filter = BoxFilter {
                pallet_id: Some(pallet.id),
                ..Default::default()
            };
            let boxes = self.store.list_boxes(tenant, &filter).await?;
            summaries.push(PalletSummary::new(pallet, &boxes));
        }
        Ok(summaries)
    }
}

/// Pallet number stored alongside the code, e.g. 4 for `P-2024-0004`
fn pallet_number(code: &str) -> Result<i32> {
    let seq = CodeKind::Pallet.parse_sequence(code)?;
    i32::try_from(seq)
        .map_err(|_| DomainError::Conflict(format!("secuencia P agotada en {code}")))
}
