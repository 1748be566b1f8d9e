use super::convert::{box_from_model, box_model, pallet_from_model, pallet_model};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows, id_strings};
use crate::database::entities::{boxes, pallets};
use async_trait::async_trait;
use domain::packing::{BoxFilter, PackedBox, Pallet, PalletRepository, PalletStatus};
use domain::tenant::TenantId;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

#[async_trait]
impl PalletRepository for SeaOrmPackingStore {
    async fn insert_box(&self, packed: &PackedBox) -> Result<()> {
        boxes::Entity::insert(box_model(packed))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_boxes(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<PackedBox>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        boxes::Entity::find()
            .filter(boxes::Column::TenantId.eq(tenant.as_str()))
            .filter(boxes::Column::Id.is_in(id_strings(ids)))
            .order_by_asc(boxes::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(box_from_model)
            .collect()
    }

    async fn list_boxes(&self, tenant: &TenantId, filter: &BoxFilter) -> Result<Vec<PackedBox>> {
        let mut query = boxes::Entity::find().filter(boxes::Column::TenantId.eq(tenant.as_str()));

        if let Some(id) = filter.process_session_id {
            query = query.filter(boxes::Column::ProcessSessionId.eq(id.to_string()));
        }
        if let Some(id) = filter.pallet_id {
            query = query.filter(boxes::Column::PalletId.eq(id.to_string()));
        }
        if let Some(since) = filter.created_since {
            query = query.filter(boxes::Column::CreatedAt.gte(since));
        }

        query
            .order_by_desc(boxes::Column::CreatedAt)
            .order_by_desc(boxes::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(box_from_model)
            .collect()
    }

    async fn insert_pallet(&self, pallet: &Pallet, box_ids: &[Uuid]) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        pallets::Entity::insert(pallet_model(pallet))
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        if !box_ids.is_empty() {
            let claimed = boxes::Entity::update_many()
                .col_expr(boxes::Column::PalletId, Expr::value(pallet.id.to_string()))
                .filter(boxes::Column::TenantId.eq(pallet.tenant_id.as_str()))
                .filter(boxes::Column::Id.is_in(id_strings(box_ids)))
                .filter(boxes::Column::PalletId.is_null())
                .exec(&txn)
                .await
                .map_err(db_err)?;

            expect_rows(
                claimed.rows_affected,
                box_ids.len(),
                format!("cajas libres para el pallet {}", pallet.code),
            )?;
        }

        txn.commit().await.map_err(db_err)
    }

    async fn find_pallets(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<Pallet>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        pallets::Entity::find()
            .filter(pallets::Column::TenantId.eq(tenant.as_str()))
            .filter(pallets::Column::Id.is_in(id_strings(ids)))
            .order_by_asc(pallets::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(pallet_from_model)
            .collect()
    }

    async fn list_pallets(
        &self,
        tenant: &TenantId,
        status: Option<PalletStatus>,
    ) -> Result<Vec<Pallet>> {
        let mut query =
            pallets::Entity::find().filter(pallets::Column::TenantId.eq(tenant.as_str()));
        if let Some(status) = status {
            query = query.filter(pallets::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(pallets::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(pallet_from_model)
            .collect()
    }
}
