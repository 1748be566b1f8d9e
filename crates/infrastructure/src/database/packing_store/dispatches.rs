use super::convert::{dispatch_from_model, dispatch_model, pallet_from_model};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows, id_strings};
use crate::database::entities::{dispatch_pallets, dispatches, pallets};
use async_trait::async_trait;
use domain::packing::{Dispatch, DispatchRepository, DispatchStatus, Pallet, PalletStatus};
use domain::tenant::TenantId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

#[async_trait]
impl DispatchRepository for SeaOrmPackingStore {
    async fn insert_dispatch(&self, dispatch: &Dispatch, pallet_ids: &[Uuid]) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        dispatches::Entity::insert(dispatch_model(dispatch))
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        if !pallet_ids.is_empty() {
            let links = pallet_ids.iter().map(|pallet_id| dispatch_pallets::ActiveModel {
                dispatch_id: Set(dispatch.id.to_string()),
                pallet_id: Set(pallet_id.to_string()),
            });
            dispatch_pallets::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;

            let moved = pallets::Entity::update_many()
                .col_expr(
                    pallets::Column::Status,
                    Expr::value(PalletStatus::Dispatched.as_str()),
                )
                .filter(pallets::Column::TenantId.eq(dispatch.tenant_id.as_str()))
                .filter(pallets::Column::Id.is_in(id_strings(pallet_ids)))
                .filter(pallets::Column::Status.eq(PalletStatus::OnFloor.as_str()))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            expect_rows(
                moved.rows_affected,
                pallet_ids.len(),
                format!("pallets en piso para el despacho {}", dispatch.code),
            )?;
        }

        txn.commit().await.map_err(db_err)
    }

    async fn find_dispatch(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Dispatch>> {
        dispatches::Entity::find_by_id(id.to_string())
            .filter(dispatches::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(dispatch_from_model)
            .transpose()
    }

    async fn list_dispatches(&self, tenant: &TenantId) -> Result<Vec<Dispatch>> {
        dispatches::Entity::find()
            .filter(dispatches::Column::TenantId.eq(tenant.as_str()))
            .order_by_desc(dispatches::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(dispatch_from_model)
            .collect()
    }

    async fn dispatch_pallets(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Pallet>> {
        let pallet_ids: Vec<String> = dispatch_pallets::Entity::find()
            .select_only()
            .column(dispatch_pallets::Column::PalletId)
            .filter(dispatch_pallets::Column::DispatchId.eq(id.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        if pallet_ids.is_empty() {
            return Ok(Vec::new());
        }
        pallets::Entity::find()
            .filter(pallets::Column::TenantId.eq(tenant.as_str()))
            .filter(pallets::Column::Id.is_in(pallet_ids))
            .order_by_asc(pallets::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(pallet_from_model)
            .collect()
    }

    async fn update_dispatch_status(
        &self,
        tenant: &TenantId,
        id: Uuid,
        from: DispatchStatus,
        to: DispatchStatus,
    ) -> Result<()> {
        let result = dispatches::Entity::update_many()
            .col_expr(dispatches::Column::Status, Expr::value(to.as_str()))
            .filter(dispatches::Column::Id.eq(id.to_string()))
            .filter(dispatches::Column::TenantId.eq(tenant.as_str()))
            .filter(dispatches::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        expect_rows(result.rows_affected, 1, format!("despacho {id}"))
    }
}
