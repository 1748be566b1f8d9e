use super::convert::{truck_entry_from_model, truck_entry_model};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows};
use crate::database::entities::truck_entries;
use async_trait::async_trait;
use domain::packing::{TruckEntry, TruckEntryRepository, TruckEntryStatus};
use domain::tenant::TenantId;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

#[async_trait]
impl TruckEntryRepository for SeaOrmPackingStore {
    async fn insert_truck_entry(&self, entry: &TruckEntry) -> Result<()> {
        truck_entries::Entity::insert(truck_entry_model(entry))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_truck_entry(&self, tenant: &TenantId, id: Uuid) -> Result<Option<TruckEntry>> {
        truck_entries::Entity::find_by_id(id.to_string())
            .filter(truck_entries::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(truck_entry_from_model)
            .transpose()
    }

    async fn list_truck_entries(&self, tenant: &TenantId) -> Result<Vec<TruckEntry>> {
        truck_entries::Entity::find()
            .filter(truck_entries::Column::TenantId.eq(tenant.as_str()))
            .order_by_desc(truck_entries::Column::EntryDate)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(truck_entry_from_model)
            .collect()
    }

    async fn update_truck_entry_status(
        &self,
        tenant: &TenantId,
        id: Uuid,
        from: TruckEntryStatus,
        to: TruckEntryStatus,
    ) -> Result<()> {
        let result = truck_entries::Entity::update_many()
            .col_expr(truck_entries::Column::Status, Expr::value(to.as_str()))
            .filter(truck_entries::Column::Id.eq(id.to_string()))
            .filter(truck_entries::Column::TenantId.eq(tenant.as_str()))
            .filter(truck_entries::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        expect_rows(result.rows_affected, 1, format!("ingreso {id}"))
    }
}
