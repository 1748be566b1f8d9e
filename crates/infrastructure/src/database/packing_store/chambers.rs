use super::convert::{chamber_from_model, chamber_model, chamber_task_from_model, chamber_task_model};
use super::{Result, SeaOrmPackingStore, db_err, not_found};
use crate::database::entities::{chamber_tasks, chambers};
use async_trait::async_trait;
use domain::error::EntityKind;
use domain::packing::{Chamber, ChamberRepository, ChamberTask};
use domain::tenant::TenantId;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

#[async_trait]
impl ChamberRepository for SeaOrmPackingStore {
    async fn insert_chamber(&self, chamber: &Chamber) -> Result<()> {
        chambers::Entity::insert(chamber_model(chamber))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_chamber(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Chamber>> {
        chambers::Entity::find_by_id(id.to_string())
            .filter(chambers::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(chamber_from_model)
            .transpose()
    }

    async fn list_chambers(&self, tenant: &TenantId) -> Result<Vec<Chamber>> {
        chambers::Entity::find()
            .filter(chambers::Column::TenantId.eq(tenant.as_str()))
            .order_by_asc(chambers::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(chamber_from_model)
            .collect()
    }

    async fn update_chamber_settings(
        &self,
        tenant: &TenantId,
        id: Uuid,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> Result<()> {
        let result = chambers::Entity::update_many()
            .col_expr(chambers::Column::Temperature, Expr::value(temperature))
            .col_expr(chambers::Column::Humidity, Expr::value(humidity))
            .filter(chambers::Column::Id.eq(id.to_string()))
            .filter(chambers::Column::TenantId.eq(tenant.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(not_found(EntityKind::Chamber, id));
        }
        Ok(())
    }

    async fn insert_chamber_task(&self, task: &ChamberTask) -> Result<()> {
        chamber_tasks::Entity::insert(chamber_task_model(task))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn chamber_tasks(&self, chamber_id: Uuid, limit: u64) -> Result<Vec<ChamberTask>> {
        chamber_tasks::Entity::find()
            .filter(chamber_tasks::Column::ChamberId.eq(chamber_id.to_string()))
            .order_by_desc(chamber_tasks::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(chamber_task_from_model)
            .collect()
    }
}
