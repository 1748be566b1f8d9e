use super::bins::{apply_transitions, bins_in_order};
use super::convert::{
    parse_uuid, process_from_model, process_model, product_from_model, product_model,
};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows};
use crate::database::entities::{process_bins, process_products, process_sessions};
use async_trait::async_trait;
use domain::error::DomainError;
use domain::packing::{
    Bin, BinStatus, BinTransition, ProcessProduct, ProcessRepository, ProcessSession,
    SessionStatus,
};
use domain::tenant::TenantId;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

/// Bins joined to the session, in the order they were added
async fn input_bins<C>(conn: &C, tenant: &TenantId, id: Uuid) -> Result<Vec<Bin>>
where
    C: ConnectionTrait,
{
    let bin_ids: Vec<String> = process_bins::Entity::find()
        .select_only()
        .column(process_bins::Column::BinId)
        .filter(process_bins::Column::ProcessSessionId.eq(id.to_string()))
        .order_by_asc(process_bins::Column::AddedAt)
        .into_tuple()
        .all(conn)
        .await
        .map_err(db_err)?;

    let ids = bin_ids
        .iter()
        .map(|s| parse_uuid(s))
        .collect::<Result<Vec<_>>>()?;
    bins_in_order(conn, tenant, &ids).await
}

/// Guarded write of the mutable session columns
async fn save_guarded<C>(conn: &C, session: &ProcessSession, expected: SessionStatus) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut changes = process_model(session);
    changes.id = NotSet;
    changes.tenant_id = NotSet;
    changes.code = NotSet;
    // Discard totals are only ever incremented in place
    changes.clean_discard_kg = NotSet;
    changes.contaminated_discard_kg = NotSet;

    let result = process_sessions::Entity::update_many()
        .set(changes)
        .filter(process_sessions::Column::Id.eq(session.id.to_string()))
        .filter(process_sessions::Column::TenantId.eq(session.tenant_id.as_str()))
        .filter(process_sessions::Column::Status.eq(expected.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;

    expect_rows(
        result.rows_affected,
        1,
        format!("proceso {} ({expected})", session.code),
    )
}

#[async_trait]
impl ProcessRepository for SeaOrmPackingStore {
    async fn insert_process(&self, session: &ProcessSession) -> Result<()> {
        process_sessions::Entity::insert(process_model(session))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_process(&self, tenant: &TenantId, id: Uuid) -> Result<Option<ProcessSession>> {
        process_sessions::Entity::find_by_id(id.to_string())
            .filter(process_sessions::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(process_from_model)
            .transpose()
    }

    async fn list_processes(&self, tenant: &TenantId) -> Result<Vec<ProcessSession>> {
        process_sessions::Entity::find()
            .filter(process_sessions::Column::TenantId.eq(tenant.as_str()))
            .order_by_desc(process_sessions::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(process_from_model)
            .collect()
    }

    async fn save_process(
        &self,
        session: &ProcessSession,
        expected: SessionStatus,
    ) -> Result<()> {
        save_guarded(&self.db, session, expected).await
    }

    async fn complete_process(
        &self,
        session: &ProcessSession,
        expected: SessionStatus,
        bins: &[BinTransition],
    ) -> Result<()> {
        let finished_at = session.timing.end_time.unwrap_or(session.timing.start_time);

        let txn = self.db.begin().await.map_err(db_err)?;
        save_guarded(&txn, session, expected).await?;

        // A bin that joined after the caller planned the batch would be left
        // IN_PROCESS on a completed session
        let mut in_process: Vec<Uuid> = input_bins(&txn, &session.tenant_id, session.id)
            .await?
            .into_iter()
            .filter(|b| b.status == BinStatus::InProcess)
            .map(|b| b.id)
            .collect();
        let mut planned: Vec<Uuid> = bins.iter().map(|t| t.bin_id).collect();
        in_process.sort();
        planned.sort();
        if in_process != planned {
            return Err(DomainError::Conflict(format!(
                "el proceso {} recibió bins durante el cierre",
                session.code
            )));
        }

        apply_transitions(&txn, &session.tenant_id, bins, finished_at).await?;
        txn.commit().await.map_err(db_err)
    }

    async fn add_process_discard(
        &self,
        tenant: &TenantId,
        id: Uuid,
        clean_kg: f64,
        contaminated_kg: f64,
    ) -> Result<()> {
        let result = process_sessions::Entity::update_many()
            .col_expr(
                process_sessions::Column::CleanDiscardKg,
                Expr::col(process_sessions::Column::CleanDiscardKg).add(clean_kg),
            )
            .col_expr(
                process_sessions::Column::ContaminatedDiscardKg,
                Expr::col(process_sessions::Column::ContaminatedDiscardKg).add(contaminated_kg),
            )
            .filter(process_sessions::Column::Id.eq(id.to_string()))
            .filter(process_sessions::Column::TenantId.eq(tenant.as_str()))
            .filter(process_sessions::Column::Status.ne(SessionStatus::Completed.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        expect_rows(result.rows_affected, 1, format!("descarte del proceso {id}"))
    }

    async fn process_input_bins(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Bin>> {
        input_bins(&self.db, tenant, id).await
    }

    async fn insert_process_product(&self, product: &ProcessProduct) -> Result<()> {
        process_products::Entity::insert(product_model(product))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn process_products(&self, id: Uuid) -> Result<Vec<ProcessProduct>> {
        process_products::Entity::find()
            .filter(process_products::Column::ProcessSessionId.eq(id.to_string()))
            .order_by_asc(process_products::Column::ProductName)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(product_from_model)
            .collect()
    }
}
