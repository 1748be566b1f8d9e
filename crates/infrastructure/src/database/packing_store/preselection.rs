use super::bins::bins_in_order;
use super::convert::{
    input_from_model, input_model, parse_uuid, preselection_from_model, preselection_model,
    slot_from_model, slot_model, worker_from_model, worker_model,
};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows};
use crate::database::entities::{
    preselection_bins, preselection_inputs, preselection_output_slots, preselection_sessions,
    preselection_workers,
};
use async_trait::async_trait;
use domain::packing::{
    Bin, OutputSlot, PreselectionRepository, PreselectionSession, PreselectionWorker,
    SessionInput, SessionStatus,
};
use domain::tenant::TenantId;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Loads the output configuration of every session in one query
async fn slots_by_session<C>(
    conn: &C,
    sessions: &[preselection_sessions::Model],
) -> Result<HashMap<String, Vec<OutputSlot>>>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<String, Vec<OutputSlot>> = HashMap::new();
    if sessions.is_empty() {
        return Ok(grouped);
    }

    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    let rows = preselection_output_slots::Entity::find()
        .filter(preselection_output_slots::Column::PreselectionId.is_in(ids))
        .order_by_asc(preselection_output_slots::Column::OutputNumber)
        .all(conn)
        .await
        .map_err(db_err)?;

    for row in rows {
        grouped
            .entry(row.preselection_id.clone())
            .or_default()
            .push(slot_from_model(row));
    }
    Ok(grouped)
}

#[async_trait]
impl PreselectionRepository for SeaOrmPackingStore {
    async fn insert_preselection(&self, session: &PreselectionSession) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        preselection_sessions::Entity::insert(preselection_model(session))
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        if !session.output_config.is_empty() {
            let slots = session
                .output_config
                .iter()
                .map(|slot| slot_model(session.id, slot));
            preselection_output_slots::Entity::insert_many(slots)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)
    }

    async fn find_preselection(
        &self,
        tenant: &TenantId,
        id: Uuid,
    ) -> Result<Option<PreselectionSession>> {
        let Some(model) = preselection_sessions::Entity::find_by_id(id.to_string())
            .filter(preselection_sessions::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let slots = preselection_output_slots::Entity::find()
            .filter(preselection_output_slots::Column::PreselectionId.eq(model.id.as_str()))
            .order_by_asc(preselection_output_slots::Column::OutputNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(slot_from_model)
            .collect();

        preselection_from_model(model, slots).map(Some)
    }

    async fn list_preselections(&self, tenant: &TenantId) -> Result<Vec<PreselectionSession>> {
        let models = preselection_sessions::Entity::find()
            .filter(preselection_sessions::Column::TenantId.eq(tenant.as_str()))
            .order_by_desc(preselection_sessions::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut slots = slots_by_session(&self.db, &models).await?;
        models
            .into_iter()
            .map(|m| {
                let config = slots.remove(&m.id).unwrap_or_default();
                preselection_from_model(m, config)
            })
            .collect()
    }

    async fn save_preselection(
        &self,
        session: &PreselectionSession,
        expected: SessionStatus,
    ) -> Result<()> {
        let mut changes = preselection_model(session);
        changes.id = NotSet;
        changes.tenant_id = NotSet;
        changes.code = NotSet;

        let result = preselection_sessions::Entity::update_many()
            .set(changes)
            .filter(preselection_sessions::Column::Id.eq(session.id.to_string()))
            .filter(preselection_sessions::Column::TenantId.eq(session.tenant_id.as_str()))
            .filter(preselection_sessions::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        expect_rows(
            result.rows_affected,
            1,
            format!("preselección {} ({expected})", session.code),
        )
    }

    async fn preselection_input_bins(&self, tenant: &TenantId, id: Uuid) -> Result<Vec<Bin>> {
        let bin_ids: Vec<String> = preselection_bins::Entity::find()
            .select_only()
            .column(preselection_bins::Column::BinId)
            .filter(preselection_bins::Column::PreselectionId.eq(id.to_string()))
            .order_by_asc(preselection_bins::Column::AddedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids = bin_ids
            .iter()
            .map(|s| parse_uuid(s))
            .collect::<Result<Vec<_>>>()?;
        bins_in_order(&self.db, tenant, &ids).await
    }

    async fn insert_preselection_worker(&self, worker: &PreselectionWorker) -> Result<()> {
        preselection_workers::Entity::insert(worker_model(worker))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn preselection_workers(&self, id: Uuid) -> Result<Vec<PreselectionWorker>> {
        preselection_workers::Entity::find()
            .filter(preselection_workers::Column::PreselectionId.eq(id.to_string()))
            .order_by_asc(preselection_workers::Column::WorkerId)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(worker_from_model)
            .collect()
    }

    async fn insert_preselection_input(&self, input: &SessionInput) -> Result<()> {
        preselection_inputs::Entity::insert(input_model(input))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn preselection_inputs(&self, id: Uuid) -> Result<Vec<SessionInput>> {
        preselection_inputs::Entity::find()
            .filter(preselection_inputs::Column::PreselectionId.eq(id.to_string()))
            .order_by_asc(preselection_inputs::Column::ItemName)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(input_from_model)
            .collect()
    }
}
