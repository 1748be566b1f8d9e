use super::convert::{bin_from_model, bin_model};
use super::{Result, SeaOrmPackingStore, db_err, expect_rows, id_strings};
use crate::database::entities::{
    bins, preselection_bins, preselection_sessions, process_bins, process_sessions,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::error::{DomainError, EntityKind};
use domain::packing::{Bin, BinEffect, BinFilter, BinRepository, BinTransition, SessionStatus};
use domain::tenant::TenantId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Applies bin transitions on `conn`, which callers pass as an open
/// transaction so the whole batch commits or rolls back together.
pub(super) async fn apply_transitions<C>(
    conn: &C,
    tenant: &TenantId,
    transitions: &[BinTransition],
    now: DateTime<Utc>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    for t in transitions {
        match t.effect {
            BinEffect::JoinPreselection { session_id } => {
                claim_open_preselection(conn, tenant, session_id, t).await?
            }
            BinEffect::JoinProcess { session_id } => {
                claim_open_process(conn, tenant, session_id, t).await?
            }
            _ => {}
        }

        let mut update = bins::Entity::update_many()
            .col_expr(bins::Column::Status, Expr::value(t.to.as_str()))
            .col_expr(bins::Column::UpdatedAt, Expr::value(now))
            .filter(bins::Column::Id.eq(t.bin_id.to_string()))
            .filter(bins::Column::TenantId.eq(tenant.as_str()))
            .filter(bins::Column::Status.eq(t.from.as_str()));

        match t.effect {
            BinEffect::EnterChamber { chamber_id, at } => {
                update = update
                    .col_expr(bins::Column::ChamberId, Expr::value(chamber_id.to_string()))
                    .col_expr(bins::Column::ChamberEntryDate, Expr::value(at));
            }
            BinEffect::LeaveChamber { at } => {
                update = update
                    .col_expr(bins::Column::ChamberId, Expr::value(Option::<String>::None))
                    .col_expr(bins::Column::ChamberExitDate, Expr::value(at));
            }
            BinEffect::ClearChamber => {
                update =
                    update.col_expr(bins::Column::ChamberId, Expr::value(Option::<String>::None));
            }
            BinEffect::None
            | BinEffect::JoinPreselection { .. }
            | BinEffect::JoinProcess { .. } => {}
        }

        let result = update.exec(conn).await.map_err(db_err)?;
        expect_rows(
            result.rows_affected,
            1,
            format!("bin {} ({} → {})", t.bin_id, t.from, t.to),
        )?;

        match t.effect {
            BinEffect::JoinPreselection { session_id } => {
                let row = preselection_bins::ActiveModel {
                    preselection_id: Set(session_id.to_string()),
                    bin_id: Set(t.bin_id.to_string()),
                    added_at: Set(now),
                };
                preselection_bins::Entity::insert(row)
                    .exec_without_returning(conn)
                    .await
                    .map_err(db_err)?;
            }
            BinEffect::JoinProcess { session_id } => {
                let row = process_bins::ActiveModel {
                    process_session_id: Set(session_id.to_string()),
                    bin_id: Set(t.bin_id.to_string()),
                    added_at: Set(now),
                };
                process_bins::Entity::insert(row)
                    .exec_without_returning(conn)
                    .await
                    .map_err(db_err)?;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Touches the session row so a concurrent finalize either waits for this
/// transaction or makes it fail; a COMPLETED session accepts no bins.
async fn claim_open_preselection<C>(
    conn: &C,
    tenant: &TenantId,
    session_id: Uuid,
    t: &BinTransition,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = preselection_sessions::Entity::update_many()
        .col_expr(
            preselection_sessions::Column::Status,
            Expr::col(preselection_sessions::Column::Status).into(),
        )
        .filter(preselection_sessions::Column::Id.eq(session_id.to_string()))
        .filter(preselection_sessions::Column::TenantId.eq(tenant.as_str()))
        .filter(preselection_sessions::Column::Status.ne(SessionStatus::Completed.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected == 1 {
        return Ok(());
    }

    let exists = preselection_sessions::Entity::find_by_id(session_id.to_string())
        .filter(preselection_sessions::Column::TenantId.eq(tenant.as_str()))
        .one(conn)
        .await
        .map_err(db_err)?
        .is_some();
    Err(closed_session(EntityKind::Preselection, exists, session_id, t))
}

async fn claim_open_process<C>(
    conn: &C,
    tenant: &TenantId,
    session_id: Uuid,
    t: &BinTransition,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = process_sessions::Entity::update_many()
        .col_expr(
            process_sessions::Column::Status,
            Expr::col(process_sessions::Column::Status).into(),
        )
        .filter(process_sessions::Column::Id.eq(session_id.to_string()))
        .filter(process_sessions::Column::TenantId.eq(tenant.as_str()))
        .filter(process_sessions::Column::Status.ne(SessionStatus::Completed.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected == 1 {
        return Ok(());
    }

    let exists = process_sessions::Entity::find_by_id(session_id.to_string())
        .filter(process_sessions::Column::TenantId.eq(tenant.as_str()))
        .one(conn)
        .await
        .map_err(db_err)?
        .is_some();
    Err(closed_session(EntityKind::ProcessSession, exists, session_id, t))
}

fn closed_session(entity: EntityKind, exists: bool, id: Uuid, t: &BinTransition) -> DomainError {
    if exists {
        DomainError::invalid_transition(entity, SessionStatus::Completed, t.to)
    } else {
        DomainError::not_found(entity, id)
    }
}

/// Loads bins by id keeping the order of `ids`; unknown ids are skipped
pub(super) async fn bins_in_order<C>(conn: &C, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<Bin>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<String, bins::Model> = bins::Entity::find()
        .filter(bins::Column::TenantId.eq(tenant.as_str()))
        .filter(bins::Column::Id.is_in(id_strings(ids)))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

    ids.iter()
        .filter_map(|id| by_id.remove(&id.to_string()))
        .map(bin_from_model)
        .collect()
}

#[async_trait]
impl BinRepository for SeaOrmPackingStore {
    async fn insert_bin(&self, bin: &Bin) -> Result<()> {
        bins::Entity::insert(bin_model(bin))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_bin(&self, tenant: &TenantId, id: Uuid) -> Result<Option<Bin>> {
        bins::Entity::find_by_id(id.to_string())
            .filter(bins::Column::TenantId.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(bin_from_model)
            .transpose()
    }

    async fn find_bins(&self, tenant: &TenantId, ids: &[Uuid]) -> Result<Vec<Bin>> {
        bins_in_order(&self.db, tenant, ids).await
    }

    async fn list_bins(&self, tenant: &TenantId, filter: &BinFilter) -> Result<Vec<Bin>> {
        let mut query = bins::Entity::find().filter(bins::Column::TenantId.eq(tenant.as_str()));

        if !filter.statuses.is_empty() {
            let statuses: Vec<&str> = filter.statuses.iter().map(|s| s.as_str()).collect();
            query = query.filter(bins::Column::Status.is_in(statuses));
        }
        if let Some(id) = filter.truck_entry_id {
            query = query.filter(bins::Column::TruckEntryId.eq(id.to_string()));
        }
        if let Some(id) = filter.chamber_id {
            query = query.filter(bins::Column::ChamberId.eq(id.to_string()));
        }
        if let Some(id) = filter.preselection_id {
            query = query.filter(bins::Column::PreselectionId.eq(id.to_string()));
        }
        if let Some(since) = filter.updated_since {
            query = query.filter(bins::Column::UpdatedAt.gte(since));
        }

        query
            .order_by_asc(bins::Column::CreatedAt)
            .order_by_asc(bins::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(bin_from_model)
            .collect()
    }

    async fn apply_bin_transitions(
        &self,
        tenant: &TenantId,
        transitions: &[BinTransition],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        apply_transitions(&txn, tenant, transitions, now).await?;
        txn.commit().await.map_err(db_err)
    }
}
