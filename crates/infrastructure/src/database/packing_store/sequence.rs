use super::{Result, SeaOrmPackingStore, db_err};
use crate::database::entities::{
    bins, boxes, code_sequences, dispatches, pallets, preselection_sessions, process_sessions,
};
use async_trait::async_trait;
use domain::DomainError;
use domain::code::CodeKind;
use domain::packing::CodeSequence;
use domain::tenant::TenantId;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::debug;

/// Compare-and-set attempts before giving up with `Conflict`
const MAX_ATTEMPTS: usize = 8;

/// Codes already issued for an entity table under `scope` (e.g. `B-2024-`)
async fn issued_codes<E>(
    db: &DatabaseConnection,
    tenant_col: E::Column,
    code_col: E::Column,
    tenant: &str,
    scope: &str,
) -> std::result::Result<Vec<String>, DbErr>
where
    E: EntityTrait,
{
    E::find()
        .select_only()
        .column(code_col)
        .filter(tenant_col.eq(tenant))
        .filter(code_col.starts_with(scope))
        .into_tuple::<String>()
        .all(db)
        .await
}

impl SeaOrmPackingStore {
    /// Highest sequence value already present in the entity table, so a
    /// fresh counter continues after data written before it existed.
    async fn highest_issued(&self, tenant: &TenantId, kind: CodeKind, year: i32) -> Result<u32> {
        let scope = kind.scope_prefix(year);
        let t = tenant.as_str();
        let db = &self.db;

        let codes = match kind {
            CodeKind::Bin => {
                issued_codes::<bins::Entity>(
                    db,
                    bins::Column::TenantId,
                    bins::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
            CodeKind::Preselection => {
                issued_codes::<preselection_sessions::Entity>(
                    db,
                    preselection_sessions::Column::TenantId,
                    preselection_sessions::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
            CodeKind::PackedBox => {
                issued_codes::<boxes::Entity>(
                    db,
                    boxes::Column::TenantId,
                    boxes::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
            CodeKind::Pallet => {
                issued_codes::<pallets::Entity>(
                    db,
                    pallets::Column::TenantId,
                    pallets::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
            CodeKind::Dispatch => {
                issued_codes::<dispatches::Entity>(
                    db,
                    dispatches::Column::TenantId,
                    dispatches::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
            CodeKind::Process => {
                issued_codes::<process_sessions::Entity>(
                    db,
                    process_sessions::Column::TenantId,
                    process_sessions::Column::Code,
                    t,
                    &scope,
                )
                .await
            }
        }
        .map_err(db_err)?;

        let mut highest = 0;
        for code in &codes {
            highest = highest.max(kind.parse_sequence(code)?);
        }
        Ok(highest)
    }
}

#[async_trait]
impl CodeSequence for SeaOrmPackingStore {
    async fn next_code(&self, tenant: &TenantId, kind: CodeKind, year: i32) -> Result<String> {
        let prefix = kind.prefix();
        let seq_year = kind.sequence_year(year);
        let key = (tenant.to_string(), prefix.to_string(), seq_year);

        for attempt in 1..=MAX_ATTEMPTS {
            let current = code_sequences::Entity::find_by_id(key.clone())
                .one(&self.db)
                .await
                .map_err(db_err)?;

            let Some(row) = current else {
                let seed = self.highest_issued(tenant, kind, year).await?;
                debug!(tenant_id = %tenant, prefix, year = seq_year, seed, "Seeding code sequence");

                let row = code_sequences::ActiveModel {
                    tenant_id: Set(key.0.clone()),
                    prefix: Set(key.1.clone()),
                    year: Set(seq_year),
                    last_value: Set(i64::from(seed)),
                };
                // A concurrent seeder may win; either way the row exists afterwards
                code_sequences::Entity::insert(row)
                    .on_conflict(
                        OnConflict::columns([
                            code_sequences::Column::TenantId,
                            code_sequences::Column::Prefix,
                            code_sequences::Column::Year,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(&self.db)
                    .await
                    .map_err(db_err)?;
                continue;
            };

            let next = row.last_value + 1;
            let result = code_sequences::Entity::update_many()
                .col_expr(code_sequences::Column::LastValue, Expr::value(next))
                .filter(code_sequences::Column::TenantId.eq(key.0.as_str()))
                .filter(code_sequences::Column::Prefix.eq(prefix))
                .filter(code_sequences::Column::Year.eq(seq_year))
                .filter(code_sequences::Column::LastValue.eq(row.last_value))
                .exec(&self.db)
                .await
                .map_err(db_err)?;

            if result.rows_affected == 1 {
                let seq = u32::try_from(next).map_err(|_| {
                    DomainError::Conflict(format!("secuencia {prefix} agotada"))
                })?;
                return Ok(kind.format(year, seq));
            }

            debug!(tenant_id = %tenant, prefix, attempt, "Code sequence contention, retrying");
        }

        Err(DomainError::Conflict(format!(
            "no se pudo reservar un código {prefix} tras {MAX_ATTEMPTS} intentos"
        )))
    }
}
