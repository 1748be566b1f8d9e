//! sea-orm implementation of the packing repositories.
//!
//! Multi-row writes run inside one `DatabaseTransaction`; returning early
//! with `?` drops the transaction, which rolls it back.

mod bins;
mod chambers;
mod convert;
mod dispatches;
mod pallets;
mod preselection;
mod process;
mod sequence;
mod truck_entries;

use domain::DomainError;
use domain::error::EntityKind;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use std::fmt::Display;
use uuid::Uuid;

type Result<T> = domain::error::Result<T>;

#[derive(Clone)]
pub struct SeaOrmPackingStore {
    db: DatabaseConnection,
}

impl SeaOrmPackingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => DomainError::Conflict(detail),
        _ => DomainError::Repository(e.to_string()),
    }
}

fn id_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

/// Checks that a status-guarded update touched exactly the rows expected
fn expect_rows(affected: u64, expected: usize, what: impl Display) -> Result<()> {
    if affected == expected as u64 {
        Ok(())
    } else {
        Err(DomainError::Conflict(format!(
            "{what}: se esperaban {expected} filas, se actualizaron {affected}"
        )))
    }
}

fn not_found(entity: EntityKind, id: Uuid) -> DomainError {
    DomainError::not_found(entity, id)
}
