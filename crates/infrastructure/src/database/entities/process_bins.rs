use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "process_bins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub process_session_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub bin_id: String,
    pub added_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
