use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "preselection_output_slots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub preselection_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub output_number: i32,
    pub color: Option<String>,
    pub caliber: Option<String>,
    pub is_discard: bool,
    pub label: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
