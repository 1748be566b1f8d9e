use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "truck_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub remito_number: String,
    pub dtv: String,
    pub transport: String,
    pub chassis: Option<String>,
    pub trailer: Option<String>,
    pub driver_name: String,
    pub driver_dni: String,
    pub operator_id: Option<String>,
    pub producer_unit: Option<String>,
    pub field_origin: Option<String>,
    pub entry_date: DateTimeUtc,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
