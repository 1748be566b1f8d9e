use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dispatches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub client_name: String,
    pub client_type: Option<String>,
    pub sale_type: Option<String>,
    pub delivery_address: Option<String>,
    pub remito_number: Option<String>,
    pub dtv: Option<String>,
    pub dtc: Option<String>,
    pub closing_code: Option<String>,
    pub destination: Option<String>,
    pub discharge: Option<String>,
    pub transport: Option<String>,
    pub driver_name: Option<String>,
    pub license_plate: Option<String>,
    pub departure_date: Option<Date>,
    pub departure_time: Option<String>,
    pub status: String,
    pub observations: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
