use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub bin_identifier: Option<String>,
    pub field_name: String,
    pub fruit_type: String,
    pub lot_name: String,
    pub contractor: Option<String>,
    pub harvest_type: Option<String>,
    pub bin_type: Option<String>,
    pub empty_weight: Option<f64>,
    pub net_weight: f64,
    pub is_trazable: bool,
    pub status: String,
    pub truck_entry_id: Option<String>,
    pub preselection_id: Option<String>,
    pub internal_lot: Option<String>,
    pub fruit_color: Option<String>,
    pub fruit_quality: Option<String>,
    pub caliber: Option<String>,
    pub chamber_id: Option<String>,
    pub chamber_entry_date: Option<DateTimeUtc>,
    pub chamber_exit_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::truck_entries::Entity",
        from = "Column::TruckEntryId",
        to = "super::truck_entries::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    TruckEntry,
    #[sea_orm(
        belongs_to = "super::chambers::Entity",
        from = "Column::ChamberId",
        to = "super::chambers::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Chamber,
}

impl Related<super::truck_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TruckEntry.def()
    }
}

impl Related<super::chambers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chamber.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
