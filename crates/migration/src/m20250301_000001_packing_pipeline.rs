use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().primary_key().to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn unique_code<T: IntoIden + 'static>(
    name: &str,
    table: T,
    tenant: T,
    code: T,
) -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .unique()
        .name(name)
        .table(table)
        .col(tenant)
        .col(code)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create truck_entries table
        manager
            .create_table(
                Table::create()
                    .table(TruckEntries::Table)
                    .if_not_exists()
                    .col(id(TruckEntries::Id))
                    .col(ColumnDef::new(TruckEntries::TenantId).string().not_null())
                    .col(ColumnDef::new(TruckEntries::RemitoNumber).string().not_null())
                    .col(ColumnDef::new(TruckEntries::Dtv).string().not_null())
                    .col(ColumnDef::new(TruckEntries::Transport).string().not_null())
                    .col(ColumnDef::new(TruckEntries::Chassis).string())
                    .col(ColumnDef::new(TruckEntries::Trailer).string())
                    .col(ColumnDef::new(TruckEntries::DriverName).string().not_null())
                    .col(ColumnDef::new(TruckEntries::DriverDni).string().not_null())
                    .col(ColumnDef::new(TruckEntries::OperatorId).string())
                    .col(ColumnDef::new(TruckEntries::ProducerUnit).string())
                    .col(ColumnDef::new(TruckEntries::FieldOrigin).string())
                    .col(timestamp(TruckEntries::EntryDate))
                    .col(
                        ColumnDef::new(TruckEntries::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .to_owned(),
            )
            .await?;

        // Create chambers table
        manager
            .create_table(
                Table::create()
                    .table(Chambers::Table)
                    .if_not_exists()
                    .col(id(Chambers::Id))
                    .col(ColumnDef::new(Chambers::TenantId).string().not_null())
                    .col(ColumnDef::new(Chambers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Chambers::ChamberType)
                            .string()
                            .not_null()
                            .default("ETHYLENE"),
                    )
                    .col(
                        ColumnDef::new(Chambers::Capacity)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(Chambers::Temperature).double())
                    .col(ColumnDef::new(Chambers::Humidity).double())
                    .col(timestamp(Chambers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create chamber_tasks table
        manager
            .create_table(
                Table::create()
                    .table(ChamberTasks::Table)
                    .if_not_exists()
                    .col(id(ChamberTasks::Id))
                    .col(ColumnDef::new(ChamberTasks::ChamberId).string().not_null())
                    .col(ColumnDef::new(ChamberTasks::TaskType).string().not_null())
                    .col(ColumnDef::new(ChamberTasks::Description).string().not_null())
                    .col(ColumnDef::new(ChamberTasks::Cost).double())
                    .col(timestamp(ChamberTasks::Date))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chamber_task_chamber")
                            .from(ChamberTasks::Table, ChamberTasks::ChamberId)
                            .to(Chambers::Table, Chambers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create preselection_sessions table
        manager
            .create_table(
                Table::create()
                    .table(PreselectionSessions::Table)
                    .if_not_exists()
                    .col(id(PreselectionSessions::Id))
                    .col(
                        ColumnDef::new(PreselectionSessions::TenantId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreselectionSessions::Code).string().not_null())
                    .col(
                        ColumnDef::new(PreselectionSessions::Status)
                            .string()
                            .not_null()
                            .default("IN_PROGRESS"),
                    )
                    .col(timestamp(PreselectionSessions::StartTime))
                    .col(ColumnDef::new(PreselectionSessions::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(PreselectionSessions::PausedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PreselectionSessions::PauseCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PreselectionSessions::TotalPauseHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(PreselectionSessions::TotalDurationHours).double())
                    .col(
                        ColumnDef::new(PreselectionSessions::DiscardKg)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(PreselectionSessions::Notes).text())
                    .to_owned(),
            )
            .await?;

        // Create preselection_output_slots table
        manager
            .create_table(
                Table::create()
                    .table(PreselectionOutputSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreselectionOutputSlots::PreselectionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreselectionOutputSlots::OutputNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreselectionOutputSlots::Color).string())
                    .col(ColumnDef::new(PreselectionOutputSlots::Caliber).string())
                    .col(
                        ColumnDef::new(PreselectionOutputSlots::IsDiscard)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PreselectionOutputSlots::Label).string())
                    .primary_key(
                        Index::create()
                            .col(PreselectionOutputSlots::PreselectionId)
                            .col(PreselectionOutputSlots::OutputNumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_output_slot_preselection")
                            .from(
                                PreselectionOutputSlots::Table,
                                PreselectionOutputSlots::PreselectionId,
                            )
                            .to(PreselectionSessions::Table, PreselectionSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create bins table
        manager
            .create_table(
                Table::create()
                    .table(Bins::Table)
                    .if_not_exists()
                    .col(id(Bins::Id))
                    .col(ColumnDef::new(Bins::TenantId).string().not_null())
                    .col(ColumnDef::new(Bins::Code).string().not_null())
                    .col(ColumnDef::new(Bins::BinIdentifier).string())
                    .col(ColumnDef::new(Bins::FieldName).string().not_null())
                    .col(ColumnDef::new(Bins::FruitType).string().not_null())
                    .col(ColumnDef::new(Bins::LotName).string().not_null())
                    .col(ColumnDef::new(Bins::Contractor).string())
                    .col(ColumnDef::new(Bins::HarvestType).string())
                    .col(ColumnDef::new(Bins::BinType).string())
                    .col(ColumnDef::new(Bins::EmptyWeight).double())
                    .col(ColumnDef::new(Bins::NetWeight).double().not_null())
                    .col(
                        ColumnDef::new(Bins::IsTrazable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bins::Status)
                            .string()
                            .not_null()
                            .default("IN_YARD"),
                    )
                    .col(ColumnDef::new(Bins::TruckEntryId).string())
                    .col(ColumnDef::new(Bins::PreselectionId).string())
                    .col(ColumnDef::new(Bins::InternalLot).string())
                    .col(ColumnDef::new(Bins::FruitColor).string())
                    .col(ColumnDef::new(Bins::FruitQuality).string())
                    .col(ColumnDef::new(Bins::Caliber).string())
                    .col(ColumnDef::new(Bins::ChamberId).string())
                    .col(ColumnDef::new(Bins::ChamberEntryDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bins::ChamberExitDate).timestamp_with_time_zone())
                    .col(timestamp(Bins::CreatedAt))
                    .col(timestamp(Bins::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bin_truck_entry")
                            .from(Bins::Table, Bins::TruckEntryId)
                            .to(TruckEntries::Table, TruckEntries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bin_chamber")
                            .from(Bins::Table, Bins::ChamberId)
                            .to(Chambers::Table, Chambers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bins_tenant_status")
                    .table(Bins::Table)
                    .col(Bins::TenantId)
                    .col(Bins::Status)
                    .to_owned(),
            )
            .await?;

        // Create preselection_bins join table (input bins)
        manager
            .create_table(
                Table::create()
                    .table(PreselectionBins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreselectionBins::PreselectionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreselectionBins::BinId).string().not_null())
                    .col(timestamp(PreselectionBins::AddedAt))
                    .primary_key(
                        Index::create()
                            .col(PreselectionBins::PreselectionId)
                            .col(PreselectionBins::BinId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preselection_bin_session")
                            .from(PreselectionBins::Table, PreselectionBins::PreselectionId)
                            .to(PreselectionSessions::Table, PreselectionSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preselection_bin_bin")
                            .from(PreselectionBins::Table, PreselectionBins::BinId)
                            .to(Bins::Table, Bins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create preselection_workers table
        manager
            .create_table(
                Table::create()
                    .table(PreselectionWorkers::Table)
                    .if_not_exists()
                    .col(id(PreselectionWorkers::Id))
                    .col(
                        ColumnDef::new(PreselectionWorkers::PreselectionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreselectionWorkers::WorkerId).string().not_null())
                    .col(ColumnDef::new(PreselectionWorkers::Role).string())
                    .col(ColumnDef::new(PreselectionWorkers::HoursWorked).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preselection_worker_session")
                            .from(
                                PreselectionWorkers::Table,
                                PreselectionWorkers::PreselectionId,
                            )
                            .to(PreselectionSessions::Table, PreselectionSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create preselection_inputs table (consumables)
        manager
            .create_table(
                Table::create()
                    .table(PreselectionInputs::Table)
                    .if_not_exists()
                    .col(id(PreselectionInputs::Id))
                    .col(
                        ColumnDef::new(PreselectionInputs::PreselectionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreselectionInputs::ItemName).string().not_null())
                    .col(ColumnDef::new(PreselectionInputs::Quantity).double().not_null())
                    .col(ColumnDef::new(PreselectionInputs::Unit).string().not_null())
                    .col(ColumnDef::new(PreselectionInputs::Cost).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preselection_input_session")
                            .from(PreselectionInputs::Table, PreselectionInputs::PreselectionId)
                            .to(PreselectionSessions::Table, PreselectionSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create process_sessions table
        manager
            .create_table(
                Table::create()
                    .table(ProcessSessions::Table)
                    .if_not_exists()
                    .col(id(ProcessSessions::Id))
                    .col(ColumnDef::new(ProcessSessions::TenantId).string().not_null())
                    .col(ColumnDef::new(ProcessSessions::Code).string().not_null())
                    .col(
                        ColumnDef::new(ProcessSessions::Status)
                            .string()
                            .not_null()
                            .default("IN_PROGRESS"),
                    )
                    .col(timestamp(ProcessSessions::StartTime))
                    .col(ColumnDef::new(ProcessSessions::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ProcessSessions::PausedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ProcessSessions::PauseCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessSessions::TotalPauseHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(ProcessSessions::TotalDurationHours).double())
                    .col(
                        ColumnDef::new(ProcessSessions::CleanDiscardKg)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ProcessSessions::ContaminatedDiscardKg)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(ProcessSessions::Notes).text())
                    .to_owned(),
            )
            .await?;

        // Create process_bins join table (input bins)
        manager
            .create_table(
                Table::create()
                    .table(ProcessBins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProcessBins::ProcessSessionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProcessBins::BinId).string().not_null())
                    .col(timestamp(ProcessBins::AddedAt))
                    .primary_key(
                        Index::create()
                            .col(ProcessBins::ProcessSessionId)
                            .col(ProcessBins::BinId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_bin_session")
                            .from(ProcessBins::Table, ProcessBins::ProcessSessionId)
                            .to(ProcessSessions::Table, ProcessSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_bin_bin")
                            .from(ProcessBins::Table, ProcessBins::BinId)
                            .to(Bins::Table, Bins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create process_products table
        manager
            .create_table(
                Table::create()
                    .table(ProcessProducts::Table)
                    .if_not_exists()
                    .col(id(ProcessProducts::Id))
                    .col(
                        ColumnDef::new(ProcessProducts::ProcessSessionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProcessProducts::ProductName).string().not_null())
                    .col(ColumnDef::new(ProcessProducts::Quantity).double().not_null())
                    .col(ColumnDef::new(ProcessProducts::Unit).string().not_null())
                    .col(ColumnDef::new(ProcessProducts::Cost).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_product_session")
                            .from(ProcessProducts::Table, ProcessProducts::ProcessSessionId)
                            .to(ProcessSessions::Table, ProcessSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create pallets table
        manager
            .create_table(
                Table::create()
                    .table(Pallets::Table)
                    .if_not_exists()
                    .col(id(Pallets::Id))
                    .col(ColumnDef::new(Pallets::TenantId).string().not_null())
                    .col(ColumnDef::new(Pallets::Number).integer().not_null())
                    .col(ColumnDef::new(Pallets::Code).string().not_null())
                    .col(
                        ColumnDef::new(Pallets::Status)
                            .string()
                            .not_null()
                            .default("ON_FLOOR"),
                    )
                    .col(ColumnDef::new(Pallets::Destination).string())
                    .col(ColumnDef::new(Pallets::OperatorName).string())
                    .col(timestamp(Pallets::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create boxes table
        manager
            .create_table(
                Table::create()
                    .table(Boxes::Table)
                    .if_not_exists()
                    .col(id(Boxes::Id))
                    .col(ColumnDef::new(Boxes::TenantId).string().not_null())
                    .col(ColumnDef::new(Boxes::Code).string().not_null())
                    .col(ColumnDef::new(Boxes::Product).string().not_null())
                    .col(ColumnDef::new(Boxes::Producer).string())
                    .col(ColumnDef::new(Boxes::Caliber).string().not_null())
                    .col(ColumnDef::new(Boxes::Category).string().not_null())
                    .col(ColumnDef::new(Boxes::PackagingCode).string())
                    .col(
                        ColumnDef::new(Boxes::Destination)
                            .string()
                            .not_null()
                            .default("MERCADO_INTERNO"),
                    )
                    .col(ColumnDef::new(Boxes::WeightKg).double().not_null())
                    .col(ColumnDef::new(Boxes::ProcessSessionId).string())
                    .col(ColumnDef::new(Boxes::PalletId).string())
                    .col(timestamp(Boxes::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_box_process_session")
                            .from(Boxes::Table, Boxes::ProcessSessionId)
                            .to(ProcessSessions::Table, ProcessSessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_box_pallet")
                            .from(Boxes::Table, Boxes::PalletId)
                            .to(Pallets::Table, Pallets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create dispatches table
        manager
            .create_table(
                Table::create()
                    .table(Dispatches::Table)
                    .if_not_exists()
                    .col(id(Dispatches::Id))
                    .col(ColumnDef::new(Dispatches::TenantId).string().not_null())
                    .col(ColumnDef::new(Dispatches::Code).string().not_null())
                    .col(ColumnDef::new(Dispatches::ClientName).string().not_null())
                    .col(ColumnDef::new(Dispatches::ClientType).string())
                    .col(ColumnDef::new(Dispatches::SaleType).string())
                    .col(ColumnDef::new(Dispatches::DeliveryAddress).string())
                    .col(ColumnDef::new(Dispatches::RemitoNumber).string())
                    .col(ColumnDef::new(Dispatches::Dtv).string())
                    .col(ColumnDef::new(Dispatches::Dtc).string())
                    .col(ColumnDef::new(Dispatches::ClosingCode).string())
                    .col(ColumnDef::new(Dispatches::Destination).string())
                    .col(ColumnDef::new(Dispatches::Discharge).string())
                    .col(ColumnDef::new(Dispatches::Transport).string())
                    .col(ColumnDef::new(Dispatches::DriverName).string())
                    .col(ColumnDef::new(Dispatches::LicensePlate).string())
                    .col(ColumnDef::new(Dispatches::DepartureDate).date())
                    .col(ColumnDef::new(Dispatches::DepartureTime).string())
                    .col(
                        ColumnDef::new(Dispatches::Status)
                            .string()
                            .not_null()
                            .default("PREPARING"),
                    )
                    .col(ColumnDef::new(Dispatches::Observations).text())
                    .col(timestamp(Dispatches::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create dispatch_pallets join table
        manager
            .create_table(
                Table::create()
                    .table(DispatchPallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DispatchPallets::DispatchId).string().not_null())
                    .col(ColumnDef::new(DispatchPallets::PalletId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(DispatchPallets::DispatchId)
                            .col(DispatchPallets::PalletId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispatch_pallet_dispatch")
                            .from(DispatchPallets::Table, DispatchPallets::DispatchId)
                            .to(Dispatches::Table, Dispatches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispatch_pallet_pallet")
                            .from(DispatchPallets::Table, DispatchPallets::PalletId)
                            .to(Pallets::Table, Pallets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Codes are unique per tenant
        for index in [
            unique_code("uq_bins_tenant_code", Bins::Table, Bins::TenantId, Bins::Code),
            unique_code(
                "uq_boxes_tenant_code",
                Boxes::Table,
                Boxes::TenantId,
                Boxes::Code,
            ),
            unique_code(
                "uq_pallets_tenant_code",
                Pallets::Table,
                Pallets::TenantId,
                Pallets::Code,
            ),
            unique_code(
                "uq_dispatches_tenant_code",
                Dispatches::Table,
                Dispatches::TenantId,
                Dispatches::Code,
            ),
            unique_code(
                "uq_preselection_sessions_tenant_code",
                PreselectionSessions::Table,
                PreselectionSessions::TenantId,
                PreselectionSessions::Code,
            ),
            unique_code(
                "uq_process_sessions_tenant_code",
                ProcessSessions::Table,
                ProcessSessions::TenantId,
                ProcessSessions::Code,
            ),
        ] {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle
        drop_table(manager, DispatchPallets::Table).await?;
        drop_table(manager, Dispatches::Table).await?;
        drop_table(manager, Boxes::Table).await?;
        drop_table(manager, Pallets::Table).await?;
        drop_table(manager, ProcessProducts::Table).await?;
        drop_table(manager, ProcessBins::Table).await?;
        drop_table(manager, ProcessSessions::Table).await?;
        drop_table(manager, PreselectionInputs::Table).await?;
        drop_table(manager, PreselectionWorkers::Table).await?;
        drop_table(manager, PreselectionBins::Table).await?;
        drop_table(manager, Bins::Table).await?;
        drop_table(manager, PreselectionOutputSlots::Table).await?;
        drop_table(manager, PreselectionSessions::Table).await?;
        drop_table(manager, ChamberTasks::Table).await?;
        drop_table(manager, Chambers::Table).await?;
        drop_table(manager, TruckEntries::Table).await?;

        Ok(())
    }
}

async fn drop_table<T>(manager: &SchemaManager<'_>, table: T) -> Result<(), DbErr>
where
    T: IntoTableRef,
{
    let statement = Table::drop().table(table).if_exists().to_owned();
    manager.drop_table(statement).await
}

#[derive(DeriveIden)]
enum TruckEntries {
    Table,
    Id,
    TenantId,
    RemitoNumber,
    Dtv,
    Transport,
    Chassis,
    Trailer,
    DriverName,
    DriverDni,
    OperatorId,
    ProducerUnit,
    FieldOrigin,
    EntryDate,
    Status,
}

#[derive(DeriveIden)]
enum Bins {
    Table,
    Id,
    TenantId,
    Code,
    BinIdentifier,
    FieldName,
    FruitType,
    LotName,
    Contractor,
    HarvestType,
    BinType,
    EmptyWeight,
    NetWeight,
    IsTrazable,
    Status,
    TruckEntryId,
    PreselectionId,
    InternalLot,
    FruitColor,
    FruitQuality,
    Caliber,
    ChamberId,
    ChamberEntryDate,
    ChamberExitDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PreselectionSessions {
    Table,
    Id,
    TenantId,
    Code,
    Status,
    StartTime,
    EndTime,
    PausedAt,
    PauseCount,
    TotalPauseHours,
    TotalDurationHours,
    DiscardKg,
    Notes,
}

#[derive(DeriveIden)]
enum PreselectionOutputSlots {
    Table,
    PreselectionId,
    OutputNumber,
    Color,
    Caliber,
    IsDiscard,
    Label,
}

#[derive(DeriveIden)]
enum PreselectionBins {
    Table,
    PreselectionId,
    BinId,
    AddedAt,
}

#[derive(DeriveIden)]
enum PreselectionWorkers {
    Table,
    Id,
    PreselectionId,
    WorkerId,
    Role,
    HoursWorked,
}

#[derive(DeriveIden)]
enum PreselectionInputs {
    Table,
    Id,
    PreselectionId,
    ItemName,
    Quantity,
    Unit,
    Cost,
}

#[derive(DeriveIden)]
enum Chambers {
    Table,
    Id,
    TenantId,
    Name,
    ChamberType,
    Capacity,
    Temperature,
    Humidity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ChamberTasks {
    Table,
    Id,
    ChamberId,
    TaskType,
    Description,
    Cost,
    Date,
}

#[derive(DeriveIden)]
enum ProcessSessions {
    Table,
    Id,
    TenantId,
    Code,
    Status,
    StartTime,
    EndTime,
    PausedAt,
    PauseCount,
    TotalPauseHours,
    TotalDurationHours,
    CleanDiscardKg,
    ContaminatedDiscardKg,
    Notes,
}

#[derive(DeriveIden)]
enum ProcessBins {
    Table,
    ProcessSessionId,
    BinId,
    AddedAt,
}

#[derive(DeriveIden)]
enum ProcessProducts {
    Table,
    Id,
    ProcessSessionId,
    ProductName,
    Quantity,
    Unit,
    Cost,
}

#[derive(DeriveIden)]
enum Pallets {
    Table,
    Id,
    TenantId,
    Number,
    Code,
    Status,
    Destination,
    OperatorName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Boxes {
    Table,
    Id,
    TenantId,
    Code,
    Product,
    Producer,
    Caliber,
    Category,
    PackagingCode,
    Destination,
    WeightKg,
    ProcessSessionId,
    PalletId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Dispatches {
    Table,
    Id,
    TenantId,
    Code,
    ClientName,
    ClientType,
    SaleType,
    DeliveryAddress,
    RemitoNumber,
    Dtv,
    Dtc,
    ClosingCode,
    Destination,
    Discharge,
    Transport,
    DriverName,
    LicensePlate,
    DepartureDate,
    DepartureTime,
    Status,
    Observations,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DispatchPallets {
    Table,
    DispatchId,
    PalletId,
}
