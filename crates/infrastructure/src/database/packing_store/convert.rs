//! Row <-> domain mapping. Ids are stored as hyphenated UUID strings and
//! statuses as their wire names.

use super::Result;
use crate::database::entities::{
    bins, boxes, chamber_tasks, chambers, dispatches, pallets, preselection_inputs,
    preselection_output_slots, preselection_sessions, preselection_workers, process_products,
    process_sessions, truck_entries,
};
use domain::DomainError;
use domain::packing::{
    Bin, Chamber, ChamberTask, Dispatch, OutputSlot, PackedBox, Pallet, PreselectionSession,
    PreselectionWorker, ProcessProduct, ProcessSession, SessionInput, SessionTiming, TruckEntry,
};
use domain::tenant::TenantId;
use sea_orm::Set;
use uuid::Uuid;

pub(super) fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::Repository(format!("id almacenado inválido '{value}': {e}")))
}

fn parse_opt_uuid(value: Option<String>) -> Result<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

pub(super) fn truck_entry_from_model(m: truck_entries::Model) -> Result<TruckEntry> {
    Ok(TruckEntry {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        remito_number: m.remito_number,
        dtv: m.dtv,
        transport: m.transport,
        chassis: m.chassis,
        trailer: m.trailer,
        driver_name: m.driver_name,
        driver_dni: m.driver_dni,
        operator_id: m.operator_id,
        producer_unit: m.producer_unit,
        field_origin: m.field_origin,
        entry_date: m.entry_date,
        status: m.status.parse()?,
    })
}

pub(super) fn truck_entry_model(e: &TruckEntry) -> truck_entries::ActiveModel {
    truck_entries::ActiveModel {
        id: Set(e.id.to_string()),
        tenant_id: Set(e.tenant_id.to_string()),
        remito_number: Set(e.remito_number.clone()),
        dtv: Set(e.dtv.clone()),
        transport: Set(e.transport.clone()),
        chassis: Set(e.chassis.clone()),
        trailer: Set(e.trailer.clone()),
        driver_name: Set(e.driver_name.clone()),
        driver_dni: Set(e.driver_dni.clone()),
        operator_id: Set(e.operator_id.clone()),
        producer_unit: Set(e.producer_unit.clone()),
        field_origin: Set(e.field_origin.clone()),
        entry_date: Set(e.entry_date),
        status: Set(e.status.as_str().to_string()),
    }
}

pub(super) fn bin_from_model(m: bins::Model) -> Result<Bin> {
    Ok(Bin {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        code: m.code,
        bin_identifier: m.bin_identifier,
        field_name: m.field_name,
        fruit_type: m.fruit_type,
        lot_name: m.lot_name,
        contractor: m.contractor,
        harvest_type: m.harvest_type,
        bin_type: m.bin_type,
        empty_weight: m.empty_weight,
        net_weight: m.net_weight,
        is_trazable: m.is_trazable,
        status: m.status.parse()?,
        truck_entry_id: parse_opt_uuid(m.truck_entry_id)?,
        preselection_id: parse_opt_uuid(m.preselection_id)?,
        internal_lot: m.internal_lot,
        fruit_color: m.fruit_color,
        fruit_quality: m.fruit_quality,
        caliber: m.caliber,
        chamber_id: parse_opt_uuid(m.chamber_id)?,
        chamber_entry_date: m.chamber_entry_date,
        chamber_exit_date: m.chamber_exit_date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(super) fn bin_model(b: &Bin) -> bins::ActiveModel {
    bins::ActiveModel {
        id: Set(b.id.to_string()),
        tenant_id: Set(b.tenant_id.to_string()),
        code: Set(b.code.clone()),
        bin_identifier: Set(b.bin_identifier.clone()),
        field_name: Set(b.field_name.clone()),
        fruit_type: Set(b.fruit_type.clone()),
        lot_name: Set(b.lot_name.clone()),
        contractor: Set(b.contractor.clone()),
        harvest_type: Set(b.harvest_type.clone()),
        bin_type: Set(b.bin_type.clone()),
        empty_weight: Set(b.empty_weight),
        net_weight: Set(b.net_weight),
        is_trazable: Set(b.is_trazable),
        status: Set(b.status.as_str().to_string()),
        truck_entry_id: Set(b.truck_entry_id.map(|id| id.to_string())),
        preselection_id: Set(b.preselection_id.map(|id| id.to_string())),
        internal_lot: Set(b.internal_lot.clone()),
        fruit_color: Set(b.fruit_color.clone()),
        fruit_quality: Set(b.fruit_quality.clone()),
        caliber: Set(b.caliber.clone()),
        chamber_id: Set(b.chamber_id.map(|id| id.to_string())),
        chamber_entry_date: Set(b.chamber_entry_date),
        chamber_exit_date: Set(b.chamber_exit_date),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

pub(super) fn slot_from_model(m: preselection_output_slots::Model) -> OutputSlot {
    OutputSlot {
        output_number: m.output_number,
        color: m.color,
        caliber: m.caliber,
        is_discard: m.is_discard,
        label: m.label,
    }
}

pub(super) fn slot_model(
    preselection_id: Uuid,
    slot: &OutputSlot,
) -> preselection_output_slots::ActiveModel {
    preselection_output_slots::ActiveModel {
        preselection_id: Set(preselection_id.to_string()),
        output_number: Set(slot.output_number),
        color: Set(slot.color.clone()),
        caliber: Set(slot.caliber.clone()),
        is_discard: Set(slot.is_discard),
        label: Set(slot.label.clone()),
    }
}

pub(super) fn preselection_from_model(
    m: preselection_sessions::Model,
    output_config: Vec<OutputSlot>,
) -> Result<PreselectionSession> {
    Ok(PreselectionSession {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        code: m.code,
        timing: SessionTiming {
            status: m.status.parse()?,
            start_time: m.start_time,
            end_time: m.end_time,
            paused_at: m.paused_at,
            pause_count: m.pause_count,
            total_pause_hours: m.total_pause_hours,
            total_duration_hours: m.total_duration_hours,
        },
        discard_kg: m.discard_kg,
        notes: m.notes,
        output_config,
    })
}

pub(super) fn preselection_model(s: &PreselectionSession) -> preselection_sessions::ActiveModel {
    preselection_sessions::ActiveModel {
        id: Set(s.id.to_string()),
        tenant_id: Set(s.tenant_id.to_string()),
        code: Set(s.code.clone()),
        status: Set(s.timing.status.as_str().to_string()),
        start_time: Set(s.timing.start_time),
        end_time: Set(s.timing.end_time),
        paused_at: Set(s.timing.paused_at),
        pause_count: Set(s.timing.pause_count),
        total_pause_hours: Set(s.timing.total_pause_hours),
        total_duration_hours: Set(s.timing.total_duration_hours),
        discard_kg: Set(s.discard_kg),
        notes: Set(s.notes.clone()),
    }
}

pub(super) fn worker_from_model(m: preselection_workers::Model) -> Result<PreselectionWorker> {
    Ok(PreselectionWorker {
        id: parse_uuid(&m.id)?,
        preselection_id: parse_uuid(&m.preselection_id)?,
        worker_id: m.worker_id,
        role: m.role,
        hours_worked: m.hours_worked,
    })
}

pub(super) fn worker_model(w: &PreselectionWorker) -> preselection_workers::ActiveModel {
    preselection_workers::ActiveModel {
        id: Set(w.id.to_string()),
        preselection_id: Set(w.preselection_id.to_string()),
        worker_id: Set(w.worker_id.clone()),
        role: Set(w.role.clone()),
        hours_worked: Set(w.hours_worked),
    }
}

pub(super) fn input_from_model(m: preselection_inputs::Model) -> Result<SessionInput> {
    Ok(SessionInput {
        id: parse_uuid(&m.id)?,
        preselection_id: parse_uuid(&m.preselection_id)?,
        item_name: m.item_name,
        quantity: m.quantity,
        unit: m.unit,
        cost: m.cost,
    })
}

pub(super) fn input_model(i: &SessionInput) -> preselection_inputs::ActiveModel {
    preselection_inputs::ActiveModel {
        id: Set(i.id.to_string()),
        preselection_id: Set(i.preselection_id.to_string()),
        item_name: Set(i.item_name.clone()),
        quantity: Set(i.quantity),
        unit: Set(i.unit.clone()),
        cost: Set(i.cost),
    }
}

pub(super) fn chamber_from_model(m: chambers::Model) -> Result<Chamber> {
    Ok(Chamber {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        name: m.name,
        kind: m.chamber_type.parse()?,
        capacity: m.capacity,
        temperature: m.temperature,
        humidity: m.humidity,
        created_at: m.created_at,
    })
}

pub(super) fn chamber_model(c: &Chamber) -> chambers::ActiveModel {
    chambers::ActiveModel {
        id: Set(c.id.to_string()),
        tenant_id: Set(c.tenant_id.to_string()),
        name: Set(c.name.clone()),
        chamber_type: Set(c.kind.as_str().to_string()),
        capacity: Set(c.capacity),
        temperature: Set(c.temperature),
        humidity: Set(c.humidity),
        created_at: Set(c.created_at),
    }
}

pub(super) fn chamber_task_from_model(m: chamber_tasks::Model) -> Result<ChamberTask> {
    Ok(ChamberTask {
        id: parse_uuid(&m.id)?,
        chamber_id: parse_uuid(&m.chamber_id)?,
        task_type: m.task_type,
        description: m.description,
        cost: m.cost,
        date: m.date,
    })
}

pub(super) fn chamber_task_model(t: &ChamberTask) -> chamber_tasks::ActiveModel {
    chamber_tasks::ActiveModel {
        id: Set(t.id.to_string()),
        chamber_id: Set(t.chamber_id.to_string()),
        task_type: Set(t.task_type.clone()),
        description: Set(t.description.clone()),
        cost: Set(t.cost),
        date: Set(t.date),
    }
}

pub(super) fn process_from_model(m: process_sessions::Model) -> Result<ProcessSession> {
    Ok(ProcessSession {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        code: m.code,
        timing: SessionTiming {
            status: m.status.parse()?,
            start_time: m.start_time,
            end_time: m.end_time,
            paused_at: m.paused_at,
            pause_count: m.pause_count,
            total_pause_hours: m.total_pause_hours,
            total_duration_hours: m.total_duration_hours,
        },
        clean_discard_kg: m.clean_discard_kg,
        contaminated_discard_kg: m.contaminated_discard_kg,
        notes: m.notes,
    })
}

pub(super) fn process_model(s: &ProcessSession) -> process_sessions::ActiveModel {
    process_sessions::ActiveModel {
        id: Set(s.id.to_string()),
        tenant_id: Set(s.tenant_id.to_string()),
        code: Set(s.code.clone()),
        status: Set(s.timing.status.as_str().to_string()),
        start_time: Set(s.timing.start_time),
        end_time: Set(s.timing.end_time),
        paused_at: Set(s.timing.paused_at),
        pause_count: Set(s.timing.pause_count),
        total_pause_hours: Set(s.timing.total_pause_hours),
        total_duration_hours: Set(s.timing.total_duration_hours),
        clean_discard_kg: Set(s.clean_discard_kg),
        contaminated_discard_kg: Set(s.contaminated_discard_kg),
        notes: Set(s.notes.clone()),
    }
}

pub(super) fn product_from_model(m: process_products::Model) -> Result<ProcessProduct> {
    Ok(ProcessProduct {
        id: parse_uuid(&m.id)?,
        process_session_id: parse_uuid(&m.process_session_id)?,
        product_name: m.product_name,
        quantity: m.quantity,
        unit: m.unit,
        cost: m.cost,
    })
}

pub(super) fn product_model(p: &ProcessProduct) -> process_products::ActiveModel {
    process_products::ActiveModel {
        id: Set(p.id.to_string()),
        process_session_id: Set(p.process_session_id.to_string()),
        product_name: Set(p.product_name.clone()),
        quantity: Set(p.quantity),
        unit: Set(p.unit.clone()),
        cost: Set(p.cost),
    }
}

pub(super) fn box_from_model(m: boxes::Model) -> Result<PackedBox> {
    Ok(PackedBox {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        code: m.code,
        product: m.product,
        producer: m.producer,
        caliber: m.caliber,
        category: m.category,
        packaging_code: m.packaging_code,
        destination: m.destination.parse()?,
        weight_kg: m.weight_kg,
        process_session_id: parse_opt_uuid(m.process_session_id)?,
        pallet_id: parse_opt_uuid(m.pallet_id)?,
        created_at: m.created_at,
    })
}

pub(super) fn box_model(b: &PackedBox) -> boxes::ActiveModel {
    boxes::ActiveModel {
        id: Set(b.id.to_string()),
        tenant_id: Set(b.tenant_id.to_string()),
        code: Set(b.code.clone()),
        product: Set(b.product.clone()),
        producer: Set(b.producer.clone()),
        caliber: Set(b.caliber.clone()),
        category: Set(b.category.clone()),
        packaging_code: Set(b.packaging_code.clone()),
        destination: Set(b.destination.as_str().to_string()),
        weight_kg: Set(b.weight_kg),
        process_session_id: Set(b.process_session_id.map(|id| id.to_string())),
        pallet_id: Set(b.pallet_id.map(|id| id.to_string())),
        created_at: Set(b.created_at),
    }
}

pub(super) fn pallet_from_model(m: pallets::Model) -> Result<Pallet> {
    Ok(Pallet {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        number: m.number,
        code: m.code,
        status: m.status.parse()?,
        destination: m.destination,
        operator_name: m.operator_name,
        created_at: m.created_at,
    })
}

pub(super) fn pallet_model(p: &Pallet) -> pallets::ActiveModel {
    pallets::ActiveModel {
        id: Set(p.id.to_string()),
        tenant_id: Set(p.tenant_id.to_string()),
        number: Set(p.number),
        code: Set(p.code.clone()),
        status: Set(p.status.as_str().to_string()),
        destination: Set(p.destination.clone()),
        operator_name: Set(p.operator_name.clone()),
        created_at: Set(p.created_at),
    }
}

pub(super) fn dispatch_from_model(m: dispatches::Model) -> Result<Dispatch> {
    Ok(Dispatch {
        id: parse_uuid(&m.id)?,
        tenant_id: TenantId::new(m.tenant_id)?,
        code: m.code,
        client_name: m.client_name,
        client_type: m.client_type,
        sale_type: m.sale_type,
        delivery_address: m.delivery_address,
        remito_number: m.remito_number,
        dtv: m.dtv,
        dtc: m.dtc,
        closing_code: m.closing_code,
        destination: m.destination,
        discharge: m.discharge,
        transport: m.transport,
        driver_name: m.driver_name,
        license_plate: m.license_plate,
        departure_date: m.departure_date,
        departure_time: m.departure_time,
        status: m.status.parse()?,
        observations: m.observations,
        created_at: m.created_at,
    })
}

pub(super) fn dispatch_model(d: &Dispatch) -> dispatches::ActiveModel {
    dispatches::ActiveModel {
        id: Set(d.id.to_string()),
        tenant_id: Set(d.tenant_id.to_string()),
        code: Set(d.code.clone()),
        client_name: Set(d.client_name.clone()),
        client_type: Set(d.client_type.clone()),
        sale_type: Set(d.sale_type.clone()),
        delivery_address: Set(d.delivery_address.clone()),
        remito_number: Set(d.remito_number.clone()),
        dtv: Set(d.dtv.clone()),
        dtc: Set(d.dtc.clone()),
        closing_code: Set(d.closing_code.clone()),
        destination: Set(d.destination.clone()),
        discharge: Set(d.discharge.clone()),
        transport: Set(d.transport.clone()),
        driver_name: Set(d.driver_name.clone()),
        license_plate: Set(d.license_plate.clone()),
        departure_date: Set(d.departure_date),
        departure_time: Set(d.departure_time.clone()),
        status: Set(d.status.as_str().to_string()),
        observations: Set(d.observations.clone()),
        created_at: Set(d.created_at),
    }
}
