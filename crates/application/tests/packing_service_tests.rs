//! End-to-end use-case tests: PackingService over SQLite in memory.

use application::PackingService;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::event::{NoopPublisher, PublishError};
use domain::packing::{
    BinFilter, BinStatus, DispatchStatus, NewBin, NewBox, NewChamber, NewDispatch,
    NewOutputBin, NewProcessProduct, NewTruckEntry, NewWorker, OutputSlot, PalletStatus,
    SessionStatus, TruckEntryStatus,
};
use domain::tenant::{AccessScope, Role, TenantId};
use domain::{Clock, DomainError, ErrorClass, EventPublisher, PackingEvent};
use infrastructure::SeaOrmPackingStore;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::sync::{Arc, Mutex};

struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<PackingEvent>>,
}

impl RecordingPublisher {
    fn types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PackingEvent) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: PackingEvent) -> Result<(), PublishError> {
        Err("broker down".into())
    }
}

struct Harness {
    service: PackingService,
    clock: Arc<FixedClock>,
    events: Arc<RecordingPublisher>,
}

async fn store() -> Arc<SeaOrmPackingStore> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    Arc::new(SeaOrmPackingStore::new(db))
}

async fn harness() -> Harness {
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap());
    let events = Arc::new(RecordingPublisher::default());
    let service = PackingService::new(store().await, events.clone(), clock.clone());
    Harness {
        service,
        clock,
        events,
    }
}

fn supervisor() -> AccessScope {
    AccessScope::new(TenantId::new("finca-norte").unwrap(), "u-1", Role::Supervisor)
}

fn new_bin(weight: f64) -> NewBin {
    NewBin {
        field_name: "Finca Norte".into(),
        fruit_type: "Limón".into(),
        lot_name: "L1".into(),
        net_weight: weight,
        ..Default::default()
    }
}

fn new_box(weight: f64, session: Option<uuid::Uuid>) -> NewBox {
    NewBox {
        product: "Limón".into(),
        caliber: "100".into(),
        category: "1".into(),
        weight_kg: weight,
        process_session_id: session,
        ..Default::default()
    }
}

fn output(color: &str, weight: f64) -> NewOutputBin {
    NewOutputBin {
        fruit_color: color.into(),
        fruit_quality: "Primera".into(),
        net_weight: weight,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_operator_role_is_rejected() {
    let h = harness().await;
    let operator = AccessScope::new(TenantId::new("finca-norte").unwrap(), "u-2", Role::Operator);

    let err = h.service.create_bin(&operator, new_bin(400.0)).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
    assert_eq!(err.class(), ErrorClass::Forbidden);
    assert!(h.events.types().is_empty());
}

#[tokio::test]
async fn test_validation_precedes_code_allocation() {
    let h = harness().await;
    let scope = supervisor();

    let err = h.service.create_bin(&scope, new_bin(0.0)).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);

    let bin = h.service.create_bin(&scope, new_bin(400.0)).await.unwrap();
    assert_eq!(bin.code, "B-2024-0001");
    assert_eq!(bin.status, BinStatus::InYard);
}

#[tokio::test]
async fn test_tenants_do_not_see_each_other() {
    let h = harness().await;
    let bin = h.service.create_bin(&supervisor(), new_bin(400.0)).await.unwrap();

    let other = AccessScope::new(TenantId::new("finca-sur").unwrap(), "u-9", Role::Admin);
    let session = h.service.start_preselection(&other, vec![]).await.unwrap();
    let err = h
        .service
        .add_bin_to_preselection(&other, session.id, bin.id)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);

    let other_bins = h.service.list_bins(&other, &BinFilter::default()).await.unwrap();
    assert!(other_bins.is_empty());
}

#[tokio::test]
async fn test_truck_entry_lists_bins_and_total() {
    let h = harness().await;
    let scope = supervisor();

    let entry = h
        .service
        .create_truck_entry(
            &scope,
            NewTruckEntry {
                remito_number: "R-001".into(),
                dtv: "DTV-9".into(),
                transport: "Transportes Sur".into(),
                driver_name: "Juan Pérez".into(),
                driver_dni: "30111222".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.operator_id.as_deref(), Some("u-1"));

    let empty = h.service.list_truck_entries(&scope).await.unwrap();
    assert_eq!(empty[0].total_weight, 0.0);
    assert_eq!(empty[0].entry.status, TruckEntryStatus::Pending);

    let finalized = h.service.finalize_truck_entry(&scope, entry.id).await.unwrap();
    assert_eq!(finalized.status, TruckEntryStatus::Finalized);

    // Finalizing does not lock the entry against late bins
    for weight in [400.0, 350.5] {
        let mut bin = new_bin(weight);
        bin.truck_entry_id = Some(entry.id);
        h.service.create_bin(&scope, bin).await.unwrap();
    }

    let entries = h.service.list_truck_entries(&scope).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].bins.len(), 2);
    assert_eq!(entries[0].total_weight, 750.5);

    let err = h.service.finalize_truck_entry(&scope, entry.id).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
}

#[tokio::test]
async fn test_preselection_flow_and_colour_policy() {
    let h = harness().await;
    let scope = supervisor();

    let session = h
        .service
        .start_preselection(
            &scope,
            vec![OutputSlot {
                output_number: 1,
                color: Some("Color 1".into()),
                caliber: None,
                is_discard: false,
                label: None,
            }],
        )
        .await
        .unwrap();
    assert_eq!(session.code, "LI-2024-001");

    for weight in [500.0, 500.0] {
        let bin = h.service.create_bin(&scope, new_bin(weight)).await.unwrap();
        let moved = h
            .service
            .add_bin_to_preselection(&scope, session.id, bin.id)
            .await
            .unwrap();
        assert_eq!(moved.status, BinStatus::InPreselection);
    }
    h.service
        .add_worker_to_preselection(
            &scope,
            session.id,
            NewWorker {
                worker_id: "w-7".into(),
                role: Some("clasificador".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let green = h
        .service
        .generate_output_bin(&scope, session.id, output("Color 3", 450.0))
        .await
        .unwrap();
    assert_eq!(green.status, BinStatus::InYard);
    assert_eq!(green.internal_lot.as_deref(), Some("LI-2024-001"));

    let ripe = h
        .service
        .generate_output_bin(&scope, session.id, output("Color 1", 400.0))
        .await
        .unwrap();
    assert_eq!(ripe.status, BinStatus::ReadyForProcess);

    h.clock.advance(Duration::hours(1));
    h.service.pause_preselection(&scope, session.id).await.unwrap();
    h.clock.advance(Duration::minutes(30));
    h.service.resume_preselection(&scope, session.id).await.unwrap();
    h.clock.advance(Duration::hours(1));

    let summary = h
        .service
        .finalize_preselection(&scope, session.id, 100.0)
        .await
        .unwrap();
    assert_eq!(summary.session.timing.status, SessionStatus::Completed);
    assert_eq!(summary.total_input_kg, 1000.0);
    assert_eq!(summary.total_output_kg, 850.0);
    assert_eq!(summary.merma, 50.0);
    assert_eq!(summary.workers.len(), 1);
    assert_eq!(summary.net_duration_hours, Some(2.0));

    let late = h.service.create_bin(&scope, new_bin(300.0)).await.unwrap();
    let err = h
        .service
        .add_bin_to_preselection(&scope, session.id, late.id)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
    let late = h
        .service
        .list_bins(&scope, &BinFilter::status(BinStatus::InYard))
        .await
        .unwrap()
        .into_iter()
        .find(|b| b.id == late.id)
        .unwrap();
    assert_eq!(late.status, BinStatus::InYard);
}

#[tokio::test]
async fn test_chamber_ingress_is_all_or_nothing() {
    let h = harness().await;
    let scope = supervisor();

    let chamber = h
        .service
        .create_chamber(
            &scope,
            NewChamber {
                name: "Cámara 1".into(),
                capacity: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let a = h.service.create_bin(&scope, new_bin(300.0)).await.unwrap();
    let b = h.service.create_bin(&scope, new_bin(200.0)).await.unwrap();
    h.service.discard_bin(&scope, b.id).await.unwrap();

    let err = h
        .service
        .ingress_bins_to_chamber(&scope, chamber.id, &[a.id, b.id])
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
    let yard = h
        .service
        .list_bins(&scope, &BinFilter::status(BinStatus::InYard))
        .await
        .unwrap();
    assert_eq!(yard.len(), 1);

    let c = h.service.create_bin(&scope, new_bin(250.0)).await.unwrap();
    let summary = h
        .service
        .ingress_bins_to_chamber(&scope, chamber.id, &[a.id, c.id])
        .await
        .unwrap();
    assert_eq!(summary.bin_count, 2);
    assert_eq!(summary.total_kg, 550.0);
    assert!(summary.over_capacity);

    let out = h.service.egress_bin_from_chamber(&scope, a.id).await.unwrap();
    assert_eq!(out.status, BinStatus::ReadyForProcess);
    assert!(out.chamber_id.is_none());
    assert!(out.chamber_exit_date.is_some());

    let chambers = h.service.list_chambers(&scope).await.unwrap();
    assert_eq!(chambers[0].bin_count, 1);
}

#[tokio::test]
async fn test_process_to_dispatch() {
    let h = harness().await;
    let scope = supervisor();

    let process = h.service.start_process(&scope).await.unwrap();
    assert_eq!(process.code, "proceso-001");

    let bin = h.service.create_bin(&scope, new_bin(1000.0)).await.unwrap();
    let chamber = h
        .service
        .create_chamber(
            &scope,
            NewChamber {
                name: "Desverdizado".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.service
        .ingress_bins_to_chamber(&scope, chamber.id, &[bin.id])
        .await
        .unwrap();
    h.service.egress_bin_from_chamber(&scope, bin.id).await.unwrap();
    h.service
        .add_bin_to_process(&scope, process.id, bin.id)
        .await
        .unwrap();

    h.service
        .register_process_product(
            &scope,
            process.id,
            NewProcessProduct {
                product_name: "Cera".into(),
                quantity: 2.0,
                unit: "L".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.service
        .register_discard(&scope, process.id, 20.0, 5.0)
        .await
        .unwrap();
    let session = h
        .service
        .register_discard(&scope, process.id, 10.0, 0.0)
        .await
        .unwrap();
    assert_eq!(session.total_discard_kg(), 35.0);

    let mut box_ids = Vec::new();
    for _ in 0..4 {
        let packed = h
            .service
            .create_box(&scope, new_box(200.0, Some(process.id)))
            .await
            .unwrap();
        box_ids.push(packed.id);
    }
    assert!(h.service.process_summary(&scope, process.id).await.unwrap().box_count == 4);

    let summary = h.service.finalize_process(&scope, process.id).await.unwrap();
    assert_eq!(summary.efficiency, 80.0);
    assert_eq!(summary.total_discard_kg, 35.0);
    assert_eq!(summary.products.len(), 1);
    let processed = h
        .service
        .list_bins(&scope, &BinFilter::status(BinStatus::Processed))
        .await
        .unwrap();
    assert_eq!(processed.len(), 1);

    let err = h
        .service
        .register_discard(&scope, process.id, 1.0, 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    let pallet = h
        .service
        .create_pallet(&scope, &box_ids[..3], Some(" Ana ".into()))
        .await
        .unwrap();
    assert_eq!(pallet.code, "P-2024-0001");
    assert_eq!(pallet.number, 1);
    assert_eq!(pallet.operator_name.as_deref(), Some("Ana"));

    let err = h
        .service
        .create_pallet(&scope, &box_ids[2..], None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
    let second = h
        .service
        .create_pallet(&scope, &box_ids[3..], None)
        .await
        .unwrap();
    assert_eq!(second.number, 2);

    let dispatch = h
        .service
        .create_dispatch(
            &scope,
            NewDispatch {
                client_name: "Exportadora Norte".into(),
                pallet_ids: vec![pallet.id, second.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(dispatch.code, "D-2024-0001");
    assert_eq!(dispatch.status, DispatchStatus::Preparing);

    let pallets = h
        .service
        .list_pallets(&scope, Some(PalletStatus::Dispatched))
        .await
        .unwrap();
    assert_eq!(pallets.len(), 2);
    let first = pallets.iter().find(|p| p.pallet.id == pallet.id).unwrap();
    assert_eq!(first.box_count, 3);
    assert_eq!(first.total_weight, 600.0);

    let err = h
        .service
        .create_dispatch(
            &scope,
            NewDispatch {
                client_name: "Otro".into(),
                pallet_ids: vec![pallet.id],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    let dispatches = h.service.list_dispatches(&scope).await.unwrap();
    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0].pallet_count, 2);
    assert_eq!(dispatches[0].box_count, 4);
    assert_eq!(dispatches[0].total_weight, 800.0);
}

#[tokio::test]
async fn test_completed_process_accepts_no_bins() {
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap());
    let service = PackingService::new(store().await, Arc::new(NoopPublisher), clock);
    let scope = supervisor();

    let process = service.start_process(&scope).await.unwrap();
    let bin = service.create_bin(&scope, new_bin(600.0)).await.unwrap();
    let chamber = service
        .create_chamber(
            &scope,
            NewChamber {
                name: "Cámara 2".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    service
        .ingress_bins_to_chamber(&scope, chamber.id, &[bin.id])
        .await
        .unwrap();
    service.egress_bin_from_chamber(&scope, bin.id).await.unwrap();

    let summary = service.finalize_process(&scope, process.id).await.unwrap();
    assert_eq!(summary.session.timing.status, SessionStatus::Completed);

    let err = service
        .add_bin_to_process(&scope, process.id, bin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let ready = service
        .list_bins(&scope, &BinFilter::status(BinStatus::ReadyForProcess))
        .await
        .unwrap();
    assert_eq!(ready.len(), 1);
}

#[tokio::test]
async fn test_dispatch_status_moves_one_step() {
    let h = harness().await;
    let scope = supervisor();
    let dispatch = h
        .service
        .create_dispatch(
            &scope,
            NewDispatch {
                client_name: "Mercado Central".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = h
        .service
        .update_dispatch_status(&scope, dispatch.id, "IN_TRANSIT")
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    let err = h
        .service
        .update_dispatch_status(&scope, dispatch.id, "SHIPPED")
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);

    for status in ["LOADED", "IN_TRANSIT", "DELIVERED"] {
        let updated = h
            .service
            .update_dispatch_status(&scope, dispatch.id, status)
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), status);
    }
}

#[tokio::test]
async fn test_dashboard_counts() {
    let h = harness().await;
    let scope = supervisor();

    h.service.create_bin(&scope, new_bin(400.0)).await.unwrap();
    let bin = h.service.create_bin(&scope, new_bin(600.0)).await.unwrap();
    let session = h.service.start_preselection(&scope, vec![]).await.unwrap();
    h.service
        .add_bin_to_preselection(&scope, session.id, bin.id)
        .await
        .unwrap();
    let process = h.service.start_process(&scope).await.unwrap();
    h.service
        .create_box(&scope, new_box(18.0, Some(process.id)))
        .await
        .unwrap();

    let dashboard = h.service.dashboard(&scope).await.unwrap();
    assert_eq!(dashboard.bins_in_yard, 1);
    assert_eq!(dashboard.flow.bins_in_preselection, 1);
    assert_eq!(dashboard.boxes_today, 1);
    assert_eq!(dashboard.line_efficiency, 0.0);
    assert_eq!(
        dashboard.active_preselection.map(|s| s.session.id),
        Some(session.id)
    );
    assert_eq!(
        dashboard.active_process.map(|s| s.session.id),
        Some(process.id)
    );

    h.clock.advance(Duration::days(1));
    let tomorrow = h.service.dashboard(&scope).await.unwrap();
    assert_eq!(tomorrow.boxes_today, 0);
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_action() {
    let clock = FixedClock::at(Utc::now());
    let service = PackingService::new(store().await, Arc::new(FailingPublisher), clock);

    let bin = service.create_bin(&supervisor(), new_bin(400.0)).await.unwrap();
    let listed = service
        .list_bins(&supervisor(), &BinFilter::default())
        .await
        .unwrap();
    assert_eq!(listed[0].id, bin.id);
}

#[tokio::test]
async fn test_events_follow_commits() {
    let h = harness().await;
    let scope = supervisor();
    let bin = h.service.create_bin(&scope, new_bin(400.0)).await.unwrap();
    h.service.discard_bin(&scope, bin.id).await.unwrap();
    let _ = h.service.discard_bin(&scope, bin.id).await.unwrap_err();

    assert_eq!(h.events.types(), vec!["BinRegistered", "BinsMoved"]);
}
