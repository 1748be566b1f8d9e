//! Integration tests for SeaOrmPackingStore against in-memory SQLite.

use chrono::Utc;
use domain::code::CodeKind;
use domain::packing::{
    Bin, BinEvent, BinFilter, BinRepository, BinStatus, BoxFilter, Chamber, ChamberRepository,
    CodeSequence, Dispatch, DispatchRepository, DispatchStatus, NewBin, NewBox, NewChamber,
    NewDispatch, OutputSlot, PackedBox, Pallet, PalletRepository, PalletStatus,
    PreselectionRepository, PreselectionSession, ProcessRepository, ProcessSession,
    SessionStatus, plan_bin,
};
use domain::tenant::TenantId;
use domain::{DomainError, ErrorClass};
use infrastructure::SeaOrmPackingStore;
use infrastructure::database::entities::preselection_bins;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

async fn create_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // One connection so every query sees the same in-memory database
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

async fn create_test_store() -> SeaOrmPackingStore {
    SeaOrmPackingStore::new(create_test_db().await)
}

async fn preselection_links(db: &DatabaseConnection, bin_id: Uuid) -> usize {
    preselection_bins::Entity::find()
        .filter(preselection_bins::Column::BinId.eq(bin_id.to_string()))
        .all(db)
        .await
        .unwrap()
        .len()
}

fn tenant() -> TenantId {
    TenantId::new("finca-test").unwrap()
}

async fn yard_bin(store: &SeaOrmPackingStore, weight: f64) -> Bin {
    let code = store
        .next_code(&tenant(), CodeKind::Bin, 2024)
        .await
        .unwrap();
    let bin = Bin::weigh_in(
        tenant(),
        code,
        NewBin {
            field_name: "Finca Norte".into(),
            fruit_type: "Limón".into(),
            lot_name: "L1".into(),
            net_weight: weight,
            ..Default::default()
        },
        Utc::now(),
    );
    store.insert_bin(&bin).await.unwrap();
    bin
}

async fn yard_bin_with_status(store: &SeaOrmPackingStore, status: BinStatus) -> Bin {
    let code = store
        .next_code(&tenant(), CodeKind::Bin, 2024)
        .await
        .unwrap();
    let mut bin = Bin::weigh_in(
        tenant(),
        code,
        NewBin {
            field_name: "Finca Norte".into(),
            fruit_type: "Limón".into(),
            lot_name: "L1".into(),
            net_weight: 380.0,
            ..Default::default()
        },
        Utc::now(),
    );
    bin.status = status;
    store.insert_bin(&bin).await.unwrap();
    bin
}

async fn packed_box(store: &SeaOrmPackingStore) -> PackedBox {
    let code = store
        .next_code(&tenant(), CodeKind::PackedBox, 2024)
        .await
        .unwrap();
    let packed = PackedBox::pack(
        tenant(),
        code,
        NewBox {
            product: "Limón".into(),
            caliber: "100".into(),
            category: "Primera".into(),
            weight_kg: 18.0,
            ..Default::default()
        },
        Utc::now(),
    );
    store.insert_box(&packed).await.unwrap();
    packed
}

#[tokio::test]
async fn test_code_sequence_increments_per_scope() {
    let store = create_test_store().await;

    let first = store.next_code(&tenant(), CodeKind::Bin, 2024).await.unwrap();
    let second = store.next_code(&tenant(), CodeKind::Bin, 2024).await.unwrap();
    let next_year = store.next_code(&tenant(), CodeKind::Bin, 2025).await.unwrap();
    let process = store.next_code(&tenant(), CodeKind::Process, 2024).await.unwrap();

    assert_eq!(first, "B-2024-0001");
    assert_eq!(second, "B-2024-0002");
    assert_eq!(next_year, "B-2025-0001");
    assert_eq!(process, "proceso-001");

    let other = TenantId::new("otra-finca").unwrap();
    let other_first = store.next_code(&other, CodeKind::Bin, 2024).await.unwrap();
    assert_eq!(other_first, "B-2024-0001");
}

#[tokio::test]
async fn test_code_sequence_continues_after_existing_rows() {
    let store = create_test_store().await;

    // Rows written before the counter existed
    for code in ["B-2024-0009", "B-2024-0041", "B-2024-0007"] {
        let bin = Bin::weigh_in(
            tenant(),
            code.into(),
            NewBin {
                field_name: "Finca Sur".into(),
                fruit_type: "Naranja".into(),
                lot_name: "L2".into(),
                net_weight: 300.0,
                ..Default::default()
            },
            Utc::now(),
        );
        store.insert_bin(&bin).await.unwrap();
    }

    let next = store.next_code(&tenant(), CodeKind::Bin, 2024).await.unwrap();
    assert_eq!(next, "B-2024-0042");
}

#[tokio::test]
async fn test_bin_transition_batch_is_atomic() {
    let store = create_test_store().await;
    let now = Utc::now();

    let chamber = Chamber::create(
        tenant(),
        NewChamber {
            name: "Cámara 1".into(),
            ..Default::default()
        },
        now,
    )
    .unwrap();
    store.insert_chamber(&chamber).await.unwrap();

    let first = yard_bin(&store, 400.0).await;
    let second = yard_bin(&store, 420.0).await;

    let event = BinEvent::IngressChamber {
        chamber_id: chamber.id,
    };
    let transitions = vec![
        plan_bin(&first, event, now).unwrap(),
        plan_bin(&second, event, now).unwrap(),
    ];

    // Someone else moves the second bin before the batch lands
    store
        .apply_bin_transitions(
            &tenant(),
            &[plan_bin(&second, BinEvent::Discard, now).unwrap()],
            now,
        )
        .await
        .unwrap();

    let err = store
        .apply_bin_transitions(&tenant(), &transitions, now)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    let first_after = store.find_bin(&tenant(), first.id).await.unwrap().unwrap();
    assert_eq!(first_after.status, BinStatus::InYard);
    assert_eq!(first_after.chamber_id, None);

    store
        .apply_bin_transitions(&tenant(), &transitions[..1], now)
        .await
        .unwrap();
    let in_chamber = store
        .list_bins(
            &tenant(),
            &BinFilter {
                chamber_id: Some(chamber.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(in_chamber.len(), 1);
    assert_eq!(in_chamber[0].status, BinStatus::InChamber);
    assert!(in_chamber[0].chamber_entry_date.is_some());
}

#[tokio::test]
async fn test_join_to_missing_preselection_leaves_bin_in_yard() {
    let db = create_test_db().await;
    let store = SeaOrmPackingStore::new(db.clone());
    let now = Utc::now();

    let bin = yard_bin(&store, 400.0).await;
    let join = plan_bin(
        &bin,
        BinEvent::AddToPreselection {
            session_id: Uuid::new_v4(),
        },
        now,
    )
    .unwrap();

    let err = store
        .apply_bin_transitions(&tenant(), &[join], now)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);

    let after = store.find_bin(&tenant(), bin.id).await.unwrap().unwrap();
    assert_eq!(after.status, BinStatus::InYard);
    assert_eq!(preselection_links(&db, bin.id).await, 0);
}

#[tokio::test]
async fn test_failed_join_insert_rolls_back_status() {
    let db = create_test_db().await;
    let store = SeaOrmPackingStore::new(db.clone());
    let now = Utc::now();

    let session = PreselectionSession::start(tenant(), "LI-2024-001".into(), vec![], now).unwrap();
    store.insert_preselection(&session).await.unwrap();
    let bin = yard_bin(&store, 400.0).await;

    // A stray link row makes the join insert collide after the status update ran
    preselection_bins::Entity::insert(preselection_bins::ActiveModel {
        preselection_id: Set(session.id.to_string()),
        bin_id: Set(bin.id.to_string()),
        added_at: Set(now),
    })
    .exec_without_returning(&db)
    .await
    .unwrap();

    let join = plan_bin(
        &bin,
        BinEvent::AddToPreselection {
            session_id: session.id,
        },
        now,
    )
    .unwrap();
    assert!(
        store
            .apply_bin_transitions(&tenant(), &[join], now)
            .await
            .is_err()
    );

    let after = store.find_bin(&tenant(), bin.id).await.unwrap().unwrap();
    assert_eq!(after.status, BinStatus::InYard);
    assert_eq!(preselection_links(&db, bin.id).await, 1);
}

#[tokio::test]
async fn test_completed_preselection_accepts_no_bins() {
    let db = create_test_db().await;
    let store = SeaOrmPackingStore::new(db.clone());
    let now = Utc::now();

    let mut session =
        PreselectionSession::start(tenant(), "LI-2024-001".into(), vec![], now).unwrap();
    store.insert_preselection(&session).await.unwrap();
    let bin = yard_bin(&store, 400.0).await;

    // Planned while the session was still open
    let join = plan_bin(
        &bin,
        BinEvent::AddToPreselection {
            session_id: session.id,
        },
        now,
    )
    .unwrap();

    session.finalize(now, 0.0).unwrap();
    store
        .save_preselection(&session, SessionStatus::InProgress)
        .await
        .unwrap();

    let err = store
        .apply_bin_transitions(&tenant(), &[join], now)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let after = store.find_bin(&tenant(), bin.id).await.unwrap().unwrap();
    assert_eq!(after.status, BinStatus::InYard);
    assert_eq!(preselection_links(&db, bin.id).await, 0);
}

#[tokio::test]
async fn test_complete_process_rejects_bins_joined_after_planning() {
    let store = create_test_store().await;
    let now = Utc::now();

    let mut session = ProcessSession::start(tenant(), "proceso-001".into(), now);
    store.insert_process(&session).await.unwrap();

    let mut bin = yard_bin_with_status(&store, BinStatus::ReadyForProcess).await;
    let join = plan_bin(
        &bin,
        BinEvent::AddToProcess {
            session_id: session.id,
        },
        now,
    )
    .unwrap();
    store
        .apply_bin_transitions(&tenant(), &[join], now)
        .await
        .unwrap();
    bin.status = BinStatus::InProcess;

    // Finalize planned before the join landed
    session.finalize(now).unwrap();
    let err = store
        .complete_process(&session, SessionStatus::InProgress, &[])
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
    let still_open = store
        .find_process(&tenant(), session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_open.timing.status, SessionStatus::InProgress);

    let finish = plan_bin(&bin, BinEvent::FinishProcess, now).unwrap();
    store
        .complete_process(&session, SessionStatus::InProgress, &[finish])
        .await
        .unwrap();
    let processed = store.find_bin(&tenant(), bin.id).await.unwrap().unwrap();
    assert_eq!(processed.status, BinStatus::Processed);
}

#[tokio::test]
async fn test_preselection_round_keeps_slots_and_inputs() {
    let store = create_test_store().await;
    let now = Utc::now();

    let session = PreselectionSession::start(
        tenant(),
        "LI-2024-001".into(),
        vec![
            OutputSlot {
                output_number: 2,
                color: Some("Color 3".into()),
                caliber: None,
                is_discard: false,
                label: None,
            },
            OutputSlot {
                output_number: 1,
                color: None,
                caliber: None,
                is_discard: true,
                label: Some("Descarte".into()),
            },
        ],
        now,
    )
    .unwrap();
    store.insert_preselection(&session).await.unwrap();

    let bin = yard_bin(&store, 500.0).await;
    let join = plan_bin(
        &bin,
        BinEvent::AddToPreselection {
            session_id: session.id,
        },
        now,
    )
    .unwrap();
    store
        .apply_bin_transitions(&tenant(), &[join], now)
        .await
        .unwrap();

    let loaded = store
        .find_preselection(&tenant(), session.id)
        .await
        .unwrap()
        .unwrap();
    let numbers: Vec<i32> = loaded.output_config.iter().map(|s| s.output_number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let inputs = store
        .preselection_input_bins(&tenant(), session.id)
        .await
        .unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].status, BinStatus::InPreselection);

    // Saving against a stale status is rejected
    let mut paused = loaded.clone();
    paused.pause(now).unwrap();
    store
        .save_preselection(&paused, SessionStatus::InProgress)
        .await
        .unwrap();
    let err = store
        .save_preselection(&paused, SessionStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_process_discard_accumulates_until_completed() {
    let store = create_test_store().await;
    let now = Utc::now();

    let mut session = ProcessSession::start(tenant(), "proceso-001".into(), now);
    store.insert_process(&session).await.unwrap();

    store
        .add_process_discard(&tenant(), session.id, 10.0, 2.5)
        .await
        .unwrap();
    store
        .add_process_discard(&tenant(), session.id, 5.0, 0.0)
        .await
        .unwrap();

    let loaded = store
        .find_process(&tenant(), session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.clean_discard_kg, 15.0);
    assert_eq!(loaded.contaminated_discard_kg, 2.5);

    session.finalize(now).unwrap();
    store
        .complete_process(&session, SessionStatus::InProgress, &[])
        .await
        .unwrap();

    let err = store
        .add_process_discard(&tenant(), session.id, 1.0, 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    // Completing does not overwrite the accumulated discard
    let completed = store
        .find_process(&tenant(), session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(completed.timing.status, SessionStatus::Completed);
    assert_eq!(completed.clean_discard_kg, 15.0);
}

#[tokio::test]
async fn test_box_cannot_join_two_pallets() {
    let store = create_test_store().await;
    let now = Utc::now();

    let a = packed_box(&store).await;
    let b = packed_box(&store).await;

    let first = Pallet::assemble(tenant(), 1, "P-2024-0001".into(), None, now);
    store.insert_pallet(&first, &[a.id, b.id]).await.unwrap();

    let c = packed_box(&store).await;
    let second = Pallet::assemble(tenant(), 2, "P-2024-0002".into(), None, now);
    let err = store
        .insert_pallet(&second, &[b.id, c.id])
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);

    // The failed pallet left nothing behind
    let pallets = store.list_pallets(&tenant(), None).await.unwrap();
    assert_eq!(pallets.len(), 1);
    let loose = store
        .find_boxes(&tenant(), &[c.id])
        .await
        .unwrap();
    assert_eq!(loose[0].pallet_id, None);

    let on_first = store
        .list_boxes(
            &tenant(),
            &BoxFilter {
                pallet_id: Some(first.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(on_first.len(), 2);
}

#[tokio::test]
async fn test_dispatch_takes_only_pallets_on_floor() {
    let store = create_test_store().await;
    let now = Utc::now();

    let pallet = Pallet::assemble(tenant(), 1, "P-2024-0001".into(), None, now);
    store.insert_pallet(&pallet, &[]).await.unwrap();

    let new = NewDispatch {
        client_name: "Frutas del Sur".into(),
        pallet_ids: vec![pallet.id],
        ..Default::default()
    };
    let (dispatch, pallet_ids) =
        Dispatch::prepare(tenant(), "D-2024-0001".into(), new.clone(), now).unwrap();
    store.insert_dispatch(&dispatch, &pallet_ids).await.unwrap();

    let shipped = store.dispatch_pallets(&tenant(), dispatch.id).await.unwrap();
    assert_eq!(shipped.len(), 1);
    assert_eq!(shipped[0].status, PalletStatus::Dispatched);

    let (again, ids) = Dispatch::prepare(tenant(), "D-2024-0002".into(), new, now).unwrap();
    let err = store.insert_dispatch(&again, &ids).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Conflict);
    assert!(store.find_dispatch(&tenant(), again.id).await.unwrap().is_none());

    store
        .update_dispatch_status(
            &tenant(),
            dispatch.id,
            DispatchStatus::Preparing,
            DispatchStatus::Loaded,
        )
        .await
        .unwrap();
    let stale = store
        .update_dispatch_status(
            &tenant(),
            dispatch.id,
            DispatchStatus::Preparing,
            DispatchStatus::Loaded,
        )
        .await;
    assert!(stale.is_err());
}

#[tokio::test]
async fn test_chamber_settings_on_unknown_chamber() {
    let store = create_test_store().await;
    let err = store
        .update_chamber_settings(&tenant(), uuid::Uuid::new_v4(), Some(4.0), None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);
}
