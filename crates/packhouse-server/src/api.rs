use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use domain::field::{Lot, LotSummary};
use domain::packing::{
    BinFilter, BinStatus, BoxFilter, NewBin, NewBox, NewChamber, NewChamberTask, NewDispatch,
    NewOutputBin, NewProcessProduct, NewSessionInput, NewTruckEntry, NewWorker, OutputSlot,
    PalletStatus,
};
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

type AppRef = State<Arc<AppState>>;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/events", get(sse_handler))
        .nest("/api/packing", packing_routes())
        .route("/api/field/lots/summary", post(summarize_lots))
        .with_state(state)
}

fn packing_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Balanza
        .route("/truck-entries", get(list_truck_entries).post(create_truck_entry))
        .route("/truck-entries/{id}/finalize", post(finalize_truck_entry))
        .route("/bins", get(list_bins).post(create_bin))
        .route("/bins/{id}/egress", post(egress_bin))
        .route("/bins/{id}/discard", post(discard_bin))
        // Preselection
        .route("/preselections", get(list_preselections).post(start_preselection))
        .route("/preselections/{id}", get(preselection_summary))
        .route("/preselections/{id}/bins", post(add_bin_to_preselection))
        .route("/preselections/{id}/workers", post(add_worker))
        .route("/preselections/{id}/inputs", post(register_preselection_input))
        .route("/preselections/{id}/output-bins", post(generate_output_bin))
        .route("/preselections/{id}/pause", post(pause_preselection))
        .route("/preselections/{id}/resume", post(resume_preselection))
        .route("/preselections/{id}/finalize", post(finalize_preselection))
        // Chambers
        .route("/chambers", get(list_chambers).post(create_chamber))
        .route("/chambers/{id}/ingress", post(ingress_bins))
        .route("/chambers/{id}/tasks", post(register_chamber_task))
        .route("/chambers/{id}/settings", put(update_chamber_settings))
        // Process
        .route("/processes", get(list_processes).post(start_process))
        .route("/processes/{id}", get(process_summary))
        .route("/processes/{id}/bins", post(add_bin_to_process))
        .route("/processes/{id}/products", post(register_process_product))
        .route("/processes/{id}/discard", post(register_discard))
        .route("/processes/{id}/pause", post(pause_process))
        .route("/processes/{id}/resume", post(resume_process))
        .route("/processes/{id}/finalize", post(finalize_process))
        .route("/boxes", get(list_boxes).post(create_box))
        // Pallets and dispatch
        .route("/pallets", get(list_pallets).post(create_pallet))
        .route("/dispatches", get(list_dispatches).post(create_dispatch))
        .route("/dispatches/{id}/status", put(update_dispatch_status))
        .route("/dashboard", get(dashboard))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Live packing events of the caller's tenant
async fn sse_handler(
    State(state): AppRef,
    Caller(scope): Caller,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let tenant = scope.tenant_id;
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(move |msg| match msg {
        Ok(event) if event.tenant_id() == &tenant => Some(
            Event::default()
                .event(event.event_type())
                .json_data(&event),
        ),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(tenant_id = %tenant, skipped, "Event listener lagged behind");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

// --- Balanza ---

async fn create_truck_entry(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<NewTruckEntry>,
) -> ApiResult<impl IntoResponse> {
    let entry = state.service.create_truck_entry(&scope, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_truck_entries(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_truck_entries(&scope).await?))
}

async fn finalize_truck_entry(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.finalize_truck_entry(&scope, id).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinQuery {
    /// Comma-separated statuses, e.g. `IN_YARD,READY_FOR_PROCESS`
    status: Option<String>,
    truck_entry_id: Option<Uuid>,
    chamber_id: Option<Uuid>,
    preselection_id: Option<Uuid>,
}

impl BinQuery {
    fn into_filter(self) -> domain::error::Result<BinFilter> {
        let statuses = match self.status {
            Some(list) => list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<BinStatus>)
                .collect::<domain::error::Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(BinFilter {
            statuses,
            truck_entry_id: self.truck_entry_id,
            chamber_id: self.chamber_id,
            preselection_id: self.preselection_id,
            updated_since: None,
        })
    }
}

async fn list_bins(
    State(state): AppRef,
    Caller(scope): Caller,
    Query(query): Query<BinQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    Ok(Json(state.service.list_bins(&scope, &filter).await?))
}

async fn create_bin(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<NewBin>,
) -> ApiResult<impl IntoResponse> {
    let bin = state.service.create_bin(&scope, body).await?;
    Ok((StatusCode::CREATED, Json(bin)))
}

async fn egress_bin(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.egress_bin_from_chamber(&scope, id).await?))
}

async fn discard_bin(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.discard_bin(&scope, id).await?))
}

// --- Preselection ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartPreselection {
    #[serde(default)]
    output_config: Vec<OutputSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinRef {
    bin_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinalizePreselection {
    #[serde(default)]
    discard_kg: f64,
}

async fn start_preselection(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<StartPreselection>,
) -> ApiResult<impl IntoResponse> {
    let session = state
        .service
        .start_preselection(&scope, body.output_config)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn list_preselections(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_preselections(&scope).await?))
}

async fn preselection_summary(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.preselection_summary(&scope, id).await?))
}

async fn add_bin_to_preselection(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<BinRef>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .add_bin_to_preselection(&scope, id, body.bin_id)
            .await?,
    ))
}

async fn add_worker(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<NewWorker>,
) -> ApiResult<impl IntoResponse> {
    let worker = state
        .service
        .add_worker_to_preselection(&scope, id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

async fn register_preselection_input(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<NewSessionInput>,
) -> ApiResult<impl IntoResponse> {
    let input = state
        .service
        .register_preselection_input(&scope, id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(input)))
}

async fn generate_output_bin(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<NewOutputBin>,
) -> ApiResult<impl IntoResponse> {
    let bin = state.service.generate_output_bin(&scope, id, body).await?;
    Ok((StatusCode::CREATED, Json(bin)))
}

async fn pause_preselection(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.pause_preselection(&scope, id).await?))
}

async fn resume_preselection(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.resume_preselection(&scope, id).await?))
}

async fn finalize_preselection(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<FinalizePreselection>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .finalize_preselection(&scope, id, body.discard_kg)
            .await?,
    ))
}

// --- Chambers ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngressBins {
    bin_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct ChamberSettings {
    temperature: Option<f64>,
    humidity: Option<f64>,
}

async fn create_chamber(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<NewChamber>,
) -> ApiResult<impl IntoResponse> {
    let chamber = state.service.create_chamber(&scope, body).await?;
    Ok((StatusCode::CREATED, Json(chamber)))
}

async fn list_chambers(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_chambers(&scope).await?))
}

async fn ingress_bins(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<IngressBins>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .ingress_bins_to_chamber(&scope, id, &body.bin_ids)
            .await?,
    ))
}

async fn register_chamber_task(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<NewChamberTask>,
) -> ApiResult<impl IntoResponse> {
    let task = state.service.register_chamber_task(&scope, id, body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_chamber_settings(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<ChamberSettings>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .update_chamber_settings(&scope, id, body.temperature, body.humidity)
            .await?,
    ))
}

// --- Process ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Discard {
    #[serde(default)]
    clean_kg: f64,
    #[serde(default)]
    contaminated_kg: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxQuery {
    process_session_id: Option<Uuid>,
    pallet_id: Option<Uuid>,
}

async fn start_process(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    let session = state.service.start_process(&scope).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn list_processes(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_processes(&scope).await?))
}

async fn process_summary(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.process_summary(&scope, id).await?))
}

async fn add_bin_to_process(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<BinRef>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .add_bin_to_process(&scope, id, body.bin_id)
            .await?,
    ))
}

async fn register_process_product(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<NewProcessProduct>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .service
        .register_process_product(&scope, id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn register_discard(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<Discard>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .register_discard(&scope, id, body.clean_kg, body.contaminated_kg)
            .await?,
    ))
}

async fn pause_process(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.pause_process(&scope, id).await?))
}

async fn resume_process(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.resume_process(&scope, id).await?))
}

async fn finalize_process(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.finalize_process(&scope, id).await?))
}

async fn create_box(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<NewBox>,
) -> ApiResult<impl IntoResponse> {
    let packed = state.service.create_box(&scope, body).await?;
    Ok((StatusCode::CREATED, Json(packed)))
}

async fn list_boxes(
    State(state): AppRef,
    Caller(scope): Caller,
    Query(query): Query<BoxQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = BoxFilter {
        process_session_id: query.process_session_id,
        pallet_id: query.pallet_id,
        created_since: None,
    };
    Ok(Json(state.service.list_boxes(&scope, &filter).await?))
}

// --- Pallets and dispatch ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePallet {
    box_ids: Vec<Uuid>,
    #[serde(default)]
    operator_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PalletQuery {
    status: Option<PalletStatus>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

async fn create_pallet(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<CreatePallet>,
) -> ApiResult<impl IntoResponse> {
    let pallet = state
        .service
        .create_pallet(&scope, &body.box_ids, body.operator_name)
        .await?;
    Ok((StatusCode::CREATED, Json(pallet)))
}

async fn list_pallets(
    State(state): AppRef,
    Caller(scope): Caller,
    Query(query): Query<PalletQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_pallets(&scope, query.status).await?))
}

async fn create_dispatch(
    State(state): AppRef,
    Caller(scope): Caller,
    Json(body): Json<NewDispatch>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.create_dispatch(&scope, body).await?;
    Ok((StatusCode::CREATED, Json(dispatch)))
}

async fn list_dispatches(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.list_dispatches(&scope).await?))
}

async fn update_dispatch_status(
    State(state): AppRef,
    Caller(scope): Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state
            .service
            .update_dispatch_status(&scope, id, &body.status)
            .await?,
    ))
}

async fn dashboard(State(state): AppRef, Caller(scope): Caller) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.dashboard(&scope).await?))
}

// --- Campo ---

/// Cost, harvest and task-recency figures for lots posted by the field module
async fn summarize_lots(Caller(_scope): Caller, Json(lots): Json<Vec<Lot>>) -> impl IntoResponse {
    let summaries: Vec<LotSummary> = lots.iter().map(LotSummary::from_lot).collect();
    Json(summaries)
}
