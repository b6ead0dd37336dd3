//! Instance lifecycle handlers (list, create, start, stop, status, views,
//! delete), plus the system endpoints.
//!
//! Handlers are thin: extract, delegate to the engine, shape the response.
//! All lifecycle semantics and error translation live in the engine.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::types::{
    AckResponse, CreateInstanceRequest, CreateInstanceResponse, HealthResponse, InstanceSummary,
    ListInstancesResponse, StatusResponse, VersionResponse, ViewsResponse,
};
use super::super::{AppError, SharedState};
use crate::engine::InstanceId;
use crate::miner::ViewOverrides;

/// GET /api/v1/instances - List all instances.
pub(crate) async fn list_instances(
    State(engine): State<SharedState>,
) -> Json<ListInstancesResponse> {
    let instances = engine
        .list()
        .iter()
        .map(|instance| InstanceSummary::from(instance.as_ref()))
        .collect();

    Json(ListInstancesResponse { instances })
}

/// POST /api/v1/instances/{miner} - Create an instance of a miner type.
pub(crate) async fn create_instance(
    State(engine): State<SharedState>,
    Path(miner_id): Path<String>,
    Json(req): Json<CreateInstanceRequest>,
) -> Result<(StatusCode, Json<CreateInstanceResponse>), AppError> {
    let id = engine.create(&miner_id, req.into())?;

    Ok((
        StatusCode::CREATED,
        Json(CreateInstanceResponse { id: id.to_string() }),
    ))
}

/// POST /api/v1/instances/{id}/start - Start an instance.
pub(crate) async fn start_instance(
    State(engine): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, AppError> {
    let id = InstanceId::from(id);
    engine.start(&id)?;
    Ok(Json(AckResponse { id: id.to_string() }))
}

/// POST /api/v1/instances/{id}/stop - Stop an instance.
pub(crate) async fn stop_instance(
    State(engine): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, AppError> {
    let id = InstanceId::from(id);
    engine.stop(&id)?;
    Ok(Json(AckResponse { id: id.to_string() }))
}

/// GET /api/v1/instances/{id}/status - Running state.
pub(crate) async fn instance_status(
    State(engine): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let running = engine.status(&InstanceId::from(id))?;
    Ok(Json(StatusResponse { running }))
}

/// POST /api/v1/instances/{id}/views - Query computed views.
pub(crate) async fn instance_views(
    State(engine): State<SharedState>,
    Path(id): Path<String>,
    Json(overrides): Json<ViewOverrides>,
) -> Result<Json<ViewsResponse>, AppError> {
    let views = engine.views(&InstanceId::from(id), &overrides)?;
    Ok(Json(ViewsResponse { views }))
}

/// DELETE /api/v1/instances/{id} - Delete an instance, running or not.
pub(crate) async fn delete_instance(
    State(engine): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, AppError> {
    let id = InstanceId::from(id);
    engine.delete(&id)?;
    Ok(Json(AckResponse { id: id.to_string() }))
}

/// GET /health - Health check.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// GET /version - Version info.
pub(crate) async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
