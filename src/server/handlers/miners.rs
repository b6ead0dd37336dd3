//! Miner catalog handlers.

use axum::{Json, extract::State};

use super::super::SharedState;
use super::super::types::{ListMinersResponse, MinerTypeSummary};

/// GET /api/v1/miners - List registered miner types.
pub(crate) async fn list_miners(State(engine): State<SharedState>) -> Json<ListMinersResponse> {
    let miners = engine
        .catalog()
        .list()
        .iter()
        .map(|descriptor| MinerTypeSummary::from(descriptor.as_ref()))
        .collect();

    Json(ListMinersResponse { miners })
}
