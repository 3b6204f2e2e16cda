//! Specimen library endpoints
//!
//! `GET/POST /api/specimens`, `GET/DELETE /api/specimens/:id`

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use mscope_common::api::{CreateSpecimenResponse, DeleteSpecimenResponse};
use mscope_common::{NewSpecimen, Specimen};
use tracing::{debug, info};

use crate::api::ApiJson;
use crate::db::specimens as store;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/specimens
///
/// Every record, newest first. No pagination.
pub async fn list_specimens(State(state): State<AppState>) -> ApiResult<Json<Vec<Specimen>>> {
    let specimens = store::list_specimens(&state.db).await?;
    debug!(count = specimens.len(), "Listed specimens");
    Ok(Json(specimens))
}

/// POST /api/specimens
pub async fn create_specimen(
    State(state): State<AppState>,
    ApiJson(specimen): ApiJson<NewSpecimen>,
) -> ApiResult<Json<CreateSpecimenResponse>> {
    let id = store::insert_specimen(&state.db, &specimen).await?;
    info!(id, name = specimen.name.as_deref().unwrap_or(""), "Specimen saved");
    Ok(Json(CreateSpecimenResponse { id }))
}

/// GET /api/specimens/:id
///
/// A path id that is not an integer cannot match a row and is reported as
/// not found.
pub async fn get_specimen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Specimen>> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::not_found());
    };

    store::get_specimen(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// DELETE /api/specimens/:id
///
/// Succeeds whether or not the row existed.
pub async fn delete_specimen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteSpecimenResponse>> {
    if let Ok(id) = id.parse::<i64>() {
        if store::delete_specimen(&state.db, id).await? {
            info!(id, "Specimen deleted");
        } else {
            debug!(id, "Delete of absent specimen");
        }
    }

    Ok(Json(DeleteSpecimenResponse { success: true }))
}

pub fn specimen_routes() -> Router<AppState> {
    Router::new()
        .route("/api/specimens", get(list_specimens).post(create_specimen))
        .route("/api/specimens/:id", get(get_specimen).delete(delete_specimen))
}
