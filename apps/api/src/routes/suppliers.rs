//! Supplier handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use medlocus_core::validation::validate_supplier;
use medlocus_core::{Supplier, SupplierInput};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.suppliers().list().await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Supplier>> {
    state
        .db
        .suppliers()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Supplier", id))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SupplierInput>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let input = validate_supplier(&input)?;
    let supplier = state.db.suppliers().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}
