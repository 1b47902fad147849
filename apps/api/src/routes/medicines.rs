//! Medicine catalog handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use medlocus_core::validation::{validate_medicine, validate_search_query};
use medlocus_core::{MedicineInput, MedicineListing};
use medlocus_db::DbError;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list_medicines(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MedicineListing>>> {
    Ok(Json(state.db.medicines().list().await?))
}

/// Empty `q` lists everything.
pub async fn search_medicines(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<MedicineListing>>> {
    let medicines = match validate_search_query(&query.q)? {
        Some(q) => state.db.medicines().search(&q).await?,
        None => state.db.medicines().list().await?,
    };
    Ok(Json(medicines))
}

pub async fn get_medicine(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MedicineListing>> {
    state
        .db
        .medicines()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Medicine", id))
}

pub async fn create_medicine(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MedicineInput>,
) -> ApiResult<(StatusCode, Json<MedicineListing>)> {
    let input = validate_medicine(&input)?;
    let medicine = state.db.medicines().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(medicine)))
}

/// Administrative edit; may set the stock level directly.
pub async fn update_medicine(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<MedicineInput>,
) -> ApiResult<Json<MedicineListing>> {
    let input = validate_medicine(&input)?;
    Ok(Json(state.db.medicines().update(id, &input).await?))
}

pub async fn delete_medicine(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .db
        .medicines()
        .delete(id)
        .await
        .map_err(|e| match e {
            DbError::ForeignKeyViolation { .. } => ApiError::new(
                ErrorCode::Conflict,
                format!("Medicine {} appears in recorded sales and cannot be deleted", id),
            ),
            other => other.into(),
        })?;

    Ok(Json(MessageResponse::new("Medicine deleted successfully")))
}
