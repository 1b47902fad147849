//! Customer handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use medlocus_core::validation::{validate_customer, validate_search_query};
use medlocus_core::{Customer, CustomerInput};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub search: Option<String>,
}

pub async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    let search = match query.search.as_deref() {
        Some(q) => validate_search_query(q)?,
        None => None,
    };
    Ok(Json(state.db.customers().list(search.as_deref()).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer", id))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let input = validate_customer(&input)?;
    let customer = state.db.customers().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<Json<Customer>> {
    let input = validate_customer(&input)?;
    Ok(Json(state.db.customers().update(id, &input).await?))
}

/// Sales of a deleted customer remain, with no customer.
pub async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.customers().delete(id).await?;
    Ok(Json(MessageResponse::new("Customer deleted successfully")))
}
