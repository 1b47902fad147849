//! Inventory alert handlers. Both read current stock as of today.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use medlocus_core::{Alert, ExpiringMedicine};

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

pub async fn alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(state.db.alerts().alerts(state.today()).await?))
}

pub async fn expiring(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpiringQuery>,
) -> ApiResult<Json<Vec<ExpiringMedicine>>> {
    Ok(Json(
        state.db.alerts().expiring(query.days, state.today()).await?,
    ))
}
