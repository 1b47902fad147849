//! Dashboard KPI and summary report handlers.

use axum::extract::State;
use axum::Json;

use medlocus_core::{Kpi, ReportSummary};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn kpis(State(state): State<AppState>) -> ApiResult<Json<Vec<Kpi>>> {
    Ok(Json(state.db.reports().kpis().await?))
}

pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<ReportSummary>> {
    Ok(Json(state.db.reports().summary(state.today()).await?))
}
