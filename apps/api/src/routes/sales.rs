//! # Sale Handlers
//!
//! ## Stock Effects
//! ```text
//! POST   /api/sales        every line: quantity -= line qty (all or nothing)
//! DELETE /api/sales/{id}   every line: quantity += line qty
//! PUT    /api/sales/{id}   header only, stock untouched (status included)
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use medlocus_core::validation::{validate_new_sale, validate_search_query};
use medlocus_core::{NewSale, Page, Sale, SaleDetail, SaleFilter, SaleStatus, SaleUpdate};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Query string of `GET /api/sales`.
#[derive(Debug, Default, Deserialize)]
pub struct ListSalesQuery {
    pub search: Option<String>,
    /// Kept as text so an unknown status is a validation error naming the
    /// allowed values.
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListSalesQuery {
    fn into_filter(self) -> ApiResult<SaleFilter> {
        let search = match self.search.as_deref() {
            Some(q) => validate_search_query(q)?,
            None => None,
        };

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<SaleStatus>()?),
        };

        Ok(SaleFilter {
            search,
            status,
            page: self.page,
            limit: self.limit,
        })
    }
}

pub async fn list_sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListSalesQuery>,
) -> ApiResult<Json<Page<Sale>>> {
    let filter = query.into_filter()?;
    Ok(Json(state.db.sales().list(&filter).await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<SaleDetail>> {
    state
        .db
        .sales()
        .get_detail(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

/// Validates the request, then records it and decrements stock in one
/// transaction.
pub async fn create_sale(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    debug!(lines = request.items.len(), "create_sale");

    let draft = validate_new_sale(&request)?;
    let sale = state.db.sales().create(&draft).await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<SaleUpdate>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.db.sales().update(id, &update).await?))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.sales().delete(id).await?;
    Ok(Json(MessageResponse::new("Sale deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{send, test_app};

    async fn seed_paracetamol(app: &crate::test_support::TestApp, stock: i64) -> i64 {
        let (status, supplier) = send(
            &app.router,
            Method::POST,
            "/api/suppliers",
            Some(json!({"supplier_name": "HealthLine", "contact_no": "9820011223"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, medicine) = send(
            &app.router,
            Method::POST,
            "/api/medicines",
            Some(json!({
                "name": "Paracetamol 500mg",
                "company": "Cipla",
                "mfg_date": "2025-01-01",
                "exp_date": "2028-01-01",
                "quantity": stock,
                "price": "2.50",
                "supplier_id": supplier["id"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        medicine["id"].as_i64().unwrap()
    }

    async fn stock_of(app: &crate::test_support::TestApp, id: i64) -> i64 {
        let (_, medicine) = send(&app.router, Method::GET, &format!("/api/medicines/{id}"), None).await;
        medicine["quantity"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_then_delete_restores_stock() {
        let app = test_app().await;
        let medicine = seed_paracetamol(&app, 10).await;

        let (status, sale) = send(
            &app.router,
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-03-14",
                "items": [{"medicine_id": medicine, "quantity": 4, "unit_price": "2.50"}],
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(sale["total_amount"], "10.00");
        assert_eq!(sale["status"], "completed");
        assert_eq!(sale["item_count"], 1);
        assert_eq!(stock_of(&app, medicine).await, 6);

        let id = sale["id"].as_i64().unwrap();
        let (status, detail) = send(&app.router, Method::GET, &format!("/api/sales/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["items"][0]["subtotal"], "10.00");
        assert_eq!(detail["items"][0]["medicine_name"], "Paracetamol 500mg");

        let (status, body) = send(&app.router, Method::DELETE, &format!("/api/sales/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Sale deleted successfully");
        assert_eq!(stock_of(&app, medicine).await, 10);

        let (status, body) = send(&app.router, Method::DELETE, &format!("/api/sales/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_oversell_is_conflict_and_changes_nothing() {
        let app = test_app().await;
        let medicine = seed_paracetamol(&app, 3).await;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-03-14",
                "items": [{"medicine_id": medicine, "quantity": 5, "unit_price": "2.50"}],
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        assert_eq!(stock_of(&app, medicine).await, 3);

        let (_, page) = send(&app.router, Method::GET, "/api/sales", None).await;
        assert_eq!(page["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_medicine_is_not_found() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-03-14",
                "items": [{"medicine_id": 999, "quantity": 1, "unit_price": "1.00"}],
            })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Medicine not found: 999");
    }

    #[tokio::test]
    async fn test_invalid_requests_are_bad_request() {
        let app = test_app().await;
        let medicine = seed_paracetamol(&app, 10).await;

        for request in [
            // no sale_date
            json!({"items": [{"medicine_id": medicine, "quantity": 1, "unit_price": "2.50"}]}),
            // zero quantity
            json!({"sale_date": "2026-03-14",
                   "items": [{"medicine_id": medicine, "quantity": 0, "unit_price": "2.50"}]}),
            // client total disagrees with the lines
            json!({"sale_date": "2026-03-14", "total_amount": "99.00",
                   "items": [{"medicine_id": medicine, "quantity": 1, "unit_price": "2.50"}]}),
            // price too large to multiply out
            json!({"sale_date": "2026-03-14",
                   "items": [{"medicine_id": medicine, "quantity": 2,
                              "unit_price": "90000000000000000.00"}]}),
            // not a sale at all
            json!({"sale_date": "yesterday", "items": "none"}),
        ] {
            let (status, body) = send(&app.router, Method::POST, "/api/sales", Some(request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }

        assert_eq!(stock_of(&app, medicine).await, 10);
    }

    #[tokio::test]
    async fn test_update_header_only() {
        let app = test_app().await;
        let medicine = seed_paracetamol(&app, 10).await;

        let (_, sale) = send(
            &app.router,
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-03-14",
                "items": [{"medicine_id": medicine, "quantity": 2, "unit_price": "2.50"}],
            })),
        )
        .await;
        let uri = format!("/api/sales/{}", sale["id"]);

        let (status, updated) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(json!({"status": "cancelled", "notes": "returned at counter"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "cancelled");
        assert_eq!(updated["notes"], "returned at counter");
        assert_eq!(stock_of(&app, medicine).await, 8);

        let (status, _) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(json!({"items": [{"medicine_id": medicine, "quantity": 1, "unit_price": "2.50"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let app = test_app().await;
        let medicine = seed_paracetamol(&app, 50).await;

        for status in ["completed", "pending", "pending"] {
            send(
                &app.router,
                Method::POST,
                "/api/sales",
                Some(json!({
                    "sale_date": "2026-03-14",
                    "status": status,
                    "items": [{"medicine_id": medicine, "quantity": 1, "unit_price": "2.50"}],
                })),
            )
            .await;
        }

        let (status, page) = send(&app.router, Method::GET, "/api/sales?status=pending", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 2);

        let (_, page) = send(&app.router, Method::GET, "/api/sales?limit=1&page=2", None).await;
        assert_eq!(page["total"], 3);
        assert_eq!(page["items"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app.router, Method::GET, "/api/sales?status=refunded", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let app = test_app().await;
        let (status, body) = send(&app.router, Method::GET, "/api/sales/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
