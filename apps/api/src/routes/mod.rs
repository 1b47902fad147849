//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health                 - Database reachability + migrations
//!
//! # Sales
//! GET    /api/sales                  - Paged list (?search&status&page&limit)
//! POST   /api/sales                  - Create sale, decrement stock (201)
//! GET    /api/sales/{id}             - Sale with line items
//! PUT    /api/sales/{id}             - Edit header fields
//! DELETE /api/sales/{id}             - Delete sale, restore stock
//!
//! # Inventory & reports
//! GET    /api/inventory/alerts       - Low stock / expiring, at most 10
//! GET    /api/medicines/expiring     - Expiring within ?days (default 30)
//! GET    /api/kpis                   - Dashboard indicators k1..k4
//! GET    /api/reports/summary        - Summary report
//!
//! # Catalog
//! GET    /api/medicines              - List with supplier
//! POST   /api/medicines              - Create (201)
//! GET    /api/medicines/search       - Search ?q over name/company/supplier
//! GET    /api/medicines/{id}         - Get
//! PUT    /api/medicines/{id}         - Update
//! DELETE /api/medicines/{id}         - Delete (409 while sold)
//! GET    /api/customers              - List (?search)
//! POST   /api/customers              - Create (201)
//! GET    /api/customers/{id}         - Get
//! PUT    /api/customers/{id}         - Update
//! DELETE /api/customers/{id}         - Delete (sales keep no customer)
//! GET    /api/suppliers              - List
//! POST   /api/suppliers              - Create (201)
//! GET    /api/suppliers/{id}         - Get
//! ```

pub mod customers;
pub mod health;
pub mod inventory;
pub mod medicines;
pub mod reports;
pub mod sales;
pub mod suppliers;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of successful deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// All `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/sales/{id}",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        .route("/inventory/alerts", get(inventory::alerts))
        .route("/medicines/expiring", get(inventory::expiring))
        .route("/kpis", get(reports::kpis))
        .route("/reports/summary", get(reports::summary))
        .route(
            "/medicines",
            get(medicines::list_medicines).post(medicines::create_medicine),
        )
        .route("/medicines/search", get(medicines::search_medicines))
        .route(
            "/medicines/{id}",
            get(medicines::get_medicine)
                .put(medicines::update_medicine)
                .delete(medicines::delete_medicine),
        )
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route("/suppliers/{id}", get(suppliers::get_supplier))
}
