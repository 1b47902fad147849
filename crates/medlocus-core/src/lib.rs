//! # medlocus-core: Pure Domain Logic for MedLocus
//!
//! Domain types and rules for the pharmacy backend, as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MedLocus Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (Next.js)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medlocus-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ inventory │  │ validation│  │   │
//! │  │   │  Medicine │  │   Money   │  │  alerts   │  │  sale     │  │   │
//! │  │   │   Sale    │  │  cents    │  │   KPIs    │  │  requests │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 medlocus-db (Database Layer)                    │   │
//! │  │        SQLite, sale transactions, alert & report queries        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Medicine, Sale, Alert, Kpi, etc.)
//! - [`money`] - Fixed-point Money in integer cents
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation
//! - [`inventory`] - Alert thresholds, SKUs, KPI set
//! - [`reporting`] - Summary report date windows
//!
//! ## Example Usage
//!
//! ```rust
//! use medlocus_core::validation::validate_new_sale;
//! use medlocus_core::{Money, NewSale, NewSaleItem};
//!
//! let request = NewSale {
//!     sale_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14),
//!     items: vec![NewSaleItem {
//!         medicine_id: 1,
//!         quantity: 2,
//!         unit_price: "5.00".parse().unwrap(),
//!         subtotal: None,
//!     }],
//!     ..Default::default()
//! };
//!
//! let draft = validate_new_sale(&request).unwrap();
//! assert_eq!(draft.total_amount, Money::from_cents(1000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod money;
pub mod reporting;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items in a single sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity on a single sale line.
///
/// ## Business Reason
/// Catches typos at the counter (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted on a sale line or a medicine (1,000,000.00).
pub const MAX_UNIT_PRICE: Money = Money::from_cents(100_000_000);

/// Highest stock level an administrative edit may set.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;
