//! # Inventory Rules
//!
//! Thresholds and derivations behind stock alerts, expiry lookups and the
//! dashboard indicators. Storage runs the queries; the rules live here so
//! they stay deterministic under test.
//!
//! ## Alert Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  medicine is alerted when                                               │
//! │                                                                         │
//! │     quantity < LOW_STOCK_THRESHOLD (5)                                  │
//! │        OR                                                               │
//! │     exp_date <= today + EXPIRY_HORIZON_DAYS (30)   (expired included)  │
//! │                                                                         │
//! │  ordered by quantity ASC, exp_date ASC; at most ALERT_LIMIT (10)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};

use crate::money::Money;
use crate::types::{Alert, Kpi, KpiValue};

// =============================================================================
// Thresholds
// =============================================================================

/// Stock strictly below this raises a low-stock alert.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Stock strictly below this counts toward the "Pending Prescriptions" KPI.
pub const REORDER_THRESHOLD: i64 = 10;

/// Default expiry look-ahead in days.
pub const EXPIRY_HORIZON_DAYS: i64 = 30;

/// Maximum number of alerts returned.
pub const ALERT_LIMIT: i64 = 10;

/// "Today's Sales" KPI placeholder: 10% of inventory value, in basis points.
pub const TODAY_SALES_PROXY_BPS: u32 = 1000;

// =============================================================================
// Derivations
// =============================================================================

/// Display SKU for a medicine id.
///
/// ```rust
/// assert_eq!(medlocus_core::inventory::medicine_sku(42), "MED-42");
/// ```
pub fn medicine_sku(id: i64) -> String {
    format!("MED-{id}")
}

/// Longest expiry horizon honored (about a century); larger requests are
/// clamped to it.
pub const MAX_EXPIRY_HORIZON_DAYS: i64 = 36_500;

/// Coerces a requested expiry horizon: missing means 30, negatives mean 0,
/// anything past [`MAX_EXPIRY_HORIZON_DAYS`] is clamped.
pub fn expiry_horizon(days: Option<i64>) -> i64 {
    days.unwrap_or(EXPIRY_HORIZON_DAYS)
        .clamp(0, MAX_EXPIRY_HORIZON_DAYS)
}

/// Last expiry date (inclusive) that falls inside `days` from `today`.
///
/// Never later than 9999-12-31: dates stored as `YYYY-MM-DD` text only
/// compare correctly with four-digit years.
pub fn expiry_cutoff(today: NaiveDate, days: i64) -> NaiveDate {
    let days = u64::try_from(days).unwrap_or(0);
    let cutoff = today
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX);
    NaiveDate::from_ymd_opt(9999, 12, 31).map_or(cutoff, |last| cutoff.min(last))
}

/// Whether a medicine meets the alert rule.
pub fn needs_alert(quantity: i64, exp_date: NaiveDate, today: NaiveDate) -> bool {
    quantity < LOW_STOCK_THRESHOLD || exp_date <= expiry_cutoff(today, EXPIRY_HORIZON_DAYS)
}

impl Alert {
    pub fn new(medicine_id: i64, name: String, stock: i64, expiry_date: NaiveDate) -> Self {
        Self {
            medicine_id,
            sku: medicine_sku(medicine_id),
            name,
            stock,
            expiry_date,
        }
    }
}

/// Inventory aggregates the KPI set is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryTotals {
    /// Σ price × quantity over all medicines.
    pub inventory_value: Money,
    /// Medicines with quantity below [`REORDER_THRESHOLD`].
    pub below_reorder: i64,
    /// Medicines with quantity below [`LOW_STOCK_THRESHOLD`].
    pub low_stock: i64,
}

/// Builds the four dashboard indicators, k1..k4.
///
/// ## Example
/// ```rust
/// use medlocus_core::inventory::{build_kpis, InventoryTotals};
/// use medlocus_core::{KpiValue, Money};
///
/// let kpis = build_kpis(InventoryTotals {
///     inventory_value: Money::from_cents(13000),
///     below_reorder: 1,
///     low_stock: 1,
/// });
/// assert_eq!(kpis[0].value, KpiValue::Amount(Money::from_cents(1300)));
/// ```
pub fn build_kpis(totals: InventoryTotals) -> Vec<Kpi> {
    let usd = || Some("USD".to_string());
    vec![
        Kpi {
            id: "k1".to_string(),
            label: "Today's Sales".to_string(),
            value: KpiValue::Amount(totals.inventory_value.share_bps(TODAY_SALES_PROXY_BPS)),
            unit: usd(),
        },
        Kpi {
            id: "k2".to_string(),
            label: "Pending Prescriptions".to_string(),
            value: KpiValue::Count(totals.below_reorder),
            unit: None,
        },
        Kpi {
            id: "k3".to_string(),
            label: "Low Stock Items".to_string(),
            value: KpiValue::Count(totals.low_stock),
            unit: None,
        },
        Kpi {
            id: "k4".to_string(),
            label: "Total Inventory Value".to_string(),
            value: KpiValue::Amount(totals.inventory_value),
            unit: usd(),
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
