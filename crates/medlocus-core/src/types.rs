//! # Domain Types
//!
//! Core domain types used throughout MedLocus.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │◄──│    Medicine     │◄──│    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  sale_id (FK)   │       │
//! │  │  supplier_name  │   │  quantity ≥ 0   │   │  medicine_id    │       │
//! │  │  contact_no     │   │  price (Money)  │   │  quantity > 0   │       │
//! │  └─────────────────┘   │  exp_date       │   │  subtotal       │       │
//! │                        └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ owned by       │
//! │  ┌─────────────────┐                         ┌────────▼────────┐       │
//! │  │    Customer     │◄── optional ────────────│      Sale       │       │
//! │  └─────────────────┘                         │  status, total  │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  Derived (never stored): Alert, ExpiringMedicine, Kpi, ReportSummary   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Supplier
// =============================================================================

/// A medicine supplier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub supplier_name: String,
    pub contact_no: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierInput {
    pub supplier_name: String,
    pub contact_no: String,
}

// =============================================================================
// Medicine
// =============================================================================

/// A stocked, priced, dated inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub company: String,
    /// Manufacture date.
    #[ts(as = "String")]
    pub mfg_date: NaiveDate,
    /// Expiry date.
    #[ts(as = "String")]
    pub exp_date: NaiveDate,
    /// Quantity on hand. Never negative.
    pub quantity: i64,
    /// Unit price.
    #[ts(type = "string")]
    pub price: Money,
    pub supplier_id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Display SKU derived from the id.
    #[inline]
    pub fn sku(&self) -> String {
        crate::inventory::medicine_sku(self.id)
    }

    /// Stock value at the current unit price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Days from `today` until expiry; negative once expired.
    #[inline]
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.exp_date - today).num_days()
    }
}

/// A medicine together with its supplier's display fields.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MedicineListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub medicine: Medicine,
    pub supplier_name: Option<String>,
    pub contact_no: Option<String>,
}

/// Payload for creating or administratively editing a medicine.
///
/// Administrative edits may set `quantity` directly; it is the only
/// inventory write path besides the sale processor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicineInput {
    pub name: String,
    pub company: String,
    #[ts(as = "String")]
    pub mfg_date: NaiveDate,
    #[ts(as = "String")]
    pub exp_date: NaiveDate,
    pub quantity: i64,
    #[ts(type = "string")]
    pub price: Money,
    pub supplier_id: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A pharmacy customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// Status is informational: it selects which sales count toward revenue
/// reports, but never changes inventory. Stock is only returned by deleting
/// the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Paid and handed over. Counted in revenue reports.
    #[default]
    Completed,
    /// Awaiting payment or pickup.
    Pending,
    /// Called off; kept for the record.
    Cancelled,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 3] = [
        SaleStatus::Completed,
        SaleStatus::Pending,
        SaleStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Pending => "pending",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(SaleStatus::Completed),
            "pending" => Ok(SaleStatus::Pending),
            "cancelled" => Ok(SaleStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: SaleStatus::ALL.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header as read back from storage, with display fields joined in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[ts(type = "string")]
    pub total_amount: Money,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub item_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One medicine-quantity-price line of a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub company: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    #[ts(type = "string")]
    pub unit_price: Money,
    #[ts(type = "string")]
    pub subtotal: Money,
}

/// A sale with its line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Client request to create a sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<NewSaleItem>,
    #[serde(default)]
    pub status: Option<SaleStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional client-computed total; cross-checked against the items.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub total_amount: Option<Money>,
}

/// Client request for one line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleItem {
    pub medicine_id: i64,
    pub quantity: i64,
    #[ts(type = "string")]
    pub unit_price: Money,
    /// Optional; derived from quantity × unit_price when omitted.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub subtotal: Option<Money>,
}

/// A sale request that passed validation. Only built by
/// [`crate::validation::validate_new_sale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub customer_id: Option<i64>,
    pub sale_date: NaiveDate,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub total_amount: Money,
    pub items: Vec<SaleLine>,
}

/// A validated sale line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleLine {
    pub medicine_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Header-only changes to an existing sale.
///
/// `items` is accepted from the wire only so that a request trying to edit
/// line items can be refused explicitly instead of silently ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleUpdate {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub total_amount: Option<Money>,
    #[serde(default)]
    pub status: Option<SaleStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing)]
    #[ts(skip)]
    pub items: Option<serde_json::Value>,
}

/// Filters for listing sales.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Customer name substring, or an exact sale id when numeric.
    pub search: Option<String>,
    pub status: Option<SaleStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SaleFilter {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() as i64 - 1) * self.limit() as i64
    }

    /// Trimmed, non-empty search term.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

// =============================================================================
// Derived Views
// =============================================================================

/// A low-stock or near-expiry signal for one medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Alert {
    pub medicine_id: i64,
    pub name: String,
    pub sku: String,
    pub stock: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
}

/// A medicine expiring inside the requested horizon.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpiringMedicine {
    #[serde(flatten)]
    pub medicine: MedicineListing,
    pub days_until_expiry: i64,
}

/// Value of a dashboard indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Amount(Money),
    Count(i64),
}

/// A dashboard indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Kpi {
    pub id: String,
    pub label: String,
    #[ts(type = "string | number")]
    pub value: KpiValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Best-selling medicine over the reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TopMedicine {
    pub medicine_id: i64,
    pub name: String,
    pub company: String,
    pub total_sold: i64,
    #[ts(type = "string")]
    pub revenue: Money,
}

/// Completed-sales total for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub total: Money,
}

/// Dashboard summary report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportSummary {
    #[ts(type = "string")]
    pub today_sales: Money,
    #[ts(type = "string")]
    pub month_sales: Money,
    pub total_customers: i64,
    pub total_medicines: i64,
    pub low_stock: i64,
    pub expiring_soon: i64,
    pub top_medicines: Vec<TopMedicine>,
    pub sales_trend: Vec<DailySales>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default_and_parse() {
        assert_eq!(SaleStatus::default(), SaleStatus::Completed);
        assert_eq!("Pending".parse::<SaleStatus>().unwrap(), SaleStatus::Pending);
        assert_eq!(
            "cancelled".parse::<SaleStatus>().unwrap(),
            SaleStatus::Cancelled
        );
        let err = "refunded".parse::<SaleStatus>().unwrap_err();
        assert_eq!(err.field(), "status");
    }

    #[test]
    fn test_sale_status_serializes_lowercase() {
        let json = serde_json::to_string(&SaleStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_sale_filter_paging() {
        let filter = SaleFilter::default();
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.limit(), 50);
        assert_eq!(filter.offset(), 0);

        let filter = SaleFilter {
            page: Some(3),
            limit: Some(500),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.limit(), 100);
        assert_eq!(filter.offset(), 200);
        assert_eq!(filter.search_term(), None);

        let filter = SaleFilter {
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.limit(), 1);
    }

    #[test]
    fn test_sale_update_accepts_items_field() {
        let update: SaleUpdate =
            serde_json::from_str(r#"{"status":"pending","items":[{"medicine_id":1}]}"#).unwrap();
        assert_eq!(update.status, Some(SaleStatus::Pending));
        assert!(update.items.is_some());
    }

    #[test]
    fn test_kpi_value_serialization() {
        let amount = serde_json::to_value(KpiValue::Amount(Money::from_cents(1300))).unwrap();
        assert_eq!(amount, serde_json::json!("13.00"));
        let count = serde_json::to_value(KpiValue::Count(4)).unwrap();
        assert_eq!(count, serde_json::json!(4));
    }

    #[test]
    fn test_medicine_helpers() {
        let now = Utc::now();
        let medicine = Medicine {
            id: 12,
            name: "Amoxicillin".to_string(),
            company: "Cipla".to_string(),
            mfg_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            exp_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            quantity: 4,
            price: Money::from_cents(250),
            supplier_id: 1,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(medicine.sku(), "MED-12");
        assert_eq!(medicine.stock_value().cents(), 1000);
        let today = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        assert_eq!(medicine.days_until_expiry(today), 9);
    }
}
