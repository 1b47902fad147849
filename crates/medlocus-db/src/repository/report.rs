//! # Report Repository
//!
//! Dashboard KPIs and the summary report. Pure reads over committed
//! sales and current stock; "today" comes from the caller.
//!
//! ## Summary Sections
//! ```text
//! ┌───────────────────────┬─────────────────────────────────────────────────┐
//! │ today_sales           │ Σ total, completed, sale_date = today           │
//! │ month_sales           │ Σ total, completed, today's calendar month      │
//! │ total_customers       │ COUNT customers                                 │
//! │ total_medicines       │ COUNT medicines                                 │
//! │ low_stock             │ COUNT quantity < 5                              │
//! │ expiring_soon         │ COUNT exp_date in today..=today+30              │
//! │ top_medicines         │ completed, sale_date >= today-30, top 10 by qty │
//! │ sales_trend           │ completed, sale_date >= today-7, per day        │
//! └───────────────────────┴─────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use medlocus_core::inventory::{build_kpis, InventoryTotals, LOW_STOCK_THRESHOLD, REORDER_THRESHOLD};
use medlocus_core::reporting::{ReportWindow, TOP_SELLERS_LIMIT};
use medlocus_core::{DailySales, Kpi, Money, ReportSummary, SaleStatus, TopMedicine};

/// Repository for KPI and summary aggregates.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// The four dashboard indicators, k1..k4.
    pub async fn kpis(&self) -> DbResult<Vec<Kpi>> {
        debug!("Computing KPIs");

        let (inventory_value, below_reorder, low_stock): (Money, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(price_cents * quantity), 0),
                COALESCE(SUM(CASE WHEN quantity < ?1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN quantity < ?2 THEN 1 ELSE 0 END), 0)
            FROM medicines
            "#,
        )
        .bind(REORDER_THRESHOLD)
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        Ok(build_kpis(InventoryTotals {
            inventory_value,
            below_reorder,
            low_stock,
        }))
    }

    /// The dashboard summary report as of `today`.
    pub async fn summary(&self, today: NaiveDate) -> DbResult<ReportSummary> {
        let window = ReportWindow::for_day(today);

        debug!(%today, "Computing summary report");

        let today_sales = self
            .completed_total(window.today, window.today.succ_opt().unwrap_or(NaiveDate::MAX))
            .await?;
        let month_sales = self
            .completed_total(window.month_start, window.next_month_start)
            .await?;

        let (total_customers, total_medicines, low_stock, expiring_soon): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM customers),
                    (SELECT COUNT(*) FROM medicines),
                    (SELECT COUNT(*) FROM medicines WHERE quantity < ?1),
                    (SELECT COUNT(*) FROM medicines WHERE exp_date BETWEEN ?2 AND ?3)
                "#,
            )
            .bind(LOW_STOCK_THRESHOLD)
            .bind(window.today)
            .bind(window.expiring_until)
            .fetch_one(&self.pool)
            .await?;

        Ok(ReportSummary {
            today_sales,
            month_sales,
            total_customers,
            total_medicines,
            low_stock,
            expiring_soon,
            top_medicines: self.top_medicines(window.top_sellers_since).await?,
            sales_trend: self.sales_trend(window.trend_since).await?,
        })
    }

    /// Σ total of completed sales dated in `[from, until)`.
    async fn completed_total(&self, from: NaiveDate, until: NaiveDate) -> DbResult<Money> {
        let total: Money = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM sales
            WHERE status = ?1 AND sale_date >= ?2 AND sale_date < ?3
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Best sellers by quantity among completed sales dated on or after
    /// `since`.
    async fn top_medicines(&self, since: NaiveDate) -> DbResult<Vec<TopMedicine>> {
        let top = sqlx::query_as::<_, TopMedicine>(
            r#"
            SELECT
                m.id AS medicine_id,
                m.name,
                m.company,
                SUM(si.quantity) AS total_sold,
                SUM(si.subtotal_cents) AS revenue
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            JOIN medicines m ON m.id = si.medicine_id
            WHERE s.status = ?1 AND s.sale_date >= ?2
            GROUP BY m.id, m.name, m.company
            ORDER BY total_sold DESC, revenue DESC, m.name ASC
            LIMIT ?3
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(since)
        .bind(TOP_SELLERS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(top)
    }

    /// Per-day completed totals on or after `since`; days without sales are
    /// absent.
    async fn sales_trend(&self, since: NaiveDate) -> DbResult<Vec<DailySales>> {
        let trend = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT sale_date AS date, SUM(total_cents) AS total
            FROM sales
            WHERE status = ?1 AND sale_date >= ?2
            GROUP BY sale_date
            ORDER BY sale_date ASC
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(trend)
    }
}
