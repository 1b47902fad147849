//! # Sale Repository
//!
//! The sale processor: creates and deletes sales while keeping medicine
//! stock consistent.
//!
//! ## Create
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├── INSERT sales (header)                       → sale id            │
//! │   │                                                                     │
//! │   ├── for each line:                                                    │
//! │   │     UPDATE medicines SET quantity = quantity - q                    │
//! │   │      WHERE id = m AND quantity >= q            → rows affected?    │
//! │   │        │                                                            │
//! │   │        ├── 1 → INSERT sale_items                                    │
//! │   │        └── 0 → lookup m: missing → MedicineNotFound                 │
//! │   │                          present → InsufficientStock                │
//! │   │                 (transaction dropped → ROLLBACK)                    │
//! │   │                                                                     │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no read-then-write of quantities: the decrement and the stock
//! check are one statement, so concurrent sales cannot oversell.
//!
//! ## Delete
//! ```text
//! BEGIN
//!   UPDATE medicines += Σ item quantity per medicine of this sale
//!   DELETE sales WHERE id = ?   (items cascade)  → 0 rows? ROLLBACK, NotFound
//! COMMIT
//! ```
//!
//! Both transactions open with a write so SQLite takes the write lock
//! before anything is read.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use medlocus_core::validation::validate_sale_update;
use medlocus_core::{
    CoreError, Money, Page, Sale, SaleDetail, SaleDraft, SaleFilter, SaleItem, SaleLine,
    SaleUpdate, ValidationError,
};

/// Sale header with customer display fields and item count.
const SALE_SELECT: &str = r#"
    SELECT
        s.id,
        s.customer_id,
        c.name AS customer_name,
        c.email AS customer_email,
        s.sale_date,
        s.total_cents AS total_amount,
        s.status,
        s.notes,
        (SELECT COUNT(*) FROM sale_items si WHERE si.sale_id = s.id) AS item_count,
        s.created_at,
        s.updated_at
    FROM sales s
    LEFT JOIN customers c ON c.id = s.customer_id
"#;

/// Search/status filter shared by the list and count queries.
///
/// ?1 search text, ?2 sale id when the search is numeric, ?3 status.
const SALE_FILTER: &str = r#"
    WHERE (?1 IS NULL OR c.name LIKE '%' || ?1 || '%' OR s.id = ?2)
      AND (?3 IS NULL OR s.status = ?3)
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Commits a validated sale and decrements stock for every line, all or
    /// nothing.
    ///
    /// ## Errors
    /// - `Domain(MedicineNotFound)` a line references no medicine
    /// - `Domain(InsufficientStock)` a line asks for more than is on hand
    /// - `Domain(CustomerNotFound)` `customer_id` references nothing
    ///
    /// On any error no sale row exists and every medicine keeps its stock.
    pub async fn create(&self, draft: &SaleDraft) -> DbResult<Sale> {
        debug!(
            lines = draft.items.len(),
            total = %draft.total_amount,
            "Creating sale"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (
                customer_id, sale_date, total_cents, status, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING id
            "#,
        )
        .bind(draft.customer_id)
        .bind(draft.sale_date)
        .bind(draft.total_amount)
        .bind(draft.status)
        .bind(&draft.notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let err = DbError::from(e);
            match draft.customer_id {
                Some(customer_id) => err.on_foreign_key(CoreError::CustomerNotFound(customer_id)),
                None => err,
            }
        })?;

        for line in &draft.items {
            if let Err(err) = Self::apply_line(&mut tx, sale_id, line).await {
                if let DbError::Domain(ref domain) = err {
                    warn!(sale_id, error = %domain, "Sale rejected, rolling back");
                }
                // Dropping `tx` rolls back the header and earlier lines.
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            lines = draft.items.len(),
            total = %draft.total_amount,
            "Sale committed"
        );

        self.get_by_id(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))
    }

    /// Decrements stock for one line and records it.
    async fn apply_line(
        tx: &mut Transaction<'static, Sqlite>,
        sale_id: i64,
        line: &SaleLine,
    ) -> DbResult<()> {
        let now = Utc::now();

        let decremented = sqlx::query(
            r#"
            UPDATE medicines
            SET quantity = quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(line.medicine_id)
        .bind(line.quantity)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        if decremented.rows_affected() == 0 {
            let current: Option<(String, i64)> =
                sqlx::query_as("SELECT name, quantity FROM medicines WHERE id = ?1")
                    .bind(line.medicine_id)
                    .fetch_optional(&mut **tx)
                    .await?;

            return Err(match current {
                None => CoreError::MedicineNotFound(line.medicine_id),
                Some((name, available)) => CoreError::InsufficientStock {
                    medicine_id: line.medicine_id,
                    name,
                    available,
                    requested: line.quantity,
                },
            }
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                sale_id, medicine_id, quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(sale_id)
        .bind(line.medicine_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Deletes a sale and returns its quantities to stock.
    ///
    /// ## Errors
    /// `NotFound` when the sale doesn't exist; nothing changes in that case.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting sale");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let restored = sqlx::query(
            r#"
            UPDATE medicines
            SET quantity = quantity + (
                    SELECT SUM(si.quantity)
                    FROM sale_items si
                    WHERE si.sale_id = ?1 AND si.medicine_id = medicines.id
                ),
                updated_at = ?2
            WHERE id IN (SELECT medicine_id FROM sale_items WHERE sale_id = ?1)
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id,
            medicines_restored = restored.rows_affected(),
            "Sale deleted, stock restored"
        );
        Ok(())
    }

    /// Updates header fields only. Stock is never touched.
    ///
    /// ## Rules
    /// - `items` in the request → `ImmutableSaleItems`
    /// - a supplied `total_amount` must equal the stored Σ subtotal
    /// - absent fields keep their stored value
    pub async fn update(&self, id: i64, update: &SaleUpdate) -> DbResult<Sale> {
        debug!(id, "Updating sale header");

        let update = validate_sale_update(update)?;

        if let Some(total) = update.total_amount {
            let items_total = self.items_total(id).await?;
            if total != items_total {
                return Err(CoreError::from(ValidationError::Mismatch {
                    field: "total_amount".to_string(),
                    expected: items_total.to_string(),
                    actual: total.to_string(),
                })
                .into());
            }
        }

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                customer_id = COALESCE(?2, customer_id),
                sale_date = COALESCE(?3, sale_date),
                total_cents = COALESCE(?4, total_cents),
                status = COALESCE(?5, status),
                notes = COALESCE(?6, notes),
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.customer_id)
        .bind(update.sale_date)
        .bind(update.total_amount)
        .bind(update.status)
        .bind(update.notes)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = DbError::from(e);
            match update.customer_id {
                Some(customer_id) => err.on_foreign_key(CoreError::CustomerNotFound(customer_id)),
                None => err,
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id, status = ?update.status, "Sale header updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SALE_SELECT} WHERE s.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets a sale with its line items.
    pub async fn get_detail(&self, id: i64) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let items = self.items(id).await?;
        Ok(Some(SaleDetail { sale, items }))
    }

    /// Gets all items for a sale with medicine name and company.
    pub async fn items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT
                si.id,
                si.sale_id,
                si.medicine_id,
                m.name AS medicine_name,
                m.company,
                si.quantity,
                si.unit_price_cents AS unit_price,
                si.subtotal_cents AS subtotal
            FROM sale_items si
            JOIN medicines m ON m.id = si.medicine_id
            WHERE si.sale_id = ?1
            ORDER BY si.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists sales newest first, with the unpaged total.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Page<Sale>> {
        let search = filter.search_term();
        let search_id = search.and_then(|s| s.parse::<i64>().ok());

        debug!(
            search = ?search,
            status = ?filter.status,
            page = filter.page(),
            limit = filter.limit(),
            "Listing sales"
        );

        let items = sqlx::query_as::<_, Sale>(&format!(
            r#"
            {SALE_SELECT}
            {SALE_FILTER}
            ORDER BY s.sale_date DESC, s.created_at DESC, s.id DESC
            LIMIT ?4 OFFSET ?5
            "#
        ))
        .bind(search)
        .bind(search_id)
        .bind(filter.status)
        .bind(i64::from(filter.limit()))
        .bind(filter.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM sales s
            LEFT JOIN customers c ON c.id = s.customer_id
            {SALE_FILTER}
            "#
        ))
        .bind(search)
        .bind(search_id)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page { items, total })
    }

    /// Σ subtotal of a sale's stored items.
    async fn items_total(&self, sale_id: i64) -> DbResult<Money> {
        let row: Option<(Money,)> = sqlx::query_as(
            r#"
            SELECT COALESCE(
                (SELECT SUM(subtotal_cents) FROM sale_items WHERE sale_id = s.id), 0
            )
            FROM sales s
            WHERE s.id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(total,)| total)
            .ok_or_else(|| DbError::not_found("Sale", sale_id))
    }
}

// =============================================================================
// Tests
// =============================================================================
