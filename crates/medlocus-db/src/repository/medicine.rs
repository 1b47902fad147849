//! # Medicine Repository
//!
//! Catalog operations for medicines.
//!
//! Stock levels change in exactly two places:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRepository::create / delete   conditional decrement / restore     │
//! │  MedicineRepository::update        administrative set (quantity ≥ 0)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use medlocus_core::{CoreError, MedicineInput, MedicineListing};

/// Medicine columns joined with supplier display fields.
pub(crate) const MEDICINE_LISTING_SELECT: &str = r#"
    SELECT
        m.id,
        m.name,
        m.company,
        m.mfg_date,
        m.exp_date,
        m.quantity,
        m.price_cents AS price,
        m.supplier_id,
        m.created_at,
        m.updated_at,
        s.supplier_name,
        s.contact_no
    FROM medicines m
    LEFT JOIN suppliers s ON s.id = m.supplier_id
"#;

/// Repository for medicine database operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Lists all medicines ordered by name.
    pub async fn list(&self) -> DbResult<Vec<MedicineListing>> {
        debug!("Listing medicines");

        let medicines = sqlx::query_as::<_, MedicineListing>(&format!(
            "{MEDICINE_LISTING_SELECT} ORDER BY m.name, m.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(medicines)
    }

    /// Substring search over name, company and supplier name.
    ///
    /// An empty query lists everything.
    pub async fn search(&self, query: &str) -> DbResult<Vec<MedicineListing>> {
        let query = query.trim();

        debug!(query = %query, "Searching medicines");

        if query.is_empty() {
            return self.list().await;
        }

        let medicines = sqlx::query_as::<_, MedicineListing>(&format!(
            r#"
            {MEDICINE_LISTING_SELECT}
            WHERE m.name LIKE '%' || ?1 || '%'
               OR m.company LIKE '%' || ?1 || '%'
               OR s.supplier_name LIKE '%' || ?1 || '%'
            ORDER BY m.name, m.id
            "#
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(medicines)
    }

    /// Gets a medicine by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<MedicineListing>> {
        let medicine = sqlx::query_as::<_, MedicineListing>(&format!(
            "{MEDICINE_LISTING_SELECT} WHERE m.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Inserts a validated medicine.
    ///
    /// ## Errors
    /// `SupplierNotFound` when `supplier_id` references nothing.
    pub async fn insert(&self, input: &MedicineInput) -> DbResult<MedicineListing> {
        debug!(name = %input.name, supplier_id = input.supplier_id, "Inserting medicine");

        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO medicines (
                name, company, mfg_date, exp_date,
                quantity, price_cents, supplier_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.company)
        .bind(input.mfg_date)
        .bind(input.exp_date)
        .bind(input.quantity)
        .bind(input.price)
        .bind(input.supplier_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_foreign_key(CoreError::SupplierNotFound(input.supplier_id)))?;

        info!(id, name = %input.name, quantity = input.quantity, "Medicine created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id))
    }

    /// Replaces a medicine's fields, including its stock level.
    pub async fn update(&self, id: i64, input: &MedicineInput) -> DbResult<MedicineListing> {
        debug!(id, quantity = input.quantity, "Updating medicine");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medicines SET
                name = ?2,
                company = ?3,
                mfg_date = ?4,
                exp_date = ?5,
                quantity = ?6,
                price_cents = ?7,
                supplier_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.company)
        .bind(input.mfg_date)
        .bind(input.exp_date)
        .bind(input.quantity)
        .bind(input.price)
        .bind(input.supplier_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_foreign_key(CoreError::SupplierNotFound(input.supplier_id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", id));
        }

        info!(id, quantity = input.quantity, "Medicine updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id))
    }

    /// Deletes a medicine.
    ///
    /// ## Errors
    /// `ForeignKeyViolation` while any sale item still references it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting medicine");

        let result = sqlx::query("DELETE FROM medicines WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", id));
        }

        info!(id, "Medicine deleted");
        Ok(())
    }

    /// Current stock on hand, if the medicine exists.
    pub async fn stock(&self, id: i64) -> DbResult<Option<i64>> {
        let quantity = sqlx::query_scalar("SELECT quantity FROM medicines WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quantity)
    }

    /// Counts all medicines.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
