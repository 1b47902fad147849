//! # Supplier Repository
//!
//! Suppliers are reference data for medicines: list, look up, create.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use medlocus_core::{Supplier, SupplierInput};

const SUPPLIER_COLUMNS: &str = "id, supplier_name, contact_no, created_at, updated_at";

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        debug!("Listing suppliers");

        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY supplier_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Inserts a validated supplier.
    pub async fn insert(&self, input: &SupplierInput) -> DbResult<Supplier> {
        let now = Utc::now();

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (supplier_name, contact_no, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(&input.supplier_name)
        .bind(&input.contact_no)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(id = supplier.id, name = %supplier.supplier_name, "Supplier created");
        Ok(supplier)
    }
}
