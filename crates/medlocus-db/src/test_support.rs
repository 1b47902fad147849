//! Fixtures shared by the repository tests.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use medlocus_core::validation::validate_new_sale;
use medlocus_core::{CustomerInput, MedicineInput, Money, NewSale, NewSaleItem, SaleDraft, SupplierInput};

use crate::Database;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn seed_supplier(db: &Database, name: &str) -> i64 {
    db.suppliers()
        .insert(&SupplierInput {
            supplier_name: name.to_string(),
            contact_no: "555-0100".to_string(),
        })
        .await
        .unwrap()
        .id
}

pub async fn seed_medicine(
    db: &Database,
    supplier_id: i64,
    name: &str,
    quantity: i64,
    price_cents: i64,
    exp_date: NaiveDate,
) -> i64 {
    db.medicines()
        .insert(&MedicineInput {
            name: name.to_string(),
            company: "Generic Labs".to_string(),
            mfg_date: date(2024, 1, 1),
            exp_date,
            quantity,
            price: Money::from_cents(price_cents),
            supplier_id,
        })
        .await
        .unwrap()
        .medicine
        .id
}

/// Seeds a customer whose email is derived from the name
/// ("Anita Patel" → anita.patel@example.com).
pub async fn seed_customer(db: &Database, name: &str) -> i64 {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    db.customers()
        .insert(&CustomerInput {
            name: name.to_string(),
            email: Some(email),
            phone: None,
            address: None,
        })
        .await
        .unwrap()
        .id
}

/// A validated, completed sale dated 2026-03-14 with
/// `(medicine_id, quantity, unit_price_cents)` lines.
pub fn draft(lines: &[(i64, i64, i64)]) -> SaleDraft {
    validate_new_sale(&NewSale {
        sale_date: Some(date(2026, 3, 14)),
        items: lines
            .iter()
            .map(|&(medicine_id, quantity, cents)| NewSaleItem {
                medicine_id,
                quantity,
                unit_price: Money::from_cents(cents),
                subtotal: None,
            })
            .collect(),
        ..Default::default()
    })
    .unwrap()
}

/// A throwaway database file, removed (with its WAL files) on drop.
pub struct TempDbFile {
    path: PathBuf,
}

impl TempDbFile {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("medlocus-test-{}.db", uuid::Uuid::new_v4()));
        TempDbFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
