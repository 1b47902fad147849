//! # Seed Data Generator
//!
//! Populates a development database with suppliers, medicines, customers
//! and a couple of weeks of sales.
//!
//! ## Usage
//! ```bash
//! # Seed ./medlocus_dev.db with 40 sales (default)
//! cargo run -p medlocus-db --bin seed
//!
//! # Custom database path and sale count
//! cargo run -p medlocus-db --bin seed -- --db ./data/medlocus.db --sales 200
//! ```
//!
//! Sales go through the same sale processor as the API, so seeded stock
//! levels are consistent with seeded sales. Lines that would oversell are
//! skipped.

use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use std::env;

use medlocus_core::validation::{validate_customer, validate_medicine, validate_new_sale};
use medlocus_core::{
    CustomerInput, MedicineInput, Money, NewSale, NewSaleItem, SaleStatus, SupplierInput,
};
use medlocus_db::{Database, DbConfig, DbError};

const SUPPLIERS: &[(&str, &str)] = &[
    ("HealthLine Distributors", "9820011223"),
    ("MedSupply Co", "9820044556"),
    ("Apex Pharma Wholesale", "9820077889"),
];

/// (name, company, stock, price in cents, days until expiry, supplier index)
const MEDICINES: &[(&str, &str, i64, i64, u64, usize)] = &[
    ("Paracetamol 500mg", "Cipla", 240, 250, 400, 0),
    ("Amoxicillin 250mg", "Sun Pharma", 80, 1200, 300, 0),
    ("Cetirizine 10mg", "Dr. Reddy's", 150, 180, 520, 1),
    ("Ibuprofen 400mg", "Abbott", 4, 320, 610, 1),
    ("Metformin 500mg", "Lupin", 60, 450, 20, 2),
    ("Omeprazole 20mg", "Zydus", 3, 600, 12, 2),
    ("Cough Syrup 100ml", "Dabur", 35, 950, 45, 0),
    ("Vitamin D3 60k", "Mankind", 90, 1500, 700, 1),
    ("Insulin Glargine", "Biocon", 8, 8900, 25, 2),
    ("ORS Sachet", "FDC", 300, 120, 900, 0),
];

const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("Rajesh Sharma", "rajesh.sharma@email.com", "9876543210", "123 Main St, Mumbai"),
    ("Anita Patel", "anita.patel@email.com", "9876543211", "456 Park Ave, Delhi"),
    ("Suresh Kumar", "suresh.kumar@email.com", "9876543212", "789 Market Rd, Bangalore"),
    ("Meera Singh", "meera.singh@email.com", "9876543213", "321 Garden St, Pune"),
    ("Kiran Reddy", "kiran.reddy@email.com", "9876543214", "654 Lake View, Hyderabad"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 40;
    let mut db_path = String::from("./medlocus_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MedLocus Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sales to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./medlocus_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MedLocus Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.medicines().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} medicines", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();

    // Suppliers
    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, contact) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&SupplierInput {
                supplier_name: name.to_string(),
                contact_no: contact.to_string(),
            })
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ {} suppliers", supplier_ids.len());

    // Medicines
    let mut medicines = Vec::with_capacity(MEDICINES.len());
    for (name, company, stock, cents, expires_in, supplier) in MEDICINES {
        let input = validate_medicine(&MedicineInput {
            name: name.to_string(),
            company: company.to_string(),
            mfg_date: days_ago(today, 180),
            exp_date: today
                .checked_add_days(Days::new(*expires_in))
                .unwrap_or(NaiveDate::MAX),
            quantity: *stock,
            price: Money::from_cents(*cents),
            supplier_id: supplier_ids[*supplier],
        })?;
        let listing = db.medicines().insert(&input).await?;
        medicines.push((listing.medicine.id, listing.medicine.price));
    }
    println!("✓ {} medicines", medicines.len());

    // Customers
    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email, phone, address) in CUSTOMERS {
        let input = validate_customer(&CustomerInput {
            name: name.to_string(),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            address: Some(address.to_string()),
        })?;
        customer_ids.push(db.customers().insert(&input).await?.id);
    }
    println!("✓ {} customers", customer_ids.len());

    // Sales spread over the last two weeks
    println!();
    println!("Generating sales...");

    let start = std::time::Instant::now();
    let mut committed = 0;
    let mut skipped = 0;

    for n in 0..sales {
        let (medicine_id, price) = medicines[(n * 7) % medicines.len()];
        let (second_id, second_price) = medicines[(n * 3 + 1) % medicines.len()];

        let mut items = vec![line(medicine_id, 1 + (n % 3) as i64, price)];
        if second_id != medicine_id && n % 2 == 0 {
            items.push(line(second_id, 1, second_price));
        }

        let status = match n % 10 {
            8 => SaleStatus::Pending,
            9 => SaleStatus::Cancelled,
            _ => SaleStatus::Completed,
        };

        let draft = validate_new_sale(&NewSale {
            customer_id: (n % 4 != 3).then(|| customer_ids[n % customer_ids.len()]),
            sale_date: Some(days_ago(today, (n % 14) as u64)),
            items,
            status: Some(status),
            notes: None,
            total_amount: None,
        })?;

        match db.sales().create(&draft).await {
            Ok(_) => committed += 1,
            Err(DbError::Domain(e)) => {
                skipped += 1;
                eprintln!("  Skipped sale {}: {}", n + 1, e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!(
        "✓ Generated {} sales in {:?} ({} skipped)",
        committed,
        start.elapsed(),
        skipped
    );

    println!();
    println!("Checking alerts...");
    let alerts = db.alerts().alerts(today).await?;
    println!("  {} medicines need attention", alerts.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn line(medicine_id: i64, quantity: i64, unit_price: Money) -> NewSaleItem {
    NewSaleItem {
        medicine_id,
        quantity,
        unit_price,
        subtotal: None,
    }
}

fn days_ago(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}
