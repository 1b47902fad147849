//! # Repository Module
//!
//! Database repository implementations for MedLocus.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.sales().create(&draft)                               │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐  write path   ┌──────────────────────────┐   │
//! │  │ SaleRepository       │──────────────►│ sales, sale_items,       │   │
//! │  │ MedicineRepository   │               │ medicines.quantity       │   │
//! │  │ CustomerRepository   │               └──────────────────────────┘   │
//! │  │ SupplierRepository   │                                               │
//! │  ├──────────────────────┤  read path    ┌──────────────────────────┐   │
//! │  │ AlertRepository      │──────────────►│ current stock + sales    │   │
//! │  │ ReportRepository     │               └──────────────────────────┘   │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`](sale::SaleRepository) - Sale processor (stock-consistent create/delete)
//! - [`MedicineRepository`](medicine::MedicineRepository) - Medicine catalog
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer CRUD
//! - [`SupplierRepository`](supplier::SupplierRepository) - Supplier list/create
//! - [`AlertRepository`](alert::AlertRepository) - Low-stock and expiry signals
//! - [`ReportRepository`](report::ReportRepository) - KPIs and summary report

pub mod alert;
pub mod customer;
pub mod medicine;
pub mod report;
pub mod sale;
pub mod supplier;
