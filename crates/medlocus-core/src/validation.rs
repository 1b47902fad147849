//! # Validation Module
//!
//! Input validation for MedLocus requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities, prices, subtotals, totals                             │
//! │  └── Runs before any transaction is opened                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0) on medicines                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medlocus_core::validation::{validate_quantity, validate_name};
//!
//! validate_quantity(5).unwrap();
//! assert_eq!(validate_name("name", "  Paracetamol ", 200).unwrap(), "Paracetamol");
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    CustomerInput, MedicineInput, NewSale, SaleDraft, SaleLine, SaleUpdate, SupplierInput,
};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_ITEMS, MAX_STOCK_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Normalizes an optional text field: trimmed, empty becomes `None`.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Loose email check: one `@` with text on both sides.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let email = validate_optional_text("email", email, 100)?;

    if let Some(ref e) = email {
        let valid = matches!(e.split_once('@'), Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
        if !valid {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
                reason: "must look like name@domain".to_string(),
            });
        }
    }

    Ok(email)
}

/// Validates a search query.
///
/// Empty means "no filter"; returns the trimmed query otherwise.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: 100,
        });
    }

    Ok((!query.is_empty()).then(|| query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_line_quantity("quantity", qty)
}

fn validate_line_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level set by an administrative edit.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price: zero up to [`MAX_UNIT_PRICE`].
pub fn validate_unit_price(field: &str, price: Money) -> ValidationResult<()> {
    validate_non_negative(field, price)?;

    if price > MAX_UNIT_PRICE {
        return Err(price_out_of_range(field));
    }

    Ok(())
}

fn price_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: MAX_UNIT_PRICE.cents() / 100,
    }
}

/// Validates that an amount is zero or greater. Zero is allowed (free items).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Sale Validators
// =============================================================================

/// Validates a sale request and produces the draft the sale processor
/// commits.
///
/// ## Rules
/// - `sale_date` is required
/// - At most MAX_SALE_ITEMS (100) lines; an empty sale is allowed
/// - Per line: quantity in 1..=999, unit_price ≥ 0,
///   subtotal ≥ 0 and equal to quantity × unit_price (derived when omitted)
/// - `total_amount` is recomputed as Σ subtotal; a client total that
///   disagrees is rejected
///
/// ## User Workflow
/// ```text
/// POST /api/sales
///      │
///      ▼
/// validate_new_sale() ← THIS FUNCTION (no storage access)
///      │
///      ├── bad line?        → VALIDATION_ERROR naming items[i].field
///      ├── total mismatch?  → VALIDATION_ERROR naming total_amount
///      │
///      └── OK → SaleDraft → SaleRepository::create (one transaction)
/// ```
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<SaleDraft> {
    let sale_date = sale.sale_date.ok_or_else(|| ValidationError::Required {
        field: "sale_date".to_string(),
    })?;

    if sale.items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 0,
            max: MAX_SALE_ITEMS as i64,
        });
    }

    let mut lines = Vec::with_capacity(sale.items.len());
    for (i, item) in sale.items.iter().enumerate() {
        let field = |name: &str| format!("items[{i}].{name}");

        validate_line_quantity(&field("quantity"), item.quantity)?;
        validate_unit_price(&field("unit_price"), item.unit_price)?;

        let expected = item
            .unit_price
            .checked_multiply_quantity(item.quantity)
            .ok_or_else(|| price_out_of_range(&field("unit_price")))?;
        let subtotal = match item.subtotal {
            Some(subtotal) => {
                validate_non_negative(&field("subtotal"), subtotal)?;
                if subtotal != expected {
                    return Err(ValidationError::Mismatch {
                        field: field("subtotal"),
                        expected: expected.to_string(),
                        actual: subtotal.to_string(),
                    });
                }
                subtotal
            }
            None => expected,
        };

        lines.push(SaleLine {
            medicine_id: item.medicine_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal,
        });
    }

    let total_amount =
        Money::checked_sum(lines.iter().map(|l| l.subtotal)).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "total_amount".to_string(),
                min: 0,
                max: i64::MAX / 100,
            }
        })?;
    if let Some(claimed) = sale.total_amount {
        if claimed != total_amount {
            return Err(ValidationError::Mismatch {
                field: "total_amount".to_string(),
                expected: total_amount.to_string(),
                actual: claimed.to_string(),
            });
        }
    }

    Ok(SaleDraft {
        customer_id: sale.customer_id,
        sale_date,
        status: sale.status.unwrap_or_default(),
        notes: validate_optional_text("notes", sale.notes.as_deref(), 1000)?,
        total_amount,
        items: lines,
    })
}

/// Validates a header-only sale update.
///
/// Line items are immutable; deleting and recreating the sale is the only
/// way to change them. Returns the header with `notes` normalized the same
/// way [`validate_new_sale`] does (blank means "not supplied").
pub fn validate_sale_update(update: &SaleUpdate) -> CoreResult<SaleUpdate> {
    if update.items.is_some() {
        return Err(CoreError::ImmutableSaleItems);
    }

    if let Some(total) = update.total_amount {
        validate_non_negative("total_amount", total)?;
    }

    Ok(SaleUpdate {
        customer_id: update.customer_id,
        sale_date: update.sale_date,
        total_amount: update.total_amount,
        status: update.status,
        notes: validate_optional_text("notes", update.notes.as_deref(), 1000)?,
        items: None,
    })
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a medicine payload and returns it with trimmed text fields.
pub fn validate_medicine(input: &MedicineInput) -> ValidationResult<MedicineInput> {
    let name = validate_name("name", &input.name, 200)?;
    let company = validate_name("company", &input.company, 200)?;
    validate_stock_quantity(input.quantity)?;
    validate_unit_price("price", input.price)?;

    if input.exp_date < input.mfg_date {
        return Err(ValidationError::InvalidFormat {
            field: "exp_date".to_string(),
            reason: "must not be before mfg_date".to_string(),
        });
    }

    Ok(MedicineInput {
        name,
        company,
        ..input.clone()
    })
}

/// Validates a customer payload and returns it normalized.
pub fn validate_customer(input: &CustomerInput) -> ValidationResult<CustomerInput> {
    Ok(CustomerInput {
        name: validate_name("name", &input.name, 100)?,
        email: validate_email(input.email.as_deref())?,
        phone: validate_optional_text("phone", input.phone.as_deref(), 20)?,
        address: validate_optional_text("address", input.address.as_deref(), 500)?,
    })
}

/// Validates a supplier payload. Both fields are required.
pub fn validate_supplier(input: &SupplierInput) -> ValidationResult<SupplierInput> {
    Ok(SupplierInput {
        supplier_name: validate_name("supplier_name", &input.supplier_name, 200)?,
        contact_no: validate_name("contact_no", &input.contact_no, 20)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewSaleItem, SaleStatus};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(medicine_id: i64, quantity: i64, cents: i64) -> NewSaleItem {
        NewSaleItem {
            medicine_id,
            quantity,
            unit_price: Money::from_cents(cents),
            subtotal: Some(Money::from_cents(cents * quantity)),
        }
    }

    fn sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            sale_date: Some(date(2026, 3, 14)),
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", " Aspirin ", 200).unwrap(), "Aspirin");
        assert!(validate_name("name", "   ", 200).is_err());
        assert!(validate_name("name", &"A".repeat(201), 200).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_email(Some("anita@example.com")).unwrap().as_deref(),
            Some("anita@example.com")
        );
        assert!(validate_email(Some("anita")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ").unwrap(), None);
        assert_eq!(validate_search_query(" para ").unwrap().as_deref(), Some("para"));
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_new_sale_recomputes_total() {
        let draft = validate_new_sale(&sale(vec![item(1, 2, 500), item(2, 1, 300)])).unwrap();
        assert_eq!(draft.total_amount, Money::from_cents(1300));
        assert_eq!(draft.status, SaleStatus::Completed);
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_new_sale_derives_missing_subtotal() {
        let mut line = item(1, 3, 250);
        line.subtotal = None;
        let draft = validate_new_sale(&sale(vec![line])).unwrap();
        assert_eq!(draft.items[0].subtotal, Money::from_cents(750));
    }

    #[test]
    fn test_new_sale_rejects_total_mismatch() {
        let mut request = sale(vec![item(1, 2, 500)]);
        request.total_amount = Some(Money::from_cents(900));
        let err = validate_new_sale(&request).unwrap_err();
        assert_eq!(err.field(), "total_amount");

        request.total_amount = Some(Money::from_cents(1000));
        assert!(validate_new_sale(&request).is_ok());
    }

    #[test]
    fn test_new_sale_rejects_bad_lines() {
        let err = validate_new_sale(&sale(vec![item(1, 1, 100), item(2, 0, 100)])).unwrap_err();
        assert_eq!(err.field(), "items[1].quantity");

        let err = validate_new_sale(&sale(vec![item(1, 1, -100)])).unwrap_err();
        assert_eq!(err.field(), "items[0].unit_price");

        let mut line = item(1, 2, 100);
        line.subtotal = Some(Money::from_cents(150));
        let err = validate_new_sale(&sale(vec![line])).unwrap_err();
        assert!(matches!(err, ValidationError::Mismatch { .. }));
        assert_eq!(err.field(), "items[0].subtotal");
    }

    #[test]
    fn test_new_sale_rejects_oversized_unit_price() {
        let line = NewSaleItem {
            medicine_id: 1,
            quantity: 2,
            unit_price: "90000000000000000.00".parse().unwrap(),
            subtotal: None,
        };
        let err = validate_new_sale(&sale(vec![line])).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "items[0].unit_price");

        let at_cap = NewSaleItem {
            medicine_id: 1,
            quantity: MAX_ITEM_QUANTITY,
            unit_price: MAX_UNIT_PRICE,
            subtotal: None,
        };
        let lines = (0..MAX_SALE_ITEMS).map(|_| at_cap.clone()).collect();
        let draft = validate_new_sale(&sale(lines)).unwrap();
        assert_eq!(
            draft.total_amount.cents(),
            MAX_UNIT_PRICE.cents() * MAX_ITEM_QUANTITY * MAX_SALE_ITEMS as i64
        );
    }

    #[test]
    fn test_new_sale_limits() {
        let empty = validate_new_sale(&sale(vec![])).unwrap();
        assert!(empty.total_amount.is_zero());

        let too_many = (0..=MAX_SALE_ITEMS as i64).map(|i| item(i, 1, 100)).collect();
        let err = validate_new_sale(&sale(too_many)).unwrap_err();
        assert_eq!(err.field(), "items");

        let mut no_date = sale(vec![]);
        no_date.sale_date = None;
        assert_eq!(validate_new_sale(&no_date).unwrap_err().field(), "sale_date");
    }

    #[test]
    fn test_sale_update_refuses_items() {
        let update = SaleUpdate {
            items: Some(serde_json::json!([])),
            ..Default::default()
        };
        assert!(matches!(
            validate_sale_update(&update),
            Err(CoreError::ImmutableSaleItems)
        ));

        let update = SaleUpdate {
            total_amount: Some(Money::from_cents(-1)),
            ..Default::default()
        };
        assert!(matches!(
            validate_sale_update(&update),
            Err(CoreError::Validation(_))
        ));

        assert!(validate_sale_update(&SaleUpdate::default()).is_ok());
    }

    #[test]
    fn test_sale_update_normalizes_notes() {
        let blank = SaleUpdate {
            notes: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_sale_update(&blank).unwrap().notes, None);

        let padded = SaleUpdate {
            notes: Some("  paid by card ".to_string()),
            status: Some(SaleStatus::Pending),
            ..Default::default()
        };
        let header = validate_sale_update(&padded).unwrap();
        assert_eq!(header.notes.as_deref(), Some("paid by card"));
        assert_eq!(header.status, Some(SaleStatus::Pending));
    }

    #[test]
    fn test_validate_medicine() {
        let input = MedicineInput {
            name: " Cetirizine ".to_string(),
            company: "Sun Pharma".to_string(),
            mfg_date: date(2025, 1, 1),
            exp_date: date(2027, 1, 1),
            quantity: 0,
            price: Money::from_cents(120),
            supplier_id: 1,
        };
        assert_eq!(validate_medicine(&input).unwrap().name, "Cetirizine");

        let negative = MedicineInput {
            quantity: -1,
            ..input.clone()
        };
        assert_eq!(validate_medicine(&negative).unwrap_err().field(), "quantity");

        let overstocked = MedicineInput {
            quantity: MAX_STOCK_QUANTITY + 1,
            ..input.clone()
        };
        assert!(matches!(
            validate_medicine(&overstocked),
            Err(ValidationError::OutOfRange { .. })
        ));

        let overpriced = MedicineInput {
            price: "90000000000000000.00".parse().unwrap(),
            ..input.clone()
        };
        assert_eq!(validate_medicine(&overpriced).unwrap_err().field(), "price");

        let backwards = MedicineInput {
            exp_date: date(2024, 1, 1),
            ..input
        };
        assert_eq!(validate_medicine(&backwards).unwrap_err().field(), "exp_date");
    }

    #[test]
    fn test_validate_supplier_and_customer() {
        let supplier = SupplierInput {
            supplier_name: "MedSupply Co".to_string(),
            contact_no: String::new(),
        };
        assert_eq!(validate_supplier(&supplier).unwrap_err().field(), "contact_no");

        let customer = CustomerInput {
            name: "Meera Singh".to_string(),
            phone: Some(" ".to_string()),
            ..Default::default()
        };
        let customer = validate_customer(&customer).unwrap();
        assert_eq!(customer.phone, None);
    }
}
