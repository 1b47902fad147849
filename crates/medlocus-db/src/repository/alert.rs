//! # Alert Repository
//!
//! Low-stock and near-expiry signals, computed from current stock on every
//! call. Nothing is persisted.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::medicine::MEDICINE_LISTING_SELECT;
use medlocus_core::inventory::{
    expiry_cutoff, expiry_horizon, ALERT_LIMIT, EXPIRY_HORIZON_DAYS, LOW_STOCK_THRESHOLD,
};
use medlocus_core::{Alert, ExpiringMedicine, MedicineListing};

/// Repository for derived inventory alerts.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: SqlitePool,
}

impl AlertRepository {
    /// Creates a new AlertRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AlertRepository { pool }
    }

    /// Medicines below the low-stock threshold or expiring within the
    /// horizon (already expired included), lowest stock first.
    ///
    /// Each medicine appears once even when both conditions hold.
    pub async fn alerts(&self, today: NaiveDate) -> DbResult<Vec<Alert>> {
        let cutoff = expiry_cutoff(today, EXPIRY_HORIZON_DAYS);

        debug!(%today, %cutoff, "Evaluating inventory alerts");

        let rows: Vec<(i64, String, i64, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT id, name, quantity, exp_date
            FROM medicines
            WHERE quantity < ?1 OR exp_date <= ?2
            ORDER BY quantity ASC, exp_date ASC, id ASC
            LIMIT ?3
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .bind(cutoff)
        .bind(ALERT_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, stock, exp_date)| Alert::new(id, name, stock, exp_date))
            .collect())
    }

    /// Medicines expiring between `today` and `today + days`, inclusive,
    /// soonest first. `days` defaults to 30; negatives mean today only.
    pub async fn expiring(
        &self,
        days: Option<i64>,
        today: NaiveDate,
    ) -> DbResult<Vec<ExpiringMedicine>> {
        let days = expiry_horizon(days);
        let cutoff = expiry_cutoff(today, days);

        debug!(%today, days, "Listing expiring medicines");

        let medicines = sqlx::query_as::<_, MedicineListing>(&format!(
            r#"
            {MEDICINE_LISTING_SELECT}
            WHERE m.exp_date BETWEEN ?1 AND ?2
            ORDER BY m.exp_date ASC, m.name ASC, m.id ASC
            "#
        ))
        .bind(today)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(medicines
            .into_iter()
            .map(|listing| ExpiringMedicine {
                days_until_expiry: listing.medicine.days_until_expiry(today),
                medicine: listing,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{date, seed_medicine, seed_supplier};
    use crate::{Database, DbConfig};
    use chrono::Days;
    use medlocus_core::inventory::needs_alert;

    #[tokio::test]
    async fn test_alerts_dedup_and_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = date(2026, 5, 10);
        let far = date(2028, 1, 1);
        let supplier = seed_supplier(&db, "HealthLine").await;

        let two = seed_medicine(&db, supplier, "Insulin", 2, 1500, far).await;
        let _ten = seed_medicine(&db, supplier, "Vitamin C", 10, 200, far).await;
        // Low stock AND expiring soon: must appear once
        let four = seed_medicine(&db, supplier, "Amoxicillin", 4, 900, date(2026, 5, 20)).await;
        let expiring = seed_medicine(
            &db,
            supplier,
            "Cough Syrup",
            50,
            450,
            today.checked_add_days(Days::new(5)).unwrap(),
        )
        .await;

        let alerts = db.alerts().alerts(today).await.unwrap();

        let ids: Vec<_> = alerts.iter().map(|a| a.medicine_id).collect();
        assert_eq!(ids, [two, four, expiring]);
        assert_eq!(alerts[0].sku, format!("MED-{two}"));
        assert_eq!(alerts[0].stock, 2);
        assert!(alerts
            .iter()
            .all(|a| needs_alert(a.stock, a.expiry_date, today)));
    }

    #[tokio::test]
    async fn test_alerts_include_expired_and_cap_at_ten() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = date(2026, 5, 10);
        let supplier = seed_supplier(&db, "HealthLine").await;

        let expired = seed_medicine(&db, supplier, "Old Stock", 100, 100, date(2026, 1, 1)).await;
        for i in 0..12 {
            seed_medicine(&db, supplier, &format!("Low {i}"), i % 5, 100, date(2028, 1, 1)).await;
        }

        let alerts = db.alerts().alerts(today).await.unwrap();
        assert_eq!(alerts.len(), 10);
        assert!(alerts.windows(2).all(|w| w[0].stock <= w[1].stock));
        // Highest stock sorts last, so the cap cuts it
        assert!(alerts.iter().all(|a| a.medicine_id != expired));
    }

    #[tokio::test]
    async fn test_expiring_window() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = date(2026, 5, 10);
        let supplier = seed_supplier(&db, "HealthLine").await;

        seed_medicine(&db, supplier, "Expired", 10, 100, date(2026, 5, 9)).await;
        let today_id = seed_medicine(&db, supplier, "Today", 10, 100, today).await;
        let soon = seed_medicine(&db, supplier, "Soon", 10, 100, date(2026, 5, 17)).await;
        seed_medicine(&db, supplier, "Later", 10, 100, date(2026, 7, 1)).await;

        let week = db.alerts().expiring(Some(7), today).await.unwrap();
        let ids: Vec<_> = week.iter().map(|e| e.medicine.medicine.id).collect();
        assert_eq!(ids, [today_id, soon]);
        assert_eq!(week[1].days_until_expiry, 7);
        assert_eq!(week[0].medicine.supplier_name.as_deref(), Some("HealthLine"));

        let default = db.alerts().expiring(None, today).await.unwrap();
        assert_eq!(default.len(), 2);

        let negative = db.alerts().expiring(Some(-3), today).await.unwrap();
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].days_until_expiry, 0);
    }

    #[tokio::test]
    async fn test_expiring_huge_horizon_lists_everything_ahead() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = date(2026, 5, 10);
        let supplier = seed_supplier(&db, "HealthLine").await;

        seed_medicine(&db, supplier, "Expired", 10, 100, date(2026, 5, 9)).await;
        let soon = seed_medicine(&db, supplier, "Soon", 10, 100, date(2026, 6, 1)).await;
        let far = seed_medicine(&db, supplier, "Far", 10, 100, date(2090, 1, 1)).await;

        let modest = db.alerts().expiring(Some(1000), today).await.unwrap();
        assert_eq!(modest.len(), 1);

        for days in [36_500, 3_000_000, i64::MAX] {
            let all = db.alerts().expiring(Some(days), today).await.unwrap();
            let ids: Vec<_> = all.iter().map(|e| e.medicine.medicine.id).collect();
            assert_eq!(ids, [soon, far], "days = {days}");
        }
    }
}
