//! # Reporting Windows
//!
//! Date ranges used by the summary report. Everything is derived from an
//! explicit `today` so reports are reproducible.
//!
//! ```text
//!  trend_since        top_sellers_since      month_start          today
//!  (today - 7)        (today - 30)           (1st of month)
//!      │                   │                      │                  │
//! ─────┼───────────────────┼──────────────────────┼──────────────────┼───►
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};

/// Days of sales history considered for best sellers.
pub const TOP_SELLERS_WINDOW_DAYS: u64 = 30;

/// Days of sales history in the trend series.
pub const SALES_TREND_WINDOW_DAYS: u64 = 7;

/// Maximum number of best sellers reported.
pub const TOP_SELLERS_LIMIT: i64 = 10;

/// Date bounds for one summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub today: NaiveDate,
    /// First day of today's calendar month (inclusive).
    pub month_start: NaiveDate,
    /// First day of the following month (exclusive).
    pub next_month_start: NaiveDate,
    /// Oldest sale date counted for best sellers (inclusive).
    pub top_sellers_since: NaiveDate,
    /// Oldest sale date in the trend series (inclusive).
    pub trend_since: NaiveDate,
    /// Last expiry date counted as "expiring soon" (inclusive).
    pub expiring_until: NaiveDate,
}

impl ReportWindow {
    pub fn for_day(today: NaiveDate) -> Self {
        let month_start = today - Days::new(u64::from(today.day0()));
        Self {
            today,
            month_start,
            next_month_start: month_start
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
            top_sellers_since: days_before(today, TOP_SELLERS_WINDOW_DAYS),
            trend_since: days_before(today, SALES_TREND_WINDOW_DAYS),
            expiring_until: crate::inventory::expiry_cutoff(
                today,
                crate::inventory::EXPIRY_HORIZON_DAYS,
            ),
        }
    }
}

fn days_before(day: NaiveDate, days: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_mid_month() {
        let window = ReportWindow::for_day(date(2026, 3, 14));
        assert_eq!(window.month_start, date(2026, 3, 1));
        assert_eq!(window.next_month_start, date(2026, 4, 1));
        assert_eq!(window.top_sellers_since, date(2026, 2, 12));
        assert_eq!(window.trend_since, date(2026, 3, 7));
        assert_eq!(window.expiring_until, date(2026, 4, 13));
    }

    #[test]
    fn test_window_year_end() {
        let window = ReportWindow::for_day(date(2025, 12, 31));
        assert_eq!(window.month_start, date(2025, 12, 1));
        assert_eq!(window.next_month_start, date(2026, 1, 1));
    }

    #[test]
    fn test_window_first_of_month() {
        let window = ReportWindow::for_day(date(2026, 1, 1));
        assert_eq!(window.month_start, date(2026, 1, 1));
        assert_eq!(window.trend_since, date(2025, 12, 25));
    }
}
