//! Application state shared across handlers.

use chrono::NaiveDate;
use medlocus_db::Database;

/// Shared application state.
///
/// Cloning is cheap: [`Database`] clones share one pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// The pharmacy's calendar day, in server local time.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
