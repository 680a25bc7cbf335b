//! # Sales Reports
//!
//! Report windows and aggregate result types. The queries themselves live in
//! `kasir-db`; this module only decides *which* instants a window covers.
//!
//! ## Window Semantics
//! ```text
//! start_date = 2026-10-01, end_date = 2026-10-03   (inclusive dates)
//!
//!   2026-10-01T00:00Z                              2026-10-04T00:00Z
//!        [──────────────── window ──────────────────)
//!        start (inclusive)                  end (exclusive)
//! ```
//! All instants are UTC.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Report Window
// =============================================================================

/// A half-open interval of instants `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The calendar day (UTC) containing `now`.
    ///
    /// ## Errors
    /// `InvalidFormat` on the last representable day, whose end has no instant.
    pub fn today(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let day = now.date_naive();
        Self::for_dates(day, day)
    }

    /// Every instant of the inclusive date range `start_date..=end_date`.
    ///
    /// ## Errors
    /// `InvertedRange` when `start_date` is after `end_date`.
    pub fn for_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ValidationError> {
        if start_date > end_date {
            return Err(ValidationError::InvertedRange {
                start_field: "start_date".to_string(),
                end_field: "end_date".to_string(),
            });
        }

        let end_exclusive = end_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ValidationError::invalid_format("end_date", "date is out of range"))?;

        Ok(ReportWindow {
            start: start_date.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end_exclusive.and_time(chrono::NaiveTime::MIN).and_utc(),
        })
    }
}

// =============================================================================
// Report Results
// =============================================================================

/// The product with the highest summed quantity in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BestSeller {
    pub product_id: i64,
    pub name: String,
    #[serde(rename = "qty")]
    pub quantity_sold: i64,
}

/// Aggregates over the transactions of one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReport {
    pub total_revenue: i64,
    pub total_transactions: i64,
    /// `None` when the window holds no transactions.
    pub best_seller: Option<BestSeller>,
}

impl TransactionReport {
    pub fn empty() -> Self {
        TransactionReport {
            total_revenue: 0,
            total_transactions: 0,
            best_seller: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_for_dates_is_inclusive_of_end_day() {
        let window = ReportWindow::for_dates(date(2026, 10, 1), date(2026, 10, 3)).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 10, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_single_day_window() {
        let window = ReportWindow::for_dates(date(2026, 2, 28), date(2026, 2, 28)).unwrap();
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = ReportWindow::for_dates(date(2026, 10, 3), date(2026, 10, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn test_today_covers_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 13, 45, 0).unwrap();
        let window = ReportWindow::today(now).unwrap();
        assert!(window.start <= now && now < window.end);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_today_on_last_representable_day_is_an_error() {
        let err = ReportWindow::today(DateTime::<Utc>::MAX_UTC).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_empty_report_serializes_null_best_seller() {
        let value = serde_json::to_value(TransactionReport::empty()).unwrap();
        assert_eq!(value["total_revenue"], 0);
        assert_eq!(value["total_transactions"], 0);
        assert!(value["best_seller"].is_null());
    }
}
