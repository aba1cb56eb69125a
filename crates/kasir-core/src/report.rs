//! # Report Aggregator
//!
//! Daily and date-range sales summaries.
//!
//! ## Window Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  daily_report()             today       00:00:00 ─► 23:59:59.999999999 │
//! │  range_report(start, end)   start date  00:00:00 ─► end date 23:59:59… │
//! │                                                                         │
//! │  Dates are calendar days in the server's local timezone; the window    │
//! │  is converted to UTC before it reaches the store.                      │
//! │                                                                         │
//! │  start > end  ──► InvalidRange (store never queried)                    │
//! │  no sales     ──► { total_revenue: 0, total_transaksi: 0,               │
//! │                     produk_terlaris: { nama: "-", qty_terjual: 0 } }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::ports::TransactionStore;
use crate::types::SalesReport;

// =============================================================================
// Report Window
// =============================================================================

/// Inclusive UTC time range a report aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The whole local calendar day `date`.
    pub fn for_day(date: NaiveDate) -> Self {
        Self::days_in(&Local, date, date)
    }

    /// From the start of `start` to the end of `end`, local time.
    ///
    /// ## Returns
    /// * `Err(CoreError::InvalidRange)` - `start` is after `end`
    pub fn for_range(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        Self::for_range_in(&Local, start, end)
    }

    /// Same as [`for_range`](Self::for_range) for an explicit timezone.
    pub fn for_range_in<Tz: TimeZone>(tz: &Tz, start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self::days_in(tz, start, end))
    }

    fn days_in<Tz: TimeZone>(tz: &Tz, start: NaiveDate, end: NaiveDate) -> Self {
        ReportWindow {
            start: to_utc(tz, start_of_day(start)),
            end: to_utc(tz, end_of_day(end)),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999999999 on `date`.
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

/// Resolves a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside
/// a DST gap are read as UTC.
fn to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

// =============================================================================
// Aggregator
// =============================================================================

/// Resolves report windows and delegates aggregation to the store.
#[derive(Clone)]
pub struct ReportAggregator {
    transactions: Arc<dyn TransactionStore>,
}

impl ReportAggregator {
    pub fn new(transactions: Arc<dyn TransactionStore>) -> Self {
        ReportAggregator { transactions }
    }

    /// Sales for today (local time).
    pub async fn daily_report(&self) -> CoreResult<SalesReport> {
        self.report_for_day(Local::now().date_naive()).await
    }

    /// Sales for one local calendar day.
    pub async fn report_for_day(&self, date: NaiveDate) -> CoreResult<SalesReport> {
        self.summarize(ReportWindow::for_day(date)).await
    }

    /// Sales from `start` through the whole of `end`.
    pub async fn range_report(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<SalesReport> {
        let window = ReportWindow::for_range(start, end)?;
        self.summarize(window).await
    }

    async fn summarize(&self, window: ReportWindow) -> CoreResult<SalesReport> {
        debug!(start = %window.start, end = %window.end, "Aggregating sales");
        let report = self.transactions.sales_summary(window).await?;
        debug!(
            revenue = %report.total_revenue,
            transactions = report.transaction_count,
            "Sales aggregated"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::money::Money;
    use crate::testing::FakeStore;
    use crate::types::BestSeller;
    use chrono::{FixedOffset, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_window_in_utc() {
        let day = date(2026, 2, 14);
        let window = ReportWindow::for_range_in(&Utc, day, day).unwrap();

        assert_eq!(window.start.to_rfc3339(), "2026-02-14T00:00:00+00:00");
        assert_eq!(window.end.date_naive(), day);
        assert_eq!(
            (window.end.hour(), window.end.minute(), window.end.second()),
            (23, 59, 59)
        );
        assert_eq!(window.end.nanosecond(), 999_999_999);
    }

    #[test]
    fn test_window_respects_timezone() {
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
        let day = date(2026, 2, 14);
        let window = ReportWindow::for_range_in(&jakarta, day, day).unwrap();

        // Local midnight in UTC+7 is 17:00 UTC the previous day.
        assert_eq!(window.start.to_rfc3339(), "2026-02-13T17:00:00+00:00");
        assert_eq!(window.end.date_naive(), date(2026, 2, 14));
        assert_eq!(window.end.hour(), 16);
    }

    #[test]
    fn test_range_includes_whole_end_day() {
        let window = ReportWindow::for_range_in(&Utc, date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        let last_second = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        assert!(window.contains(window.start));
        assert!(window.contains(last_second));
        assert!(!window.contains(next_day));
    }

    #[test]
    fn test_reversed_range_is_invalid() {
        let err = ReportWindow::for_range(date(2026, 2, 10), date(2026, 2, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_range_report_rejects_reversed_range_without_query() {
        let store = Arc::new(FakeStore::new());
        let aggregator = ReportAggregator::new(store.clone());

        let err = aggregator
            .range_report(date(2026, 2, 10), date(2026, 2, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidRange { .. }));
        assert!(store.windows().is_empty());
    }

    #[tokio::test]
    async fn test_range_report_delegates_window() {
        let store = Arc::new(FakeStore::new());
        let aggregator = ReportAggregator::new(store.clone());
        let day = date(2026, 3, 5);

        aggregator.range_report(day, day).await.unwrap();

        assert_eq!(store.windows(), vec![ReportWindow::for_day(day)]);
    }

    #[tokio::test]
    async fn test_daily_report_covers_now() {
        let store = Arc::new(FakeStore::new());
        let aggregator = ReportAggregator::new(store.clone());

        let before = Local::now().date_naive();
        aggregator.daily_report().await.unwrap();
        let after = Local::now().date_naive();

        let windows = store.windows();
        assert_eq!(windows.len(), 1);
        // Either day is fine if the test straddles midnight
        assert!(
            windows[0] == ReportWindow::for_day(before) || windows[0] == ReportWindow::for_day(after)
        );
    }

    #[tokio::test]
    async fn test_empty_window_returns_zero_report() {
        let store = Arc::new(FakeStore::new());
        let report = ReportAggregator::new(store)
            .report_for_day(date(2026, 1, 1))
            .await
            .unwrap();

        assert_eq!(report.total_revenue, Money::zero());
        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.best_seller, BestSeller::none());
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let store = Arc::new(FakeStore::failing(StoreError::Unavailable(
            "pool closed".to_string(),
        )));
        let err = ReportAggregator::new(store)
            .report_for_day(date(2026, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Persistence(_)));
    }
}
