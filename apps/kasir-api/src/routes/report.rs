//! # Report Routes
//!
//! - `GET /api/report/hari-ini` - today's sales
//! - `GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD` - inclusive range

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use kasir_core::SalesReport;

use crate::error::ApiError;
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/report/hari-ini`
pub async fn daily(State(state): State<Arc<AppState>>) -> Result<Json<SalesReport>, ApiError> {
    Ok(Json(state.reports.daily_report().await?))
}

/// `GET /api/report`
pub async fn range(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<SalesReport>, ApiError> {
    let Query(params) = params?;

    let (Some(start), Some(end)) = (params.start_date, params.end_date) else {
        return Err(ApiError::validation("start_date and end_date are required"));
    };
    let start = parse_date("start_date", &start)?;
    let end = parse_date("end_date", &end)?;

    Ok(Json(state.reports.range_report(start, end).await?))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ApiError::validation(format!("Invalid {} format (expected YYYY-MM-DD)", field))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::checkout::checkout;
    use crate::routes::test_support::memory_state;
    use axum::http::StatusCode;
    use chrono::Local;
    use kasir_core::{BestSeller, CheckoutItem, CheckoutRequest, Money};

    fn params(start: Option<&str>, end: Option<&str>) -> Result<Query<RangeParams>, QueryRejection> {
        Ok(Query(RangeParams {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_daily_report_after_checkout() {
        let state = memory_state(false);
        checkout(
            State(state.clone()),
            Ok(Json(CheckoutRequest {
                items: vec![CheckoutItem::new(1, 2), CheckoutItem::new(2, 5)],
            })),
        )
        .await
        .unwrap();

        let Json(report) = daily(State(state)).await.unwrap();

        assert_eq!(report.total_revenue, Money::from_units(30000));
        assert_eq!(report.transaction_count, 1);
        assert_eq!(
            report.best_seller,
            BestSeller {
                name: "Teh Tarik".to_string(),
                quantity: 5
            }
        );
    }

    #[tokio::test]
    async fn test_range_report_today() {
        let state = memory_state(false);
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();

        let Json(report) = range(State(state), params(Some(&today), Some(&today)))
            .await
            .unwrap();

        assert_eq!(report, SalesReport::empty());
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["produk_terlaris"]["nama"], "-");
    }

    #[tokio::test]
    async fn test_range_requires_both_dates() {
        let err = range(State(memory_state(false)), params(Some("2026-02-01"), None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_range_rejects_bad_format() {
        let err = range(
            State(memory_state(false)),
            params(Some("01/02/2026"), Some("2026-02-10")),
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("start_date"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_range_rejects_reversed_dates() {
        let err = range(
            State(memory_state(false)),
            params(Some("2026-02-10"), Some("2026-02-01")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
