//! # REST API for Summaries

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::SummaryPeriod;
use tracing::{error, info};

use super::mappers::SummaryMapper;
use super::ApiError;
use crate::domain::commands::summary::SummaryQuery;
use crate::AppState;

/// Balances, totals and daily trends for an optional date window
pub async fn get_summary(
    State(state): State<AppState>,
    Query(period): Query<SummaryPeriod>,
) -> impl IntoResponse {
    info!("GET /api/summary - period: {:?}", period);

    let query = SummaryQuery {
        start_date: period.start_date,
        end_date: period.end_date,
    };

    match state.summary_service.get_summary(query).await {
        Ok(report) => (StatusCode::OK, Json(SummaryMapper::to_dto(report))).into_response(),
        Err(e) => {
            error!("Failed to build summary: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_payment_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/payment-summary");

    match state.summary_service.get_payment_summary().await {
        Ok(report) => {
            (StatusCode::OK, Json(SummaryMapper::payment_report_to_dto(report))).into_response()
        }
        Err(e) => {
            error!("Failed to build payment summary: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_with_bad_range_is_bad_request() {
        let state = AppState::for_test().await;

        let period = SummaryPeriod {
            start_date: Some("2025-03-01".to_string()),
            end_date: Some("2025-02-01".to_string()),
        };
        let response = get_summary(State(state), Query(period)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_summary_is_ok() {
        let state = AppState::for_test().await;

        let response = get_summary(State(state), Query(SummaryPeriod::default())).await;

        assert_eq!(response.into_response().status(), StatusCode::OK);
    }
}
