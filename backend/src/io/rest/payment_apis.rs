//! # REST API for Payments

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use shared::{CreatePaymentRequest, DeleteResponse, UpdatePaymentRequest};
use tracing::{error, info};

use super::mappers::PaymentMapper;
use super::ApiError;
use crate::domain::commands::payments::PaymentListQuery as DomainPaymentListQuery;
use crate::AppState;

// Query parameters for payment listing
#[derive(Debug, Default, Deserialize)]
pub struct PaymentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub payer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> impl IntoResponse {
    info!("GET /api/payments - query: {:?}", query);

    let query = DomainPaymentListQuery {
        page: query.page,
        limit: query.limit,
        payer_id: query.payer_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    match state.payment_service.list_payments(query).await {
        Ok(result) => (StatusCode::OK, Json(PaymentMapper::to_list_response(result))).into_response(),
        Err(e) => {
            error!("Failed to list payments: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    info!("POST /api/payments - request: {:?}", request);

    match state
        .payment_service
        .create_payment(PaymentMapper::to_create_command(request))
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(PaymentMapper::to_dto(payment))).into_response(),
        Err(e) => {
            error!("Failed to create payment: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/payments/{}", payment_id);

    match state.payment_service.get_payment(&payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(PaymentMapper::to_dto(payment))).into_response(),
        Err(e) => {
            error!("Failed to get payment {}: {}", payment_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(request): Json<UpdatePaymentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/payments/{} - request: {:?}", payment_id, request);

    match state
        .payment_service
        .update_payment(PaymentMapper::to_update_command(payment_id.clone(), request))
        .await
    {
        Ok(payment) => (StatusCode::OK, Json(PaymentMapper::to_dto(payment))).into_response(),
        Err(e) => {
            error!("Failed to update payment {}: {}", payment_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn soft_delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/payments/{}/soft-delete", payment_id);

    match state.payment_service.soft_delete_payment(&payment_id).await {
        Ok(id) => {
            let response = DeleteResponse {
                message: "Payment soft deleted".to_string(),
                id: id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to soft delete payment {}: {}", payment_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/payments/{}", payment_id);

    match state.payment_service.delete_payment(&payment_id).await {
        Ok(id) => {
            let response = DeleteResponse {
                message: "Payment deleted".to_string(),
                id: id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete payment {}: {}", payment_id, e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_payment_with_unknown_users_is_bad_request() {
        let state = AppState::for_test().await;

        let request = CreatePaymentRequest {
            payer_id: uuid::Uuid::new_v4().to_string(),
            receiver_id: uuid::Uuid::new_v4().to_string(),
            amount: dec!(5),
            remark: None,
        };
        let response = create_payment(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_payments_empty_is_ok() {
        let state = AppState::for_test().await;

        let response = list_payments(State(state), Query(PaymentListQuery::default())).await;

        assert_eq!(response.into_response().status(), StatusCode::OK);
    }
}
