//! # REST API for Transactions
//!
//! Listing, creation, full replacement and both kinds of delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{
    CreateTransactionRequest, DeleteResponse, TransactionListRequest, UpdateTransactionRequest,
};
use tracing::{error, info};

use super::mappers::TransactionMapper;
use super::ApiError;
use crate::AppState;

/// List live transactions, newest first.
/// An empty page is still a 200 with an empty list.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListRequest>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    match state
        .transaction_service
        .list_transactions(TransactionMapper::to_list_query(query))
        .await
    {
        Ok(result) => {
            (StatusCode::OK, Json(TransactionMapper::to_list_response(result))).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    match state
        .transaction_service
        .create_transaction(TransactionMapper::to_create_command(request))
        .await
    {
        Ok(transaction) => {
            (StatusCode::CREATED, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", transaction_id);

    match state.transaction_service.get_transaction(&transaction_id).await {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => {
            error!("Failed to get transaction {}: {}", transaction_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    info!("PUT /api/transactions/{} - request: {:?}", transaction_id, request);

    match state
        .transaction_service
        .update_transaction(TransactionMapper::to_update_command(
            transaction_id.clone(),
            request,
        ))
        .await
    {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => {
            error!("Failed to update transaction {}: {}", transaction_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn soft_delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}/soft-delete", transaction_id);

    match state
        .transaction_service
        .soft_delete_transaction(&transaction_id)
        .await
    {
        Ok(id) => {
            let response = DeleteResponse {
                message: "Transaction soft deleted".to_string(),
                id: id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to soft delete transaction {}: {}", transaction_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}", transaction_id);

    match state.transaction_service.delete_transaction(&transaction_id).await {
        Ok(id) => {
            let response = DeleteResponse {
                message: "Transaction deleted".to_string(),
                id: id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete transaction {}: {}", transaction_id, e);
            ApiError::from(e).into_response()
        }
    }
}
