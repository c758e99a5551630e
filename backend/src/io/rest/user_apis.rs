//! # REST API for Users

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{CreateUserRequest, DeleteResponse, UpdateUserRequest, User};
use tracing::{error, info};

use super::mappers::UserMapper;
use super::ApiError;
use crate::domain::commands::users::UserRemoval;
use crate::AppState;

/// List active users
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/users");

    match state.user_service.list_users().await {
        Ok(users) => {
            let users: Vec<User> = users.into_iter().map(UserMapper::to_dto).collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    match state
        .user_service
        .create_user(UserMapper::to_create_command(request))
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to create user: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}", user_id);

    match state.user_service.get_user(&user_id).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to get user {}: {}", user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{} - request: {:?}", user_id, request);

    match state
        .user_service
        .update_user(UserMapper::to_update_command(user_id.clone(), request))
        .await
    {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to update user {}: {}", user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Delete a user, or deactivate them if they appear in any history
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{}", user_id);

    match state.user_service.delete_user(&user_id).await {
        Ok(result) => {
            let message = match result.removal {
                UserRemoval::Deleted => "User deleted",
                UserRemoval::Deactivated => "User deactivated",
            };
            let response = DeleteResponse {
                message: message.to_string(),
                id: result.user.id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_user_handler() {
        let state = AppState::for_test().await;

        let request = CreateUserRequest {
            name: "Asha".to_string(),
            email: None,
        };
        let response = create_user(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_user_validation_error() {
        let state = AppState::for_test().await;

        let request = CreateUserRequest {
            name: " ".to_string(),
            email: None,
        };
        let response = create_user(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let state = AppState::for_test().await;

        let response = get_user(State(state), Path(uuid::Uuid::new_v4().to_string())).await;

        assert_eq!(response.into_response().status(), StatusCode::NOT_FOUND);
    }
}
