use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::user;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    pub username: String,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    pub username: Option<String>,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    if request.username.trim().is_empty() {
        return Err(bad_request("username must not be empty"));
    }

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User created with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create user '{}': {}", request.username, error);
            Err(db_error(error))
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    match user::Entity::find().all(&state.db).await {
        Ok(users) => {
            let response = ApiResponse {
                data: users.into_iter().map(UserResponse::from).collect(),
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve users: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => {
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(not_found(format!("User with id {user_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve user {}: {}", user_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let existing = match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("User with ID {} not found for update", user_id);
            return Err(not_found(format!("User with id {user_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup user {}: {}", user_id, error);
            return Err(db_error(error));
        }
    };

    let mut user_active: user::ActiveModel = existing.into();
    if let Some(username) = request.username {
        user_active.username = Set(username);
    }

    match user_active.update(&state.db).await {
        Ok(updated) => {
            info!("User with ID {} updated successfully", user_id);
            let response = ApiResponse {
                data: UserResponse::from(updated),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update user {}: {}", user_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                let response = ApiResponse {
                    data: format!("User {user_id} deleted"),
                    message: "User deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("User with ID {} not found for deletion", user_id);
                Err(not_found(format!("User with id {user_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete user {}: {}", user_id, error);
            Err(db_error(error))
        }
    }
}
