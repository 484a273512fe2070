use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::flat;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Distinguishes an absent field from an explicit `null`, so a flat can
/// be vacated by sending `"current_tenant_id": null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request body for creating a flat
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFlatRequest {
    pub name: String,
    pub address: Option<String>,
    /// Pointer into the tenants collection; unenforced
    pub current_tenant_id: Option<i32>,
}

/// Request body for updating a flat
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFlatRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    /// Omit to keep the pointer, send null to vacate, send an id to move
    /// a tenant in
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub current_tenant_id: Option<Option<i32>>,
}

/// Flat response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlatResponse {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub current_tenant_id: Option<i32>,
}

impl From<flat::Model> for FlatResponse {
    fn from(model: flat::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            current_tenant_id: model.current_tenant_id,
        }
    }
}

/// Create a new flat
#[utoipa::path(
    post,
    path = "/api/v1/flats",
    tag = "rentals",
    request_body = CreateFlatRequest,
    responses(
        (status = 201, description = "Flat created successfully", body = ApiResponse<FlatResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_flat(
    State(state): State<AppState>,
    Json(request): Json<CreateFlatRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FlatResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let now = Utc::now();
    let new_flat = flat::ActiveModel {
        name: Set(request.name.clone()),
        address: Set(request.address.clone()),
        current_tenant_id: Set(request.current_tenant_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_flat.insert(&state.db).await {
        Ok(flat_model) => {
            info!("Flat created with ID: {}, name: {}", flat_model.id, flat_model.name);
            let response = ApiResponse {
                data: FlatResponse::from(flat_model),
                message: "Flat created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create flat '{}': {}", request.name, error);
            Err(db_error(error))
        }
    }
}

/// Get all flats
#[utoipa::path(
    get,
    path = "/api/v1/flats",
    tag = "rentals",
    responses(
        (status = 200, description = "Flats retrieved successfully", body = ApiResponse<Vec<FlatResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_flats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FlatResponse>>>, ApiError> {
    match flat::Entity::find().all(&state.db).await {
        Ok(flats) => {
            let response = ApiResponse {
                data: flats.into_iter().map(FlatResponse::from).collect(),
                message: "Flats retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve flats: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific flat by ID
#[utoipa::path(
    get,
    path = "/api/v1/flats/{flat_id}",
    tag = "rentals",
    params(
        ("flat_id" = i32, Path, description = "Flat ID"),
    ),
    responses(
        (status = 200, description = "Flat retrieved successfully", body = ApiResponse<FlatResponse>),
        (status = 404, description = "Flat not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_flat(
    Path(flat_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FlatResponse>>, ApiError> {
    match flat::Entity::find_by_id(flat_id).one(&state.db).await {
        Ok(Some(flat_model)) => {
            let response = ApiResponse {
                data: FlatResponse::from(flat_model),
                message: "Flat retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Flat with ID {} not found", flat_id);
            Err(not_found(format!("Flat with id {flat_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve flat {}: {}", flat_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a flat, including moving its current tenant in or out
#[utoipa::path(
    put,
    path = "/api/v1/flats/{flat_id}",
    tag = "rentals",
    params(
        ("flat_id" = i32, Path, description = "Flat ID"),
    ),
    request_body = UpdateFlatRequest,
    responses(
        (status = 200, description = "Flat updated successfully", body = ApiResponse<FlatResponse>),
        (status = 404, description = "Flat not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_flat(
    Path(flat_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateFlatRequest>,
) -> Result<Json<ApiResponse<FlatResponse>>, ApiError> {
    let existing = match flat::Entity::find_by_id(flat_id).one(&state.db).await {
        Ok(Some(flat_model)) => flat_model,
        Ok(None) => {
            warn!("Flat with ID {} not found for update", flat_id);
            return Err(not_found(format!("Flat with id {flat_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup flat {}: {}", flat_id, error);
            return Err(db_error(error));
        }
    };

    let mut flat_active: flat::ActiveModel = existing.into();
    if let Some(name) = request.name {
        flat_active.name = Set(name);
    }
    if let Some(address) = request.address {
        flat_active.address = Set(Some(address));
    }
    if let Some(current_tenant_id) = request.current_tenant_id {
        flat_active.current_tenant_id = Set(current_tenant_id);
    }
    flat_active.updated_at = Set(Utc::now());

    match flat_active.update(&state.db).await {
        Ok(updated) => {
            info!("Flat with ID {} updated successfully", flat_id);
            let response = ApiResponse {
                data: FlatResponse::from(updated),
                message: "Flat updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update flat {}: {}", flat_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a flat. Its tenants and rent records stay behind.
#[utoipa::path(
    delete,
    path = "/api/v1/flats/{flat_id}",
    tag = "rentals",
    params(
        ("flat_id" = i32, Path, description = "Flat ID"),
    ),
    responses(
        (status = 200, description = "Flat deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Flat not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_flat(
    Path(flat_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match flat::Entity::delete_by_id(flat_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Flat with ID {} deleted successfully", flat_id);
                let response = ApiResponse {
                    data: format!("Flat {flat_id} deleted"),
                    message: "Flat deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Flat with ID {} not found for deletion", flat_id);
                Err(not_found(format!("Flat with id {flat_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete flat {}: {}", flat_id, error);
            Err(db_error(error))
        }
    }
}
