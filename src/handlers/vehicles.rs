use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::vehicle;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Vehicle kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VehicleType {
    Car,
    Bike,
}

impl From<VehicleType> for vehicle::VehicleType {
    fn from(value: VehicleType) -> Self {
        match value {
            VehicleType::Car => vehicle::VehicleType::Car,
            VehicleType::Bike => vehicle::VehicleType::Bike,
        }
    }
}

impl From<vehicle::VehicleType> for VehicleType {
    fn from(value: vehicle::VehicleType) -> Self {
        match value {
            vehicle::VehicleType::Car => VehicleType::Car,
            vehicle::VehicleType::Bike => VehicleType::Bike,
        }
    }
}

/// Request body for creating a vehicle
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub vehicle_type: VehicleType,
    pub color: Option<String>,
    pub model: Option<String>,
    /// Engine capacity, e.g. "1197cc"
    pub capacity: Option<String>,
    pub plate: Option<String>,
}

/// Request body for updating a vehicle
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub color: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub plate: Option<String>,
}

/// Vehicle response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: i32,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub color: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub plate: Option<String>,
}

impl From<vehicle::Model> for VehicleResponse {
    fn from(model: vehicle::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            vehicle_type: model.vehicle_type.into(),
            color: model.color,
            model: model.model,
            capacity: model.capacity,
            plate: model.plate,
        }
    }
}

/// Create a new vehicle
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created successfully", body = ApiResponse<VehicleResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let now = Utc::now();
    let new_vehicle = vehicle::ActiveModel {
        name: Set(request.name.clone()),
        vehicle_type: Set(request.vehicle_type.into()),
        color: Set(request.color.clone()),
        model: Set(request.model.clone()),
        capacity: Set(request.capacity.clone()),
        plate: Set(request.plate.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_vehicle.insert(&state.db).await {
        Ok(vehicle_model) => {
            info!(
                "Vehicle created with ID: {}, name: {}",
                vehicle_model.id, vehicle_model.name
            );
            let response = ApiResponse {
                data: VehicleResponse::from(vehicle_model),
                message: "Vehicle created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create vehicle '{}': {}", request.name, error);
            Err(db_error(error))
        }
    }
}

/// Get all vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "Vehicles retrieved successfully", body = ApiResponse<Vec<VehicleResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, ApiError> {
    match vehicle::Entity::find().all(&state.db).await {
        Ok(vehicles) => {
            let response = ApiResponse {
                data: vehicles.into_iter().map(VehicleResponse::from).collect(),
                message: "Vehicles retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve vehicles: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific vehicle by ID
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(
        ("vehicle_id" = i32, Path, description = "Vehicle ID"),
    ),
    responses(
        (status = 200, description = "Vehicle retrieved successfully", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_vehicle(
    Path(vehicle_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<VehicleResponse>>, ApiError> {
    match vehicle::Entity::find_by_id(vehicle_id).one(&state.db).await {
        Ok(Some(vehicle_model)) => {
            let response = ApiResponse {
                data: VehicleResponse::from(vehicle_model),
                message: "Vehicle retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Vehicle with ID {} not found", vehicle_id);
            Err(not_found(format!("Vehicle with id {vehicle_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve vehicle {}: {}", vehicle_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a vehicle
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(
        ("vehicle_id" = i32, Path, description = "Vehicle ID"),
    ),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated successfully", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_vehicle(
    Path(vehicle_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, ApiError> {
    let existing = match vehicle::Entity::find_by_id(vehicle_id).one(&state.db).await {
        Ok(Some(vehicle_model)) => vehicle_model,
        Ok(None) => {
            warn!("Vehicle with ID {} not found for update", vehicle_id);
            return Err(not_found(format!("Vehicle with id {vehicle_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup vehicle {}: {}", vehicle_id, error);
            return Err(db_error(error));
        }
    };

    let mut vehicle_active: vehicle::ActiveModel = existing.into();
    if let Some(name) = request.name {
        vehicle_active.name = Set(name);
    }
    if let Some(vehicle_type) = request.vehicle_type {
        vehicle_active.vehicle_type = Set(vehicle_type.into());
    }
    if let Some(color) = request.color {
        vehicle_active.color = Set(Some(color));
    }
    if let Some(model) = request.model {
        vehicle_active.model = Set(Some(model));
    }
    if let Some(capacity) = request.capacity {
        vehicle_active.capacity = Set(Some(capacity));
    }
    if let Some(plate) = request.plate {
        vehicle_active.plate = Set(Some(plate));
    }
    vehicle_active.updated_at = Set(Utc::now());

    match vehicle_active.update(&state.db).await {
        Ok(updated) => {
            info!("Vehicle with ID {} updated successfully", vehicle_id);
            let response = ApiResponse {
                data: VehicleResponse::from(updated),
                message: "Vehicle updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update vehicle {}: {}", vehicle_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a vehicle. Fuel entries referencing it stay untouched.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(
        ("vehicle_id" = i32, Path, description = "Vehicle ID"),
    ),
    responses(
        (status = 200, description = "Vehicle deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Vehicle not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_vehicle(
    Path(vehicle_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match vehicle::Entity::delete_by_id(vehicle_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Vehicle with ID {} deleted successfully", vehicle_id);
                let response = ApiResponse {
                    data: format!("Vehicle {vehicle_id} deleted"),
                    message: "Vehicle deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Vehicle with ID {} not found for deletion", vehicle_id);
                Err(not_found(format!("Vehicle with id {vehicle_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete vehicle {}: {}", vehicle_id, error);
            Err(db_error(error))
        }
    }
}
