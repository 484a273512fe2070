use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::tenant;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a tenant
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTenantRequest {
    /// Flat reference; unenforced
    pub flat_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
}

/// Request body for updating a tenant
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTenantRequest {
    pub flat_id: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
}

/// Query parameters for listing tenants
#[derive(Debug, Deserialize, ToSchema)]
pub struct TenantListQuery {
    /// Restrict to one flat
    pub flat_id: Option<i32>,
}

/// Tenant response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    pub id: i32,
    pub flat_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
}

impl From<tenant::Model> for TenantResponse {
    fn from(model: tenant::Model) -> Self {
        Self {
            id: model.id,
            flat_id: model.flat_id,
            name: model.name,
            phone: model.phone,
            move_in_date: model.move_in_date,
            move_out_date: model.move_out_date,
        }
    }
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    tag = "rentals",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created successfully", body = ApiResponse<TenantResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(request): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TenantResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let now = Utc::now();
    let new_tenant = tenant::ActiveModel {
        flat_id: Set(request.flat_id),
        name: Set(request.name.clone()),
        phone: Set(request.phone.clone()),
        move_in_date: Set(request.move_in_date),
        move_out_date: Set(request.move_out_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_tenant.insert(&state.db).await {
        Ok(tenant_model) => {
            info!(
                "Tenant created with ID: {} for flat {}",
                tenant_model.id, tenant_model.flat_id
            );
            let response = ApiResponse {
                data: TenantResponse::from(tenant_model),
                message: "Tenant created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create tenant '{}': {}", request.name, error);
            Err(db_error(error))
        }
    }
}

/// Get all tenants
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    tag = "rentals",
    params(
        ("flat_id" = Option<i32>, Query, description = "Flat filter"),
    ),
    responses(
        (status = 200, description = "Tenants retrieved successfully", body = ApiResponse<Vec<TenantResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_tenants(
    Query(query): Query<TenantListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TenantResponse>>>, ApiError> {
    let mut finder = tenant::Entity::find();
    if let Some(flat_id) = query.flat_id {
        finder = finder.filter(tenant::Column::FlatId.eq(flat_id));
    }

    match finder.all(&state.db).await {
        Ok(tenants) => {
            let response = ApiResponse {
                data: tenants.into_iter().map(TenantResponse::from).collect(),
                message: "Tenants retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve tenants: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific tenant by ID
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "rentals",
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    responses(
        (status = 200, description = "Tenant retrieved successfully", body = ApiResponse<TenantResponse>),
        (status = 404, description = "Tenant not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    match tenant::Entity::find_by_id(tenant_id).one(&state.db).await {
        Ok(Some(tenant_model)) => {
            let response = ApiResponse {
                data: TenantResponse::from(tenant_model),
                message: "Tenant retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Tenant with ID {} not found", tenant_id);
            Err(not_found(format!("Tenant with id {tenant_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve tenant {}: {}", tenant_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a tenant
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "rentals",
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated successfully", body = ApiResponse<TenantResponse>),
        (status = 404, description = "Tenant not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTenantRequest>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    let existing = match tenant::Entity::find_by_id(tenant_id).one(&state.db).await {
        Ok(Some(tenant_model)) => tenant_model,
        Ok(None) => {
            warn!("Tenant with ID {} not found for update", tenant_id);
            return Err(not_found(format!("Tenant with id {tenant_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup tenant {}: {}", tenant_id, error);
            return Err(db_error(error));
        }
    };

    let mut tenant_active: tenant::ActiveModel = existing.into();
    if let Some(flat_id) = request.flat_id {
        tenant_active.flat_id = Set(flat_id);
    }
    if let Some(name) = request.name {
        tenant_active.name = Set(name);
    }
    if let Some(phone) = request.phone {
        tenant_active.phone = Set(Some(phone));
    }
    if let Some(move_in_date) = request.move_in_date {
        tenant_active.move_in_date = Set(Some(move_in_date));
    }
    if let Some(move_out_date) = request.move_out_date {
        tenant_active.move_out_date = Set(Some(move_out_date));
    }
    tenant_active.updated_at = Set(Utc::now());

    match tenant_active.update(&state.db).await {
        Ok(updated) => {
            info!("Tenant with ID {} updated successfully", tenant_id);
            let response = ApiResponse {
                data: TenantResponse::from(updated),
                message: "Tenant updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update tenant {}: {}", tenant_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a tenant
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{tenant_id}",
    tag = "rentals",
    params(
        ("tenant_id" = i32, Path, description = "Tenant ID"),
    ),
    responses(
        (status = 200, description = "Tenant deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Tenant not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_tenant(
    Path(tenant_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match tenant::Entity::delete_by_id(tenant_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Tenant with ID {} deleted successfully", tenant_id);
                let response = ApiResponse {
                    data: format!("Tenant {tenant_id} deleted"),
                    message: "Tenant deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Tenant with ID {} not found for deletion", tenant_id);
                Err(not_found(format!("Tenant with id {tenant_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete tenant {}: {}", tenant_id, error);
            Err(db_error(error))
        }
    }
}
