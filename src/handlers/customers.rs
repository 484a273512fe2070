use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::customer;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a customer
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: Option<String>,
}

/// Request body for updating a customer
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Customer response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
        }
    }
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created successfully", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let now = Utc::now();
    let new_customer = customer::ActiveModel {
        name: Set(request.name.clone()),
        phone: Set(request.phone.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_customer.insert(&state.db).await {
        Ok(customer_model) => {
            info!(
                "Customer created with ID: {}, name: {}",
                customer_model.id, customer_model.name
            );
            let response = ApiResponse {
                data: CustomerResponse::from(customer_model),
                message: "Customer created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create customer '{}': {}", request.name, error);
            Err(db_error(error))
        }
    }
}

/// Get all customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "customers",
    responses(
        (status = 200, description = "Customers retrieved successfully", body = ApiResponse<Vec<CustomerResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CustomerResponse>>>, ApiError> {
    match customer::Entity::find()
        .order_by_asc(customer::Column::Name)
        .all(&state.db)
        .await
    {
        Ok(customers) => {
            let response = ApiResponse {
                data: customers.into_iter().map(CustomerResponse::from).collect(),
                message: "Customers retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve customers: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = i32, Path, description = "Customer ID"),
    ),
    responses(
        (status = 200, description = "Customer retrieved successfully", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_customer(
    Path(customer_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ApiError> {
    match customer::Entity::find_by_id(customer_id).one(&state.db).await {
        Ok(Some(customer_model)) => {
            let response = ApiResponse {
                data: CustomerResponse::from(customer_model),
                message: "Customer retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Customer with ID {} not found", customer_id);
            Err(not_found(format!("Customer with id {customer_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve customer {}: {}", customer_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = i32, Path, description = "Customer ID"),
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated successfully", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_customer(
    Path(customer_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ApiError> {
    let existing = match customer::Entity::find_by_id(customer_id).one(&state.db).await {
        Ok(Some(customer_model)) => customer_model,
        Ok(None) => {
            warn!("Customer with ID {} not found for update", customer_id);
            return Err(not_found(format!("Customer with id {customer_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup customer {}: {}", customer_id, error);
            return Err(db_error(error));
        }
    };

    let mut customer_active: customer::ActiveModel = existing.into();
    if let Some(name) = request.name {
        customer_active.name = Set(name);
    }
    if let Some(phone) = request.phone {
        customer_active.phone = Set(Some(phone));
    }
    customer_active.updated_at = Set(Utc::now());

    match customer_active.update(&state.db).await {
        Ok(updated) => {
            info!("Customer with ID {} updated successfully", customer_id);
            let response = ApiResponse {
                data: CustomerResponse::from(updated),
                message: "Customer updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update customer {}: {}", customer_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = i32, Path, description = "Customer ID"),
    ),
    responses(
        (status = 200, description = "Customer deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Customer not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_customer(
    Path(customer_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match customer::Entity::delete_by_id(customer_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Customer with ID {} deleted successfully", customer_id);
                let response = ApiResponse {
                    data: format!("Customer {customer_id} deleted"),
                    message: "Customer deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Customer with ID {} not found for deletion", customer_id);
                Err(not_found(format!("Customer with id {customer_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete customer {}: {}", customer_id, error);
            Err(db_error(error))
        }
    }
}
