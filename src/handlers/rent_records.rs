use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::rent_record;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Month keys are "YYYY-MM".
fn validate_month(month: &str) -> Result<(), ApiError> {
    let valid = month.len() == 7
        && month.as_bytes()[4] == b'-'
        && month[..4].parse::<u16>().is_ok()
        && month[5..]
            .parse::<u8>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(bad_request(format!(
            "month must be formatted as YYYY-MM, got '{month}'"
        )))
    }
}

/// Request body for recording a month of rent
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRentRecordRequest {
    /// Flat reference; unenforced
    pub flat_id: i32,
    pub tenant_id: Option<i32>,
    /// Month key, e.g. "2026-03"
    pub month: String,
    pub amount: Decimal,
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Request body for updating a rent record
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateRentRecordRequest {
    pub flat_id: Option<i32>,
    pub tenant_id: Option<i32>,
    pub month: Option<String>,
    pub amount: Option<Decimal>,
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Query parameters for listing rent records
#[derive(Debug, Deserialize, ToSchema)]
pub struct RentRecordListQuery {
    /// Restrict to one flat
    pub flat_id: Option<i32>,
}

/// Rent record response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RentRecordResponse {
    pub id: i32,
    pub flat_id: i32,
    pub tenant_id: Option<i32>,
    pub month: String,
    pub amount: Decimal,
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<rent_record::Model> for RentRecordResponse {
    fn from(model: rent_record::Model) -> Self {
        Self {
            id: model.id,
            flat_id: model.flat_id,
            tenant_id: model.tenant_id,
            month: model.month,
            amount: model.amount,
            paid_on: model.paid_on,
            notes: model.notes,
        }
    }
}

/// Record a month of rent
#[utoipa::path(
    post,
    path = "/api/v1/rent-records",
    tag = "rentals",
    request_body = CreateRentRecordRequest,
    responses(
        (status = 201, description = "Rent record created successfully", body = ApiResponse<RentRecordResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_rent_record(
    State(state): State<AppState>,
    Json(request): Json<CreateRentRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RentRecordResponse>>), ApiError> {
    validate_month(&request.month)?;
    if request.amount < Decimal::ZERO {
        return Err(bad_request("amount must not be negative"));
    }

    let now = Utc::now();
    let new_record = rent_record::ActiveModel {
        flat_id: Set(request.flat_id),
        tenant_id: Set(request.tenant_id),
        month: Set(request.month.clone()),
        amount: Set(request.amount),
        paid_on: Set(request.paid_on),
        notes: Set(request.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_record.insert(&state.db).await {
        Ok(record) => {
            info!(
                "Rent record created with ID: {} for flat {} month {}",
                record.id, record.flat_id, record.month
            );
            let response = ApiResponse {
                data: RentRecordResponse::from(record),
                message: "Rent record created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create rent record: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get all rent records
#[utoipa::path(
    get,
    path = "/api/v1/rent-records",
    tag = "rentals",
    params(
        ("flat_id" = Option<i32>, Query, description = "Flat filter"),
    ),
    responses(
        (status = 200, description = "Rent records retrieved successfully", body = ApiResponse<Vec<RentRecordResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_rent_records(
    Query(query): Query<RentRecordListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RentRecordResponse>>>, ApiError> {
    let mut finder = rent_record::Entity::find().order_by_asc(rent_record::Column::Month);
    if let Some(flat_id) = query.flat_id {
        finder = finder.filter(rent_record::Column::FlatId.eq(flat_id));
    }

    match finder.all(&state.db).await {
        Ok(records) => {
            let response = ApiResponse {
                data: records.into_iter().map(RentRecordResponse::from).collect(),
                message: "Rent records retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve rent records: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific rent record by ID
#[utoipa::path(
    get,
    path = "/api/v1/rent-records/{record_id}",
    tag = "rentals",
    params(
        ("record_id" = i32, Path, description = "Rent record ID"),
    ),
    responses(
        (status = 200, description = "Rent record retrieved successfully", body = ApiResponse<RentRecordResponse>),
        (status = 404, description = "Rent record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_rent_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RentRecordResponse>>, ApiError> {
    match rent_record::Entity::find_by_id(record_id).one(&state.db).await {
        Ok(Some(record)) => {
            let response = ApiResponse {
                data: RentRecordResponse::from(record),
                message: "Rent record retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Rent record with ID {} not found", record_id);
            Err(not_found(format!("Rent record with id {record_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve rent record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a rent record
#[utoipa::path(
    put,
    path = "/api/v1/rent-records/{record_id}",
    tag = "rentals",
    params(
        ("record_id" = i32, Path, description = "Rent record ID"),
    ),
    request_body = UpdateRentRecordRequest,
    responses(
        (status = 200, description = "Rent record updated successfully", body = ApiResponse<RentRecordResponse>),
        (status = 404, description = "Rent record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_rent_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateRentRecordRequest>,
) -> Result<Json<ApiResponse<RentRecordResponse>>, ApiError> {
    if let Some(month) = &request.month {
        validate_month(month)?;
    }
    if let Some(amount) = request.amount {
        if amount < Decimal::ZERO {
            return Err(bad_request("amount must not be negative"));
        }
    }

    let existing = match rent_record::Entity::find_by_id(record_id).one(&state.db).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!("Rent record with ID {} not found for update", record_id);
            return Err(not_found(format!("Rent record with id {record_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup rent record {}: {}", record_id, error);
            return Err(db_error(error));
        }
    };

    let mut record_active: rent_record::ActiveModel = existing.into();
    if let Some(flat_id) = request.flat_id {
        record_active.flat_id = Set(flat_id);
    }
    if let Some(tenant_id) = request.tenant_id {
        record_active.tenant_id = Set(Some(tenant_id));
    }
    if let Some(month) = request.month {
        record_active.month = Set(month);
    }
    if let Some(amount) = request.amount {
        record_active.amount = Set(amount);
    }
    if let Some(paid_on) = request.paid_on {
        record_active.paid_on = Set(Some(paid_on));
    }
    if let Some(notes) = request.notes {
        record_active.notes = Set(Some(notes));
    }
    record_active.updated_at = Set(Utc::now());

    match record_active.update(&state.db).await {
        Ok(updated) => {
            info!("Rent record with ID {} updated successfully", record_id);
            let response = ApiResponse {
                data: RentRecordResponse::from(updated),
                message: "Rent record updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update rent record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a rent record
#[utoipa::path(
    delete,
    path = "/api/v1/rent-records/{record_id}",
    tag = "rentals",
    params(
        ("record_id" = i32, Path, description = "Rent record ID"),
    ),
    responses(
        (status = 200, description = "Rent record deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Rent record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_rent_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match rent_record::Entity::delete_by_id(record_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Rent record with ID {} deleted successfully", record_id);
                let response = ApiResponse {
                    data: format!("Rent record {record_id} deleted"),
                    message: "Rent record deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Rent record with ID {} not found for deletion", record_id);
                Err(not_found(format!("Rent record with id {record_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete rent record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}
