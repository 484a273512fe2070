use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use common::SalaryComponents;
use model::entities::salary_record;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a yearly salary record.
///
/// When `previous_salary` is omitted, the final salary of the latest
/// earlier year is used.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSalaryRecordRequest {
    pub year: i32,
    pub previous_salary: Option<Decimal>,
    pub hike_percent: Decimal,
    pub revision_percent: Decimal,
    pub bonus_percent: Option<Decimal>,
}

/// Request body for updating a salary record. Changing the previous
/// salary or the percentages recomputes the final figure.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateSalaryRecordRequest {
    pub previous_salary: Option<Decimal>,
    pub hike_percent: Option<Decimal>,
    pub revision_percent: Option<Decimal>,
    pub bonus_percent: Option<Decimal>,
}

/// Query parameters for the previous-salary default lookup
#[derive(Debug, Deserialize, ToSchema)]
pub struct SalaryDefaultsQuery {
    /// Year the new record is for
    pub year: i32,
}

/// The previous-salary default for a new record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalaryDefaultsResponse {
    pub year: i32,
    /// Final salary of the latest earlier year, when one exists
    pub previous_salary: Option<Decimal>,
}

/// Salary record response model, with the derived component split
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalaryRecordResponse {
    pub id: i32,
    pub year: i32,
    pub previous_salary: Decimal,
    pub hike_percent: Decimal,
    pub revision_percent: Decimal,
    pub bonus_percent: Option<Decimal>,
    pub final_salary: Decimal,
    /// Derived at read time, never stored
    pub components: SalaryComponents,
}

impl From<salary_record::Model> for SalaryRecordResponse {
    fn from(model: salary_record::Model) -> Self {
        let components = compute::salary::components(model.final_salary);
        Self {
            id: model.id,
            year: model.year,
            previous_salary: model.previous_salary,
            hike_percent: model.hike_percent,
            revision_percent: model.revision_percent,
            bonus_percent: model.bonus_percent,
            final_salary: model.final_salary,
            components,
        }
    }
}

/// Final salary of the latest year strictly before `year`, if any.
async fn previous_final_salary(
    state: &AppState,
    year: i32,
) -> Result<Option<Decimal>, ApiError> {
    salary_record::Entity::find()
        .filter(salary_record::Column::Year.lt(year))
        .order_by_desc(salary_record::Column::Year)
        .one(&state.db)
        .await
        .map(|record| record.map(|r| r.final_salary))
        .map_err(db_error)
}

/// Create a yearly salary record
#[utoipa::path(
    post,
    path = "/api/v1/salaries",
    tag = "salaries",
    request_body = CreateSalaryRecordRequest,
    responses(
        (status = 201, description = "Salary record created successfully", body = ApiResponse<SalaryRecordResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_salary_record(
    State(state): State<AppState>,
    Json(request): Json<CreateSalaryRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SalaryRecordResponse>>), ApiError> {
    let previous_salary = match request.previous_salary {
        Some(previous_salary) => previous_salary,
        None => match previous_final_salary(&state, request.year).await? {
            Some(previous_salary) => {
                debug!(
                    "Defaulting previous salary for {} from an earlier record: {}",
                    request.year, previous_salary
                );
                previous_salary
            }
            None => {
                return Err(bad_request(format!(
                    "No earlier salary record exists to default from; previous_salary is required for year {}",
                    request.year
                )));
            }
        },
    };

    let final_salary = compute::salary::final_salary(
        previous_salary,
        request.hike_percent,
        request.revision_percent,
    )
    .map_err(|error| bad_request(error.to_string()))?;

    let now = Utc::now();
    let new_record = salary_record::ActiveModel {
        year: Set(request.year),
        previous_salary: Set(previous_salary),
        hike_percent: Set(request.hike_percent),
        revision_percent: Set(request.revision_percent),
        bonus_percent: Set(request.bonus_percent),
        final_salary: Set(final_salary),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_record.insert(&state.db).await {
        Ok(record) => {
            info!(
                "Salary record created for year {}: final salary {}",
                record.year, record.final_salary
            );
            let response = ApiResponse {
                data: SalaryRecordResponse::from(record),
                message: "Salary record created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!(
                "Failed to create salary record for year {}: {}",
                request.year, error
            );
            Err(db_error(error))
        }
    }
}

/// Get all salary records
#[utoipa::path(
    get,
    path = "/api/v1/salaries",
    tag = "salaries",
    responses(
        (status = 200, description = "Salary records retrieved successfully", body = ApiResponse<Vec<SalaryRecordResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_salary_records(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SalaryRecordResponse>>>, ApiError> {
    match salary_record::Entity::find()
        .order_by_asc(salary_record::Column::Year)
        .all(&state.db)
        .await
    {
        Ok(records) => {
            let response = ApiResponse {
                data: records.into_iter().map(SalaryRecordResponse::from).collect(),
                message: "Salary records retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve salary records: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get the previous-salary default for a new record
#[utoipa::path(
    get,
    path = "/api/v1/salaries/defaults",
    tag = "salaries",
    params(
        ("year" = i32, Query, description = "Year the new record is for"),
    ),
    responses(
        (status = 200, description = "Defaults retrieved successfully", body = ApiResponse<SalaryDefaultsResponse>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_salary_defaults(
    Query(query): Query<SalaryDefaultsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SalaryDefaultsResponse>>, ApiError> {
    let previous_salary = previous_final_salary(&state, query.year).await?;
    let response = ApiResponse {
        data: SalaryDefaultsResponse {
            year: query.year,
            previous_salary,
        },
        message: "Defaults retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific salary record by ID
#[utoipa::path(
    get,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    responses(
        (status = 200, description = "Salary record retrieved successfully", body = ApiResponse<SalaryRecordResponse>),
        (status = 404, description = "Salary record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_salary_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SalaryRecordResponse>>, ApiError> {
    match salary_record::Entity::find_by_id(record_id).one(&state.db).await {
        Ok(Some(record)) => {
            let response = ApiResponse {
                data: SalaryRecordResponse::from(record),
                message: "Salary record retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Salary record with ID {} not found", record_id);
            Err(not_found(format!("Salary record with id {record_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve salary record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a salary record, recomputing the final figure
#[utoipa::path(
    put,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    request_body = UpdateSalaryRecordRequest,
    responses(
        (status = 200, description = "Salary record updated successfully", body = ApiResponse<SalaryRecordResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Salary record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_salary_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateSalaryRecordRequest>,
) -> Result<Json<ApiResponse<SalaryRecordResponse>>, ApiError> {
    let existing = match salary_record::Entity::find_by_id(record_id).one(&state.db).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!("Salary record with ID {} not found for update", record_id);
            return Err(not_found(format!("Salary record with id {record_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup salary record {}: {}", record_id, error);
            return Err(db_error(error));
        }
    };

    let previous_salary = request.previous_salary.unwrap_or(existing.previous_salary);
    let hike_percent = request.hike_percent.unwrap_or(existing.hike_percent);
    let revision_percent = request.revision_percent.unwrap_or(existing.revision_percent);
    let final_salary = compute::salary::final_salary(previous_salary, hike_percent, revision_percent)
        .map_err(|error| bad_request(error.to_string()))?;

    let mut record_active: salary_record::ActiveModel = existing.into();
    record_active.previous_salary = Set(previous_salary);
    record_active.hike_percent = Set(hike_percent);
    record_active.revision_percent = Set(revision_percent);
    if let Some(bonus_percent) = request.bonus_percent {
        record_active.bonus_percent = Set(Some(bonus_percent));
    }
    record_active.final_salary = Set(final_salary);
    record_active.updated_at = Set(Utc::now());

    match record_active.update(&state.db).await {
        Ok(updated) => {
            info!("Salary record with ID {} updated successfully", record_id);
            let response = ApiResponse {
                data: SalaryRecordResponse::from(updated),
                message: "Salary record updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update salary record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a salary record
#[utoipa::path(
    delete,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    responses(
        (status = 200, description = "Salary record deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Salary record not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_salary_record(
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match salary_record::Entity::delete_by_id(record_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Salary record with ID {} deleted successfully", record_id);
                let response = ApiResponse {
                    data: format!("Salary record {record_id} deleted"),
                    message: "Salary record deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Salary record with ID {} not found for deletion", record_id);
                Err(not_found(format!("Salary record with id {record_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete salary record {}: {}", record_id, error);
            Err(db_error(error))
        }
    }
}
