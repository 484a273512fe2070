use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState, CachedData};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::FuelSummary;
use compute::fuel::DerivedFuelEntry;
use model::entities::{fuel_entry, vehicle};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Fuel entry kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FuelEntryType {
    Refueling,
    Service,
    Repair,
}

impl From<FuelEntryType> for fuel_entry::FuelEntryType {
    fn from(value: FuelEntryType) -> Self {
        match value {
            FuelEntryType::Refueling => fuel_entry::FuelEntryType::Refueling,
            FuelEntryType::Service => fuel_entry::FuelEntryType::Service,
            FuelEntryType::Repair => fuel_entry::FuelEntryType::Repair,
        }
    }
}

impl From<fuel_entry::FuelEntryType> for FuelEntryType {
    fn from(value: fuel_entry::FuelEntryType) -> Self {
        match value {
            fuel_entry::FuelEntryType::Refueling => FuelEntryType::Refueling,
            fuel_entry::FuelEntryType::Service => FuelEntryType::Service,
            fuel_entry::FuelEntryType::Repair => FuelEntryType::Repair,
        }
    }
}

/// Request body for creating a fuel-log entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFuelEntryRequest {
    pub date: NaiveDate,
    /// Vehicle reference; not validated against the vehicles collection
    pub vehicle_id: i32,
    pub entry_type: FuelEntryType,
    pub odometer: Option<i32>,
    pub liters: Option<Decimal>,
    pub price_per_liter: Option<Decimal>,
    /// Defaults to liters x price_per_liter at read time when absent
    pub total: Option<Decimal>,
    pub notes: Option<String>,
    pub missed_previous_refuel: Option<bool>,
}

/// Request body for updating a fuel-log entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFuelEntryRequest {
    pub date: Option<NaiveDate>,
    pub vehicle_id: Option<i32>,
    pub entry_type: Option<FuelEntryType>,
    pub odometer: Option<i32>,
    pub liters: Option<Decimal>,
    pub price_per_liter: Option<Decimal>,
    pub total: Option<Decimal>,
    pub notes: Option<String>,
    pub missed_previous_refuel: Option<bool>,
}

/// Query parameters for listing fuel entries
#[derive(Debug, Deserialize, ToSchema)]
pub struct FuelListQuery {
    /// Restrict to one vehicle
    pub vehicle_id: Option<i32>,
}

/// Fuel entry response model, decorated with the read-time derivations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FuelEntryResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub vehicle_id: i32,
    pub entry_type: FuelEntryType,
    pub odometer: Option<i32>,
    pub liters: Option<Decimal>,
    pub price_per_liter: Option<Decimal>,
    pub total: Option<Decimal>,
    pub notes: Option<String>,
    pub missed_previous_refuel: bool,
    /// Km since the previous refuel baseline; derived, never stored
    pub distance: Option<i32>,
    /// Km per liter of this fill; derived, never stored
    pub mileage: Option<Decimal>,
}

impl From<DerivedFuelEntry> for FuelEntryResponse {
    fn from(derived: DerivedFuelEntry) -> Self {
        let entry = derived.entry;
        Self {
            id: entry.id,
            date: entry.date,
            vehicle_id: entry.vehicle_id,
            entry_type: entry.entry_type.into(),
            odometer: entry.odometer,
            liters: entry.liters,
            price_per_liter: entry.price_per_liter,
            total: entry.total,
            notes: entry.notes,
            missed_previous_refuel: entry.missed_previous_refuel,
            distance: derived.distance,
            mileage: derived.mileage,
        }
    }
}

fn validate_amounts(
    liters: Option<Decimal>,
    price_per_liter: Option<Decimal>,
    total: Option<Decimal>,
) -> Result<(), ApiError> {
    for (field, value) in [
        ("liters", liters),
        ("price_per_liter", price_per_liter),
        ("total", total),
    ] {
        if let Some(value) = value {
            if value < Decimal::ZERO {
                return Err(bad_request(format!("{field} must not be negative")));
            }
        }
    }
    Ok(())
}

/// Create a fuel-log entry
#[utoipa::path(
    post,
    path = "/api/v1/fuel",
    tag = "fuel",
    request_body = CreateFuelEntryRequest,
    responses(
        (status = 201, description = "Fuel entry created successfully", body = ApiResponse<FuelEntryResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_fuel_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateFuelEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelEntryResponse>>), ApiError> {
    validate_amounts(request.liters, request.price_per_liter, request.total)?;
    if let Some(odometer) = request.odometer {
        if odometer < 0 {
            return Err(bad_request("odometer must not be negative"));
        }
    }

    let now = Utc::now();
    let new_entry = fuel_entry::ActiveModel {
        date: Set(request.date),
        vehicle_id: Set(request.vehicle_id),
        entry_type: Set(request.entry_type.into()),
        odometer: Set(request.odometer),
        liters: Set(request.liters),
        price_per_liter: Set(request.price_per_liter),
        total: Set(request.total),
        notes: Set(request.notes.clone()),
        missed_previous_refuel: Set(request.missed_previous_refuel.unwrap_or(false)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_entry.insert(&state.db).await {
        Ok(entry) => {
            info!(
                "Fuel entry created with ID: {} for vehicle {}",
                entry.id, entry.vehicle_id
            );
            let response = ApiResponse {
                data: FuelEntryResponse::from(DerivedFuelEntry {
                    entry,
                    distance: None,
                    mileage: None,
                }),
                message: "Fuel entry created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create fuel entry: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get all fuel entries, decorated with distance and mileage
#[utoipa::path(
    get,
    path = "/api/v1/fuel",
    tag = "fuel",
    params(
        ("vehicle_id" = Option<i32>, Query, description = "Vehicle filter"),
    ),
    responses(
        (status = 200, description = "Fuel entries retrieved successfully", body = ApiResponse<Vec<FuelEntryResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_fuel_entries(
    Query(query): Query<FuelListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FuelEntryResponse>>>, ApiError> {
    let mut finder = fuel_entry::Entity::find()
        .order_by_asc(fuel_entry::Column::Date)
        .order_by_asc(fuel_entry::Column::Id);
    if let Some(vehicle_id) = query.vehicle_id {
        finder = finder.filter(fuel_entry::Column::VehicleId.eq(vehicle_id));
    }

    match finder.all(&state.db).await {
        Ok(entries) => {
            debug!("Retrieved {} fuel entries", entries.len());
            let data = compute::fuel::decorate(entries)
                .into_iter()
                .map(FuelEntryResponse::from)
                .collect();
            let response = ApiResponse {
                data,
                message: "Fuel entries retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve fuel entries: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific fuel entry by ID, decorated against its vehicle's history
#[utoipa::path(
    get,
    path = "/api/v1/fuel/{entry_id}",
    tag = "fuel",
    params(
        ("entry_id" = i32, Path, description = "Fuel entry ID"),
    ),
    responses(
        (status = 200, description = "Fuel entry retrieved successfully", body = ApiResponse<FuelEntryResponse>),
        (status = 404, description = "Fuel entry not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_fuel_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FuelEntryResponse>>, ApiError> {
    let entry = match fuel_entry::Entity::find_by_id(entry_id).one(&state.db).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            warn!("Fuel entry with ID {} not found", entry_id);
            return Err(not_found(format!("Fuel entry with id {entry_id} not found")));
        }
        Err(error) => {
            error!("Failed to retrieve fuel entry {}: {}", entry_id, error);
            return Err(db_error(error));
        }
    };

    // The derivation needs the sibling refuels of the same vehicle.
    let siblings = match fuel_entry::Entity::find()
        .filter(fuel_entry::Column::VehicleId.eq(entry.vehicle_id))
        .all(&state.db)
        .await
    {
        Ok(siblings) => siblings,
        Err(error) => {
            error!(
                "Failed to load vehicle history for fuel entry {}: {}",
                entry_id, error
            );
            return Err(db_error(error));
        }
    };

    let derived = compute::fuel::decorate(siblings)
        .into_iter()
        .find(|d| d.entry.id == entry_id)
        .map(FuelEntryResponse::from);

    match derived {
        Some(data) => {
            let response = ApiResponse {
                data,
                message: "Fuel entry retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        // The entry vanished between the two reads.
        None => Err(not_found(format!("Fuel entry with id {entry_id} not found"))),
    }
}

/// Update a fuel entry
#[utoipa::path(
    put,
    path = "/api/v1/fuel/{entry_id}",
    tag = "fuel",
    params(
        ("entry_id" = i32, Path, description = "Fuel entry ID"),
    ),
    request_body = UpdateFuelEntryRequest,
    responses(
        (status = 200, description = "Fuel entry updated successfully", body = ApiResponse<FuelEntryResponse>),
        (status = 404, description = "Fuel entry not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_fuel_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateFuelEntryRequest>,
) -> Result<Json<ApiResponse<FuelEntryResponse>>, ApiError> {
    validate_amounts(request.liters, request.price_per_liter, request.total)?;

    let existing = match fuel_entry::Entity::find_by_id(entry_id).one(&state.db).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            warn!("Fuel entry with ID {} not found for update", entry_id);
            return Err(not_found(format!("Fuel entry with id {entry_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup fuel entry {}: {}", entry_id, error);
            return Err(db_error(error));
        }
    };

    let mut entry_active: fuel_entry::ActiveModel = existing.into();
    if let Some(date) = request.date {
        entry_active.date = Set(date);
    }
    if let Some(vehicle_id) = request.vehicle_id {
        entry_active.vehicle_id = Set(vehicle_id);
    }
    if let Some(entry_type) = request.entry_type {
        entry_active.entry_type = Set(entry_type.into());
    }
    if let Some(odometer) = request.odometer {
        entry_active.odometer = Set(Some(odometer));
    }
    if let Some(liters) = request.liters {
        entry_active.liters = Set(Some(liters));
    }
    if let Some(price_per_liter) = request.price_per_liter {
        entry_active.price_per_liter = Set(Some(price_per_liter));
    }
    if let Some(total) = request.total {
        entry_active.total = Set(Some(total));
    }
    if let Some(notes) = request.notes {
        entry_active.notes = Set(Some(notes));
    }
    if let Some(missed) = request.missed_previous_refuel {
        entry_active.missed_previous_refuel = Set(missed);
    }
    entry_active.updated_at = Set(Utc::now());

    match entry_active.update(&state.db).await {
        Ok(updated) => {
            info!("Fuel entry with ID {} updated successfully", entry_id);
            let response = ApiResponse {
                data: FuelEntryResponse::from(DerivedFuelEntry {
                    entry: updated,
                    distance: None,
                    mileage: None,
                }),
                message: "Fuel entry updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update fuel entry {}: {}", entry_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a fuel entry
#[utoipa::path(
    delete,
    path = "/api/v1/fuel/{entry_id}",
    tag = "fuel",
    params(
        ("entry_id" = i32, Path, description = "Fuel entry ID"),
    ),
    responses(
        (status = 200, description = "Fuel entry deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Fuel entry not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_fuel_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match fuel_entry::Entity::delete_by_id(entry_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Fuel entry with ID {} deleted successfully", entry_id);
                let response = ApiResponse {
                    data: format!("Fuel entry {entry_id} deleted"),
                    message: "Fuel entry deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Fuel entry with ID {} not found for deletion", entry_id);
                Err(not_found(format!("Fuel entry with id {entry_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete fuel entry {}: {}", entry_id, error);
            Err(db_error(error))
        }
    }
}

/// Get the per-vehicle fuel-spend summary
#[utoipa::path(
    get,
    path = "/api/v1/fuel/summary",
    tag = "fuel",
    responses(
        (status = 200, description = "Fuel summary retrieved successfully", body = ApiResponse<FuelSummary>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_fuel_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FuelSummary>>, ApiError> {
    let today = Utc::now().date_naive();

    // Check cache first
    let cache_key = format!("fuel_summary_{today}");
    if let Some(CachedData::FuelSummary(summary)) = state.cache.get(&cache_key).await {
        let response = ApiResponse {
            data: summary,
            message: "Fuel summary retrieved from cache".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let entries = match fuel_entry::Entity::find().all(&state.db).await {
        Ok(entries) => entries,
        Err(error) => {
            error!("Failed to load fuel entries for summary: {}", error);
            return Err(db_error(error));
        }
    };
    let vehicles = match vehicle::Entity::find().all(&state.db).await {
        Ok(vehicles) => vehicles,
        Err(error) => {
            error!("Failed to load vehicles for summary: {}", error);
            return Err(db_error(error));
        }
    };

    let summary = match compute::fuel::vehicle_summaries(&entries, &vehicles, today) {
        Ok(summary) => summary,
        Err(error) => {
            error!("Failed to roll up fuel log: {}", error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(crate::schemas::ErrorResponse {
                    message: error.to_string(),
                }),
            ));
        }
    };

    state
        .cache
        .insert(cache_key, CachedData::FuelSummary(summary.clone()))
        .await;

    let response = ApiResponse {
        data: summary,
        message: "Fuel summary retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
