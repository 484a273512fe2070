use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use common::{AccountOutstanding, FuelSummary, TicketSummary};
use moka::future::Cache;
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for summary endpoints
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    TicketSummary(TicketSummary),
    FuelSummary(FuelSummary),
}

/// Query parameters for the ticket summary endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketSummaryQuery {
    /// Restrict to one booking account
    pub account: Option<String>,
    /// Inclusive start of the journey-date window (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the journey-date window (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// Query parameter shared by account-scoped endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct AccountQuery {
    /// Booking account label
    pub account: Option<String>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,
}

/// Error type returned by all handlers: a status code plus `{ message }`.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// 400 with the given validation message.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// 404 with the given message.
pub fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// 500 carrying the driver's error message, the upstream failure contract.
pub fn db_error(error: DbErr) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            message: error.to_string(),
        }),
    )
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::tickets::get_ticket_summary,
        crate::handlers::fuel::get_fuel_summary,
        crate::handlers::payments::get_payment_outstanding,
        crate::handlers::salaries::get_salary_defaults,
    ),
    components(
        schemas(
            ApiResponse<TicketSummary>,
            ApiResponse<FuelSummary>,
            ApiResponse<Vec<AccountOutstanding>>,
            ErrorResponse,
            HealthResponse,
            TicketSummaryQuery,
            AccountQuery,
            TicketSummary,
            common::TicketTypeSummary,
            FuelSummary,
            common::VehicleFuelSummary,
            common::SpendBreakdown,
            AccountOutstanding,
            common::SalaryComponents,
            common::DateWindow,
            crate::handlers::salaries::SalaryDefaultsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tickets", description = "Ticket booking endpoints"),
        (name = "payments", description = "Customer payment endpoints"),
        (name = "fuel", description = "Vehicle fuel-log endpoints"),
        (name = "rentals", description = "Flat, tenant and rent endpoints"),
        (name = "salaries", description = "Salary history endpoints"),
        (name = "notes", description = "Sticky note endpoints"),
        (name = "customers", description = "Customer name-book endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "vehicles", description = "Vehicle endpoints"),
    ),
    info(
        title = "Tripbooks API",
        description = "Travel agency bookkeeping API - tickets, payments, fuel logs, rentals, salaries and notes",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
