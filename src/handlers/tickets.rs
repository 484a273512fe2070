use crate::helpers::periods::resolve_window;
use crate::schemas::{
    bad_request, db_error, not_found, ApiError, ApiResponse, AppState, CachedData,
    TicketSummaryQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::TicketSummary;
use model::entities::ticket;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Travel type as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TravelType {
    Train,
    Bus,
    Flight,
}

impl From<TravelType> for ticket::TravelType {
    fn from(value: TravelType) -> Self {
        match value {
            TravelType::Train => ticket::TravelType::Train,
            TravelType::Bus => ticket::TravelType::Bus,
            TravelType::Flight => ticket::TravelType::Flight,
        }
    }
}

impl From<ticket::TravelType> for TravelType {
    fn from(value: ticket::TravelType) -> Self {
        match value {
            ticket::TravelType::Train => TravelType::Train,
            ticket::TravelType::Bus => TravelType::Bus,
            ticket::TravelType::Flight => TravelType::Flight,
        }
    }
}

/// Request body for creating a new ticket
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTicketRequest {
    /// Passenger the ticket was booked for
    pub passenger_name: String,
    /// Supplier booking reference
    pub pnr: Option<String>,
    pub travel_type: TravelType,
    /// Booking account label
    pub account: String,
    pub journey_date: NaiveDate,
    /// What the supplier charged
    pub fare: Decimal,
    /// What the customer is billed
    pub amount: Decimal,
    /// Margin; defaults to amount - fare
    pub profit: Option<Decimal>,
}

/// Request body for updating a ticket
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTicketRequest {
    pub passenger_name: Option<String>,
    pub pnr: Option<String>,
    pub travel_type: Option<TravelType>,
    pub account: Option<String>,
    pub journey_date: Option<NaiveDate>,
    pub fare: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub profit: Option<Decimal>,
}

/// Request body for refunding a ticket
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefundTicketRequest {
    /// Defaults to today
    pub refund_date: Option<NaiveDate>,
    /// What the customer gets back
    pub refund_amount: Decimal,
    /// The fee the agency keeps; becomes the ticket's profit
    pub cancellation_charge: Decimal,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketListQuery {
    /// Restrict to one booking account
    pub account: Option<String>,
    /// Restrict to paid or unpaid tickets
    pub paid: Option<bool>,
}

/// Ticket response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub id: i32,
    pub passenger_name: String,
    pub pnr: Option<String>,
    pub travel_type: TravelType,
    pub account: String,
    pub journey_date: NaiveDate,
    pub fare: Decimal,
    pub amount: Decimal,
    pub profit: Decimal,
    pub paid: bool,
    pub refunded: bool,
    pub refund_date: Option<NaiveDate>,
    pub refund_amount: Option<Decimal>,
    pub cancellation_charge: Option<Decimal>,
}

impl From<ticket::Model> for TicketResponse {
    fn from(model: ticket::Model) -> Self {
        Self {
            id: model.id,
            passenger_name: model.passenger_name,
            pnr: model.pnr,
            travel_type: model.travel_type.into(),
            account: model.account,
            journey_date: model.journey_date,
            fare: model.fare,
            amount: model.amount,
            profit: model.profit,
            paid: model.paid,
            refunded: model.refunded,
            refund_date: model.refund_date,
            refund_amount: model.refund_amount,
            cancellation_charge: model.cancellation_charge,
        }
    }
}

/// Create a new ticket
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    tag = "tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket created successfully", body = ApiResponse<TicketResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponse>>), ApiError> {
    debug!(
        "Creating ticket for passenger: {}, account: {}",
        request.passenger_name, request.account
    );

    if request.passenger_name.trim().is_empty() {
        return Err(bad_request("passenger_name must not be empty"));
    }
    if request.account.trim().is_empty() {
        return Err(bad_request("account must not be empty"));
    }

    let profit = request.profit.unwrap_or(request.amount - request.fare);
    let now = Utc::now();
    let new_ticket = ticket::ActiveModel {
        passenger_name: Set(request.passenger_name.clone()),
        pnr: Set(request.pnr.clone()),
        travel_type: Set(request.travel_type.into()),
        account: Set(request.account.clone()),
        journey_date: Set(request.journey_date),
        fare: Set(request.fare),
        amount: Set(request.amount),
        profit: Set(profit),
        paid: Set(false),
        refunded: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_ticket.insert(&state.db).await {
        Ok(ticket_model) => {
            info!(
                "Ticket created with ID: {}, passenger: {}",
                ticket_model.id, ticket_model.passenger_name
            );
            let response = ApiResponse {
                data: TicketResponse::from(ticket_model),
                message: "Ticket created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!(
                "Failed to create ticket for passenger '{}': {}",
                request.passenger_name, error
            );
            Err(db_error(error))
        }
    }
}

/// Get all tickets
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    tag = "tickets",
    params(
        ("account" = Option<String>, Query, description = "Booking account filter"),
        ("paid" = Option<bool>, Query, description = "Paid-state filter"),
    ),
    responses(
        (status = 200, description = "Tickets retrieved successfully", body = ApiResponse<Vec<TicketResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_tickets(
    Query(query): Query<TicketListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TicketResponse>>>, ApiError> {
    let mut finder = ticket::Entity::find().order_by_asc(ticket::Column::JourneyDate);
    if let Some(account) = &query.account {
        finder = finder.filter(ticket::Column::Account.eq(account));
    }
    if let Some(paid) = query.paid {
        finder = finder.filter(ticket::Column::Paid.eq(paid));
    }

    match finder.all(&state.db).await {
        Ok(tickets) => {
            debug!("Retrieved {} tickets", tickets.len());
            let response = ApiResponse {
                data: tickets.into_iter().map(TicketResponse::from).collect(),
                message: "Tickets retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve tickets: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific ticket by ID
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID"),
    ),
    responses(
        (status = 200, description = "Ticket retrieved successfully", body = ApiResponse<TicketResponse>),
        (status = 404, description = "Ticket not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_ticket(
    Path(ticket_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TicketResponse>>, ApiError> {
    match ticket::Entity::find_by_id(ticket_id).one(&state.db).await {
        Ok(Some(ticket_model)) => {
            let response = ApiResponse {
                data: TicketResponse::from(ticket_model),
                message: "Ticket retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Ticket with ID {} not found", ticket_id);
            Err(not_found(format!("Ticket with id {ticket_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve ticket with ID {}: {}", ticket_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a ticket
#[utoipa::path(
    put,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID"),
    ),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Ticket updated successfully", body = ApiResponse<TicketResponse>),
        (status = 404, description = "Ticket not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_ticket(
    Path(ticket_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTicketRequest>,
) -> Result<Json<ApiResponse<TicketResponse>>, ApiError> {
    let existing = match ticket::Entity::find_by_id(ticket_id).one(&state.db).await {
        Ok(Some(ticket_model)) => ticket_model,
        Ok(None) => {
            warn!("Ticket with ID {} not found for update", ticket_id);
            return Err(not_found(format!("Ticket with id {ticket_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup ticket {} for update: {}", ticket_id, error);
            return Err(db_error(error));
        }
    };

    let mut ticket_active: ticket::ActiveModel = existing.into();
    if let Some(passenger_name) = request.passenger_name {
        ticket_active.passenger_name = Set(passenger_name);
    }
    if let Some(pnr) = request.pnr {
        ticket_active.pnr = Set(Some(pnr));
    }
    if let Some(travel_type) = request.travel_type {
        ticket_active.travel_type = Set(travel_type.into());
    }
    if let Some(account) = request.account {
        ticket_active.account = Set(account);
    }
    if let Some(journey_date) = request.journey_date {
        ticket_active.journey_date = Set(journey_date);
    }
    if let Some(fare) = request.fare {
        ticket_active.fare = Set(fare);
    }
    if let Some(amount) = request.amount {
        ticket_active.amount = Set(amount);
    }
    if let Some(profit) = request.profit {
        ticket_active.profit = Set(profit);
    }
    ticket_active.updated_at = Set(Utc::now());

    match ticket_active.update(&state.db).await {
        Ok(updated) => {
            info!("Ticket with ID {} updated successfully", ticket_id);
            let response = ApiResponse {
                data: TicketResponse::from(updated),
                message: "Ticket updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update ticket with ID {}: {}", ticket_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a ticket
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID"),
    ),
    responses(
        (status = 200, description = "Ticket deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Ticket not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_ticket(
    Path(ticket_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match ticket::Entity::delete_by_id(ticket_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Ticket with ID {} deleted successfully", ticket_id);
                let response = ApiResponse {
                    data: format!("Ticket {ticket_id} deleted"),
                    message: "Ticket deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Ticket with ID {} not found for deletion", ticket_id);
                Err(not_found(format!("Ticket with id {ticket_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete ticket with ID {}: {}", ticket_id, error);
            Err(db_error(error))
        }
    }
}

/// Record a refund against a ticket
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{ticket_id}/refund",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID"),
    ),
    request_body = RefundTicketRequest,
    responses(
        (status = 200, description = "Refund recorded successfully", body = ApiResponse<TicketResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Ticket not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn refund_ticket(
    Path(ticket_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<RefundTicketRequest>,
) -> Result<Json<ApiResponse<TicketResponse>>, ApiError> {
    trace!("Entering refund_ticket for ticket_id: {}", ticket_id);

    if request.refund_amount < Decimal::ZERO {
        return Err(bad_request("refund_amount must not be negative"));
    }
    if request.cancellation_charge < Decimal::ZERO {
        return Err(bad_request("cancellation_charge must not be negative"));
    }

    let existing = match ticket::Entity::find_by_id(ticket_id).one(&state.db).await {
        Ok(Some(ticket_model)) => ticket_model,
        Ok(None) => {
            warn!("Ticket with ID {} not found for refund", ticket_id);
            return Err(not_found(format!("Ticket with id {ticket_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup ticket {} for refund: {}", ticket_id, error);
            return Err(db_error(error));
        }
    };

    if existing.refunded {
        return Err(bad_request(format!(
            "Ticket with id {ticket_id} is already refunded"
        )));
    }

    // The cancellation fee is what the agency keeps, so it becomes the
    // ticket's margin from here on.
    let mut ticket_active: ticket::ActiveModel = existing.into();
    ticket_active.refunded = Set(true);
    ticket_active.refund_date = Set(Some(
        request.refund_date.unwrap_or_else(|| Utc::now().date_naive()),
    ));
    ticket_active.refund_amount = Set(Some(request.refund_amount));
    ticket_active.cancellation_charge = Set(Some(request.cancellation_charge));
    ticket_active.profit = Set(request.cancellation_charge);
    ticket_active.updated_at = Set(Utc::now());

    match ticket_active.update(&state.db).await {
        Ok(updated) => {
            info!(
                "Refund recorded for ticket {}: amount {}, charge {}",
                ticket_id, request.refund_amount, request.cancellation_charge
            );
            let response = ApiResponse {
                data: TicketResponse::from(updated),
                message: "Refund recorded successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to record refund for ticket {}: {}", ticket_id, error);
            Err(db_error(error))
        }
    }
}

/// Get the per-travel-type profit summary
#[utoipa::path(
    get,
    path = "/api/v1/tickets/summary",
    tag = "tickets",
    params(
        ("account" = Option<String>, Query, description = "Booking account filter"),
        ("start_date" = Option<NaiveDate>, Query, description = "Journey-date window start"),
        ("end_date" = Option<NaiveDate>, Query, description = "Journey-date window end"),
    ),
    responses(
        (status = 200, description = "Ticket summary retrieved successfully", body = ApiResponse<TicketSummary>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_ticket_summary(
    Query(query): Query<TicketSummaryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TicketSummary>>, ApiError> {
    // Check cache first
    let cache_key = format!("ticket_summary_{:?}", query);
    if let Some(CachedData::TicketSummary(summary)) = state.cache.get(&cache_key).await {
        let response = ApiResponse {
            data: summary,
            message: "Ticket summary retrieved from cache".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let tickets = match ticket::Entity::find().all(&state.db).await {
        Ok(tickets) => tickets,
        Err(error) => {
            error!("Failed to load tickets for summary: {}", error);
            return Err(db_error(error));
        }
    };

    let window = resolve_window(&query);
    let summary = compute::tickets::summarize(&tickets, query.account.as_deref(), window);

    state
        .cache
        .insert(cache_key, CachedData::TicketSummary(summary.clone()))
        .await;

    let response = ApiResponse {
        data: summary,
        message: "Ticket summary retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
