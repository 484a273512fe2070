use crate::schemas::{
    bad_request, db_error, not_found, AccountQuery, ApiError, ApiResponse, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::AccountOutstanding;
use model::entities::{payment, payment_ticket, ticket};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for recording a payment.
///
/// Two shapes are accepted: a settling payment carries `ticket_ids` and
/// gets its amount computed from their profits, while a partial payment
/// carries an explicit `amount` and no ticket ids.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub date: NaiveDate,
    /// Required for partial payments, ignored for settling payments
    pub amount: Option<Decimal>,
    /// Free-form period label, e.g. "March 2026"
    pub period: Option<String>,
    pub account: String,
    pub is_partial: Option<bool>,
    /// Tickets this payment settles
    pub ticket_ids: Option<Vec<i32>>,
}

/// Request body for updating a payment's bookkeeping fields. The amount
/// and the settled-ticket list are derived facts and stay immutable.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub date: Option<NaiveDate>,
    pub period: Option<String>,
    pub account: Option<String>,
}

/// Payment response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub period: Option<String>,
    pub account: String,
    pub is_partial: bool,
    pub ticket_ids: Vec<i32>,
}

impl PaymentResponse {
    fn from_model(model: payment::Model, ticket_ids: Vec<i32>) -> Self {
        Self {
            id: model.id,
            date: model.date,
            amount: model.amount,
            period: model.period,
            account: model.account,
            is_partial: model.is_partial,
            ticket_ids,
        }
    }
}

/// Record a payment, either settling tickets or as a partial payment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    if request.account.trim().is_empty() {
        return Err(bad_request("account must not be empty"));
    }

    let is_partial = request.is_partial.unwrap_or(false);
    let ticket_ids = request.ticket_ids.clone().unwrap_or_default();

    if is_partial {
        create_partial_payment(&state, &request, &ticket_ids).await
    } else {
        create_settling_payment(&state, &request, &ticket_ids).await
    }
}

async fn create_partial_payment(
    state: &AppState,
    request: &CreatePaymentRequest,
    ticket_ids: &[i32],
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    if !ticket_ids.is_empty() {
        return Err(bad_request(
            "A partial payment must not reference ticket ids",
        ));
    }
    let amount = match request.amount {
        Some(amount) if amount > Decimal::ZERO => amount,
        Some(_) => return Err(bad_request("amount must be positive")),
        None => return Err(bad_request("A partial payment requires an amount")),
    };

    let now = Utc::now();
    let new_payment = payment::ActiveModel {
        date: Set(request.date),
        amount: Set(amount),
        period: Set(request.period.clone()),
        account: Set(request.account.clone()),
        is_partial: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_payment.insert(&state.db).await {
        Ok(payment_model) => {
            info!(
                "Partial payment of {} recorded for account {}",
                payment_model.amount, payment_model.account
            );
            let response = ApiResponse {
                data: PaymentResponse::from_model(payment_model, vec![]),
                message: "Payment recorded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!(
                "Failed to record partial payment for account {}: {}",
                request.account, error
            );
            Err(db_error(error))
        }
    }
}

async fn create_settling_payment(
    state: &AppState,
    request: &CreatePaymentRequest,
    ticket_ids: &[i32],
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    if ticket_ids.is_empty() {
        return Err(bad_request(
            "A settling payment requires at least one ticket id",
        ));
    }

    let tickets = match ticket::Entity::find()
        .filter(ticket::Column::Id.is_in(ticket_ids.to_vec()))
        .all(&state.db)
        .await
    {
        Ok(tickets) => tickets,
        Err(error) => {
            error!("Failed to load tickets for payment: {}", error);
            return Err(db_error(error));
        }
    };

    for ticket_id in ticket_ids {
        let Some(found) = tickets.iter().find(|t| t.id == *ticket_id) else {
            return Err(bad_request(format!(
                "Ticket with id {ticket_id} does not exist"
            )));
        };
        if found.paid {
            return Err(bad_request(format!(
                "Ticket with id {ticket_id} is already paid"
            )));
        }
    }

    // The payment is worth exactly the margin on the tickets it settles.
    let amount: Decimal = tickets.iter().map(|t| t.profit).sum();

    let now = Utc::now();
    let new_payment = payment::ActiveModel {
        date: Set(request.date),
        amount: Set(amount),
        period: Set(request.period.clone()),
        account: Set(request.account.clone()),
        is_partial: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let payment_model = match new_payment.insert(&state.db).await {
        Ok(payment_model) => payment_model,
        Err(error) => {
            error!(
                "Failed to record payment for account {}: {}",
                request.account, error
            );
            return Err(db_error(error));
        }
    };

    for ticket_model in tickets {
        let ticket_id = ticket_model.id;
        let join_row = payment_ticket::ActiveModel {
            payment_id: Set(payment_model.id),
            ticket_id: Set(ticket_id),
        };
        if let Err(error) = join_row.insert(&state.db).await {
            error!(
                "Failed to link ticket {} to payment {}: {}",
                ticket_id, payment_model.id, error
            );
            return Err(db_error(error));
        }

        let mut ticket_active: ticket::ActiveModel = ticket_model.into();
        ticket_active.paid = Set(true);
        ticket_active.updated_at = Set(Utc::now());
        if let Err(error) = ticket_active.update(&state.db).await {
            error!(
                "Failed to mark ticket {} paid for payment {}: {}",
                ticket_id, payment_model.id, error
            );
            return Err(db_error(error));
        }
    }

    info!(
        "Payment {} settles {} tickets on account {} for {}",
        payment_model.id,
        ticket_ids.len(),
        payment_model.account,
        payment_model.amount
    );
    let response = ApiResponse {
        data: PaymentResponse::from_model(payment_model, ticket_ids.to_vec()),
        message: "Payment recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn ticket_ids_for(state: &AppState, payment_id: i32) -> Result<Vec<i32>, ApiError> {
    payment_ticket::Entity::find()
        .filter(payment_ticket::Column::PaymentId.eq(payment_id))
        .all(&state.db)
        .await
        .map(|rows| rows.into_iter().map(|row| row.ticket_id).collect())
        .map_err(db_error)
}

/// Get all payments
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    params(
        ("account" = Option<String>, Query, description = "Booking account filter"),
    ),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payments(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, ApiError> {
    let mut finder = payment::Entity::find().order_by_asc(payment::Column::Date);
    if let Some(account) = &query.account {
        finder = finder.filter(payment::Column::Account.eq(account));
    }

    let payments = match finder.all(&state.db).await {
        Ok(payments) => payments,
        Err(error) => {
            error!("Failed to retrieve payments: {}", error);
            return Err(db_error(error));
        }
    };

    let join_rows = match payment_ticket::Entity::find().all(&state.db).await {
        Ok(rows) => rows,
        Err(error) => {
            error!("Failed to retrieve payment ticket links: {}", error);
            return Err(db_error(error));
        }
    };

    debug!("Retrieved {} payments", payments.len());
    let data = payments
        .into_iter()
        .map(|payment_model| {
            let ticket_ids = join_rows
                .iter()
                .filter(|row| row.payment_id == payment_model.id)
                .map(|row| row.ticket_id)
                .collect();
            PaymentResponse::from_model(payment_model, ticket_ids)
        })
        .collect();

    let response = ApiResponse {
        data,
        message: "Payments retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment retrieved successfully", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payment(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    match payment::Entity::find_by_id(payment_id).one(&state.db).await {
        Ok(Some(payment_model)) => {
            let ticket_ids = ticket_ids_for(&state, payment_model.id).await?;
            let response = ApiResponse {
                data: PaymentResponse::from_model(payment_model, ticket_ids),
                message: "Payment retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Payment with ID {} not found", payment_id);
            Err(not_found(format!("Payment with id {payment_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve payment {}: {}", payment_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a payment's date, period or account
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated successfully", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_payment(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    let existing = match payment::Entity::find_by_id(payment_id).one(&state.db).await {
        Ok(Some(payment_model)) => payment_model,
        Ok(None) => {
            warn!("Payment with ID {} not found for update", payment_id);
            return Err(not_found(format!("Payment with id {payment_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup payment {} for update: {}", payment_id, error);
            return Err(db_error(error));
        }
    };

    let mut payment_active: payment::ActiveModel = existing.into();
    if let Some(date) = request.date {
        payment_active.date = Set(date);
    }
    if let Some(period) = request.period {
        payment_active.period = Set(Some(period));
    }
    if let Some(account) = request.account {
        payment_active.account = Set(account);
    }
    payment_active.updated_at = Set(Utc::now());

    match payment_active.update(&state.db).await {
        Ok(updated) => {
            info!("Payment with ID {} updated successfully", payment_id);
            let ticket_ids = ticket_ids_for(&state, updated.id).await?;
            let response = ApiResponse {
                data: PaymentResponse::from_model(updated, ticket_ids),
                message: "Payment updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update payment {}: {}", payment_id, error);
            Err(db_error(error))
        }
    }
}

/// Unmarks settled tickets and removes the payment's join rows, then the
/// payment itself. Tickets that were deleted in the meantime are skipped.
async fn tear_down_payment(state: &AppState, payment_model: payment::Model) -> Result<(), ApiError> {
    let payment_id = payment_model.id;
    let ticket_ids = ticket_ids_for(state, payment_id).await?;

    for ticket_id in &ticket_ids {
        match ticket::Entity::find_by_id(*ticket_id).one(&state.db).await {
            Ok(Some(ticket_model)) => {
                let mut ticket_active: ticket::ActiveModel = ticket_model.into();
                ticket_active.paid = Set(false);
                ticket_active.updated_at = Set(Utc::now());
                if let Err(error) = ticket_active.update(&state.db).await {
                    error!(
                        "Failed to unmark ticket {} for deleted payment {}: {}",
                        ticket_id, payment_id, error
                    );
                    return Err(db_error(error));
                }
            }
            Ok(None) => {
                debug!(
                    "Ticket {} referenced by payment {} no longer exists",
                    ticket_id, payment_id
                );
            }
            Err(error) => {
                error!("Failed to lookup ticket {}: {}", ticket_id, error);
                return Err(db_error(error));
            }
        }
    }

    if let Err(error) = payment_ticket::Entity::delete_many()
        .filter(payment_ticket::Column::PaymentId.eq(payment_id))
        .exec(&state.db)
        .await
    {
        error!(
            "Failed to delete ticket links of payment {}: {}",
            payment_id, error
        );
        return Err(db_error(error));
    }

    if let Err(error) = payment::Entity::delete_by_id(payment_id).exec(&state.db).await {
        error!("Failed to delete payment {}: {}", payment_id, error);
        return Err(db_error(error));
    }

    info!(
        "Payment {} deleted, {} tickets unmarked",
        payment_id,
        ticket_ids.len()
    );
    Ok(())
}

/// Delete a payment, resetting its tickets to unpaid
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Payment not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_payment(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let payment_model = match payment::Entity::find_by_id(payment_id).one(&state.db).await {
        Ok(Some(payment_model)) => payment_model,
        Ok(None) => {
            warn!("Payment with ID {} not found for deletion", payment_id);
            return Err(not_found(format!("Payment with id {payment_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup payment {}: {}", payment_id, error);
            return Err(db_error(error));
        }
    };

    tear_down_payment(&state, payment_model).await?;

    let response = ApiResponse {
        data: format!("Payment {payment_id} deleted"),
        message: "Payment deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete every payment of one account
#[utoipa::path(
    delete,
    path = "/api/v1/payments",
    tag = "payments",
    params(
        ("account" = String, Query, description = "Booking account whose payments are removed"),
    ),
    responses(
        (status = 200, description = "Payments deleted successfully", body = ApiResponse<String>),
        (status = 400, description = "Missing account parameter", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_payments_by_account(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let Some(account) = query.account else {
        return Err(bad_request(
            "Bulk payment deletion requires an account parameter",
        ));
    };

    let payments = match payment::Entity::find()
        .filter(payment::Column::Account.eq(&account))
        .all(&state.db)
        .await
    {
        Ok(payments) => payments,
        Err(error) => {
            error!("Failed to load payments of account {}: {}", account, error);
            return Err(db_error(error));
        }
    };

    let count = payments.len();
    for payment_model in payments {
        tear_down_payment(&state, payment_model).await?;
    }

    info!("Deleted {} payments of account {}", count, account);
    let response = ApiResponse {
        data: format!("{count} payments of account {account} deleted"),
        message: "Payments deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get per-account outstanding dues
#[utoipa::path(
    get,
    path = "/api/v1/payments/summary",
    tag = "payments",
    params(
        ("account" = Option<String>, Query, description = "Booking account filter"),
    ),
    responses(
        (status = 200, description = "Outstanding dues retrieved successfully", body = ApiResponse<Vec<AccountOutstanding>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payment_outstanding(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountOutstanding>>>, ApiError> {
    let tickets = match ticket::Entity::find().all(&state.db).await {
        Ok(tickets) => tickets,
        Err(error) => {
            error!("Failed to load tickets for outstanding dues: {}", error);
            return Err(db_error(error));
        }
    };
    let payments = match payment::Entity::find().all(&state.db).await {
        Ok(payments) => payments,
        Err(error) => {
            error!("Failed to load payments for outstanding dues: {}", error);
            return Err(db_error(error));
        }
    };

    let data = compute::payments::outstanding(&tickets, &payments, query.account.as_deref());

    let response = ApiResponse {
        data,
        message: "Outstanding dues retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
