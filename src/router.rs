use crate::handlers::{
    customers::{create_customer, delete_customer, get_customer, get_customers, update_customer},
    flats::{create_flat, delete_flat, get_flat, get_flats, update_flat},
    fuel::{
        create_fuel_entry, delete_fuel_entry, get_fuel_entries, get_fuel_entry, get_fuel_summary,
        update_fuel_entry,
    },
    health::health_check,
    notes::{create_note, delete_note, get_note, get_notes, update_note},
    payments::{
        create_payment, delete_payment, delete_payments_by_account, get_payment,
        get_payment_outstanding, get_payments, update_payment,
    },
    rent_records::{
        create_rent_record, delete_rent_record, get_rent_record, get_rent_records,
        update_rent_record,
    },
    salaries::{
        create_salary_record, delete_salary_record, get_salary_defaults, get_salary_record,
        get_salary_records, update_salary_record,
    },
    tenants::{create_tenant, delete_tenant, get_tenant, get_tenants, update_tenant},
    tickets::{
        create_ticket, delete_ticket, get_ticket, get_ticket_summary, get_tickets, refund_ticket,
        update_ticket,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
    vehicles::{create_vehicle, delete_vehicle, get_vehicle, get_vehicles, update_vehicle},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Ticket CRUD routes
        .route("/api/v1/tickets", post(create_ticket))
        .route("/api/v1/tickets", get(get_tickets))
        .route("/api/v1/tickets/summary", get(get_ticket_summary))
        .route("/api/v1/tickets/:ticket_id", get(get_ticket))
        .route("/api/v1/tickets/:ticket_id", put(update_ticket))
        .route("/api/v1/tickets/:ticket_id", delete(delete_ticket))
        .route("/api/v1/tickets/:ticket_id/refund", post(refund_ticket))
        // Payment routes
        .route("/api/v1/payments", post(create_payment))
        .route("/api/v1/payments", get(get_payments))
        .route("/api/v1/payments", delete(delete_payments_by_account))
        .route("/api/v1/payments/summary", get(get_payment_outstanding))
        .route("/api/v1/payments/:payment_id", get(get_payment))
        .route("/api/v1/payments/:payment_id", put(update_payment))
        .route("/api/v1/payments/:payment_id", delete(delete_payment))
        // Fuel-log routes
        .route("/api/v1/fuel", post(create_fuel_entry))
        .route("/api/v1/fuel", get(get_fuel_entries))
        .route("/api/v1/fuel/summary", get(get_fuel_summary))
        .route("/api/v1/fuel/:entry_id", get(get_fuel_entry))
        .route("/api/v1/fuel/:entry_id", put(update_fuel_entry))
        .route("/api/v1/fuel/:entry_id", delete(delete_fuel_entry))
        // Vehicle CRUD routes
        .route("/api/v1/vehicles", post(create_vehicle))
        .route("/api/v1/vehicles", get(get_vehicles))
        .route("/api/v1/vehicles/:vehicle_id", get(get_vehicle))
        .route("/api/v1/vehicles/:vehicle_id", put(update_vehicle))
        .route("/api/v1/vehicles/:vehicle_id", delete(delete_vehicle))
        // Flat CRUD routes
        .route("/api/v1/flats", post(create_flat))
        .route("/api/v1/flats", get(get_flats))
        .route("/api/v1/flats/:flat_id", get(get_flat))
        .route("/api/v1/flats/:flat_id", put(update_flat))
        .route("/api/v1/flats/:flat_id", delete(delete_flat))
        // Tenant CRUD routes
        .route("/api/v1/tenants", post(create_tenant))
        .route("/api/v1/tenants", get(get_tenants))
        .route("/api/v1/tenants/:tenant_id", get(get_tenant))
        .route("/api/v1/tenants/:tenant_id", put(update_tenant))
        .route("/api/v1/tenants/:tenant_id", delete(delete_tenant))
        // Rent record CRUD routes
        .route("/api/v1/rent-records", post(create_rent_record))
        .route("/api/v1/rent-records", get(get_rent_records))
        .route("/api/v1/rent-records/:record_id", get(get_rent_record))
        .route("/api/v1/rent-records/:record_id", put(update_rent_record))
        .route("/api/v1/rent-records/:record_id", delete(delete_rent_record))
        // Salary record routes
        .route("/api/v1/salaries", post(create_salary_record))
        .route("/api/v1/salaries", get(get_salary_records))
        .route("/api/v1/salaries/defaults", get(get_salary_defaults))
        .route("/api/v1/salaries/:record_id", get(get_salary_record))
        .route("/api/v1/salaries/:record_id", put(update_salary_record))
        .route("/api/v1/salaries/:record_id", delete(delete_salary_record))
        // Note CRUD routes
        .route("/api/v1/notes", post(create_note))
        .route("/api/v1/notes", get(get_notes))
        .route("/api/v1/notes/:note_id", get(get_note))
        .route("/api/v1/notes/:note_id", put(update_note))
        .route("/api/v1/notes/:note_id", delete(delete_note))
        // Customer CRUD routes
        .route("/api/v1/customers", post(create_customer))
        .route("/api/v1/customers", get(get_customers))
        .route("/api/v1/customers/:customer_id", get(get_customer))
        .route("/api/v1/customers/:customer_id", put(update_customer))
        .route("/api/v1/customers/:customer_id", delete(delete_customer))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
