use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profit rollup for one travel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketTypeSummary {
    /// Travel type label ("Train", "Bus" or "Flight").
    pub travel_type: String,
    pub count: u64,
    pub amount_total: Decimal,
    pub profit_total: Decimal,
}

/// Tickets grouped by travel type with overall totals. The per-type
/// profit totals always re-sum to `profit_total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketSummary {
    pub by_type: Vec<TicketTypeSummary>,
    pub ticket_count: u64,
    pub amount_total: Decimal,
    pub profit_total: Decimal,
}

/// Spend inside one period bucket, split by entry kind. Refueling entries
/// land in `fuel_spend`; service and repair entries land in
/// `service_spend`; the two always re-sum to `total_spend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpendBreakdown {
    pub fuel_spend: Decimal,
    pub service_spend: Decimal,
    pub total_spend: Decimal,
    pub liters: Decimal,
}

impl SpendBreakdown {
    pub fn zero() -> Self {
        Self {
            fuel_spend: Decimal::ZERO,
            service_spend: Decimal::ZERO,
            total_spend: Decimal::ZERO,
            liters: Decimal::ZERO,
        }
    }
}

/// One vehicle's fuel-log rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleFuelSummary {
    pub vehicle_id: i32,
    /// Missing when the vehicle record was deleted out from under its log.
    pub vehicle_name: Option<String>,
    pub current_month: SpendBreakdown,
    pub last_month: SpendBreakdown,
    pub year_to_date: SpendBreakdown,
    pub last_odometer: Option<i32>,
    pub km_since_last_service: Option<i32>,
}

/// Fuel-log rollups for every vehicle that has entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FuelSummary {
    pub vehicles: Vec<VehicleFuelSummary>,
}

/// What a booking account still owes: the profit on its unpaid tickets
/// minus whatever partial payments it has made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountOutstanding {
    pub account: String,
    pub unpaid_profit: Decimal,
    pub partial_paid: Decimal,
    pub outstanding_due: Decimal,
    pub unpaid_ticket_count: u64,
}

/// Fixed-formula breakdown of a final salary figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryComponents {
    pub basic: Decimal,
    pub hra: Decimal,
    pub pf: Decimal,
    pub gratuity: Decimal,
    pub special_allowance: Decimal,
}
