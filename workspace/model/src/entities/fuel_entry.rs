use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// What kind of spend a fuel-log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
pub enum FuelEntryType {
    #[sea_orm(string_value = "Refueling")]
    Refueling,
    #[sea_orm(string_value = "Service")]
    Service,
    #[sea_orm(string_value = "Repair")]
    Repair,
}

/// One line of a vehicle's running-cost log.
///
/// Distance and mileage are derived at read time from odometer deltas
/// between refuels; they are never stored. `vehicle_id` is an unenforced
/// reference: deleting the vehicle leaves its log intact.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fuel_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    pub vehicle_id: i32,
    pub entry_type: FuelEntryType,
    pub odometer: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub liters: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub price_per_liter: Option<Decimal>,
    /// Total spend; when absent it is derived as liters x price_per_liter.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub total: Option<Decimal>,
    pub notes: Option<String>,
    /// The fill before this one was never logged, so this entry starts a
    /// fresh odometer baseline and gets no distance of its own.
    #[sea_orm(default_value = "false")]
    pub missed_previous_refuel: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
