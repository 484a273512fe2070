use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// The mode of travel a ticket was booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TravelType {
    #[sea_orm(string_value = "Train")]
    Train,
    #[sea_orm(string_value = "Bus")]
    Bus,
    #[sea_orm(string_value = "Flight")]
    Flight,
}

/// A booked travel ticket and the agency's margin on it.
///
/// `fare` is what the supplier charged, `amount` is what the customer is
/// billed, and `profit` is the margin the agency keeps. After a refund the
/// profit is rewritten to the cancellation charge.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub passenger_name: String,
    /// Booking reference (PNR) issued by the supplier.
    pub pnr: Option<String>,
    pub travel_type: TravelType,
    /// Free-text label of the booking account the ticket was issued from.
    pub account: String,
    pub journey_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub fare: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub profit: Decimal,
    /// Set when a payment settles this ticket; cleared when that payment
    /// is deleted.
    #[sea_orm(default_value = "false")]
    pub paid: bool,
    #[sea_orm(default_value = "false")]
    pub refunded: bool,
    pub refund_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub refund_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub cancellation_charge: Option<Decimal>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
