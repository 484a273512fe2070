use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A customer payment against a booking account.
///
/// A settling payment references the tickets it pays off through
/// `payment_ticket` rows and its amount is the sum of their profits. A
/// partial payment carries no ticket references; it only reduces the
/// account's outstanding due.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    /// Free-form period label, e.g. "March 2026" or "Q1 settlement".
    pub period: Option<String>,
    pub account: String,
    #[sea_orm(default_value = "false")]
    pub is_partial: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_ticket::Entity")]
    PaymentTicket,
}

impl Related<super::payment_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentTicket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
