use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// An occupant of a flat, past or present. One flat accumulates many
/// tenants over time; the flat's `current_tenant_id` points at the one
/// living there now.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub flat_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
