use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum VehicleType {
    #[sea_orm(string_value = "Car")]
    Car,
    #[sea_orm(string_value = "Bike")]
    Bike,
}

/// A vehicle the fuel log refers to, looked up by id from fuel entries.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub color: Option<String>,
    pub model: Option<String>,
    /// Engine capacity, e.g. "1197cc".
    pub capacity: Option<String>,
    pub plate: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
