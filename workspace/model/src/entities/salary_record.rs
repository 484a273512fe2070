use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// One year of salary history.
///
/// `final_salary` is computed from the previous salary and the hike and
/// revision percentages when the record is created. The component
/// breakdown (basic, HRA, PF, gratuity, special allowance) is derived at
/// read time from the final figure.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salary_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub previous_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))")]
    pub hike_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))")]
    pub revision_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub bonus_percent: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub final_salary: Decimal,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
