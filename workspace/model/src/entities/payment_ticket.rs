use sea_orm::entity::prelude::*;

/// Join row recording that a payment settles a ticket.
///
/// The ticket id is an unenforced reference: deleting a ticket leaves the
/// row behind, matching the document-store heritage of the data model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub payment_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ticket_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id"
    )]
    Payment,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
