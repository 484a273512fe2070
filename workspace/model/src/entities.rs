//! This file serves as the root for all SeaORM entity modules.
//! The collections mirror the agency's bookkeeping ledgers: tickets and
//! the payments that settle them, the vehicle fuel log, flat rentals,
//! salary history, sticky notes and the customer name book. Apart from
//! payments owning their join rows, the collections are deliberately
//! unrelated at the schema level: references between them are plain ids
//! with no enforcement.

pub mod customer;
pub mod flat;
pub mod fuel_entry;
pub mod note;
pub mod payment;
pub mod payment_ticket;
pub mod rent_record;
pub mod salary_record;
pub mod tenant;
pub mod ticket;
pub mod user;
pub mod vehicle;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::customer::Entity as Customer;
    pub use super::flat::Entity as Flat;
    pub use super::fuel_entry::Entity as FuelEntry;
    pub use super::note::Entity as Note;
    pub use super::payment::Entity as Payment;
    pub use super::payment_ticket::Entity as PaymentTicket;
    pub use super::rent_record::Entity as RentRecord;
    pub use super::salary_record::Entity as SalaryRecord;
    pub use super::tenant::Entity as Tenant;
    pub use super::ticket::Entity as Ticket;
    pub use super::user::Entity as User;
    pub use super::vehicle::Entity as Vehicle;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let now = Utc::now();

        let user1 = user::ActiveModel {
            username: Set("owner".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let customer1 = customer::ActiveModel {
            name: Set("Ravi Sharma".to_string()),
            phone: Set(Some("9876543210".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Two tickets on the same booking account
        let ticket1 = ticket::ActiveModel {
            passenger_name: Set("Ravi Sharma".to_string()),
            pnr: Set(Some("4521876390".to_string())),
            travel_type: Set(ticket::TravelType::Train),
            account: Set("irctc-main".to_string()),
            journey_date: Set(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()),
            fare: Set(Decimal::new(145000, 2)),   // 1450.00
            amount: Set(Decimal::new(155000, 2)), // 1550.00
            profit: Set(Decimal::new(10000, 2)),  // 100.00
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let ticket2 = ticket::ActiveModel {
            passenger_name: Set("Meena Iyer".to_string()),
            pnr: Set(None),
            travel_type: Set(ticket::TravelType::Flight),
            account: Set("irctc-main".to_string()),
            journey_date: Set(NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()),
            fare: Set(Decimal::new(520000, 2)),
            amount: Set(Decimal::new(545000, 2)),
            profit: Set(Decimal::new(25000, 2)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // A payment settling both tickets
        let payment1 = payment::ActiveModel {
            date: Set(NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()),
            amount: Set(Decimal::new(35000, 2)),
            period: Set(Some("April 2026".to_string())),
            account: Set("irctc-main".to_string()),
            is_partial: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for ticket_id in [ticket1.id, ticket2.id] {
            payment_ticket::ActiveModel {
                payment_id: Set(payment1.id),
                ticket_id: Set(ticket_id),
            }
            .insert(&db)
            .await?;
        }

        // A vehicle and its fuel log
        let vehicle1 = vehicle::ActiveModel {
            name: Set("Swift".to_string()),
            vehicle_type: Set(vehicle::VehicleType::Car),
            color: Set(Some("white".to_string())),
            model: Set(Some("2021".to_string())),
            capacity: Set(Some("1197cc".to_string())),
            plate: Set(Some("KA 05 MX 4242".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let refuel = fuel_entry::ActiveModel {
            date: Set(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
            vehicle_id: Set(vehicle1.id),
            entry_type: Set(fuel_entry::FuelEntryType::Refueling),
            odometer: Set(Some(42000)),
            liters: Set(Some(Decimal::new(32500, 3))), // 32.500 L
            price_per_liter: Set(Some(Decimal::new(102500, 3))),
            total: Set(None),
            notes: Set(None),
            missed_previous_refuel: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Flat, tenant and one month of rent
        let flat1 = flat::ActiveModel {
            name: Set("2BHK Koramangala".to_string()),
            address: Set(Some("4th Block, Bengaluru".to_string())),
            current_tenant_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let tenant1 = tenant::ActiveModel {
            flat_id: Set(flat1.id),
            name: Set("Arjun Rao".to_string()),
            phone: Set(Some("9812345670".to_string())),
            move_in_date: Set(Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap())),
            move_out_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let mut flat_active: flat::ActiveModel = flat1.clone().into();
        flat_active.current_tenant_id = Set(Some(tenant1.id));
        let flat1 = flat_active.update(&db).await?;

        rent_record::ActiveModel {
            flat_id: Set(flat1.id),
            tenant_id: Set(Some(tenant1.id)),
            month: Set("2026-02".to_string()),
            amount: Set(Decimal::new(2200000, 2)),
            paid_on: Set(Some(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap())),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        salary_record::ActiveModel {
            year: Set(2026),
            previous_salary: Set(Decimal::new(10000000, 2)),
            hike_percent: Set(Decimal::new(1000, 2)),
            revision_percent: Set(Decimal::new(500, 2)),
            bonus_percent: Set(None),
            final_salary: Set(Decimal::new(11550000, 2)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        note::ActiveModel {
            title: Set("Agent numbers".to_string()),
            content: Set("Redbus support: 1800-1234".to_string()),
            kind: Set(note::NoteKind::Text),
            color: Set(Some("#ffd54f".to_string())),
            label: Set(Some("contacts".to_string())),
            pinned: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user1.id);

        let tickets = Ticket::find()
            .filter(ticket::Column::Account.eq("irctc-main"))
            .all(&db)
            .await?;
        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|t| !t.refunded));

        let settled = payment1.find_related(PaymentTicket).all(&db).await?;
        assert_eq!(settled.len(), 2);
        assert!(settled.iter().any(|pt| pt.ticket_id == ticket1.id));
        assert!(settled.iter().any(|pt| pt.ticket_id == ticket2.id));

        let entries = FuelEntry::find()
            .filter(fuel_entry::Column::VehicleId.eq(vehicle1.id))
            .all(&db)
            .await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, refuel.id);
        assert!(entries[0].total.is_none());

        // Deleting the vehicle must leave the fuel log untouched: the
        // reference is a plain id, not a foreign key.
        vehicle1.delete(&db).await?;
        let orphaned = FuelEntry::find().all(&db).await?;
        assert_eq!(orphaned.len(), 1);

        let flats = Flat::find().all(&db).await?;
        assert_eq!(flats[0].current_tenant_id, Some(tenant1.id));

        assert_eq!(Customer::find().all(&db).await?.len(), 1);
        assert_eq!(customer1.name, "Ravi Sharma");
        assert_eq!(RentRecord::find().all(&db).await?.len(), 1);
        assert_eq!(SalaryRecord::find().all(&db).await?.len(), 1);
        assert_eq!(Note::find().all(&db).await?.len(), 1);
        assert_eq!(Tenant::find().all(&db).await?.len(), 1);

        Ok(())
    }
}
