use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

// The business collections mirror a document store: every reference
// between them (vehicle ids on fuel entries, ticket ids on payment rows,
// tenant pointers on flats) is a plain column with no foreign key, so no
// delete ever cascades across collections.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string(Customers::Name))
                    .col(string_null(Customers::Phone))
                    .col(timestamp_with_time_zone(Customers::CreatedAt))
                    .col(timestamp_with_time_zone(Customers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create tickets table
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(pk_auto(Tickets::Id))
                    .col(string(Tickets::PassengerName))
                    .col(string_null(Tickets::Pnr))
                    .col(string(Tickets::TravelType))
                    .col(string(Tickets::Account))
                    .col(date(Tickets::JourneyDate))
                    .col(decimal_len(Tickets::Fare, 16, 4))
                    .col(decimal_len(Tickets::Amount, 16, 4))
                    .col(decimal_len(Tickets::Profit, 16, 4))
                    .col(boolean(Tickets::Paid).default(false))
                    .col(boolean(Tickets::Refunded).default(false))
                    .col(date_null(Tickets::RefundDate))
                    .col(decimal_len_null(Tickets::RefundAmount, 16, 4))
                    .col(decimal_len_null(Tickets::CancellationCharge, 16, 4))
                    .col(timestamp_with_time_zone(Tickets::CreatedAt))
                    .col(timestamp_with_time_zone(Tickets::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(date(Payments::Date))
                    .col(decimal_len(Payments::Amount, 16, 4))
                    .col(string_null(Payments::Period))
                    .col(string(Payments::Account))
                    .col(boolean(Payments::IsPartial).default(false))
                    .col(timestamp_with_time_zone(Payments::CreatedAt))
                    .col(timestamp_with_time_zone(Payments::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create payment_tickets table (join table, unenforced ticket side)
        manager
            .create_table(
                Table::create()
                    .table(PaymentTickets::Table)
                    .if_not_exists()
                    .col(integer(PaymentTickets::PaymentId))
                    .col(integer(PaymentTickets::TicketId))
                    .primary_key(
                        Index::create()
                            .name("pk_payment_tickets")
                            .col(PaymentTickets::PaymentId)
                            .col(PaymentTickets::TicketId),
                    )
                    .to_owned(),
            )
            .await?;

        // Create vehicles table
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(pk_auto(Vehicles::Id))
                    .col(string(Vehicles::Name))
                    .col(string(Vehicles::VehicleType))
                    .col(string_null(Vehicles::Color))
                    .col(string_null(Vehicles::Model))
                    .col(string_null(Vehicles::Capacity))
                    .col(string_null(Vehicles::Plate))
                    .col(timestamp_with_time_zone(Vehicles::CreatedAt))
                    .col(timestamp_with_time_zone(Vehicles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create fuel_entries table
        manager
            .create_table(
                Table::create()
                    .table(FuelEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(FuelEntries::Id))
                    .col(date(FuelEntries::Date))
                    .col(integer(FuelEntries::VehicleId))
                    .col(string(FuelEntries::EntryType))
                    .col(integer_null(FuelEntries::Odometer))
                    .col(decimal_len_null(FuelEntries::Liters, 10, 3))
                    .col(decimal_len_null(FuelEntries::PricePerLiter, 10, 3))
                    .col(decimal_len_null(FuelEntries::Total, 16, 4))
                    .col(string_null(FuelEntries::Notes))
                    .col(boolean(FuelEntries::MissedPreviousRefuel).default(false))
                    .col(timestamp_with_time_zone(FuelEntries::CreatedAt))
                    .col(timestamp_with_time_zone(FuelEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create flats table
        manager
            .create_table(
                Table::create()
                    .table(Flats::Table)
                    .if_not_exists()
                    .col(pk_auto(Flats::Id))
                    .col(string(Flats::Name))
                    .col(string_null(Flats::Address))
                    .col(integer_null(Flats::CurrentTenantId))
                    .col(timestamp_with_time_zone(Flats::CreatedAt))
                    .col(timestamp_with_time_zone(Flats::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create tenants table
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(pk_auto(Tenants::Id))
                    .col(integer(Tenants::FlatId))
                    .col(string(Tenants::Name))
                    .col(string_null(Tenants::Phone))
                    .col(date_null(Tenants::MoveInDate))
                    .col(date_null(Tenants::MoveOutDate))
                    .col(timestamp_with_time_zone(Tenants::CreatedAt))
                    .col(timestamp_with_time_zone(Tenants::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create rent_records table
        manager
            .create_table(
                Table::create()
                    .table(RentRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(RentRecords::Id))
                    .col(integer(RentRecords::FlatId))
                    .col(integer_null(RentRecords::TenantId))
                    .col(string(RentRecords::Month))
                    .col(decimal_len(RentRecords::Amount, 16, 4))
                    .col(date_null(RentRecords::PaidOn))
                    .col(string_null(RentRecords::Notes))
                    .col(timestamp_with_time_zone(RentRecords::CreatedAt))
                    .col(timestamp_with_time_zone(RentRecords::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create salary_records table
        manager
            .create_table(
                Table::create()
                    .table(SalaryRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(SalaryRecords::Id))
                    .col(integer(SalaryRecords::Year).unique_key())
                    .col(decimal_len(SalaryRecords::PreviousSalary, 16, 4))
                    .col(decimal_len(SalaryRecords::HikePercent, 8, 4))
                    .col(decimal_len(SalaryRecords::RevisionPercent, 8, 4))
                    .col(decimal_len_null(SalaryRecords::BonusPercent, 8, 4))
                    .col(decimal_len(SalaryRecords::FinalSalary, 16, 4))
                    .col(timestamp_with_time_zone(SalaryRecords::CreatedAt))
                    .col(timestamp_with_time_zone(SalaryRecords::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create notes table
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(pk_auto(Notes::Id))
                    .col(string(Notes::Title))
                    .col(text(Notes::Content))
                    .col(string(Notes::Kind))
                    .col(string_null(Notes::Color))
                    .col(string_null(Notes::Label))
                    .col(boolean(Notes::Pinned).default(false))
                    .col(timestamp_with_time_zone(Notes::CreatedAt))
                    .col(timestamp_with_time_zone(Notes::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalaryRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Flats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Phone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    PassengerName,
    Pnr,
    TravelType,
    Account,
    JourneyDate,
    Fare,
    Amount,
    Profit,
    Paid,
    Refunded,
    RefundDate,
    RefundAmount,
    CancellationCharge,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    Date,
    Amount,
    Period,
    Account,
    IsPartial,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentTickets {
    Table,
    PaymentId,
    TicketId,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Name,
    VehicleType,
    Color,
    Model,
    Capacity,
    Plate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FuelEntries {
    Table,
    Id,
    Date,
    VehicleId,
    EntryType,
    Odometer,
    Liters,
    PricePerLiter,
    Total,
    Notes,
    MissedPreviousRefuel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Flats {
    Table,
    Id,
    Name,
    Address,
    CurrentTenantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    FlatId,
    Name,
    Phone,
    MoveInDate,
    MoveOutDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RentRecords {
    Table,
    Id,
    FlatId,
    TenantId,
    Month,
    Amount,
    PaidOn,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SalaryRecords {
    Table,
    Id,
    Year,
    PreviousSalary,
    HikePercent,
    RevisionPercent,
    BonusPercent,
    FinalSalary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    Id,
    Title,
    Content,
    Kind,
    Color,
    Label,
    Pinned,
    CreatedAt,
    UpdatedAt,
}
