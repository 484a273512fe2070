pub mod customers;
pub mod flats;
pub mod fuel;
pub mod health;
pub mod notes;
pub mod payments;
pub mod rent_records;
pub mod salaries;
pub mod tenants;
pub mod tickets;
pub mod users;
pub mod vehicles;
