//! SeaORM entity definitions for PostgreSQL database.

pub mod print_job;
pub mod printer_station;
pub mod station_session;
pub mod uploaded_file;
pub mod user;
pub mod user_settings;
