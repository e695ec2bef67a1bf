pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod events;
pub mod seed;

pub use database::DbClient;
pub use flight_repo::PostgresFlightStore;
pub use events::EventProducer;
