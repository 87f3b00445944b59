//! API endpoint modules.

pub mod auth;
pub mod files;
pub mod health;
pub mod openapi;
pub mod print_queue;
pub mod settings;
pub mod stations;
pub mod websocket;

pub use auth::configure_routes as configure_auth_routes;
pub use files::configure_routes as configure_file_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use print_queue::configure_routes as configure_print_queue_routes;
pub use settings::configure_routes as configure_settings_routes;
pub use stations::configure_routes as configure_station_routes;
pub use websocket::configure_routes as configure_websocket_routes;
