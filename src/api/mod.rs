//! HTTP API for the bunker catalog

pub mod handlers;
pub mod inventory_handlers;
pub mod reference_handlers;
pub mod routes;
pub mod ws_handlers;

pub use routes::create_router;
