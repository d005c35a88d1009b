//! API route definitions

use super::handlers::{self, CatalogState};
use super::inventory_handlers as inventory;
use super::reference_handlers as reference;
use super::ws_handlers;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: CatalogState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Live change notifications
        .route("/ws/updates", get(ws_handlers::ws_updates))
        // ====================================================================
        // Referenced-only kinds
        // ====================================================================
        .route(
            "/api/storage-locations",
            get(reference::list_storage_locations).post(reference::create_storage_location),
        )
        .route(
            "/api/storage-locations/{id}",
            get(reference::get_storage_location)
                .put(reference::update_storage_location)
                .delete(reference::delete_storage_location),
        )
        .route(
            "/api/ammunition-types",
            get(reference::list_ammunition_types).post(reference::create_ammunition_type),
        )
        .route(
            "/api/ammunition-types/{id}",
            get(reference::get_ammunition_type)
                .put(reference::update_ammunition_type)
                .delete(reference::delete_ammunition_type),
        )
        .route(
            "/api/fuel-types",
            get(reference::list_fuel_types).post(reference::create_fuel_type),
        )
        .route(
            "/api/fuel-types/{id}",
            get(reference::get_fuel_type)
                .put(reference::update_fuel_type)
                .delete(reference::delete_fuel_type),
        )
        // ====================================================================
        // Weapons
        // ====================================================================
        .route(
            "/api/weapons",
            get(inventory::list_weapons).post(inventory::create_weapon),
        )
        .route(
            "/api/weapons/{id}",
            get(inventory::get_weapon)
                .put(inventory::update_weapon)
                .delete(inventory::delete_weapon),
        )
        .route(
            "/api/weapons/by-location/{locationId}",
            get(inventory::list_weapons_by_location),
        )
        // ====================================================================
        // Ammunition stocks
        // ====================================================================
        .route(
            "/api/ammunition-stocks",
            get(inventory::list_ammunition_stocks).post(inventory::create_ammunition_stock),
        )
        .route(
            "/api/ammunition-stocks/{id}",
            get(inventory::get_ammunition_stock)
                .put(inventory::update_ammunition_stock)
                .delete(inventory::delete_ammunition_stock),
        )
        .route(
            "/api/ammunition-stocks/by-location/{locationId}",
            get(inventory::list_ammunition_stocks_by_location),
        )
        .route(
            "/api/ammunition-stocks/total/{typeId}",
            get(inventory::get_ammunition_total),
        )
        // ====================================================================
        // Food
        // ====================================================================
        .route(
            "/api/food",
            get(inventory::list_food).post(inventory::create_food),
        )
        .route("/api/food/expired", get(inventory::list_expired_food))
        .route(
            "/api/food/expiring-soon",
            get(inventory::list_food_expiring_soon),
        )
        .route(
            "/api/food/by-location/{locationId}",
            get(inventory::list_food_by_location),
        )
        .route(
            "/api/food/{id}",
            get(inventory::get_food)
                .put(inventory::update_food)
                .delete(inventory::delete_food),
        )
        // ====================================================================
        // Drinks
        // ====================================================================
        .route(
            "/api/drinks",
            get(inventory::list_drinks).post(inventory::create_drink),
        )
        .route("/api/drinks/expired", get(inventory::list_expired_drinks))
        .route(
            "/api/drinks/expiring-soon",
            get(inventory::list_drinks_expiring_soon),
        )
        .route(
            "/api/drinks/by-location/{locationId}",
            get(inventory::list_drinks_by_location),
        )
        .route(
            "/api/drinks/{id}",
            get(inventory::get_drink)
                .put(inventory::update_drink)
                .delete(inventory::delete_drink),
        )
        // ====================================================================
        // Medications
        // ====================================================================
        .route(
            "/api/medications",
            get(inventory::list_medications).post(inventory::create_medication),
        )
        .route(
            "/api/medications/expired",
            get(inventory::list_expired_medications),
        )
        .route(
            "/api/medications/expiring-soon",
            get(inventory::list_medications_expiring_soon),
        )
        .route(
            "/api/medications/by-location/{locationId}",
            get(inventory::list_medications_by_location),
        )
        .route(
            "/api/medications/by-purpose/{purpose}",
            get(inventory::list_medications_by_purpose),
        )
        .route(
            "/api/medications/{id}",
            get(inventory::get_medication)
                .put(inventory::update_medication)
                .delete(inventory::delete_medication),
        )
        // ====================================================================
        // Fuel
        // ====================================================================
        .route(
            "/api/fuel",
            get(inventory::list_fuel).post(inventory::create_fuel),
        )
        .route(
            "/api/fuel/by-location/{locationId}",
            get(inventory::list_fuel_by_location),
        )
        .route(
            "/api/fuel/by-type/{typeId}",
            get(inventory::list_fuel_by_type),
        )
        .route(
            "/api/fuel/total-by-type/{typeId}",
            get(inventory::get_fuel_total_by_type),
        )
        .route(
            "/api/fuel/{id}",
            get(inventory::get_fuel)
                .put(inventory::update_fuel)
                .delete(inventory::delete_fuel),
        )
        // ====================================================================
        // Batteries
        // ====================================================================
        .route(
            "/api/batteries",
            get(inventory::list_batteries).post(inventory::create_battery),
        )
        .route(
            "/api/batteries/by-location/{locationId}",
            get(inventory::list_batteries_by_location),
        )
        .route(
            "/api/batteries/by-type/{type}",
            get(inventory::list_batteries_by_type),
        )
        .route(
            "/api/batteries/total-by-type/{type}",
            get(inventory::get_battery_total_by_type),
        )
        .route(
            "/api/batteries/{id}",
            get(inventory::get_battery)
                .put(inventory::update_battery)
                .delete(inventory::delete_battery),
        )
        // ====================================================================
        // Generators
        // ====================================================================
        .route(
            "/api/generators",
            get(inventory::list_generators).post(inventory::create_generator),
        )
        .route(
            "/api/generators/by-location/{locationId}",
            get(inventory::list_generators_by_location),
        )
        .route(
            "/api/generators/by-fuel-type/{fuelTypeId}",
            get(inventory::list_generators_by_fuel_type),
        )
        .route(
            "/api/generators/by-status/{status}",
            get(inventory::list_generators_by_status),
        )
        .route(
            "/api/generators/{id}",
            get(inventory::get_generator)
                .put(inventory::update_generator)
                .delete(inventory::delete_generator),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
