//! Handlers for the referenced-only kinds: storage locations, ammunition
//! types, fuel types. Deletes of these pass the reference-integrity guard
//! inside the catalog service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::handlers::{AppError, CatalogState};
use crate::catalog::models::{
    AmmunitionType, AmmunitionTypeRequest, FuelType, FuelTypeRequest, StorageLocation,
    StorageLocationRequest, Validate,
};
use crate::catalog::RecordId;

// ============================================================================
// Storage locations
// ============================================================================

pub async fn list_storage_locations(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<StorageLocation>>, AppError> {
    Ok(Json(state.catalog.list::<StorageLocation>().await?))
}

pub async fn get_storage_location(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<StorageLocation>, AppError> {
    Ok(Json(state.catalog.get::<StorageLocation>(id).await?))
}

pub async fn create_storage_location(
    State(state): State<CatalogState>,
    Json(payload): Json<StorageLocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_storage_location(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<StorageLocationRequest>,
) -> Result<Json<StorageLocation>, AppError> {
    payload.validate()?;
    Ok(Json(state.catalog.update(id, payload.into_record()).await?))
}

pub async fn delete_storage_location(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<StorageLocation>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Ammunition types
// ============================================================================

pub async fn list_ammunition_types(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<AmmunitionType>>, AppError> {
    Ok(Json(state.catalog.list::<AmmunitionType>().await?))
}

pub async fn get_ammunition_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<AmmunitionType>, AppError> {
    Ok(Json(state.catalog.get::<AmmunitionType>(id).await?))
}

pub async fn create_ammunition_type(
    State(state): State<CatalogState>,
    Json(payload): Json<AmmunitionTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_ammunition_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<AmmunitionTypeRequest>,
) -> Result<Json<AmmunitionType>, AppError> {
    payload.validate()?;
    Ok(Json(state.catalog.update(id, payload.into_record()).await?))
}

pub async fn delete_ammunition_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<AmmunitionType>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Fuel types
// ============================================================================

pub async fn list_fuel_types(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<FuelType>>, AppError> {
    Ok(Json(state.catalog.list::<FuelType>().await?))
}

pub async fn get_fuel_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<FuelType>, AppError> {
    Ok(Json(state.catalog.get::<FuelType>(id).await?))
}

pub async fn create_fuel_type(
    State(state): State<CatalogState>,
    Json(payload): Json<FuelTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_fuel_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<FuelTypeRequest>,
) -> Result<Json<FuelType>, AppError> {
    payload.validate()?;
    Ok(Json(state.catalog.update(id, payload.into_record()).await?))
}

pub async fn delete_fuel_type(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<FuelType>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
