//! Handlers for the eight leaf kinds.
//!
//! Responses carry the display names of referenced records
//! (`storageLocationName`, `ammunitionTypeName`, `fuelTypeName`) the way
//! the catalog's consumers expect; the names are resolved at response time
//! and omitted if the parent has meanwhile vanished.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Months, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use super::handlers::{AppError, CatalogState, ServerState};
use crate::catalog::models::*;
use crate::catalog::RecordId;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn location_name(state: &ServerState, id: RecordId) -> Option<String> {
    state
        .catalog
        .get::<StorageLocation>(id)
        .await
        .ok()
        .map(|l| l.name)
}

async fn ammunition_type_name(state: &ServerState, id: RecordId) -> Option<String> {
    state
        .catalog
        .get::<AmmunitionType>(id)
        .await
        .ok()
        .map(|t| format!("{} {}", t.caliber, t.type_name))
}

async fn fuel_type_name(state: &ServerState, id: RecordId) -> Option<String> {
    state.catalog.get::<FuelType>(id).await.ok().map(|t| t.name)
}

// ============================================================================
// Weapons
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponResponse {
    #[serde(flatten)]
    pub record: Weapon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ammunition_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn weapon_response(state: &ServerState, record: Weapon) -> WeaponResponse {
    let ammunition_type_name = ammunition_type_name(state, record.ammunition_type_id).await;
    let storage_location_name = location_name(state, record.storage_location_id).await;
    WeaponResponse {
        record,
        ammunition_type_name,
        storage_location_name,
    }
}

async fn weapon_responses(state: &ServerState, records: Vec<Weapon>) -> Vec<WeaponResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(weapon_response(state, record).await);
    }
    out
}

pub async fn list_weapons(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<WeaponResponse>>, AppError> {
    let records = state.catalog.list::<Weapon>().await?;
    Ok(Json(weapon_responses(&state, records).await))
}

pub async fn get_weapon(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<WeaponResponse>, AppError> {
    let record = state.catalog.get::<Weapon>(id).await?;
    Ok(Json(weapon_response(&state, record).await))
}

pub async fn list_weapons_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<WeaponResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Weapon>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(weapon_responses(&state, records).await))
}

pub async fn create_weapon(
    State(state): State<CatalogState>,
    Json(payload): Json<WeaponRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(weapon_response(&state, created).await)))
}

pub async fn update_weapon(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<WeaponRequest>,
) -> Result<Json<WeaponResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(weapon_response(&state, updated).await))
}

pub async fn delete_weapon(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Weapon>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Ammunition stocks
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionStockResponse {
    #[serde(flatten)]
    pub record: AmmunitionStock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ammunition_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn stock_response(state: &ServerState, record: AmmunitionStock) -> AmmunitionStockResponse {
    let ammunition_type_name = ammunition_type_name(state, record.ammunition_type_id).await;
    let storage_location_name = location_name(state, record.storage_location_id).await;
    AmmunitionStockResponse {
        record,
        ammunition_type_name,
        storage_location_name,
    }
}

async fn stock_responses(
    state: &ServerState,
    records: Vec<AmmunitionStock>,
) -> Vec<AmmunitionStockResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(stock_response(state, record).await);
    }
    out
}

/// Total quantity of one ammunition type across all stocks.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionSummary {
    pub ammunition_type_id: RecordId,
    pub caliber: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub total_quantity: i64,
}

pub async fn list_ammunition_stocks(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<AmmunitionStockResponse>>, AppError> {
    let records = state.catalog.list::<AmmunitionStock>().await?;
    Ok(Json(stock_responses(&state, records).await))
}

pub async fn get_ammunition_stock(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<AmmunitionStockResponse>, AppError> {
    let record = state.catalog.get::<AmmunitionStock>(id).await?;
    Ok(Json(stock_response(&state, record).await))
}

pub async fn list_ammunition_stocks_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<AmmunitionStockResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<AmmunitionStock>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(stock_responses(&state, records).await))
}

pub async fn get_ammunition_total(
    State(state): State<CatalogState>,
    Path(type_id): Path<RecordId>,
) -> Result<Json<AmmunitionSummary>, AppError> {
    let ammo_type = state.catalog.get::<AmmunitionType>(type_id).await?;
    let stocks = state
        .catalog
        .find_by_field::<AmmunitionStock>("ammunitionTypeId", &json!(type_id))
        .await?;
    let total_quantity = stocks.iter().map(|s| i64::from(s.quantity)).sum();

    Ok(Json(AmmunitionSummary {
        ammunition_type_id: type_id,
        caliber: ammo_type.caliber,
        type_name: ammo_type.type_name,
        total_quantity,
    }))
}

pub async fn create_ammunition_stock(
    State(state): State<CatalogState>,
    Json(payload): Json<AmmunitionStockRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(stock_response(&state, created).await)))
}

pub async fn update_ammunition_stock(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<AmmunitionStockRequest>,
) -> Result<Json<AmmunitionStockResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(stock_response(&state, updated).await))
}

pub async fn delete_ammunition_stock(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<AmmunitionStock>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Food
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodResponse {
    #[serde(flatten)]
    pub record: Food,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn food_response(state: &ServerState, record: Food) -> FoodResponse {
    let storage_location_name = location_name(state, record.storage_location_id).await;
    FoodResponse {
        record,
        storage_location_name,
    }
}

async fn food_responses(state: &ServerState, records: Vec<Food>) -> Vec<FoodResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(food_response(state, record).await);
    }
    out
}

pub async fn list_food(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let records = state.catalog.list::<Food>().await?;
    Ok(Json(food_responses(&state, records).await))
}

pub async fn get_food(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<FoodResponse>, AppError> {
    let record = state.catalog.get::<Food>(id).await?;
    Ok(Json(food_response(&state, record).await))
}

pub async fn list_food_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Food>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(food_responses(&state, records).await))
}

pub async fn list_expired_food(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let now = today();
    let records: Vec<Food> = state
        .catalog
        .list::<Food>()
        .await?
        .into_iter()
        .filter(|f| f.is_expired(now))
        .collect();
    Ok(Json(food_responses(&state, records).await))
}

pub async fn list_food_expiring_soon(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let now = today();
    let horizon = now + Months::new(1);
    let records: Vec<Food> = state
        .catalog
        .list::<Food>()
        .await?
        .into_iter()
        .filter(|f| f.expires_within(now, horizon))
        .collect();
    Ok(Json(food_responses(&state, records).await))
}

pub async fn create_food(
    State(state): State<CatalogState>,
    Json(payload): Json<FoodRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(food_response(&state, created).await)))
}

pub async fn update_food(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<FoodRequest>,
) -> Result<Json<FoodResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(food_response(&state, updated).await))
}

pub async fn delete_food(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Food>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Drinks
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkResponse {
    #[serde(flatten)]
    pub record: Drink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn drink_response(state: &ServerState, record: Drink) -> DrinkResponse {
    let storage_location_name = location_name(state, record.storage_location_id).await;
    DrinkResponse {
        record,
        storage_location_name,
    }
}

async fn drink_responses(state: &ServerState, records: Vec<Drink>) -> Vec<DrinkResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(drink_response(state, record).await);
    }
    out
}

pub async fn list_drinks(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<DrinkResponse>>, AppError> {
    let records = state.catalog.list::<Drink>().await?;
    Ok(Json(drink_responses(&state, records).await))
}

pub async fn get_drink(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<DrinkResponse>, AppError> {
    let record = state.catalog.get::<Drink>(id).await?;
    Ok(Json(drink_response(&state, record).await))
}

pub async fn list_drinks_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<DrinkResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Drink>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(drink_responses(&state, records).await))
}

pub async fn list_expired_drinks(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<DrinkResponse>>, AppError> {
    let now = today();
    let records: Vec<Drink> = state
        .catalog
        .list::<Drink>()
        .await?
        .into_iter()
        .filter(|d| d.is_expired(now))
        .collect();
    Ok(Json(drink_responses(&state, records).await))
}

pub async fn list_drinks_expiring_soon(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<DrinkResponse>>, AppError> {
    let now = today();
    let horizon = now + Months::new(1);
    let records: Vec<Drink> = state
        .catalog
        .list::<Drink>()
        .await?
        .into_iter()
        .filter(|d| d.expires_within(now, horizon))
        .collect();
    Ok(Json(drink_responses(&state, records).await))
}

pub async fn create_drink(
    State(state): State<CatalogState>,
    Json(payload): Json<DrinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(drink_response(&state, created).await)))
}

pub async fn update_drink(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<DrinkRequest>,
) -> Result<Json<DrinkResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(drink_response(&state, updated).await))
}

pub async fn delete_drink(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Drink>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Medications
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationResponse {
    #[serde(flatten)]
    pub record: Medication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn medication_response(state: &ServerState, record: Medication) -> MedicationResponse {
    let storage_location_name = location_name(state, record.storage_location_id).await;
    MedicationResponse {
        record,
        storage_location_name,
    }
}

async fn medication_responses(
    state: &ServerState,
    records: Vec<Medication>,
) -> Vec<MedicationResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(medication_response(state, record).await);
    }
    out
}

pub async fn list_medications(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<MedicationResponse>>, AppError> {
    let records = state.catalog.list::<Medication>().await?;
    Ok(Json(medication_responses(&state, records).await))
}

pub async fn get_medication(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<MedicationResponse>, AppError> {
    let record = state.catalog.get::<Medication>(id).await?;
    Ok(Json(medication_response(&state, record).await))
}

pub async fn list_medications_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<MedicationResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Medication>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(medication_responses(&state, records).await))
}

pub async fn list_medications_by_purpose(
    State(state): State<CatalogState>,
    Path(purpose): Path<String>,
) -> Result<Json<Vec<MedicationResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Medication>("purpose", &json!(purpose))
        .await?;
    Ok(Json(medication_responses(&state, records).await))
}

pub async fn list_expired_medications(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<MedicationResponse>>, AppError> {
    let now = today();
    let records: Vec<Medication> = state
        .catalog
        .list::<Medication>()
        .await?
        .into_iter()
        .filter(|m| m.is_expired(now))
        .collect();
    Ok(Json(medication_responses(&state, records).await))
}

pub async fn list_medications_expiring_soon(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<MedicationResponse>>, AppError> {
    let now = today();
    let horizon = now + Months::new(1);
    let records: Vec<Medication> = state
        .catalog
        .list::<Medication>()
        .await?
        .into_iter()
        .filter(|m| m.expires_within(now, horizon))
        .collect();
    Ok(Json(medication_responses(&state, records).await))
}

pub async fn create_medication(
    State(state): State<CatalogState>,
    Json(payload): Json<MedicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((
        StatusCode::CREATED,
        Json(medication_response(&state, created).await),
    ))
}

pub async fn update_medication(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<MedicationRequest>,
) -> Result<Json<MedicationResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(medication_response(&state, updated).await))
}

pub async fn delete_medication(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Medication>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Fuel
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelResponse {
    #[serde(flatten)]
    pub record: Fuel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn fuel_response(state: &ServerState, record: Fuel) -> FuelResponse {
    let fuel_type_name = fuel_type_name(state, record.fuel_type_id).await;
    let storage_location_name = location_name(state, record.storage_location_id).await;
    FuelResponse {
        record,
        fuel_type_name,
        storage_location_name,
    }
}

async fn fuel_responses(state: &ServerState, records: Vec<Fuel>) -> Vec<FuelResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(fuel_response(state, record).await);
    }
    out
}

/// Total quantity of one fuel type across all fuel records.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelTotal {
    pub fuel_type: String,
    pub total_quantity: f64,
}

pub async fn list_fuel(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<FuelResponse>>, AppError> {
    let records = state.catalog.list::<Fuel>().await?;
    Ok(Json(fuel_responses(&state, records).await))
}

pub async fn get_fuel(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<FuelResponse>, AppError> {
    let record = state.catalog.get::<Fuel>(id).await?;
    Ok(Json(fuel_response(&state, record).await))
}

pub async fn list_fuel_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<FuelResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Fuel>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(fuel_responses(&state, records).await))
}

pub async fn list_fuel_by_type(
    State(state): State<CatalogState>,
    Path(type_id): Path<RecordId>,
) -> Result<Json<Vec<FuelResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Fuel>("fuelTypeId", &json!(type_id))
        .await?;
    Ok(Json(fuel_responses(&state, records).await))
}

pub async fn get_fuel_total_by_type(
    State(state): State<CatalogState>,
    Path(type_id): Path<RecordId>,
) -> Result<Json<FuelTotal>, AppError> {
    let fuel_type = state.catalog.get::<FuelType>(type_id).await?;
    let records = state
        .catalog
        .find_by_field::<Fuel>("fuelTypeId", &json!(type_id))
        .await?;
    let total_quantity = records.iter().map(|f| f.quantity).sum();

    Ok(Json(FuelTotal {
        fuel_type: fuel_type.name,
        total_quantity,
    }))
}

pub async fn create_fuel(
    State(state): State<CatalogState>,
    Json(payload): Json<FuelRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(fuel_response(&state, created).await)))
}

pub async fn update_fuel(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<FuelRequest>,
) -> Result<Json<FuelResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(fuel_response(&state, updated).await))
}

pub async fn delete_fuel(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Fuel>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Batteries
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryResponse {
    #[serde(flatten)]
    pub record: Battery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn battery_response(state: &ServerState, record: Battery) -> BatteryResponse {
    let storage_location_name = location_name(state, record.storage_location_id).await;
    BatteryResponse {
        record,
        storage_location_name,
    }
}

async fn battery_responses(state: &ServerState, records: Vec<Battery>) -> Vec<BatteryResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(battery_response(state, record).await);
    }
    out
}

/// Total quantity of one battery type.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryTotal {
    pub battery_type: String,
    pub total_quantity: i64,
}

pub async fn list_batteries(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<BatteryResponse>>, AppError> {
    let records = state.catalog.list::<Battery>().await?;
    Ok(Json(battery_responses(&state, records).await))
}

pub async fn get_battery(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<BatteryResponse>, AppError> {
    let record = state.catalog.get::<Battery>(id).await?;
    Ok(Json(battery_response(&state, record).await))
}

pub async fn list_batteries_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<BatteryResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Battery>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(battery_responses(&state, records).await))
}

pub async fn list_batteries_by_type(
    State(state): State<CatalogState>,
    Path(battery_type): Path<String>,
) -> Result<Json<Vec<BatteryResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Battery>("type", &json!(battery_type))
        .await?;
    Ok(Json(battery_responses(&state, records).await))
}

pub async fn get_battery_total_by_type(
    State(state): State<CatalogState>,
    Path(battery_type): Path<String>,
) -> Result<Json<BatteryTotal>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Battery>("type", &json!(battery_type))
        .await?;
    let total_quantity = records.iter().map(|b| i64::from(b.quantity)).sum();

    Ok(Json(BatteryTotal {
        battery_type,
        total_quantity,
    }))
}

pub async fn create_battery(
    State(state): State<CatalogState>,
    Json(payload): Json<BatteryRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((
        StatusCode::CREATED,
        Json(battery_response(&state, created).await),
    ))
}

pub async fn update_battery(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<BatteryRequest>,
) -> Result<Json<BatteryResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(battery_response(&state, updated).await))
}

pub async fn delete_battery(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Battery>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Generators
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorResponse {
    #[serde(flatten)]
    pub record: Generator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location_name: Option<String>,
}

async fn generator_response(state: &ServerState, record: Generator) -> GeneratorResponse {
    let fuel_type_name = fuel_type_name(state, record.fuel_type_id).await;
    let storage_location_name = location_name(state, record.storage_location_id).await;
    GeneratorResponse {
        record,
        fuel_type_name,
        storage_location_name,
    }
}

async fn generator_responses(
    state: &ServerState,
    records: Vec<Generator>,
) -> Vec<GeneratorResponse> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(generator_response(state, record).await);
    }
    out
}

pub async fn list_generators(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<GeneratorResponse>>, AppError> {
    let records = state.catalog.list::<Generator>().await?;
    Ok(Json(generator_responses(&state, records).await))
}

pub async fn get_generator(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<Json<GeneratorResponse>, AppError> {
    let record = state.catalog.get::<Generator>(id).await?;
    Ok(Json(generator_response(&state, record).await))
}

pub async fn list_generators_by_location(
    State(state): State<CatalogState>,
    Path(location_id): Path<RecordId>,
) -> Result<Json<Vec<GeneratorResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Generator>("storageLocationId", &json!(location_id))
        .await?;
    Ok(Json(generator_responses(&state, records).await))
}

pub async fn list_generators_by_fuel_type(
    State(state): State<CatalogState>,
    Path(fuel_type_id): Path<RecordId>,
) -> Result<Json<Vec<GeneratorResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Generator>("fuelTypeId", &json!(fuel_type_id))
        .await?;
    Ok(Json(generator_responses(&state, records).await))
}

pub async fn list_generators_by_status(
    State(state): State<CatalogState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<GeneratorResponse>>, AppError> {
    let records = state
        .catalog
        .find_by_field::<Generator>("status", &json!(status))
        .await?;
    Ok(Json(generator_responses(&state, records).await))
}

pub async fn create_generator(
    State(state): State<CatalogState>,
    Json(payload): Json<GeneratorRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog.create(payload.into_record()).await?;
    Ok((
        StatusCode::CREATED,
        Json(generator_response(&state, created).await),
    ))
}

pub async fn update_generator(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<GeneratorRequest>,
) -> Result<Json<GeneratorResponse>, AppError> {
    payload.validate()?;
    let updated = state.catalog.update(id, payload.into_record()).await?;
    Ok(Json(generator_response(&state, updated).await))
}

pub async fn delete_generator(
    State(state): State<CatalogState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete::<Generator>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
