//! Catalog records and the request payloads the HTTP layer decodes into.
//!
//! Records serialize in their wire form (camelCase, original field names);
//! the same form is what crosses the [`CatalogStore`] seam, so the
//! reference-graph `fk_field` names in [`super::kinds`] match these structs.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::kinds::ResourceKind;
use super::store::RecordId;

/// One foreign key held by a leaf record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub kind: ResourceKind,
    pub id: RecordId,
}

/// Entity-kind metadata the generic resource operations are parameterized
/// over: which kind a record is, its identity, the foreign keys it holds,
/// and the human summary used in change events.
pub trait CatalogRecord:
    Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const KIND: ResourceKind;

    fn id(&self) -> Option<RecordId>;
    fn assign_id(&mut self, id: RecordId);

    /// Foreign keys to resolve before any create/update commits.
    /// Empty for the referenced-only kinds.
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        Vec::new()
    }

    /// Human-identifying text for change events. Cosmetic only.
    fn summary(&self) -> String;
}

/// Records carrying an expiration date.
pub trait Perishable {
    fn expiration_date(&self) -> NaiveDate;

    fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date() < today
    }

    /// Strictly between `today` and `horizon` (both exclusive).
    fn expires_within(&self, today: NaiveDate, horizon: NaiveDate) -> bool {
        let date = self.expiration_date();
        date > today && date < horizon
    }
}

// ============================================================================
// Referenced-only kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogRecord for StorageLocation {
    const KIND: ResourceKind = ResourceKind::StorageLocation;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn summary(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub caliber: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl CatalogRecord for AmmunitionType {
    const KIND: ResourceKind = ResourceKind::AmmunitionType;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn summary(&self) -> String {
        format!("{} {}", self.caliber, self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
}

impl CatalogRecord for FuelType {
    const KIND: ResourceKind = ResourceKind::FuelType;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn summary(&self) -> String {
        self.name.clone()
    }
}

// ============================================================================
// Leaf kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub weapon_type: String,
    pub model: String,
    pub quantity: i32,
    pub ammunition_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Weapon {
    const KIND: ResourceKind = ResourceKind::Weapon;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                kind: ResourceKind::AmmunitionType,
                id: self.ammunition_type_id,
            },
            ForeignKey {
                kind: ResourceKind::StorageLocation,
                id: self.storage_location_id,
            },
        ]
    }

    fn summary(&self) -> String {
        format!("{} {}", self.weapon_type, self.model)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionStock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub quantity: i32,
    pub ammunition_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for AmmunitionStock {
    const KIND: ResourceKind = ResourceKind::AmmunitionStock;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                kind: ResourceKind::AmmunitionType,
                id: self.ammunition_type_id,
            },
            ForeignKey {
                kind: ResourceKind::StorageLocation,
                id: self.storage_location_id,
            },
        ]
    }

    fn summary(&self) -> String {
        format!(
            "ammunition type #{} (Qty: {})",
            self.ammunition_type_id, self.quantity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub food_type: String,
    pub quantity: f64,
    pub expiration_date: NaiveDate,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Food {
    const KIND: ResourceKind = ResourceKind::Food;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey {
            kind: ResourceKind::StorageLocation,
            id: self.storage_location_id,
        }]
    }

    fn summary(&self) -> String {
        self.food_type.clone()
    }
}

impl Perishable for Food {
    fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub drink_type: String,
    pub quantity: f64,
    pub expiration_date: NaiveDate,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Drink {
    const KIND: ResourceKind = ResourceKind::Drink;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey {
            kind: ResourceKind::StorageLocation,
            id: self.storage_location_id,
        }]
    }

    fn summary(&self) -> String {
        self.drink_type.clone()
    }
}

impl Perishable for Drink {
    fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub quantity: i32,
    pub expiration_date: NaiveDate,
    pub purpose: String,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Medication {
    const KIND: ResourceKind = ResourceKind::Medication;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey {
            kind: ResourceKind::StorageLocation,
            id: self.storage_location_id,
        }]
    }

    fn summary(&self) -> String {
        self.name.clone()
    }
}

impl Perishable for Medication {
    fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fuel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub quantity: f64,
    pub fuel_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Fuel {
    const KIND: ResourceKind = ResourceKind::Fuel;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                kind: ResourceKind::FuelType,
                id: self.fuel_type_id,
            },
            ForeignKey {
                kind: ResourceKind::StorageLocation,
                id: self.storage_location_id,
            },
        ]
    }

    fn summary(&self) -> String {
        format!("fuel type #{} (Qty: {})", self.fuel_type_id, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub battery_type: String,
    pub capacity: f64,
    pub quantity: i32,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Battery {
    const KIND: ResourceKind = ResourceKind::Battery;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey {
            kind: ResourceKind::StorageLocation,
            id: self.storage_location_id,
        }]
    }

    fn summary(&self) -> String {
        format!(
            "{} {}Ah (Qty: {})",
            self.battery_type, self.capacity, self.quantity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub generator_type: String,
    pub power: f64,
    pub status: String,
    pub fuel_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl CatalogRecord for Generator {
    const KIND: ResourceKind = ResourceKind::Generator;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                kind: ResourceKind::FuelType,
                id: self.fuel_type_id,
            },
            ForeignKey {
                kind: ResourceKind::StorageLocation,
                id: self.storage_location_id,
            },
        ]
    }

    fn summary(&self) -> String {
        format!(
            "{} {}kW ({})",
            self.generator_type, self.power, self.status
        )
    }
}

// ============================================================================
// Request payloads + field validation
// ============================================================================

/// Field-validation failure. Collects every violation, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub Vec<String>);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Presence/format validation run by the request layer before any store
/// access. Foreign-key *resolution* is the ops layer's job.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn check_blank(errors: &mut Vec<String>, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(message.to_string());
    }
}

fn check_future(errors: &mut Vec<String>, date: NaiveDate, message: &str) {
    if date <= chrono::Utc::now().date_naive() {
        errors.push(message.to_string());
    }
}

fn finish(errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocationRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl StorageLocationRequest {
    pub fn into_record(self) -> StorageLocation {
        StorageLocation {
            id: None,
            name: self.name,
            description: self.description,
        }
    }
}

impl Validate for StorageLocationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.name, "Name cannot be blank");
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionTypeRequest {
    pub caliber: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl AmmunitionTypeRequest {
    pub fn into_record(self) -> AmmunitionType {
        AmmunitionType {
            id: None,
            caliber: self.caliber,
            type_name: self.type_name,
        }
    }
}

impl Validate for AmmunitionTypeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.caliber, "Caliber cannot be blank");
        check_blank(&mut errors, &self.type_name, "Type cannot be blank");
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelTypeRequest {
    pub name: String,
}

impl FuelTypeRequest {
    pub fn into_record(self) -> FuelType {
        FuelType {
            id: None,
            name: self.name,
        }
    }
}

impl Validate for FuelTypeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.name, "Fuel type name cannot be blank");
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRequest {
    #[serde(rename = "type")]
    pub weapon_type: String,
    pub model: String,
    pub quantity: i32,
    pub ammunition_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl WeaponRequest {
    pub fn into_record(self) -> Weapon {
        Weapon {
            id: None,
            weapon_type: self.weapon_type,
            model: self.model,
            quantity: self.quantity,
            ammunition_type_id: self.ammunition_type_id,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for WeaponRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.weapon_type, "Weapon type cannot be blank");
        check_blank(&mut errors, &self.model, "Weapon model cannot be blank");
        if self.quantity < 1 {
            errors.push("Quantity must be at least 1".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionStockRequest {
    pub quantity: i32,
    pub ammunition_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl AmmunitionStockRequest {
    pub fn into_record(self) -> AmmunitionStock {
        AmmunitionStock {
            id: None,
            quantity: self.quantity,
            ammunition_type_id: self.ammunition_type_id,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for AmmunitionStockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.quantity < 1 {
            errors.push("Quantity must be at least 1".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    #[serde(rename = "type")]
    pub food_type: String,
    pub quantity: f64,
    pub expiration_date: NaiveDate,
    pub storage_location_id: RecordId,
}

impl FoodRequest {
    pub fn into_record(self) -> Food {
        Food {
            id: None,
            food_type: self.food_type,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for FoodRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.food_type, "Food type cannot be blank");
        if self.quantity < 0.0 {
            errors.push("Quantity cannot be negative".to_string());
        }
        check_future(
            &mut errors,
            self.expiration_date,
            "Expiration date must be in the future",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkRequest {
    #[serde(rename = "type")]
    pub drink_type: String,
    pub quantity: f64,
    pub expiration_date: NaiveDate,
    pub storage_location_id: RecordId,
}

impl DrinkRequest {
    pub fn into_record(self) -> Drink {
        Drink {
            id: None,
            drink_type: self.drink_type,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for DrinkRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.drink_type, "Drink type cannot be blank");
        if self.quantity < 0.0 {
            errors.push("Quantity cannot be negative".to_string());
        }
        check_future(
            &mut errors,
            self.expiration_date,
            "Expiration date must be in the future",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: NaiveDate,
    pub purpose: String,
    pub storage_location_id: RecordId,
}

impl MedicationRequest {
    pub fn into_record(self) -> Medication {
        Medication {
            id: None,
            name: self.name,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
            purpose: self.purpose,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for MedicationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.name, "Medication name cannot be blank");
        if self.quantity < 1 {
            errors.push("Quantity must be at least 1".to_string());
        }
        check_future(
            &mut errors,
            self.expiration_date,
            "Expiration date must be in the future",
        );
        check_blank(&mut errors, &self.purpose, "Purpose cannot be blank");
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRequest {
    pub quantity: f64,
    pub fuel_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl FuelRequest {
    pub fn into_record(self) -> Fuel {
        Fuel {
            id: None,
            quantity: self.quantity,
            fuel_type_id: self.fuel_type_id,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for FuelRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.quantity < 0.0 {
            errors.push("Quantity cannot be negative".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryRequest {
    #[serde(rename = "type")]
    pub battery_type: String,
    pub capacity: f64,
    pub quantity: i32,
    pub storage_location_id: RecordId,
}

impl BatteryRequest {
    pub fn into_record(self) -> Battery {
        Battery {
            id: None,
            battery_type: self.battery_type,
            capacity: self.capacity,
            quantity: self.quantity,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for BatteryRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(&mut errors, &self.battery_type, "Battery type cannot be blank");
        if self.capacity < 0.0 {
            errors.push("Capacity cannot be negative".to_string());
        }
        if self.quantity < 1 {
            errors.push("Quantity must be at least 1".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorRequest {
    #[serde(rename = "type")]
    pub generator_type: String,
    pub power: f64,
    pub status: String,
    pub fuel_type_id: RecordId,
    pub storage_location_id: RecordId,
}

impl GeneratorRequest {
    pub fn into_record(self) -> Generator {
        Generator {
            id: None,
            generator_type: self.generator_type,
            power: self.power,
            status: self.status,
            fuel_type_id: self.fuel_type_id,
            storage_location_id: self.storage_location_id,
        }
    }
}

impl Validate for GeneratorRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_blank(
            &mut errors,
            &self.generator_type,
            "Generator type cannot be blank",
        );
        if self.power < 0.0 {
            errors.push("Power cannot be negative".to_string());
        }
        check_blank(&mut errors, &self.status, "Status cannot be blank");
        finish(errors)
    }
}
