//! The closed set of catalog entity kinds and the reference graph between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every entity kind held by the catalog.
///
/// Serialized with the variant name (`"StorageLocation"`, `"Weapon"`, …),
/// which is also the `resourceType` tag carried by change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    StorageLocation,
    AmmunitionType,
    FuelType,
    Weapon,
    AmmunitionStock,
    Food,
    Drink,
    Medication,
    Fuel,
    Battery,
    Generator,
}

/// A dependent entry in the reference graph: a leaf kind that may hold a
/// foreign key to the referenced kind, and the field that key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub kind: ResourceKind,
    pub fk_field: &'static str,
}

const fn dep(kind: ResourceKind, fk_field: &'static str) -> Dependent {
    Dependent { kind, fk_field }
}

/// Dependents of `StorageLocation`. The declared order is the order the
/// delete guard reports blocking kinds in.
const STORAGE_LOCATION_DEPENDENTS: [Dependent; 8] = [
    dep(ResourceKind::Weapon, "storageLocationId"),
    dep(ResourceKind::AmmunitionStock, "storageLocationId"),
    dep(ResourceKind::Food, "storageLocationId"),
    dep(ResourceKind::Drink, "storageLocationId"),
    dep(ResourceKind::Medication, "storageLocationId"),
    dep(ResourceKind::Fuel, "storageLocationId"),
    dep(ResourceKind::Battery, "storageLocationId"),
    dep(ResourceKind::Generator, "storageLocationId"),
];

const AMMUNITION_TYPE_DEPENDENTS: [Dependent; 2] = [
    dep(ResourceKind::Weapon, "ammunitionTypeId"),
    dep(ResourceKind::AmmunitionStock, "ammunitionTypeId"),
];

const FUEL_TYPE_DEPENDENTS: [Dependent; 2] = [
    dep(ResourceKind::Fuel, "fuelTypeId"),
    dep(ResourceKind::Generator, "fuelTypeId"),
];

impl ResourceKind {
    /// The leaf kinds that may cite this kind, in guard-report order.
    /// Empty for leaf kinds.
    pub const fn dependents(self) -> &'static [Dependent] {
        match self {
            Self::StorageLocation => &STORAGE_LOCATION_DEPENDENTS,
            Self::AmmunitionType => &AMMUNITION_TYPE_DEPENDENTS,
            Self::FuelType => &FUEL_TYPE_DEPENDENTS,
            _ => &[],
        }
    }

    /// True for the kinds other kinds may point to (and which therefore
    /// pass the delete guard before removal).
    pub const fn is_referenced(self) -> bool {
        !self.dependents().is_empty()
    }

    /// Human-readable label used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StorageLocation => "Storage location",
            Self::AmmunitionType => "Ammunition type",
            Self::FuelType => "Fuel type",
            Self::Weapon => "Weapon",
            Self::AmmunitionStock => "Ammunition stock",
            Self::Food => "Food item",
            Self::Drink => "Drink",
            Self::Medication => "Medication",
            Self::Fuel => "Fuel record",
            Self::Battery => "Battery",
            Self::Generator => "Generator",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::StorageLocation => "StorageLocation",
            Self::AmmunitionType => "AmmunitionType",
            Self::FuelType => "FuelType",
            Self::Weapon => "Weapon",
            Self::AmmunitionStock => "AmmunitionStock",
            Self::Food => "Food",
            Self::Drink => "Drink",
            Self::Medication => "Medication",
            Self::Fuel => "Fuel",
            Self::Battery => "Battery",
            Self::Generator => "Generator",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "StorageLocation" => Ok(Self::StorageLocation),
            "AmmunitionType" => Ok(Self::AmmunitionType),
            "FuelType" => Ok(Self::FuelType),
            "Weapon" => Ok(Self::Weapon),
            "AmmunitionStock" => Ok(Self::AmmunitionStock),
            "Food" => Ok(Self::Food),
            "Drink" => Ok(Self::Drink),
            "Medication" => Ok(Self::Medication),
            "Fuel" => Ok(Self::Fuel),
            "Battery" => Ok(Self::Battery),
            "Generator" => Ok(Self::Generator),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
