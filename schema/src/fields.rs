//! The field catalog shared by training and serving.
//!
//! Every building field has an internal name and a wire name. They only
//! differ for `PropertyGFABuildings`, which travels as `PropertyGFABuilding(s)`
//! in both the CSV header and the JSON payload.

use std::fmt;

/// The column holding the training target.
pub const TARGET: &str = "SiteEnergyUse(kBtu)";

/// How a field is represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
    Text,
}

impl FieldKind {
    /// What a caller should have sent, used in violation messages.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Float => "a number",
            FieldKind::Int => "an integer",
            FieldKind::Text => "a string",
        }
    }
}

/// How the preprocessing stage treats a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Numeric,
    Categorical,
}

/// A range constraint on a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Any,
    Gt(f64),
    Ge(f64),
    Between(f64, f64),
}

impl Constraint {
    /// Returns whether `v` satisfies the constraint.
    pub fn check(&self, v: f64) -> bool {
        match *self {
            Constraint::Any => v.is_finite(),
            Constraint::Gt(min) => v > min,
            Constraint::Ge(min) => v >= min,
            Constraint::Between(min, max) => v >= min && v <= max,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "finite"),
            Constraint::Gt(min) => write!(f, "greater than {min}"),
            Constraint::Ge(min) => write!(f, "greater than or equal to {min}"),
            Constraint::Between(min, max) => write!(f, "between {min} and {max}"),
        }
    }
}

/// A single entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub wire: &'static str,
    pub kind: FieldKind,
    pub role: Role,
    pub constraint: Constraint,
}

impl FieldDef {
    const fn new(name: &'static str, kind: FieldKind, role: Role, constraint: Constraint) -> Self {
        Self {
            name,
            wire: name,
            kind,
            role,
            constraint,
        }
    }

    const fn aliased(self, wire: &'static str) -> Self {
        Self { wire, ..self }
    }
}

use Constraint::{Any, Between, Ge, Gt};
use FieldKind::{Float, Int, Text};
use Role::{Categorical, Numeric};

pub const PROPERTY_GFA_TOTAL: FieldDef = FieldDef::new("PropertyGFATotal", Float, Numeric, Gt(0.0));
pub const PROPERTY_GFA_BUILDINGS: FieldDef =
    FieldDef::new("PropertyGFABuildings", Float, Numeric, Gt(0.0))
        .aliased("PropertyGFABuilding(s)");
pub const PROPERTY_GFA_PARKING: FieldDef =
    FieldDef::new("PropertyGFAParking", Float, Numeric, Ge(0.0));
pub const NUMBER_OF_BUILDINGS: FieldDef =
    FieldDef::new("NumberofBuildings", Int, Numeric, Ge(1.0));
pub const NUMBER_OF_FLOORS: FieldDef = FieldDef::new("NumberofFloors", Int, Numeric, Ge(1.0));
pub const BUILDING_AGE: FieldDef = FieldDef::new("BuildingAge", Int, Numeric, Ge(0.0));
pub const PRIMARY_PROPERTY_TYPE: FieldDef =
    FieldDef::new("PrimaryPropertyType", Text, Categorical, Any);
pub const LARGEST_PROPERTY_USE_TYPE: FieldDef =
    FieldDef::new("LargestPropertyUseType", Text, Categorical, Any);
pub const COUNCIL_DISTRICT_CODE: FieldDef =
    FieldDef::new("CouncilDistrictCode", Int, Categorical, Ge(0.0));
pub const NEIGHBORHOOD: FieldDef = FieldDef::new("Neighborhood", Text, Categorical, Any);
pub const LATITUDE: FieldDef = FieldDef::new("Latitude", Float, Numeric, Any);
pub const LONGITUDE: FieldDef = FieldDef::new("Longitude", Float, Numeric, Any);
pub const HAS_PARKING: FieldDef = FieldDef::new("HasParking", Int, Numeric, Between(0.0, 1.0));
pub const PARKING_RATIO: FieldDef = FieldDef::new("ParkingRatio", Float, Numeric, Ge(0.0));
pub const AREA_PER_FLOOR: FieldDef = FieldDef::new("AreaPerFloor", Float, Numeric, Ge(0.0));
pub const BUILDING_DENSITY: FieldDef =
    FieldDef::new("BuildingDensity", Float, Numeric, Ge(0.0));
pub const GEO_CLUSTER: FieldDef = FieldDef::new("GeoCluster", Int, Categorical, Ge(0.0));

/// Every model feature, in validation order.
pub const FIELDS: [FieldDef; 17] = [
    PROPERTY_GFA_TOTAL,
    PROPERTY_GFA_BUILDINGS,
    PROPERTY_GFA_PARKING,
    NUMBER_OF_BUILDINGS,
    NUMBER_OF_FLOORS,
    BUILDING_AGE,
    PRIMARY_PROPERTY_TYPE,
    LARGEST_PROPERTY_USE_TYPE,
    COUNCIL_DISTRICT_CODE,
    NEIGHBORHOOD,
    LATITUDE,
    LONGITUDE,
    HAS_PARKING,
    PARKING_RATIO,
    AREA_PER_FLOOR,
    BUILDING_DENSITY,
    GEO_CLUSTER,
];

/// Looks a field up by its wire name.
pub fn by_wire(wire: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.wire == wire)
}

/// Looks a field up by its internal name.
pub fn by_name(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Maps an internal name to its wire name.
pub fn wire_name(name: &str) -> Option<&'static str> {
    by_name(name).map(|f| f.wire)
}

/// Maps a wire name to its internal name.
pub fn internal_name(wire: &str) -> Option<&'static str> {
    by_wire(wire).map(|f| f.name)
}

/// All wire names in validation order.
pub fn wire_names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.wire)
}

/// Wire names of the fields with the given role, in catalog order.
pub fn with_role(role: Role) -> impl Iterator<Item = &'static str> {
    FIELDS.iter().filter(move |f| f.role == role).map(|f| f.wire)
}
