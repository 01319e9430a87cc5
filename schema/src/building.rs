use serde_json::{Map, Value as Json};

use crate::{
    error::{FieldViolation, ValidationErr, Violation},
    fields::{self, FIELDS, FieldDef, FieldKind},
    value::Value,
};

/// A validated building description.
///
/// Obtained from a JSON payload through [`BuildingRecord::from_payload`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    pub property_gfa_total: f64,
    pub property_gfa_buildings: f64,
    pub property_gfa_parking: f64,
    pub number_of_buildings: i64,
    pub number_of_floors: i64,
    pub building_age: i64,
    pub primary_property_type: String,
    pub largest_property_use_type: String,
    pub council_district_code: i64,
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub has_parking: i64,
    pub parking_ratio: f64,
    pub area_per_floor: f64,
    pub building_density: f64,
    pub geo_cluster: i64,
}

impl BuildingRecord {
    /// Validates a payload keyed by wire names.
    ///
    /// Every field is checked before returning, so the error lists all the
    /// violations at once. Keys outside the catalog are ignored.
    pub fn from_payload(payload: &Map<String, Json>) -> Result<Self, ValidationErr> {
        let mut c = Collector::new(payload);

        let record = Self {
            property_gfa_total: c.float(&fields::PROPERTY_GFA_TOTAL),
            property_gfa_buildings: c.float(&fields::PROPERTY_GFA_BUILDINGS),
            property_gfa_parking: c.float(&fields::PROPERTY_GFA_PARKING),
            number_of_buildings: c.int(&fields::NUMBER_OF_BUILDINGS),
            number_of_floors: c.int(&fields::NUMBER_OF_FLOORS),
            building_age: c.int(&fields::BUILDING_AGE),
            primary_property_type: c.text(&fields::PRIMARY_PROPERTY_TYPE),
            largest_property_use_type: c.text(&fields::LARGEST_PROPERTY_USE_TYPE),
            council_district_code: c.int(&fields::COUNCIL_DISTRICT_CODE),
            neighborhood: c.text(&fields::NEIGHBORHOOD),
            latitude: c.float(&fields::LATITUDE),
            longitude: c.float(&fields::LONGITUDE),
            has_parking: c.int(&fields::HAS_PARKING),
            parking_ratio: c.float(&fields::PARKING_RATIO),
            area_per_floor: c.float(&fields::AREA_PER_FLOOR),
            building_density: c.float(&fields::BUILDING_DENSITY),
            geo_cluster: c.int(&fields::GEO_CLUSTER),
        };

        c.finish()?;
        debug_assert!(record.validate().is_ok(), "accepted record breaks a range constraint");
        Ok(record)
    }

    /// Checks the range constraints of an already built record.
    pub(crate) fn validate(&self) -> Result<(), ValidationErr> {
        let violations: Vec<_> = FIELDS
            .iter()
            .filter_map(|def| {
                let got = self.value_of(def)?.as_f64()?;
                (!def.constraint.check(got)).then(|| {
                    FieldViolation::new(
                        def.wire,
                        Violation::OutOfRange {
                            constraint: def.constraint,
                            got,
                        },
                    )
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErr::new(violations))
        }
    }

    /// Returns the value of a catalog field, `None` for a field outside the catalog.
    pub fn value_of(&self, def: &FieldDef) -> Option<Value> {
        let value: Value = match def.name {
            "PropertyGFATotal" => self.property_gfa_total.into(),
            "PropertyGFABuildings" => self.property_gfa_buildings.into(),
            "PropertyGFAParking" => self.property_gfa_parking.into(),
            "NumberofBuildings" => self.number_of_buildings.into(),
            "NumberofFloors" => self.number_of_floors.into(),
            "BuildingAge" => self.building_age.into(),
            "PrimaryPropertyType" => self.primary_property_type.as_str().into(),
            "LargestPropertyUseType" => self.largest_property_use_type.as_str().into(),
            "CouncilDistrictCode" => self.council_district_code.into(),
            "Neighborhood" => self.neighborhood.as_str().into(),
            "Latitude" => self.latitude.into(),
            "Longitude" => self.longitude.into(),
            "HasParking" => self.has_parking.into(),
            "ParkingRatio" => self.parking_ratio.into(),
            "AreaPerFloor" => self.area_per_floor.into(),
            "BuildingDensity" => self.building_density.into(),
            "GeoCluster" => self.geo_cluster.into(),
            _ => return None,
        };
        Some(value)
    }

    /// Expands the record into `(wire name, value)` pairs in catalog order.
    pub fn to_wire_values(&self) -> Vec<(&'static str, Value)> {
        FIELDS
            .iter()
            .filter_map(|def| Some((def.wire, self.value_of(def)?)))
            .collect()
    }

    /// Expands the record into a JSON object keyed by wire names.
    pub fn to_wire_map(&self) -> Map<String, Json> {
        self.to_wire_values()
            .into_iter()
            .map(|(wire, v)| (wire.to_string(), v.into()))
            .collect()
    }
}

/// Reads typed fields out of a payload, collecting violations along the way.
///
/// Accessors hand back a placeholder when a field is invalid; the placeholder
/// never escapes because `finish` fails whenever one was produced.
struct Collector<'a> {
    payload: &'a Map<String, Json>,
    violations: Vec<FieldViolation>,
}

impl<'a> Collector<'a> {
    fn new(payload: &'a Map<String, Json>) -> Self {
        Self {
            payload,
            violations: Vec::new(),
        }
    }

    fn float(&mut self, def: &FieldDef) -> f64 {
        match self.read(def) {
            Some(Value::Float(f)) => f,
            Some(Value::Int(i)) => i as f64,
            _ => 0.0,
        }
    }

    fn int(&mut self, def: &FieldDef) -> i64 {
        match self.read(def) {
            Some(Value::Int(i)) => i,
            _ => 0,
        }
    }

    fn text(&mut self, def: &FieldDef) -> String {
        match self.read(def) {
            Some(Value::Text(s)) => s,
            _ => String::new(),
        }
    }

    fn read(&mut self, def: &FieldDef) -> Option<Value> {
        match self.parse(def) {
            Ok(v) => Some(v),
            Err(violation) => {
                self.violations.push(FieldViolation::new(def.wire, violation));
                None
            }
        }
    }

    fn parse(&self, def: &FieldDef) -> Result<Value, Violation> {
        let raw = self.payload.get(def.wire).ok_or(Violation::Missing)?;
        let wrong_type = Violation::WrongType {
            expected: def.kind.expected(),
        };

        let value = match (def.kind, raw) {
            (FieldKind::Text, Json::String(s)) => return Ok(Value::Text(s.clone())),
            (FieldKind::Float, Json::Number(n)) => n.as_f64().map(Value::Float).ok_or(wrong_type)?,
            (FieldKind::Int, Json::Number(n)) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => {
                    let f = n.as_f64().ok_or(wrong_type)?;
                    if f.fract() != 0.0 {
                        return Err(Violation::NotInteger { got: f });
                    }
                    if f.abs() >= i64::MAX as f64 {
                        return Err(Violation::IntOverflow { got: f });
                    }
                    Value::Int(f as i64)
                }
            },
            _ => return Err(wrong_type),
        };

        let got = value.as_f64().unwrap_or_default();
        if !def.constraint.check(got) {
            return Err(Violation::OutOfRange {
                constraint: def.constraint,
                got,
            });
        }

        Ok(value)
    }

    fn finish(self) -> Result<(), ValidationErr> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErr::new(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> Map<String, Json> {
        let Json::Object(map) = json!({
            "PropertyGFATotal": 88434.0,
            "PropertyGFABuilding(s)": 88434.0,
            "PropertyGFAParking": 0.0,
            "NumberofBuildings": 1,
            "NumberofFloors": 12,
            "BuildingAge": 89,
            "PrimaryPropertyType": "Hotel",
            "LargestPropertyUseType": "Hotel",
            "CouncilDistrictCode": 7,
            "Neighborhood": "DOWNTOWN",
            "Latitude": 47.6129,
            "Longitude": -122.336,
            "HasParking": 0,
            "ParkingRatio": 0.0,
            "AreaPerFloor": 7369.5,
            "BuildingDensity": 0.000011,
            "GeoCluster": 2
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn accepts_the_example_building() {
        let record = BuildingRecord::from_payload(&payload()).unwrap();
        assert_eq!(record.number_of_floors, 12);
        assert_eq!(record.property_gfa_buildings, 88434.0);
        assert_eq!(record.neighborhood, "DOWNTOWN");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn wire_map_uses_the_aliased_key() {
        let record = BuildingRecord::from_payload(&payload()).unwrap();
        let map = record.to_wire_map();
        assert_eq!(map.len(), 17);
        assert_eq!(map["PropertyGFABuilding(s)"], json!(88434.0));
        assert_eq!(map["NumberofFloors"], json!(12));
        assert!(!map.contains_key("PropertyGFABuildings"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut p = payload();
        p.remove("NumberofFloors");
        let err = BuildingRecord::from_payload(&p).unwrap_err();
        assert_eq!(err.get("NumberofFloors"), Some(&Violation::Missing));
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn zero_buildings_is_out_of_range() {
        let mut p = payload();
        p.insert("NumberofBuildings".into(), json!(0));
        let err = BuildingRecord::from_payload(&p).unwrap_err();
        assert!(matches!(
            err.get("NumberofBuildings"),
            Some(Violation::OutOfRange { got, .. }) if *got == 0.0
        ));
    }

    #[test]
    fn internal_name_is_not_accepted_on_the_wire() {
        let mut p = payload();
        let v = p.remove("PropertyGFABuilding(s)").unwrap();
        p.insert("PropertyGFABuildings".into(), v);
        let err = BuildingRecord::from_payload(&p).unwrap_err();
        assert_eq!(err.get("PropertyGFABuilding(s)"), Some(&Violation::Missing));
    }

    #[test]
    fn every_violation_is_reported() {
        let mut p = payload();
        p.insert("HasParking".into(), json!(2));
        p.insert("NumberofFloors".into(), json!(2.5));
        p.insert("Neighborhood".into(), json!(3));
        p.insert("PropertyGFATotal".into(), json!(0));
        let err = BuildingRecord::from_payload(&p).unwrap_err();

        assert_eq!(err.violations().len(), 4);
        assert!(matches!(err.get("HasParking"), Some(Violation::OutOfRange { .. })));
        assert_eq!(
            err.get("NumberofFloors"),
            Some(&Violation::NotInteger { got: 2.5 })
        );
        assert_eq!(
            err.get("Neighborhood"),
            Some(&Violation::WrongType {
                expected: "a string"
            })
        );
        assert!(matches!(
            err.get("PropertyGFATotal"),
            Some(Violation::OutOfRange { .. })
        ));
    }

    #[test]
    fn integral_floats_are_accepted_for_int_fields() {
        let mut p = payload();
        p.insert("NumberofFloors".into(), json!(12.0));
        let record = BuildingRecord::from_payload(&p).unwrap();
        assert_eq!(record.number_of_floors, 12);
    }

    #[test]
    fn huge_integers_are_reported_as_overflow() {
        let mut p = payload();
        p.insert("NumberofFloors".into(), json!(1e19));
        let err = BuildingRecord::from_payload(&p).unwrap_err();
        let violation = err.get("NumberofFloors").unwrap();
        assert_eq!(violation, &Violation::IntOverflow { got: 1e19 });
        assert!(violation.to_string().contains("does not fit in 64 bits"));
    }

    #[test]
    fn hand_built_records_are_range_checked() {
        let mut record = BuildingRecord::from_payload(&payload()).unwrap();
        record.number_of_buildings = 0;
        let err = record.validate().unwrap_err();
        assert!(err.get("NumberofBuildings").is_some());
    }
}
