use schema::{FIELDS, msg};
use serde_json::{Value, json};

const EXAMPLE: &str = include_str!("../../demos/example_payload.json");

#[test]
fn example_request_validates_and_normalises() {
    let body: Value = serde_json::from_str(EXAMPLE).unwrap();
    let record = msg::parse_request(&body).unwrap();
    let map = record.to_wire_map();

    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    let expected: Vec<_> = FIELDS.iter().map(|f| f.wire).collect();
    assert_eq!(keys, expected);

    assert_eq!(map["PropertyGFATotal"], json!(88434.0));
    assert_eq!(map["PrimaryPropertyType"], json!("Hotel"));
    assert_eq!(map["GeoCluster"], json!(2));
}

#[test]
fn key_order_in_the_request_does_not_matter() {
    let body: Value = serde_json::from_str(EXAMPLE).unwrap();
    let mut pairs: Vec<_> = body["payload"].as_object().unwrap().clone().into_iter().collect();
    pairs.reverse();
    let reversed = json!({ "payload": pairs.into_iter().collect::<serde_json::Map<_, _>>() });

    let a = msg::parse_request(&body).unwrap();
    let b = msg::parse_request(&reversed).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_wire_map(), b.to_wire_map());
}
