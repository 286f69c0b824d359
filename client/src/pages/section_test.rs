use serde_json::json;

use super::*;

#[test]
fn paginated_envelope_is_unwrapped() {
    let body = json!({"count": 2, "next": null, "results": [{"name": "Ferrari"}, {"name": "McLaren"}]});
    assert_eq!(row_labels(&body), ["Ferrari", "McLaren"]);
}

#[test]
fn bare_array_is_accepted() {
    let body = json!([{"full_name": "Lando Norris"}]);
    assert_eq!(row_labels(&body), ["Lando Norris"]);
}

#[test]
fn unexpected_shapes_yield_no_rows() {
    assert!(row_labels(&json!({"detail": "nope"})).is_empty());
    assert!(row_labels(&json!("text")).is_empty());
    assert!(row_labels(&json!({"results": "broken"})).is_empty());
}

#[test]
fn label_prefers_named_fields_in_order() {
    assert_eq!(row_label(&json!({"title": "Monaco GP", "name": "monaco"})), "monaco");
    assert_eq!(row_label(&json!({"name": "", "title": "Monaco GP"})), "Monaco GP");
    assert_eq!(row_label(&json!({"username": "steward"})), "steward");
}

#[test]
fn label_falls_back_to_id_then_json() {
    assert_eq!(row_label(&json!({"id": 44, "points": 10})), "#44");
    assert_eq!(row_label(&json!({"points": 10})), r#"{"points":10}"#);
}
