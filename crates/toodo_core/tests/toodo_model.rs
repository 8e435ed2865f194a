use toodo_core::{Toodo, ToodoValidationError};

#[test]
fn new_item_is_open_and_undated() {
    let item = Toodo::new("a", "write docs");

    assert_eq!(item.id, "a");
    assert_eq!(item.title, "write docs");
    assert!(!item.completed);
    assert!(!item.has_created_at());
}

#[test]
fn fill_created_at_only_touches_unset_values() {
    let mut fresh = Toodo::new("a", "fresh");
    fresh.fill_created_at(500);
    assert_eq!(fresh.created_at, 500);

    fresh.fill_created_at(900);
    assert_eq!(fresh.created_at, 500);
}

#[test]
fn validate_rejects_blank_id_and_negative_timestamp() {
    assert_eq!(
        Toodo::new("  ", "blank").validate(),
        Err(ToodoValidationError::EmptyId)
    );

    let mut item = Toodo::new("a", "old");
    item.created_at = -1;
    assert!(matches!(
        item.validate(),
        Err(ToodoValidationError::NegativeCreatedAt { created_at: -1, .. })
    ));
}

#[test]
fn json_wire_shape_uses_snake_case_fields() {
    let mut item = Toodo::new("a", "ship it");
    item.completed = true;
    item.created_at = 1_700_000_000_000;

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], "a");
    assert_eq!(json["title"], "ship it");
    assert_eq!(json["completed"], true);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
}

#[test]
fn decoding_fills_defaults_for_optional_fields() {
    let items: Vec<Toodo> = serde_json::from_str(r#"[{"id":"x"}]"#).unwrap();

    assert_eq!(items, vec![Toodo::new("x", "")]);
}

#[test]
fn decoding_requires_an_id() {
    let result: Result<Vec<Toodo>, _> = serde_json::from_str(r#"[{"title":"no id"}]"#);

    assert!(result.is_err());
}

#[test]
fn decoding_maps_null_fields_to_zero_values() {
    let items: Vec<Toodo> = serde_json::from_str(
        r#"[{"id":"x","title":null,"completed":null,"created_at":null}]"#,
    )
    .unwrap();

    assert_eq!(items, vec![Toodo::new("x", "")]);
}

#[test]
fn decoding_rejects_null_id() {
    let result: Result<Vec<Toodo>, _> = serde_json::from_str(r#"[{"id":null}]"#);

    assert!(result.is_err());
}
