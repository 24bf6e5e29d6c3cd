use serde_json::json;

use super::*;

#[test]
fn version_is_optional() {
    let t = Trace::from_json_str(r#"{"commands": [{"command": "Save"}]}"#).expect("trace");
    assert_eq!(t.version, None);
    assert_eq!(t.len(), 1);

    let t = Trace::from_json_str(r#"{"version": 1, "commands": []}"#).expect("trace");
    assert_eq!(t.version, Some(1));
    assert!(t.is_empty());
}

#[test]
fn reader_and_new_agree() {
    let text = br#"{"commands": [{"command": "DrawPaint"}]}"#;
    let from_reader = Trace::from_reader(&text[..]).expect("reader");
    assert_eq!(from_reader, Trace::new(vec![json!({"command": "DrawPaint"})]));
}

#[test]
fn malformed_json_is_validation_error() {
    let err = Trace::from_json_str("{").expect_err("truncated");
    assert!(matches!(err, LskiaError::Validation(_)));
    let err = Trace::from_json_str(r#"{"version": 1}"#).expect_err("no commands");
    assert!(matches!(err, LskiaError::Validation(_)));
}
