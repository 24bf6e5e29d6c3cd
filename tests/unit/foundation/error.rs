use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LskiaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LskiaError::unbalanced("x")
            .to_string()
            .contains("unbalanced scope:")
    );
    assert!(
        LskiaError::rewrite_engine("x")
            .to_string()
            .contains("rewrite engine failure:")
    );
    assert_eq!(
        LskiaError::grammar(17, "expected ')'").to_string(),
        "grammar mismatch at byte 17: expected ')'"
    );
}

#[test]
fn command_errors_carry_their_index() {
    let e = LskiaError::unsupported_command(4, "DrawVertices");
    assert_eq!(e.to_string(), "unsupported command 'DrawVertices' at index 4");

    let e = LskiaError::unsupported_attribute(2, "paint.blur", "not supported");
    assert!(e.to_string().contains("'paint.blur' at index 2"));

    let e = LskiaError::malformed_geometry(9, "non-finite");
    assert!(matches!(e, LskiaError::MalformedGeometry { index: 9, .. }));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LskiaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
