use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoothError::media_unavailable("x")
            .to_string()
            .contains("media unavailable:")
    );
    assert!(
        BoothError::capture_aborted("x")
            .to_string()
            .contains("capture aborted:")
    );
    assert!(
        BoothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BoothError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn structured_variants_render_their_fields() {
    let e = BoothError::index_out_of_range(7, 3);
    assert_eq!(e.to_string(), "index out of range: 7 is not in [0, 3)");

    let e = BoothError::CompositeIncomplete {
        decoded: 2,
        expected: 3,
    };
    assert_eq!(e.to_string(), "composite incomplete: 2 of 3 photos decoded");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
