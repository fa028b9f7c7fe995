use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VizError::scene("x").to_string().contains("scene error:"));
    assert!(
        VizError::narration("x")
            .to_string()
            .contains("narration error:")
    );
    assert!(VizError::channel("x").to_string().contains("channel error:"));
    assert!(
        VizError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
