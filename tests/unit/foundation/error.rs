use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChromaplaneError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(
        ChromaplaneError::pool_creation("x")
            .to_string()
            .contains("pool creation error:")
    );
    assert!(ChromaplaneError::lock("x").to_string().contains("lock error:"));
    assert!(
        ChromaplaneError::context_creation("x")
            .to_string()
            .contains("context creation error:")
    );
    assert!(
        ChromaplaneError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChromaplaneError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
