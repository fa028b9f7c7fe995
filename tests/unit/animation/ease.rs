use super::*;

const ALL: [Ease; 6] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(Ease::InOutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::InOutCubic.apply(2.0), 1.0);
}

#[test]
fn parses_css_keywords() {
    assert_eq!(parse_ease("ease-in-out").unwrap(), Ease::InOutCubic);
    assert_eq!(parse_ease("ease").unwrap(), Ease::InOutCubic);
    assert_eq!(parse_ease("Ease-In").unwrap(), Ease::InCubic);
    assert_eq!(parse_ease("ease_out").unwrap(), Ease::OutCubic);
    assert_eq!(parse_ease(" linear ").unwrap(), Ease::Linear);
    assert_eq!(parse_ease("OutQuad").unwrap(), Ease::OutQuad);
    assert!(parse_ease("ease-in-out-quad").is_err());
    assert!(parse_ease("bounce").is_err());
}

#[test]
fn in_out_cubic_is_symmetric() {
    assert_eq!(Ease::InOutCubic.apply(0.5), 0.5);
    assert!((Ease::InOutCubic.apply(0.25) - 0.0625).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.75) - 0.9375).abs() < 1e-12);
    assert!((Ease::OutQuad.apply(0.5) - 0.75).abs() < 1e-12);
}
