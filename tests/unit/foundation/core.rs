use super::*;
use serde_json::json;

#[test]
fn speed_rejects_non_positive() {
    assert!(Speed::new(0.0).is_err());
    assert!(Speed::new(-1.0).is_err());
    assert!(Speed::new(f64::NAN).is_err());
    assert!(Speed::new(f64::INFINITY).is_err());
    assert_eq!(Speed::new(1.5).unwrap().get(), 1.5);
}

#[test]
fn speed_scales_durations() {
    let s = Speed::new(2.0).unwrap();
    assert_eq!(s.scale(Duration::from_millis(2000)), Duration::from_millis(1000));
    let s = Speed::new(0.5).unwrap();
    assert_eq!(s.scale(Duration::from_millis(2000)), Duration::from_millis(4000));
}

#[test]
fn speed_scaling_saturates() {
    let crawl = Speed::new(1e-20).unwrap();
    assert_eq!(crawl.scale(Duration::from_millis(2000)), Duration::MAX);
    let slow = Speed::new(1e-4).unwrap();
    assert_eq!(slow.scale(Duration::from_millis(u64::MAX)), Duration::MAX);
    assert_eq!(slow.scale(Duration::ZERO), Duration::ZERO);
}

#[test]
fn saturating_secs_clamps_both_ends() {
    assert_eq!(saturating_secs(1.5), Duration::from_millis(1500));
    assert_eq!(saturating_secs(-3.0), Duration::ZERO);
    assert_eq!(saturating_secs(f64::NAN), Duration::ZERO);
    assert_eq!(saturating_secs(f64::INFINITY), Duration::MAX);
}

#[test]
fn speed_cycles_presets() {
    let mut s = Speed::new(0.5).unwrap();
    let mut seen = Vec::new();
    for _ in 0..5 {
        s = s.next_preset();
        seen.push(s.get());
    }
    assert_eq!(seen, vec![1.0, 1.5, 2.0, 0.5, 1.0]);

    // Off-preset values jump to the next larger preset.
    assert_eq!(Speed::new(1.2).unwrap().next_preset().get(), 1.5);
    assert_eq!(Speed::new(3.0).unwrap().next_preset().get(), 0.5);
}

#[test]
fn speed_deserialize_validates() {
    assert!(serde_json::from_value::<Speed>(json!(0)).is_err());
    assert_eq!(serde_json::from_value::<Speed>(json!(2)).unwrap().get(), 2.0);
}

#[test]
fn entity_id_accepts_numbers() {
    let a: EntityId = serde_json::from_value(json!("n1")).unwrap();
    let b: EntityId = serde_json::from_value(json!(7)).unwrap();
    assert_eq!(a.as_str(), "n1");
    assert_eq!(b.as_str(), "7");
    assert!(serde_json::from_value::<EntityId>(json!({"x": 1})).is_err());
}

#[test]
fn millis_is_lenient() {
    let m: Millis = serde_json::from_value(json!(1500)).unwrap();
    assert_eq!(m, Millis(1500));
    let m: Millis = serde_json::from_value(json!(12.6)).unwrap();
    assert_eq!(m, Millis(13));
    let m: Millis = serde_json::from_value(json!("800")).unwrap();
    assert_eq!(m.as_duration(), Duration::from_millis(800));
    assert!(serde_json::from_value::<Millis>(json!(-5)).is_err());
    assert!(serde_json::from_value::<Millis>(json!("soon")).is_err());
}

#[test]
fn display_value_renders_scalars() {
    let v: DisplayValue = serde_json::from_value(json!(42)).unwrap();
    assert_eq!(v.as_str(), "42");
    let v: DisplayValue = serde_json::from_value(json!("A")).unwrap();
    assert_eq!(v.as_str(), "A");
    let v: DisplayValue = serde_json::from_value(json!(null)).unwrap();
    assert_eq!(v.as_str(), "");
    let v: DisplayValue = serde_json::from_value(json!(true)).unwrap();
    assert_eq!(v.as_str(), "true");
}
