use super::*;
use serde_json::json;

#[test]
fn dwell_defaults_and_scales() {
    let step: Step = serde_json::from_value(json!({ "commands": [] })).unwrap();
    assert_eq!(step.dwell(Speed::NORMAL), Duration::from_millis(2000));
    assert_eq!(
        step.dwell(Speed::new(2.0).unwrap()),
        Duration::from_millis(1000)
    );

    let step: Step = serde_json::from_value(json!({ "duration": 1500 })).unwrap();
    assert_eq!(
        step.dwell(Speed::new(0.5).unwrap()),
        Duration::from_millis(3000)
    );
    assert!(step.commands.is_empty());
}

#[test]
fn blank_narration_is_none() {
    let step: Step = serde_json::from_value(json!({ "narration": "  " })).unwrap();
    assert_eq!(step.narration(), None);
    let step: Step = serde_json::from_value(json!({ "narration": " Swap. " })).unwrap();
    assert_eq!(step.narration(), Some("Swap."));
}

#[test]
fn dwell_saturates_at_extreme_slowdown() {
    assert_eq!(
        Step::default().dwell(Speed::new(1e-20).unwrap()),
        Duration::MAX
    );
    let step: Step = serde_json::from_value(json!({ "duration": u64::MAX })).unwrap();
    assert_eq!(step.dwell(Speed::new(1e-4).unwrap()), Duration::MAX);
}
