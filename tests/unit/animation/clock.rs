use super::*;
use crate::animation::transition::TransitionKind;

#[tokio::test(start_paused = true)]
async fn realtime_wait_advances_clock() {
    let start = tokio::time::Instant::now();
    Pacing::Realtime.wait(Duration::from_millis(1500)).await;
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn instant_wait_takes_no_time() {
    let start = tokio::time::Instant::now();
    Pacing::Instant.wait(Duration::from_secs(10)).await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[test]
fn instant_pacing_cuts_transitions() {
    let t = Transition::fade_in(Duration::from_millis(300));
    assert_eq!(Pacing::Realtime.transition(t), t);
    assert_eq!(Pacing::Instant.transition(t).kind, TransitionKind::Cut);
}
