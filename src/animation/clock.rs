use std::time::Duration;

use crate::animation::transition::Transition;

/// Whether animation waits take real time.
///
/// Normal playback runs [`Pacing::Realtime`]. Seeking backward replays earlier steps with
/// [`Pacing::Instant`], which collapses every wait and every transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Waits sleep on the tokio timer.
    #[default]
    Realtime,
    /// Waits only yield to the scheduler.
    Instant,
}

impl Pacing {
    /// Suspend for `d` under this pacing.
    pub async fn wait(self, d: Duration) {
        match self {
            Self::Realtime if !d.is_zero() => tokio::time::sleep(d).await,
            _ => tokio::task::yield_now().await,
        }
    }

    /// Adjust a transition for this pacing.
    pub fn transition(self, t: Transition) -> Transition {
        match self {
            Self::Realtime => t,
            Self::Instant => Transition::cut(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
