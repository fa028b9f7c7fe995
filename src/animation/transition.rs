use std::time::Duration;

use crate::{animation::ease::Ease, foundation::core::Point};

/// How a primitive reaches its new state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionKind {
    /// Jump straight to the final state.
    Cut,
    /// Opacity ramps from 0 to 1.
    FadeIn,
    /// Opacity ramps from 1 to 0.
    FadeOut,
    /// Strokes are drawn from their start point outwards.
    DrawIn,
    /// Origin is interpolated between two points.
    Move {
        /// Origin at the start of the transition.
        from: Point,
        /// Origin once complete.
        to: Point,
    },
}

/// A timed, eased transition applied to one primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// What is being interpolated.
    pub kind: TransitionKind,
    /// Total length.
    pub duration: Duration,
    /// Progress mapping.
    pub ease: Ease,
}

impl Transition {
    /// Instantaneous transition.
    pub fn cut() -> Self {
        Self {
            kind: TransitionKind::Cut,
            duration: Duration::ZERO,
            ease: Ease::Linear,
        }
    }

    /// Fade-in over `duration`.
    pub fn fade_in(duration: Duration) -> Self {
        Self {
            kind: TransitionKind::FadeIn,
            duration,
            ease: Ease::OutQuad,
        }
    }

    /// Fade-out over `duration`.
    pub fn fade_out(duration: Duration) -> Self {
        Self {
            kind: TransitionKind::FadeOut,
            duration,
            ease: Ease::InQuad,
        }
    }

    /// Stroke draw-in over `duration`.
    pub fn draw_in(duration: Duration) -> Self {
        Self {
            kind: TransitionKind::DrawIn,
            duration,
            ease: Ease::OutCubic,
        }
    }

    /// Interpolated move between two origins.
    pub fn move_between(from: Point, to: Point, duration: Duration, ease: Ease) -> Self {
        Self {
            kind: TransitionKind::Move { from, to },
            duration,
            ease,
        }
    }

    /// Eased progress in `[0, 1]` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || matches!(self.kind, TransitionKind::Cut) {
            return 1.0;
        }
        self.ease
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Whether the transition has fully played after `elapsed`.
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Opacity multiplier after `elapsed`.
    pub fn opacity(&self, elapsed: Duration) -> f64 {
        let p = self.progress(elapsed);
        match self.kind {
            TransitionKind::FadeIn => p,
            TransitionKind::FadeOut => 1.0 - p,
            _ => 1.0,
        }
    }

    /// Interpolated origin after `elapsed`, for moves.
    pub fn origin_at(&self, elapsed: Duration) -> Option<Point> {
        match self.kind {
            TransitionKind::Move { from, to } => Some(from.lerp(to, self.progress(elapsed))),
            _ => None,
        }
    }

    /// Fraction of each stroke visible after `elapsed`.
    pub fn stroke_reveal(&self, elapsed: Duration) -> f64 {
        match self.kind {
            TransitionKind::DrawIn => self.progress(elapsed),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
