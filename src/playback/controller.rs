use std::cell::{Cell, RefCell};

use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::{
    animation::clock::Pacing,
    command::interpreter::{Interpreter, StepReport},
    foundation::{core::Speed, error::VizResult},
    narration::coordinator::NarrationCoordinator,
    playback::step::{Step, Timeline},
};

/// Where playback stands. Derived from the cursor and the playing flag, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// What a UI needs to draw its controls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    /// Index of the next step to execute.
    pub cursor: usize,
    pub total: usize,
    pub speed: Speed,
}

/// State machine over a loaded [`Timeline`].
///
/// All methods take `&self` so that `pause` can be called while `play` is running on the
/// same task. A step gate (async mutex) is held for the whole of every step and every
/// rebuild, so step N+1 never starts before step N has settled. Each `play`, `pause`, load
/// and rebuild bumps a run epoch; a running loop checks it before starting another step and
/// abandons its narration and dwell when it changes.
pub struct PlaybackController {
    interpreter: Interpreter,
    narration: NarrationCoordinator,
    timeline: RefCell<Timeline>,
    cursor: Cell<usize>,
    playing: Cell<bool>,
    speed: Cell<Speed>,
    epoch: watch::Sender<u64>,
    gate: Mutex<()>,
    snapshot: watch::Sender<PlaybackSnapshot>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    pub fn new(interpreter: Interpreter, narration: NarrationCoordinator) -> Self {
        let initial = PlaybackSnapshot {
            status: PlaybackStatus::Idle,
            cursor: 0,
            total: 0,
            speed: Speed::NORMAL,
        };
        Self {
            interpreter,
            narration,
            timeline: RefCell::new(Timeline::default()),
            cursor: Cell::new(0),
            playing: Cell::new(false),
            speed: Cell::new(Speed::NORMAL),
            epoch: watch::Sender::new(0),
            gate: Mutex::new(()),
            snapshot: watch::Sender::new(initial),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn narration(&self) -> &NarrationCoordinator {
        &self.narration
    }

    pub fn status(&self) -> PlaybackStatus {
        let total = self.total();
        if self.playing.get() {
            PlaybackStatus::Playing
        } else if total > 0 && self.cursor.get() >= total {
            PlaybackStatus::Finished
        } else if self.cursor.get() == 0 {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Paused
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn total(&self) -> usize {
        self.timeline.borrow().len()
    }

    pub fn speed(&self) -> Speed {
        self.speed.get()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status(),
            cursor: self.cursor(),
            total: self.total(),
            speed: self.speed(),
        }
    }

    /// Snapshots published after every state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.subscribe()
    }

    /// Replace the timeline, clear the scene and apply its setup. Ends up idle at step 0.
    #[tracing::instrument(level = "info", skip_all, fields(steps = timeline.len(), setup = timeline.setup.len()))]
    pub async fn load(&self, timeline: Timeline) -> StepReport {
        self.halt();
        let _gate = self.gate.lock().await;
        self.timeline.replace(timeline);
        let report = self.rebuild_locked(0).await;
        self.publish();
        report
    }

    /// Run steps from the cursor until the end or until paused.
    ///
    /// A finished timeline is rebuilt and played from step 0. Calling `play` while already
    /// playing does nothing.
    pub async fn play(&self) -> StepReport {
        let mut report = StepReport::default();
        if self.playing.get() {
            return report;
        }
        let epoch = self.bump_epoch();

        if self.status() == PlaybackStatus::Finished {
            let _gate = self.gate.lock().await;
            if !self.is_current(epoch) {
                return report;
            }
            report.merge(self.rebuild_locked(0).await);
        }

        self.playing.set(true);
        self.publish();
        tracing::info!(from = self.cursor(), total = self.total(), "playing");

        while self.is_current(epoch) {
            match self.advance(epoch).await {
                Some(step) => report.merge(step),
                None => break,
            }
        }

        if self.is_current(epoch) {
            self.playing.set(false);
            self.narration.stop_all();
            self.publish();
            tracing::info!("finished");
        }
        report
    }

    /// Stop before the next step starts and silence narration.
    pub fn pause(&self) {
        self.halt();
        self.publish();
    }

    /// Execute the step under the cursor and advance. Leaves the playing flag alone.
    pub async fn step_forward(&self) -> Option<StepReport> {
        let epoch = *self.epoch.borrow();
        let report = self.advance(epoch).await;
        self.publish();
        report
    }

    /// Go back one step by replaying everything before it without narration.
    pub async fn step_backward(&self) -> Option<StepReport> {
        let target = self.cursor().checked_sub(1)?;
        Some(self.seek(target).await)
    }

    /// Rebuild the scene as it stands right before step `index` (clamped to the end).
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn seek(&self, index: usize) -> StepReport {
        self.halt();
        let _gate = self.gate.lock().await;
        let report = self.rebuild_locked(index.min(self.total())).await;
        self.publish();
        report
    }

    /// Pause, clear the scene and start over from the setup.
    pub async fn restart(&self) -> StepReport {
        self.seek(0).await
    }

    pub fn set_speed(&self, speed: Speed) {
        self.speed.set(speed);
        self.publish();
    }

    /// Switch to the next speed preset and return it.
    pub fn cycle_speed(&self) -> Speed {
        let next = self.speed().next_preset();
        self.set_speed(next);
        next
    }

    /// Parse and apply a raw speed multiplier.
    pub fn set_speed_multiplier(&self, multiplier: f64) -> VizResult<Speed> {
        let speed = Speed::new(multiplier)?;
        self.set_speed(speed);
        Ok(speed)
    }

    fn halt(&self) {
        self.playing.set(false);
        self.bump_epoch();
        self.narration.stop_all();
    }

    fn bump_epoch(&self) -> u64 {
        self.epoch.send_modify(|e| *e += 1);
        *self.epoch.borrow()
    }

    fn is_current(&self, epoch: u64) -> bool {
        *self.epoch.borrow() == epoch
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.snapshot());
    }

    fn step_at(&self, index: usize) -> Option<Step> {
        self.timeline.borrow().steps.get(index).cloned()
    }

    /// Run the step under the cursor: commands, then narration, then the dwell.
    ///
    /// The cursor moves as soon as the commands have settled; narration and dwell are cut
    /// short when `epoch` goes stale.
    async fn advance(&self, epoch: u64) -> Option<StepReport> {
        let _gate = self.gate.lock().await;
        if !self.is_current(epoch) {
            return None;
        }
        let index = self.cursor();
        let step = self.step_at(index)?;

        tracing::debug!(index, commands = step.commands.len(), "step");
        let report = self
            .interpreter
            .execute(&step.commands, Pacing::Realtime)
            .await;
        self.cursor.set(index + 1);
        self.publish();

        let mut rx = self.epoch.subscribe();
        let tail = async {
            if let Some(text) = step.narration() {
                self.narration.speak(text).await;
            }
            tokio::time::sleep(step.dwell(self.speed())).await;
        };
        tokio::select! {
            () = tail => {}
            _ = rx.wait_for(|e| *e != epoch) => {}
        }
        Some(report)
    }

    /// Reset the scene, apply the setup and replay steps `0..index` instantly.
    /// Caller holds the gate.
    async fn rebuild_locked(&self, index: usize) -> StepReport {
        self.interpreter.reset();
        let (setup, replay) = {
            let timeline = self.timeline.borrow();
            let end = index.min(timeline.len());
            (timeline.setup.clone(), timeline.steps[..end].to_vec())
        };

        let mut report = self.interpreter.execute(&setup, Pacing::Instant).await;
        for step in &replay {
            report.merge(self.interpreter.execute(&step.commands, Pacing::Instant).await);
        }
        self.cursor.set(replay.len());
        tracing::debug!(cursor = replay.len(), "rebuilt scene");
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
