//! Session driver: owns one running session and fires its cues.
//!
//! The engine is pure; the driver holds the current state, feeds events
//! through [`transition`], and hands every resulting cue to a [`CueSink`].
//! A failing sink never stops the session.

use crate::engine::{
    next_exercise, progress, transition, Cue, Event, Phase, Progress, Session, SessionState,
};
use crate::{Result, WorkoutMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Receives sound and video cues as the session moves
pub trait CueSink {
    fn play(&mut self, cue: &Cue) -> Result<()>;
}

/// Discards every cue (audio disabled)
#[derive(Debug, Default)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play(&mut self, _cue: &Cue) -> Result<()> {
        Ok(())
    }
}

/// What happened during one session, available once it ends
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub plan_id: String,
    pub plan_title: String,
    pub workout_mode: WorkoutMode,
    pub rounds: u32,
    pub exercises: usize,
    /// Ran to Complete rather than being exited
    pub completed: bool,
    pub completed_reps: u32,
    pub total_reps: u32,
    /// Ticks delivered, including warm-up and paused ones
    pub elapsed_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct SessionDriver<C: CueSink> {
    session: Session,
    state: SessionState,
    sink: C,
    started_at: DateTime<Utc>,
    ticks: u64,
}

impl<C: CueSink> SessionDriver<C> {
    /// Enter the warm-up countdown and play the start cue
    pub fn start(session: Session, sink: C) -> Self {
        let initial = SessionState::start(&session);
        tracing::info!(
            "Starting '{}': {} exercises, {} {} mode",
            session.plan().title,
            session.selected().len(),
            session.config().rounds,
            session.config().workout_mode
        );

        let mut driver = Self {
            session,
            state: initial.state,
            sink,
            started_at: Utc::now(),
            ticks: 0,
        };
        driver.deliver(&initial.cues);
        driver
    }

    /// One second elapsed
    pub fn tick(&mut self) -> Result<()> {
        self.ticks += 1;
        self.apply(Event::Tick)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.apply(Event::Pause)
    }

    pub fn resume(&mut self) -> Result<()> {
        self.apply(Event::Resume)
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> Result<()> {
        if self.state.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn skip(&mut self) -> Result<()> {
        self.apply(Event::Skip)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn progress(&self) -> Progress {
        progress(&self.session, &self.state)
    }

    pub fn next_exercise(&self) -> Option<usize> {
        next_exercise(&self.session, &self.state)
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == Phase::Complete
    }

    /// Sink access, mostly for inspecting recorded cues
    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// End the session (complete or exited) and discard its state
    pub fn finish(self) -> SessionSummary {
        let progress = self.progress();
        let config = self.session.config();
        let completed = self.is_complete();

        if completed {
            tracing::info!("Workout '{}' complete", self.session.plan().id);
        } else {
            tracing::info!(
                "Workout '{}' exited at {:.0}%",
                self.session.plan().id,
                progress.percent
            );
        }

        SessionSummary {
            id: Uuid::new_v4(),
            plan_id: self.session.plan().id.clone(),
            plan_title: self.session.plan().title.clone(),
            workout_mode: config.workout_mode,
            rounds: config.rounds,
            exercises: self.session.selected().len(),
            completed,
            completed_reps: progress.completed_reps,
            total_reps: progress.total_reps,
            elapsed_seconds: self.ticks,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }

    fn apply(&mut self, event: Event) -> Result<()> {
        let result = transition(&self.session, &self.state, event)?;

        if result.state.phase != self.state.phase {
            tracing::debug!(
                "{} -> {} (exercise {}, {} {}, rep {})",
                self.state.phase,
                result.state.phase,
                result.state.exercise,
                self.session.config().workout_mode.round_label(),
                result.state.round,
                result.state.rep
            );
        }

        self.state = result.state;
        self.deliver(&result.cues);
        Ok(())
    }

    fn deliver(&mut self, cues: &[Cue]) {
        for cue in cues {
            if let Err(e) = self.sink.play(cue) {
                tracing::warn!("Failed to play {:?}: {}", cue, e);
            }
        }
    }
}
