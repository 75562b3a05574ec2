//! Session engine: the countdown state machine behind a guided workout.
//!
//! The engine is a pure function from `(state, event)` to a new state plus
//! the side-effect cues (sounds, video control) the caller should fire. It
//! owns no timer; whoever drives it delivers one [`Event::Tick`] per second.
//!
//! ## Phases
//!
//! 1. **Warmup**: fixed 10 second countdown, cannot be paused
//! 2. **Active**: performing reps of the current exercise
//! 3. **Rest**: timed pause between exercise/round transitions
//! 4. **Complete**: terminal
//!
//! When a phase timer reaches zero the zero stays visible for one more tick
//! before the phase advances. The first rep of every exercise (and of every
//! round) also lingers for one extra rep period before the counter moves.

use crate::setup::SessionConfig;
use crate::{Error, Plan, Result, WorkoutMode};
use serde::Serialize;
use std::fmt;

/// Length of the pre-session countdown, in ticks
pub const WARMUP_SECONDS: u32 = 10;

/// Immutable inputs of one workout attempt
#[derive(Clone, Debug)]
pub struct Session {
    plan: Plan,
    config: SessionConfig,
    /// Plan indices of the selected exercises, in plan order
    selected: Vec<usize>,
}

impl Session {
    /// Validate `config` against `plan` and fix the exercise order.
    pub fn new(plan: Plan, config: SessionConfig) -> Result<Self> {
        let config = config.validated(&plan)?;

        let selected: Vec<usize> = plan
            .exercises
            .iter()
            .enumerate()
            .filter(|(_, ex)| config.selected_exercises.contains(&ex.name))
            .map(|(i, _)| i)
            .collect();

        if selected.is_empty() {
            return Err(Error::Precondition(
                "No selected exercise matches this workout".to_string(),
            ));
        }

        Ok(Self {
            plan,
            config,
            selected,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Plan indices of the selected exercises
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Reps needed to finish `exercise` once; alternating movements count
    /// each side separately.
    pub fn required_reps(&self, exercise: usize) -> u32 {
        let altering = self
            .plan
            .exercises
            .get(exercise)
            .is_some_and(|ex| ex.altering);
        if altering {
            self.config.reps_per_exercise * 2
        } else {
            self.config.reps_per_exercise
        }
    }

    pub fn total_target_reps(&self) -> u32 {
        self.config.rounds * self.selected.len() as u32 * self.config.reps_per_exercise
    }

    /// Position of a plan index within the selection
    fn slot(&self, exercise: usize) -> usize {
        self.selected
            .iter()
            .position(|&i| i == exercise)
            .unwrap_or(0)
    }

    fn first(&self) -> usize {
        self.selected[0]
    }

    fn after(&self, exercise: usize) -> Option<usize> {
        self.selected.get(self.slot(exercise) + 1).copied()
    }
}

/// Where the session currently is
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warmup,
    Active,
    Rest,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Warmup => "Get Ready",
            Phase::Active => "Active",
            Phase::Rest => "Rest",
            Phase::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// Runtime state of one session. Only the engine produces these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    /// Index into the plan's exercise list (not the selection)
    pub exercise: usize,
    pub round: u32,
    pub rep: u32,
    /// Seconds left in the current phase
    pub remaining: u32,
    pub paused: bool,
    /// First-rep grace already consumed for this exercise/round
    pub rep_started: bool,
}

/// Inputs to the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// One second elapsed
    Tick,
    Pause,
    Resume,
    /// Count the current rep as done (only while Active)
    Skip,
}

/// Audio cues
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    /// Warm-up countdown started
    Start,
    /// First exercise begins
    Begin,
    /// Entering a rest period
    Rest,
    /// Rest is over
    RestOver,
    /// Workout finished
    Done,
}

/// Side effects requested by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Sound(Sound),
    /// Show and loop the demonstration video for this plan index
    PlayVideo { exercise: usize },
    PauseVideo,
    ResumeVideo,
}

/// Result of applying an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub cues: Vec<Cue>,
}

impl Transition {
    fn unchanged(state: &SessionState) -> Self {
        Self {
            state: state.clone(),
            cues: Vec::new(),
        }
    }
}

impl SessionState {
    /// Fresh state at the start of the warm-up countdown
    pub fn start(session: &Session) -> Transition {
        Transition {
            state: SessionState {
                phase: Phase::Warmup,
                exercise: session.first(),
                round: 1,
                rep: 1,
                remaining: WARMUP_SECONDS,
                paused: false,
                rep_started: false,
            },
            cues: vec![Cue::Sound(Sound::Start)],
        }
    }
}

/// Apply one event.
///
/// Events the current phase forbids return [`Error::Precondition`] and
/// leave the state untouched.
pub fn transition(session: &Session, state: &SessionState, event: Event) -> Result<Transition> {
    match event {
        Event::Tick => Ok(tick(session, state)),
        Event::Pause => pause(state),
        Event::Resume => Ok(resume(state)),
        Event::Skip => skip(session, state),
    }
}

fn tick(session: &Session, state: &SessionState) -> Transition {
    let mut next = state.clone();
    let mut cues = Vec::new();

    match state.phase {
        Phase::Complete => {}
        Phase::Warmup => {
            if state.remaining <= 1 {
                begin(session, &mut next, &mut cues);
            } else {
                next.remaining -= 1;
            }
        }
        _ if state.paused => {}
        _ if state.remaining > 0 => next.remaining -= 1,
        Phase::Active => advance_active(session, &mut next, &mut cues),
        Phase::Rest => resume_active(session, &mut next, &mut cues),
    }

    Transition { state: next, cues }
}

fn begin(session: &Session, state: &mut SessionState, cues: &mut Vec<Cue>) {
    state.phase = Phase::Active;
    state.exercise = session.first();
    state.round = 1;
    state.rep = 1;
    state.remaining = session.config.time_per_rep;
    state.paused = false;
    state.rep_started = false;

    cues.push(Cue::Sound(Sound::Begin));
    cues.push(Cue::PlayVideo {
        exercise: state.exercise,
    });
}

/// The active rep timer ran out (or the last rep was skipped)
fn advance_active(session: &Session, state: &mut SessionState, cues: &mut Vec<Cue>) {
    let config = &session.config;

    if state.rep < session.required_reps(state.exercise) {
        if !state.rep_started {
            state.rep_started = true;
        } else {
            state.rep += 1;
        }
        state.remaining = config.time_per_rep;
        return;
    }

    cues.push(Cue::Sound(Sound::Rest));

    let next_exercise = session.after(state.exercise);

    match config.workout_mode {
        WorkoutMode::StraightSets => {
            if state.round < config.rounds {
                state.round += 1;
                enter_rest(session, state);
            } else if let Some(next) = next_exercise {
                state.exercise = next;
                state.round = 1;
                enter_rest(session, state);
            } else {
                complete(state, cues);
            }
        }
        WorkoutMode::Circuit => {
            if let Some(next) = next_exercise {
                state.exercise = next;
                enter_rest(session, state);
            } else if state.round < config.rounds {
                state.round += 1;
                state.exercise = session.first();
                enter_rest(session, state);
            } else {
                complete(state, cues);
            }
        }
    }
}

fn enter_rest(session: &Session, state: &mut SessionState) {
    state.rep = 1;
    state.phase = Phase::Rest;
    state.remaining = session.config.rest_period;
}

fn complete(state: &mut SessionState, cues: &mut Vec<Cue>) {
    cues.push(Cue::Sound(Sound::Done));
    state.phase = Phase::Complete;
    state.remaining = 0;
}

/// The rest timer ran out
fn resume_active(session: &Session, state: &mut SessionState, cues: &mut Vec<Cue>) {
    cues.push(Cue::Sound(Sound::RestOver));
    cues.push(Cue::PlayVideo {
        exercise: state.exercise,
    });
    state.phase = Phase::Active;
    state.remaining = session.config.time_per_rep;
    state.rep_started = false;
}

fn pause(state: &SessionState) -> Result<Transition> {
    match state.phase {
        Phase::Warmup => Err(Error::Precondition(
            "The warm-up countdown cannot be paused".to_string(),
        )),
        Phase::Complete => Err(Error::Precondition(
            "The workout is already complete".to_string(),
        )),
        _ if state.paused => Ok(Transition::unchanged(state)),
        _ => {
            let mut next = state.clone();
            next.paused = true;
            Ok(Transition {
                state: next,
                cues: vec![Cue::PauseVideo],
            })
        }
    }
}

fn resume(state: &SessionState) -> Transition {
    if !state.paused {
        return Transition::unchanged(state);
    }
    let mut next = state.clone();
    next.paused = false;
    Transition {
        state: next,
        cues: vec![Cue::ResumeVideo],
    }
}

fn skip(session: &Session, state: &SessionState) -> Result<Transition> {
    if state.phase != Phase::Active {
        return Err(Error::Precondition(format!(
            "Skip is only available during an exercise (currently {})",
            state.phase
        )));
    }

    let required = session.required_reps(state.exercise);
    let mut next = state.clone();
    let mut cues = Vec::new();

    if state.rep >= required {
        advance_active(session, &mut next, &mut cues);
    } else {
        next.rep = (state.rep + 1).min(required);
        next.remaining = session.config.time_per_rep;
    }

    Ok(Transition { state: next, cues })
}

// ============================================================================
// Derived views
// ============================================================================

/// Rep-based completion, recomputed from state on demand
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Progress {
    pub completed_reps: u32,
    pub total_reps: u32,
    /// 0..=100
    pub percent: f64,
}

/// Reps credited so far.
///
/// Fully finished exercises (straight sets) or rounds (circuit) count in
/// full; the rep in progress does not count yet.
pub fn progress(session: &Session, state: &SessionState) -> Progress {
    let total = session.total_target_reps();

    if state.phase == Phase::Complete {
        return Progress {
            completed_reps: total,
            total_reps: total,
            percent: 100.0,
        };
    }

    let config = &session.config;
    let reps = config.reps_per_exercise;
    let exercises = session.selected.len() as u32;
    let slot = session.slot(state.exercise) as u32;
    let current = current_rep_credit(session, state);

    let completed = match config.workout_mode {
        WorkoutMode::StraightSets => {
            slot * config.rounds * reps + (state.round - 1) * reps + current
        }
        WorkoutMode::Circuit => (state.round - 1) * exercises * reps + slot * reps + current,
    };

    let percent = if total == 0 {
        0.0
    } else {
        (completed as f64 / total as f64 * 100.0).min(100.0)
    };

    Progress {
        completed_reps: completed,
        total_reps: total,
        percent,
    }
}

/// Reps of the in-progress exercise credited toward `completed_reps`.
///
/// Alternating exercises run twice the configured reps (one per side) but
/// the total counts them at the configured target, so a left+right pair
/// credits one rep: `(rep - 1) / 2`. Crediting every raw rep here would
/// overshoot the total and make progress jump backwards at the next
/// exercise.
fn current_rep_credit(session: &Session, state: &SessionState) -> u32 {
    let done = state.rep.saturating_sub(1);
    if session.required_reps(state.exercise) > session.config.reps_per_exercise {
        done / 2
    } else {
        done
    }
}

/// Plan index of the exercise that comes next, without changing state.
///
/// During rest the upcoming exercise is already current. `None` at the end
/// of the workout and outside Active/Rest.
pub fn next_exercise(session: &Session, state: &SessionState) -> Option<usize> {
    let config = &session.config;

    match state.phase {
        Phase::Rest => Some(state.exercise),
        Phase::Active => match config.workout_mode {
            WorkoutMode::StraightSets => {
                if state.round < config.rounds {
                    Some(state.exercise)
                } else {
                    session.after(state.exercise)
                }
            }
            WorkoutMode::Circuit => session.after(state.exercise).or_else(|| {
                (state.round < config.rounds).then(|| session.first())
            }),
        },
        Phase::Warmup | Phase::Complete => None,
    }
}
