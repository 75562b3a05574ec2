//! Session configurator.
//!
//! Collects the user's choices for one workout attempt and checks them
//! against fixed bounds. Out-of-range values are rejected, never clamped.

use crate::config::SessionDefaults;
use crate::schema::{Issue, ValidationErrors};
use crate::{Plan, Result, WorkoutMode};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const ROUNDS_RANGE: RangeInclusive<u32> = 1..=10;
pub const REPS_RANGE: RangeInclusive<u32> = 1..=30;
pub const REST_RANGE: RangeInclusive<u32> = 5..=120;
pub const TIME_PER_REP_RANGE: RangeInclusive<u32> = 1..=60;

/// User-chosen parameters for one session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Names of the exercises to perform; a subset of the plan's
    pub selected_exercises: Vec<String>,
    pub rounds: u32,
    pub reps_per_exercise: u32,
    /// Seconds of rest between exercise/round transitions
    pub rest_period: u32,
    /// Seconds per repetition
    pub time_per_rep: u32,
    pub workout_mode: WorkoutMode,
    /// Cosmetic motivational overlay; never affects progression
    #[serde(default)]
    pub zyzz_mode: bool,
}

impl SessionConfig {
    /// Every exercise selected, other values from `defaults`
    pub fn for_plan(plan: &Plan, defaults: &SessionDefaults) -> Self {
        Self {
            selected_exercises: plan.exercise_names(),
            rounds: defaults.rounds,
            reps_per_exercise: defaults.reps_per_exercise,
            rest_period: defaults.rest_period,
            time_per_rep: defaults.time_per_rep,
            workout_mode: defaults.workout_mode,
            zyzz_mode: false,
        }
    }

    /// Check every field, reporting all problems at once
    pub fn validate(&self, plan: &Plan) -> std::result::Result<(), ValidationErrors> {
        let mut issues = Vec::new();

        if self.selected_exercises.is_empty() {
            issues.push(Issue::new(
                "selectedExercises",
                "Please select at least one exercise",
            ));
        }
        for (i, name) in self.selected_exercises.iter().enumerate() {
            if plan.exercise(name).is_none() {
                issues.push(Issue::new(
                    format!("selectedExercises.{}", i),
                    format!("'{}' is not an exercise in this workout", name),
                ));
            }
        }

        check_range(&mut issues, "rounds", "Rounds", self.rounds, &ROUNDS_RANGE);
        check_range(
            &mut issues,
            "repsPerExercise",
            "Reps per exercise",
            self.reps_per_exercise,
            &REPS_RANGE,
        );
        check_range(
            &mut issues,
            "restPeriod",
            "Rest period",
            self.rest_period,
            &REST_RANGE,
        );
        check_range(
            &mut issues,
            "timePerRep",
            "Time per rep",
            self.time_per_rep,
            &TIME_PER_REP_RANGE,
        );

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { issues })
        }
    }

    /// Consume the config, returning it only if valid for `plan`
    pub fn validated(self, plan: &Plan) -> Result<Self> {
        self.validate(plan)?;
        Ok(self)
    }
}

fn check_range(
    issues: &mut Vec<Issue>,
    path: &str,
    label: &str,
    value: u32,
    range: &RangeInclusive<u32>,
) {
    if !range.contains(&value) {
        issues.push(Issue::new(
            path,
            format!(
                "{} must be between {} and {}",
                label,
                range.start(),
                range.end()
            ),
        ));
    }
}
