//! Core domain types for nextworkout.
//!
//! This module defines the data shapes shared by every other module:
//! - Plans and their exercises (the JSON shape an AI is asked to produce)
//! - Difficulty levels
//! - Sequencing modes for a session

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Plan Types
// ============================================================================

/// Difficulty level of a plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    /// Parse the lowercase wire name
    pub fn parse(s: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text guidance shown alongside a plan; never used in calculations
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanInstructions {
    pub rounds: String,
    pub reps: String,
    pub rest: String,
}

/// One movement within a plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub target_muscles: Vec<String>,
    pub video_urls: Vec<String>,
    pub instructions: Vec<String>,
    /// Alternates sides per repetition; doubles the rep target at runtime
    #[serde(default)]
    pub altering: bool,
}

impl Exercise {
    /// Platform video ids for every reference that resolves to one
    pub fn video_ids(&self) -> Vec<String> {
        self.video_urls
            .iter()
            .filter_map(|url| crate::media::resolve_video_id(url))
            .collect()
    }
}

/// A complete workout plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: Level,
    /// Display string such as "15-20 min"
    pub duration: String,
    pub instructions: PlanInstructions,
    pub exercises: Vec<Exercise>,
}

impl Plan {
    /// Find an exercise by name
    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name == name)
    }

    /// Names of every exercise, in plan order
    pub fn exercise_names(&self) -> Vec<String> {
        self.exercises.iter().map(|e| e.name.clone()).collect()
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// How exercises and rounds are sequenced during a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutMode {
    /// All rounds of one exercise before moving to the next
    #[default]
    StraightSets,
    /// One pass over every exercise per round
    Circuit,
}

impl WorkoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutMode::StraightSets => "straight-sets",
            WorkoutMode::Circuit => "circuit",
        }
    }

    pub fn parse(s: &str) -> Option<WorkoutMode> {
        match s {
            "straight-sets" => Some(WorkoutMode::StraightSets),
            "circuit" => Some(WorkoutMode::Circuit),
            _ => None,
        }
    }

    /// What a "round" is called in this mode
    pub fn round_label(&self) -> &'static str {
        match self {
            WorkoutMode::StraightSets => "Set",
            WorkoutMode::Circuit => "Round",
        }
    }
}

impl fmt::Display for WorkoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
