//! Bridge to an external AI chat service.
//!
//! No API is called. We format a request the user pastes into a chat
//! service, and accept the JSON it answers with.

use crate::schema::validate_plan_value;
use crate::storage::Storage;
use crate::store::PlanStore;
use crate::{Error, Level, Plan, Result};
use serde::{Deserialize, Serialize};

/// Base URL of the chat service deep link
pub const CHAT_BASE_URL: &str = "https://chat.openai.com/";

pub const DEFAULT_DURATION: &str = "15-20";

/// Muscle areas a generated plan may focus on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FocusArea {
    FullBody,
    UpperBody,
    LowerBody,
    Core,
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Glutes,
}

impl FocusArea {
    /// All options, in the order they are presented
    pub const ALL: [FocusArea; 10] = [
        FocusArea::FullBody,
        FocusArea::UpperBody,
        FocusArea::LowerBody,
        FocusArea::Core,
        FocusArea::Chest,
        FocusArea::Back,
        FocusArea::Shoulders,
        FocusArea::Arms,
        FocusArea::Legs,
        FocusArea::Glutes,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FocusArea::FullBody => "fullBody",
            FocusArea::UpperBody => "upperBody",
            FocusArea::LowerBody => "lowerBody",
            FocusArea::Core => "core",
            FocusArea::Chest => "chest",
            FocusArea::Back => "back",
            FocusArea::Shoulders => "shoulders",
            FocusArea::Arms => "arms",
            FocusArea::Legs => "legs",
            FocusArea::Glutes => "glutes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::FullBody => "Full Body",
            FocusArea::UpperBody => "Upper Body",
            FocusArea::LowerBody => "Lower Body",
            FocusArea::Core => "Core / Abs",
            FocusArea::Chest => "Chest",
            FocusArea::Back => "Back",
            FocusArea::Shoulders => "Shoulders",
            FocusArea::Arms => "Arms",
            FocusArea::Legs => "Legs",
            FocusArea::Glutes => "Glutes",
        }
    }

    pub fn from_id(id: &str) -> Option<FocusArea> {
        FocusArea::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// Equipment the user has available
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Equipment {
    None,
    Dumbbells,
    ResistanceBands,
    Kettlebell,
    PullupBar,
    Bench,
}

impl Equipment {
    pub const ALL: [Equipment; 6] = [
        Equipment::None,
        Equipment::Dumbbells,
        Equipment::ResistanceBands,
        Equipment::Kettlebell,
        Equipment::PullupBar,
        Equipment::Bench,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Equipment::None => "none",
            Equipment::Dumbbells => "dumbbells",
            Equipment::ResistanceBands => "resistanceBands",
            Equipment::Kettlebell => "kettlebell",
            Equipment::PullupBar => "pullupBar",
            Equipment::Bench => "bench",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Equipment::None => "No Equipment / Bodyweight",
            Equipment::Dumbbells => "Dumbbells",
            Equipment::ResistanceBands => "Resistance Bands",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::PullupBar => "Pull-up Bar",
            Equipment::Bench => "Bench",
        }
    }

    pub fn from_id(id: &str) -> Option<Equipment> {
        Equipment::ALL.into_iter().find(|e| e.id() == id)
    }
}

/// User choices that go into the generation request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Minutes, as free text ("15-20")
    pub duration: String,
    pub level: Level,
    pub focus_areas: Vec<FocusArea>,
    pub equipment: Vec<Equipment>,
    pub notes: Option<String>,
}

impl Default for PromptRequest {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            duration: DEFAULT_DURATION.to_string(),
            level: Level::Beginner,
            focus_areas: Vec::new(),
            equipment: Vec::new(),
            notes: None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Labels of the selected options, in option order, comma separated
fn labels<T: Copy + PartialEq>(all: &[T], selected: &[T], label: fn(&T) -> &'static str) -> String {
    all.iter()
        .filter(|o| selected.contains(o))
        .map(label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the natural-language request. Pure formatting, no validation.
pub fn build_prompt(request: &PromptRequest) -> String {
    let muscles = labels(&FocusArea::ALL, &request.focus_areas, FocusArea::label);
    let equipment = labels(&Equipment::ALL, &request.equipment, Equipment::label);

    let title = non_blank(&request.title).unwrap_or("[Generate an appropriate title]");
    let description = non_blank(&request.description).unwrap_or("[Generate a brief description]");
    let muscles = if muscles.is_empty() { "Full Body" } else { muscles.as_str() };
    let equipment = if equipment.is_empty() {
        "No equipment (bodyweight only)"
    } else {
        equipment.as_str()
    };
    let notes = non_blank(&request.notes)
        .map(|n| format!("- Additional Notes: {}", n))
        .unwrap_or_default();
    let duration = &request.duration;
    let level = request.level;

    format!(
        r#"I need you to create a workout plan with the following specifications and return ONLY a JSON object in the exact format specified below, with no additional text, explanation, or markdown formatting.

Requirements:
- Title: {title}
- Description: {description}
- Duration: {duration} minutes
- Fitness Level: {level}
- Target Muscle Areas: {muscles}
- Available Equipment: {equipment}
{notes}

The workout should include exercises that can be completed within the specified time frame and are appropriate for the fitness level indicated. Each exercise should have clear instructions and at least one YouTube video URL demonstration.

RESPONSE FORMAT: Return ONLY the JSON object below with appropriate values filled in. No other text should be included in your response.

{{
  "id": "unique-workout-id",
  "title": "Workout Title",
  "description": "Brief description",
  "level": "{level}",
  "duration": "{duration} min",
  "instructions": {{
    "rounds": "Number of rounds (e.g., 2-3 rounds)",
    "reps": "Repetitions per exercise (e.g., 8-12 reps)",
    "rest": "Rest duration between exercises (e.g., 30-45 seconds)"
  }},
  "exercises": [
    {{
      "name": "Exercise Name",
      "targetMuscles": ["Primary Muscle", "Secondary Muscle"],
      "videoUrls": ["YouTube URL for demonstration"],
      "instructions": [
        "Step 1 of the exercise",
        "Step 2 of the exercise",
        "Step 3 of the exercise"
      ],
      "altering": false
    }}
  ]
}}

IMPORTANT: Your entire response must contain only the JSON above with no other text, commentary, or explanations. I need only machine-parseable JSON. Return it as a code block.
"#
    )
}

/// Deep link that opens the chat service with the prompt prefilled
pub fn chat_url(prompt: &str) -> String {
    format!(
        "{}?model=gpt-4o-mini&q={}&temporary-chat=true",
        CHAT_BASE_URL,
        urlencoding::encode(prompt)
    )
}

/// Parse and validate pasted text as a plan without storing it
pub fn parse_plan(raw: &str) -> Result<Plan> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        tracing::debug!("Pasted workout is not JSON: {}", e);
        Error::Format(
            "Invalid JSON format. Please paste the complete JSON response from the chat."
                .to_string(),
        )
    })?;

    Ok(validate_plan_value(&value)?)
}

/// Parse, validate and store a pasted plan.
///
/// Returns the plan as stored; its id may differ if the pasted id was taken.
pub fn import_plan<S: Storage>(store: &mut PlanStore<S>, raw: &str) -> Result<Plan> {
    let plan = match parse_plan(raw) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::info!("Rejected pasted workout: {}", e);
            return Err(e);
        }
    };
    store.add(plan)
}
