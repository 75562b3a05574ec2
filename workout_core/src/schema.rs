//! Plan schema validation.
//!
//! Pasted plans arrive as arbitrary JSON. Validation walks the whole value
//! and collects every violation with its dotted path instead of stopping at
//! the first one, so the user can fix everything in a single edit.

use crate::media::is_valid_url;
use crate::types::{Level, Plan};
use serde_json::{Map, Value};
use std::fmt;

/// A single schema violation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    /// Dotted path to the offending field, e.g. `exercises.0.videoUrls.1`
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every issue found while validating one value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub issues: Vec<Issue>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Paths of all issues, in discovery order
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.path.as_str()).collect()
    }

    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(Issue::new(path, message));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed:")?;
        for issue in &self.issues {
            write!(f, "\n{}", issue)?;
        }
        Ok(())
    }
}

/// Validate an arbitrary JSON value against the plan schema.
///
/// On success the typed plan is returned; otherwise every issue found.
pub fn validate_plan_value(value: &Value) -> Result<Plan, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(obj) = value.as_object() else {
        errors.push("", expected("object", value));
        return Err(errors);
    };

    non_empty_string(obj, "id", "id", "Workout ID is required", &mut errors);
    non_empty_string(obj, "title", "title", "Title is required", &mut errors);
    non_empty_string(
        obj,
        "description",
        "description",
        "Description is required",
        &mut errors,
    );
    level(obj, &mut errors);
    non_empty_string(obj, "duration", "duration", "Duration is required", &mut errors);
    instructions(obj, &mut errors);
    exercises(obj, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(value.clone()).map_err(|e| {
        let mut errors = ValidationErrors::default();
        errors.push("", e.to_string());
        errors
    })
}

/// Validate an already-typed plan by checking its exported JSON shape
pub fn validate_plan(plan: &Plan) -> Result<(), ValidationErrors> {
    let value = serde_json::to_value(plan).map_err(|e| {
        let mut errors = ValidationErrors::default();
        errors.push("", e.to_string());
        errors
    })?;
    validate_plan_value(&value).map(|_| ())
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(want: &str, got: &Value) -> String {
    format!("Expected {}, received {}", want, type_name(got))
}

fn non_empty_string(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    empty_message: &str,
    errors: &mut ValidationErrors,
) {
    match obj.get(key) {
        None => errors.push(path, "Required"),
        Some(Value::String(s)) if s.is_empty() => errors.push(path, empty_message),
        Some(Value::String(_)) => {}
        Some(other) => errors.push(path, expected("string", other)),
    }
}

fn level(obj: &Map<String, Value>, errors: &mut ValidationErrors) {
    match obj.get("level") {
        None => errors.push("level", "Required"),
        Some(Value::String(s)) if Level::parse(s).is_some() => {}
        Some(_) => errors.push(
            "level",
            "Level must be beginner, intermediate, or advanced",
        ),
    }
}

fn instructions(obj: &Map<String, Value>, errors: &mut ValidationErrors) {
    match obj.get("instructions") {
        None => errors.push("instructions", "Required"),
        Some(Value::Object(inner)) => {
            for (key, message) in [
                ("rounds", "Rounds information is required"),
                ("reps", "Reps information is required"),
                ("rest", "Rest information is required"),
            ] {
                non_empty_string(inner, key, &join("instructions", key), message, errors);
            }
        }
        Some(other) => errors.push("instructions", expected("object", other)),
    }
}

fn exercises(obj: &Map<String, Value>, errors: &mut ValidationErrors) {
    let list = match obj.get("exercises") {
        None => return errors.push("exercises", "Required"),
        Some(Value::Array(list)) => list,
        Some(other) => return errors.push("exercises", expected("array", other)),
    };

    if list.is_empty() {
        errors.push("exercises", "At least one exercise is required");
    }

    for (i, item) in list.iter().enumerate() {
        let base = join("exercises", &i.to_string());
        let Some(ex) = item.as_object() else {
            errors.push(&base, expected("object", item));
            continue;
        };

        non_empty_string(
            ex,
            "name",
            &join(&base, "name"),
            "Exercise name is required",
            errors,
        );
        string_list(
            ex,
            "targetMuscles",
            &base,
            "At least one target muscle is required",
            false,
            errors,
        );
        string_list(
            ex,
            "videoUrls",
            &base,
            "At least one video URL is required",
            true,
            errors,
        );
        string_list(
            ex,
            "instructions",
            &base,
            "At least one instruction is required",
            false,
            errors,
        );

        match ex.get("altering") {
            None | Some(Value::Bool(_)) => {}
            Some(other) => errors.push(&join(&base, "altering"), expected("boolean", other)),
        }
    }
}

fn string_list(
    obj: &Map<String, Value>,
    key: &str,
    base: &str,
    empty_message: &str,
    urls: bool,
    errors: &mut ValidationErrors,
) {
    let path = join(base, key);
    let list = match obj.get(key) {
        None => return errors.push(&path, "Required"),
        Some(Value::Array(list)) => list,
        Some(other) => return errors.push(&path, expected("array", other)),
    };

    if list.is_empty() {
        errors.push(&path, empty_message);
    }

    for (i, item) in list.iter().enumerate() {
        let item_path = join(&path, &i.to_string());
        match item {
            Value::String(s) if urls && !is_valid_url(s) => {
                errors.push(&item_path, "Must be a valid URL")
            }
            Value::String(_) => {}
            other => errors.push(&item_path, expected("string", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_plan_json() -> Value {
        json!({
            "id": "quick-core",
            "title": "Quick Core",
            "description": "Ten minutes of core work",
            "level": "intermediate",
            "duration": "10 min",
            "instructions": {
                "rounds": "2 rounds",
                "reps": "10 reps",
                "rest": "20 seconds"
            },
            "exercises": [{
                "name": "Russian Twists",
                "targetMuscles": ["Core"],
                "videoUrls": ["https://www.youtube.com/watch?v=Tau0hsW8iR0"],
                "instructions": ["Twist"],
                "altering": true
            }]
        })
    }

    #[test]
    fn test_valid_plan_passes() {
        let plan = validate_plan_value(&valid_plan_json()).unwrap();
        assert_eq!(plan.id, "quick-core");
        assert_eq!(plan.level, Level::Intermediate);
        assert!(plan.exercises[0].altering);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = validate_plan_value(&json!({"id": "x"})).unwrap_err();
        assert_eq!(
            errors.paths(),
            vec![
                "title",
                "description",
                "level",
                "duration",
                "instructions",
                "exercises"
            ]
        );
        assert!(errors.issues.iter().all(|i| i.message == "Required"));
    }

    #[test]
    fn test_nested_paths() {
        let mut value = valid_plan_json();
        value["instructions"]["rest"] = json!("");
        value["exercises"][0]["videoUrls"] = json!(["https://youtu.be/Tau0hsW8iR0", "nope"]);
        value["exercises"][0]["targetMuscles"] = json!([]);
        value["level"] = json!("expert");

        let errors = validate_plan_value(&value).unwrap_err();
        let rendered = errors.to_string();

        assert!(rendered.starts_with("Validation failed:"));
        assert!(rendered.contains("level: Level must be beginner, intermediate, or advanced"));
        assert!(rendered.contains("instructions.rest: Rest information is required"));
        assert!(rendered
            .contains("exercises.0.targetMuscles: At least one target muscle is required"));
        assert!(rendered.contains("exercises.0.videoUrls.1: Must be a valid URL"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_wrong_types() {
        let errors = validate_plan_value(&json!({
            "id": 7,
            "title": "t",
            "description": "d",
            "level": "beginner",
            "duration": "5",
            "instructions": "none",
            "exercises": {}
        }))
        .unwrap_err();

        assert_eq!(
            errors.issues[0],
            Issue::new("id", "Expected string, received number")
        );
        assert_eq!(
            errors.issues[1],
            Issue::new("instructions", "Expected object, received string")
        );
        assert_eq!(
            errors.issues[2],
            Issue::new("exercises", "Expected array, received object")
        );
    }

    #[test]
    fn test_empty_exercise_list() {
        let mut value = valid_plan_json();
        value["exercises"] = json!([]);
        let errors = validate_plan_value(&value).unwrap_err();
        assert_eq!(
            errors.issues,
            vec![Issue::new("exercises", "At least one exercise is required")]
        );
    }

    #[test]
    fn test_non_object_root() {
        let errors = validate_plan_value(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.issues[0].message, "Expected object, received array");
    }

    #[test]
    fn test_exported_plan_revalidates() {
        let plan = validate_plan_value(&valid_plan_json()).unwrap();
        assert!(validate_plan(&plan).is_ok());

        for builtin in crate::catalog::builtin_plans() {
            assert!(validate_plan(builtin).is_ok(), "{} failed", builtin.id);
        }
    }
}
