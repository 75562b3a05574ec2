//! Built-in workout plans.
//!
//! These ship with the binary, always list before user-imported plans, and
//! can never be deleted.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached built-in plans - built once and reused across all operations
static BUILTIN_PLANS: Lazy<Vec<Plan>> = Lazy::new(build_builtin_plans);

/// Get the built-in plans, in display order
pub fn builtin_plans() -> &'static [Plan] {
    &BUILTIN_PLANS
}

/// Find a built-in plan by id
pub fn builtin_plan(id: &str) -> Option<&'static Plan> {
    BUILTIN_PLANS.iter().find(|p| p.id == id)
}

/// Whether `id` belongs to a built-in plan
pub fn is_builtin(id: &str) -> bool {
    builtin_plan(id).is_some()
}

fn exercise(
    name: &str,
    target_muscles: &[&str],
    video_urls: &[&str],
    instructions: &[&str],
    altering: bool,
) -> Exercise {
    Exercise {
        name: name.into(),
        target_muscles: owned(target_muscles),
        video_urls: owned(video_urls),
        instructions: owned(instructions),
        altering,
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_builtin_plans() -> Vec<Plan> {
    vec![Plan {
        id: "full-body-beginner".into(),
        title: "Full-Body Beginner Dumbbell Workout".into(),
        description: "Perfect for beginners looking for an effective, low-noise workout".into(),
        level: Level::Beginner,
        duration: "15-20 min".into(),
        instructions: PlanInstructions {
            rounds: "2–3 rounds".into(),
            reps: "8–12 per exercise (per side for alternating moves)".into(),
            rest: "20–30 seconds between exercises".into(),
        },
        exercises: vec![
            exercise(
                "Alternating Bicep Curls",
                &["Arms"],
                &[
                    "https://www.youtube.com/watch?v=WYezBGuUsdw",
                    "https://www.youtube.com/watch?v=o2Tma5Cek48",
                ],
                &[
                    "Hold a dumbbell in each hand, palms facing forward",
                    "Curl one arm up, lower it, then curl the other arm up",
                    "Keep movement controlled, don't swing your arms",
                ],
                true,
            ),
            exercise(
                "Goblet Squat",
                &["Legs", "Glutes"],
                &[
                    "https://www.youtube.com/watch?v=pEGfGwp6IEA",
                    "https://www.youtube.com/watch?v=a-dqF4NL2K4",
                ],
                &[
                    "Hold one dumbbell close to your chest",
                    "Lower yourself into a squat, keeping your back straight",
                    "Push back up through your heels",
                ],
                false,
            ),
            exercise(
                "Dumbbell Shoulder Press",
                &["Shoulders"],
                &[
                    "https://www.youtube.com/watch?v=OM23fjJB3-0",
                    "https://www.youtube.com/watch?v=Did01dFR3Lk",
                ],
                &[
                    "Hold both dumbbells at shoulder height",
                    "Press them up slowly",
                    "Lower them back down",
                ],
                false,
            ),
            exercise(
                "Bent-over Rows",
                &["Back", "Arms"],
                &[
                    "https://www.youtube.com/watch?v=VP_f9V854og",
                    "https://www.youtube.com/watch?v=aVH_cG4UISc",
                ],
                &[
                    "Slightly bend forward, keeping your back straight",
                    "Pull the dumbbells up toward your ribs",
                    "Squeeze your shoulder blades, then lower",
                ],
                false,
            ),
            exercise(
                "Dumbbell Deadlifts",
                &["Legs", "Glutes"],
                &[
                    "https://www.youtube.com/watch?v=zfuc5ynsTlc",
                    "https://www.youtube.com/watch?v=plb5jEO4Unw",
                ],
                &[
                    "Hold dumbbells in front of you",
                    "Lower them toward your shins while keeping your back straight",
                    "Stand back up using your legs, not your lower back",
                ],
                false,
            ),
            exercise(
                "Standing Calf Raises",
                &["Legs"],
                &[
                    "https://www.youtube.com/watch?v=ADIDoYt_ko4",
                    "https://www.youtube.com/watch?v=_iYwv4QVFjM",
                ],
                &[
                    "Hold dumbbells by your sides",
                    "Lift your heels off the floor",
                    "Hold for a second, then lower back down",
                ],
                false,
            ),
            exercise(
                "Dumbbell Floor Press",
                &["Chest", "Triceps"],
                &[
                    "https://www.youtube.com/watch?v=tXv-rEa5xn8",
                    "https://www.youtube.com/watch?v=jjlekYs1cfQ",
                ],
                &[
                    "Lie on your back on the floor, holding dumbbells above your chest",
                    "Lower them slowly until your elbows touch the floor",
                    "Press back up",
                ],
                false,
            ),
            exercise(
                "Russian Twists",
                &["Core"],
                &[
                    "https://www.youtube.com/watch?v=Tau0hsW8iR0",
                    "https://www.youtube.com/watch?v=Hvtxbidjins",
                    "https://www.youtube.com/watch?v=pzMWYoeSCzw",
                ],
                &[
                    "Sit down with a dumbbell in both hands",
                    "Lean back slightly and twist your torso to one side, then the other",
                    "Keep movements slow and controlled",
                ],
                false,
            ),
        ],
    }]
}
