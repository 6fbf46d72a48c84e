use crate::types::*;

const DEV_PLAN_KEY: &str = "repday_dev_plan";

pub const DEV_ADMIN: &str = "dev-admin";
pub const DEV_INVITED: &str = "dev-invited";

pub fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

// The dev persona marker lives in sessionStorage so closing the tab always
// drops back to the real auth flow.
pub fn get_session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

pub fn load_dev_plan_marker() -> Option<String> {
    get_session_storage()
        .and_then(|s| s.get_item(DEV_PLAN_KEY).ok())
        .flatten()
}

pub fn save_dev_plan_marker(marker: &str) {
    if let Some(storage) = get_session_storage() {
        let _ = storage.set_item(DEV_PLAN_KEY, marker);
    }
}

pub fn clear_dev_plan_marker() {
    if let Some(storage) = get_session_storage() {
        let _ = storage.remove_item(DEV_PLAN_KEY);
    }
}

fn exercise(name: &str, reps: &str, weight: &str) -> Exercise {
    Exercise {
        name: name.to_string(),
        hint: None,
        reps: reps.to_string(),
        weight_mode: WeightMode::Standard,
        weight: weight.to_string(),
        split_weights: SplitWeights {
            set1: weight.to_string(),
            set2: weight.to_string(),
            set3: weight.to_string(),
        },
        progress: [false, false, false],
        is_done: false,
    }
}

fn hinted(name: &str, hint: &str, reps: &str, weight: &str) -> Exercise {
    Exercise {
        hint: Some(hint.to_string()),
        ..exercise(name, reps, weight)
    }
}

fn day(label: &str, icon: &str, exercises: Vec<Exercise>) -> WorkoutDay {
    WorkoutDay {
        day: label.to_string(),
        icon: icon.to_string(),
        is_completed: false,
        exercises,
    }
}

/// Single source of truth for a fresh plan document. New signups and the dev
/// admin persona both start from this.
pub fn initial_plan() -> WorkoutPlan {
    let chest = vec![
        exercise("Dumbbell Bench Press", "3x8", "17.5"),
        exercise("Incline Dumbbell Bench Press", "3x8", "17.5"),
        exercise("Machine Fly", "3x8", "31"),
    ];
    let back = vec![
        exercise("Cable Lat Pulldown", "3x8", "36"),
        exercise("Cable Seated Row", "3x8", "31.5"),
        exercise("Machine Vertical Row", "3x8", "27"),
    ];
    let legs = vec![
        hinted("Machine Seated Leg Curl", "drag the pad down", "3x8", "25"),
        hinted("Machine Leg Extension", "raise the pad up", "3x8", "30"),
        exercise("Machine Leg Press", "3x8", "27"),
    ];
    let shoulders = vec![
        exercise("Machine Shoulder Press", "3x8", "5"),
        exercise("Machine Deltoid Raise", "3x8", "18"),
        exercise("Face Pulls", "3x8", "10"),
    ];
    let arms = vec![
        exercise("Alternating Bicep Curl", "3x8", "10"),
        exercise("Hammer Curl", "3x8", "7.5"),
        exercise("Machine Dip", "3x8", "54"),
        exercise("Cable Pushdown", "3x8", "15"),
        exercise("Tricep Kickback", "3x8", "7.5"),
    ];

    // The 3-day split regroups the same exercise pool into fewer days.
    let three_day = vec![
        day(
            "Chest & Biceps",
            "IconChest",
            chest
                .iter()
                .chain(arms.iter().filter(|ex| ex.name.contains("Curl")))
                .cloned()
                .collect(),
        ),
        day(
            "Back & Shoulders",
            "IconBack",
            back.iter().chain(shoulders.iter()).cloned().collect(),
        ),
        day(
            "Legs & Triceps",
            "Footprints",
            legs.iter()
                .chain(arms.iter().filter(|ex| {
                    ex.name.contains("Dip")
                        || ex.name.contains("Pushdown")
                        || ex.name.contains("Kickback")
                }))
                .cloned()
                .collect(),
        ),
    ];

    let five_day = vec![
        day("Chest", "IconChest", chest),
        day("Back", "IconBack", back),
        day("Legs", "Footprints", legs),
        day("Shoulders", "IconShoulder", shoulders),
        day("Arms", "BicepsFlexed", arms),
    ];

    WorkoutPlan {
        user_name: "Guest".to_string(),
        cardio: CardioProtocolData {
            warmup: CardioValues {
                duration: "5".into(),
                level: "5".into(),
                rpm: "60".into(),
            },
            main: CardioMainValues {
                cycles: "3".into(),
                duration: "5".into(),
                level: "6".into(),
                rpm: "60".into(),
            },
            high: CardioMainValues {
                cycles: "3".into(),
                duration: "2".into(),
                level: "9".into(),
                rpm: "70".into(),
            },
            cooldown: CardioValues {
                duration: "5".into(),
                level: "3".into(),
                rpm: "60".into(),
            },
        },
        five_day_split: five_day,
        three_day_split: three_day,
        settings: WorkoutSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_plan_has_both_splits() {
        let plan = initial_plan();
        assert_eq!(plan.five_day_split.len(), 5);
        assert_eq!(plan.three_day_split.len(), 3);
        assert!(plan.settings.cardio_visible);
        assert_eq!(plan.settings.active_split, SplitKind::FiveDay);
    }

    #[test]
    fn initial_plan_exercises_start_clean() {
        let plan = initial_plan();
        for d in plan.five_day_split.iter().chain(plan.three_day_split.iter()) {
            assert!(!d.is_completed);
            for ex in &d.exercises {
                assert!(!ex.is_done);
                assert_eq!(ex.progress, [false, false, false]);
                assert_eq!(ex.weight_mode, WeightMode::Standard);
            }
        }
    }

    #[test]
    fn plan_round_trips_through_json() {
        let plan = initial_plan();
        let json = serde_json::to_string(&plan).unwrap();
        // Wire format keeps the document store's field names.
        assert!(json.contains("\"fiveDaySplit\""));
        assert!(json.contains("\"activeSplit\":\"5-day\""));
        assert!(json.contains("\"isDone\""));
        let back: WorkoutPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
