//! Pure transforms over the plan document. Every function takes the current
//! plan and returns a new one; nothing here touches signals, timers, or the
//! network. The sync engine treats an unchanged result as a skippable save,
//! so invalid inputs simply return the document as-is.

use crate::types::*;

fn parse_weight(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn format_weight(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub fn update_cardio(
    plan: &WorkoutPlan,
    phase: CardioPhase,
    field: CardioField,
    value: &str,
) -> WorkoutPlan {
    let mut next = plan.clone();
    match phase {
        CardioPhase::Warmup | CardioPhase::Cooldown => {
            let values = if phase == CardioPhase::Warmup {
                &mut next.cardio.warmup
            } else {
                &mut next.cardio.cooldown
            };
            match field {
                CardioField::Duration => values.duration = value.to_string(),
                CardioField::Level => values.level = value.to_string(),
                CardioField::Rpm => values.rpm = value.to_string(),
                // Only the main and high phases carry cycles.
                CardioField::Cycles => {}
            }
        }
        CardioPhase::Main | CardioPhase::High => {
            let values = if phase == CardioPhase::Main {
                &mut next.cardio.main
            } else {
                &mut next.cardio.high
            };
            match field {
                CardioField::Duration => values.duration = value.to_string(),
                CardioField::Level => values.level = value.to_string(),
                CardioField::Rpm => values.rpm = value.to_string(),
                CardioField::Cycles => values.cycles = value.to_string(),
            }
        }
    }
    next
}

fn exercise_mut(plan: &mut WorkoutPlan, day: usize, ex: usize) -> Option<&mut Exercise> {
    plan.active_days_mut().get_mut(day)?.exercises.get_mut(ex)
}

pub fn update_exercise(
    plan: &WorkoutPlan,
    day: usize,
    ex: usize,
    field: ExerciseField,
    value: &str,
) -> WorkoutPlan {
    let mut next = plan.clone();
    if let Some(exercise) = exercise_mut(&mut next, day, ex) {
        match field {
            ExerciseField::Weight => exercise.weight = value.to_string(),
            ExerciseField::Reps => exercise.reps = value.to_string(),
            ExerciseField::SplitSet(slot) => {
                let target = match slot {
                    SetSlot::One => &mut exercise.split_weights.set1,
                    SetSlot::Two => &mut exercise.split_weights.set2,
                    SetSlot::Three => &mut exercise.split_weights.set3,
                };
                *target = value.to_string();
            }
        }
    }
    next
}

/// Standard → split seeds all three slots from a non-empty scalar weight.
/// Split → standard only flips the mode; the scalar weight is left untouched.
pub fn toggle_split_mode(plan: &WorkoutPlan, day: usize, ex: usize) -> WorkoutPlan {
    let mut next = plan.clone();
    if let Some(exercise) = exercise_mut(&mut next, day, ex) {
        match exercise.weight_mode {
            WeightMode::Standard => {
                exercise.weight_mode = WeightMode::Split;
                let standard = exercise.weight.clone();
                if !standard.trim().is_empty() {
                    exercise.split_weights = SplitWeights {
                        set1: standard.clone(),
                        set2: standard.clone(),
                        set3: standard,
                    };
                }
            }
            WeightMode::Split => {
                exercise.weight_mode = WeightMode::Standard;
            }
        }
    }
    next
}

/// Normalize split weights to low / high / middle. Non-numeric or
/// non-positive entries make this a no-op.
pub fn reorder_split_weights(plan: &WorkoutPlan, day: usize, ex: usize) -> WorkoutPlan {
    let mut next = plan.clone();
    if let Some(exercise) = exercise_mut(&mut next, day, ex) {
        let parsed = [
            parse_weight(&exercise.split_weights.set1),
            parse_weight(&exercise.split_weights.set2),
            parse_weight(&exercise.split_weights.set3),
        ];
        let [Some(v1), Some(v2), Some(v3)] = parsed else {
            return plan.clone();
        };

        let mut sorted = [v1, v2, v3];
        sorted.sort_by(f64::total_cmp);

        if (v1, v2, v3) == (sorted[0], sorted[2], sorted[1]) {
            return plan.clone();
        }

        exercise.split_weights.set1 = format_weight(sorted[0]);
        exercise.split_weights.set2 = format_weight(sorted[2]);
        exercise.split_weights.set3 = format_weight(sorted[1]);
    }
    next
}

/// Progress checkpoints form a monotonic prefix: unchecking one clears
/// everything after it.
pub fn update_progress(
    plan: &WorkoutPlan,
    day: usize,
    ex: usize,
    path_index: usize,
    checked: bool,
) -> WorkoutPlan {
    let mut next = plan.clone();
    if let Some(exercise) = exercise_mut(&mut next, day, ex) {
        if path_index < exercise.progress.len() {
            exercise.progress[path_index] = checked;
            if !checked {
                for later in exercise.progress.iter_mut().skip(path_index + 1) {
                    *later = false;
                }
            }
        }
    }
    next
}

pub fn set_cardio_visibility(plan: &WorkoutPlan, visible: bool) -> WorkoutPlan {
    let mut next = plan.clone();
    next.settings.cardio_visible = visible;
    next
}

pub fn set_sections_order(plan: &WorkoutPlan, order: [Section; 2]) -> WorkoutPlan {
    let mut next = plan.clone();
    next.settings.sections_order = order;
    next
}

pub fn set_theme_preference(plan: &WorkoutPlan, theme: Theme) -> WorkoutPlan {
    let mut next = plan.clone();
    next.settings.theme = theme;
    next
}

pub fn set_language_preference(plan: &WorkoutPlan, language: Language) -> WorkoutPlan {
    let mut next = plan.clone();
    next.settings.language = language;
    next
}

/// The document half of a split switch. Clearing the session state and the
/// stopwatches is the store's job.
pub fn set_active_split(plan: &WorkoutPlan, split: SplitKind) -> WorkoutPlan {
    let mut next = plan.clone();
    next.settings.active_split = split;
    next
}

pub fn reset_day(plan: &WorkoutPlan, day: usize) -> WorkoutPlan {
    let mut next = plan.clone();
    if let Some(day) = next.active_days_mut().get_mut(day) {
        day.is_completed = false;
        for exercise in &mut day.exercises {
            exercise.is_done = false;
        }
    }
    next
}

pub fn reset_week(plan: &WorkoutPlan) -> WorkoutPlan {
    let mut next = plan.clone();
    for day in next.active_days_mut() {
        day.is_completed = false;
        for exercise in &mut day.exercises {
            exercise.is_done = false;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::initial_plan;

    fn set_split_weights(plan: &WorkoutPlan, day: usize, ex: usize, w: [&str; 3]) -> WorkoutPlan {
        let mut next = plan.clone();
        let exercise = exercise_mut(&mut next, day, ex).unwrap();
        exercise.split_weights = SplitWeights {
            set1: w[0].to_string(),
            set2: w[1].to_string(),
            set3: w[2].to_string(),
        };
        next
    }

    fn split_weights(plan: &WorkoutPlan, day: usize, ex: usize) -> [String; 3] {
        let sw = &plan.active_days()[day].exercises[ex].split_weights;
        [sw.set1.clone(), sw.set2.clone(), sw.set3.clone()]
    }

    #[test]
    fn unchecking_a_checkpoint_clears_everything_after_it() {
        let mut plan = initial_plan();
        plan = update_progress(&plan, 0, 0, 0, true);
        plan = update_progress(&plan, 0, 0, 1, true);
        plan = update_progress(&plan, 0, 0, 2, true);
        assert_eq!(plan.active_days()[0].exercises[0].progress, [true, true, true]);

        plan = update_progress(&plan, 0, 0, 0, false);
        assert_eq!(
            plan.active_days()[0].exercises[0].progress,
            [false, false, false]
        );
    }

    #[test]
    fn unchecking_middle_checkpoint_keeps_earlier_ones() {
        let mut plan = initial_plan();
        plan = update_progress(&plan, 0, 0, 0, true);
        plan = update_progress(&plan, 0, 0, 1, true);
        plan = update_progress(&plan, 0, 0, 2, true);

        plan = update_progress(&plan, 0, 0, 1, false);
        assert_eq!(
            plan.active_days()[0].exercises[0].progress,
            [true, false, false]
        );
    }

    #[test]
    fn reorder_assigns_low_high_middle() {
        let plan = set_split_weights(&initial_plan(), 0, 0, ["20", "10", "15"]);
        let next = reorder_split_weights(&plan, 0, 0);
        assert_eq!(split_weights(&next, 0, 0), ["10", "20", "15"]);
    }

    #[test]
    fn reorder_is_idempotent_once_normalized() {
        let plan = set_split_weights(&initial_plan(), 0, 0, ["12.5", "9", "30"]);
        let once = reorder_split_weights(&plan, 0, 0);
        let twice = reorder_split_weights(&once, 0, 0);
        assert_eq!(split_weights(&once, 0, 0), ["9", "30", "12.5"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn reorder_rejects_non_numeric_and_non_positive_input() {
        let base = initial_plan();
        for bad in [["", "10", "15"], ["abc", "10", "15"], ["0", "10", "15"], ["-5", "10", "15"]] {
            let plan = set_split_weights(&base, 0, 0, bad);
            assert_eq!(reorder_split_weights(&plan, 0, 0), plan);
        }
    }

    #[test]
    fn reorder_with_equal_values_is_a_noop() {
        let plan = set_split_weights(&initial_plan(), 0, 0, ["10", "10", "10"]);
        assert_eq!(reorder_split_weights(&plan, 0, 0), plan);
    }

    #[test]
    fn toggle_split_mode_round_trip_preserves_scalar_weight() {
        let plan = initial_plan();
        let original_weight = plan.active_days()[0].exercises[0].weight.clone();

        let split = toggle_split_mode(&plan, 0, 0);
        let ex = &split.active_days()[0].exercises[0];
        assert_eq!(ex.weight_mode, WeightMode::Split);
        assert_eq!(ex.split_weights.set1, original_weight);
        assert_eq!(ex.split_weights.set2, original_weight);
        assert_eq!(ex.split_weights.set3, original_weight);

        let standard = toggle_split_mode(&split, 0, 0);
        let ex = &standard.active_days()[0].exercises[0];
        assert_eq!(ex.weight_mode, WeightMode::Standard);
        assert_eq!(ex.weight, original_weight);
    }

    #[test]
    fn toggle_split_mode_keeps_old_split_weights_when_scalar_is_empty() {
        let mut plan = set_split_weights(&initial_plan(), 0, 0, ["1", "2", "3"]);
        plan = update_exercise(&plan, 0, 0, ExerciseField::Weight, "  ");
        let split = toggle_split_mode(&plan, 0, 0);
        assert_eq!(split_weights(&split, 0, 0), ["1", "2", "3"]);
    }

    #[test]
    fn cycles_only_apply_to_main_and_high() {
        let plan = initial_plan();
        let next = update_cardio(&plan, CardioPhase::Warmup, CardioField::Cycles, "9");
        assert_eq!(next, plan);

        let next = update_cardio(&plan, CardioPhase::High, CardioField::Cycles, "4");
        assert_eq!(next.cardio.high.cycles, "4");
        let next = update_cardio(&next, CardioPhase::Main, CardioField::Rpm, "75");
        assert_eq!(next.cardio.main.rpm, "75");
    }

    #[test]
    fn update_exercise_writes_split_slots() {
        let plan = initial_plan();
        let next = update_exercise(&plan, 0, 1, ExerciseField::SplitSet(SetSlot::Two), "22.5");
        assert_eq!(
            next.active_days()[0].exercises[1].split_weights.set2,
            "22.5"
        );
        // Other slots untouched.
        assert_eq!(
            next.active_days()[0].exercises[1].split_weights.set1,
            plan.active_days()[0].exercises[1].split_weights.set1
        );
    }

    #[test]
    fn reset_day_only_touches_that_day() {
        let mut plan = initial_plan();
        for day in 0..2 {
            for ex in 0..plan.active_days()[day].exercises.len() {
                plan = update_exercise(&plan, day, ex, ExerciseField::Weight, "40");
                let days = plan.active_days_mut();
                days[day].exercises[ex].is_done = true;
            }
            plan.active_days_mut()[day].is_completed = true;
        }

        let next = reset_day(&plan, 0);
        assert!(!next.active_days()[0].is_completed);
        assert!(next.active_days()[0].exercises.iter().all(|ex| !ex.is_done));
        // Day 1 keeps its completion and its weights survive everywhere.
        assert!(next.active_days()[1].is_completed);
        assert!(next.active_days()[1].exercises.iter().all(|ex| ex.is_done));
        assert_eq!(next.active_days()[0].exercises[0].weight, "40");
    }

    #[test]
    fn reset_week_clears_every_day_of_the_active_split_only() {
        let mut plan = initial_plan();
        plan.five_day_split[2].is_completed = true;
        plan.five_day_split[2].exercises[0].is_done = true;
        plan.three_day_split[0].is_completed = true;

        let next = reset_week(&plan);
        assert!(next.five_day_split.iter().all(|d| !d.is_completed));
        assert!(next
            .five_day_split
            .iter()
            .flat_map(|d| &d.exercises)
            .all(|ex| !ex.is_done));
        // The inactive split is not part of the reset.
        assert!(next.three_day_split[0].is_completed);
    }

    #[test]
    fn transforms_operate_on_the_active_split() {
        let plan = set_active_split(&initial_plan(), SplitKind::ThreeDay);
        let next = update_exercise(&plan, 0, 0, ExerciseField::Weight, "99");
        assert_eq!(next.three_day_split[0].exercises[0].weight, "99");
        assert_eq!(next.five_day_split[0].exercises[0].weight, "17.5");
    }

    #[test]
    fn out_of_range_indices_leave_the_plan_unchanged() {
        let plan = initial_plan();
        assert_eq!(update_exercise(&plan, 99, 0, ExerciseField::Weight, "1"), plan);
        assert_eq!(update_progress(&plan, 0, 99, 0, true), plan);
        assert_eq!(reset_day(&plan, 99), plan);
    }
}
