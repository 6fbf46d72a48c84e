//! In-memory workout session state. Nothing here is persisted: the machine is
//! created empty on login and cleared on logout, split switch, and week reset.
//! The only durable side effects of a session (`is_done`, `is_completed`) go
//! through plan transforms applied by the store.

use crate::types::WorkoutDay;

/// Explicit phase instead of a pair of nullable indices: `Active` with no
/// exercise means every exercise of the day was already done when the workout
/// started, `OnBreak` remembers which slot just finished so the break screen
/// belongs to it rather than to whatever comes next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Active {
        day: usize,
        exercise: Option<usize>,
    },
    OnBreak {
        day: usize,
        finished: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// Progress exists; the caller surfaces a warning and nothing changes.
    Rejected,
    /// The day was not the active one; silently ignored.
    NotActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterDone {
    /// No next exercise: the day is complete and the session is idle again.
    DayCompleted,
    /// A next exercise exists; the break screen shows for the finished slot
    /// until `end_break` advances.
    Break { finished: usize },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutSession {
    phase: SessionPhase,
    /// FIFO queue of exercise indices deferred within the active day.
    skipped: Vec<usize>,
    just_completed_day: Option<usize>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

/// Head of the skipped queue first, otherwise the first not-done exercise in
/// order. Every "what comes next" decision uses this one rule.
fn find_next_exercise(day: &WorkoutDay, skipped: &[usize]) -> Option<usize> {
    if let Some(&head) = skipped.first() {
        return Some(head);
    }
    day.exercises.iter().position(|ex| !ex.is_done)
}

impl WorkoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn active_day(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Active { day, .. } | SessionPhase::OnBreak { day, .. } => Some(day),
        }
    }

    pub fn active_exercise(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::Active { exercise, .. } => exercise,
            _ => None,
        }
    }

    pub fn break_slot(&self) -> Option<(usize, usize)> {
        match self.phase {
            SessionPhase::OnBreak { day, finished } => Some((day, finished)),
            _ => None,
        }
    }

    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn just_completed_day(&self) -> Option<usize> {
        self.just_completed_day
    }

    /// Full reset: logout, split switch, week reset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn start_workout(&mut self, day_index: usize, day: &WorkoutDay) {
        self.skipped.clear();
        self.phase = SessionPhase::Active {
            day: day_index,
            exercise: day.exercises.iter().position(|ex| !ex.is_done),
        };
    }

    pub fn cancel_workout(&mut self, day_index: usize, day: &WorkoutDay) -> CancelOutcome {
        if self.active_day() != Some(day_index) {
            return CancelOutcome::NotActive;
        }
        if day.exercises.iter().any(|ex| ex.is_done) {
            return CancelOutcome::Rejected;
        }
        self.phase = SessionPhase::Idle;
        self.skipped.clear();
        CancelOutcome::Cancelled
    }

    /// `day` is the day snapshot with the exercise already marked done.
    pub fn mark_exercise_done(
        &mut self,
        day_index: usize,
        day: &WorkoutDay,
        ex_index: usize,
    ) -> AfterDone {
        self.skipped.retain(|&ix| ix != ex_index);

        match find_next_exercise(day, &self.skipped) {
            None => {
                self.phase = SessionPhase::Idle;
                self.skipped.clear();
                self.just_completed_day = Some(day_index);
                AfterDone::DayCompleted
            }
            Some(_) => {
                self.phase = SessionPhase::OnBreak {
                    day: day_index,
                    finished: ex_index,
                };
                AfterDone::Break { finished: ex_index }
            }
        }
    }

    pub fn end_break(&mut self, day: &WorkoutDay) {
        if let SessionPhase::OnBreak { day: day_index, .. } = self.phase {
            self.phase = SessionPhase::Active {
                day: day_index,
                exercise: find_next_exercise(day, &self.skipped),
            };
        }
    }

    /// Returns true when a break shown for exactly this slot was cancelled,
    /// so the caller can reset the break stopwatch.
    pub fn undo_mark_done(&mut self, day_index: usize, ex_index: usize) -> bool {
        let cancelled_break = self.break_slot() == Some((day_index, ex_index));

        // Re-entrant override: the undone slot becomes the active selection
        // even if a different day was active before.
        self.phase = SessionPhase::Active {
            day: day_index,
            exercise: Some(ex_index),
        };
        cancelled_break
    }

    pub fn skip_exercise(&mut self, day_index: usize, day: &WorkoutDay, ex_index: usize) {
        self.skipped.push(ex_index);

        let fresh = day
            .exercises
            .iter()
            .enumerate()
            .position(|(ix, ex)| !ex.is_done && !self.skipped.contains(&ix));

        // No fresh candidate left: resurface the oldest skip instead of
        // leaving nothing active.
        let next = fresh.or(self.skipped.first().copied());
        self.phase = SessionPhase::Active {
            day: day_index,
            exercise: next,
        };
    }

    pub fn reset_just_completed_day(&mut self) {
        self.just_completed_day = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::initial_plan;
    use crate::types::WorkoutPlan;

    fn plan() -> WorkoutPlan {
        initial_plan()
    }

    fn day(plan: &WorkoutPlan, ix: usize) -> WorkoutDay {
        plan.active_days()[ix].clone()
    }

    #[test]
    fn start_workout_activates_first_not_done_exercise() {
        let mut plan = plan();
        plan.five_day_split[0].exercises[0].is_done = true;

        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));
        assert_eq!(
            session.phase(),
            SessionPhase::Active {
                day: 0,
                exercise: Some(1)
            }
        );
        assert!(session.skipped().is_empty());
    }

    #[test]
    fn start_workout_on_all_done_day_has_no_active_exercise() {
        let mut plan = plan();
        for ex in &mut plan.five_day_split[0].exercises {
            ex.is_done = true;
        }
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));
        assert_eq!(
            session.phase(),
            SessionPhase::Active {
                day: 0,
                exercise: None
            }
        );
    }

    #[test]
    fn cancel_is_rejected_once_progress_exists() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        plan.five_day_split[0].exercises[0].is_done = true;
        let before = session.clone();
        assert_eq!(
            session.cancel_workout(0, &day(&plan, 0)),
            CancelOutcome::Rejected
        );
        assert_eq!(session, before);
        assert_eq!(session.active_day(), Some(0));
    }

    #[test]
    fn cancel_without_progress_returns_to_idle() {
        let plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));
        assert_eq!(
            session.cancel_workout(0, &day(&plan, 0)),
            CancelOutcome::Cancelled
        );
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn cancel_of_inactive_day_is_ignored() {
        let plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));
        assert_eq!(
            session.cancel_workout(1, &day(&plan, 1)),
            CancelOutcome::NotActive
        );
        assert_eq!(session.active_day(), Some(0));
    }

    #[test]
    fn mark_done_enters_break_for_the_finished_slot() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        plan.five_day_split[0].exercises[0].is_done = true;
        let after = session.mark_exercise_done(0, &day(&plan, 0), 0);
        assert_eq!(after, AfterDone::Break { finished: 0 });
        assert_eq!(session.break_slot(), Some((0, 0)));
        assert_eq!(session.active_exercise(), None);
    }

    #[test]
    fn end_break_activates_the_next_exercise() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        plan.five_day_split[0].exercises[0].is_done = true;
        session.mark_exercise_done(0, &day(&plan, 0), 0);
        session.end_break(&day(&plan, 0));
        assert_eq!(
            session.phase(),
            SessionPhase::Active {
                day: 0,
                exercise: Some(1)
            }
        );
    }

    #[test]
    fn skipped_head_comes_before_later_exercises() {
        // Day [A, B, C]: skip A, finish B; next must be A, not C.
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        session.skip_exercise(0, &day(&plan, 0), 0);
        assert_eq!(session.active_exercise(), Some(1));

        plan.five_day_split[0].exercises[1].is_done = true;
        let after = session.mark_exercise_done(0, &day(&plan, 0), 1);
        assert_eq!(after, AfterDone::Break { finished: 1 });
        session.end_break(&day(&plan, 0));
        assert_eq!(session.active_exercise(), Some(0));
    }

    #[test]
    fn skip_surfaces_skipped_head_when_nothing_fresh() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        // Day 0 has three exercises; the last one is already done.
        plan.five_day_split[0].exercises[2].is_done = true;
        session.start_workout(0, &day(&plan, 0));

        session.skip_exercise(0, &day(&plan, 0), 0);
        assert_eq!(session.active_exercise(), Some(1));
        session.skip_exercise(0, &day(&plan, 0), 1);
        // Nothing is fresh anymore: the oldest skip comes back.
        assert_eq!(session.active_exercise(), Some(0));
        assert_eq!(session.skipped(), &[0, 1]);
    }

    #[test]
    fn completing_the_last_exercise_completes_the_day() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        for ix in 0..3 {
            plan.five_day_split[0].exercises[ix].is_done = true;
            let after = session.mark_exercise_done(0, &day(&plan, 0), ix);
            if ix < 2 {
                session.end_break(&day(&plan, 0));
            } else {
                assert_eq!(after, AfterDone::DayCompleted);
            }
        }

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.just_completed_day(), Some(0));
        assert!(session.skipped().is_empty());

        session.reset_just_completed_day();
        assert_eq!(session.just_completed_day(), None);
    }

    #[test]
    fn marking_a_skipped_exercise_done_removes_it_from_the_queue() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        session.skip_exercise(0, &day(&plan, 0), 0);
        plan.five_day_split[0].exercises[0].is_done = true;
        session.mark_exercise_done(0, &day(&plan, 0), 0);
        assert!(session.skipped().is_empty());
    }

    #[test]
    fn undo_reactivates_the_slot_and_cancels_its_break() {
        let mut plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));

        plan.five_day_split[0].exercises[0].is_done = true;
        session.mark_exercise_done(0, &day(&plan, 0), 0);
        assert!(session.break_slot().is_some());

        let cancelled = session.undo_mark_done(0, 0);
        assert!(cancelled);
        assert_eq!(
            session.phase(),
            SessionPhase::Active {
                day: 0,
                exercise: Some(0)
            }
        );
    }

    #[test]
    fn undo_overrides_a_different_active_day() {
        let plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(1, &day(&plan, 1));

        let cancelled = session.undo_mark_done(0, 2);
        assert!(!cancelled);
        assert_eq!(
            session.phase(),
            SessionPhase::Active {
                day: 0,
                exercise: Some(2)
            }
        );
    }

    #[test]
    fn clear_resets_everything() {
        let plan = plan();
        let mut session = WorkoutSession::new();
        session.start_workout(0, &day(&plan, 0));
        session.skip_exercise(0, &day(&plan, 0), 0);
        session.clear();
        assert_eq!(session, WorkoutSession::new());
    }
}
