//! The one owning application-state object. Constructed once at mount,
//! provided through context, torn down on logout. Pages talk to this and to
//! nothing else; it routes edits through the sync engine and session
//! transitions through the state machine, and owns every timer that could
//! otherwise outlive its state.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::plan;
use crate::session::{AfterDone, CancelOutcome, SessionPhase, WorkoutSession};
use crate::stopwatch::Stopwatch;
use crate::storage::{self, DEV_ADMIN, DEV_INVITED};
use crate::supabase::{self, AuthSession, AuthUser, RemoteError};
use crate::sync::{PlanSync, SyncCallbacks};
use crate::types::*;

/// How long the day-completed celebration stays up before it clears itself.
const CELEBRATION_MS: u32 = 4_000;
const TOAST_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Warning,
    /// Permission-denied guidance with copyable rules setup instructions;
    /// stays up until dismissed.
    RulesHelp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Toasts {
    pub current: RwSignal<Option<Toast>>,
    dismiss: StoredValue<Option<Timeout>>,
}

impl Toasts {
    fn new() -> Self {
        Self {
            current: create_rw_signal(None),
            dismiss: store_value(None),
        }
    }

    pub fn show(&self, kind: ToastKind, title: &str, message: &str) {
        self.current.set(Some(Toast {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        }));
        if kind == ToastKind::RulesHelp {
            self.dismiss.set_value(None);
        } else {
            let current = self.current;
            self.dismiss
                .set_value(Some(Timeout::new(TOAST_MS, move || current.set(None))));
        }
    }

    pub fn dismiss(&self) {
        self.current.set(None);
        self.dismiss.set_value(None);
    }
}

#[derive(Clone, Copy)]
pub struct WorkoutStore {
    pub sync: PlanSync,
    pub view: RwSignal<AppView>,
    pub profile: RwSignal<Option<UserProfile>>,
    pub auth_user: RwSignal<Option<AuthUser>>,
    pub toasts: Toasts,
    pub rest_stopwatch: Stopwatch,
    pub break_stopwatch: Stopwatch,
    session: RwSignal<WorkoutSession>,
    celebration: StoredValue<Option<Timeout>>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        let view = create_rw_signal(AppView::Login);
        let profile = create_rw_signal(None::<UserProfile>);
        let auth_user = create_rw_signal(None::<AuthUser>);
        let toasts = Toasts::new();
        let session = create_rw_signal(WorkoutSession::new());
        let rest_stopwatch = Stopwatch::new();
        let break_stopwatch = Stopwatch::new();

        let callbacks = SyncCallbacks {
            on_error: Rc::new(move |err: RemoteError| {
                if err.is_permission_denied() {
                    show_rules_help(&toasts);
                }
            }),
            on_invalidated: Rc::new(move || {
                // The bound plan vanished remotely; the engine already tore
                // itself down.
                profile.set(None);
                auth_user.set(None);
                session.update(|s| s.clear());
                rest_stopwatch.reset();
                break_stopwatch.reset();
                toasts.show(
                    ToastKind::Warning,
                    "Invalid code",
                    "This workout plan no longer exists. Please sign in again.",
                );
                view.set(AppView::Login);
            }),
        };

        Self {
            sync: PlanSync::new(callbacks),
            view,
            profile,
            auth_user,
            toasts,
            rest_stopwatch,
            break_stopwatch,
            session,
            celebration: store_value(None),
        }
    }

    // ---- bootstrap / identity ----

    pub fn bootstrap(&self) {
        if let Some(marker) = storage::load_dev_plan_marker() {
            match marker.as_str() {
                DEV_ADMIN => {
                    self.enter_dev_admin();
                    return;
                }
                DEV_INVITED => {
                    self.enter_dev_invited();
                    return;
                }
                _ => storage::clear_dev_plan_marker(),
            }
        }

        if !supabase::has_remote_config() {
            self.sync.mark_offline();
            return;
        }

        match supabase::load_auth_session() {
            Some(auth) => {
                self.auth_user.set(Some(auth.user.clone()));
                self.resolve_identity(auth.user.id);
            }
            None => self.view.set(AppView::Login),
        }
    }

    fn enter_dev_admin(&self) {
        self.auth_user.set(Some(AuthUser {
            id: "dev-admin-user".into(),
            email: "dev-admin@example.com".into(),
        }));
        self.profile.set(Some(UserProfile {
            first_name: "Dev".into(),
            email: Some("dev-admin@example.com".into()),
            photo_url: None,
            date_of_birth: Some("1990-01-15".into()),
            dob_day: Some("15".into()),
            dob_month: Some("01".into()),
            dob_year: Some("1990".into()),
            weight: Some("80".into()),
            height: Some("180".into()),
            gender: Some(Gender::Male),
            workout_id: "dev-admin-plan".into(),
            is_admin: Some(true),
        }));

        let mut plan = storage::initial_plan();
        plan.user_name = "Dev Admin".into();
        self.sync.enter_dev_mode("dev-admin-plan", plan);
        self.view.set(AppView::Tracker);
    }

    fn enter_dev_invited(&self) {
        self.auth_user.set(Some(AuthUser {
            id: "dev-invited-user".into(),
            email: "invited@example.com".into(),
        }));
        // No profile and no plan: this persona always lands on onboarding.
        self.view.set(AppView::Welcome);
    }

    pub fn dev_sign_in(&self, marker: &str) {
        storage::save_dev_plan_marker(marker);
        self.bootstrap();
    }

    /// A real credential sign-in finished; resolve which plan the user is
    /// bound to.
    pub fn complete_sign_in(&self, auth: AuthSession) {
        self.auth_user.set(Some(auth.user.clone()));
        self.resolve_identity(auth.user.id);
    }

    fn resolve_identity(&self, uid: String) {
        let this = *self;
        wasm_bindgen_futures::spawn_local(async move {
            match supabase::fetch_profile(&uid).await {
                Ok(profile) => {
                    if profile.workout_id.is_empty() {
                        this.view.set(AppView::Welcome);
                        return;
                    }
                    let plan_id = profile.workout_id.clone();
                    this.profile.set(Some(profile));
                    this.view.set(AppView::Tracker);
                    this.sync.load_plan(plan_id);
                }
                Err(RemoteError::NotFound) => this.view.set(AppView::Welcome),
                Err(err) => {
                    web_sys::console::error_1(
                        &format!("failed to fetch profile: {}", err).into(),
                    );
                    this.sync.status.set(SyncStatus::Error);
                    if err.is_permission_denied() {
                        show_rules_help(&this.toasts);
                    }
                }
            }
        });
    }

    /// Onboarding finished: bind to the freshly created plan.
    pub fn complete_signup(&self, profile: UserProfile) {
        let plan_id = profile.workout_id.clone();
        self.profile.set(Some(profile));
        self.view.set(AppView::Tracker);
        self.sync.load_plan(plan_id);
    }

    /// Onboarding for the dev persona: everything stays local.
    pub fn complete_signup_dev(&self, mut profile: UserProfile) {
        profile.workout_id = "dev-invited-plan".to_string();
        let mut plan = storage::initial_plan();
        plan.user_name = profile.first_name.clone();
        self.profile.set(Some(profile));
        self.sync.enter_dev_mode("dev-invited-plan", plan);
        self.view.set(AppView::Tracker);
    }

    pub fn sign_out(&self) {
        storage::clear_dev_plan_marker();
        supabase::sign_out();
        self.clear_local_state();
        self.view.set(AppView::Login);
    }

    fn clear_local_state(&self) {
        self.sync.teardown();
        self.profile.set(None);
        self.auth_user.set(None);
        self.session.update(|s| s.clear());
        self.rest_stopwatch.reset();
        self.break_stopwatch.reset();
        self.celebration.set_value(None);
        self.toasts.dismiss();
    }

    pub fn is_admin(&self) -> bool {
        self.profile
            .with(|p| p.as_ref().map(|p| p.is_admin()).unwrap_or(false))
    }

    pub fn user_name(&self) -> String {
        self.sync
            .data
            .with(|d| d.as_ref().map(|p| p.user_name.clone()))
            .unwrap_or_else(|| "Guest".to_string())
    }

    // ---- profile ----

    pub fn update_user_profile(&self, updated: UserProfile) {
        self.profile.set(Some(updated.clone()));
        if self.sync.is_dev_mode() {
            return;
        }
        let Some(uid) = self.auth_user.with_untracked(|u| u.as_ref().map(|u| u.id.clone()))
        else {
            return;
        };
        let toasts = self.toasts;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = supabase::push_profile(&uid, &updated).await {
                web_sys::console::error_1(&format!("failed to update profile: {}", err).into());
                if err.is_permission_denied() {
                    show_rules_help(&toasts);
                }
            }
        });
    }

    // ---- plan transforms ----

    pub fn update_cardio(&self, phase: CardioPhase, field: CardioField, value: &str) {
        let value = value.to_string();
        self.sync
            .handle_data_change(move |p| plan::update_cardio(p, phase, field, &value));
    }

    pub fn update_exercise(&self, day: usize, ex: usize, field: ExerciseField, value: &str) {
        let value = value.to_string();
        self.sync
            .handle_data_change(move |p| plan::update_exercise(p, day, ex, field, &value));
    }

    pub fn toggle_split_mode(&self, day: usize, ex: usize) {
        self.sync
            .handle_data_change(move |p| plan::toggle_split_mode(p, day, ex));
    }

    pub fn reorder_split_weights(&self, day: usize, ex: usize) {
        self.sync
            .handle_data_change(move |p| plan::reorder_split_weights(p, day, ex));
    }

    pub fn update_progress(&self, day: usize, ex: usize, path_index: usize, checked: bool) {
        self.sync
            .handle_data_change(move |p| plan::update_progress(p, day, ex, path_index, checked));
    }

    pub fn set_cardio_visibility(&self, visible: bool) {
        self.sync
            .handle_data_change(move |p| plan::set_cardio_visibility(p, visible));
    }

    pub fn set_sections_order(&self, order: [Section; 2]) {
        self.sync
            .handle_data_change(move |p| plan::set_sections_order(p, order));
    }

    pub fn set_theme_preference(&self, theme: Theme) {
        self.sync
            .handle_data_change(move |p| plan::set_theme_preference(p, theme));
    }

    pub fn set_language_preference(&self, language: Language) {
        self.sync
            .handle_data_change(move |p| plan::set_language_preference(p, language));
    }

    /// Switching schedules abandons the running session entirely.
    pub fn switch_active_split(&self, split: SplitKind) {
        self.session.update(|s| s.clear());
        self.break_stopwatch.reset();
        self.rest_stopwatch.reset();
        self.sync
            .handle_data_change(move |p| plan::set_active_split(p, split));
    }

    pub fn reset_day(&self, day: usize) {
        self.sync.handle_data_change(move |p| plan::reset_day(p, day));
    }

    pub fn reset_week(&self) {
        self.sync.handle_data_change(plan::reset_week);
        self.session.update(|s| s.clear());
    }

    // ---- session machine ----

    pub fn phase(&self) -> SessionPhase {
        self.session.with(|s| s.phase())
    }

    pub fn active_day(&self) -> Option<usize> {
        self.session.with(|s| s.active_day())
    }

    pub fn active_exercise(&self) -> Option<usize> {
        self.session.with(|s| s.active_exercise())
    }

    pub fn break_slot(&self) -> Option<(usize, usize)> {
        self.session.with(|s| s.break_slot())
    }

    pub fn just_completed_day(&self) -> Option<usize> {
        self.session.with(|s| s.just_completed_day())
    }

    pub fn skipped_exercises(&self) -> Vec<usize> {
        self.session.with(|s| s.skipped().to_vec())
    }

    pub fn start_workout(&self, day_index: usize) {
        let Some(plan) = self.sync.data.get_untracked() else {
            return;
        };
        let Some(day) = plan.active_days().get(day_index) else {
            return;
        };
        self.session.update(|s| s.start_workout(day_index, day));
        self.break_stopwatch.reset();
    }

    pub fn cancel_workout(&self, day_index: usize) {
        let Some(plan) = self.sync.data.get_untracked() else {
            return;
        };
        let Some(day) = plan.active_days().get(day_index) else {
            return;
        };

        let mut session = self.session.get_untracked();
        match session.cancel_workout(day_index, day) {
            CancelOutcome::Cancelled => {
                self.session.set(session);
                self.break_stopwatch.reset();
                self.rest_stopwatch.reset();
            }
            CancelOutcome::Rejected => {
                self.toasts.show(
                    ToastKind::Warning,
                    "Cannot cancel",
                    "You already finished an exercise today. Undo it first if you really want to stop.",
                );
            }
            CancelOutcome::NotActive => {}
        }
    }

    pub fn mark_exercise_done(&self, day_index: usize, ex_index: usize) {
        self.rest_stopwatch.reset();

        let this = *self;
        self.sync.handle_data_change(move |current| {
            let mut next = current.clone();
            let Some(day) = next.active_days_mut().get_mut(day_index) else {
                return next;
            };
            let Some(exercise) = day.exercises.get_mut(ex_index) else {
                return next;
            };
            exercise.is_done = true;

            let mut session = this.session.get_untracked();
            match session.mark_exercise_done(day_index, day, ex_index) {
                AfterDone::DayCompleted => {
                    day.is_completed = true;
                    this.break_stopwatch.reset();
                    this.schedule_celebration_clear();
                }
                AfterDone::Break { .. } => {
                    this.break_stopwatch.start();
                }
            }
            this.session.set(session);
            next
        });
    }

    pub fn undo_mark_as_done(&self, day_index: usize, ex_index: usize) {
        let this = *self;
        self.sync.handle_data_change(move |current| {
            let mut next = current.clone();
            let Some(day) = next.active_days_mut().get_mut(day_index) else {
                return next;
            };
            let Some(exercise) = day.exercises.get_mut(ex_index) else {
                return next;
            };
            exercise.is_done = false;
            day.is_completed = false;

            let mut session = this.session.get_untracked();
            if session.undo_mark_done(day_index, ex_index) {
                this.break_stopwatch.reset();
            }
            this.session.set(session);
            next
        });
    }

    pub fn skip_exercise(&self, day_index: usize, ex_index: usize) {
        self.rest_stopwatch.reset();
        self.break_stopwatch.reset();

        let Some(plan) = self.sync.data.get_untracked() else {
            return;
        };
        let Some(day) = plan.active_days().get(day_index) else {
            return;
        };
        self.session
            .update(|s| s.skip_exercise(day_index, day, ex_index));
    }

    pub fn end_break(&self) {
        let Some(plan) = self.sync.data.get_untracked() else {
            return;
        };
        let Some((day_index, _)) = self.session.with_untracked(|s| s.break_slot()) else {
            return;
        };
        let Some(day) = plan.active_days().get(day_index) else {
            return;
        };
        self.session.update(|s| s.end_break(day));
        self.break_stopwatch.reset();
    }

    pub fn reset_just_completed_day(&self) {
        self.session.update(|s| s.reset_just_completed_day());
        self.celebration.set_value(None);
    }

    fn schedule_celebration_clear(&self) {
        let session = self.session;
        self.celebration
            .set_value(Some(Timeout::new(CELEBRATION_MS, move || {
                session.update(|s| s.reset_just_completed_day());
            })));
    }
}

fn show_rules_help(toasts: &Toasts) {
    toasts.show(
        ToastKind::RulesHelp,
        "Permission denied",
        "The document store rejected the request. Open your project's rules \
         and allow authenticated users to read and write their own profile \
         and the plan document it points to, then reload this page.",
    );
}

pub fn provide_workout_store() -> WorkoutStore {
    let store = WorkoutStore::new();
    provide_context(store);
    store
}

pub fn use_workout_store() -> WorkoutStore {
    expect_context::<WorkoutStore>()
}
