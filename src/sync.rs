//! Plan mutation engine: optimistic local apply, debounced merge-push, and a
//! revision-stamped filter that keeps the live subscription from replaying
//! our own writes back into the pipeline.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::supabase::{self, PlanSnapshot, PlanSubscription, RemoteError};
use crate::types::{SyncStatus, WorkoutPlan};

/// Quiet window before a push; edits inside it coalesce into one write.
const DEBOUNCE_MS: u32 = 1_500;

/// Holds at most one outgoing document: staging a new one replaces whatever
/// was waiting, so the eventual push always carries the latest transform
/// result and never an intermediate state.
#[derive(Debug, Default)]
struct PushPlanner {
    pending: Option<WorkoutPlan>,
}

impl PushPlanner {
    fn stage(&mut self, doc: WorkoutPlan) {
        self.pending = Some(doc);
    }

    fn take(&mut self) -> Option<WorkoutPlan> {
        self.pending.take()
    }
}

/// Tags outgoing writes and recognizes them when the subscription echoes them
/// back. A snapshot is ours iff it carries our client id with a revision we
/// have already pushed; anything else must hydrate.
#[derive(Debug, Clone)]
struct EchoFilter {
    client_id: String,
    last_pushed: u64,
}

impl EchoFilter {
    fn new(client_id: String) -> Self {
        Self {
            client_id,
            last_pushed: 0,
        }
    }

    fn stamp_next(&mut self) -> u64 {
        self.last_pushed += 1;
        self.last_pushed
    }

    fn is_self_echo(&self, origin: &str, revision: u64) -> bool {
        origin == self.client_id && revision <= self.last_pushed
    }
}

fn new_client_id() -> String {
    let now = js_sys::Date::now() as u64;
    let random = (js_sys::Math::random() * 1_000_000.0) as u64;
    format!("{:x}{:x}", now, random)
}

#[derive(Clone)]
pub struct SyncCallbacks {
    /// Push or subscription failure, after status has been set to `Error`.
    pub on_error: Rc<dyn Fn(RemoteError)>,
    /// The subscribed document vanished; local state is already torn down.
    pub on_invalidated: Rc<dyn Fn()>,
}

#[derive(Clone, Copy)]
pub struct PlanSync {
    pub data: RwSignal<Option<WorkoutPlan>>,
    pub status: RwSignal<SyncStatus>,
    pub plan_id: RwSignal<Option<String>>,
    dev_mode: RwSignal<bool>,
    filter: StoredValue<EchoFilter>,
    planner: StoredValue<PushPlanner>,
    debounce: StoredValue<Option<Timeout>>,
    subscription: StoredValue<Option<PlanSubscription>>,
    callbacks: StoredValue<SyncCallbacks>,
}

impl PlanSync {
    pub fn new(callbacks: SyncCallbacks) -> Self {
        Self {
            data: create_rw_signal(None),
            status: create_rw_signal(SyncStatus::Connecting),
            plan_id: create_rw_signal(None),
            dev_mode: create_rw_signal(false),
            filter: store_value(EchoFilter::new(new_client_id())),
            planner: store_value(PushPlanner::default()),
            debounce: store_value(None),
            subscription: store_value(None),
            callbacks: store_value(callbacks),
        }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode.get()
    }

    /// Dev personas keep every transform local; there is no document to push.
    pub fn enter_dev_mode(&self, plan_id: &str, plan: WorkoutPlan) {
        self.dev_mode.set(true);
        self.plan_id.set(Some(plan_id.to_string()));
        self.data.set(Some(plan));
        self.status.set(SyncStatus::Synced);
    }

    pub fn mark_offline(&self) {
        self.status.set(SyncStatus::Offline);
    }

    /// Single entry point for every local edit: apply the pure transform,
    /// publish the result optimistically, then debounce the remote push.
    /// A transform that changes nothing is a skippable save and does not
    /// reset the debounce window.
    pub fn handle_data_change(&self, transform: impl FnOnce(&WorkoutPlan) -> WorkoutPlan) {
        let Some(current) = self.data.get_untracked() else {
            return;
        };
        let next = transform(&current);
        if next == current {
            return;
        }
        self.data.set(Some(next.clone()));

        if self.dev_mode.get_untracked() {
            return;
        }

        self.status.set(SyncStatus::Syncing);
        self.planner.update_value(|planner| planner.stage(next));

        let this = *self;
        // Replacing the handle cancels the previous window.
        self.debounce
            .set_value(Some(Timeout::new(DEBOUNCE_MS, move || this.flush())));
    }

    fn flush(&self) {
        let Some(doc) = self.planner.try_update_value(|p| p.take()).flatten() else {
            return;
        };
        let Some(id) = self.plan_id.get_untracked() else {
            web_sys::console::error_1(&"no plan id bound, cannot save".into());
            self.status.set(SyncStatus::Error);
            return;
        };

        let revision = self
            .filter
            .try_update_value(|f| f.stamp_next())
            .unwrap_or_default();
        let origin = self.filter.with_value(|f| f.client_id.clone());

        let this = *self;
        wasm_bindgen_futures::spawn_local(async move {
            match supabase::push_plan(&id, &doc, revision, &origin, true).await {
                Ok(()) => this.status.set(SyncStatus::Synced),
                Err(err) => {
                    web_sys::console::error_1(&format!("failed to save plan: {}", err).into());
                    this.status.set(SyncStatus::Error);
                    this.callbacks.with_value(|cb| (cb.on_error)(err));
                }
            }
        });
    }

    /// Bind to a plan document and start the live subscription. The snapshot
    /// feed hydrates `data`; self-echoes are dropped by the revision filter.
    pub fn load_plan(&self, id: String) {
        self.status.set(SyncStatus::Syncing);
        self.plan_id.set(Some(id.clone()));

        let this = *self;
        let on_snapshot: Rc<dyn Fn(Option<PlanSnapshot>)> = Rc::new(move |snap| match snap {
            Some(snap) => this.apply_snapshot(snap),
            None => this.invalidate(),
        });
        let on_error: Rc<dyn Fn(RemoteError)> = Rc::new(move |err| {
            this.status.set(SyncStatus::Error);
            this.callbacks.with_value(|cb| (cb.on_error)(err));
        });

        let subscription = supabase::subscribe_plan(id, on_snapshot, on_error);
        self.subscription.set_value(Some(subscription));
    }

    fn apply_snapshot(&self, snap: PlanSnapshot) {
        let echo = self
            .filter
            .with_value(|f| f.is_self_echo(&snap.origin, snap.revision));
        if echo {
            return;
        }
        self.data.set(Some(snap.data));
        self.status.set(SyncStatus::Synced);
    }

    fn invalidate(&self) {
        self.teardown();
        self.callbacks.with_value(|cb| (cb.on_invalidated)());
    }

    /// Drop the subscription and all plan state: logout, invalidated plan.
    pub fn teardown(&self) {
        if let Some(subscription) = self.subscription.try_update_value(|s| s.take()).flatten() {
            subscription.unsubscribe();
        }
        self.debounce.set_value(None);
        self.planner.update_value(|p| {
            p.take();
        });
        self.plan_id.set(None);
        self.data.set(None);
        self.dev_mode.set(false);
        self.status.set(SyncStatus::Connecting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{update_exercise, update_progress};
    use crate::storage::initial_plan;
    use crate::types::ExerciseField;

    #[test]
    fn rapid_edits_coalesce_into_one_push_with_both_applied() {
        let original = initial_plan();
        let mut planner = PushPlanner::default();

        // T1 then T2 inside the quiet window.
        let after_t1 = update_exercise(&original, 0, 0, ExerciseField::Weight, "20");
        planner.stage(after_t1.clone());
        let after_t2 = update_progress(&after_t1, 0, 0, 0, true);
        planner.stage(after_t2.clone());

        // Exactly one write goes out and it carries T2 applied after T1.
        let pushed = planner.take().unwrap();
        assert_eq!(pushed, after_t2);
        assert_eq!(pushed.active_days()[0].exercises[0].weight, "20");
        assert!(pushed.active_days()[0].exercises[0].progress[0]);
        assert!(planner.take().is_none());
    }

    #[test]
    fn echo_filter_drops_own_writes_only() {
        let mut filter = EchoFilter::new("me".into());
        let r1 = filter.stamp_next();
        let r2 = filter.stamp_next();
        assert_eq!((r1, r2), (1, 2));

        assert!(filter.is_self_echo("me", 1));
        assert!(filter.is_self_echo("me", 2));
        // A foreign client at any revision must hydrate.
        assert!(!filter.is_self_echo("someone-else", 1));
        // A later revision under our id would be a write we did not make.
        assert!(!filter.is_self_echo("me", 3));
    }

    #[test]
    fn echo_filter_has_no_timing_window() {
        let mut filter = EchoFilter::new("me".into());
        let rev = filter.stamp_next();
        for _ in 0..1_000 {
            assert!(filter.is_self_echo("me", rev));
        }
    }
}
