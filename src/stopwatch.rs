use gloo_timers::callback::Interval;
use leptos::*;

/// Elapsed seconds from a wall-clock delta, so a backgrounded tab never
/// desynchronizes the displayed value from real time.
fn elapsed_secs(frozen_base: i64, started_at_ms: f64, now_ms: f64) -> i64 {
    frozen_base + ((now_ms - started_at_ms) / 1000.0).floor() as i64
}

/// Elapsed-seconds counter. `start` zeroes and runs, `stop` freezes, `reset`
/// stops and zeroes. Nothing is persisted; a reload loses the value.
#[derive(Clone, Copy)]
pub struct Stopwatch {
    value: RwSignal<i64>,
    running: RwSignal<bool>,
    frozen: RwSignal<i64>,
    started_at_ms: RwSignal<f64>,
    interval: StoredValue<Option<Interval>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            value: create_rw_signal(0),
            running: create_rw_signal(false),
            frozen: create_rw_signal(0),
            started_at_ms: create_rw_signal(0.0),
            interval: store_value(None),
        }
    }

    pub fn value(&self) -> i64 {
        self.value.get()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn start(&self) {
        self.frozen.set(0);
        self.value.set(0);
        self.started_at_ms.set(js_sys::Date::now());
        self.running.set(true);

        let value = self.value;
        let frozen = self.frozen;
        let started_at_ms = self.started_at_ms;
        let handle = Interval::new(1_000, move || {
            value.set(elapsed_secs(
                frozen.get_untracked(),
                started_at_ms.get_untracked(),
                js_sys::Date::now(),
            ));
        });
        // Replacing the handle cancels any previous tick.
        self.interval.set_value(Some(handle));
    }

    pub fn stop(&self) {
        if self.running.get_untracked() {
            self.frozen.set(self.value.get_untracked());
            self.running.set(false);
            self.interval.set_value(None);
        }
    }

    pub fn reset(&self) {
        self.running.set(false);
        self.frozen.set(0);
        self.value.set(0);
        self.interval.set_value(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_comes_from_wall_clock_delta() {
        assert_eq!(elapsed_secs(0, 1_000.0, 1_000.0), 0);
        assert_eq!(elapsed_secs(0, 1_000.0, 4_999.0), 3);
        assert_eq!(elapsed_secs(0, 1_000.0, 5_000.0), 4);
        // A long gap between ticks (tab asleep) still lands on real time.
        assert_eq!(elapsed_secs(0, 0.0, 3_600_000.0), 3_600);
    }

    #[test]
    fn frozen_base_shifts_the_count() {
        assert_eq!(elapsed_secs(42, 0.0, 10_000.0), 52);
    }
}
