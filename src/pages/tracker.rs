use leptos::*;

use crate::session::SessionPhase;
use crate::store::{use_workout_store, ToastKind, WorkoutStore};
use crate::supabase;
use crate::types::*;

fn format_time(secs: i64) -> String {
    let mins = secs / 60;
    let s = secs % 60;
    format!("{:02}:{:02}", mins, s)
}

fn read_exercise<T: Clone + Default + 'static>(
    store: WorkoutStore,
    day: usize,
    ex: usize,
    f: impl Fn(&Exercise) -> T + Copy + 'static,
) -> impl Fn() -> T + Copy {
    move || {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day))
                .and_then(|day| day.exercises.get(ex))
                .map(f)
                .unwrap_or_default()
        })
    }
}

#[component]
pub fn Tracker() -> impl IntoView {
    let store = use_workout_store();
    let (menu_open, set_menu_open) = create_signal(false);

    let sections = create_memo(move |_| {
        store
            .sync
            .data
            .with(|d| d.as_ref().map(|p| p.settings.sections_order))
    });

    view! {
        <div class="tracker">
            <header class="tracker-header">
                <div class="tracker-title">{move || store.user_name()}</div>
                <div class=move || format!("status-pill {}", store.sync.status.get().as_str())>
                    {move || store.sync.status.get().as_str()}
                </div>
                <button class="menu-toggle" on:click=move |_| set_menu_open.update(|o| *o = !*o)>
                    "⚙"
                </button>
            </header>

            {move || menu_open.get().then(|| view! { <SettingsMenu /> })}

            {move || match sections.get() {
                None => view! { <div class="loading">"Loading your plan..."</div> }.into_view(),
                Some(order) => order
                    .iter()
                    .map(|section| match section {
                        Section::Cardio => view! { <CardioSection /> }.into_view(),
                        Section::Strength => view! { <StrengthSection /> }.into_view(),
                    })
                    .collect_view(),
            }}
        </div>
    }
}

// ---- cardio ----

#[component]
fn CardioSection() -> impl IntoView {
    let store = use_workout_store();

    let visible = create_memo(move |_| {
        store
            .sync
            .data
            .with(|d| d.as_ref().map(|p| p.settings.cardio_visible).unwrap_or(false))
    });

    view! {
        {move || visible.get().then(|| view! {
            <section class="cardio-section">
                <h2 class="section-title">"Cardio protocol"</h2>
                <div class="cardio-grid">
                    <CardioPhaseCard phase=CardioPhase::Warmup label="Warm-up" />
                    <CardioPhaseCard phase=CardioPhase::Main label="Main" />
                    <CardioPhaseCard phase=CardioPhase::High label="High intensity" />
                    <CardioPhaseCard phase=CardioPhase::Cooldown label="Cool-down" />
                </div>
            </section>
        })}
    }
}

#[component]
fn CardioPhaseCard(phase: CardioPhase, label: &'static str) -> impl IntoView {
    let store = use_workout_store();
    let has_cycles = matches!(phase, CardioPhase::Main | CardioPhase::High);

    let field_value = move |field: CardioField| {
        move || {
            store.sync.data.with(|d| {
                let Some(plan) = d.as_ref() else {
                    return String::new();
                };
                let (duration, level, rpm, cycles) = match phase {
                    CardioPhase::Warmup => {
                        let v = &plan.cardio.warmup;
                        (v.duration.clone(), v.level.clone(), v.rpm.clone(), String::new())
                    }
                    CardioPhase::Cooldown => {
                        let v = &plan.cardio.cooldown;
                        (v.duration.clone(), v.level.clone(), v.rpm.clone(), String::new())
                    }
                    CardioPhase::Main => {
                        let v = &plan.cardio.main;
                        (v.duration.clone(), v.level.clone(), v.rpm.clone(), v.cycles.clone())
                    }
                    CardioPhase::High => {
                        let v = &plan.cardio.high;
                        (v.duration.clone(), v.level.clone(), v.rpm.clone(), v.cycles.clone())
                    }
                };
                match field {
                    CardioField::Duration => duration,
                    CardioField::Level => level,
                    CardioField::Rpm => rpm,
                    CardioField::Cycles => cycles,
                }
            })
        }
    };

    let input_for = move |field: CardioField, name: &'static str| {
        view! {
            <label class="cardio-field">
                <span class="cardio-field-label">{name}</span>
                <input
                    class="cardio-input"
                    inputmode="decimal"
                    prop:value=field_value(field)
                    on:input=move |ev| store.update_cardio(phase, field, &event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="cardio-card">
            <div class="cardio-card-title">{label}</div>
            {has_cycles.then(|| input_for(CardioField::Cycles, "cycles"))}
            {input_for(CardioField::Duration, "min")}
            {input_for(CardioField::Level, "level")}
            {input_for(CardioField::Rpm, "rpm")}
        </div>
    }
}

// ---- strength ----

#[component]
fn StrengthSection() -> impl IntoView {
    let store = use_workout_store();

    let day_count = create_memo(move |_| {
        store
            .sync
            .data
            .with(|d| d.as_ref().map(|p| p.active_days().len()).unwrap_or(0))
    });

    view! {
        <section class="strength-section">
            <h2 class="section-title">"Strength split"</h2>
            {move || {
                (0..day_count.get())
                    .map(|ix| view! { <DayCard day_index=ix /> })
                    .collect_view()
            }}
        </section>
    }
}

#[component]
fn DayCard(day_index: usize) -> impl IntoView {
    let store = use_workout_store();

    let day_label = move || {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day_index))
                .map(|day| day.day.clone())
                .unwrap_or_default()
        })
    };
    let is_completed = move || {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day_index))
                .map(|day| day.is_completed)
                .unwrap_or(false)
        })
    };
    let done_count = move || {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day_index))
                .map(|day| {
                    let done = day.exercises.iter().filter(|ex| ex.is_done).count();
                    format!("{}/{}", done, day.exercises.len())
                })
                .unwrap_or_default()
        })
    };

    let is_active = move || store.active_day() == Some(day_index);
    let is_idle = move || matches!(store.phase(), SessionPhase::Idle);
    let on_break_here = move || store.break_slot().map(|(d, _)| d) == Some(day_index);
    let celebrating = move || store.just_completed_day() == Some(day_index);

    let ex_count = create_memo(move |_| {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day_index))
                .map(|day| day.exercises.len())
                .unwrap_or(0)
        })
    });

    view! {
        <div class=move || {
            if is_active() || on_break_here() {
                "day-card active"
            } else {
                "day-card"
            }
        }>
            <div class="day-header">
                <span class=move || {
                    let icon = store.sync.data.with(|d| {
                        d.as_ref()
                            .and_then(|p| p.active_days().get(day_index))
                            .map(|day| day.icon.clone())
                            .unwrap_or_default()
                    });
                    format!("day-icon icon-{}", icon.to_lowercase())
                }></span>
                <span class="day-name">{day_label}</span>
                <span class="day-progress">{done_count}</span>

                {move || is_completed().then(|| view! {
                    <span class="day-completed-badge">"✓"</span>
                    <button class="day-reset-btn" on:click=move |_| store.reset_day(day_index)>
                        "Reset day"
                    </button>
                })}

                {move || (is_idle() && !is_completed()).then(|| view! {
                    <button class="day-start-btn" on:click=move |_| store.start_workout(day_index)>
                        "Start"
                    </button>
                })}

                {move || is_active().then(|| view! {
                    <button class="day-cancel-btn" on:click=move |_| store.cancel_workout(day_index)>
                        "Cancel"
                    </button>
                })}
            </div>

            {move || celebrating().then(|| view! {
                <div class="celebration" on:click=move |_| store.reset_just_completed_day()>
                    "Day complete! Great work!"
                </div>
            })}

            {move || on_break_here().then(|| view! { <BreakPanel /> })}

            {move || {
                (0..ex_count.get())
                    .map(|ix| view! { <ExerciseCard day_index=day_index ex_index=ix /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn BreakPanel() -> impl IntoView {
    let store = use_workout_store();

    view! {
        <div class="break-panel">
            <div class="break-label">"BREAK"</div>
            <div class="break-timer">{move || format_time(store.break_stopwatch.value())}</div>
            <button class="break-continue-btn" on:click=move |_| store.end_break()>
                "Continue"
            </button>
        </div>
    }
}

#[component]
fn ExerciseCard(day_index: usize, ex_index: usize) -> impl IntoView {
    let store = use_workout_store();

    let name = read_exercise(store, day_index, ex_index, |ex| ex.name.clone());
    let hint = read_exercise(store, day_index, ex_index, |ex| ex.hint.clone());
    let reps = read_exercise(store, day_index, ex_index, |ex| ex.reps.clone());
    let is_done = read_exercise(store, day_index, ex_index, |ex| ex.is_done);
    let weight = read_exercise(store, day_index, ex_index, |ex| ex.weight.clone());
    let progress = read_exercise(store, day_index, ex_index, |ex| ex.progress);

    let split_mode = create_memo(move |_| {
        store.sync.data.with(|d| {
            d.as_ref()
                .and_then(|p| p.active_days().get(day_index))
                .and_then(|day| day.exercises.get(ex_index))
                .map(|ex| ex.weight_mode == WeightMode::Split)
                .unwrap_or(false)
        })
    });

    let is_active_exercise = move || {
        store.active_day() == Some(day_index) && store.active_exercise() == Some(ex_index)
    };
    let is_skipped = move || {
        store.active_day() == Some(day_index) && store.skipped_exercises().contains(&ex_index)
    };

    view! {
        <div class=move || {
            let mut class = String::from("exercise-card");
            if is_done() {
                class.push_str(" done");
            }
            if is_active_exercise() {
                class.push_str(" active");
            }
            if is_skipped() {
                class.push_str(" skipped");
            }
            class
        }>
            <div class="exercise-row">
                <span class="exercise-name">{name}</span>
                <input
                    class="reps-input"
                    prop:value=reps
                    on:input=move |ev| {
                        store.update_exercise(
                            day_index,
                            ex_index,
                            ExerciseField::Reps,
                            &event_target_value(&ev),
                        )
                    }
                />
            </div>

            {move || hint().map(|h| view! { <div class="exercise-hint">{h}</div> })}

            <div class="exercise-progress">
                {(0..3)
                    .map(|path_index| {
                        view! {
                            <input
                                type="checkbox"
                                class="progress-check"
                                prop:checked=move || progress()[path_index]
                                on:change=move |ev| {
                                    store.update_progress(
                                        day_index,
                                        ex_index,
                                        path_index,
                                        event_target_checked(&ev),
                                    )
                                }
                            />
                        }
                    })
                    .collect_view()}
            </div>

            {move || if split_mode.get() {
                view! { <SplitWeightInputs day_index=day_index ex_index=ex_index /> }.into_view()
            } else {
                view! {
                    <div class="weight-row">
                        <input
                            class="weight-input"
                            inputmode="decimal"
                            prop:value=weight
                            on:input=move |ev| {
                                store.update_exercise(
                                    day_index,
                                    ex_index,
                                    ExerciseField::Weight,
                                    &event_target_value(&ev),
                                )
                            }
                        />
                        <span class="weight-unit">"kg"</span>
                        <button
                            class="split-toggle"
                            on:click=move |_| store.toggle_split_mode(day_index, ex_index)
                        >
                            "Per-set weights"
                        </button>
                    </div>
                }
                .into_view()
            }}

            <div class="exercise-actions">
                {move || {
                    if is_done() {
                        view! {
                            <button
                                class="undo-btn"
                                on:click=move |_| store.undo_mark_as_done(day_index, ex_index)
                            >
                                "Undo"
                            </button>
                        }
                        .into_view()
                    } else if is_active_exercise() {
                        view! {
                            <button
                                class="done-btn"
                                on:click=move |_| store.mark_exercise_done(day_index, ex_index)
                            >
                                "Done"
                            </button>
                            <button
                                class="skip-btn"
                                on:click=move |_| store.skip_exercise(day_index, ex_index)
                            >
                                "Skip"
                            </button>
                        }
                        .into_view()
                    } else {
                        ().into_view()
                    }
                }}
            </div>

            {move || is_active_exercise().then(|| view! { <RestStopwatch /> })}
        </div>
    }
}

#[component]
fn SplitWeightInputs(day_index: usize, ex_index: usize) -> impl IntoView {
    let store = use_workout_store();

    let slot_value = move |slot: SetSlot| {
        read_exercise(store, day_index, ex_index, move |ex| match slot {
            SetSlot::One => ex.split_weights.set1.clone(),
            SetSlot::Two => ex.split_weights.set2.clone(),
            SetSlot::Three => ex.split_weights.set3.clone(),
        })
    };

    let slot_input = move |slot: SetSlot, label: &'static str| {
        view! {
            <label class="split-field">
                <span class="split-field-label">{label}</span>
                <input
                    class="weight-input split"
                    inputmode="decimal"
                    prop:value=slot_value(slot)
                    on:input=move |ev| {
                        store.update_exercise(
                            day_index,
                            ex_index,
                            ExerciseField::SplitSet(slot),
                            &event_target_value(&ev),
                        )
                    }
                />
            </label>
        }
    };

    view! {
        <div class="split-weights-row">
            {slot_input(SetSlot::One, "set 1")}
            {slot_input(SetSlot::Two, "set 2")}
            {slot_input(SetSlot::Three, "set 3")}
            <button
                class="reorder-btn"
                title="Order sets light, heavy, medium"
                on:click=move |_| store.reorder_split_weights(day_index, ex_index)
            >
                "Reorder"
            </button>
            <button
                class="split-toggle"
                on:click=move |_| store.toggle_split_mode(day_index, ex_index)
            >
                "Single weight"
            </button>
        </div>
    }
}

#[component]
fn RestStopwatch() -> impl IntoView {
    let store = use_workout_store();
    let sw = store.rest_stopwatch;

    view! {
        <div class="rest-stopwatch">
            <span class="rest-label">"Rest"</span>
            <span class="rest-value">{move || format_time(sw.value())}</span>
            {move || {
                if sw.is_running() {
                    view! {
                        <button class="rest-btn" on:click=move |_| sw.stop()>"Stop"</button>
                    }
                    .into_view()
                } else {
                    view! {
                        <button class="rest-btn" on:click=move |_| sw.start()>"Start"</button>
                    }
                    .into_view()
                }
            }}
            <button class="rest-btn" on:click=move |_| sw.reset()>"Reset"</button>
        </div>
    }
}

// ---- settings ----

#[component]
fn SettingsMenu() -> impl IntoView {
    let store = use_workout_store();

    let settings = create_memo(move |_| {
        store
            .sync
            .data
            .with(|d| d.as_ref().map(|p| p.settings.clone()))
    });

    let active_split = move || settings.get().map(|s| s.active_split);
    let cardio_visible = move || settings.get().map(|s| s.cardio_visible).unwrap_or(true);
    let cardio_first = move || {
        settings
            .get()
            .map(|s| s.sections_order[0] == Section::Cardio)
            .unwrap_or(true)
    };
    let theme = move || settings.get().map(|s| s.theme).unwrap_or(Theme::Light);
    let language = move || settings.get().map(|s| s.language).unwrap_or(Language::En);

    let invite_busy = create_rw_signal(false);

    view! {
        <div class="settings-menu">
            <div class="settings-group">
                <span class="settings-label">"Split"</span>
                <button
                    class=move || {
                        if active_split() == Some(SplitKind::FiveDay) {
                            "settings-option selected"
                        } else {
                            "settings-option"
                        }
                    }
                    on:click=move |_| store.switch_active_split(SplitKind::FiveDay)
                >
                    "5-day"
                </button>
                <button
                    class=move || {
                        if active_split() == Some(SplitKind::ThreeDay) {
                            "settings-option selected"
                        } else {
                            "settings-option"
                        }
                    }
                    on:click=move |_| store.switch_active_split(SplitKind::ThreeDay)
                >
                    "3-day"
                </button>
            </div>

            <div class="settings-group">
                <button
                    class="settings-option"
                    on:click=move |_| store.set_cardio_visibility(!cardio_visible())
                >
                    {move || if cardio_visible() { "Hide cardio" } else { "Show cardio" }}
                </button>
                <button
                    class="settings-option"
                    on:click=move |_| {
                        let order = if cardio_first() {
                            [Section::Strength, Section::Cardio]
                        } else {
                            [Section::Cardio, Section::Strength]
                        };
                        store.set_sections_order(order);
                    }
                >
                    {move || if cardio_first() { "Strength first" } else { "Cardio first" }}
                </button>
            </div>

            <div class="settings-group">
                <button
                    class="settings-option"
                    on:click=move |_| {
                        let next = match theme() {
                            Theme::Light => Theme::Dark,
                            Theme::Dark => Theme::Light,
                        };
                        store.set_theme_preference(next);
                    }
                >
                    {move || match theme() {
                        Theme::Light => "Dark theme",
                        Theme::Dark => "Light theme",
                    }}
                </button>
                <button
                    class="settings-option"
                    on:click=move |_| {
                        let next = match language() {
                            Language::En => Language::Ro,
                            Language::Ro => Language::En,
                        };
                        store.set_language_preference(next);
                    }
                >
                    {move || match language() {
                        Language::En => "Română",
                        Language::Ro => "English",
                    }}
                </button>
            </div>

            <div class="settings-group">
                <button class="settings-option danger" on:click=move |_| store.reset_week()>
                    "Reset week"
                </button>
            </div>

            {move || store.is_admin().then(|| view! {
                <div class="settings-group">
                    <button
                        class="settings-option"
                        disabled=move || invite_busy.get()
                        on:click=move |_| {
                            invite_busy.set(true);
                            spawn_local(async move {
                                match supabase::create_invite().await {
                                    Ok(id) => store.toasts.show(
                                        ToastKind::Info,
                                        "Invite created",
                                        &format!("Share this code: {}", id),
                                    ),
                                    Err(err) => store.toasts.show(
                                        ToastKind::Warning,
                                        "Invite failed",
                                        &err.to_string(),
                                    ),
                                }
                                invite_busy.set(false);
                            });
                        }
                    >
                        "New invite"
                    </button>
                </div>
            })}

            <ProfileEditor />

            <div class="settings-group">
                <button class="settings-option" on:click=move |_| store.sign_out()>
                    "Sign out"
                </button>
            </div>
        </div>
    }
}

#[component]
fn ProfileEditor() -> impl IntoView {
    let store = use_workout_store();

    let (weight, set_weight) = create_signal(store.profile.with_untracked(|p| {
        p.as_ref()
            .and_then(|p| p.weight.clone())
            .unwrap_or_default()
    }));
    let (height, set_height) = create_signal(store.profile.with_untracked(|p| {
        p.as_ref()
            .and_then(|p| p.height.clone())
            .unwrap_or_default()
    }));

    let save = move |_| {
        let Some(mut profile) = store.profile.get_untracked() else {
            return;
        };
        profile.weight = (!weight.get().is_empty()).then(|| weight.get());
        profile.height = (!height.get().is_empty()).then(|| height.get());
        store.update_user_profile(profile);
        store
            .toasts
            .show(ToastKind::Info, "Profile updated", "Your details were saved.");
    };

    view! {
        <div class="settings-group">
            <span class="settings-label">"Profile"</span>
            <input
                class="weight-input"
                inputmode="decimal"
                placeholder="kg"
                on:input=move |ev| set_weight.set(event_target_value(&ev))
                prop:value=weight
            />
            <input
                class="weight-input"
                inputmode="decimal"
                placeholder="cm"
                on:input=move |ev| set_height.set(event_target_value(&ev))
                prop:value=height
            />
            <button class="settings-option" on:click=save>"Save"</button>
        </div>
    }
}
