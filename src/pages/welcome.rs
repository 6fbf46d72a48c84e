use leptos::*;

use crate::storage;
use crate::store::use_workout_store;
use crate::supabase::{self, SignupError};
use crate::types::{Gender, UserProfile};

/// Onboarding: profile details plus the invite code that gates signup. The
/// date of birth is captured as three separate fields so no locale-dependent
/// date parsing ever runs on it.
#[component]
pub fn Welcome() -> impl IntoView {
    let store = use_workout_store();

    let (first_name, set_first_name) = create_signal(String::new());
    let (dob_day, set_dob_day) = create_signal(String::new());
    let (dob_month, set_dob_month) = create_signal(String::new());
    let (dob_year, set_dob_year) = create_signal(String::new());
    let (weight, set_weight) = create_signal(String::new());
    let (height, set_height) = create_signal(String::new());
    let (gender, set_gender) = create_signal(String::new());
    let (invite, set_invite) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (saving, set_saving) = create_signal(false);

    let submit = move |_| {
        let name = first_name.get();
        if name.trim().is_empty() {
            set_error.set(Some("Please enter your first name".into()));
            return;
        }

        let day = dob_day.get();
        let month = dob_month.get();
        let year = dob_year.get();
        let dob_complete = !day.is_empty() && !month.is_empty() && !year.is_empty();

        let auth_user = store.auth_user.get_untracked();
        let Some(user) = auth_user else {
            set_error.set(Some("You are not signed in".into()));
            return;
        };

        let profile = UserProfile {
            first_name: name.trim().to_string(),
            email: Some(user.email.clone()),
            photo_url: None,
            date_of_birth: dob_complete.then(|| format!("{}-{}-{}", year, month, day)),
            dob_day: (!day.is_empty()).then_some(day),
            dob_month: (!month.is_empty()).then_some(month),
            dob_year: (!year.is_empty()).then_some(year),
            weight: (!weight.get().is_empty()).then(|| weight.get()),
            height: (!height.get().is_empty()).then(|| height.get()),
            gender: match gender.get().as_str() {
                "male" => Some(Gender::Male),
                "female" => Some(Gender::Female),
                "other" => Some(Gender::Other),
                _ => None,
            },
            workout_id: String::new(),
            is_admin: None,
        };

        if storage::load_dev_plan_marker().as_deref() == Some(storage::DEV_INVITED) {
            store.complete_signup_dev(profile);
            return;
        }

        let invite_code = invite.get();
        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            let invite_id = (!invite_code.trim().is_empty()).then(|| invite_code.trim().to_string());
            match supabase::create_profile(&user, false, invite_id.as_deref(), profile).await {
                Ok(created) => store.complete_signup(created),
                Err(err) => {
                    let message = match err {
                        SignupError::InvitationRequired => {
                            "An invitation is required to sign up.".to_string()
                        }
                        SignupError::InvalidInvite => {
                            "This invitation is invalid or has already been used.".to_string()
                        }
                        other => other.to_string(),
                    };
                    set_error.set(Some(message));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"REPDAY"</div>
            <div class="auth-card welcome-card">
                <h2 class="auth-title">"Welcome! Tell us about yourself"</h2>

                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                <input
                    class="auth-input"
                    placeholder="First name"
                    on:input=move |ev| set_first_name.set(event_target_value(&ev))
                    prop:value=first_name
                />

                <div class="dob-row">
                    <input
                        class="auth-input dob-input"
                        placeholder="DD"
                        inputmode="numeric"
                        on:input=move |ev| set_dob_day.set(event_target_value(&ev))
                        prop:value=dob_day
                    />
                    <input
                        class="auth-input dob-input"
                        placeholder="MM"
                        inputmode="numeric"
                        on:input=move |ev| set_dob_month.set(event_target_value(&ev))
                        prop:value=dob_month
                    />
                    <input
                        class="auth-input dob-input"
                        placeholder="YYYY"
                        inputmode="numeric"
                        on:input=move |ev| set_dob_year.set(event_target_value(&ev))
                        prop:value=dob_year
                    />
                </div>

                <div class="measure-row">
                    <input
                        class="auth-input"
                        placeholder="Weight (kg)"
                        inputmode="decimal"
                        on:input=move |ev| set_weight.set(event_target_value(&ev))
                        prop:value=weight
                    />
                    <input
                        class="auth-input"
                        placeholder="Height (cm)"
                        inputmode="decimal"
                        on:input=move |ev| set_height.set(event_target_value(&ev))
                        prop:value=height
                    />
                </div>

                <select
                    class="auth-input"
                    on:change=move |ev| set_gender.set(event_target_value(&ev))
                >
                    <option value="">"Gender (optional)"</option>
                    <option value="male">"Male"</option>
                    <option value="female">"Female"</option>
                    <option value="other">"Other"</option>
                </select>

                <input
                    class="auth-input"
                    placeholder="Invite code"
                    on:input=move |ev| set_invite.set(event_target_value(&ev))
                    prop:value=invite
                />

                <button class="auth-button" on:click=submit disabled=move || saving.get()>
                    {move || if saving.get() { "Creating your plan..." } else { "Start training" }}
                </button>

                <button class="auth-link" on:click=move |_| store.sign_out()>
                    "Sign out"
                </button>
            </div>
        </div>
    }
}
