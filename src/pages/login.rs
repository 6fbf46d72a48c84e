use leptos::*;

use crate::storage::{DEV_ADMIN, DEV_INVITED};
use crate::store::use_workout_store;
use crate::supabase;

#[component]
pub fn Login() -> impl IntoView {
    let store = use_workout_store();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (loading, set_loading) = create_signal(false);
    let (registering, set_registering) = create_signal(false);

    let submit = move |_| {
        let email = email.get();
        let password = password.get();

        if registering.get() && password.len() < 6 {
            set_error.set(Some("Password must be at least 6 characters".into()));
            return;
        }

        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            let result = if registering.get_untracked() {
                supabase::sign_up(&email, &password).await
            } else {
                supabase::sign_in(&email, &password).await
            };
            match result {
                Ok(auth) => store.complete_sign_in(auth),
                Err(e) => {
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"REPDAY"</div>
            <div class="auth-card">
                <h2 class="auth-title">
                    {move || if registering.get() { "Create account" } else { "Sign in" }}
                </h2>

                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                <input
                    type="email"
                    class="auth-input"
                    placeholder="Email"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                />

                <input
                    type="password"
                    class="auth-input"
                    placeholder="Password"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                />

                <button class="auth-button" on:click=submit disabled=move || loading.get()>
                    {move || {
                        if loading.get() {
                            "One moment..."
                        } else if registering.get() {
                            "Create account"
                        } else {
                            "Sign in"
                        }
                    }}
                </button>

                <div class="auth-switch">
                    {move || if registering.get() { "Already have an account? " } else { "No account yet? " }}
                    <button
                        class="auth-link"
                        on:click=move |_| set_registering.update(|r| *r = !*r)
                    >
                        {move || if registering.get() { "Sign in" } else { "Register" }}
                    </button>
                </div>
            </div>

            // Local-only personas for poking at the app without a backend.
            <div class="dev-row">
                <button class="dev-link" on:click=move |_| store.dev_sign_in(DEV_ADMIN)>
                    "dev: admin"
                </button>
                <button class="dev-link" on:click=move |_| store.dev_sign_in(DEV_INVITED)>
                    "dev: new user"
                </button>
            </div>
        </div>
    }
}
