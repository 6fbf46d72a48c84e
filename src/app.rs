use leptos::*;

use crate::pages::{Login, Tracker, Welcome};
use crate::store::{provide_workout_store, use_workout_store, ToastKind};
use crate::types::{AppView, Language, SyncStatus, Theme};

#[component]
pub fn App() -> impl IntoView {
    let store = provide_workout_store();
    store.bootstrap();

    // Theme and language preferences land on the document root.
    create_effect(move |_| {
        let (theme, lang) = store.sync.data.with(|d| {
            d.as_ref()
                .map(|p| (p.settings.theme, p.settings.language))
                .unwrap_or((Theme::Light, Language::En))
        });
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let _ = root.set_attribute(
                "data-theme",
                match theme {
                    Theme::Light => "light",
                    Theme::Dark => "dark",
                },
            );
            let _ = root.set_attribute(
                "lang",
                match lang {
                    Language::En => "en",
                    Language::Ro => "ro",
                },
            );
        }
    });

    view! {
        <div class="app">
            {move || (store.sync.status.get() == SyncStatus::Offline).then(|| view! {
                <div class="offline-banner">
                    "No document store is configured. Your data cannot be synced."
                </div>
            })}

            {move || match store.view.get() {
                AppView::Login => view! { <Login /> }.into_view(),
                AppView::Welcome => view! { <Welcome /> }.into_view(),
                AppView::Tracker => view! { <Tracker /> }.into_view(),
            }}

            <ToastHost />
        </div>
    }
}

#[component]
fn ToastHost() -> impl IntoView {
    let store = use_workout_store();

    view! {
        {move || store.toasts.current.get().map(|toast| {
            let class = match toast.kind {
                ToastKind::Info => "toast info",
                ToastKind::Warning => "toast warning",
                ToastKind::RulesHelp => "toast rules-help",
            };
            view! {
                <div class=class>
                    <div class="toast-title">{toast.title}</div>
                    <div class="toast-message">{toast.message}</div>
                    <button class="toast-close" on:click=move |_| store.toasts.dismiss()>
                        "✕"
                    </button>
                </div>
            }
        })}
    }
}
