//! Login page: username + password sign-in against the session store.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
#[cfg(feature = "hydrate")]
use leptos_router::{NavigateOptions, hooks::use_navigate};

use crate::net::types::Credentials;
#[cfg(feature = "hydrate")]
use crate::util::routes::AppRoutes;
use crate::util::routes::REDIRECT_PARAM;

const MISSING_FIELDS_MESSAGE: &str = "Enter both username and password.";

/// Username is trimmed; the password is sent exactly as typed.
pub(crate) fn validate_login_input(username: &str, password: &str) -> Result<Credentials, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS_MESSAGE);
    }
    Ok(Credentials { username: username.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let query = use_query_map();

    #[cfg(feature = "hydrate")]
    let session = expect_context::<crate::app::SharedSession>();
    #[cfg(feature = "hydrate")]
    let routes = expect_context::<StoredValue<AppRoutes>>();
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_login_input(&username.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let store = session.get_value();
            let redirect = query.get_untracked().get(REDIRECT_PARAM);
            let target = routes.with_value(|routes| routes.post_login_target(redirect.as_deref()));
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match store.login(&credentials).await {
                    Ok(()) => {
                        password.set(String::new());
                        navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
                    }
                    Err(message) => {
                        info.set(message);
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = credentials;
    };

    let came_from_redirect = move || query.with(|q| q.get(REDIRECT_PARAM).is_some());

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sentinel"</h1>
                <p class="login-card__subtitle">"Security Console"</p>
                <Show when=came_from_redirect>
                    <p class="login-message">"Sign in to continue."</p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
