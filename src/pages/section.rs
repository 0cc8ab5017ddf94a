//! Protected dashboard screen.
//!
//! One component serves every section: it renders the section title, the
//! signed-in user with a sign-out control, and a summary of the section's
//! backing collection.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::{
    NavigateOptions,
    hooks::{use_navigate, use_params_map},
};
use serde_json::Value;

use crate::state::auth::AuthState;
use crate::util::auth::Guarded;
use crate::util::routes::View;

/// Record count of a list response, paginated (`count`/`results`) or bare.
pub(crate) fn listing_count(body: &Value) -> Option<usize> {
    match body {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => map
            .get("count")
            .and_then(Value::as_u64)
            .and_then(|count| usize::try_from(count).ok())
            .or_else(|| map.get("results").and_then(Value::as_array).map(Vec::len)),
        _ => None,
    }
}

/// One-line summary of a collection or detail response.
pub(crate) fn summarize(body: &Value) -> String {
    match listing_count(body) {
        Some(1) => "1 record".to_owned(),
        Some(count) => format!("{count} records"),
        None => body
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| "Loaded.".to_owned(), str::to_owned),
    }
}

#[component]
pub fn SectionPage(view: View) -> impl IntoView {
    view! {
        <Guarded>
            <SectionBody view=view/>
        </Guarded>
    }
}

#[component]
fn SectionBody(view: View) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let summary = RwSignal::new(None::<Result<String, String>>);
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    if let Some(collection) = view.collection() {
        let client = expect_context::<crate::app::AppClient>().get_value();
        let id = use_params_map()
            .get_untracked()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok());
        leptos::task::spawn_local(async move {
            let resource = crate::net::resource::Resource::new(client, collection);
            let result = match (view, id) {
                (View::ProjectDetail, Some(id)) => resource.get(id).await,
                _ => resource.list(&[]).await,
            };
            summary.set(Some(result.map(|body| summarize(&body)).map_err(|e| e.to_string())));
        });
    }

    #[cfg(feature = "hydrate")]
    let session = expect_context::<crate::app::SharedSession>();
    #[cfg(feature = "hydrate")]
    let login_path = expect_context::<StoredValue<crate::util::routes::AppRoutes>>().with_value(|r| r.login_path());
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        if busy.get() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "hydrate")]
        {
            let store = session.get_value();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                store.logout().await;
                navigate(login_path, NavigateOptions { replace: true, ..NavigateOptions::default() });
            });
        }
    };

    let user_label = move || {
        auth.with(|state| state.user.as_ref().map(crate::net::types::User::display_name))
            .unwrap_or_default()
    };
    let summary_text = move || match summary.get() {
        None => "Loading...".to_owned(),
        Some(Ok(text)) => text,
        Some(Err(err)) => format!("Failed to load: {err}"),
    };

    view! {
        <div class="section-page">
            <header class="section-page__header">
                <h1>{view.title()}</h1>
                <span class="section-page__user">{user_label}</span>
                <button class="section-page__logout" on:click=on_logout disabled=move || busy.get()>
                    "Sign Out"
                </button>
            </header>
            <Show
                when=move || view.collection().is_some()
                fallback=move || view! { <p class="section-page__summary">"Welcome back, " {user_label} "."</p> }
            >
                <p class="section-page__summary">{summary_text}</p>
            </Show>
        </div>
    }
}
