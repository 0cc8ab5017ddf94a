//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the one shared API client and session store for the tab and
//! publishes them through context. The store and client hold `Rc` state, so
//! they live in local `StoredValue`s; components read the `AuthState` signal
//! for rendering.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
    hooks::use_navigate,
};

use crate::net::api::AuthApi;
use crate::net::client::ApiClient;
use crate::net::config::{ApiConfig, AuthMode};
use crate::net::intercept::standard_client;
use crate::net::transport::BrowserTransport;
use crate::pages::{login::LoginPage, section::SectionPage};
use crate::state::auth::AuthState;
use crate::state::session::SessionStore;
use crate::util::auth::{ClearedPath, install_route_guard};
use crate::util::navigation::BrowserNavigator;
use crate::util::routes::{AppRoutes, View};
use crate::util::token_store::TokenStore;

/// Session store backed by the browser transport.
pub type AppSession = SessionStore<BrowserTransport>;
/// Context handle for the tab's session store.
pub type SharedSession = StoredValue<AppSession, LocalStorage>;
/// Context handle for the tab's API client.
pub type AppClient = StoredValue<ApiClient<BrowserTransport>, LocalStorage>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ApiConfig::from_build_env().unwrap_or_else(|err| {
        log::warn!("config: {err}; falling back to defaults");
        ApiConfig::default()
    });
    let routes = AppRoutes::dashboard();
    let tokens = TokenStore::new();
    let bearer = config.auth_mode == AuthMode::Bearer;

    let client = standard_client(config, BrowserTransport, BrowserNavigator, &tokens, routes.login_path());
    let store = SessionStore::new(AuthApi::new(client.clone(), bearer.then_some(tokens)));

    // Components only ever read this mirror; the store is the sole writer.
    let auth = RwSignal::new(AuthState::default());
    store.subscribe(move |session, populated| auth.set(AuthState::from_session(session, populated)));

    provide_context::<SharedSession>(StoredValue::new_local(store));
    provide_context::<AppClient>(StoredValue::new_local(client));
    provide_context(StoredValue::new(routes));
    provide_context(auth);
    provide_context(ClearedPath(RwSignal::new(None)));

    view! {
        <Stylesheet id="leptos" href="/pkg/sentinel-console.css"/>
        <Title text="Sentinel"/>

        <Router>
            <RouteGuard/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=|| view! { <SectionPage view=View::Dashboard/> }/>
                <Route path=StaticSegment("users") view=|| view! { <SectionPage view=View::Users/> }/>
                <Route path=StaticSegment("projects") view=|| view! { <SectionPage view=View::Projects/> }/>
                <Route
                    path=(StaticSegment("projects"), ParamSegment("id"))
                    view=|| view! { <SectionPage view=View::ProjectDetail/> }
                />
                <Route path=StaticSegment("versions") view=|| view! { <SectionPage view=View::Versions/> }/>
                <Route
                    path=StaticSegment("vulnerabilities")
                    view=|| view! { <SectionPage view=View::Vulnerabilities/> }
                />
                <Route path=StaticSegment("cicd") view=|| view! { <SectionPage view=View::Cicd/> }/>
                <Route path=StaticSegment("risk") view=|| view! { <SectionPage view=View::Risk/> }/>
                <Route path=StaticSegment("system") view=|| view! { <SectionPage view=View::System/> }/>
            </Routes>
        </Router>
    }
}

/// Installs the navigation guard; must sit inside `<Router>`.
#[component]
fn RouteGuard() -> impl IntoView {
    let session = expect_context::<SharedSession>();
    let routes = expect_context::<StoredValue<AppRoutes>>();
    let cleared = expect_context::<ClearedPath>();
    install_route_guard(session, routes, cleared, use_navigate());
}
