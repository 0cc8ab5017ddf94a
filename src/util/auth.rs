//! Leptos wiring for the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos has no before-each hook, so the guard runs in an effect keyed on the
//! router location. Pages render through [`Guarded`], which holds content back
//! until the guard has cleared the exact location being shown.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use super::guard::{NavigationHistory, NavigationRequest};
use super::routes::{AppRoutes, full_path};
use crate::app::SharedSession;

/// Location the guard most recently allowed.
#[derive(Clone, Copy, Debug)]
pub struct ClearedPath(pub RwSignal<Option<String>>);

/// Run the guard on every location change and apply its redirects.
///
/// Only the newest evaluation may navigate: if the user moves on while an
/// earlier evaluation is suspended, that result is dropped.
pub fn install_route_guard<F>(session: SharedSession, routes: StoredValue<AppRoutes>, cleared: ClearedPath, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    let evaluation = StoredValue::new(0_u64);
    let history = StoredValue::new(NavigationHistory::default());

    Effect::new(move || {
        let target = full_path(&location.pathname.get(), &location.search.get());
        evaluation.update_value(|n| *n += 1);
        let this_evaluation = evaluation.get_value();
        cleared.0.set(None);
        let mut request = NavigationRequest::new(target.clone());
        history.update_value(|history| request = history.next(&target));

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let store = session.get_value();
            let routes = routes.get_value();
            leptos::task::spawn_local(async move {
                use super::guard::guard_navigation;

                let decision = guard_navigation(&store, &routes, &request).await;
                if evaluation.get_value() != this_evaluation {
                    return;
                }
                match decision.location(&routes) {
                    Some(next) => navigate(&next, NavigateOptions { replace: true, ..NavigateOptions::default() }),
                    None => cleared.0.set(Some(target)),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&navigate, session, routes, this_evaluation, target, request);
        }
    });
}

/// Render children only once the guard has cleared the current location.
#[component]
pub fn Guarded(children: ChildrenFn) -> impl IntoView {
    let cleared = expect_context::<ClearedPath>();
    let location = use_location();
    let allowed = move || {
        let current = full_path(&location.pathname.get(), &location.search.get());
        cleared.0.get().is_some_and(|path| path == current)
    };

    view! {
        <Show when=allowed fallback=|| view! { <div class="page-loading">"Checking session..."</div> }>
            {children()}
        </Show>
    }
}
