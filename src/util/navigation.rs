//! Top-level browser navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guard redirects go through the router (`use_navigate`). This module covers
//! the heavier path: a full page load used when the session can no longer be
//! trusted, so no in-memory state survives.

/// Full-page navigation seam used by the request layer.
pub trait Navigator {
    /// Path of the document currently loaded.
    fn current_path(&self) -> String;
    /// Replace the document with `path`, dropping all client state.
    fn hard_redirect(&self, path: &str);
}

/// `window.location` backed navigator. A no-op outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            "/".to_owned()
        }
    }

    fn hard_redirect(&self, path: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
        }
    }
}
