//! # sentinel-console
//!
//! Leptos + WASM frontend for the Sentinel security dashboard.
//!
//! This crate contains the request layer that talks to the REST backend, the
//! session store that owns authentication state, and the navigation guard that
//! keeps protected screens behind a sign-in.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
