//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (location, storage) and routing
//! policy from page logic so they can be tested off the browser.

pub mod auth;
pub mod guard;
pub mod navigation;
pub mod routes;
pub mod token_store;
