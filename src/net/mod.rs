//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` is the shared request pipeline, `intercept` holds the auth
//! interceptors installed on it, and `transport` performs the actual browser
//! fetch. `api` and `resource` are typed call sites on top; `types` defines the
//! wire schema.

pub mod api;
pub mod client;
pub mod config;
pub mod intercept;
pub mod resource;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
