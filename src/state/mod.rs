//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` owns authentication truth; `auth` is its reactive mirror for
//! components.

pub mod auth;
pub mod session;
