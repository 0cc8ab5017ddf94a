//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. Protected pages render through
//! `util::auth::Guarded`; the login page is public.

pub mod login;
pub mod section;
