//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` owns the one `AuthSession` for the tab; `auth` is the reactive
//! snapshot of it that components render from.

pub mod auth;
pub mod session;
