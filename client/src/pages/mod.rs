//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page installs its route guard on mount, then owns route-scoped
//! orchestration. Only login and register carry real form logic; the rest
//! render whatever the API returns.

pub mod admin;
pub mod dashboard;
pub mod login;
pub mod register;
pub mod section;
