//! Browser-facing helpers for pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` binds route access rules to the session guards; `storage` is the
//! `sessionStorage` backend the session persists through.

pub mod auth;
pub mod storage;
