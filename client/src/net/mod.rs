//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` adapts `gloo-net` to the session core's `Transport` seam; all
//! API traffic goes through `session::ApiClient` on top of it.

pub mod transport;
