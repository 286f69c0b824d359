//! # client
//!
//! Leptos + WASM frontend for the Pitwall motorsport stats site.
//!
//! This crate contains the routed pages, shared UI state, and the browser
//! adapters (`gloo-net` transport, `sessionStorage` backend) that plug into
//! the `session` crate. Build with the `csr` feature for the browser; without
//! it the browser adapters compile to inert stubs so the crate's logic can be
//! tested natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
