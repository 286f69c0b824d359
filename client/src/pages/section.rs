//! Read-only listing pages for drivers, teams, and races.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use crate::state::auth::AuthState;
#[cfg(feature = "csr")]
use crate::util::auth::state_after_failure;
use crate::util::auth::{RouteAccess, install_route_guard};

/// Fields tried in order when labelling a row.
const LABEL_FIELDS: [&str; 4] = ["name", "full_name", "title", "username"];

/// Rows of a list response, either a bare array or a paginated
/// `{"count": .., "results": [..]}` envelope.
pub(crate) fn rows(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

pub(crate) fn row_label(row: &Value) -> String {
    for field in LABEL_FIELDS {
        if let Some(label) = row.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()) {
            return label.to_owned();
        }
    }
    match row.get("id") {
        Some(Value::Number(id)) => format!("#{id}"),
        Some(Value::String(id)) if !id.is_empty() => format!("#{id}"),
        _ => row.to_string(),
    }
}

pub(crate) fn row_labels(body: &Value) -> Vec<String> {
    rows(body).iter().map(row_label).collect()
}

async fn fetch_rows(endpoint: &'static str, auth: RwSignal<AuthState>) -> Result<Vec<String>, String> {
    #[cfg(feature = "csr")]
    {
        let api = crate::state::session::api();
        match api.get_json::<Value>(endpoint).await {
            Ok(body) => Ok(row_labels(&body)),
            Err(err) => {
                if let Some(state) = state_after_failure(api.session(), &err) {
                    auth.set(state);
                }
                Err(err.user_message())
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = auth;
        Err(format!("{endpoint} is only available in the browser"))
    }
}

#[component]
pub fn SectionPage(title: &'static str, endpoint: &'static str) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_route_guard(RouteAccess::Authenticated, auth, use_navigate());

    let labels = LocalResource::new(move || {
        let state = auth.get();
        let ready = state.authenticated && !state.loading;
        async move { if ready { fetch_rows(endpoint, auth).await.map(Some) } else { Ok(None) } }
    });

    view! {
        <section class="section-page">
            <h1>{title}</h1>
            {move || match labels.get() {
                None | Some(Ok(None)) => view! { <p class="section-page__status">"Loading..."</p> }.into_any(),
                Some(Err(message)) => view! { <p class="section-page__error">{message}</p> }.into_any(),
                Some(Ok(Some(items))) if items.is_empty() => {
                    view! { <p class="section-page__status">"Nothing here yet."</p> }.into_any()
                }
                Some(Ok(Some(items))) => view! {
                    <ul class="section-page__list">
                        {items.into_iter().map(|label| view! { <li>{label}</li> }).collect_view()}
                    </ul>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
pub fn DriversPage() -> impl IntoView {
    view! { <SectionPage title="Drivers" endpoint="/drivers/"/> }
}

#[component]
pub fn TeamsPage() -> impl IntoView {
    view! { <SectionPage title="Teams" endpoint="/teams/"/> }
}

#[component]
pub fn RacesPage() -> impl IntoView {
    view! { <SectionPage title="Races" endpoint="/races/"/> }
}
