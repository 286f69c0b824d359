//! Signed-in landing page with site-wide counters.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde::Deserialize;

use crate::state::auth::AuthState;
#[cfg(feature = "csr")]
use crate::util::auth::state_after_failure;
use crate::util::auth::{RouteAccess, install_route_guard};

/// Body of `GET /stats/`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApiStats {
    pub total_teams: u64,
    pub total_drivers: u64,
    pub total_seasons: u64,
    pub total_races: u64,
    pub total_results: u64,
    #[serde(default)]
    pub top_points: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub hint: &'static str,
}

pub(crate) fn stat_cards(stats: &ApiStats) -> Vec<StatCard> {
    let card = |label, value: String, hint| StatCard { label, value, hint };
    vec![
        card("Teams", stats.total_teams.to_string(), "Constructors"),
        card("Drivers", stats.total_drivers.to_string(), "Active records"),
        card("Seasons", stats.total_seasons.to_string(), "Tracked years"),
        card("Races", stats.total_races.to_string(), "Calendar entries"),
        card("Results", stats.total_results.to_string(), "Race results"),
        card("Top points", format_points(stats.top_points), "Best driver total"),
    ]
}

/// Whole numbers print without a fraction; half points keep one decimal.
fn format_points(points: f64) -> String {
    if points.fract() == 0.0 { format!("{points:.0}") } else { format!("{points:.1}") }
}

async fn fetch_stats(auth: RwSignal<AuthState>) -> Result<ApiStats, String> {
    #[cfg(feature = "csr")]
    {
        let api = crate::state::session::api();
        api.get_json::<ApiStats>("/stats/").await.map_err(|err| {
            if let Some(state) = state_after_failure(api.session(), &err) {
                auth.set(state);
            }
            err.user_message()
        })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = auth;
        Err("stats are only available in the browser".to_owned())
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_route_guard(RouteAccess::Authenticated, auth, use_navigate());

    // Wait for the guard so the first request carries a settled session.
    let stats = LocalResource::new(move || {
        let state = auth.get();
        let ready = state.authenticated && !state.loading;
        async move { if ready { fetch_stats(auth).await.map(Some) } else { Ok(None) } }
    });

    view! {
        <section class="dashboard">
            <h1>"Dashboard"</h1>
            {move || match stats.get() {
                None | Some(Ok(None)) => view! { <p class="dashboard__status">"Loading..."</p> }.into_any(),
                Some(Err(message)) => view! { <p class="dashboard__error">{message}</p> }.into_any(),
                Some(Ok(Some(stats))) => view! {
                    <div class="stat-grid">
                        {stat_cards(&stats)
                            .into_iter()
                            .map(|card| view! {
                                <div class="stat-card">
                                    <span class="stat-card__label">{card.label}</span>
                                    <strong class="stat-card__value">{card.value}</strong>
                                    <span class="stat-card__hint">{card.hint}</span>
                                </div>
                            })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </section>
    }
}
