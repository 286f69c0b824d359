//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::pages::{
    admin::AdminPage,
    dashboard::DashboardPage,
    login::LoginPage,
    register::RegisterPage,
    section::{DriversPage, RacesPage, TeamsPage},
};
use crate::state::auth::AuthState;
use crate::state::session::client_session;

/// Root application component.
///
/// Seeds the auth context from the persisted session so the nav bar renders
/// the right links before any guard has run.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::snapshot(&client_session()));
    provide_context(auth);

    view! {
        <Title text="Pitwall"/>

        <Router>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=DashboardPage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=StaticSegment("drivers") view=DriversPage/>
                    <Route path=StaticSegment("teams") view=TeamsPage/>
                    <Route path=StaticSegment("races") view=RacesPage/>
                    <Route path=StaticSegment("admin") view=AdminPage/>
                </Routes>
            </main>
        </Router>
    }
}
