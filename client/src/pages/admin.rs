//! Staff-only page linking into the backend's model admin.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::auth::{RouteAccess, install_route_guard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AdminLink {
    pub label: &'static str,
    pub href: &'static str,
    pub description: &'static str,
}

/// Served by the backend admin site, not by this app's router.
pub(crate) const ADMIN_LINKS: [AdminLink; 6] = [
    AdminLink { label: "Users", href: "/admin/auth/user/", description: "Manage user accounts and permissions." },
    AdminLink { label: "Teams", href: "/admin/racing/team/", description: "Create, edit, and remove teams." },
    AdminLink { label: "Drivers", href: "/admin/racing/driver/", description: "Manage drivers and team assignments." },
    AdminLink { label: "Seasons", href: "/admin/racing/season/", description: "Manage seasons used by races." },
    AdminLink { label: "Races", href: "/admin/racing/race/", description: "Create and edit race calendar entries." },
    AdminLink {
        label: "Race Results",
        href: "/admin/racing/raceresult/",
        description: "Record finishing positions and points.",
    },
];

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_route_guard(RouteAccess::Admin, auth, use_navigate());

    view! {
        <section class="admin-page">
            <h1>"Admin"</h1>
            <Show
                when=move || auth.with(|state| state.is_admin() && !state.loading)
                fallback=|| view! { <p class="admin-page__status">"Checking permissions..."</p> }
            >
                <ul class="admin-page__links">
                    {ADMIN_LINKS
                        .into_iter()
                        .map(|link| view! {
                            <li>
                                <a href=link.href>{link.label}</a>
                                <span class="admin-page__hint">{link.description}</span>
                            </li>
                        })
                        .collect_view()}
                </ul>
            </Show>
        </section>
    }
}
