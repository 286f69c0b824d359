//! Top navigation with auth-aware links and a logout action.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let busy = RwSignal::new(false);

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let session = crate::state::session::client_session();
            session.logout().await;
            auth.set(AuthState::snapshot(&session));
            busy.set(false);
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        });
        #[cfg(not(feature = "csr"))]
        busy.set(false);
    };

    view! {
        <nav class="nav-bar">
            <a href="/" class="nav-bar__brand">"Pitwall"</a>
            <Show
                when=move || auth.get().authenticated
                fallback=|| view! {
                    <div class="nav-bar__links">
                        <a href="/login">"Sign in"</a>
                        <a href="/register">"Register"</a>
                    </div>
                }
            >
                <div class="nav-bar__links">
                    <a href="/drivers">"Drivers"</a>
                    <a href="/teams">"Teams"</a>
                    <a href="/races">"Races"</a>
                    <Show when=move || auth.get().is_admin()>
                        <a href="/admin">"Admin"</a>
                    </Show>
                </div>
                <div class="nav-bar__user">
                    <span>{move || auth.get().username().unwrap_or_default().to_owned()}</span>
                    <button class="btn" on:click=on_logout disabled=move || busy.get()>
                        "Sign out"
                    </button>
                </div>
            </Show>
        </nav>
    }
}
