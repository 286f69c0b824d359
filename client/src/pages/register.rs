//! Account registration page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
#[cfg(feature = "csr")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::state::auth::AuthState;
use crate::util::auth::{RouteAccess, install_route_guard};

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Validated registration form values.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Registration {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

/// Client-side checks before the backend sees the form.
pub(crate) fn validate_register_input(
    username: &str,
    password: &str,
    password_confirm: &str,
) -> Result<Registration, &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Enter a username.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    if password != password_confirm {
        return Err("Passwords do not match.");
    }
    Ok(Registration {
        username: username.to_owned(),
        password: password.to_owned(),
        password_confirm: password_confirm.to_owned(),
    })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    install_route_guard(RouteAccess::Guest, auth, navigate.clone());
    let query = use_query_map();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let password_confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match validate_register_input(&username.get(), &password.get(), &password_confirm.get()) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let target = session::guard::post_login_target(
            query.with_untracked(|q| q.get("next").map(|v| v.to_string())).as_deref(),
        );
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "csr")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let session = crate::state::session::client_session();
                match session.register(&form.username, &form.password, &form.password_confirm).await {
                    Ok(_) => {
                        auth.set(AuthState::snapshot(&session));
                        info.set(String::new());
                        busy.set(false);
                        navigate(&target, NavigateOptions::default());
                    }
                    Err(err) => {
                        info.set(err.user_message());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let Registration { username, password, password_confirm } = form;
            let _ = (username, password, password_confirm, target, &navigate);
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Pitwall"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm password"
                        prop:value=move || password_confirm.get()
                        on:input=move |ev| password_confirm.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
