//! Sign-in, sign-up and password reset request forms.

use crate::state::AppState;
use crate::storage::BrowserStorage;
use mpfm_api::TokenStore;
use mpfm_model::auth::{LoginRequest, SignupRequest};
use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
    Forgot,
}

impl Mode {
    fn title(self) -> &'static str {
        match self {
            Mode::SignIn => "Sign in",
            Mode::SignUp => "Create account",
            Mode::Forgot => "Reset password",
        }
    }
}

const INPUT_STYLE: &str = "width: 100%; padding: 6px 8px; margin: 4px 0 10px 0; box-sizing: border-box;";

#[component]
pub fn LoginForm() -> Element {
    let mut state = use_context::<AppState>();
    let mut mode = use_signal(|| Mode::SignIn);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let client = match state.anonymous_client() {
            Ok(client) => client,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let current = mode();
        spawn(async move {
            match current {
                Mode::SignIn => {
                    let request = LoginRequest {
                        email: email().trim().to_string(),
                        password: password(),
                        remember_me: remember(),
                    };
                    match client.login(&request).await {
                        Ok(payload) => {
                            let mut store = TokenStore::new(BrowserStorage);
                            match store.save_login(&payload, request.remember_me, chrono::Utc::now()) {
                                Ok(session) => {
                                    password.set(String::new());
                                    state.session.set(Some(session));
                                }
                                Err(e) => error.set(Some(e.to_string())),
                            }
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
                Mode::SignUp => {
                    let request = SignupRequest {
                        name: name().trim().to_string(),
                        email: email().trim().to_string(),
                        password: password(),
                        company: None,
                    };
                    match client.signup(&request).await {
                        Ok(message) => {
                            state.notice.set(Some(message));
                            mode.set(Mode::SignIn);
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
                Mode::Forgot => match client.forgot_password(email().trim()).await {
                    Ok(message) => {
                        state.notice.set(Some(message));
                        mode.set(Mode::SignIn);
                    }
                    Err(e) => error.set(Some(e.to_string())),
                },
            }
            busy.set(false);
        });
    };

    let current = mode();

    rsx! {
        div {
            style: "max-width: 360px; margin: 80px auto; padding: 24px; border: 1px solid #e0e0e0; border-radius: 6px; background: #fff;",
            h2 { style: "margin-top: 0;", {current.title()} }
            if let Some(message) = error() {
                crate::components::ErrorDisplay { message }
            }
            form {
                onsubmit: on_submit,
                if current == Mode::SignUp {
                    label { "Name" }
                    input {
                        style: INPUT_STYLE,
                        value: "{name}",
                        oninput: move |evt: Event<FormData>| name.set(evt.value()),
                    }
                }
                label { "Email" }
                input {
                    r#type: "email",
                    style: INPUT_STYLE,
                    value: "{email}",
                    oninput: move |evt: Event<FormData>| email.set(evt.value()),
                }
                if current != Mode::Forgot {
                    label { "Password" }
                    input {
                        r#type: "password",
                        style: INPUT_STYLE,
                        value: "{password}",
                        oninput: move |evt: Event<FormData>| password.set(evt.value()),
                    }
                }
                if current == Mode::SignIn {
                    label {
                        style: "display: block; margin-bottom: 10px;",
                        input {
                            r#type: "checkbox",
                            checked: remember(),
                            onchange: move |evt: Event<FormData>| remember.set(evt.checked()),
                        }
                        " Remember me"
                    }
                }
                button {
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Please wait..." } else { {current.title()} }
                }
            }
            div {
                style: "margin-top: 12px; font-size: 12px; display: flex; gap: 12px;",
                for other in [Mode::SignIn, Mode::SignUp, Mode::Forgot] {
                    if other != current {
                        a {
                            href: "#",
                            onclick: move |evt: Event<MouseData>| {
                                evt.prevent_default();
                                error.set(None);
                                mode.set(other);
                            },
                            {other.title()}
                        }
                    }
                }
            }
        }
    }
}
