//! Account commands: login, logout, whoami, signup and password reset.

use crate::session::Context;
use chrono::Utc;
use log::info;
use mpfm_model::auth::{LoginRequest, ResetPasswordRequest, SignupRequest};
use mpfm_utils::dates::format_timestamp;

pub async fn run_login(
    ctx: &mut Context,
    email: String,
    password: String,
    remember: bool,
) -> anyhow::Result<()> {
    let client = ctx.anonymous()?;
    let request = LoginRequest {
        email,
        password,
        remember_me: remember,
    };
    let payload = ctx.check(client.login(&request).await)?;
    let session = ctx.store().save_login(&payload, remember, Utc::now())?;

    let who = session
        .user
        .as_ref()
        .map(|user| user.email.as_str())
        .unwrap_or(request.email.as_str());
    println!(
        "Signed in as {} until {}",
        who,
        format_timestamp(&session.expires_at)
    );
    if remember {
        info!("Session saved to {}", ctx.store().storage().path().display());
    } else {
        println!("Session not saved; pass --remember to stay signed in.");
    }
    Ok(())
}

pub fn run_logout(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.store().clear()?;
    println!("Signed out.");
    Ok(())
}

pub async fn run_whoami(ctx: &mut Context) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let user = ctx.check(client.current_user().await)?;
    println!("{} <{}>", user.name, user.email);
    if let Some(company) = &user.company {
        println!("Company: {}", company);
    }
    if let Some(role) = &user.role {
        println!("Role: {}", role);
    }
    if let Some(session) = ctx.store().session() {
        println!("Session expires {}", format_timestamp(&session.expires_at));
    }
    Ok(())
}

pub async fn run_signup(
    ctx: &mut Context,
    name: String,
    email: String,
    password: String,
    company: Option<String>,
) -> anyhow::Result<()> {
    let client = ctx.anonymous()?;
    let request = SignupRequest {
        name,
        email,
        password,
        company,
    };
    let message = ctx.check(client.signup(&request).await)?;
    println!("{}", non_empty(message, "Account created. Check your inbox to verify it."));
    Ok(())
}

pub async fn run_forgot_password(ctx: &mut Context, email: String) -> anyhow::Result<()> {
    let client = ctx.anonymous()?;
    let message = ctx.check(client.forgot_password(&email).await)?;
    println!("{}", non_empty(message, "If the account exists, a reset link was sent."));
    Ok(())
}

pub async fn run_reset_password(
    ctx: &mut Context,
    token: String,
    password: String,
) -> anyhow::Result<()> {
    let client = ctx.anonymous()?;
    let request = ResetPasswordRequest { token, password };
    let message = ctx.check(client.reset_password(&request).await)?;
    println!("{}", non_empty(message, "Password updated. You can sign in now."));
    Ok(())
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
