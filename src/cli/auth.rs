//! Auth and profile commands: login, register, logout, whoami, location.

use serde::Serialize;

use crate::error::Result;
use crate::model::User;
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(Serialize)]
struct SessionOutput<'a> {
    user: &'a User,
}

pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let client = ctx.anonymous_client()?;
    let response = client.login(email, password).await?;
    ctx.session.store(&response.token)?;

    let mut human = HumanOutput::new(format!("Logged in as {}", response.user.username));
    human.push_summary("email", &response.user.email);
    if let Some(location) = &response.user.location {
        human.push_summary("location", location);
    }
    human.push_next_step("daisy planner ls");

    emit_success(
        ctx.options,
        "login",
        &SessionOutput {
            user: &response.user,
        },
        Some(&human),
    )
}

pub async fn register(ctx: &Context, username: &str, email: &str, password: &str) -> Result<()> {
    let client = ctx.anonymous_client()?;
    client.register(username, email, password).await?;

    let mut human = HumanOutput::new(format!("Registered {username}"));
    human.push_next_step(format!("daisy login {email}"));

    emit_success(
        ctx.options,
        "register",
        &serde_json::json!({ "username": username, "email": email }),
        Some(&human),
    )
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.session.clear()?;

    let human = HumanOutput::new("Logged out");
    emit_success(
        ctx.options,
        "logout",
        &serde_json::json!({ "logged_out": true }),
        Some(&human),
    )
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let user = client.profile().await?;

    let mut human = HumanOutput::new(format!("Logged in as {}", user.username));
    human.push_summary("email", &user.email);
    if let Some(location) = &user.location {
        human.push_summary("location", location);
    }

    emit_success(
        ctx.options,
        "whoami",
        &SessionOutput { user: &user },
        Some(&human),
    )
}

pub async fn set_location(ctx: &Context, location: &str) -> Result<()> {
    let client = ctx.client()?;
    let user = client.update_location(location).await?;

    let mut human = HumanOutput::new("Profile updated");
    human.push_summary(
        "location",
        user.location.as_deref().unwrap_or("(unset)"),
    );
    human.push_next_step("daisy weather");

    emit_success(
        ctx.options,
        "profile set-location",
        &SessionOutput { user: &user },
        Some(&human),
    )
}
