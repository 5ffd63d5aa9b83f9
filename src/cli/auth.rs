use std::time::Duration;

use crate::error::SpotgateError;
use crate::oauth::run_login_flow;

use super::output::status_label;
use super::CommandContext;

/// Default time to wait for the browser redirect.
pub const DEFAULT_LOGIN_TIMEOUT_MS: u64 = 120_000;

pub async fn run_login(ctx: &CommandContext, timeout: Duration) -> Result<(), SpotgateError> {
    eprintln!(
        "Waiting for Spotify login on {} ...",
        ctx.client.config().redirect_uri
    );
    let return_to = run_login_flow(&ctx.client, &ctx.session, timeout).await?;
    println!("Logged in to Spotify.");
    if let Some(path) = return_to {
        println!("You can now retry '{path}'.");
    }
    Ok(())
}

pub async fn run_logout(ctx: &CommandContext) -> Result<(), SpotgateError> {
    ctx.client.logout(&ctx.session).await?;
    println!("Logged out.");
    Ok(())
}

pub async fn run_status(ctx: &CommandContext) -> Result<(), SpotgateError> {
    let status = ctx.client.status(&ctx.session).await?;
    println!("Status: {}", status_label(status));
    if let Some(expires) = ctx.session.tokens().await?.expires_at {
        println!("Access token expires: {}", expires.to_rfc3339());
    }
    Ok(())
}
