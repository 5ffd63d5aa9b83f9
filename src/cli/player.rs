use std::io::IsTerminal;

use crate::api::TimeRange;
use crate::error::SpotgateError;

use super::output::{
    print_artists, print_overview, print_playback, print_tracks, OutputMode,
};
use super::CommandContext;

fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

pub async fn run_now_playing(ctx: &CommandContext, json: bool) -> Result<(), SpotgateError> {
    ctx.require_auth("/now-playing").await?;
    let state = ctx.client.currently_playing(&ctx.session).await?;
    print_playback(state.as_ref(), OutputMode::from_flag(json), is_tty());
    Ok(())
}

pub async fn run_pause(ctx: &CommandContext) -> Result<(), SpotgateError> {
    ctx.require_auth("/pause").await?;
    ctx.client.pause(&ctx.session).await?;
    println!("Playback paused");
    Ok(())
}

pub async fn run_play(ctx: &CommandContext, track: Option<&str>) -> Result<(), SpotgateError> {
    let path = match track {
        Some(t) => format!("/play/{t}"),
        None => "/play".to_string(),
    };
    ctx.require_auth(&path).await?;
    ctx.client.start_playback(&ctx.session, track).await?;
    if track.is_some() {
        println!("Track playback started");
    } else {
        println!("Playback resumed");
    }
    Ok(())
}

pub async fn run_top(
    ctx: &CommandContext,
    limit: u32,
    time_range: TimeRange,
    json: bool,
) -> Result<(), SpotgateError> {
    ctx.require_auth("/top").await?;
    let tracks = ctx
        .client
        .top_tracks(&ctx.session, limit, time_range)
        .await?;
    print_tracks(&tracks, OutputMode::from_flag(json), is_tty());
    Ok(())
}

pub async fn run_following(
    ctx: &CommandContext,
    limit: u32,
    json: bool,
) -> Result<(), SpotgateError> {
    ctx.require_auth("/following").await?;
    let artists = ctx.client.followed_artists(&ctx.session, limit).await?;
    print_artists(&artists, OutputMode::from_flag(json));
    Ok(())
}

pub async fn run_overview(ctx: &CommandContext, limit: u32, json: bool) -> Result<(), SpotgateError> {
    ctx.require_auth("/").await?;
    let overview = ctx.client.overview(&ctx.session, limit).await?;
    print_overview(&overview, OutputMode::from_flag(json), is_tty());
    Ok(())
}
