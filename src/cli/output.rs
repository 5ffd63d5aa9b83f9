use colored::Colorize;

use crate::api::{Artist, Overview, PlaybackState, Track};
use crate::error::SpotgateError;
use crate::session::AuthStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn format_track(track: &Track, is_tty: bool) -> String {
    let artists = track.artist_names();
    let name = if is_tty {
        track.name.bold().to_string()
    } else {
        track.name.clone()
    };
    if artists.is_empty() {
        name
    } else {
        format!("{name} - {artists}")
    }
}

pub fn print_playback(state: Option<&PlaybackState>, mode: OutputMode, is_tty: bool) {
    if mode == OutputMode::Json {
        print_json(&state);
        return;
    }
    match state.and_then(|s| s.item.as_ref().map(|item| (s.is_playing, item))) {
        Some((true, item)) => println!("Now playing: {}", format_track(item, is_tty)),
        Some((false, item)) => println!("Paused: {}", format_track(item, is_tty)),
        None => println!("Not playing"),
    }
}

pub fn print_tracks(tracks: &[Track], mode: OutputMode, is_tty: bool) {
    if mode == OutputMode::Json {
        print_json(tracks);
        return;
    }
    if tracks.is_empty() {
        println!("No tracks");
    }
    for (i, track) in tracks.iter().enumerate() {
        let id = track.id.as_deref().unwrap_or("-");
        let id = if is_tty {
            id.dimmed().to_string()
        } else {
            id.to_string()
        };
        println!("{:>2}. {}  {}", i + 1, format_track(track, is_tty), id);
    }
}

pub fn print_artists(artists: &[Artist], mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(artists);
        return;
    }
    if artists.is_empty() {
        println!("No followed artists");
    }
    for artist in artists {
        println!("{}", artist.name);
    }
}

pub fn print_overview(overview: &Overview, mode: OutputMode, is_tty: bool) {
    if mode == OutputMode::Json {
        print_json(overview);
        return;
    }
    match &overview.now_playing {
        Some(track) => println!("Now playing: {}", format_track(track, is_tty)),
        None => println!("Now playing: not playing"),
    }
    println!();
    println!("Top tracks:");
    print_tracks(&overview.top_tracks, mode, is_tty);
    println!();
    println!("Followed artists:");
    print_artists(&overview.followed_artists, mode);
}

pub fn status_label(status: AuthStatus) -> &'static str {
    match status {
        AuthStatus::Authenticated => "logged in",
        AuthStatus::Expired => "logged in (access token expired, will refresh on next call)",
        AuthStatus::Unauthenticated => "not logged in",
    }
}

pub fn print_error(err: &SpotgateError, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ArtistRef;

    fn track() -> Track {
        Track {
            id: Some("t1".into()),
            name: "Song".into(),
            uri: None,
            artists: vec![ArtistRef { name: "Band".into() }],
        }
    }

    #[test]
    fn output_mode_from_flag() {
        assert_eq!(OutputMode::from_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_flag(false), OutputMode::Pretty);
    }

    #[test]
    fn format_track_plain() {
        assert_eq!(format_track(&track(), false), "Song - Band");
        let mut t = track();
        t.artists.clear();
        assert_eq!(format_track(&t, false), "Song");
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(AuthStatus::Unauthenticated), "not logged in");
        assert_eq!(status_label(AuthStatus::Authenticated), "logged in");
    }

    #[test]
    fn printing_does_not_panic() {
        let state = PlaybackState {
            is_playing: true,
            progress_ms: Some(1000),
            item: Some(track()),
        };
        print_playback(Some(&state), OutputMode::Pretty, true);
        print_playback(None, OutputMode::Json, false);
        print_tracks(&[track()], OutputMode::Pretty, false);
        print_error(&SpotgateError::NotAuthenticated, true);
    }
}
