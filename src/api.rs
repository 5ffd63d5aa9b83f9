//! Player and library calls. Every call goes through [`SpotifyClient::send`].

use serde::{Deserialize, Serialize};

use crate::client::SpotifyClient;
use crate::dispatch::ApiRequest;
use crate::error::SpotgateError;
use crate::session::Session;

pub const DEFAULT_TOP_TRACKS_LIMIT: u32 = 10;
pub const DEFAULT_FOLLOWED_ARTISTS_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeRange {
    /// Roughly the last four weeks
    #[default]
    ShortTerm,
    /// Roughly the last six months
    MediumTerm,
    /// Several years of data
    LongTerm,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    /// `None` for ads, podcasts without metadata, or private sessions.
    #[serde(default)]
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct FollowedArtistsResponse {
    artists: Paging<Artist>,
}

/// Condensed view of the listener's current state.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub now_playing: Option<Track>,
    pub is_playing: bool,
    pub top_tracks: Vec<Track>,
    pub followed_artists: Vec<Artist>,
}

/// Accept a bare track id or a full `spotify:track:` URI.
pub fn track_uri(track: &str) -> String {
    if track.starts_with("spotify:") {
        track.to_string()
    } else {
        format!("spotify:track:{track}")
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    what: &str,
    value: Option<serde_json::Value>,
) -> Result<T, SpotgateError> {
    let value = value.ok_or_else(|| {
        SpotgateError::InvalidResponse(format!("{what}: expected a JSON body"))
    })?;
    serde_json::from_value(value)
        .map_err(|e| SpotgateError::InvalidResponse(format!("{what}: {e}")))
}

impl SpotifyClient {
    /// Current playback, or `None` when nothing is playing (204).
    pub async fn currently_playing(
        &self,
        session: &Session,
    ) -> Result<Option<PlaybackState>, SpotgateError> {
        let body = self
            .send(session, ApiRequest::get("/me/player/currently-playing"))
            .await?;
        match body {
            None => Ok(None),
            Some(value) => decode("currently-playing", Some(value)).map(Some),
        }
    }

    pub async fn pause(&self, session: &Session) -> Result<(), SpotgateError> {
        self.send(session, ApiRequest::put("/me/player/pause", None))
            .await?;
        Ok(())
    }

    /// Play `track` (id or URI), or resume the current context when `None`.
    pub async fn start_playback(
        &self,
        session: &Session,
        track: Option<&str>,
    ) -> Result<(), SpotgateError> {
        let body = track.map(|t| serde_json::json!({ "uris": [track_uri(t)] }));
        self.send(session, ApiRequest::put("/me/player/play", body))
            .await?;
        Ok(())
    }

    pub async fn top_tracks(
        &self,
        session: &Session,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Track>, SpotgateError> {
        let path = format!(
            "/me/top/tracks?limit={limit}&time_range={}",
            time_range.as_str()
        );
        let page: Paging<Track> = decode("top tracks", self.send(session, ApiRequest::get(path)).await?)?;
        Ok(page.items)
    }

    pub async fn followed_artists(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<Artist>, SpotgateError> {
        let path = format!("/me/following?type=artist&limit={limit}");
        let resp: FollowedArtistsResponse =
            decode("followed artists", self.send(session, ApiRequest::get(path)).await?)?;
        Ok(resp.artists.items)
    }

    /// Now playing, top tracks and followed artists, fetched concurrently.
    pub async fn overview(&self, session: &Session, limit: u32) -> Result<Overview, SpotgateError> {
        let (playing, top_tracks, followed_artists) = tokio::try_join!(
            self.currently_playing(session),
            self.top_tracks(session, limit, TimeRange::ShortTerm),
            self.followed_artists(session, limit),
        )?;
        let (now_playing, is_playing) = match playing {
            Some(state) => (state.item, state.is_playing),
            None => (None, false),
        };
        Ok(Overview {
            now_playing,
            is_playing,
            top_tracks,
            followed_artists,
        })
    }
}
