pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod oauth;
pub mod refresh;
pub mod session;

pub use api::{Artist, Overview, PlaybackState, TimeRange, Track};
pub use client::SpotifyClient;
pub use config::{load_config, SpotgateConfig};
pub use dispatch::{ApiRequest, Dispatcher};
pub use error::SpotgateError;
pub use gate::GateDecision;
pub use oauth::{AuthorizationRequest, CallbackParams, TokenClient};
pub use session::{
    AuthStatus, FileSessionStore, MemorySessionStore, Session, SessionData, SessionStore,
    TokenGrant, TokenRecord,
};
