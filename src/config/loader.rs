use std::path::{Path, PathBuf};

use crate::error::SpotgateError;

use super::env::{apply_env_overrides, expand_config};
use super::types::SpotgateConfig;

/// Discover config files in precedence order (highest first).
///
/// Precedence:
/// 1. `--config` CLI flag
/// 2. `SPOTGATE_CONFIG` env var
/// 3. `./config/spotgate.json` (project-level)
/// 4. `~/.spotgate/spotgate.json` (home-level)
pub fn discover_config_files(cli_config: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = cli_config {
        candidates.push(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var("SPOTGATE_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.push(PathBuf::from("./config/spotgate.json"));
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".spotgate").join("spotgate.json"));
    }

    let mut files = Vec::new();
    for path in candidates {
        if path.exists() && !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

/// Parse a single config file, expanding `${VAR}` references.
pub fn load_config_file(path: &Path) -> Result<SpotgateConfig, SpotgateError> {
    let content = std::fs::read_to_string(path).map_err(|e| SpotgateError::Config {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;
    let mut config: SpotgateConfig =
        serde_json::from_str(&content).map_err(|e| SpotgateError::Config {
            path: path.to_path_buf(),
            detail: format!("Invalid JSON: {e}"),
        })?;
    expand_config(&mut config)?;
    Ok(config)
}

/// Load the effective configuration.
///
/// The first discovered file wins; with no file the defaults are used.
/// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REDIRECT_URI`
/// override whatever the file says.
pub fn load_config(cli_config: Option<&str>) -> Result<SpotgateConfig, SpotgateError> {
    if let Some(path) = cli_config {
        if !Path::new(path).exists() {
            return Err(SpotgateError::Config {
                path: PathBuf::from(path),
                detail: "File not found".into(),
            });
        }
    }

    let files = discover_config_files(cli_config);
    let (mut config, source) = match files.first() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            (load_config_file(path)?, path.clone())
        }
        None => (SpotgateConfig::default(), PathBuf::from("<defaults>")),
    };

    apply_env_overrides(&mut config);
    validate_config(&config, &source)?;
    Ok(config)
}

/// Check that credentials are present and every endpoint is a valid URL.
pub fn validate_config(config: &SpotgateConfig, source: &Path) -> Result<(), SpotgateError> {
    let fail = |detail: String| SpotgateError::Config {
        path: source.to_path_buf(),
        detail,
    };

    if config.client_id.trim().is_empty() {
        return Err(fail(
            "clientId is required (set it in the config file or SPOTIFY_CLIENT_ID)".into(),
        ));
    }
    if config.client_secret.trim().is_empty() {
        return Err(fail(
            "clientSecret is required (set it in the config file or SPOTIFY_CLIENT_SECRET)"
                .into(),
        ));
    }
    for (name, value) in [
        ("redirectUri", &config.redirect_uri),
        ("authUrl", &config.auth_url),
        ("tokenUrl", &config.token_url),
        ("apiBaseUrl", &config.api_base_url),
    ] {
        reqwest::Url::parse(value).map_err(|e| fail(format!("{name} '{value}' is invalid: {e}")))?;
    }
    if config.request_timeout_secs == 0 {
        return Err(fail("requestTimeoutSecs must be greater than zero".into()));
    }
    Ok(())
}
