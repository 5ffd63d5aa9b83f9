use crate::error::SpotgateError;

use super::types::SpotgateConfig;

/// Expand environment variable references in a string.
///
/// Supported syntaxes:
/// - `${VAR}` - replaced with env var value; error if unset
/// - `${VAR:-fallback}` - replaced with env var value, or fallback if unset or empty
///
/// A `$` not followed by `{` is kept literally.
pub fn expand_env_vars(input: &str) -> Result<String, SpotgateError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            env_error(format!("Unclosed variable reference: ${{{after}"))
        })?;
        let expr = &after[..end];

        match expr.split_once(":-") {
            Some((name, fallback)) => match std::env::var(name) {
                Ok(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            },
            None => {
                let val = std::env::var(expr).map_err(|_| {
                    env_error(format!("Environment variable '{expr}' is not set"))
                })?;
                result.push_str(&val);
            }
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

/// Expand environment variables in every string field of a config.
pub fn expand_config(config: &mut SpotgateConfig) -> Result<(), SpotgateError> {
    for field in [
        &mut config.client_id,
        &mut config.client_secret,
        &mut config.redirect_uri,
        &mut config.auth_url,
        &mut config.token_url,
        &mut config.api_base_url,
    ] {
        *field = expand_env_vars(field)?;
    }
    for scope in &mut config.scopes {
        *scope = expand_env_vars(scope)?;
    }
    Ok(())
}

/// Apply the `SPOTIFY_*` environment overrides on top of file values.
pub fn apply_env_overrides(config: &mut SpotgateConfig) {
    apply_override(&mut config.client_id, std::env::var("SPOTIFY_CLIENT_ID").ok());
    apply_override(
        &mut config.client_secret,
        std::env::var("SPOTIFY_CLIENT_SECRET").ok(),
    );
    apply_override(
        &mut config.redirect_uri,
        std::env::var("SPOTIFY_REDIRECT_URI").ok(),
    );
}

fn apply_override(field: &mut String, value: Option<String>) {
    if let Some(val) = value.filter(|v| !v.is_empty()) {
        *field = val;
    }
}

fn env_error(detail: String) -> SpotgateError {
    SpotgateError::Config {
        path: std::path::PathBuf::from("<env>"),
        detail,
    }
}
