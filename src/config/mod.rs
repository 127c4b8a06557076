// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Configuration loading.
//
// YAML config with a version marker and environment interpolation in the
// backend URL. A missing file is not an error at the call site; callers
// fall back to `Config::default()`.

mod error;
mod source;

pub use error::ConfigError;
pub use source::{ConfigSource, FileSource, StringSource};

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Raw YAML shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Version marker; the top-level key doubles as a file signature.
    mockingbird: String,
    #[serde(default)]
    backend: RawBackend,
}

#[derive(Debug, Default, Deserialize)]
struct RawBackend {
    base_url: Option<String>,
    connect_timeout_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Validated config
// ---------------------------------------------------------------------------

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the analysis/generation backend.
    pub base_url: String,
    /// Connect timeout for backend requests. Streaming reads carry no
    /// overall timeout; the transport's own timeout governs.
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate config from a source.
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let content = source.load()?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;

    if raw.mockingbird != "v1" {
        return Err(ConfigError::UnsupportedVersion(raw.mockingbird));
    }

    let base_url = match raw.backend.base_url {
        Some(url) => resolve_variables(&url)?,
        None => DEFAULT_BASE_URL.to_string(),
    };

    Ok(Config {
        backend: BackendConfig {
            base_url,
            connect_timeout_ms: raw
                .backend
                .connect_timeout_ms
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        },
    })
}

/// Resolves `${VAR_NAME}` references in a string from environment
/// variables. Returns `ConfigError::UndefinedVariable` if a referenced
/// variable is not set.
fn resolve_variables(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                let value = std::env::var(name).map_err(|_| ConfigError::UndefinedVariable {
                    name: name.to_string(),
                })?;
                result.push_str(&value);
                rest = &after[end + 1..];
            }
            // No closing brace, or an empty name: keep the text as-is.
            _ => {
                result.push_str("${");
                rest = after;
            }
        }
    }

    result.push_str(rest);
    Ok(result)
}
