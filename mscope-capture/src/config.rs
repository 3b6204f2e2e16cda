//! Capture client configuration
//!
//! The server URL resolves CLI → ENV (both via clap) → TOML → default.

use mscope_common::config::TomlConfig;

use crate::client::DEFAULT_SERVER_URL;

pub fn resolve_server_url(cli: Option<&str>, toml: &TomlConfig) -> String {
    cli.map(|s| s.to_string())
        .or_else(|| toml.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}
