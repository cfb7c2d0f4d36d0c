//! API token resolution: environment first, then the user's netrc file

use crate::config::HealthConfig;
use crate::error::{HealthError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::debug;

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "READTHEDOCS_TOKEN";

/// Credential attached to every outbound request
pub struct Authenticator {
    token: SecretString,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").field("token", &"[REDACTED]").finish()
    }
}

impl Authenticator {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }

    /// Resolve the token from `READTHEDOCS_TOKEN`, falling back to the netrc
    /// entry for the configured API host.
    pub fn from_env(config: &HealthConfig) -> Result<Self> {
        let host = config.api_host()?;
        let netrc = config.netrc_location();
        Self::resolve(std::env::var(TOKEN_ENV_VAR).ok(), netrc.as_deref(), &host)
    }

    pub fn resolve(env_token: Option<String>, netrc: Option<&Path>, host: &str) -> Result<Self> {
        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            debug!("Using API token from {}", TOKEN_ENV_VAR);
            return Ok(Self::from_token(token.trim()));
        }

        if let Some(path) = netrc {
            if let Some(token) = netrc_password(path, host)? {
                debug!("Using API token from {} for {}", path.display(), host);
                return Ok(Self::from_token(token));
            }
        }

        Err(HealthError::MissingToken {
            host: host.to_string(),
            netrc: netrc
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.netrc".to_string()),
        })
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("token {}", self.token.expose_secret())
    }
}

/// Look up the password for `host` in a netrc file. A missing file is not an error.
fn netrc_password(path: &Path, host: &str) -> Result<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let entries = parse_netrc(&content)
        .map_err(|msg| HealthError::config(format!("malformed netrc file {}: {}", path.display(), msg)))?;

    let machine = entries
        .iter()
        .find(|e| e.machine.as_deref() == Some(host))
        .or_else(|| entries.iter().find(|e| e.machine.is_none()));

    Ok(machine
        .and_then(|e| e.password.clone())
        .filter(|p| !p.is_empty()))
}

#[derive(Debug, Default, PartialEq)]
struct NetrcEntry {
    /// `None` for the `default` entry
    machine: Option<String>,
    password: Option<String>,
}

/// Parse netrc text. Words are split the way a shell would, so quoted values
/// lose their quotes and an unquoted `#` starts a comment.
fn parse_netrc(content: &str) -> std::result::Result<Vec<NetrcEntry>, String> {
    let mut tokens = Vec::new();
    let mut in_macdef = false;

    for (lineno, line) in content.lines().enumerate() {
        if in_macdef {
            // macro bodies run until the next blank line
            if line.trim().is_empty() {
                in_macdef = false;
            }
            continue;
        }

        let words = shlex::split(line)
            .ok_or_else(|| format!("unbalanced quotes on line {}", lineno + 1))?;
        let mut words = words.into_iter();
        while let Some(word) = words.next() {
            if word == "macdef" {
                words.next();
                in_macdef = true;
                break;
            }
            tokens.push(word);
        }
    }

    let mut entries = Vec::new();
    let mut current: Option<NetrcEntry> = None;
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match token.as_str() {
            "machine" => {
                let name = tokens.next().ok_or("`machine` without a host name")?;
                entries.extend(current.take());
                current = Some(NetrcEntry {
                    machine: Some(name),
                    ..Default::default()
                });
            }
            "default" => {
                entries.extend(current.take());
                current = Some(NetrcEntry::default());
            }
            "login" | "password" | "account" => {
                let value = tokens.next().ok_or_else(|| format!("`{}` without a value", token))?;
                let entry = current
                    .as_mut()
                    .ok_or_else(|| format!("`{}` outside of a machine entry", token))?;
                if token == "password" {
                    entry.password = Some(value);
                }
            }
            other => return Err(format!("unexpected token `{}`", other)),
        }
    }
    entries.extend(current);

    Ok(entries)
}
