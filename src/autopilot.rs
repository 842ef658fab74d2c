//! Replaying a command string
//!
//! A script is split shell-style into tokens. Each token is either one key
//! press (a single character or a reserved key name such as `Enter`) or a
//! call:
//!
//! - `geoText(format,content)` imports inline geodata into the active layer
//! - `geoUrl(format,url)` downloads geodata and imports it
//! - `styleImage(url)` sets the point image of the active layer
//!
//! Arguments are split at the first comma only, so `content` may contain
//! commas. Tokens are processed in order; a token that fails is logged and
//! skipped.

use crate::config::ReservedKeys;
use crate::host::{GeoFormat, Host, HostError};
use crate::menu::{KeyPress, KeyboardMenu};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use ureq::Agent;

/// One parsed autopilot token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Key press, by name
    Key(String),
    /// Inline geodata
    GeoText {
        /// Format of `content`
        format: GeoFormat,
        /// Geodata
        content: String,
    },
    /// Geodata to download
    GeoUrl {
        /// Format of the downloaded document
        format: GeoFormat,
        /// Where to download it from
        url: String,
    },
    /// Point image URL for the active layer
    StyleImage(String),
}

/// Errors from parsing or running autopilot tokens
#[derive(Debug, Error)]
pub enum AutopilotError {
    /// The script is not valid shell-style text
    #[error("Cannot split command string: {0}")]
    Tokenize(#[from] shell_words::ParseError),

    /// The token is neither a key nor a known call
    #[error("Unknown token '{0}'")]
    UnknownToken(String),

    /// A call with wrong arguments
    #[error("Malformed call '{token}': {reason}")]
    MalformedCall {
        /// The offending token
        token: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Format name not understood
    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    /// Download failed
    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Failure description
        reason: String,
    },

    /// The host refused the request
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Downloads text documents
pub trait Fetch {
    /// Fetch `url` as text
    ///
    /// # Errors
    ///
    /// Returns [`AutopilotError::Fetch`] if the request fails
    fn fetch(&self, url: &str) -> Result<String, AutopilotError>;
}

/// [`Fetch`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    /// Fetcher with a global request timeout
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, AutopilotError> {
        let fetch_error = |reason: String| AutopilotError::Fetch {
            url: url.to_string(),
            reason,
        };
        let user_agent = format!("karte/{}", env!("CARGO_PKG_VERSION"));
        let response = match self.agent.get(url).header("User-Agent", user_agent).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(fetch_error(format!("status {status}")));
            }
            Err(err) => return Err(fetch_error(err.to_string())),
        };
        response
            .into_body()
            .read_to_string()
            .map_err(|err| fetch_error(err.to_string()))
    }
}

/// What a run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Tokens carried out
    pub executed: usize,
    /// Tokens that failed and were skipped
    pub skipped: usize,
}

/// A tokenised command string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autopilot {
    tokens: Vec<String>,
    keys: ReservedKeys,
}

impl Autopilot {
    /// Split `script` into tokens
    ///
    /// # Errors
    ///
    /// Returns an error if the quoting in `script` is unbalanced
    pub fn parse(script: &str, keys: &ReservedKeys) -> Result<Self, AutopilotError> {
        Ok(Self::from_tokens(shell_words::split(script)?, keys))
    }

    /// Use already separated tokens
    #[must_use]
    pub fn from_tokens(tokens: Vec<String>, keys: &ReservedKeys) -> Self {
        Self {
            tokens,
            keys: keys.clone(),
        }
    }

    /// The tokens, in replay order
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Replay every token against `menu` and `host`
    pub fn run(&self, menu: &mut KeyboardMenu, host: &mut dyn Host, fetcher: &dyn Fetch) -> Report {
        let mut report = Report::default();
        for token in &self.tokens {
            let result = parse_token(token, &self.keys)
                .and_then(|command| execute(&command, menu, host, fetcher));
            match result {
                Ok(()) => report.executed += 1,
                Err(e) => {
                    warn!(%token, error = %e, "Skipping autopilot token");
                    report.skipped += 1;
                }
            }
        }
        info!(
            executed = report.executed,
            skipped = report.skipped,
            "Autopilot finished"
        );
        report
    }
}

/// Parse one token
///
/// # Errors
///
/// Returns an error if the token is not a key or a well-formed call
pub fn parse_token(token: &str, keys: &ReservedKeys) -> Result<Command, AutopilotError> {
    if token.chars().count() == 1 {
        return Ok(Command::Key(token.to_string()));
    }
    if let Some(name) = keys.reserved_name(token) {
        return Ok(Command::Key(name.to_string()));
    }

    let malformed = |reason| AutopilotError::MalformedCall {
        token: token.to_string(),
        reason,
    };
    let (name, rest) = token
        .split_once('(')
        .ok_or_else(|| AutopilotError::UnknownToken(token.to_string()))?;
    let args = rest
        .strip_suffix(')')
        .ok_or_else(|| malformed("missing closing parenthesis"))?;

    match name {
        "geoText" | "geoUrl" => {
            let (format, value) = args
                .split_once(',')
                .ok_or_else(|| malformed("expected two arguments"))?;
            let format = parse_format(format)?;
            if name == "geoText" {
                Ok(Command::GeoText {
                    format,
                    content: value.to_string(),
                })
            } else {
                Ok(Command::GeoUrl {
                    format,
                    url: value.trim().to_string(),
                })
            }
        }
        "styleImage" => {
            let url = args.trim();
            if url.is_empty() {
                return Err(malformed("expected a URL"));
            }
            Ok(Command::StyleImage(url.to_string()))
        }
        _ => Err(AutopilotError::UnknownToken(token.to_string())),
    }
}

fn parse_format(name: &str) -> Result<GeoFormat, AutopilotError> {
    GeoFormat::from_suffix(name.trim()).ok_or_else(|| AutopilotError::UnknownFormat(name.to_string()))
}

fn execute(
    command: &Command,
    menu: &mut KeyboardMenu,
    host: &mut dyn Host,
    fetcher: &dyn Fetch,
) -> Result<(), AutopilotError> {
    match command {
        Command::Key(key) => {
            let mut press = KeyPress::new(key.as_str());
            let success = menu.handle_keypress(&mut press, host);
            debug!(%key, success, "Replayed key");
        }
        Command::GeoText { format, content } => {
            host.import_geo(*format, content)?;
        }
        Command::GeoUrl { format, url } => {
            let content = fetcher.fetch(url)?;
            host.import_geo(*format, &content)?;
        }
        Command::StyleImage(url) => host.set_style_image(url)?,
    }
    Ok(())
}
