//! Raw-line normalization: canonicalize a profile line into a URL or a
//! documented rejection.

use thiserror::Error;
use url::Url;

/// Lines starting with this marker are treated as comments and filtered out
/// before entry construction.
pub const COMMENT_MARKER: char = '#';

/// Why a raw line did not normalize into a probe-able URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("empty line")]
    Empty,
    #[error("comment")]
    Comment,
    #[error("contains whitespace")]
    Whitespace,
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("no host")]
    MissingHost,
    #[error("not a valid URL: {0}")]
    Invalid(String),
}

impl RejectReason {
    /// Blank and comment lines are filtered out before the entry stage;
    /// every other rejection becomes a `Skipped` entry.
    pub fn excludes_entry(&self) -> bool {
        matches!(self, Self::Empty | Self::Comment)
    }
}

/// Canonicalize a raw line into a URL.
///
/// Trims surrounding whitespace and carriage returns, defaults a missing
/// scheme to `https`, and requires an `http`/`https` scheme with a host.
/// Idempotent: feeding a returned URL's string form back in yields the same
/// URL.
pub fn normalize(raw: &str) -> Result<Url, RejectReason> {
    let line = raw.trim();
    if line.is_empty() {
        return Err(RejectReason::Empty);
    }
    if line.starts_with(COMMENT_MARKER) {
        return Err(RejectReason::Comment);
    }
    if line.chars().any(char::is_whitespace) {
        return Err(RejectReason::Whitespace);
    }

    let url = match Url::parse(line) {
        Ok(url) => url,
        // No scheme at all: default to https and re-parse.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{line}")).map_err(|e| RejectReason::Invalid(e.to_string()))?
        }
        Err(e) => return Err(RejectReason::Invalid(e.to_string())),
    };

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(RejectReason::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none() {
        return Err(RejectReason::MissingHost);
    }

    Ok(url)
}
