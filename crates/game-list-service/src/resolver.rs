//! Community profile identifier resolution
//!
//! Users may type a vanity name, a 64-bit account id, or paste a profile
//! URL in one of its shapes. Classification depends only on the shape of
//! the input; nothing is looked up.

use regex::Regex;
use steamfilter_common::{Error, Result};

/// How an identifier addresses a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Custom profile name, resolved by the community site
    Vanity,
    /// 64-bit account id, usable as is
    Direct,
}

/// A canonical profile identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifier {
    pub identifier: String,
    pub kind: IdentifierKind,
}

impl ResolvedIdentifier {
    fn new(identifier: &str, kind: IdentifierKind) -> Self {
        Self {
            identifier: identifier.to_string(),
            kind,
        }
    }

    /// URL of the XML profile document on `community_base_url`
    pub fn profile_url(&self, community_base_url: &str) -> String {
        let base = community_base_url.trim_end_matches('/');
        match self.kind {
            IdentifierKind::Vanity => format!("{}/id/{}?xml=1", base, self.identifier),
            IdentifierKind::Direct => format!("{}/profiles/{}?xml=1", base, self.identifier),
        }
    }
}

/// Classifies raw user input, with its patterns compiled once
pub struct IdentifierResolver {
    vanity_url: Regex,
    profile_url: Regex,
    account_id: Regex,
}

impl IdentifierResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            vanity_url: compile(r"^https?://(?:www\.)?steamcommunity\.com/id/([^/?#]+)")?,
            profile_url: compile(r"^https?://(?:www\.)?steamcommunity\.com/profiles/([^/?#]+)")?,
            account_id: compile(r"[0-9]{17}")?,
        })
    }

    /// Classify `raw`; never fails, unrecognized input is treated as a vanity name
    pub fn resolve(&self, raw: &str) -> ResolvedIdentifier {
        if raw.starts_with("http") {
            if let Some(name) = first_capture(&self.vanity_url, raw) {
                return ResolvedIdentifier::new(name, IdentifierKind::Vanity);
            }
            if let Some(id) = first_capture(&self.profile_url, raw) {
                return ResolvedIdentifier::new(id, IdentifierKind::Direct);
            }
            return ResolvedIdentifier::new(raw, IdentifierKind::Vanity);
        }

        if self.account_id.is_match(raw) {
            ResolvedIdentifier::new(raw, IdentifierKind::Direct)
        } else {
            ResolvedIdentifier::new(raw, IdentifierKind::Vanity)
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(anyhow::anyhow!("invalid pattern {}: {}", pattern, e)))
}

fn first_capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
