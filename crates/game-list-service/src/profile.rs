//! Community profile lookup

use serde::Deserialize;
use std::sync::Arc;
use steamfilter_common::{DocumentFetcher, Error, Profile, Result};
use tracing::{debug, info};

use crate::resolver::IdentifierResolver;

/// Fields read from the XML profile document; everything else is ignored
#[derive(Debug, Default, Deserialize)]
struct ProfileDocument {
    #[serde(rename = "steamID64", default)]
    steam_id64: String,

    #[serde(rename = "steamID", default)]
    steam_id: String,

    #[serde(rename = "avatarFull", default)]
    avatar_full: String,

    #[serde(default)]
    error: Option<String>,
}

/// Decode an XML profile document
///
/// Missing fields decode as empty strings; only a body that is not
/// well-formed XML is an error.
pub fn parse_profile(body: &[u8]) -> Result<Profile> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::Parse(format!("profile document is not valid UTF-8: {}", e)))?;

    let doc: ProfileDocument = quick_xml::de::from_str(text)
        .map_err(|e| Error::Parse(format!("Failed to decode profile document: {}", e)))?;

    Ok(Profile {
        account_id: doc.steam_id64.trim().to_string(),
        display_name: doc.steam_id.trim().to_string(),
        display_icon: doc.avatar_full.trim().to_string(),
        error: doc.error.map(|e| e.trim().to_string()),
    })
}

/// Resolves user input into a community profile
pub struct ProfileFetcher {
    fetcher: Arc<dyn DocumentFetcher>,
    resolver: IdentifierResolver,
    community_base_url: String,
}

impl ProfileFetcher {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        resolver: IdentifierResolver,
        community_base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            community_base_url: community_base_url.into(),
        }
    }

    /// Fetch the profile addressed by `raw`
    ///
    /// # Arguments
    /// * `raw` - vanity name, 64-bit account id, or profile URL
    pub async fn fetch_profile(&self, raw: &str) -> Result<Profile> {
        if raw.is_empty() {
            return Err(Error::InvalidInput("No profile name given".to_string()));
        }

        let resolved = self.resolver.resolve(raw);
        debug!("Resolved {:?} to {:?}", raw, resolved);

        let url = resolved.profile_url(&self.community_base_url);
        info!("Fetching profile {}", url);

        let document = self.fetcher.get(&url).await?;
        if !document.is_success() {
            return Err(Error::Upstream {
                status: document.status,
                url,
            });
        }

        parse_profile(&document.body)
    }
}
