//! Client for the owned games Web API

use reqwest::Url;
use serde_json::{Map, Value};
use std::sync::Arc;
use steamfilter_common::{DocumentFetcher, Error, Profile, Result};
use tracing::debug;

/// Client for listing the games an account owns
pub struct OwnedGamesClient {
    fetcher: Arc<dyn DocumentFetcher>,
    base_url: String,
    api_key: String,
}

impl OwnedGamesClient {
    /// Create a new owned games client
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/IPlayerService/GetOwnedGames/v0001/",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Request URL for `account_id`
    pub fn request_url(&self, account_id: &str) -> Result<String> {
        let endpoint = self.endpoint();

        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("key", self.api_key.as_str()),
                ("steamid", account_id),
                ("format", "json"),
            ],
        )
        .map_err(|e| Error::Other(anyhow::anyhow!("Invalid owned games URL {}: {}", endpoint, e)))?;

        Ok(url.into())
    }

    /// Fetch the raw owned games response for an account
    pub async fn fetch(&self, account_id: &str) -> Result<Vec<u8>> {
        let url = self.request_url(account_id)?;

        debug!("Fetching owned games for {}", account_id);

        // The query string carries the API key; keep it out of every error
        let document = self.fetcher.get(&url).await.map_err(|e| match e {
            Error::Network(e) => Error::Network(e.without_url()),
            Error::Upstream { status, .. } => Error::Upstream {
                status,
                url: self.endpoint(),
            },
            other => other,
        })?;

        if !document.is_success() {
            return Err(Error::Upstream {
                status: document.status,
                url: self.endpoint(),
            });
        }

        Ok(document.body)
    }
}

/// Add the profile fields to an owned games response
///
/// A body that is not a JSON object is replaced by an object holding only
/// the profile fields.
pub fn merge_profile(body: &[u8], profile: &Profile) -> Value {
    let mut object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    object.insert("SteamID".to_string(), Value::from(profile.display_name.clone()));
    object.insert("SteamID64".to_string(), Value::from(profile.account_id.clone()));
    object.insert("AvatarIcon".to_string(), Value::from(profile.display_icon.clone()));

    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use steamfilter_common::Document;

    struct FixedResponse(Document);

    #[async_trait]
    impl DocumentFetcher for FixedResponse {
        async fn get(&self, _url: &str) -> Result<Document> {
            Ok(self.0.clone())
        }
    }

    fn profile() -> Profile {
        Profile {
            account_id: "76561198018467980".to_string(),
            display_name: "murgonen".to_string(),
            display_icon: "https://avatars.example/full.jpg".to_string(),
            error: None,
        }
    }

    fn client(status: u16, body: &str) -> OwnedGamesClient {
        OwnedGamesClient::new(
            Arc::new(FixedResponse(Document::new(status, body))),
            "http://api.steampowered.com/",
            "SECRET",
        )
    }

    #[test]
    fn test_request_url() {
        let url = client(200, "").request_url("76561198018467980").unwrap();
        assert_eq!(
            url,
            "http://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/?key=SECRET&steamid=76561198018467980&format=json"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let body = r#"{"response":{"game_count":1,"games":[{"appid":620}]}}"#;
        let fetched = client(200, body).fetch("76561198018467980").await.unwrap();
        assert_eq!(fetched, body.as_bytes());
    }

    #[tokio::test]
    async fn test_fetch_upstream_error_hides_key() {
        let err = client(401, "").fetch("76561198018467980").await.unwrap_err();

        match err {
            Error::Upstream { status, url } => {
                assert_eq!(status, 401);
                assert!(!url.contains("SECRET"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_error_hides_key() {
        use std::time::Duration;
        use steamfilter_common::{HttpFetcher, RedirectMode};

        let fetcher = HttpFetcher::new(RedirectMode::Follow, Duration::from_secs(2)).unwrap();
        let client = OwnedGamesClient::new(Arc::new(fetcher), "http://127.0.0.1:1", "SECRETKEY123");

        let err = client.fetch("76561198018467980").await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
    }

    #[test]
    fn test_merge_profile_into_response() {
        let body = br#"{"response":{"game_count":2,"games":[{"appid":10},{"appid":20}]}}"#;
        let merged = merge_profile(body, &profile());

        assert_eq!(merged["response"]["game_count"], 2);
        assert_eq!(merged["SteamID"], "murgonen");
        assert_eq!(merged["SteamID64"], "76561198018467980");
        assert_eq!(merged["AvatarIcon"], "https://avatars.example/full.jpg");
    }

    #[test]
    fn test_merge_profile_into_non_object() {
        let merged = merge_profile(b"<html>Forbidden</html>", &profile());

        assert_eq!(merged.as_object().unwrap().len(), 3);
        assert_eq!(merged["SteamID64"], "76561198018467980");
    }
}
