//! Data model shared by the services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rating value used when a store page carries no review summary
pub const UNKNOWN_RATING: i32 = -1;

/// Capsule image shown next to a game in listings
pub fn icon_url(app_id: u32) -> String {
    format!(
        "https://steamcdn-a.akamaihd.net/steam/apps/{}/capsule_184x69.jpg",
        app_id
    )
}

/// Public store page of a game
pub fn store_url(app_id: u32) -> String {
    format!("https://store.steampowered.com/app/{}/", app_id)
}

/// Metadata scraped from a store page
///
/// Field names on the wire match the ones front-end clients already
/// consume, and the cache stores the same JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameRecord {
    /// Store application id, always populated
    pub app_id: u32,

    /// Display name; empty for an id the store does not know
    #[serde(default)]
    pub name: String,

    /// Capsule image URL derived from the id
    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub genres: Vec<String>,

    /// Release date, serialized as epoch seconds
    #[serde(default, with = "chrono::serde::ts_seconds")]
    pub release_date: DateTime<Utc>,

    #[serde(default)]
    pub developer: String,

    #[serde(default)]
    pub publisher: String,

    /// Positive review percentage, or [`UNKNOWN_RATING`]
    #[serde(default = "unknown_rating")]
    pub rating: i32,

    /// Store page URL derived from the id
    #[serde(default)]
    pub store_link: String,
}

fn unknown_rating() -> i32 {
    UNKNOWN_RATING
}

impl GameRecord {
    /// Record carrying only the id, persisted for ids missing from the store
    pub fn placeholder(app_id: u32) -> Self {
        Self {
            app_id,
            rating: UNKNOWN_RATING,
            ..Default::default()
        }
    }

    /// Whether this record describes a game that exists in the store
    pub fn is_resolved(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A cached lookup result for one app id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Metadata for a game that exists
    Present(GameRecord),

    /// The store answered that this id does not exist
    KnownAbsent(u32),
}

impl CacheEntry {
    pub fn app_id(&self) -> u32 {
        match self {
            CacheEntry::Present(record) => record.app_id,
            CacheEntry::KnownAbsent(app_id) => *app_id,
        }
    }

    /// Interpret a persisted record; an empty name marks a negative entry
    pub fn from_record(record: GameRecord) -> Self {
        if record.is_resolved() {
            CacheEntry::Present(record)
        } else {
            CacheEntry::KnownAbsent(record.app_id)
        }
    }

    /// Persisted form of this entry
    pub fn to_record(&self) -> GameRecord {
        match self {
            CacheEntry::Present(record) => record.clone(),
            CacheEntry::KnownAbsent(app_id) => GameRecord::placeholder(*app_id),
        }
    }
}

/// Account details resolved from a community profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Stable 64-bit account id as text
    pub account_id: String,

    /// Current display name
    pub display_name: String,

    /// Full-size avatar URL
    pub display_icon: String,

    /// Error text reported by the profile document, if any
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_wire_names() {
        let record = GameRecord {
            app_id: 620,
            name: "Portal 2".to_string(),
            icon: icon_url(620),
            features: vec!["Single-player".to_string()],
            genres: vec!["Action".to_string(), "Adventure".to_string()],
            release_date: Utc.with_ymd_and_hms(2011, 4, 18, 0, 0, 0).unwrap(),
            developer: "Valve".to_string(),
            publisher: "Valve".to_string(),
            rating: 98,
            store_link: store_url(620),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["AppId"], 620);
        assert_eq!(json["Name"], "Portal 2");
        assert_eq!(
            json["Icon"],
            "https://steamcdn-a.akamaihd.net/steam/apps/620/capsule_184x69.jpg"
        );
        assert_eq!(json["ReleaseDate"], 1303084800);
        assert_eq!(json["Rating"], 98);
        assert_eq!(json["StoreLink"], "https://store.steampowered.com/app/620/");
        assert_eq!(json["Genres"][1], "Adventure");
    }

    #[test]
    fn test_sparse_cached_record_decodes() {
        let record: GameRecord = serde_json::from_str(r#"{"AppId": 42}"#).unwrap();
        assert_eq!(record.app_id, 42);
        assert!(record.name.is_empty());
        assert_eq!(record.rating, UNKNOWN_RATING);
        assert_eq!(record.release_date.timestamp(), 0);
    }

    #[test]
    fn test_cache_entry_from_placeholder_is_absent() {
        let entry = CacheEntry::from_record(GameRecord::placeholder(7));
        assert_eq!(entry, CacheEntry::KnownAbsent(7));
        assert_eq!(entry.app_id(), 7);

        let persisted = entry.to_record();
        assert_eq!(persisted.app_id, 7);
        assert!(!persisted.is_resolved());
    }

    #[test]
    fn test_cache_entry_from_named_record_is_present() {
        let record = GameRecord {
            app_id: 10,
            name: "Counter-Strike".to_string(),
            ..Default::default()
        };
        let entry = CacheEntry::from_record(record.clone());
        assert_eq!(entry, CacheEntry::Present(record));
    }
}
