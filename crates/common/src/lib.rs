//! Shared types for the steamfilter services
//!
//! Holds the error taxonomy, the game/profile data model and the
//! document fetch capability used by both the game-details and the
//! game-list services.

pub mod error;
pub mod fetcher;
pub mod models;

pub use error::{Error, Result};
pub use fetcher::{Document, DocumentFetcher, HttpFetcher, RedirectMode};
pub use models::{CacheEntry, GameRecord, Profile};
