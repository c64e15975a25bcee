//! Headless CMS client for Fernweh.
//!
//! Sync HTTP client for the Directus-style content API that holds the
//! place catalogue. One filtered read per page view; no caching, retries
//! or pagination.

mod client;
mod error;
mod types;

pub use client::CmsClient;
pub use error::CmsError;
pub use types::{GeoPoint, Introduction, ItemsResponse, Place};
