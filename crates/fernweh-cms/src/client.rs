//! Content API client.
//!
//! Thin sync wrapper over the CMS REST endpoints the site reads from:
//! the `place` collection, the singleton `introduction` collection and
//! the asset delivery path.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::info;
use ureq::Agent;

use crate::error::CmsError;
use crate::types::{Introduction, ItemsResponse, Place};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Content API client.
pub struct CmsClient {
    agent: Agent,
    base_url: String,
}

impl CmsClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - Content API base URL (trailing slash tolerated)
    #[must_use]
    pub fn from_config(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Items endpoint for a collection.
    fn items_url(&self, collection: &str) -> String {
        format!("{}/items/{}", self.base_url, collection)
    }

    /// Fetch all published places, all fields.
    ///
    /// `sort` is passed through to the API when given (e.g. `-date` for
    /// newest-first).
    pub fn list_places(&self, sort: Option<&str>) -> Result<Vec<Place>, CmsError> {
        let url = self.items_url("place");

        info!("Fetching published places (sort={})", sort.unwrap_or("none"));

        let mut request = self
            .agent
            .get(&url)
            .query("filter[status][_eq]", "published")
            .query("fields", "*")
            .header("Accept", "application/json");
        if let Some(sort) = sort {
            request = request.query("sort", sort);
        }

        let response = request.call()?;
        let body: ItemsResponse<Place> = read_json(response)?;
        Ok(body.data)
    }

    /// Fetch the introduction record, if one exists.
    pub fn get_introduction(&self) -> Result<Option<Introduction>, CmsError> {
        let url = self.items_url("introduction");

        info!("Fetching introduction");

        let response = self
            .agent
            .get(&url)
            .query("fields", "text")
            .query("limit", "1")
            .header("Accept", "application/json")
            .call()?;

        let body: ItemsResponse<Introduction> = read_json(response)?;
        Ok(body.data.into_iter().next())
    }

    /// Delivery URL for an asset file, optionally with a signed transform
    /// key.
    #[must_use]
    pub fn asset_url(&self, file_id: &str, transform_key: Option<&str>) -> String {
        match transform_key {
            Some(key) => format!("{}/assets/{}?key={}", self.base_url, file_id, key),
            None => format!("{}/assets/{}", self.base_url, file_id),
        }
    }
}

/// Map error statuses to [`CmsError::HttpResponse`], otherwise decode JSON.
fn read_json<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, CmsError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(CmsError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body.read_json()?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CmsClient::from_config("http://cms.example.com/");
        assert_eq!(client.items_url("place"), "http://cms.example.com/items/place");
    }

    #[test]
    fn test_asset_url_without_key() {
        let client = CmsClient::from_config("http://cms.example.com");
        assert_eq!(
            client.asset_url("0bd9c7a2", None),
            "http://cms.example.com/assets/0bd9c7a2"
        );
    }

    #[test]
    fn test_asset_url_with_transform_key() {
        let client = CmsClient::from_config("http://cms.example.com");
        assert_eq!(
            client.asset_url("0bd9c7a2", Some("thumb")),
            "http://cms.example.com/assets/0bd9c7a2?key=thumb"
        );
    }
}
