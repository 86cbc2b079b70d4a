use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Fetch, Listing, ResourceRef};
use crate::error::{FetchError, SeedError};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";

/// Page size large enough to return any collection in one request
pub const PAGE_LIMIT: u32 = 100_000;

/// Blocking PokeAPI client. Every call is a fresh round trip: no retry, no cache.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SeedError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(concat!("pokedex-seed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Request {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    /// Collection endpoint for a resource type
    pub fn listing_url(&self, resource: &str) -> String {
        format!("{}/{}?limit={}&offset=0", self.base_url, resource, PAGE_LIMIT)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl Fetch for PokeApiClient {
    fn list(&self, resource: &str) -> Result<Vec<ResourceRef>, FetchError> {
        let listing: Listing = self.get_json(&self.listing_url(resource))?;
        Ok(listing.results)
    }

    fn detail(&self, url: &str) -> Result<Value, FetchError> {
        self.get_json(url)
    }
}
