//! Source API access: one listing call per resource type, one detail call per resource.

pub mod client;

pub use client::*;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// A `{name, url}` pair from a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// Collection listing envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub count: u64,
    pub results: Vec<ResourceRef>,
}

/// The `fetch(url) -> JSON` capability the loader needs
pub trait Fetch {
    /// Every resource of a type, as `(name, detail_url)` pairs
    fn list(&self, resource: &str) -> Result<Vec<ResourceRef>, FetchError>;

    /// Full detail payload of one resource
    fn detail(&self, url: &str) -> Result<Value, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn list(&self, resource: &str) -> Result<Vec<ResourceRef>, FetchError> {
        (**self).list(resource)
    }

    fn detail(&self, url: &str) -> Result<Value, FetchError> {
        (**self).detail(url)
    }
}
