//! plantbook-client: Open Plantbook API access
//!
//! The MCP tools only need two upstream operations, a name search and a
//! detail lookup, so they depend on the [`PlantProvider`] trait rather than
//! on the HTTP client directly. Tests substitute an in-memory provider.

pub mod auth;
pub mod cache;
pub mod client;

pub use auth::{Authenticator, Credentials};
pub use cache::TtlCache;
pub use client::{ClientConfig, OpenPlantbookClient};

use async_trait::async_trait;
use plantbook_core::types::{PlantDetails, PlantSearchResult};
use plantbook_core::PlantbookResult;

/// Source of plant records
#[async_trait]
pub trait PlantProvider: Send + Sync {
    /// Search plants by common or scientific name, best matches first.
    async fn search(&self, query: &str, limit: usize) -> PlantbookResult<Vec<PlantSearchResult>>;

    /// Full care record for one plant id. An empty `language` means the
    /// upstream default.
    async fn details(&self, pid: &str, language: &str) -> PlantbookResult<PlantDetails>;
}
