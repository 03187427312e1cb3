//! Import from public share links.
//!
//! A pasted link is reduced to its file token, the token to a direct
//! download URL, and the download is delegated to a [`GraphSource`]. The
//! fetched document is fully parsed before anything is returned, so a
//! failure at any step leaves the caller's store untouched.

use std::sync::OnceLock;
use async_trait::async_trait;
use regex_lite::Regex;

use crate::import::{parse_graph, ImportError};
use crate::types::Graph;

/// Shortest run of `[-\w]` treated as a file token.
pub const SHARE_TOKEN_MIN_LEN: usize = 25;

/// Direct-download endpoint the token is appended to.
pub const DOWNLOAD_BASE_URL: &str = "https://drive.google.com/uc?export=download&id=";

/// Something that can fetch a document body by URL.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Error type for fetches.
    type Error: std::error::Error + Send + Sync;

    /// Fetch the body at `url`.
    async fn fetch(&self, url: &str) -> Result<String, Self::Error>;
}

fn share_token_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(&format!(r"[-\w]{{{},}}", SHARE_TOKEN_MIN_LEN)).ok())
        .as_ref()
}

/// Extract the first file token from a pasted link.
pub fn extract_share_token(link: &str) -> Option<&str> {
    share_token_pattern()?.find(link).map(|m| m.as_str())
}

/// Direct-download URL for a file token.
pub fn download_url(token: &str) -> String {
    format!("{}{}", DOWNLOAD_BASE_URL, token)
}

/// Resolve a pasted link to its download URL.
pub fn resolve_link(link: &str) -> Result<String, ImportError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(ImportError::InvalidLink("empty link".to_string()));
    }
    extract_share_token(link)
        .map(download_url)
        .ok_or_else(|| ImportError::InvalidLink(link.to_string()))
}

/// Fetch and parse the graph behind a share link.
pub async fn fetch_graph<G: GraphSource + ?Sized>(source: &G, link: &str) -> Result<Graph, ImportError> {
    let url = resolve_link(link)?;
    tracing::debug!(url = %url, "Fetching shared mindmap");
    let body = source
        .fetch(&url)
        .await
        .map_err(|e| ImportError::Fetch(e.to_string()))?;
    parse_graph(&body)
}
