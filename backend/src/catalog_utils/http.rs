//! Shared reqwest plumbing.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::DiscoveryError;

const USER_AGENT: &str = "federated-collection-discovery";
const MAX_ERROR_BODY_LEN: usize = 500;

/// One client per process; `reqwest::Client` is a handle around a shared connection pool.
pub fn build_http_client(request_timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

pub struct JsonResponse<T> {
    pub body: T,
    pub headers: HeaderMap,
}

pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> anyhow::Result<JsonResponse<T>> {
    tracing::debug!("GET {} {:?}", url, query);
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| unreachable(url, &e))?;
    let status = response.status();
    let headers = response.headers().clone();
    let response_txt = response.text().await.map_err(|e| unreachable(url, &e))?;
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("GET {}: {}: {}", url, status, truncate(&response_txt));
    }
    let body = serde_json::from_str::<T>(&response_txt)
        .with_context(|| format!("GET {}: unexpected response: {}", url, truncate(&response_txt)))?;
    Ok(JsonResponse { body, headers })
}

fn unreachable(url: &str, e: &reqwest::Error) -> DiscoveryError {
    let reason = if e.is_timeout() { format!("request timed out ({e})") } else { e.to_string() };
    DiscoveryError::CatalogUnreachable { catalog_url: url.to_string(), reason }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Resolves a link `href` against the document it came from.
pub fn resolve_href(base: &str, href: &str) -> anyhow::Result<String> {
    let base = reqwest::Url::parse(base).with_context(|| format!("Invalid catalog url: {base}"))?;
    let resolved = base.join(href).with_context(|| format!("Invalid link href: {href}"))?;
    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_absolute_links() {
        assert_eq!(resolve_href("https://stac1.net/api/", "collections").unwrap(), "https://stac1.net/api/collections");
        assert_eq!(resolve_href("https://stac1.net/api/", "https://other.net/c").unwrap(), "https://other.net/c");
        assert!(resolve_href("not a url", "collections").is_err());
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY_LEN + 10);
        assert_eq!(truncate(&body).chars().count(), MAX_ERROR_BODY_LEN);
        assert_eq!(truncate("short"), "short");
    }
}
