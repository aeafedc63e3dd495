//! Process settings read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const ENV_PREFIX: &str = "FEDERATED_";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub stac_api_urls: Vec<String>,
    pub cmr_urls: Vec<String>,
    pub worker_pool_size: usize,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stac_api_urls: vec![],
            cmr_urls: vec![],
            worker_pool_size: default_worker_pool_size(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty());

        let worker_pool_size = match var("WORKER_POOL_SIZE") {
            Some(v) => v.trim().parse::<usize>().with_context(|| format!("{ENV_PREFIX}WORKER_POOL_SIZE is not a number: {v}"))?,
            None => default_worker_pool_size(),
        };
        if worker_pool_size == 0 {
            anyhow::bail!("{ENV_PREFIX}WORKER_POOL_SIZE must be positive");
        }
        let timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().with_context(|| format!("{ENV_PREFIX}REQUEST_TIMEOUT_SECS is not a number: {v}"))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let bind_addr = var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.trim().parse::<SocketAddr>().with_context(|| format!("{ENV_PREFIX}BIND_ADDR is not a socket address: {bind_addr}"))?;

        Ok(Self {
            stac_api_urls: split_urls(var("STAC_API_URLS")),
            cmr_urls: split_urls(var("CMR_URLS")),
            worker_pool_size,
            request_timeout: Duration::from_secs(timeout_secs),
            bind_addr,
        })
    }
}

fn split_urls(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(|url| url.to_string())
        .collect()
}

pub fn default_worker_pool_size() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn splits_url_lists_and_drops_blanks() {
        let settings = Settings::from_lookup(lookup(&[
            ("FEDERATED_STAC_API_URLS", "https://stac1.net, https://stac2.net,,"),
            ("FEDERATED_CMR_URLS", "https://cmr.earthdata.nasa.gov/search/"),
        ]))
        .unwrap();
        assert_eq!(settings.stac_api_urls, vec!["https://stac1.net", "https://stac2.net"]);
        assert_eq!(settings.cmr_urls, vec!["https://cmr.earthdata.nasa.gov/search/"]);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert!(settings.stac_api_urls.is_empty());
        assert!(settings.cmr_urls.is_empty());
        assert!(settings.worker_pool_size > 0);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.bind_addr.port(), 8000);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(Settings::from_lookup(lookup(&[("FEDERATED_WORKER_POOL_SIZE", "lots")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("FEDERATED_WORKER_POOL_SIZE", "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("FEDERATED_REQUEST_TIMEOUT_SECS", "-1")])).is_err());
    }
}
