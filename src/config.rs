//! Environment-driven configuration.
//!
//! Base URLs and the API credential come from the environment. Missing
//! values are never fatal: the clients report them as tagged fetch errors
//! and the pipeline degrades to empty result sets, so the daemon stays up
//! even when misconfigured. The load step warns loudly instead.

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RECIPE_PAGES: u32 = 20;
const DEFAULT_RECIPE_PER_PAGE: u32 = 100;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug)]
pub struct Config {
    /// Flavor-compound database base URL (`FLAVOR_BASE_URL`).
    pub flavor_base_url: Option<String>,
    /// Recipe database base URL (`RECIPE_BASE_URL`).
    pub recipe_base_url: Option<String>,
    /// Bearer token for both databases (`API_KEY`).
    pub api_key: Option<String>,
    /// One timeout for every upstream request (`REQUEST_TIMEOUT_SECS`).
    pub request_timeout_secs: u64,
    /// How many pages of recipes to fetch (`RECIPE_PAGES`).
    pub recipe_pages: u32,
    /// Page size for recipe fetches (`RECIPE_PER_PAGE`).
    pub recipe_per_page: u32,
    /// Daemon listen address (`BIND_ADDR`).
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let config = Self {
            flavor_base_url: env_url("FLAVOR_BASE_URL"),
            recipe_base_url: env_url("RECIPE_BASE_URL"),
            api_key: env_nonempty("API_KEY"),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            recipe_pages: env_parsed("RECIPE_PAGES", DEFAULT_RECIPE_PAGES),
            recipe_per_page: env_parsed("RECIPE_PER_PAGE", DEFAULT_RECIPE_PER_PAGE),
            bind_addr: env_nonempty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        };

        if config.flavor_base_url.is_none() {
            log::warn!("FLAVOR_BASE_URL not set; flavor lookups will return nothing");
        }
        if config.recipe_base_url.is_none() {
            log::warn!("RECIPE_BASE_URL not set; recipe fetches will return nothing");
        }
        if config.api_key.is_none() {
            log::warn!("API_KEY not set; upstream requests go out unauthenticated");
        }

        config
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            flavor_base_url: None,
            recipe_base_url: None,
            api_key: None,
            request_timeout_secs: 1,
            recipe_pages: 1,
            recipe_per_page: 10,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Read a base URL, validating it parses; trailing slashes are stripped so
/// path joining stays predictable.
fn env_url(name: &str) -> Option<String> {
    let value = env_nonempty(name)?;
    let value = value.trim_end_matches('/').to_string();
    if let Err(err) = url::Url::parse(&value) {
        log::warn!("{name}={value} is not a valid url ({err}); ignoring");
        return None;
    }
    Some(value)
}

fn env_parsed<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("{name}={raw} is not valid; using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}
