//! Shared plumbing for the two upstream databases.
//!
//! Both clients speak the same dialect: blocking GET with bearer auth and
//! query parameters, JSON body. Failures are tagged so the cache layers can
//! decide how to degrade (today: log and treat as an empty result set).

use serde_json::Value;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("base url is not configured")]
    MissingBaseUrl,

    #[error("http error: {0:?}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Build a blocking client with the configured timeout applied to every
/// request. Both upstream databases share one timeout.
pub fn build_client(timeout_secs: u64) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// GET `url` with query params and optional bearer token, parse JSON.
pub fn get_json(
    client: &reqwest::blocking::Client,
    url: &str,
    params: &[(&str, String)],
    api_key: Option<&str>,
) -> Result<Value, FetchError> {
    let mut request = client.get(url).query(params);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let body = body.chars().take(200).collect();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<Value>()?)
}
