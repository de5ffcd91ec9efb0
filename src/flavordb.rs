//! Client for the flavor-compound database.
//!
//! One endpoint matters: `properties/taste-threshold`, queried by term.
//! Responses nest the record list under `content` or `payload.content`
//! depending on the deployment, so extraction is kept loose. Results are
//! cached by lowercased term for the lifetime of the process.

use crate::config::Config;
use crate::upstream::{self, FetchError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Page size for compound lookups; one page is always enough signal.
const LOOKUP_PAGE_SIZE: u32 = 50;

/// A record from the flavor database. Only the taste descriptor is used.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundRecord {
    pub taste_descriptor: Option<String>,
}

impl CompoundRecord {
    fn from_value(value: &Value) -> Self {
        let taste_descriptor = value
            .get("Taste_threshold_values")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
        Self { taste_descriptor }
    }
}

/// Pull the record list out of a lookup response.
///
/// Known shapes: `{content: [...]}`, `{payload: {content: [...]}}` and
/// `{payload: [...]}`. Anything else yields an empty list.
fn extract_content(data: &Value) -> Vec<CompoundRecord> {
    let content = data
        .get("content")
        .and_then(|v| v.as_array())
        .or_else(|| {
            let payload = data.get("payload")?;
            payload
                .as_array()
                .or_else(|| payload.get("content").and_then(|v| v.as_array()))
        });

    content
        .map(|records| records.iter().map(CompoundRecord::from_value).collect())
        .unwrap_or_default()
}

pub struct FlavorClient {
    client: reqwest::blocking::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    cache: Mutex<HashMap<String, Vec<CompoundRecord>>>,
}

impl FlavorClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: upstream::build_client(config.request_timeout_secs),
            base_url: config.flavor_base_url.clone(),
            api_key: config.api_key.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn fetch(&self, term: &str) -> Result<Vec<CompoundRecord>, FetchError> {
        let base = self.base_url.as_deref().ok_or(FetchError::MissingBaseUrl)?;
        let url = format!("{base}/properties/taste-threshold");
        let params = [
            ("values", term.to_string()),
            ("page", "0".to_string()),
            ("size", LOOKUP_PAGE_SIZE.to_string()),
        ];

        let data = upstream::get_json(&self.client, &url, &params, self.api_key.as_deref())?;
        Ok(extract_content(&data))
    }

    /// Look up compounds for a term, bypassing the cache.
    ///
    /// Any failure degrades to an empty list; ranking treats "no data" and
    /// "upstream error" the same way.
    pub fn compounds(&self, term: &str) -> Vec<CompoundRecord> {
        match self.fetch(term) {
            Ok(records) => records,
            Err(err) => {
                log::warn!("flavor lookup '{term}' failed: {err}");
                Vec::new()
            }
        }
    }

    /// Cached lookup, keyed by the lowercased, trimmed term.
    ///
    /// Failed lookups are cached as empty too, so a flaky term does not get
    /// re-fetched for every recipe that mentions it.
    pub fn compounds_cached(&self, term: &str) -> Vec<CompoundRecord> {
        let key = term.trim().to_lowercase();

        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            return hit.clone();
        }

        let records = self.compounds(term);
        self.cache
            .lock()
            .unwrap()
            .insert(key, records.clone());
        records
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    #[cfg(test)]
    pub fn seed_cache(&self, term: &str, records: Vec<CompoundRecord>) {
        self.cache
            .lock()
            .unwrap()
            .insert(term.trim().to_lowercase(), records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_top_level_content() {
        let data = json!({
            "content": [
                {"Taste_threshold_values": "Sweet"},
                {"Taste_threshold_values": "bitter, sour"},
            ]
        });

        let records = extract_content(&data);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].taste_descriptor.as_deref(), Some("Sweet"));
        assert_eq!(records[1].taste_descriptor.as_deref(), Some("bitter, sour"));
    }

    #[test]
    fn test_extract_nested_payload_content() {
        let data = json!({
            "payload": {
                "content": [{"Taste_threshold_values": "umami"}]
            }
        });

        let records = extract_content(&data);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taste_descriptor.as_deref(), Some("umami"));
    }

    #[test]
    fn test_extract_payload_as_list() {
        let data = json!({
            "payload": [{"Taste_threshold_values": "salty"}, {}]
        });

        let records = extract_content(&data);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].taste_descriptor.as_deref(), Some("salty"));
        assert!(records[1].taste_descriptor.is_none());
    }

    #[test]
    fn test_extract_unexpected_shapes_yield_empty() {
        assert!(extract_content(&json!({})).is_empty());
        assert!(extract_content(&json!({"content": "oops"})).is_empty());
        assert!(extract_content(&json!({"payload": {"content": 42}})).is_empty());
    }

    #[test]
    fn test_missing_base_url_degrades_to_empty() {
        let config = Config::for_tests();
        let client = FlavorClient::new(&config);
        assert!(client.compounds("sugar").is_empty());
    }

    #[test]
    fn test_cache_key_is_lowercased_and_trimmed() {
        let config = Config::for_tests();
        let client = FlavorClient::new(&config);
        client.seed_cache("  Sugar ", vec![CompoundRecord {
            taste_descriptor: Some("sweet".into()),
        }]);

        let hit = client.compounds_cached("sugar");
        assert_eq!(hit.len(), 1);
        assert_eq!(client.cache_len(), 1);

        client.clear_cache();
        assert_eq!(client.cache_len(), 0);
    }
}
