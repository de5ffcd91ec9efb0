//! Client for the recipe database.
//!
//! Recipe metadata and ingredient lists live behind two separate paginated
//! endpoints; records are joined by normalized title to produce enriched
//! recipes. Ingredient coverage in the source is sparse, which is why the
//! vectorizer keeps a title-word fallback.

use crate::config::Config;
use crate::upstream::{self, FetchError};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

const RECIPESINFO_PATH: &str = "recipe2-api/recipe/recipesinfo";
const WITH_INGREDIENTS_PATH: &str = "recipe2-api/recipe/recipe-day/with-ingredients-categories";

/// A recipe joined across both endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub title: String,
    pub region: Option<String>,
    pub calories: Option<f64>,
    pub ingredients: Vec<String>,
}

impl Recipe {
    fn from_value(value: &Value) -> Self {
        Self {
            title: extract_title(value),
            region: value
                .get("Region")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            calories: parse_calories(value.get("Calories")),
            ingredients: extract_ingredients(value.get("ingredients")),
        }
    }
}

fn extract_title(value: &Value) -> String {
    value
        .get("Recipe_title")
        .or_else(|| value.get("recipe_title"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Calories arrive as numbers, numeric strings, or garbage. Anything that
/// does not parse becomes None, never an error.
fn parse_calories(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Ingredients are plain strings or objects carrying a `name` field.
fn extract_ingredients(value: Option<&Value>) -> Vec<String> {
    let Some(list) = value.and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    list.iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => item
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            _ => None,
        })
        .collect()
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Pull the record list out of a paginated response.
///
/// Known shapes: `{payload: [...]}`, `{payload: {data: [...]}}` and
/// `{data: [...]}`.
fn extract_list(data: &Value) -> Vec<Value> {
    let list = match data.get("payload") {
        Some(payload) => payload
            .as_array()
            .or_else(|| payload.get("data").and_then(|v| v.as_array())),
        None => data.get("data").and_then(|v| v.as_array()),
    };
    list.cloned().unwrap_or_default()
}

pub struct RecipeClient {
    client: reqwest::blocking::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl RecipeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: upstream::build_client(config.request_timeout_secs),
            base_url: config.recipe_base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn fetch_page(&self, path: &str, page: u32, limit: u32) -> Result<Vec<Value>, FetchError> {
        let base = self.base_url.as_deref().ok_or(FetchError::MissingBaseUrl)?;
        let url = format!("{base}/{path}");
        let params = [
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];

        let data = upstream::get_json(&self.client, &url, &params, self.api_key.as_deref())?;
        Ok(extract_list(&data))
    }

    /// Recipe metadata (no ingredients), one page. Failures degrade to empty.
    pub fn recipes_info(&self, page: u32, limit: u32) -> Vec<Value> {
        match self.fetch_page(RECIPESINFO_PATH, page, limit) {
            Ok(records) => {
                log::debug!("recipesinfo page {page}: {} records", records.len());
                records
            }
            Err(err) => {
                log::warn!("recipesinfo page {page} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Recipes with ingredient lists, one page. Failures degrade to empty.
    pub fn recipes_with_ingredients(&self, page: u32, limit: u32) -> Vec<Value> {
        match self.fetch_page(WITH_INGREDIENTS_PATH, page, limit) {
            Ok(records) => {
                let with_ing = records
                    .iter()
                    .filter(|r| {
                        r.get("ingredients")
                            .and_then(|v| v.as_array())
                            .map(|a| !a.is_empty())
                            .unwrap_or(false)
                    })
                    .count();
                log::debug!(
                    "with-ingredients page {page}: {with_ing}/{} records have ingredients",
                    records.len()
                );
                records
            }
            Err(err) => {
                log::warn!("with-ingredients page {page} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Fetch both endpoints page by page and join them by normalized title.
    ///
    /// Metadata records are the authority; ingredient lists are attached
    /// where a title matches. Duplicate titles are dropped after the first
    /// occurrence. Pagination stops early on a short page.
    pub fn enriched_recipes(&self, pages: u32, per_page: u32) -> Vec<Recipe> {
        let mut all_info = Vec::new();
        for page in 1..=pages {
            let chunk = self.recipes_info(page, per_page);
            let short = (chunk.len() as u32) < per_page;
            all_info.extend(chunk);
            if short {
                break;
            }
        }

        let mut ingredients_by_title: HashMap<String, Vec<String>> = HashMap::new();
        for page in 1..=pages {
            let chunk = self.recipes_with_ingredients(page, per_page);
            let short = (chunk.len() as u32) < per_page;
            for record in &chunk {
                let key = normalize_title(&extract_title(record));
                let ingredients = extract_ingredients(record.get("ingredients"));
                if !key.is_empty() && !ingredients.is_empty() {
                    ingredients_by_title.insert(key, ingredients);
                }
            }
            if short {
                break;
            }
        }

        join_enriched(&all_info, &ingredients_by_title)
    }
}

fn join_enriched(
    info: &[Value],
    ingredients_by_title: &HashMap<String, Vec<String>>,
) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    let mut enriched = Vec::new();

    for record in info {
        let mut recipe = Recipe::from_value(record);
        let key = normalize_title(&recipe.title);
        if !seen.insert(key.clone()) {
            continue;
        }
        if let Some(ingredients) = ingredients_by_title.get(&key) {
            recipe.ingredients = ingredients.clone();
        }
        enriched.push(recipe);
    }

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_list_shapes() {
        let payload_list = json!({"payload": [{"a": 1}, {"b": 2}]});
        assert_eq!(extract_list(&payload_list).len(), 2);

        let payload_data = json!({"payload": {"data": [{"a": 1}]}});
        assert_eq!(extract_list(&payload_data).len(), 1);

        let top_level = json!({"data": [{}, {}, {}]});
        assert_eq!(extract_list(&top_level).len(), 3);

        assert!(extract_list(&json!({})).is_empty());
        assert!(extract_list(&json!({"payload": "nope"})).is_empty());
    }

    #[test]
    fn test_parse_calories_defensively() {
        assert_eq!(parse_calories(Some(&json!(512))), Some(512.0));
        assert_eq!(parse_calories(Some(&json!(88.5))), Some(88.5));
        assert_eq!(parse_calories(Some(&json!("240"))), Some(240.0));
        assert_eq!(parse_calories(Some(&json!(" 240 "))), Some(240.0));
        assert_eq!(parse_calories(Some(&json!("unknown"))), None);
        assert_eq!(parse_calories(Some(&json!(null))), None);
        assert_eq!(parse_calories(Some(&json!({"kcal": 100}))), None);
        assert_eq!(parse_calories(None), None);
    }

    #[test]
    fn test_ingredients_as_strings_or_objects() {
        let value = json!(["onion", {"name": "garlic"}, {"qty": 2}, 7]);
        let ingredients = extract_ingredients(Some(&value));
        assert_eq!(ingredients, vec!["onion".to_string(), "garlic".to_string()]);
    }

    #[test]
    fn test_recipe_from_value() {
        let value = json!({
            "Recipe_title": "Miso Soup",
            "Region": "Japanese",
            "Calories": "84",
            "ingredients": [{"name": "miso paste"}, "tofu"]
        });

        let recipe = Recipe::from_value(&value);
        assert_eq!(recipe.title, "Miso Soup");
        assert_eq!(recipe.region.as_deref(), Some("Japanese"));
        assert_eq!(recipe.calories, Some(84.0));
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn test_join_attaches_ingredients_and_dedupes() {
        let info = vec![
            json!({"Recipe_title": "Miso Soup", "Region": "Japanese"}),
            json!({"Recipe_title": "miso soup ", "Region": "dup"}),
            json!({"Recipe_title": "Plain Rice"}),
        ];
        let mut by_title = HashMap::new();
        by_title.insert(
            "miso soup".to_string(),
            vec!["miso paste".to_string(), "tofu".to_string()],
        );

        let enriched = join_enriched(&info, &by_title);
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].title, "Miso Soup");
        assert_eq!(enriched[0].ingredients.len(), 2);
        assert!(enriched[1].ingredients.is_empty());
    }
}
