//! Turning a recipe into lookup queries and a taste vector.
//!
//! Ingredient-level data is sparse in the recipe database, so vectorization
//! works through a fallback chain: ingredients when present, otherwise the
//! recipe title, otherwise individual title words.

use crate::flavordb::CompoundRecord;
use crate::recipedb::Recipe;
use crate::taste::{self, TasteVector};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// At most this many title words get queried on the fallback path.
const MAX_TITLE_QUERIES: usize = 5;

static TITLE_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "easy", "the", "a", "an", "and", "with", "for", "in", "on", "or", "best", "quick",
        "simple", "magpie's", "grandma's", "mom's", "dad's",
    ]
    .into_iter()
    .collect()
});

/// Lookup terms for one ingredient: the full name first, then the first
/// word alone when the name is multi-word ("habanero pepper" → also
/// "habanero").
pub fn ingredient_queries(name: &str) -> Vec<String> {
    let name = name.trim();
    if name.is_empty() {
        return Vec::new();
    }

    let mut queries = vec![name.to_string()];
    let mut words = name.split_whitespace();
    if let (Some(first), Some(_)) = (words.next(), words.next()) {
        queries.push(first.to_string());
    }
    queries
}

/// Meaningful lowercase words from a recipe title, capped at
/// `MAX_TITLE_QUERIES`. Commas and apostrophes split words; stopwords,
/// short words and purely numeric words are dropped.
pub fn title_queries(title: &str) -> Vec<String> {
    title
        .replace([',', '\''], " ")
        .split_whitespace()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| {
            word.len() > 2
                && !TITLE_STOPWORDS.contains(word.as_str())
                && !word.chars().all(|c| c.is_ascii_digit())
        })
        .take(MAX_TITLE_QUERIES)
        .collect()
}

/// Build the taste vector for a recipe, querying the flavor database
/// through `lookup`.
///
/// With ingredients: per ingredient, the first query that returns any
/// compounds wins; compounds accumulate across ingredients. Without
/// ingredients: the full title is tried first, then up to five title
/// words, accumulating every non-empty result.
pub fn build_recipe_vector<F>(recipe: &Recipe, mut lookup: F) -> TasteVector
where
    F: FnMut(&str) -> Vec<CompoundRecord>,
{
    let mut all_compounds = Vec::new();

    if !recipe.ingredients.is_empty() {
        for name in &recipe.ingredients {
            for query in ingredient_queries(name) {
                let compounds = lookup(&query);
                if !compounds.is_empty() {
                    all_compounds.extend(compounds);
                    break;
                }
            }
        }
    } else {
        let title = recipe.title.trim();
        if !title.is_empty() {
            let full = lookup(title);
            if !full.is_empty() {
                all_compounds.extend(full);
            } else {
                for word in title_queries(title) {
                    let compounds = lookup(&word);
                    if !compounds.is_empty() {
                        all_compounds.extend(compounds);
                    }
                }
            }
        }
    }

    taste::build_vector(&all_compounds)
}
