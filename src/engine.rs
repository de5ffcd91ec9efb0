//! The recommendation pipeline: target vector selection, similarity
//! scoring, exclusion filtering and ranking.
//!
//! This module is pure — it operates on already-built taste vectors and a
//! precomputed recipe index, so the whole pipeline is testable without any
//! upstream database.

use crate::recipedb::Recipe;
use crate::taste::{self, TasteVector};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Responses are capped at this many recipes.
const MAX_RESULTS: usize = 10;

/// Similarity floor; near-zero scores are noise, not matches.
const MIN_SIMILARITY: f64 = 0.01;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub taste_inputs: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub budget: String,
}

/// A recipe with a precomputed non-zero taste vector. Vectors are unit
/// length by construction, so the norm is not stored.
#[derive(Debug, Clone)]
pub struct RecipeVector {
    pub recipe: Recipe,
    pub vector: TasteVector,
}

impl RecipeVector {
    /// Keeps only recipes that produced a non-zero vector.
    pub fn new(recipe: Recipe, vector: TasteVector) -> Option<Self> {
        (vector.norm() > 0.0).then_some(Self { recipe, vector })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe {
    pub title: String,
    pub region: Option<String>,
    pub similarity_score: f64,
    pub calories: Option<f64>,
}

/// Outcome of a recommendation request. Error outcomes are part of the
/// response body, never transport-level failures.
#[derive(Debug)]
pub enum RecommendOutcome {
    Recommendations {
        query_summary: RecommendRequest,
        recommended_recipes: Vec<ScoredRecipe>,
    },
    NoProfile,
    NoMatches,
}

impl RecommendOutcome {
    pub fn into_body(self) -> serde_json::Value {
        match self {
            Self::Recommendations {
                query_summary,
                recommended_recipes,
            } => json!({
                "query_summary": query_summary,
                "recommended_recipes": recommended_recipes,
            }),
            Self::NoProfile => json!({"error": "No flavor profile found."}),
            Self::NoMatches => json!({"error": "No recipes matched your filters."}),
        }
    }
}

/// Run the ranking pipeline.
///
/// `input_vectors` are the vectors built from the request's taste inputs,
/// zero vectors already discarded. In blend mode with more than one vector
/// the target is their centroid; otherwise the first vector wins.
pub fn recommend(
    request: RecommendRequest,
    input_vectors: &[TasteVector],
    index: &[RecipeVector],
) -> RecommendOutcome {
    if input_vectors.is_empty() {
        return RecommendOutcome::NoProfile;
    }

    let target = if request.mode == "blend" && input_vectors.len() > 1 {
        taste::centroid(input_vectors)
    } else {
        input_vectors[0]
    };

    let exclude: Vec<String> = request.exclude.iter().map(|e| e.to_lowercase()).collect();

    let mut results = Vec::new();
    for entry in index {
        let title = entry.recipe.title.trim();
        if title.is_empty() {
            continue;
        }

        let title_lower = title.to_lowercase();
        if exclude.iter().any(|ex| title_lower.contains(ex)) {
            continue;
        }

        let similarity = taste::cosine_similarity(&target, &entry.vector);
        if similarity <= MIN_SIMILARITY {
            continue;
        }

        results.push(ScoredRecipe {
            title: title.to_string(),
            region: entry.recipe.region.clone(),
            similarity_score: round3(similarity),
            calories: entry.recipe.calories,
        });
    }

    if results.is_empty() {
        return RecommendOutcome::NoMatches;
    }

    if request.budget == "low" {
        // lowest calories first, unknown calories last
        results.sort_by(|a, b| {
            a.calories
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.calories.unwrap_or(f64::INFINITY))
        });
    } else {
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    }

    results.truncate(MAX_RESULTS);

    RecommendOutcome::Recommendations {
        query_summary: request,
        recommended_recipes: results,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }
}
