//! Application state: config, upstream clients and the two process-wide
//! caches (flavor term cache inside the flavor client, recipe vectors
//! here). Caches fill lazily on first use and only an explicit clear
//! resets them.

use crate::config::Config;
use crate::engine::{self, RecipeVector, RecommendOutcome, RecommendRequest};
use crate::flavordb::FlavorClient;
use crate::recipedb::{Recipe, RecipeClient};
use crate::{taste, vectorize};
use serde::Serialize;

/// Progress is logged every this many recipes during vector precompute.
const VECTOR_PROGRESS_EVERY: usize = 100;

pub struct App {
    config: Config,
    flavordb: FlavorClient,
    recipedb: RecipeClient,
    recipes: Option<Vec<Recipe>>,
    vectors: Option<Vec<RecipeVector>>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub cached: bool,
    pub recipe_count: usize,
    pub vectors_computed: bool,
    pub vector_count: usize,
    pub flavor_cache_size: usize,
    pub sample_recipes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeSample {
    pub title: String,
    pub region: Option<String>,
    pub ingredients: Vec<String>,
    pub ingredient_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DebugRecipes {
    pub total_recipes: usize,
    pub sample: Vec<RecipeSample>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let flavordb = FlavorClient::new(&config);
        let recipedb = RecipeClient::new(&config);
        Self {
            config,
            flavordb,
            recipedb,
            recipes: None,
            vectors: None,
        }
    }

    pub fn flavordb(&self) -> &FlavorClient {
        &self.flavordb
    }

    /// The enriched recipe set, fetched once per process.
    pub fn cached_recipes(&mut self) -> &[Recipe] {
        if self.recipes.is_none() {
            log::info!("fetching recipes from the recipe database (this may take a moment)");
            let recipes = self
                .recipedb
                .enriched_recipes(self.config.recipe_pages, self.config.recipe_per_page);
            log::info!("cached {} recipes", recipes.len());
            self.recipes = Some(recipes);
        }
        self.recipes.as_deref().unwrap_or_default()
    }

    /// Recipe vectors, precomputed once. Only non-zero vectors are kept.
    pub fn recipe_vectors(&mut self) -> &[RecipeVector] {
        if self.vectors.is_some() {
            return self.vectors.as_deref().unwrap_or_default();
        }

        self.cached_recipes();
        let recipes = self.recipes.clone().unwrap_or_default();
        log::info!("precomputing vectors for {} recipes", recipes.len());

        let mut vectors = Vec::new();
        let mut zero_vector_count = 0;
        let mut no_ingredients_count = 0;

        for (i, recipe) in recipes.iter().enumerate() {
            let vector =
                vectorize::build_recipe_vector(recipe, |term| self.flavordb.compounds_cached(term));

            if recipe.ingredients.is_empty() {
                no_ingredients_count += 1;
            } else if vector.is_zero() {
                zero_vector_count += 1;
            }

            if let Some(entry) = RecipeVector::new(recipe.clone(), vector) {
                vectors.push(entry);
            }

            if (i + 1) % VECTOR_PROGRESS_EVERY == 0 {
                log::info!(
                    "processed {}/{} recipes, {} with valid vectors",
                    i + 1,
                    recipes.len(),
                    vectors.len()
                );
            }
        }

        log::info!(
            "vector summary: total={} no_ingredients={} zero_vector={} valid={}",
            recipes.len(),
            no_ingredients_count,
            zero_vector_count,
            vectors.len()
        );

        self.vectors = Some(vectors);
        self.vectors.as_deref().unwrap_or_default()
    }

    /// Handle a recommendation request end to end.
    ///
    /// Taste inputs are looked up uncached (user terms rarely repeat);
    /// recipe vectorization underneath goes through the term cache.
    pub fn recommend(&mut self, request: RecommendRequest) -> RecommendOutcome {
        let mut input_vectors = Vec::new();
        for taste_input in &request.taste_inputs {
            let compounds = self.flavordb.compounds(taste_input);
            log::info!(
                "input '{taste_input}': {} compounds from the flavor database",
                compounds.len()
            );
            let vector = taste::build_vector(&compounds);
            if !vector.is_zero() {
                input_vectors.push(vector);
            }
        }

        let index = self.recipe_vectors();
        engine::recommend(request, &input_vectors, index)
    }

    pub fn cache_status(&self) -> CacheStatus {
        let vector_count = self.vectors.as_ref().map(Vec::len).unwrap_or(0);
        let sample_recipes = self
            .vectors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .take(5)
            .map(|v| truncate(&v.recipe.title, 30))
            .collect();

        CacheStatus {
            cached: self.recipes.is_some(),
            recipe_count: self.recipes.as_ref().map(Vec::len).unwrap_or(0),
            vectors_computed: self.vectors.is_some(),
            vector_count,
            flavor_cache_size: self.flavordb.cache_len(),
            sample_recipes,
        }
    }

    pub fn debug_recipes(&self) -> DebugRecipes {
        let recipes = self.recipes.as_deref().unwrap_or_default();
        let sample = recipes
            .iter()
            .take(10)
            .map(|r| RecipeSample {
                title: truncate(&r.title, 40),
                region: r.region.clone(),
                ingredients: r.ingredients.iter().take(5).cloned().collect(),
                ingredient_count: r.ingredients.len(),
            })
            .collect();

        DebugRecipes {
            total_recipes: recipes.len(),
            sample,
        }
    }

    /// Drop everything: recipes, vectors and the flavor term cache.
    pub fn clear_caches(&mut self) {
        self.recipes = None;
        self.vectors = None;
        self.flavordb.clear_cache();
        log::info!("caches cleared");
    }

    #[cfg(test)]
    pub fn seed(&mut self, recipes: Vec<Recipe>, vectors: Vec<RecipeVector>) {
        self.recipes = Some(recipes);
        self.vectors = Some(vectors);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
