//! Corpus statistics for BM25: per-ingredient document frequency and IDF over
//! the [`COMMON_INGREDIENTS`] vocabulary, plus the average ingredient-list
//! length.
//!
//! Document frequency uses substring containment against each recipe's joined
//! ingredient text, so `"rice"` counts a recipe listing `"brown rice"` and a
//! key is counted at most once per recipe.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::COMMON_INGREDIENTS;
use crate::recipe::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IngredientStat {
    pub document_frequency: u32,
    pub idf: f64,
}

/// Precomputed entries for vocabulary keys that occur in at least one recipe.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngredientStats {
    entries: BTreeMap<&'static str, IngredientStat>,
}

impl IngredientStats {
    pub fn build(recipes: &[Recipe]) -> Self {
        let n = recipes.len() as u32;
        let mut doc_counts: BTreeMap<&'static str, u32> = BTreeMap::new();
        for recipe in recipes {
            for &key in COMMON_INGREDIENTS {
                if recipe.mentions(key) {
                    *doc_counts.entry(key).or_insert(0) += 1;
                }
            }
        }
        let entries = doc_counts
            .into_iter()
            .map(|(key, df)| (key, IngredientStat { document_frequency: df, idf: bm25_idf(n, df) }))
            .collect();
        Self { entries }
    }

    pub fn get(&self, term: &str) -> Option<&IngredientStat> {
        self.entries.get(term)
    }

    /// Precomputed IDF, if `term` is a vocabulary key seen in the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.get(term).map(|s| s.idf)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.get(term).map_or(0, |s| s.document_frequency)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &IngredientStat)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Smoothed BM25 IDF: `ln((N - df + 0.5) / (df + 0.5) + 1)`.
pub fn bm25_idf(num_docs: u32, df: u32) -> f64 {
    let n = num_docs as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Everything the scorer needs besides the recipes themselves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusStats {
    pub num_recipes: usize,
    /// Mean ingredient count per recipe; 0.0 for an empty corpus.
    pub avgdl: f64,
    pub ingredients: IngredientStats,
}

impl CorpusStats {
    pub fn build(recipes: &[Recipe]) -> Self {
        let num_recipes = recipes.len();
        let total_length: usize = recipes.iter().map(Recipe::doc_length).sum();
        let avgdl = if num_recipes == 0 { 0.0 } else { total_length as f64 / num_recipes as f64 };
        let ingredients = IngredientStats::build(recipes);
        let vocabulary_hits = ingredients.len();
        tracing::info!(num_recipes, avgdl, vocabulary_hits, "corpus statistics built");
        Self { num_recipes, avgdl, ingredients }
    }
}
