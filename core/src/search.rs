//! Query scoring and ranking.
//!
//! Each recipe is scored with BM25 where a query term "occurs" in an
//! ingredient line when it is a substring of it. Ranking puts recipes that
//! match more query terms first and uses the BM25 score within a tier.

use std::cmp::Ordering;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{BM25_B, BM25_K1, DEFAULT_IDF};
use crate::errors::Result;
use crate::loader::load_corpus;
use crate::normalize::normalize_terms;
use crate::recipe::Recipe;
use crate::stats::CorpusStats;
use crate::DocId;

/// One ranked hit. Borrows the recipe from the engine that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe<'a> {
    pub doc_id: DocId,
    #[serde(flatten)]
    pub recipe: &'a Recipe,
    pub score: f64,
    /// Query terms contained in at least one ingredient line.
    #[serde(rename = "matching_ingredients")]
    pub matching_count: usize,
}

/// Read-only search engine over an in-memory corpus.
///
/// Statistics are computed once in [`SearchEngine::new`]; afterwards the
/// engine can be shared across threads and queried concurrently.
#[derive(Debug)]
pub struct SearchEngine {
    recipes: Vec<Recipe>,
    stats: CorpusStats,
}

impl SearchEngine {
    /// Builds corpus statistics eagerly. Recipes past `DocId::MAX` are never
    /// returned by [`SearchEngine::search`]; [`load_corpus`] rejects such corpora.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let stats = CorpusStats::build(&recipes);
        Self { recipes, stats }
    }

    /// Load a corpus file or directory and build the engine.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let recipes = load_corpus(path)?;
        Ok(Self::new(recipes))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, doc_id: DocId) -> Option<&Recipe> {
        self.recipes.get(doc_id as usize)
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Rank recipes against a list of ingredient names.
    ///
    /// Terms are lowercased and trimmed; blank terms are ignored. A recipe is
    /// returned when any term occurs in its joined ingredient text. Results are
    /// ordered by matching term count, then score, then corpus position.
    pub fn search<S: AsRef<str>>(
        &self,
        query: &[S],
        top_k: Option<usize>,
    ) -> Vec<ScoredRecipe<'_>> {
        let terms = normalize_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredRecipe<'_>> = self
            .recipes
            .par_iter()
            .enumerate()
            .filter_map(|(idx, recipe)| {
                let doc_id = DocId::try_from(idx).ok()?;
                self.score_recipe(doc_id, recipe, &terms)
            })
            .collect();

        scored.sort_by(rank_order);
        if let Some(k) = top_k {
            scored.truncate(k);
        }
        tracing::debug!(total_recipes = self.recipes.len(), hits = scored.len(), "search complete");
        scored
    }

    /// IDF for a normalized query term: the precomputed value for vocabulary
    /// keys, [`DEFAULT_IDF`] otherwise. A stored 0.0 also maps to the default.
    pub fn idf(&self, term: &str) -> f64 {
        match self.stats.ingredients.idf(term) {
            Some(idf) if idf != 0.0 => idf,
            _ => DEFAULT_IDF,
        }
    }

    fn score_recipe<'a>(
        &self,
        doc_id: DocId,
        recipe: &'a Recipe,
        terms: &[String],
    ) -> Option<ScoredRecipe<'a>> {
        if !terms.iter().any(|t| recipe.mentions(t)) {
            return None;
        }

        let doc_length = recipe.doc_length() as f64;
        let mut score = 0.0;
        let mut matching_count = 0;
        for term in terms {
            let per_line = recipe
                .ingredients
                .iter()
                .filter(|ing| ing.contains(term.as_str()))
                .count();
            if per_line > 0 {
                matching_count += 1;
            }
            let tf = term_frequency(per_line, recipe.mentions(term));
            if tf > 0.0 {
                score += bm25_term(self.idf(term), tf, doc_length, self.stats.avgdl);
            }
        }

        Some(ScoredRecipe { doc_id, recipe, score, matching_count })
    }
}

/// Lines containing the term, or 1 when the only occurrence spans the space
/// between two joined lines.
// Only reachable for terms that contain whitespace.
fn term_frequency(per_line: usize, in_joined_text: bool) -> f64 {
    if per_line == 0 && in_joined_text {
        1.0
    } else {
        per_line as f64
    }
}

fn bm25_term(idf: f64, tf: f64, doc_length: f64, avgdl: f64) -> f64 {
    let length_ratio = if avgdl > 0.0 { doc_length / avgdl } else { 0.0 };
    let numerator = tf * (BM25_K1 + 1.0);
    let denominator = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * length_ratio);
    idf * numerator / denominator
}

fn rank_order(a: &ScoredRecipe<'_>, b: &ScoredRecipe<'_>) -> Ordering {
    b.matching_count
        .cmp(&a.matching_count)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Directions;

    fn engine(corpus: &[&[&str]]) -> SearchEngine {
        let recipes = corpus
            .iter()
            .enumerate()
            .map(|(i, ings)| {
                let ingredients = ings.iter().map(|s| s.to_string()).collect();
                Recipe::new(format!("R{}", i + 1), ingredients, Directions::default(), "", "")
            })
            .collect();
        SearchEngine::new(recipes)
    }

    #[test]
    fn tf_counts_matching_lines() {
        let e = engine(&[&["chicken breast", "chicken stock", "salt"]]);
        let hits = e.search(&["chicken"], None);
        assert_eq!(hits.len(), 1);
        // tf = 2, dl = avgdl = 3, idf(df=1, N=1) = ln(0.5/1.5 + 1)
        let idf = (0.5f64 / 1.5 + 1.0).ln();
        let expected = idf * 2.0 * 2.5 / (2.0 + 1.5);
        assert!((hits[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn unknown_terms_use_default_idf() {
        let e = engine(&[&["salt"]]);
        assert_eq!(e.idf("salt"), DEFAULT_IDF);
        let hits = e.search(&["Salt "], None);
        assert!((hits[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn boundary_match_forces_tf_of_one() {
        let e = engine(&[&["chicken", "garlic"]]);
        let hits = e.search(&["n g"], None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matching_count, 0);
        assert!(hits[0].score > 0.0);
        assert_eq!(term_frequency(0, true), 1.0);
        assert_eq!(term_frequency(0, false), 0.0);
        assert_eq!(term_frequency(3, true), 3.0);
    }

    #[test]
    fn zero_avgdl_does_not_divide() {
        let s = bm25_term(1.0, 1.0, 0.0, 0.0);
        assert!(s.is_finite());
    }

    #[test]
    fn ties_keep_corpus_order() {
        let e = engine(&[&["rice"], &["rice"], &["rice"]]);
        let ids: Vec<DocId> = e.search(&["rice"], None).iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
