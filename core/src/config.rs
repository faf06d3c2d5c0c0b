//! Ranking constants.
//!
//! These are fixed at compile time; runtime settings (corpus path, bind
//! address, admin token) live in the binaries' CLI arguments and environment.

/// BM25 term frequency saturation.
pub const BM25_K1: f64 = 1.5;

/// BM25 document length normalization strength.
pub const BM25_B: f64 = 0.75;

/// IDF used for query terms without a precomputed entry.
pub const DEFAULT_IDF: f64 = 1.0;

/// Ingredients that get a precomputed document frequency and IDF.
///
/// Query terms outside this list are still matched and scored, they just
/// fall back to [`DEFAULT_IDF`].
pub const COMMON_INGREDIENTS: &[&str] = &[
    "chicken", "mushroom", "beef", "pork", "fish", "rice", "potato", "tomato", "onion", "garlic",
];
