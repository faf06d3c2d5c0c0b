pub mod config;
pub mod diet;
pub mod errors;
pub mod links;
pub mod loader;
pub mod normalize;
pub mod page;
pub mod recipe;
pub mod search;
pub mod stats;

pub use errors::{CorpusError, Result};
pub use recipe::{Directions, Recipe};
pub use search::{ScoredRecipe, SearchEngine};
pub use stats::{CorpusStats, IngredientStat, IngredientStats};

/// Position of a recipe in the loaded corpus.
pub type DocId = u32;
