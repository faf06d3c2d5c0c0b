//! Error types for corpus loading.
//!
//! Only loading can fail. Malformed fields inside a record degrade to empty
//! values and searching never returns an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported corpus format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("corpus has {0} recipes, more than a DocId can address")]
    TooManyRecipes(usize),

    #[error("corpus is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
