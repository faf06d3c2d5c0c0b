use serde::Serialize;
use serde_json::Value;

use crate::normalize::normalize;

/// Cooking steps as stored with the recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Directions {
    /// A JSON list of step strings.
    Steps(Vec<String>),
    /// Anything else, kept verbatim for display.
    Unparsed(String),
}

impl Directions {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(steps) => Directions::Steps(steps),
            Err(_) => Directions::Unparsed(raw.to_string()),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Directions::Unparsed(String::new()),
            Value::String(s) => Self::parse(s),
            Value::Array(items) => match strings(items) {
                Some(steps) => Directions::Steps(steps),
                None => Directions::Unparsed(value.to_string()),
            },
            other => Directions::Unparsed(other.to_string()),
        }
    }

    pub fn steps(&self) -> Option<&[String]> {
        match self {
            Directions::Steps(steps) => Some(steps),
            Directions::Unparsed(_) => None,
        }
    }
}

impl Default for Directions {
    fn default() -> Self {
        Directions::Unparsed(String::new())
    }
}

/// A single recipe in the corpus. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub title: String,
    /// Lowercased, trimmed ingredient lines in their stored order.
    pub ingredients: Vec<String>,
    pub directions: Directions,
    pub source: String,
    pub link: String,
    #[serde(skip)]
    ingredient_text: String,
}

impl Recipe {
    pub fn new(
        title: impl Into<String>,
        ingredients: Vec<String>,
        directions: Directions,
        source: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let ingredients: Vec<String> = ingredients.iter().map(|i| normalize(i)).collect();
        let ingredient_text = ingredients.join(" ");
        Self {
            title: title.into(),
            ingredients,
            directions,
            source: source.into(),
            link: link.into(),
            ingredient_text,
        }
    }

    /// Number of ingredient lines, the document length for BM25.
    pub fn doc_length(&self) -> usize {
        self.ingredients.len()
    }

    /// All ingredients joined by single spaces.
    pub fn ingredient_text(&self) -> &str {
        &self.ingredient_text
    }

    /// Whether `term` occurs anywhere in the joined ingredient text.
    pub fn mentions(&self, term: &str) -> bool {
        self.ingredient_text.contains(term)
    }
}

/// Parse a stored ingredient list such as `["1 c. rice", "2 eggs"]`.
///
/// Returns `None` unless the input is a JSON array made only of strings.
pub fn parse_ingredients(raw: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw).ok()
}

/// Same as [`parse_ingredients`] for a field that may already be decoded.
pub fn ingredients_from_value(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => parse_ingredients(s),
        Value::Array(items) => strings(items),
        _ => None,
    }
}

fn strings(items: &[Value]) -> Option<Vec<String>> {
    items.iter().map(|v| v.as_str().map(str::to_string)).collect()
}
