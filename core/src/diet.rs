//! Dietary-restriction filters applied on top of a ranked result list.
//!
//! Filtering only drops recipes; the relative order of what remains is the
//! ranking produced by the search engine.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::recipe::Recipe;
use crate::search::ScoredRecipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryRestriction {
    Vegetarian,
    Hindu,
    GlutenFree,
    DairyFree,
}

impl DietaryRestriction {
    pub const ALL: [DietaryRestriction; 4] =
        [Self::Vegetarian, Self::Hindu, Self::GlutenFree, Self::DairyFree];

    /// Ingredient keywords a recipe must not mention.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Vegetarian => &[
                "chicken", "beef", "pork", "fish", "meat", "bacon", "ham", "turkey", "lamb",
            ],
            Self::Hindu => &[
                "beef", "veal", "calf", "cow", "cattle", "gelatin", "lard", "tallow", "rennet",
                "pepsin",
            ],
            Self::GlutenFree => &["flour", "bread", "pasta", "wheat", "barley", "rye"],
            Self::DairyFree => &["milk", "cheese", "cream", "butter", "yogurt"],
        }
    }

    pub fn permits(self, recipe: &Recipe) -> bool {
        !self.keywords().iter().any(|k| recipe.mentions(k))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Hindu => "Hindu",
            Self::GlutenFree => "Gluten-Free",
            Self::DairyFree => "Dairy-Free",
        }
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dietary restriction `{0}`")]
pub struct UnknownRestriction(pub String);

/// Parses labels case-insensitively, ignoring `-`, `_` and spaces.
/// `"none"` and the empty string mean no restriction.
pub fn parse_restriction(input: &str) -> Result<Option<DietaryRestriction>, UnknownRestriction> {
    let key: String = input
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "" | "none" => Ok(None),
        "vegetarian" => Ok(Some(DietaryRestriction::Vegetarian)),
        "hindu" => Ok(Some(DietaryRestriction::Hindu)),
        "glutenfree" => Ok(Some(DietaryRestriction::GlutenFree)),
        "dairyfree" => Ok(Some(DietaryRestriction::DairyFree)),
        _ => Err(UnknownRestriction(input.to_string())),
    }
}

impl FromStr for DietaryRestriction {
    type Err = UnknownRestriction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_restriction(s)?.ok_or_else(|| UnknownRestriction(s.to_string()))
    }
}

/// Keep only results the restriction permits. `None` keeps everything.
pub fn filter_results<'a>(
    results: Vec<ScoredRecipe<'a>>,
    restriction: Option<DietaryRestriction>,
) -> Vec<ScoredRecipe<'a>> {
    match restriction {
        None => results,
        Some(r) => results.into_iter().filter(|hit| r.permits(hit.recipe)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Directions;
    use crate::search::SearchEngine;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        let ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        Recipe::new(title, ingredients, Directions::default(), "", "")
    }

    #[test]
    fn parses_labels_loosely() {
        assert_eq!(parse_restriction("Gluten-Free"), Ok(Some(DietaryRestriction::GlutenFree)));
        assert_eq!(parse_restriction("dairy_free"), Ok(Some(DietaryRestriction::DairyFree)));
        assert_eq!(parse_restriction("None"), Ok(None));
        assert!(parse_restriction("paleo").is_err());
        assert!("none".parse::<DietaryRestriction>().is_err());
    }

    #[test]
    fn keyword_match_is_substring() {
        let r = recipe("Sandwich", &["2 slices whole wheat bread", "ham"]);
        assert!(!DietaryRestriction::GlutenFree.permits(&r));
        assert!(!DietaryRestriction::Vegetarian.permits(&r));
        assert!(DietaryRestriction::DairyFree.permits(&r));
    }

    #[test]
    fn filtering_preserves_rank_order() {
        let engine = SearchEngine::new(vec![
            recipe("Beef Stew", &["beef", "onion", "potato"]),
            recipe("Onion Soup", &["onion", "butter"]),
            recipe("Fried Onion", &["onion", "oil"]),
        ]);
        let ranked = engine.search(&["onion"], None);
        let expected: Vec<&str> = ranked
            .iter()
            .filter(|h| h.recipe.title != "Beef Stew")
            .map(|h| h.recipe.title.as_str())
            .collect();

        let kept = filter_results(ranked.clone(), Some(DietaryRestriction::Vegetarian));
        let titles: Vec<&str> = kept.iter().map(|h| h.recipe.title.as_str()).collect();
        assert_eq!(titles, expected);
        assert_eq!(filter_results(ranked, None).len(), 3);
    }
}
