use recipefind_core::loader::load_corpus;
use recipefind_core::{Directions, Recipe, SearchEngine};
use std::fs;
use tempfile::tempdir;

fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
    let ingredients = ingredients.iter().map(|s| s.to_string()).collect();
    Recipe::new(title, ingredients, Directions::default(), "", "")
}

fn three_recipe_engine() -> SearchEngine {
    SearchEngine::new(vec![
        recipe("R1", &["chicken", "garlic"]),
        recipe("R2", &["beef", "onion"]),
        recipe("R3", &["chicken", "mushroom", "garlic"]),
    ])
}

fn assert_ranked(hits: &[recipefind_core::ScoredRecipe<'_>]) {
    for pair in hits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let tied = a.matching_count == b.matching_count;
        assert!(
            a.matching_count > b.matching_count || (tied && a.score >= b.score),
            "{} ranked before {}",
            a.recipe.title,
            b.recipe.title
        );
    }
}

#[test]
fn chicken_garlic_scenario() {
    let engine = three_recipe_engine();
    let hits = engine.search(&["chicken", "garlic"], None);
    let titles: Vec<&str> = hits.iter().map(|h| h.recipe.title.as_str()).collect();
    // Both match two terms; the shorter ingredient list wins on length normalization.
    assert_eq!(titles, vec!["R1", "R3"]);
    assert!(hits.iter().all(|h| h.matching_count == 2));

    let avgdl = 7.0 / 3.0;
    let idf = 1.6f64.ln();
    let term = |dl: f64| idf * 2.5 / (1.0 + 1.5 * (0.25 + 0.75 * dl / avgdl));
    assert!((hits[0].score - 2.0 * term(2.0)).abs() < 1e-9);
    assert!((hits[1].score - 2.0 * term(3.0)).abs() < 1e-9);
}

#[test]
fn empty_query_returns_nothing() {
    let engine = three_recipe_engine();
    let empty: [&str; 0] = [];
    assert!(engine.search(&empty, None).is_empty());
    assert!(engine.search(&["  ", ""], None).is_empty());
    assert!(SearchEngine::new(Vec::new()).search(&["chicken"], None).is_empty());
}

#[test]
fn unmatched_term_returns_nothing() {
    assert!(three_recipe_engine().search(&["zzznotfound"], None).is_empty());
}

#[test]
fn query_terms_are_normalized() {
    let engine = three_recipe_engine();
    let hits = engine.search(&["  CHICKEN "], None);
    assert_eq!(hits.len(), 2);
}

#[test]
fn match_count_outranks_score() {
    let engine = SearchEngine::new(vec![
        recipe("Garlic Bread", &["garlic", "garlic powder", "garlic salt", "bread"]),
        recipe(
            "Chicken Rice",
            &["chicken thighs", "rice", "garlic", "salt", "pepper", "oil", "water", "scallion"],
        ),
    ]);
    let hits = engine.search(&["garlic", "rice"], None);
    assert_eq!(hits[0].recipe.title, "Chicken Rice");
    assert_eq!(hits[0].matching_count, 2);
    assert_eq!(hits[1].matching_count, 1);
    assert_ranked(&hits);
}

#[test]
fn every_hit_matches_and_order_holds() {
    let engine = SearchEngine::new(vec![
        recipe("a", &["tomato", "onion", "garlic"]),
        recipe("b", &["potato", "onion"]),
        recipe("c", &["rice", "fish sauce", "garlic"]),
        recipe("d", &["pork belly", "garlic", "onion", "rice wine"]),
        recipe("e", &["sugar"]),
    ]);
    let queries = [
        vec!["onion"],
        vec!["garlic", "onion"],
        vec!["rice", "pork", "garlic", "tomato"],
    ];
    for query in queries {
        let hits = engine.search(&query, None);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.matching_count >= 1));
        assert!(hits.iter().all(|h| h.recipe.title != "e"));
        assert_ranked(&hits);
    }
}

#[test]
fn top_k_truncates() {
    let engine = three_recipe_engine();
    assert_eq!(engine.search(&["chicken"], Some(1)).len(), 1);
    assert_eq!(engine.search(&["chicken"], Some(10)).len(), 2);
    assert_eq!(engine.search(&["chicken"], Some(0)).len(), 0);
}

#[test]
fn rarer_vocabulary_terms_have_higher_idf() {
    let engine = three_recipe_engine();
    let stats = &engine.stats().ingredients;
    assert_eq!(stats.document_frequency("mushroom"), 1);
    assert_eq!(stats.document_frequency("chicken"), 2);
    assert!(engine.idf("mushroom") > engine.idf("chicken"));
    assert_eq!(engine.idf("saffron"), 1.0);
}

#[test]
fn unparsable_recipe_never_matches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("recipes.csv");
    fs::write(
        &path,
        "title,ingredients,directions,link,source\n\
         Good,\"[\"\"chicken\"\", \"\"garlic\"\"]\",[],,\n\
         Bad,\"[\"\"chicken\"\", garlic\",[],,\n",
    )
    .unwrap();

    let engine = SearchEngine::new(load_corpus(&path).unwrap());
    assert_eq!(engine.len(), 2);
    assert!(engine.recipe(1).unwrap().ingredients.is_empty());
    // The broken row still counts toward N and the average length.
    assert_eq!(engine.stats().num_recipes, 2);
    assert!((engine.stats().avgdl - 1.0).abs() < 1e-12);

    let hits = engine.search(&["chicken", "garlic"], None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].recipe.title, "Good");
}

#[test]
fn results_serialize_with_display_field_names() {
    let engine = three_recipe_engine();
    let hits = engine.search(&["beef"], None);
    let json = serde_json::to_value(&hits[0]).unwrap();
    assert_eq!(json["title"], "R2");
    assert_eq!(json["matching_ingredients"], 1);
    assert_eq!(json["doc_id"], 1);
    assert!(json["score"].as_f64().unwrap() > 0.0);
}
