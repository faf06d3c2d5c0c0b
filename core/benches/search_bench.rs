use criterion::{criterion_group, criterion_main, Criterion};
use recipefind_core::{Directions, Recipe, SearchEngine};

const PANTRY: &[&str] = &[
    "chicken breast", "garlic", "onion", "olive oil", "salt", "pepper", "rice", "tomato paste",
    "beef broth", "mushroom", "butter", "potato", "pork loin", "fish sauce", "flour", "milk",
];

fn corpus(n: usize) -> Vec<Recipe> {
    (0..n)
        .map(|i| {
            let len = 3 + i % 9;
            let ingredients = (0..len)
                .map(|j| PANTRY[(i * 7 + j * 3) % PANTRY.len()].to_string())
                .collect();
            Recipe::new(format!("recipe {i}"), ingredients, Directions::default(), "", "")
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let engine = SearchEngine::new(corpus(20_000));
    c.bench_function("search_chicken_garlic", |b| {
        b.iter(|| engine.search(&["chicken", "garlic"], Some(10)))
    });
    c.bench_function("build_stats_20k", |b| b.iter(|| SearchEngine::new(corpus(20_000))));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
