use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipefind_core::diet::{filter_results, parse_restriction};
use recipefind_core::links::{video_search_link, web_search_link};
use recipefind_core::loader::prepare_sample;
use recipefind_core::normalize::split_ingredients;
use recipefind_core::page::{Page, DEFAULT_PER_PAGE};
use recipefind_core::{Directions, ScoredRecipe, SearchEngine};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recipefind")]
#[command(about = "Find recipes by the ingredients you have", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank recipes against a list of ingredients
    Search {
        /// Corpus file (csv, json, jsonl) or directory
        #[arg(long)]
        corpus: String,
        /// Ingredients, as separate arguments or comma-separated
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Keep only the first N ranked recipes
        #[arg(long)]
        top_k: Option<usize>,
        /// Dietary restriction: vegetarian, hindu, gluten-free, dairy-free
        #[arg(long, default_value = "none")]
        diet: String,
        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Recipes per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: usize,
        /// Print the page as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print corpus statistics used for ranking
    Stats {
        #[arg(long)]
        corpus: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the first N records of a JSON Lines dump as a JSON array
    Sample {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
        #[arg(long, default_value_t = 100)]
        size: usize,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: Vec<String>,
    page: Page,
    results: &'a [ScoredRecipe<'a>],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, ingredients, top_k, diet, page, per_page, json } => {
            let query: Vec<String> =
                ingredients.iter().flat_map(|s| split_ingredients(s)).collect();
            let restriction = parse_restriction(&diet)?;
            let engine = load_engine(&corpus)?;

            let results = filter_results(engine.search(&query, top_k), restriction);
            let page = Page::new(results.len(), per_page, page);
            let shown = page.slice(&results);
            if json {
                let out = SearchOutput { query, page, results: shown };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_results(&page, shown);
            }
            Ok(())
        }
        Commands::Stats { corpus, json } => {
            let engine = load_engine(&corpus)?;
            let stats = engine.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(stats)?);
            } else {
                println!("recipes: {}", stats.num_recipes);
                println!("avgdl:   {:.4}", stats.avgdl);
                for (key, s) in stats.ingredients.iter() {
                    println!("{key:<10} df={:<8} idf={:.4}", s.document_frequency, s.idf);
                }
            }
            Ok(())
        }
        Commands::Sample { input, output, size } => {
            let written = prepare_sample(&input, &output, size)
                .with_context(|| format!("sampling {input}"))?;
            tracing::info!(written, output = %output, "sample written");
            Ok(())
        }
    }
}

fn load_engine(corpus: &str) -> Result<SearchEngine> {
    SearchEngine::load(corpus).with_context(|| format!("loading corpus from {corpus}"))
}

fn print_results(page: &Page, hits: &[ScoredRecipe<'_>]) {
    println!("Found {} recipes", page.total_results);
    if hits.is_empty() {
        return;
    }
    println!("Showing recipes {} to {} of {}", page.start + 1, page.end, page.total_results);
    for hit in hits {
        let recipe = hit.recipe;
        println!();
        println!("{} (score {:.2})", recipe.title, hit.score);
        println!("  Matching ingredients: {}", hit.matching_count);
        println!("  Search: {}", web_search_link(&recipe.title));
        println!("  Video:  {}", video_search_link(&recipe.title));
        println!("  Ingredients:");
        for ing in &recipe.ingredients {
            println!("    - {ing}");
        }
        println!("  Directions:");
        match &recipe.directions {
            Directions::Steps(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    println!("    {}. {step}", i + 1);
                }
            }
            Directions::Unparsed(_) => {
                println!("    Directions not available in the correct format.")
            }
        }
    }
    if page.has_next() {
        println!();
        println!(
            "Page {} of {}; use --page {} for more",
            page.number,
            page.total_pages,
            page.number + 1
        );
    }
}
