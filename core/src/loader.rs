//! Corpus loading from CSV, JSON and JSON Lines files.
//!
//! Records are never rejected for bad field contents: an ingredient list that
//! does not decode becomes an empty list and unparsable directions are kept
//! as raw text. Only I/O, file syntax and missing required columns are errors.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::errors::{CorpusError, Result};
use crate::recipe::{ingredients_from_value, parse_ingredients, Directions, Recipe};
use crate::DocId;

#[derive(Debug, Deserialize)]
struct JsonRecipe {
    #[serde(default)]
    title: Value,
    #[serde(default)]
    ingredients: Value,
    #[serde(default)]
    directions: Value,
    #[serde(default)]
    source: Value,
    #[serde(default)]
    link: Value,
}

impl JsonRecipe {
    fn into_recipe(self) -> Recipe {
        let title = text(&self.title);
        let ingredients = ingredients_from_value(&self.ingredients).unwrap_or_else(|| {
            tracing::debug!(title = %title, "unparsable ingredient list, using empty list");
            Vec::new()
        });
        Recipe::new(
            title,
            ingredients,
            Directions::from_value(&self.directions),
            text(&self.source),
            text(&self.link),
        )
    }
}

/// Text field from a JSON record: `null` reads as empty, other non-strings
/// keep their JSON rendering.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Load every recipe under `path`.
///
/// A directory is walked recursively and its `.csv`, `.json` and `.jsonl`
/// files are read in path order.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path) {
            let entry = entry?;
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("csv" | "json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else {
        files.push(path.to_path_buf());
    }

    let mut recipes = Vec::new();
    for file in files {
        let before = recipes.len();
        match extension(&file) {
            Some("csv") => load_csv(&file, &mut recipes)?,
            Some("json") => load_json(&file, &mut recipes)?,
            Some("jsonl") => load_jsonl(&file, &mut recipes)?,
            _ => return Err(CorpusError::UnsupportedFormat(file.clone())),
        }
        let loaded = recipes.len() - before;
        tracing::info!(file = %file.display(), recipes = loaded, "loaded corpus file");
    }
    ensure_addressable(recipes.len())?;
    Ok(recipes)
}

/// Every recipe must fit a [`DocId`].
fn ensure_addressable(count: usize) -> Result<()> {
    if count > DocId::MAX as usize {
        return Err(CorpusError::TooManyRecipes(count));
    }
    Ok(())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn load_csv(file: &Path, out: &mut Vec<Recipe>) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(file)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let title_col = column("title").ok_or(CorpusError::MissingColumn("title"))?;
    let ingredients_col = column("ingredients")
        .ok_or(CorpusError::MissingColumn("ingredients"))?;
    let directions_col = column("directions");
    let source_col = column("source");
    let link_col = column("link");

    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let title = field(Some(title_col));
        let raw_ingredients = field(Some(ingredients_col));
        let ingredients = parse_ingredients(raw_ingredients).unwrap_or_else(|| {
            tracing::debug!(title, "unparsable ingredient list, using empty list");
            Vec::new()
        });
        let directions = match directions_col.and_then(|i| record.get(i)) {
            Some(raw) => Directions::parse(raw),
            None => Directions::default(),
        };
        out.push(Recipe::new(title, ingredients, directions, field(source_col), field(link_col)));
    }
    Ok(())
}

fn load_json(file: &Path, out: &mut Vec<Recipe>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: Value = serde_json::from_reader(reader)?;
    match json {
        Value::Array(items) => {
            for v in items {
                let doc: JsonRecipe = serde_json::from_value(v)?;
                out.push(doc.into_recipe());
            }
        }
        Value::Object(_) => {
            let doc: JsonRecipe = serde_json::from_value(json)?;
            out.push(doc.into_recipe());
        }
        _ => return Err(CorpusError::UnsupportedFormat(file.to_path_buf())),
    }
    Ok(())
}

fn load_jsonl(file: &Path, out: &mut Vec<Recipe>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: JsonRecipe = serde_json::from_str(&line)?;
        out.push(doc.into_recipe());
    }
    Ok(())
}

/// Copy the first `sample_size` records of a JSON Lines dump into a
/// pretty-printed JSON array. Returns how many records were written.
pub fn prepare_sample<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    sample_size: usize,
) -> Result<usize> {
    let reader = BufReader::new(File::open(input.as_ref())?);
    let mut records: Vec<Value> = Vec::with_capacity(sample_size);
    for line in reader.lines().take(sample_size) {
        let line = line?;
        records.push(serde_json::from_str(&line)?);
    }

    if let Some(dir) = output.as_ref().parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let mut writer = BufWriter::new(File::create(output.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;
    Ok(records.len())
}
