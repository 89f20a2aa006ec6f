//! Loader for RON content files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::SlashLibrary;
use crate::hero::tuning::HeroTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse a DataFile<T> wrapper from RON text.
pub(crate) fn parse_data_file<T>(file_name: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    Ok(data.items)
}

/// Parse a single RON struct (not wrapped in DataFile).
pub(crate) fn parse_single<T>(file_name: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_data_file(&path.display().to_string(), &contents)
}

fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_single(&path.display().to_string(), &contents)
}

/// Reject tuning that fails its own range checks.
pub(crate) fn checked_tuning(file: &str, tuning: HeroTuning) -> Result<HeroTuning, ContentLoadError> {
    let problems = tuning.validate();
    if problems.is_empty() {
        Ok(tuning)
    } else {
        Err(ContentLoadError {
            file: file.to_string(),
            message: format!("Invalid tuning: {}", problems.join("; ")),
        })
    }
}

/// Everything the hero needs from assets/data.
#[derive(Debug, Clone)]
pub struct HeroContent {
    pub tuning: HeroTuning,
    pub slashes: SlashLibrary,
}

/// Load hero tuning and the slash library from `base_path`.
///
/// A file that fails to load falls back to its built-in defaults; the error
/// is still returned so the caller can report it. Tuning that parses but fails
/// validation counts as a failed load.
pub fn load_hero_content(base_path: &Path) -> (HeroContent, Vec<ContentLoadError>) {
    let mut errors = Vec::new();

    let tuning_path = base_path.join("hero_tuning.ron");
    let loaded = load_single_file::<HeroTuning>(&tuning_path)
        .and_then(|tuning| checked_tuning(&tuning_path.display().to_string(), tuning));
    let tuning = match loaded {
        Ok(tuning) => tuning,
        Err(e) => {
            errors.push(e);
            HeroTuning::default()
        }
    };

    let slashes = match load_data_file::<SlashDef>(&base_path.join("slashes.ron")) {
        Ok(defs) => SlashLibrary::from_defs(defs),
        Err(e) => {
            errors.push(e);
            SlashLibrary::builtin()
        }
    };

    (HeroContent { tuning, slashes }, errors)
}
