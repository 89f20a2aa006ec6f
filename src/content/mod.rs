//! Content domain: data-driven hero tuning and slash definitions.

mod data;
mod loader;
mod registry;
mod validation;


use bevy::prelude::*;
use std::path::Path;

pub use data::{DataFile, SlashDef};
pub use loader::{ContentLoadError, HeroContent, load_hero_content};
pub use registry::SlashLibrary;
pub use validation::{ValidationError, required_slashes, validate_content};

const DATA_PATH: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_content);
    }
}

fn load_content(mut commands: Commands) {
    let (content, errors) = load_hero_content(Path::new(DATA_PATH));
    for error in &errors {
        error!("{}", error);
    }
    if !errors.is_empty() {
        warn!("Using built-in defaults for content that failed to load");
    }

    // Rejected tuning was already replaced, so only slash gaps remain here
    for problem in validate_content(&content.tuning, &content.slashes) {
        warn!("Content validation: {}", problem);
    }

    info!("{}", content.slashes.summary());
    commands.insert_resource(content.tuning);
    commands.insert_resource(content.slashes);
}
