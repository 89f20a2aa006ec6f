//! Validation for hero tuning and the slash library.

use super::registry::SlashLibrary;
use crate::hero::combat::{ParryDirection, SlashKind};
use crate::hero::tuning::HeroTuning;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub problem: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}': {}", self.source_type, self.source_id, self.problem)
    }
}

/// Slashes the controller can ask for.
pub fn required_slashes() -> Vec<SlashKind> {
    let mut kinds = vec![
        SlashKind::Slash,
        SlashKind::AltSlash,
        SlashKind::UpSlash,
        SlashKind::DownSlash,
        SlashKind::WallSlash,
    ];
    kinds.extend(ParryDirection::ALL.into_iter().map(SlashKind::Thrust));
    kinds
}

/// Validate tuning ranges and slash coverage.
/// Returns a list of validation errors, empty if the content is usable as is.
pub fn validate_content(tuning: &HeroTuning, slashes: &SlashLibrary) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = tuning
        .validate()
        .into_iter()
        .map(|problem| ValidationError {
            source_type: "HeroTuning",
            source_id: "hero_tuning".to_string(),
            problem,
        })
        .collect();

    for kind in required_slashes() {
        if slashes.get(kind).is_none() {
            errors.push(ValidationError {
                source_type: "Slash",
                source_id: format!("{:?}", kind),
                problem: "not configured; attacks using it will be skipped".to_string(),
            });
        }
    }

    for (kind, def) in &slashes.slashes {
        if def.length <= 0.0 || def.width <= 0.0 {
            errors.push(ValidationError {
                source_type: "Slash",
                source_id: format!("{:?}", kind),
                problem: format!("hitbox size must be positive, got {}x{}", def.length, def.width),
            });
        }
        if def.lifetime <= 0.0 {
            errors.push(ValidationError {
                source_type: "Slash",
                source_id: format!("{:?}", kind),
                problem: format!("lifetime must be positive, got {}", def.lifetime),
            });
        }
    }

    errors
}
