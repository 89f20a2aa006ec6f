//! Data definitions for the RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. The SlashLibrary provides lookup by kind.

use serde::{Deserialize, Serialize};

use crate::hero::combat::SlashKind;

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Slashes (slashes.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SlashDef {
    pub kind: SlashKind,
    /// Extent along the strike direction.
    pub length: f32,
    /// Extent across the strike direction.
    pub width: f32,
    /// Distance from the hero's center to the hitbox center.
    pub offset: f32,
    pub lifetime: f32,
    #[serde(default)]
    pub color: Option<(f32, f32, f32)>,
}

impl SlashDef {
    pub fn new(kind: SlashKind, length: f32, width: f32, offset: f32, lifetime: f32) -> Self {
        Self {
            kind,
            length,
            width,
            offset,
            lifetime,
            color: None,
        }
    }
}
