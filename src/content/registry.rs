//! SlashLibrary resource providing lookups for the configured slashes.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::SlashDef;
use crate::hero::combat::{ParryDirection, SlashKind};

/// Every slash the hero can activate. Lookups by kind.
#[derive(Resource, Debug, Default, Clone)]
pub struct SlashLibrary {
    pub slashes: HashMap<SlashKind, SlashDef>,
}

impl SlashLibrary {
    pub fn from_defs(defs: impl IntoIterator<Item = SlashDef>) -> Self {
        Self {
            slashes: defs.into_iter().map(|def| (def.kind, def)).collect(),
        }
    }

    /// Library used when slashes.ron cannot be read.
    pub fn builtin() -> Self {
        let mut defs = vec![
            SlashDef::new(SlashKind::Slash, 64.0, 36.0, 40.0, 0.1),
            SlashDef::new(SlashKind::AltSlash, 64.0, 36.0, 40.0, 0.1),
            SlashDef::new(SlashKind::UpSlash, 60.0, 40.0, 40.0, 0.1),
            SlashDef::new(SlashKind::DownSlash, 60.0, 40.0, 40.0, 0.1),
            SlashDef::new(SlashKind::WallSlash, 64.0, 36.0, 40.0, 0.1),
        ];
        defs.extend(
            ParryDirection::ALL
                .into_iter()
                .map(|dir| SlashDef::new(SlashKind::Thrust(dir), 80.0, 40.0, 44.0, 0.2)),
        );
        Self::from_defs(defs)
    }

    pub fn get(&self, kind: SlashKind) -> Option<&SlashDef> {
        self.slashes.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = SlashKind> + '_ {
        self.slashes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.slashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slashes.is_empty()
    }

    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        let thrusts = self
            .kinds()
            .filter(|kind| matches!(kind, SlashKind::Thrust(_)))
            .count();
        format!(
            "SlashLibrary loaded:\n\
             - Slashes: {}\n\
             - Thrust directions: {}",
            self.len() - thrusts,
            thrusts
        )
    }
}
