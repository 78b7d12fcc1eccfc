//! Load and save options

use serde::{Deserialize, Serialize};
use ue_texture_core::EngineVersion;

/// Options for reading platform data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Engine version the asset was cooked with
    pub version: EngineVersion,
    /// Light map textures carry an extra flags field
    pub is_light_map: bool,
}

impl LoadOptions {
    /// Options for a regular texture of the given version
    pub fn new(version: EngineVersion) -> Self {
        Self {
            version,
            is_light_map: false,
        }
    }

    /// Set the light map switch
    pub fn with_light_map(mut self, is_light_map: bool) -> Self {
        self.is_light_map = is_light_map;
        self
    }
}

/// Options for writing platform data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Keep the declared original size instead of the largest mip's size
    pub preserve_declared_size: bool,
}
