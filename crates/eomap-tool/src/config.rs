use std::path::Path;

use eomap_core::{MapEffect, MapType};
use eomap_map::Map;
use serde::Deserialize;

use crate::error::ToolError;

/// Settings read from the `--config` RON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub new_map: NewMapDefaults,
}

/// Header values given to maps created with `emf-tool new`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewMapDefaults {
    pub name: String,
    pub map_type: MapType,
    pub effect: MapEffect,
    pub music: u8,
    pub music_extra: u8,
    pub ambient_noise: u16,
    pub fill_tile: u16,
    pub map_available: u8,
    pub can_scroll: u8,
    pub relog_x: u8,
    pub relog_y: u8,
}

impl Default for NewMapDefaults {
    fn default() -> Self {
        Self {
            name: String::new(),
            map_type: MapType::Default,
            effect: MapEffect::None,
            music: 0,
            music_extra: 0,
            ambient_noise: 0,
            fill_tile: 0,
            map_available: 1,
            can_scroll: 1,
            relog_x: 0,
            relog_y: 0,
        }
    }
}

impl NewMapDefaults {
    /// Copy these values into a map's header.
    pub fn apply(&self, map: &mut Map) {
        map.name = self.name.clone();
        map.map_type = self.map_type;
        map.effect = self.effect;
        map.music = self.music;
        map.music_extra = self.music_extra;
        map.ambient_noise = self.ambient_noise;
        map.fill_tile = self.fill_tile;
        map.map_available = self.map_available;
        map.can_scroll = self.can_scroll;
        map.relog_x = self.relog_x;
        map.relog_y = self.relog_y;
    }
}

/// Parse a config from a RON string.
pub fn parse_config(ron_str: &str) -> Result<ToolConfig, ToolError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| ToolError::Config(e.to_string()))
}

/// Read a config file, or return the defaults when no path was given.
pub fn load_config(path: Option<&Path>) -> Result<ToolConfig, ToolError> {
    let Some(path) = path else {
        return Ok(ToolConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    log::info!("using config {}", path.display());
    parse_config(&contents)
}
