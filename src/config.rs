use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::block::BlockType;
use crate::error::Result;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub entities: EntitiesConfig,
    pub blocks: BlocksConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write a blank line between consecutive blocks.
    pub blank_line_between_blocks: bool,
    /// Marker written in place of each leading or trailing space of a block.
    pub nbsp: String,
    /// Spaces of indentation per list nesting level.
    pub list_indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            blank_line_between_blocks: false,
            nbsp: "&nbsp;".to_string(),
            list_indent: 4,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntitiesConfig {
    /// Drop the last character of a plain section that runs into an entity.
    /// Matches the output of existing Draft.js Markdown exporters.
    pub trim_gap_before_entity: bool,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            trim_gap_before_entity: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BlocksConfig {
    /// Markdown prefix overrides keyed by Draft.js block type name.
    pub prefixes: HashMap<String, String>,
}

impl BlocksConfig {
    /// Prefix for a block type, preferring a configured override.
    pub fn prefix_for<'a>(&'a self, block_type: &BlockType) -> &'a str {
        self.prefixes
            .get(block_type.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| block_type.markdown_prefix())
    }
}

impl Config {
    /// Config bundled with the crate. `build.rs` checks that it parses.
    pub fn compiled_default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, failing if it is missing or invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}
