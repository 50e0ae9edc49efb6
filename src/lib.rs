mod block;
mod config;
mod error;
mod inline;
mod markdown;
mod parser;
mod section;
mod style;

pub use block::{
    Block, BlockType, Document, Entity, EntityData, EntityKey, EntityKind, EntityRange,
    InlineStyle, InlineStyleRange, PropertyKind, PropertyStyle, ToggleStyle,
};
pub use config::{BlocksConfig, Config, EntitiesConfig, OutputConfig};
pub use error::{Error, Result};
pub use inline::escape_text;
pub use markdown::{EntityTransform, Renderer, markdown_to_html};
pub use section::{EntitySection, entity_sections};
pub use style::{CharStyle, PROPERTY_KEYS, Run, StyleArena, StyleKey, TOGGLE_KEYS, split_runs};

/// Parse Draft.js raw content JSON into a document.
pub fn parse(json: &str) -> Result<Document> {
    parser::parse(json)
}

/// Convert a document to Markdown using default config.
pub fn draft_to_markdown(document: &Document) -> Result<String> {
    draft_to_markdown_with_config(document, &Config::compiled_default())
}

/// Convert a document to Markdown with custom config.
pub fn draft_to_markdown_with_config(document: &Document, config: &Config) -> Result<String> {
    Renderer::new(document, config).render()
}

/// Convert Draft.js raw content JSON to Markdown using default config.
pub fn json_to_markdown(json: &str) -> Result<String> {
    json_to_markdown_with_config(json, &Config::compiled_default())
}

/// Convert Draft.js raw content JSON to Markdown with custom config.
pub fn json_to_markdown_with_config(json: &str, config: &Config) -> Result<String> {
    let document = parse(json)?;
    draft_to_markdown_with_config(&document, config)
}
