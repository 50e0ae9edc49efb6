use tracing::debug;

use crate::block::Document;
use crate::error::Result;

/// Strip a UTF-8 byte order mark, which some editors write before the JSON
fn strip_bom(json: &str) -> &str {
    json.strip_prefix('\u{feff}').unwrap_or(json)
}

/// Parse Draft.js raw content JSON into a document.
///
/// Draft.js measures range offsets in UTF-16 code units; they are converted
/// to `char` indices here so the rest of the crate can index by character.
pub fn parse(json: &str) -> Result<Document> {
    let mut document: Document = serde_json::from_str(strip_bom(json))?;
    for block in &mut document.blocks {
        block.utf16_offsets_to_chars();
    }
    debug!(
        blocks = document.blocks.len(),
        entities = document.entity_map.len(),
        "parsed document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockType, EntityKey, EntityKind, InlineStyle, PropertyStyle, ToggleStyle};

    const RAW: &str = r#"{
        "blocks": [
            {
                "key": "9gm3s",
                "text": "Hello world",
                "type": "header-two",
                "depth": 0,
                "inlineStyleRanges": [
                    { "offset": 0, "length": 5, "style": "BOLD" },
                    { "offset": 6, "length": 5, "style": "color-rgb(0,0,0)" },
                    { "offset": 0, "length": 1, "style": "HIGHLIGHT" }
                ],
                "entityRanges": [ { "offset": 6, "length": 5, "key": 0 } ],
                "data": { "text-align": "right", "margin": "0" }
            }
        ],
        "entityMap": {
            "0": { "type": "LINK", "mutability": "MUTABLE", "data": { "url": "https://x.y", "targetOption": "_blank" } }
        }
    }"#;

    #[test]
    fn parses_raw_content() {
        let doc = parse(RAW).unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.key, "9gm3s");
        assert_eq!(block.block_type, BlockType::HeaderTwo);
        assert_eq!(block.inline_style_ranges[0].style, InlineStyle::Toggle(ToggleStyle::Bold));
        assert_eq!(
            block.inline_style_ranges[1].style,
            InlineStyle::Property(PropertyStyle::Color("rgb(0,0,0)".to_string()))
        );
        assert_eq!(
            block.inline_style_ranges[2].style,
            InlineStyle::Unrecognized("HIGHLIGHT".to_string())
        );
        assert_eq!(block.entity_ranges[0].key, EntityKey::from(0u64));

        let keys: Vec<_> = block.data.keys().cloned().collect();
        assert_eq!(keys, vec!["text-align", "margin"]);

        let entity = &doc.entity_map[&EntityKey::from("0")];
        assert_eq!(entity.kind, EntityKind::Link);
        assert_eq!(entity.data.url.as_deref(), Some("https://x.y"));
        assert!(entity.data.extra.contains_key("targetOption"));
    }

    #[test]
    fn missing_fields_default() {
        let doc = parse(r#"{ "blocks": [ { "text": "x" } ] }"#).unwrap();
        assert_eq!(doc.blocks[0].block_type, BlockType::Unstyled);
        assert!(doc.entity_map.is_empty());
        assert!(parse("{}").unwrap().blocks.is_empty());
    }

    #[test]
    fn unknown_block_type_is_kept() {
        let doc = parse(r#"{ "blocks": [ { "type": "code-block", "text": "" } ] }"#).unwrap();
        assert_eq!(doc.blocks[0].block_type, BlockType::Other("code-block".to_string()));
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        assert!(parse("\u{feff}{\"blocks\": []}").is_ok());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse("{ \"blocks\": [").is_err());
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let json = r#"{ "blocks": [ {
            "text": "😀 bold",
            "inlineStyleRanges": [ { "offset": 3, "length": 4, "style": "BOLD" } ]
        } ] }"#;
        assert_eq!(crate::json_to_markdown(json).unwrap(), "😀 **bold**\n");
    }

    #[test]
    fn offsets_inside_a_surrogate_pair_or_past_the_end() {
        let json = r#"{ "blocks": [ {
            "text": "a😀b",
            "inlineStyleRanges": [
                { "offset": 2, "length": 2, "style": "CODE" },
                { "offset": 10, "length": 5, "style": "BOLD" }
            ]
        } ] }"#;
        let doc = parse(json).unwrap();
        let ranges = &doc.blocks[0].inline_style_ranges;
        assert_eq!((ranges[0].offset, ranges[0].length), (1, 2));
        assert_eq!((ranges[1].offset, ranges[1].length), (3, 0));
    }

    const FULL: &str = r#"{
        "blocks": [
            {
                "key": "a1",
                "text": "Café ☕ menu",
                "type": "header-one",
                "depth": 0,
                "inlineStyleRanges": [ { "offset": 7, "length": 4, "style": "ITALIC" } ],
                "entityRanges": [],
                "data": {}
            },
            {
                "key": "b2",
                "text": "🎉 see docs",
                "type": "unstyled",
                "depth": 0,
                "inlineStyleRanges": [ { "offset": 3, "length": 3, "style": "BOLD" } ],
                "entityRanges": [ { "offset": 7, "length": 4, "key": 0 } ],
                "data": {}
            },
            {
                "key": "c3",
                "text": "𝒳 item",
                "type": "unordered-list-item",
                "depth": 1,
                "inlineStyleRanges": [],
                "entityRanges": [],
                "data": { "text-align": "left" }
            }
        ],
        "entityMap": {
            "0": { "type": "LINK", "mutability": "MUTABLE", "data": { "url": "https://d.io" } }
        }
    }"#;

    #[test]
    fn raw_document_to_markdown() {
        assert_eq!(
            crate::json_to_markdown(FULL).unwrap(),
            "# Café ☕ *menu*\n\
             🎉 **see**[docs](https://d.io)\n    \
             - <span style=\"text-align:left;\">𝒳 item</span>\n"
        );
    }

    #[test]
    fn raw_document_to_markdown_with_exact_gaps() {
        let mut config = crate::Config::default();
        config.entities.trim_gap_before_entity = false;
        let markdown = crate::json_to_markdown_with_config(FULL, &config).unwrap();
        assert!(markdown.contains("🎉 **see** [docs](https://d.io)\n"));
    }
}
