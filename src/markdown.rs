use pulldown_cmark::{Options, Parser, html};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::block::{Block, Document, Entity, EntityKey};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::inline::{
    entity_markup, escape_text, property_markup, protect_leading_spaces,
    protect_trailing_spaces, toggle_markup,
};
use crate::section::{EntitySection, entity_sections};
use crate::style::{PROPERTY_KEYS, StyleArena, TOGGLE_KEYS, split_runs};

/// Upper bound on the spaces written before a nested list item.
const MAX_LIST_INDENT: usize = 1024;

/// Hook for replacing the markup of individual entities.
///
/// Returning `None` falls back to the built-in rendering.
pub trait EntityTransform {
    fn transform(&self, entity: &Entity, text: &str) -> Option<String>;
}

impl<F> EntityTransform for F
where
    F: Fn(&Entity, &str) -> Option<String>,
{
    fn transform(&self, entity: &Entity, text: &str) -> Option<String> {
        self(entity, text)
    }
}

/// Renders a [`Document`] to Markdown.
pub struct Renderer<'a> {
    document: &'a Document,
    config: &'a Config,
    transform: Option<&'a dyn EntityTransform>,
}

impl<'a> Renderer<'a> {
    pub fn new(document: &'a Document, config: &'a Config) -> Self {
        Self {
            document,
            config,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: &'a dyn EntityTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Convert every block, in document order.
    pub fn render(&self) -> Result<String> {
        debug!(blocks = self.document.blocks.len(), "converting document");
        let mut out = String::new();
        for (i, block) in self.document.blocks.iter().enumerate() {
            if i > 0 && self.config.output.blank_line_between_blocks {
                out.push('\n');
            }
            self.emit_block(block, &mut out)?;
        }
        Ok(out)
    }

    fn emit_block(&self, block: &Block, out: &mut String) -> Result<()> {
        debug!(key = %block.key, block_type = block.block_type.as_str(), "rendering block");

        // Atomic blocks are only their entity, with no prefix or line ending.
        if block.is_atomic() {
            if let Some(range) = block.entity_ranges.first() {
                out.push_str(&self.entity_text(block, &range.key, "")?);
            }
            return Ok(());
        }

        if block.block_type.is_list() {
            let indent = block
                .depth
                .saturating_mul(self.config.output.list_indent)
                .min(MAX_LIST_INDENT);
            out.push_str(&" ".repeat(indent));
        }
        out.push_str(self.config.blocks.prefix_for(&block.block_type));

        let content = self.block_content(block)?;
        if block.data.is_empty() {
            out.push_str(&content);
        } else {
            out.push_str(&format!(
                "<span style=\"{}\">{}</span>",
                block_style(&block.data),
                content
            ));
        }

        out.push('\n');
        Ok(())
    }

    fn block_content(&self, block: &Block) -> Result<String> {
        let chars: Vec<char> = block.text.chars().collect();
        let arena = StyleArena::build(block);
        let sections = entity_sections(
            &block.entity_ranges,
            chars.len(),
            self.config.entities.trim_gap_before_entity,
        );

        let nbsp = &self.config.output.nbsp;
        let last = sections.len().saturating_sub(1);
        let mut content = String::new();
        for (i, section) in sections.iter().enumerate() {
            let mut text = self.section_markdown(block, &arena, &chars, section)?;
            if i == 0 {
                text = protect_leading_spaces(&text, nbsp);
            }
            if i == last {
                text = protect_trailing_spaces(&text, nbsp);
            }
            content.push_str(&text);
        }
        Ok(content)
    }

    fn section_markdown(
        &self,
        block: &Block,
        arena: &StyleArena<'_>,
        chars: &[char],
        section: &EntitySection,
    ) -> Result<String> {
        trace!(start = section.start, end = section.end, entity = ?section.entity, "rendering section");

        let mut text = String::new();
        for toggle_run in split_runs(arena, &TOGGLE_KEYS, section.start..section.end) {
            let mut content = String::new();
            for property_run in split_runs(arena, &PROPERTY_KEYS, toggle_run.range()) {
                let escaped = escape_text(&chars[property_run.range()]);
                content.push_str(&property_markup(&property_run.style, escaped));
            }
            text.push_str(&toggle_markup(&toggle_run.style, content));
        }

        match &section.entity {
            Some(key) => self.entity_text(block, key, &text),
            None => Ok(text),
        }
    }

    fn entity_text(&self, block: &Block, key: &EntityKey, text: &str) -> Result<String> {
        let entity = self
            .document
            .entity_map
            .get(key)
            .ok_or_else(|| Error::MissingEntity {
                key: key.clone(),
                block: block.key.clone(),
            })?;

        if let Some(custom) = self.transform.and_then(|t| t.transform(entity, text)) {
            return Ok(custom);
        }
        Ok(entity_markup(entity, text))
    }
}

/// Inline CSS declarations for block-level data, in insertion order.
fn block_style(data: &Map<String, Value>) -> String {
    let mut style = String::new();
    for (property, value) in data {
        match value {
            Value::String(s) => style.push_str(&format!("{}:{};", property, s)),
            other => style.push_str(&format!("{}:{};", property, other)),
        }
    }
    style
}

/// Render Markdown produced by this crate to HTML, for previewing.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use crate::block::{Block, Document, Entity};
    use crate::config::Config;
    use crate::error::Error;
    use crate::{draft_to_markdown, draft_to_markdown_with_config, markdown_to_html};

    use super::Renderer;

    fn render(blocks: Vec<Block>) -> String {
        draft_to_markdown(&Document::new(blocks)).unwrap()
    }

    #[test]
    fn empty_document() {
        assert_eq!(render(vec![]), "");
    }

    #[test]
    fn paragraph() {
        assert_eq!(render(vec![Block::new("unstyled", "Hello world")]), "Hello world\n");
    }

    #[test]
    fn headings() {
        let blocks = vec![
            Block::new("header-one", "One"),
            Block::new("header-three", "Three"),
            Block::new("header-six", "Six"),
        ];
        assert_eq!(render(blocks), "# One\n### Three\n###### Six\n");
    }

    #[test]
    fn lists_and_quotes() {
        let blocks = vec![
            Block::new("unordered-list-item", "a"),
            Block::new("ordered-list-item", "b"),
            Block::new("blockquote", "c"),
        ];
        assert_eq!(render(blocks), "- a\n1. b\n> c\n");
    }

    #[test]
    fn nested_list_item_is_indented() {
        let blocks = vec![Block::new("unordered-list-item", "deep").with_depth(2)];
        assert_eq!(render(blocks), "        - deep\n");
    }

    #[test]
    fn depth_is_ignored_outside_lists() {
        let blocks = vec![Block::new("blockquote", "q").with_depth(3)];
        assert_eq!(render(blocks), "> q\n");
    }

    #[test]
    fn unknown_block_type_renders_as_paragraph() {
        assert_eq!(render(vec![Block::new("code-block", "x < y")]), "x &lt; y\n");
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(render(vec![Block::new("header-two", "a & b")]), "## a &amp; b\n");
        assert_eq!(render(vec![Block::new("unstyled", "one\ntwo")]), "one  \ntwo\n");
    }

    #[test]
    fn overlapping_bold_and_italic() {
        let block = Block::new("unstyled", "abcdefg")
            .with_style("BOLD", 0, 5)
            .with_style("ITALIC", 2, 5);
        assert_eq!(render(vec![block]), "**ab*****cde****fg*\n");
    }

    #[test]
    fn property_inside_toggle() {
        let block = Block::new("unstyled", "ab")
            .with_style("BOLD", 0, 2)
            .with_style("color-red", 1, 1);
        assert_eq!(
            render(vec![block]),
            "**a<span style=\"color: red;\">b</span>**\n"
        );
    }

    #[test]
    fn edge_spaces_become_nbsp() {
        assert_eq!(
            render(vec![Block::new("unstyled", "  mid  ")]),
            "&nbsp;&nbsp;mid&nbsp;&nbsp;\n"
        );
    }

    #[test]
    fn interior_sections_keep_their_spaces() {
        let doc = Document::new(vec![Block::new("unstyled", "x  y  z").with_entity("0", 3, 1)])
            .with_entity("0", Entity::link("u"));
        let mut config = Config::default();
        config.entities.trim_gap_before_entity = false;
        assert_eq!(
            draft_to_markdown_with_config(&doc, &config).unwrap(),
            "x  [y](u)  z\n"
        );
    }

    #[test]
    fn trailing_spaces_after_entity() {
        let doc = Document::new(vec![Block::new("unstyled", "go  ").with_entity("0", 0, 2)])
            .with_entity("0", Entity::link("u"));
        assert_eq!(draft_to_markdown(&doc).unwrap(), "[go](u)&nbsp;&nbsp;\n");
    }

    #[test]
    fn link_drops_character_before_it() {
        let doc = Document::new(vec![Block::new("unstyled", "see link").with_entity("0", 4, 4)])
            .with_entity("0", Entity::link("https://example.com"));
        assert_eq!(
            draft_to_markdown(&doc).unwrap(),
            "see[link](https://example.com)\n"
        );
    }

    #[test]
    fn link_with_exact_gaps() {
        let doc = Document::new(vec![Block::new("unstyled", "see link").with_entity("0", 4, 4)])
            .with_entity("0", Entity::link("https://example.com"));
        let mut config = Config::default();
        config.entities.trim_gap_before_entity = false;
        assert_eq!(
            draft_to_markdown_with_config(&doc, &config).unwrap(),
            "see [link](https://example.com)\n"
        );
    }

    #[test]
    fn styled_link_text() {
        let doc = Document::new(vec![
            Block::new("unstyled", "click here")
                .with_style("BOLD", 0, 5)
                .with_entity("0", 0, 10),
        ])
        .with_entity("0", Entity::mention("/u/1"));
        assert_eq!(draft_to_markdown(&doc).unwrap(), "[**click** here](/u/1)\n");
    }

    #[test]
    fn atomic_image_block() {
        let doc = Document::new(vec![Block::new("unstyled", "").with_entity("0", 0, 0)])
            .with_entity("0", Entity::image("a.png"));
        assert_eq!(draft_to_markdown(&doc).unwrap(), "!(a.png)");
    }

    #[test]
    fn atomic_block_skips_list_indent() {
        let doc = Document::new(vec![
            Block::new("unordered-list-item", "").with_depth(1).with_entity("0", 0, 0),
            Block::new("unstyled", "after"),
        ])
        .with_entity("0", Entity::image("a.png"));
        assert_eq!(draft_to_markdown(&doc).unwrap(), "!(a.png)after\n");
    }

    #[test]
    fn block_data_wraps_content() {
        let block = Block::new("unstyled", "hi")
            .with_data("text-align", "center")
            .with_data("color", "red");
        assert_eq!(
            render(vec![block]),
            "<span style=\"text-align:center;color:red;\">hi</span>\n"
        );
    }

    #[test]
    fn missing_entity_is_an_error() {
        let doc = Document::new(vec![
            Block::new("unstyled", "text").with_key("b1").with_entity("7", 0, 4),
        ]);
        match draft_to_markdown(&doc) {
            Err(Error::MissingEntity { key, block }) => {
                assert_eq!(key.0, "7");
                assert_eq!(block, "b1");
            }
            other => panic!("expected MissingEntity, got {:?}", other),
        }
    }

    #[test]
    fn empty_line_between_blocks() {
        let doc = Document::new(vec![Block::new("unstyled", "a"), Block::new("unstyled", "b")]);
        let mut config = Config::default();
        config.output.blank_line_between_blocks = true;
        assert_eq!(draft_to_markdown_with_config(&doc, &config).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn separator_after_atomic_block() {
        let doc = Document::new(vec![
            Block::new("unstyled", "").with_entity("0", 0, 0),
            Block::new("unstyled", "b"),
        ])
        .with_entity("0", Entity::image("a.png"));
        let mut config = Config::default();
        config.output.blank_line_between_blocks = true;
        assert_eq!(draft_to_markdown_with_config(&doc, &config).unwrap(), "!(a.png)\nb\n");
    }

    #[test]
    fn huge_depth_is_capped() {
        let blocks = vec![Block::new("unordered-list-item", "x").with_depth(usize::MAX)];
        assert_eq!(render(blocks), format!("{}- x\n", " ".repeat(super::MAX_LIST_INDENT)));
    }

    #[test]
    fn custom_list_indent_and_prefix() {
        let doc = Document::new(vec![Block::new("ordered-list-item", "x").with_depth(1)]);
        let mut config = Config::default();
        config.output.list_indent = 2;
        config
            .blocks
            .prefixes
            .insert("ordered-list-item".to_string(), "1) ".to_string());
        assert_eq!(draft_to_markdown_with_config(&doc, &config).unwrap(), "  1) x\n");
    }

    #[test]
    fn entity_transform_overrides_builtin() {
        let doc = Document::new(vec![
            Block::new("unstyled", "pic").with_entity("0", 0, 3),
            Block::new("unstyled", "site").with_entity("1", 0, 4),
        ])
        .with_entity("0", Entity::image("a.png"))
        .with_entity("1", Entity::link("https://a.b"));
        let config = Config::default();
        let transform = |entity: &Entity, text: &str| {
            entity
                .data
                .src
                .as_ref()
                .map(|src| format!("![{}]({})", text, src))
        };
        let markdown = Renderer::new(&doc, &config)
            .with_transform(&transform)
            .render()
            .unwrap();
        assert_eq!(markdown, "![pic](a.png)\n[site](https://a.b)\n");
    }

    #[test]
    fn html_preview() {
        assert_eq!(
            markdown_to_html("**bold** ~~gone~~\n"),
            "<p><strong>bold</strong> <del>gone</del></p>\n"
        );
    }
}
