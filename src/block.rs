use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Boolean inline styles, in the order they are nested when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Superscript,
    Subscript,
}

impl ToggleStyle {
    pub const ALL: [ToggleStyle; 7] = [
        ToggleStyle::Bold,
        ToggleStyle::Italic,
        ToggleStyle::Underline,
        ToggleStyle::Strikethrough,
        ToggleStyle::Code,
        ToggleStyle::Superscript,
        ToggleStyle::Subscript,
    ];

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BOLD" => Some(ToggleStyle::Bold),
            "ITALIC" => Some(ToggleStyle::Italic),
            "UNDERLINE" => Some(ToggleStyle::Underline),
            "STRIKETHROUGH" => Some(ToggleStyle::Strikethrough),
            "CODE" => Some(ToggleStyle::Code),
            "SUPERSCRIPT" => Some(ToggleStyle::Superscript),
            "SUBSCRIPT" => Some(ToggleStyle::Subscript),
            _ => None,
        }
    }

    /// Position of this style in [`ToggleStyle::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The four kinds of valued inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Color,
    BgColor,
    FontSize,
    FontFamily,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 4] = [
        PropertyKind::Color,
        PropertyKind::BgColor,
        PropertyKind::FontSize,
        PropertyKind::FontFamily,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A valued inline style such as `color-red` or `fontsize-12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyStyle {
    Color(String),
    BgColor(String),
    FontSize(String),
    FontFamily(String),
}

impl PropertyStyle {
    fn from_tag(tag: &str) -> Option<Self> {
        // `bgcolor-` never matches `color-`, so the order of these checks is free
        if let Some(value) = tag.strip_prefix("color-") {
            Some(PropertyStyle::Color(value.to_string()))
        } else if let Some(value) = tag.strip_prefix("bgcolor-") {
            Some(PropertyStyle::BgColor(value.to_string()))
        } else if let Some(value) = tag.strip_prefix("fontsize-") {
            Some(PropertyStyle::FontSize(value.to_string()))
        } else {
            tag.strip_prefix("fontfamily-")
                .map(|value| PropertyStyle::FontFamily(value.to_string()))
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyStyle::Color(_) => PropertyKind::Color,
            PropertyStyle::BgColor(_) => PropertyKind::BgColor,
            PropertyStyle::FontSize(_) => PropertyKind::FontSize,
            PropertyStyle::FontFamily(_) => PropertyKind::FontFamily,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PropertyStyle::Color(v)
            | PropertyStyle::BgColor(v)
            | PropertyStyle::FontSize(v)
            | PropertyStyle::FontFamily(v) => v,
        }
    }
}

/// An inline style tag, classified once when the document is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum InlineStyle {
    Toggle(ToggleStyle),
    Property(PropertyStyle),
    /// A tag this converter does not know. Kept for inspection, never rendered.
    Unrecognized(String),
}

impl From<String> for InlineStyle {
    fn from(tag: String) -> Self {
        if let Some(toggle) = ToggleStyle::from_tag(&tag) {
            InlineStyle::Toggle(toggle)
        } else if let Some(property) = PropertyStyle::from_tag(&tag) {
            InlineStyle::Property(property)
        } else {
            InlineStyle::Unrecognized(tag)
        }
    }
}

impl From<&str> for InlineStyle {
    fn from(tag: &str) -> Self {
        InlineStyle::from(tag.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InlineStyleRange {
    pub style: InlineStyle,
    pub offset: usize,
    pub length: usize,
}

/// Key of an entity in the document's entity map.
///
/// Draft.js writes these as numbers in `entityRanges` and as strings in
/// `entityMap`, so both forms are accepted and normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawEntityKey")]
pub struct EntityKey(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityKey {
    Number(u64),
    Text(String),
}

impl From<RawEntityKey> for EntityKey {
    fn from(raw: RawEntityKey) -> Self {
        match raw {
            RawEntityKey::Number(n) => EntityKey(n.to_string()),
            RawEntityKey::Text(s) => EntityKey(s),
        }
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        EntityKey(key.to_string())
    }
}

impl From<u64> for EntityKey {
    fn from(key: u64) -> Self {
        EntityKey(key.to_string())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRange {
    pub key: EntityKey,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EntityKind {
    Link,
    Mention,
    Image,
    Other(String),
}

impl From<String> for EntityKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "LINK" => EntityKind::Link,
            "MENTION" => EntityKind::Mention,
            "IMAGE" => EntityKind::Image,
            _ => EntityKind::Other(kind),
        }
    }
}

/// Entity payload. `url` is used by links and mentions, `src` by images;
/// anything else is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub mutability: Option<String>,
    #[serde(default)]
    pub data: EntityData,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            mutability: None,
            data: EntityData::default(),
        }
    }

    pub fn link(url: &str) -> Self {
        let mut entity = Self::new(EntityKind::Link);
        entity.data.url = Some(url.to_string());
        entity
    }

    pub fn mention(url: &str) -> Self {
        let mut entity = Self::new(EntityKind::Mention);
        entity.data.url = Some(url.to_string());
        entity
    }

    pub fn image(src: &str) -> Self {
        let mut entity = Self::new(EntityKind::Image);
        entity.data.src = Some(src.to_string());
        entity
    }
}

/// Draft.js block types. Unknown names are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    Atomic,
    Other(String),
}

impl BlockType {
    /// The Draft.js name of this block type.
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::Atomic => "atomic",
            BlockType::Other(name) => name,
        }
    }

    /// Markdown marker written before the block's content.
    pub fn markdown_prefix(&self) -> &'static str {
        match self {
            BlockType::HeaderOne => "# ",
            BlockType::HeaderTwo => "## ",
            BlockType::HeaderThree => "### ",
            BlockType::HeaderFour => "#### ",
            BlockType::HeaderFive => "##### ",
            BlockType::HeaderSix => "###### ",
            BlockType::UnorderedListItem => "- ",
            BlockType::OrderedListItem => "1. ",
            BlockType::Blockquote => "> ",
            BlockType::Unstyled | BlockType::Atomic | BlockType::Other(_) => "",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "unstyled" => BlockType::Unstyled,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "header-four" => BlockType::HeaderFour,
            "header-five" => BlockType::HeaderFive,
            "header-six" => BlockType::HeaderSix,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "blockquote" => BlockType::Blockquote,
            "atomic" => BlockType::Atomic,
            _ => BlockType::Other(name),
        }
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        BlockType::from(name.to_string())
    }
}

/// One paragraph-level unit of a Draft.js document.
///
/// Offsets in `inline_style_ranges` and `entity_ranges` count `char`s of `text`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<InlineStyleRange>,
    /// Sorted by offset and non-overlapping.
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
    /// Block-level CSS properties, in insertion order.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Block {
    pub fn new(block_type: impl Into<BlockType>, text: &str) -> Self {
        Self {
            block_type: block_type.into(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_style(mut self, style: &str, offset: usize, length: usize) -> Self {
        self.inline_style_ranges.push(InlineStyleRange {
            style: InlineStyle::from(style),
            offset,
            length,
        });
        self
    }

    pub fn with_entity(mut self, key: impl Into<EntityKey>, offset: usize, length: usize) -> Self {
        self.entity_ranges.push(EntityRange {
            key: key.into(),
            offset,
            length,
        });
        self
    }

    pub fn with_data(mut self, property: &str, value: &str) -> Self {
        self.data
            .insert(property.to_string(), Value::String(value.to_string()));
        self
    }

    /// Rewrite range offsets given in UTF-16 code units, as Draft.js writes
    /// them, into `char` indices of `text`.
    ///
    /// A unit inside a surrogate pair maps to the character it belongs to.
    /// Offsets past the end of the text map to the text length.
    pub fn utf16_offsets_to_chars(&mut self) {
        let mut char_at_unit = Vec::with_capacity(self.text.len() + 1);
        for (index, ch) in self.text.chars().enumerate() {
            for _ in 0..ch.len_utf16() {
                char_at_unit.push(index);
            }
        }
        let char_count = self.text.chars().count();
        let to_char = |unit: usize| char_at_unit.get(unit).copied().unwrap_or(char_count);

        for range in &mut self.inline_style_ranges {
            let start = to_char(range.offset);
            let end = to_char(range.offset.saturating_add(range.length));
            range.offset = start;
            range.length = end.saturating_sub(start);
        }
        for range in &mut self.entity_ranges {
            let start = to_char(range.offset);
            let end = to_char(range.offset.saturating_add(range.length));
            range.offset = start;
            range.length = end.saturating_sub(start);
        }
    }

    /// An atomic block carries an entity but no literal text.
    pub fn is_atomic(&self) -> bool {
        !self.entity_ranges.is_empty() && self.text.is_empty()
    }
}

/// A Draft.js raw content state.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub entity_map: HashMap<EntityKey, Entity>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            entity_map: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, key: impl Into<EntityKey>, entity: Entity) -> Self {
        self.entity_map.insert(key.into(), entity);
        self
    }
}
