use std::ops::Range;

use crate::block::{Block, InlineStyle, PropertyKind, ToggleStyle};

/// Attributes of a single character: which toggles are on and the value of
/// each property style, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharStyle<'a> {
    toggles: [bool; 7],
    properties: [Option<&'a str>; 4],
}

impl<'a> CharStyle<'a> {
    pub fn has(&self, style: ToggleStyle) -> bool {
        self.toggles[style.index()]
    }

    pub fn property(&self, kind: PropertyKind) -> Option<&'a str> {
        self.properties[kind.index()]
    }

    pub fn has_properties(&self) -> bool {
        self.properties.iter().any(Option::is_some)
    }

    fn matches(&self, other: &CharStyle<'_>, key: StyleKey) -> bool {
        match key {
            StyleKey::Toggle(style) => self.has(style) == other.has(style),
            StyleKey::Property(kind) => self.property(kind) == other.property(kind),
        }
    }
}

/// One slot of the per-character style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKey {
    Toggle(ToggleStyle),
    Property(PropertyKind),
}

pub const TOGGLE_KEYS: [StyleKey; 7] = [
    StyleKey::Toggle(ToggleStyle::Bold),
    StyleKey::Toggle(ToggleStyle::Italic),
    StyleKey::Toggle(ToggleStyle::Underline),
    StyleKey::Toggle(ToggleStyle::Strikethrough),
    StyleKey::Toggle(ToggleStyle::Code),
    StyleKey::Toggle(ToggleStyle::Superscript),
    StyleKey::Toggle(ToggleStyle::Subscript),
];

pub const PROPERTY_KEYS: [StyleKey; 4] = [
    StyleKey::Property(PropertyKind::Color),
    StyleKey::Property(PropertyKind::BgColor),
    StyleKey::Property(PropertyKind::FontSize),
    StyleKey::Property(PropertyKind::FontFamily),
];

/// Per-character styles of one block, built once and then only read.
#[derive(Debug, Clone)]
pub struct StyleArena<'a> {
    chars: Vec<CharStyle<'a>>,
}

impl<'a> StyleArena<'a> {
    /// Expand every inline style range of `block` onto its characters.
    ///
    /// Ranges are applied in input order, so where two ranges of the same
    /// property overlap the later one wins. Ranges running past the end of
    /// the text are clipped.
    pub fn build(block: &'a Block) -> Self {
        let len = block.text.chars().count();
        let mut chars = vec![CharStyle::default(); len];

        for range in &block.inline_style_ranges {
            let start = range.offset.min(len);
            let end = range.offset.saturating_add(range.length).min(len);
            let slots = &mut chars[start..end];
            match &range.style {
                InlineStyle::Toggle(style) => {
                    for slot in slots {
                        slot.toggles[style.index()] = true;
                    }
                }
                InlineStyle::Property(property) => {
                    let kind = property.kind();
                    for slot in slots {
                        slot.properties[kind.index()] = Some(property.value());
                    }
                }
                InlineStyle::Unrecognized(_) => {}
            }
        }

        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&CharStyle<'a>> {
        self.chars.get(offset)
    }
}

/// A maximal stretch of characters whose selected attributes do not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub start: usize,
    pub end: usize,
    /// Attributes of the first character of the run.
    pub style: CharStyle<'a>,
}

impl Run<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `range` into runs where every key in `keys` holds a constant value.
///
/// A new run begins at `range.start` and wherever any selected key differs
/// from the previous character. Keys outside `keys` are ignored, so splitting
/// the same range with different key sets gives independent partitions.
pub fn split_runs<'a>(arena: &StyleArena<'a>, keys: &[StyleKey], range: Range<usize>) -> Vec<Run<'a>> {
    let end = range.end.min(arena.len());
    let mut runs: Vec<Run<'a>> = Vec::new();

    for offset in range.start..end {
        let style = arena.chars[offset];
        let continues = runs
            .last()
            .is_some_and(|run| keys.iter().all(|&key| run.style.matches(&style, key)));
        if continues {
            if let Some(run) = runs.last_mut() {
                run.end = offset + 1;
            }
        } else {
            runs.push(Run {
                start: offset,
                end: offset + 1,
                style,
            });
        }
    }

    runs
}
