use crate::block::{EntityKey, EntityRange};

/// A stretch of block text that is either covered by one entity or by none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySection {
    pub start: usize,
    pub end: usize,
    pub entity: Option<EntityKey>,
}

/// Partition a block of `len` characters by its entity ranges.
///
/// `ranges` must be sorted by offset and non-overlapping. When
/// `trim_gap_before_entity` is set, an entity-free gap that is followed by an
/// entity stops one character short of it, so that character is not rendered.
/// Otherwise the sections cover `0..len` exactly.
pub fn entity_sections(ranges: &[EntityRange], len: usize, trim_gap_before_entity: bool) -> Vec<EntitySection> {
    let mut sections = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut last_offset = 0;

    for range in ranges {
        let start = range.offset.min(len);
        let end = range.offset.saturating_add(range.length).min(len);

        if start > last_offset {
            let gap_end = if trim_gap_before_entity { start - 1 } else { start };
            sections.push(EntitySection {
                start: last_offset,
                end: gap_end,
                entity: None,
            });
        }
        sections.push(EntitySection {
            start,
            end,
            entity: Some(range.key.clone()),
        });
        last_offset = end;
    }

    if last_offset < len {
        sections.push(EntitySection {
            start: last_offset,
            end: len,
            entity: None,
        });
    }

    sections
}
