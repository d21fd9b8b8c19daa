//! Tag picker sections grouped by category.

use std::collections::HashSet;

use crate::model::{ALL_TAG_CATEGORIES, Tag, TagCategory};

use super::discussion::TagItem;
use super::{Section, group_by_category, or_placeholder};

#[derive(Debug, Clone, PartialEq)]
pub enum TagGroupItem {
    Tag(TagItem),
    /// A category with no tags to offer
    Empty,
}

pub type TagGroupSection = Section<TagCategory, TagGroupItem>;

/// One section per category (Soso, Like, Dislike), tags in input order,
/// with `selected` marking the chosen tag ids.
pub fn tag_sections(tags: &[Tag], selected: &HashSet<String>) -> Vec<TagGroupSection> {
    group_by_category(tags.iter().cloned(), &ALL_TAG_CATEGORIES, |t| t.category)
        .into_iter()
        .map(|(category, group)| {
            let items = group
                .into_iter()
                .map(|tag| {
                    let is_selected = selected.contains(&tag.id);
                    TagGroupItem::Tag(TagItem { tag, is_selected })
                })
                .collect();
            Section::new(category, or_placeholder(items, || TagGroupItem::Empty))
        })
        .collect()
}
