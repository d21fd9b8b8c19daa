//! Sections for the discussion screen: the journey's tags and its ranked
//! candidate places.

use crate::model::{Journey, Tag};

use super::ranking::{PikmiItem, rank_pikmis};
use super::{Section, or_placeholder};

#[derive(Debug, Clone, PartialEq)]
pub struct TagItem {
    pub tag: Tag,
    pub is_selected: bool,
}

impl TagItem {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            is_selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscussionItem {
    Tag(TagItem),
    /// Stands in for the tag list while it is collapsed or empty
    EmptyTag,
    Pikmi(PikmiItem),
    /// Invitation to add the first candidate place
    CreatePikmi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionSectionKind {
    Tag,
    Pikmi,
}

pub type DiscussionSection = Section<DiscussionSectionKind, DiscussionItem>;

/// Whether the tag section shows its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagSectionMode {
    #[default]
    Expanded,
    Collapsed,
}

impl TagSectionMode {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            TagSectionMode::Expanded
        } else {
            TagSectionMode::Collapsed
        }
    }
}

/// Build `[tag section, pikmi section]` for a journey.
///
/// A collapsed tag section always holds a single `EmptyTag`, whatever the
/// journey's tags are. An empty pikmi list becomes a single `CreatePikmi`.
pub fn discussion_sections(
    journey: &Journey,
    user_id: Option<&str>,
    mode: TagSectionMode,
) -> Vec<DiscussionSection> {
    let tag_items = match mode {
        TagSectionMode::Collapsed => vec![DiscussionItem::EmptyTag],
        TagSectionMode::Expanded => or_placeholder(
            journey
                .tags
                .iter()
                .cloned()
                .map(|tag| DiscussionItem::Tag(TagItem::new(tag)))
                .collect(),
            || DiscussionItem::EmptyTag,
        ),
    };

    let pikmi_items = or_placeholder(
        rank_pikmis(&journey.pikmis, user_id)
            .into_iter()
            .map(DiscussionItem::Pikmi)
            .collect(),
        || DiscussionItem::CreatePikmi,
    );

    vec![
        Section::new(DiscussionSectionKind::Tag, tag_items),
        Section::new(DiscussionSectionKind::Pikmi, pikmi_items),
    ]
}
