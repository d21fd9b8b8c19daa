use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JypError;

/// How a member feels about a tag. The declaration order is the display
/// order of tag groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Soso,
    Like,
    Dislike,
}

pub const ALL_TAG_CATEGORIES: [TagCategory; 3] =
    [TagCategory::Soso, TagCategory::Like, TagCategory::Dislike];

impl TagCategory {
    pub fn title(&self) -> &'static str {
        match self {
            TagCategory::Soso => "상관없어요",
            TagCategory::Like => "좋아요",
            TagCategory::Dislike => "싫어요",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCategory::Soso => write!(f, "soso"),
            TagCategory::Like => write!(f, "like"),
            TagCategory::Dislike => write!(f, "dislike"),
        }
    }
}

impl FromStr for TagCategory {
    type Err = JypError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "soso" => Ok(TagCategory::Soso),
            "like" => Ok(TagCategory::Like),
            "dislike" => Ok(TagCategory::Dislike),
            _ => Err(JypError::Other(format!("invalid tag category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub category: TagCategory,
}

impl Tag {
    pub fn new(id: impl Into<String>, text: impl Into<String>, category: TagCategory) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category,
        }
    }
}

/// Tags offered when creating or joining a planner.
pub fn default_tag_catalog() -> Vec<Tag> {
    vec![
        Tag::new("1", "모두 찬성", TagCategory::Soso),
        Tag::new("2", "상관없어", TagCategory::Soso),
        Tag::new("3", "고기", TagCategory::Like),
        Tag::new("4", "해산물", TagCategory::Like),
        Tag::new("5", "쇼핑", TagCategory::Like),
        Tag::new("6", "산", TagCategory::Like),
        Tag::new("7", "바다", TagCategory::Like),
        Tag::new("8", "도시", TagCategory::Like),
        Tag::new("9", "핫 플레이스", TagCategory::Like),
        Tag::new("10", "민초 치킨", TagCategory::Dislike),
        Tag::new("11", "단팥크림빵", TagCategory::Dislike),
        Tag::new("12", "약", TagCategory::Dislike),
    ]
}
