//! Pure builders from domain snapshots to display sections.
//!
//! Nothing in here touches services or state containers: every builder is a
//! function of its inputs, so screens can rebuild sections on every change
//! and tests can check them directly.

pub mod discussion;
pub mod plan;
pub mod ranking;
pub mod route;
pub mod tags;

pub use discussion::{
    DiscussionItem, DiscussionSection, DiscussionSectionKind, TagItem, TagSectionMode,
    discussion_sections,
};
pub use plan::{JourneyPlanItem, JourneyPlanSection, JourneyPlanSectionKind, PlanItem, plan_sections};
pub use ranking::{PikmiItem, rank_pikmis};
pub use route::{
    PikmiRouteItem, RouteItem, RouteSection, RouteSectionKind, pikmi_route_sections,
    route_sections,
};
pub use tags::{TagGroupItem, TagGroupSection, tag_sections};

/// An ordered group of display items tagged with what kind of section it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<K, I> {
    pub kind: K,
    pub items: Vec<I>,
}

impl<K, I> Section<K, I> {
    pub fn new(kind: K, items: Vec<I>) -> Self {
        Self { kind, items }
    }
}

/// Location of one item inside a list of sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Look up the item at `path`, if it exists.
pub fn item_at<K, I>(sections: &[Section<K, I>], path: IndexPath) -> Option<&I> {
    sections.get(path.section)?.items.get(path.item)
}

/// Replace the item at `path`. Out-of-range paths leave the sections as-is.
pub fn replace_item<K, I>(sections: &mut [Section<K, I>], path: IndexPath, item: I) -> bool {
    match sections
        .get_mut(path.section)
        .and_then(|s| s.items.get_mut(path.item))
    {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Substitute a single placeholder item for an empty list.
pub fn or_placeholder<I>(items: Vec<I>, placeholder: impl FnOnce() -> I) -> Vec<I> {
    if items.is_empty() {
        vec![placeholder()]
    } else {
        items
    }
}

/// Partition `items` by category, one group per entry of `categories` in that
/// order. Relative input order is preserved inside each group; items whose
/// key is not listed are dropped.
pub fn group_by_category<T, K, F>(
    items: impl IntoIterator<Item = T>,
    categories: &[K],
    key: F,
) -> Vec<(K, Vec<T>)>
where
    K: Copy + PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = categories.iter().map(|c| (*c, Vec::new())).collect();
    for item in items {
        let k = key(&item);
        if let Some((_, group)) = groups.iter_mut().find(|(c, _)| *c == k) {
            group.push(item);
        }
    }
    groups
}
