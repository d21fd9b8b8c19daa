//! Tag picker shown when creating or joining a planner.

use std::collections::HashSet;

use crate::model::{Tag, default_tag_catalog};
use crate::reactor::{Mutations, Reactor};
use crate::sections::{IndexPath, TagGroupItem, TagGroupSection, item_at, tag_sections};

pub struct CreatePlannerTag {
    catalog: Vec<Tag>,
}

impl CreatePlannerTag {
    pub fn new() -> Self {
        Self::with_catalog(default_tag_catalog())
    }

    pub fn with_catalog(catalog: Vec<Tag>) -> Self {
        Self { catalog }
    }
}

impl Default for CreatePlannerTag {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreatePlannerTagAction {
    SelectTag(IndexPath),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreatePlannerTagMutation {
    ToggleTagSelection(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlannerTagState {
    pub catalog: Vec<Tag>,
    pub selected: HashSet<String>,
    /// Soso, Like and Dislike groups
    pub sections: Vec<TagGroupSection>,
    /// True once any tag is selected
    pub is_selected: bool,
}

impl CreatePlannerTagState {
    /// Selected tags in catalog order.
    pub fn selected_tags(&self) -> Vec<Tag> {
        self.catalog
            .iter()
            .filter(|tag| self.selected.contains(&tag.id))
            .cloned()
            .collect()
    }
}

impl Reactor for CreatePlannerTag {
    type Action = CreatePlannerTagAction;
    type Mutation = CreatePlannerTagMutation;
    type State = CreatePlannerTagState;

    fn initial_state(&self) -> CreatePlannerTagState {
        let selected = HashSet::new();
        CreatePlannerTagState {
            sections: tag_sections(&self.catalog, &selected),
            catalog: self.catalog.clone(),
            selected,
            is_selected: false,
        }
    }

    fn mutate(
        &self,
        state: &CreatePlannerTagState,
        action: CreatePlannerTagAction,
    ) -> Mutations<CreatePlannerTagMutation> {
        match action {
            CreatePlannerTagAction::SelectTag(path) => match item_at(&state.sections, path) {
                Some(TagGroupItem::Tag(item)) => Mutations::just(
                    CreatePlannerTagMutation::ToggleTagSelection(item.tag.id.clone()),
                ),
                Some(TagGroupItem::Empty) | None => Mutations::empty(),
            },
        }
    }

    fn reduce(
        mut state: CreatePlannerTagState,
        mutation: CreatePlannerTagMutation,
    ) -> CreatePlannerTagState {
        match mutation {
            CreatePlannerTagMutation::ToggleTagSelection(id) => {
                if !state.selected.remove(&id) {
                    state.selected.insert(id);
                }
                state.sections = tag_sections(&state.catalog, &state.selected);
                state.is_selected = !state.selected.is_empty();
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagCategory;
    use crate::reactor::apply;

    fn is_selected(state: &CreatePlannerTagState, path: IndexPath) -> bool {
        matches!(item_at(&state.sections, path), Some(TagGroupItem::Tag(item)) if item.is_selected)
    }

    #[test]
    fn test_initial_sections_follow_categories() {
        let state = CreatePlannerTag::new().initial_state();
        let kinds: Vec<TagCategory> = state.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![TagCategory::Soso, TagCategory::Like, TagCategory::Dislike]);
        assert!(!state.is_selected);
    }

    #[test]
    fn test_select_toggles_item() {
        let reactor = CreatePlannerTag::new();
        let path = IndexPath::new(1, 0);

        let state = apply(&reactor, reactor.initial_state(), CreatePlannerTagAction::SelectTag(path));
        assert!(is_selected(&state, path));
        assert!(state.is_selected);
        assert_eq!(state.selected_tags().len(), 1);

        let state = apply(&reactor, state, CreatePlannerTagAction::SelectTag(path));
        assert!(!is_selected(&state, path));
        assert!(!state.is_selected);
    }

    #[test]
    fn test_empty_category_is_not_selectable() {
        let reactor = CreatePlannerTag::with_catalog(vec![Tag::new("1", "바다", TagCategory::Like)]);
        let initial = reactor.initial_state();
        assert_eq!(initial.sections[0].items, vec![TagGroupItem::Empty]);

        let state = apply(&reactor, initial.clone(), CreatePlannerTagAction::SelectTag(IndexPath::new(0, 0)));
        assert_eq!(state, initial);
    }
}
