//! Planner home: switches between the discussion and the itinerary tabs and
//! shows tags plus candidate places ranked by likes.

use std::sync::Arc;

use crate::model::{Journey, Tag};
use crate::provider::ServiceProvider;
use crate::reactor::{Mutations, Reactor};
use crate::remote::JourneyService;
use crate::sections::{
    DiscussionItem, DiscussionSection, IndexPath, TagSectionMode, discussion_sections, item_at,
    replace_item,
};
use crate::storage::{PreferenceKey, Preferences};

use super::LoadState;

pub struct PlannerHome {
    journey_id: String,
    journeys: JourneyService,
    preferences: Arc<dyn Preferences>,
}

impl PlannerHome {
    pub fn new(journey_id: impl Into<String>, provider: &ServiceProvider) -> Self {
        Self {
            journey_id: journey_id.into(),
            journeys: provider.journeys.clone(),
            preferences: provider.preferences.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerHomeAction {
    Refresh,
    TapDiscussion,
    TapJourneyPlanner,
    TapTagToggle,
    TapAddCandidatePlace,
    SelectDiscussionCell(IndexPath),
    TapCandidateInfo(IndexPath),
    TapCandidateLike(IndexPath),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerHomeMutation {
    SetLoadState(LoadState),
    SetJourney(Journey),
    SetShowDiscussion(bool),
    SetShowJourneyPlanner(bool),
    ToggleTagSection,
    SetPresentedTag(Tag),
    SetPresentSearchPlace(bool),
    SetWebLink(String),
    UpdateSectionItem(IndexPath, DiscussionItem),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerHomeState {
    pub user_id: Option<String>,
    pub journey: Option<Journey>,
    pub is_show_discussion: bool,
    pub is_show_journey_planner: bool,
    pub is_show_tag_section: bool,
    pub presented_tag: Option<Tag>,
    pub present_search_place: bool,
    pub web_link: Option<String>,
    pub sections: Vec<DiscussionSection>,
    pub load_state: LoadState,
}

impl PlannerHomeState {
    fn with_sections(mut self) -> Self {
        let mode = TagSectionMode::from_expanded(self.is_show_tag_section);
        self.sections = self
            .journey
            .as_ref()
            .map(|journey| discussion_sections(journey, self.user_id.as_deref(), mode))
            .unwrap_or_default();
        self
    }
}

impl Reactor for PlannerHome {
    type Action = PlannerHomeAction;
    type Mutation = PlannerHomeMutation;
    type State = PlannerHomeState;

    fn initial_state(&self) -> PlannerHomeState {
        PlannerHomeState {
            user_id: self.preferences.get(PreferenceKey::UserId),
            journey: None,
            is_show_discussion: true,
            is_show_journey_planner: false,
            is_show_tag_section: true,
            presented_tag: None,
            present_search_place: false,
            web_link: None,
            sections: Vec::new(),
            load_state: LoadState::Idle,
        }
    }

    fn mutate(
        &self,
        state: &PlannerHomeState,
        action: PlannerHomeAction,
    ) -> Mutations<PlannerHomeMutation> {
        match action {
            PlannerHomeAction::Refresh => {
                let journeys = self.journeys.clone();
                let journey_id = self.journey_id.clone();
                Mutations::just(PlannerHomeMutation::SetLoadState(LoadState::Loading)).then(
                    Mutations::effect(async move {
                        match journeys.fetch_journey(&journey_id).await {
                            Ok(journey) => Mutations::from(vec![
                                PlannerHomeMutation::SetJourney(journey),
                                PlannerHomeMutation::SetLoadState(LoadState::Loaded),
                            ]),
                            Err(e) => {
                                tracing::warn!(%journey_id, "Failed to load planner: {e}");
                                Mutations::just(PlannerHomeMutation::SetLoadState(
                                    LoadState::Failed(e.user_message()),
                                ))
                            }
                        }
                    }),
                )
            }
            PlannerHomeAction::TapDiscussion => Mutations::from(vec![
                PlannerHomeMutation::SetShowDiscussion(true),
                PlannerHomeMutation::SetShowJourneyPlanner(false),
            ]),
            PlannerHomeAction::TapJourneyPlanner => Mutations::from(vec![
                PlannerHomeMutation::SetShowDiscussion(false),
                PlannerHomeMutation::SetShowJourneyPlanner(true),
            ]),
            PlannerHomeAction::TapTagToggle => Mutations::just(PlannerHomeMutation::ToggleTagSection),
            PlannerHomeAction::TapAddCandidatePlace => {
                Mutations::just(PlannerHomeMutation::SetPresentSearchPlace(true))
            }
            PlannerHomeAction::SelectDiscussionCell(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::Tag(item)) => {
                    Mutations::just(PlannerHomeMutation::SetPresentedTag(item.tag.clone()))
                }
                _ => Mutations::empty(),
            },
            PlannerHomeAction::TapCandidateInfo(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::Pikmi(item)) => {
                    Mutations::just(PlannerHomeMutation::SetWebLink(item.pik.link.clone()))
                }
                _ => Mutations::empty(),
            },
            PlannerHomeAction::TapCandidateLike(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::Pikmi(item)) => Mutations::just(
                    PlannerHomeMutation::UpdateSectionItem(path, DiscussionItem::Pikmi(item.toggle_like())),
                ),
                _ => Mutations::empty(),
            },
        }
    }

    fn reduce(mut state: PlannerHomeState, mutation: PlannerHomeMutation) -> PlannerHomeState {
        match mutation {
            PlannerHomeMutation::SetLoadState(load_state) => state.load_state = load_state,
            PlannerHomeMutation::SetJourney(journey) => {
                state.journey = Some(journey);
                return state.with_sections();
            }
            PlannerHomeMutation::SetShowDiscussion(show) => state.is_show_discussion = show,
            PlannerHomeMutation::SetShowJourneyPlanner(show) => state.is_show_journey_planner = show,
            PlannerHomeMutation::ToggleTagSection => {
                state.is_show_tag_section = !state.is_show_tag_section;
                return state.with_sections();
            }
            PlannerHomeMutation::SetPresentedTag(tag) => state.presented_tag = Some(tag),
            PlannerHomeMutation::SetPresentSearchPlace(present) => {
                state.present_search_place = present
            }
            PlannerHomeMutation::SetWebLink(link) => state.web_link = Some(link),
            PlannerHomeMutation::UpdateSectionItem(path, item) => {
                replace_item(&mut state.sections, path, item);
            }
        }
        state
    }
}
