//! Discussion tab of a planner: the journey's tags and its ranked candidate
//! places, with like voting.

use std::sync::Arc;

use crate::model::{Journey, Tag};
use crate::provider::ServiceProvider;
use crate::reactor::{MutationSource, Mutations, Reactor};
use crate::remote::{JourneyEvent, JourneyService};
use crate::sections::{
    DiscussionItem, DiscussionSection, IndexPath, TagSectionMode, discussion_sections, item_at,
    replace_item,
};
use crate::storage::{PreferenceKey, Preferences};

use super::{LoadState, journey_refetch_source};

pub struct Discussion {
    journey_id: String,
    journeys: JourneyService,
    preferences: Arc<dyn Preferences>,
}

impl Discussion {
    pub fn new(journey_id: impl Into<String>, provider: &ServiceProvider) -> Self {
        Self {
            journey_id: journey_id.into(),
            journeys: provider.journeys.clone(),
            preferences: provider.preferences.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscussionAction {
    Refresh,
    SelectCell(IndexPath),
    TapToggle,
    TapPlus,
    TapCreatePikmi(IndexPath),
    TapPikmiInfo(IndexPath),
    TapPikmiLike(IndexPath),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscussionMutation {
    SetUserId(Option<String>),
    SetLoadState(LoadState),
    SetJourney(Journey),
    SetToggleOn(bool),
    UpdateSectionItem(IndexPath, DiscussionItem),
    SetPresentedTag(Option<Tag>),
    SetPresentSearchPlace(bool),
    SetWebLink(Option<String>),
    SetGuide(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscussionState {
    pub journey_id: String,
    /// Signed-in user, used to mark liked places
    pub user_id: Option<String>,
    /// Last fetched journey
    pub journey: Option<Journey>,
    /// Tag section followed by the pikmi section
    pub sections: Vec<DiscussionSection>,
    /// Whether the tag section is expanded
    pub is_toggle_on: bool,
    pub load_state: LoadState,
    /// Tag whose detail sheet should be presented
    pub presented_tag: Option<Tag>,
    /// Whether the place search should be presented
    pub present_search_place: bool,
    /// Place link to open in a web view
    pub web_link: Option<String>,
    /// Error text from the last failed call
    pub guide: Option<String>,
}

impl DiscussionState {
    pub fn new(journey_id: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            journey_id: journey_id.into(),
            user_id,
            journey: None,
            sections: Vec::new(),
            is_toggle_on: true,
            load_state: LoadState::Idle,
            presented_tag: None,
            present_search_place: false,
            web_link: None,
            guide: None,
        }
    }

    fn rebuild_sections(mut self) -> Self {
        self.sections = match &self.journey {
            Some(journey) => discussion_sections(
                journey,
                self.user_id.as_deref(),
                TagSectionMode::from_expanded(self.is_toggle_on),
            ),
            None => Vec::new(),
        };
        self
    }
}

impl Reactor for Discussion {
    type Action = DiscussionAction;
    type Mutation = DiscussionMutation;
    type State = DiscussionState;

    fn initial_state(&self) -> DiscussionState {
        DiscussionState::new(
            self.journey_id.clone(),
            self.preferences.get(PreferenceKey::UserId),
        )
    }

    fn mutate(&self, state: &DiscussionState, action: DiscussionAction) -> Mutations<DiscussionMutation> {
        match action {
            DiscussionAction::Refresh => Mutations::concat([
                Mutations::just(DiscussionMutation::SetUserId(
                    self.preferences.get(PreferenceKey::UserId),
                )),
                Mutations::just(DiscussionMutation::SetLoadState(LoadState::Loading)),
                self.load(),
            ]),
            DiscussionAction::SelectCell(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::Tag(item)) => {
                    Mutations::just(DiscussionMutation::SetPresentedTag(Some(item.tag.clone())))
                }
                _ => Mutations::empty(),
            },
            DiscussionAction::TapToggle => {
                if state.journey.is_none() {
                    return Mutations::empty();
                }
                Mutations::just(DiscussionMutation::SetToggleOn(!state.is_toggle_on))
            }
            DiscussionAction::TapPlus => {
                Mutations::just(DiscussionMutation::SetPresentSearchPlace(true))
            }
            DiscussionAction::TapCreatePikmi(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::CreatePikmi) => {
                    Mutations::just(DiscussionMutation::SetPresentSearchPlace(true))
                }
                _ => Mutations::empty(),
            },
            DiscussionAction::TapPikmiInfo(path) => match item_at(&state.sections, path) {
                Some(DiscussionItem::Pikmi(item)) => {
                    Mutations::just(DiscussionMutation::SetWebLink(Some(item.pik.link.clone())))
                }
                _ => Mutations::empty(),
            },
            DiscussionAction::TapPikmiLike(path) => {
                let Some(DiscussionItem::Pikmi(item)) = item_at(&state.sections, path) else {
                    return Mutations::empty();
                };
                let toggled = DiscussionItem::Pikmi(item.toggle_like());
                let was_liked = item.is_liked;
                let pikmi_id = item.pik.id.clone();
                let journeys = self.journeys.clone();
                let journey_id = self.journey_id.clone();

                Mutations::just(DiscussionMutation::UpdateSectionItem(path, toggled)).then(
                    Mutations::effect(async move {
                        let result = if was_liked {
                            journeys.delete_pikmi_like(&journey_id, &pikmi_id).await
                        } else {
                            journeys.create_pikmi_like(&journey_id, &pikmi_id).await
                        };
                        let guide = match result {
                            Ok(()) => Mutations::empty(),
                            Err(e) => {
                                tracing::warn!(%pikmi_id, "Like toggle failed: {e}");
                                Mutations::just(DiscussionMutation::SetGuide(Some(e.user_message())))
                            }
                        };
                        // The refetch replaces the optimistic item either way.
                        guide.then(Mutations::from(fetched(
                            journeys.fetch_journey(&journey_id).await,
                        )))
                    }),
                )
            }
        }
    }

    fn reduce(state: DiscussionState, mutation: DiscussionMutation) -> DiscussionState {
        let mut state = state;
        match mutation {
            DiscussionMutation::SetUserId(user_id) => {
                state.user_id = user_id;
                state.rebuild_sections()
            }
            DiscussionMutation::SetLoadState(load_state) => {
                state.load_state = load_state;
                state
            }
            DiscussionMutation::SetJourney(journey) => {
                state.journey = Some(journey);
                state.rebuild_sections()
            }
            DiscussionMutation::SetToggleOn(on) => {
                state.is_toggle_on = on;
                state.rebuild_sections()
            }
            DiscussionMutation::UpdateSectionItem(path, item) => {
                replace_item(&mut state.sections, path, item);
                state
            }
            DiscussionMutation::SetPresentedTag(tag) => {
                state.presented_tag = tag;
                state
            }
            DiscussionMutation::SetPresentSearchPlace(present) => {
                state.present_search_place = present;
                state
            }
            DiscussionMutation::SetWebLink(link) => {
                state.web_link = link;
                state
            }
            DiscussionMutation::SetGuide(guide) => {
                state.guide = guide;
                state
            }
        }
    }

    fn transform(&self) -> Vec<MutationSource<DiscussionMutation>> {
        // Likes made here refetch on their own.
        vec![journey_refetch_source(
            &self.journeys,
            &self.journey_id,
            |event| {
                !matches!(
                    event,
                    JourneyEvent::PikmiLiked { .. } | JourneyEvent::PikmiUnliked { .. }
                )
            },
            fetched,
        )]
    }
}

impl Discussion {
    fn load(&self) -> Mutations<DiscussionMutation> {
        let journeys = self.journeys.clone();
        let journey_id = self.journey_id.clone();
        Mutations::effect(async move {
            Mutations::from(fetched(journeys.fetch_journey(&journey_id).await))
        })
    }
}

fn fetched(result: crate::error::Result<Journey>) -> Vec<DiscussionMutation> {
    match result {
        Ok(journey) => vec![
            DiscussionMutation::SetJourney(journey),
            DiscussionMutation::SetLoadState(LoadState::Loaded),
        ],
        Err(e) => {
            tracing::warn!("Failed to load discussion: {e}");
            vec![DiscussionMutation::SetLoadState(LoadState::Failed(
                e.user_message(),
            ))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::{Store, apply};
    use crate::remote::Envelope;
    use crate::screens::testing::{journey, journey_json, provider};
    use crate::sections::{DiscussionSectionKind, PikmiItem};
    use reqwest::Method;
    use serde_json::json;

    fn loaded(reactor: &Discussion) -> DiscussionState {
        Discussion::reduce(
            reactor.initial_state(),
            DiscussionMutation::SetJourney(journey()),
        )
    }

    fn pikmi_at(state: &DiscussionState, item: usize) -> PikmiItem {
        match item_at(&state.sections, IndexPath::new(1, item)) {
            Some(DiscussionItem::Pikmi(pikmi)) => pikmi.clone(),
            other => panic!("expected pikmi, got {other:?}"),
        }
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);
        let toggled = DiscussionItem::Pikmi(pikmi_at(&state, 0).toggle_like());

        for mutation in [
            DiscussionMutation::SetJourney(journey()),
            DiscussionMutation::SetToggleOn(false),
            DiscussionMutation::UpdateSectionItem(IndexPath::new(1, 0), toggled),
            DiscussionMutation::SetLoadState(LoadState::Failed("x".to_string())),
            DiscussionMutation::SetUserId(None),
        ] {
            let first = Discussion::reduce(state.clone(), mutation.clone());
            let second = Discussion::reduce(state.clone(), mutation);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_set_journey_builds_sections() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);

        assert_eq!(state.sections.len(), 2);
        assert_eq!(state.sections[0].kind, DiscussionSectionKind::Tag);
        // p1 has more likes and is liked by u1.
        let first = pikmi_at(&state, 0);
        assert_eq!(first.pik.id, "p1");
        assert!(first.is_liked);
        assert_eq!(first.rank, 0);
    }

    #[test]
    fn test_toggle_requires_journey() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = apply(&reactor, reactor.initial_state(), DiscussionAction::TapToggle);
        assert!(state.is_toggle_on);
    }

    #[test]
    fn test_toggle_round_trip() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);
        let expanded = state.sections.clone();

        let collapsed = apply(&reactor, state, DiscussionAction::TapToggle);
        assert!(!collapsed.is_toggle_on);
        assert_eq!(collapsed.sections[0].items, vec![DiscussionItem::EmptyTag]);
        assert_eq!(collapsed.sections[1], expanded[1]);

        let restored = apply(&reactor, collapsed, DiscussionAction::TapToggle);
        assert_eq!(restored.sections, expanded);
    }

    #[test]
    fn test_navigation_targets() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);

        let state = apply(&reactor, state, DiscussionAction::SelectCell(IndexPath::new(0, 0)));
        assert_eq!(state.presented_tag.as_ref().map(|t| t.id.as_str()), Some("t1"));

        let state = apply(&reactor, state, DiscussionAction::TapPikmiInfo(IndexPath::new(1, 1)));
        assert_eq!(state.web_link.as_deref(), Some("https://place.example/p2"));

        // Not a CreatePikmi cell.
        let state = apply(&reactor, state, DiscussionAction::TapCreatePikmi(IndexPath::new(1, 0)));
        assert!(!state.present_search_place);

        let state = apply(&reactor, state, DiscussionAction::TapPlus);
        assert!(state.present_search_place);
    }

    #[test]
    fn test_out_of_range_taps_are_ignored() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);
        let after = apply(&reactor, state.clone(), DiscussionAction::TapPikmiLike(IndexPath::new(1, 9)));
        assert_eq!(after, state);
    }

    #[test]
    fn test_like_is_optimistic() {
        let (_, provider) = provider();
        let reactor = Discussion::new("j1", &provider);
        let state = loaded(&reactor);

        let state = apply(&reactor, state, DiscussionAction::TapPikmiLike(IndexPath::new(1, 1)));
        let p2 = pikmi_at(&state, 1);
        assert!(p2.is_liked);
        assert_eq!(p2.like_count, 2);
    }

    #[tokio::test]
    async fn test_refresh_loads_journey() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1", journey_json());

        let store = Store::spawn(Discussion::new("j1", &provider));
        store.send(DiscussionAction::Refresh);

        let state = store
            .wait_for(|s| s.load_state == LoadState::Loaded)
            .await
            .unwrap();
        assert_eq!(state.journey.unwrap().name, "제주 여행");
        assert_eq!(state.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_message() {
        let (transport, provider) = provider();
        transport.respond(
            Method::GET,
            "journeys/j1",
            Envelope::failure("40400", "존재하지 않는 여행입니다"),
        );

        let store = Store::spawn(Discussion::new("j1", &provider));
        store.send(DiscussionAction::Refresh);

        let state = store
            .wait_for(|s| matches!(s.load_state, LoadState::Failed(_)))
            .await
            .unwrap();
        assert_eq!(
            state.load_state,
            LoadState::Failed("존재하지 않는 여행입니다".to_string())
        );
        assert!(state.sections.is_empty());
    }

    #[tokio::test]
    async fn test_unlike_calls_delete_then_refetches() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1", journey_json());
        transport.respond_ok(Method::DELETE, "journeys/j1/pikmis/p1/likes", json!({}));

        let store = Store::spawn(Discussion::new("j1", &provider));
        store.send(DiscussionAction::Refresh);
        store
            .wait_for(|s| s.load_state == LoadState::Loaded)
            .await
            .unwrap();

        store.send(DiscussionAction::TapPikmiLike(IndexPath::new(1, 0)));
        store
            .wait_for(|_| transport.count(&Method::GET, "journeys/j1") == 2)
            .await
            .unwrap();

        assert_eq!(transport.count(&Method::DELETE, "journeys/j1/pikmis/p1/likes"), 1);
        assert_eq!(transport.count(&Method::POST, "journeys/j1/pikmis/p1/likes"), 0);
    }

    #[tokio::test]
    async fn test_failed_like_sets_guide() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1", journey_json());
        transport.respond(
            Method::POST,
            "journeys/j1/pikmis/p2/likes",
            Envelope::failure("50000", "잠시 후 다시 시도해주세요"),
        );

        let store = Store::spawn(Discussion::new("j1", &provider));
        store.send(DiscussionAction::Refresh);
        store
            .wait_for(|s| s.load_state == LoadState::Loaded)
            .await
            .unwrap();

        store.send(DiscussionAction::TapPikmiLike(IndexPath::new(1, 1)));
        let state = store.wait_for(|s| s.guide.is_some()).await.unwrap();
        assert_eq!(state.guide.as_deref(), Some("잠시 후 다시 시도해주세요"));
    }
}
