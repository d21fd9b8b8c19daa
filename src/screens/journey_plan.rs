//! Day-by-day itinerary of a planner.

use crate::model::Journey;
use crate::provider::ServiceProvider;
use crate::reactor::{MutationSource, Mutations, Reactor};
use crate::remote::{JourneyEvent, JourneyService};
use crate::sections::{
    IndexPath, JourneyPlanItem, JourneyPlanSection, JourneyPlanSectionKind, item_at, plan_sections,
};

use super::{LoadState, journey_refetch_source};

/// Route editor to open for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub journey_id: String,
    pub pikiday_id: String,
    pub day_index: usize,
}

pub struct JourneyPlan {
    journey_id: String,
    journeys: JourneyService,
}

impl JourneyPlan {
    pub fn new(journey_id: impl Into<String>, provider: &ServiceProvider) -> Self {
        Self {
            journey_id: journey_id.into(),
            journeys: provider.journeys.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JourneyPlanAction {
    /// Show a journey the parent screen already fetched
    Refresh(Journey),
    /// Fetch the journey from the server
    Fetch,
    /// Edit button on a day holding places
    TapEdit(IndexPath),
    /// Plus button on an empty day
    TapPlus(IndexPath),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JourneyPlanMutation {
    SetJourney(Journey),
    SetLoadState(LoadState),
    SetRouteTarget(Option<RouteTarget>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyPlanState {
    pub journey: Option<Journey>,
    pub sections: Vec<JourneyPlanSection>,
    pub load_state: LoadState,
    pub route_target: Option<RouteTarget>,
}

impl Reactor for JourneyPlan {
    type Action = JourneyPlanAction;
    type Mutation = JourneyPlanMutation;
    type State = JourneyPlanState;

    fn initial_state(&self) -> JourneyPlanState {
        JourneyPlanState::default()
    }

    fn mutate(&self, state: &JourneyPlanState, action: JourneyPlanAction) -> Mutations<JourneyPlanMutation> {
        match action {
            JourneyPlanAction::Refresh(journey) => Mutations::from(vec![
                JourneyPlanMutation::SetJourney(journey),
                JourneyPlanMutation::SetLoadState(LoadState::Loaded),
            ]),
            JourneyPlanAction::Fetch => {
                let journeys = self.journeys.clone();
                let journey_id = self.journey_id.clone();
                Mutations::just(JourneyPlanMutation::SetLoadState(LoadState::Loading)).then(
                    Mutations::effect(async move {
                        Mutations::from(fetched(journeys.fetch_journey(&journey_id).await))
                    }),
                )
            }
            JourneyPlanAction::TapEdit(path) => match item_at(&state.sections, path) {
                Some(JourneyPlanItem::Plan(_)) => self.route_target(state, path),
                _ => Mutations::empty(),
            },
            JourneyPlanAction::TapPlus(path) => match item_at(&state.sections, path) {
                Some(JourneyPlanItem::EmptyPlan { .. }) => self.route_target(state, path),
                _ => Mutations::empty(),
            },
        }
    }

    fn reduce(mut state: JourneyPlanState, mutation: JourneyPlanMutation) -> JourneyPlanState {
        match mutation {
            JourneyPlanMutation::SetJourney(journey) => {
                state.sections = plan_sections(&journey);
                state.journey = Some(journey);
            }
            JourneyPlanMutation::SetLoadState(load_state) => state.load_state = load_state,
            JourneyPlanMutation::SetRouteTarget(target) => state.route_target = target,
        }
        state
    }

    fn transform(&self) -> Vec<MutationSource<JourneyPlanMutation>> {
        vec![journey_refetch_source(
            &self.journeys,
            &self.journey_id,
            |event| matches!(event, JourneyEvent::PikisUpdated { .. }),
            fetched,
        )]
    }
}

impl JourneyPlan {
    fn route_target(&self, state: &JourneyPlanState, path: IndexPath) -> Mutations<JourneyPlanMutation> {
        let Some(section) = state.sections.get(path.section) else {
            return Mutations::empty();
        };
        let JourneyPlanSectionKind::Journey { day_index } = section.kind else {
            return Mutations::empty();
        };
        let Some(pikiday) = state.journey.as_ref().and_then(|j| j.pikidays.get(day_index)) else {
            return Mutations::empty();
        };

        Mutations::just(JourneyPlanMutation::SetRouteTarget(Some(RouteTarget {
            journey_id: self.journey_id.clone(),
            pikiday_id: pikiday.id.clone(),
            day_index,
        })))
    }
}

fn fetched(result: crate::error::Result<Journey>) -> Vec<JourneyPlanMutation> {
    match result {
        Ok(journey) => vec![
            JourneyPlanMutation::SetJourney(journey),
            JourneyPlanMutation::SetLoadState(LoadState::Loaded),
        ],
        Err(e) => {
            tracing::warn!("Failed to load itinerary: {e}");
            vec![JourneyPlanMutation::SetLoadState(LoadState::Failed(e.user_message()))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::{Store, apply};
    use crate::screens::testing::{journey, journey_json, provider};
    use reqwest::Method;
    use serde_json::json;

    fn plan() -> (JourneyPlan, JourneyPlanState) {
        let (_, provider) = provider();
        let reactor = JourneyPlan::new("j1", &provider);
        let state = apply(
            &reactor,
            reactor.initial_state(),
            JourneyPlanAction::Refresh(journey()),
        );
        (reactor, state)
    }

    #[test]
    fn test_refresh_builds_day_sections() {
        let (_, state) = plan();
        assert_eq!(state.load_state, LoadState::Loaded);
        // Day picker plus two days.
        assert_eq!(state.sections.len(), 3);
        assert!(matches!(
            state.sections[1].items[0],
            JourneyPlanItem::EmptyPlan { day_index: 0, .. }
        ));
    }

    #[test]
    fn test_tap_plus_on_empty_day() {
        let (reactor, state) = plan();
        let state = apply(&reactor, state, JourneyPlanAction::TapPlus(IndexPath::new(1, 0)));
        assert_eq!(
            state.route_target,
            Some(RouteTarget {
                journey_id: "j1".to_string(),
                pikiday_id: "d1".to_string(),
                day_index: 0,
            })
        );
    }

    #[test]
    fn test_tap_edit_requires_plan_item() {
        let (reactor, state) = plan();
        let state = apply(&reactor, state, JourneyPlanAction::TapEdit(IndexPath::new(1, 0)));
        assert_eq!(state.route_target, None);

        let state = apply(&reactor, state, JourneyPlanAction::TapEdit(IndexPath::new(2, 0)));
        assert_eq!(state.route_target.map(|t| t.pikiday_id), Some("d2".to_string()));
    }

    #[test]
    fn test_day_picker_taps_are_ignored() {
        let (reactor, state) = plan();
        let state = apply(&reactor, state, JourneyPlanAction::TapPlus(IndexPath::new(0, 0)));
        assert_eq!(state.route_target, None);
    }

    #[tokio::test]
    async fn test_pikis_update_triggers_refetch() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1", journey_json());
        transport.respond_ok(Method::PUT, "journeys/j1/pikidays/d1/pikis", json!(null));
        let journeys = provider.journeys.clone();

        let store = Store::spawn(JourneyPlan::new("j1", &provider));
        store.send(JourneyPlanAction::Fetch);
        store
            .wait_for(|s| s.load_state == LoadState::Loaded)
            .await
            .unwrap();

        journeys.update_pikis("j1", "d1", Vec::new()).await.unwrap();
        store
            .wait_for(|_| transport.count(&Method::GET, "journeys/j1") == 2)
            .await
            .unwrap();
    }
}
