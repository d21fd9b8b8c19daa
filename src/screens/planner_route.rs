//! Route editor for one itinerary day.

use crate::error::JypError;
use crate::model::{Journey, Pik};
use crate::provider::ServiceProvider;
use crate::reactor::{Mutations, Reactor};
use crate::remote::JourneyService;
use crate::sections::{
    IndexPath, PikmiRouteItem, RouteItem, RouteSection, item_at, pikmi_route_sections,
    route_sections,
};

use super::LoadState;

pub struct PlannerRoute {
    journey_id: String,
    day_index: usize,
    journeys: JourneyService,
}

impl PlannerRoute {
    pub fn new(journey_id: impl Into<String>, day_index: usize, provider: &ServiceProvider) -> Self {
        Self {
            journey_id: journey_id.into(),
            day_index,
            journeys: provider.journeys.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerRouteAction {
    Refresh,
    /// Append a candidate place to the route
    TapPikmi(IndexPath),
    /// Remove a place from the route
    TapRouteItem(IndexPath),
    /// Upload the route
    TapDone,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerRouteMutation {
    SetLoadState(LoadState),
    SetJourney(Journey),
    AppendRoute(Pik),
    RemoveRoute(usize),
    SetUploading(bool),
    SetPopToPlanner(bool),
    SetGuide(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerRouteState {
    pub day_index: usize,
    pub journey: Option<Journey>,
    /// Places on this day, in visiting order
    pub route: Vec<Pik>,
    pub route_sections: Vec<RouteSection<RouteItem>>,
    pub pikmi_sections: Vec<RouteSection<PikmiRouteItem>>,
    pub load_state: LoadState,
    pub is_uploading: bool,
    /// Set after a successful upload
    pub pop_to_planner: bool,
    pub guide: Option<String>,
}

impl PlannerRouteState {
    fn rebuild(mut self) -> Self {
        let pikmis = self.journey.as_ref().map(|j| j.pikmis.as_slice()).unwrap_or_default();
        self.route_sections = route_sections(&self.route);
        self.pikmi_sections = pikmi_route_sections(pikmis, &self.route);
        self
    }
}

impl Reactor for PlannerRoute {
    type Action = PlannerRouteAction;
    type Mutation = PlannerRouteMutation;
    type State = PlannerRouteState;

    fn initial_state(&self) -> PlannerRouteState {
        PlannerRouteState {
            day_index: self.day_index,
            journey: None,
            route: Vec::new(),
            route_sections: Vec::new(),
            pikmi_sections: Vec::new(),
            load_state: LoadState::Idle,
            is_uploading: false,
            pop_to_planner: false,
            guide: None,
        }
        .rebuild()
    }

    fn mutate(&self, state: &PlannerRouteState, action: PlannerRouteAction) -> Mutations<PlannerRouteMutation> {
        match action {
            PlannerRouteAction::Refresh => {
                let journeys = self.journeys.clone();
                let journey_id = self.journey_id.clone();
                let day_index = self.day_index;

                Mutations::just(PlannerRouteMutation::SetLoadState(LoadState::Loading)).then(
                    Mutations::effect(async move {
                        let result = journeys.fetch_journey(&journey_id).await.and_then(|journey| {
                            if day_index < journey.pikidays.len() {
                                Ok(journey)
                            } else {
                                Err(JypError::DayOutOfRange(day_index))
                            }
                        });
                        match result {
                            Ok(journey) => Mutations::from(vec![
                                PlannerRouteMutation::SetJourney(journey),
                                PlannerRouteMutation::SetLoadState(LoadState::Loaded),
                            ]),
                            Err(e) => {
                                tracing::warn!(%journey_id, day_index, "Failed to load route: {e}");
                                Mutations::just(PlannerRouteMutation::SetLoadState(
                                    LoadState::Failed(e.user_message()),
                                ))
                            }
                        }
                    }),
                )
            }
            PlannerRouteAction::TapPikmi(path) => match item_at(&state.pikmi_sections, path) {
                Some(item) if !item.is_selected => {
                    Mutations::just(PlannerRouteMutation::AppendRoute(item.pik.clone()))
                }
                _ => Mutations::empty(),
            },
            PlannerRouteAction::TapRouteItem(path) => match item_at(&state.route_sections, path) {
                Some(RouteItem::Route { order, .. }) => {
                    Mutations::just(PlannerRouteMutation::RemoveRoute(*order))
                }
                _ => Mutations::empty(),
            },
            PlannerRouteAction::TapDone => {
                let Some(pikiday) = state
                    .journey
                    .as_ref()
                    .and_then(|j| j.pikidays.get(self.day_index))
                else {
                    return Mutations::empty();
                };
                if state.is_uploading {
                    return Mutations::empty();
                }
                let journeys = self.journeys.clone();
                let journey_id = self.journey_id.clone();
                let pikiday_id = pikiday.id.clone();
                let route = state.route.clone();

                Mutations::from(vec![
                    PlannerRouteMutation::SetGuide(None),
                    PlannerRouteMutation::SetUploading(true),
                ])
                .then(Mutations::effect(async move {
                    let outcome = match journeys.update_pikis(&journey_id, &pikiday_id, route).await {
                        Ok(()) => PlannerRouteMutation::SetPopToPlanner(true),
                        Err(e) => {
                            tracing::warn!(%pikiday_id, "Failed to upload route: {e}");
                            PlannerRouteMutation::SetGuide(Some(e.user_message()))
                        }
                    };
                    Mutations::from(vec![outcome, PlannerRouteMutation::SetUploading(false)])
                }))
            }
        }
    }

    fn reduce(mut state: PlannerRouteState, mutation: PlannerRouteMutation) -> PlannerRouteState {
        match mutation {
            PlannerRouteMutation::SetLoadState(load_state) => {
                state.load_state = load_state;
                state
            }
            PlannerRouteMutation::SetJourney(journey) => {
                state.route = journey
                    .pikidays
                    .get(state.day_index)
                    .map(|day| day.pikis.clone())
                    .unwrap_or_default();
                state.journey = Some(journey);
                state.rebuild()
            }
            PlannerRouteMutation::AppendRoute(pik) => {
                if !state.route.iter().any(|p| p.id == pik.id) {
                    state.route.push(pik);
                }
                state.rebuild()
            }
            PlannerRouteMutation::RemoveRoute(order) => {
                if order < state.route.len() {
                    state.route.remove(order);
                }
                state.rebuild()
            }
            PlannerRouteMutation::SetUploading(uploading) => {
                state.is_uploading = uploading;
                state
            }
            PlannerRouteMutation::SetPopToPlanner(pop) => {
                state.pop_to_planner = pop;
                state
            }
            PlannerRouteMutation::SetGuide(guide) => {
                state.guide = guide;
                state
            }
        }
    }
}
