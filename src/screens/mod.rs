//! Screen reactors.
//!
//! Each screen owns its Action, Mutation and State types and implements
//! [`Reactor`](crate::reactor::Reactor). Service results come back as
//! mutations; navigation is recorded in state as a target for the renderer.

pub mod create_planner_tag;
pub mod create_profile;
pub mod discussion;
pub mod join_planner;
pub mod journey_plan;
pub mod onboarding_sign_up;
pub mod planner_home;
pub mod planner_route;

pub use create_planner_tag::{
    CreatePlannerTag, CreatePlannerTagAction, CreatePlannerTagMutation, CreatePlannerTagState,
};
pub use create_profile::{
    CreateProfile, CreateProfileAction, CreateProfileMutation, CreateProfileState, ProfileType,
};
pub use discussion::{Discussion, DiscussionAction, DiscussionMutation, DiscussionState};
pub use join_planner::{JoinPlanner, JoinPlannerAction, JoinPlannerMutation, JoinPlannerState};
pub use journey_plan::{
    JourneyPlan, JourneyPlanAction, JourneyPlanMutation, JourneyPlanState, RouteTarget,
};
pub use onboarding_sign_up::{
    NextScreen, OnboardingSignUp, OnboardingSignUpAction, OnboardingSignUpMutation,
    OnboardingSignUpState,
};
pub use planner_home::{PlannerHome, PlannerHomeAction, PlannerHomeMutation, PlannerHomeState};
pub use planner_route::{PlannerRoute, PlannerRouteAction, PlannerRouteMutation, PlannerRouteState};

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::model::Journey;
use crate::reactor::{MutationSource, broadcast_source};
use crate::remote::{JourneyEvent, JourneyService};

/// Progress of a screen's fetch.
///
/// `Idle -> Loading` on the first fetch, `Loading -> Loaded | Failed` when
/// the result arrives, and back to `Loading` on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Holds the message shown to the user
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Refetch `journey_id` whenever a matching [`JourneyEvent`] is announced and
/// map the result to mutations.
pub(crate) fn journey_refetch_source<M, F>(
    journeys: &JourneyService,
    journey_id: &str,
    wants: fn(&JourneyEvent) -> bool,
    to_mutations: F,
) -> MutationSource<M>
where
    M: Send + 'static,
    F: Fn(Result<Journey>) -> Vec<M> + Send + Sync + 'static,
{
    let filter_id = journey_id.to_string();
    let fetch_id = journey_id.to_string();
    let service = journeys.clone();
    let to_mutations = Arc::new(to_mutations);

    broadcast_source(journeys.subscribe(), move |event: JourneyEvent| {
        (event.journey_id() == filter_id && wants(&event)).then_some(())
    })
    .then(move |()| {
        let service = service.clone();
        let id = fetch_id.clone();
        let to_mutations = to_mutations.clone();
        async move {
            tracing::debug!(journey_id = %id, "Refetching journey after change");
            to_mutations(service.fetch_journey(&id).await)
        }
    })
    .flat_map(stream::iter)
    .boxed()
}
