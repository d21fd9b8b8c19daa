//! Join-code entry for an existing planner.

use crate::provider::ServiceProvider;
use crate::reactor::{Mutations, Reactor};
use crate::remote::JourneyService;

pub struct JoinPlanner {
    journeys: JourneyService,
}

impl JoinPlanner {
    pub fn new(provider: &ServiceProvider) -> Self {
        Self {
            journeys: provider.journeys.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinPlannerAction {
    ChangeCode(String),
    /// The clipboard changed; its content is offered as a code suggestion
    ClipboardChanged(Option<String>),
    TapJoin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinPlannerMutation {
    SetCode(String),
    SetClipboardSuggestion(Option<String>),
    SetJoining(bool),
    SetJoinTarget(Option<String>),
    SetGuide(Option<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinPlannerState {
    pub code: String,
    pub clipboard_suggestion: Option<String>,
    pub is_join_active: bool,
    pub is_joining: bool,
    /// Journey whose tag picker should be pushed
    pub join_target: Option<String>,
    /// Shown under the code field
    pub guide: Option<String>,
}

impl Reactor for JoinPlanner {
    type Action = JoinPlannerAction;
    type Mutation = JoinPlannerMutation;
    type State = JoinPlannerState;

    fn initial_state(&self) -> JoinPlannerState {
        JoinPlannerState::default()
    }

    fn mutate(&self, state: &JoinPlannerState, action: JoinPlannerAction) -> Mutations<JoinPlannerMutation> {
        match action {
            JoinPlannerAction::ChangeCode(code) => {
                if code == state.code {
                    return Mutations::empty();
                }
                Mutations::from(vec![
                    JoinPlannerMutation::SetCode(code),
                    JoinPlannerMutation::SetGuide(None),
                ])
            }
            JoinPlannerAction::ClipboardChanged(text) => {
                let suggestion = text
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
                Mutations::just(JoinPlannerMutation::SetClipboardSuggestion(suggestion))
            }
            JoinPlannerAction::TapJoin => {
                let code = state.code.trim().to_string();
                if code.is_empty() || state.is_joining {
                    return Mutations::empty();
                }
                let journeys = self.journeys.clone();

                Mutations::just(JoinPlannerMutation::SetJoining(true)).then(Mutations::effect(
                    async move {
                        let outcome = match journeys.fetch_journey(&code).await {
                            Ok(journey) => JoinPlannerMutation::SetJoinTarget(Some(journey.id)),
                            Err(e) => {
                                tracing::warn!(%code, "Join code rejected: {e}");
                                JoinPlannerMutation::SetGuide(Some(e.user_message()))
                            }
                        };
                        Mutations::from(vec![outcome, JoinPlannerMutation::SetJoining(false)])
                    },
                ))
            }
        }
    }

    fn reduce(mut state: JoinPlannerState, mutation: JoinPlannerMutation) -> JoinPlannerState {
        match mutation {
            JoinPlannerMutation::SetCode(code) => {
                state.is_join_active = !code.trim().is_empty();
                state.code = code;
            }
            JoinPlannerMutation::SetClipboardSuggestion(suggestion) => {
                state.clipboard_suggestion = suggestion
            }
            JoinPlannerMutation::SetJoining(joining) => state.is_joining = joining,
            JoinPlannerMutation::SetJoinTarget(target) => state.join_target = target,
            JoinPlannerMutation::SetGuide(guide) => state.guide = guide,
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::{Store, apply};
    use crate::remote::Envelope;
    use crate::screens::testing::{journey_json, provider};
    use reqwest::Method;

    #[test]
    fn test_join_button_follows_code() {
        let (_, provider) = provider();
        let reactor = JoinPlanner::new(&provider);

        let state = apply(&reactor, reactor.initial_state(), JoinPlannerAction::ChangeCode("j1".to_string()));
        assert!(state.is_join_active);

        let state = apply(&reactor, state, JoinPlannerAction::ChangeCode("  ".to_string()));
        assert!(!state.is_join_active);
    }

    #[test]
    fn test_clipboard_suggestion() {
        let (_, provider) = provider();
        let reactor = JoinPlanner::new(&provider);

        let state = apply(
            &reactor,
            reactor.initial_state(),
            JoinPlannerAction::ClipboardChanged(Some(" j1 \n".to_string())),
        );
        assert_eq!(state.clipboard_suggestion.as_deref(), Some("j1"));

        let state = apply(&reactor, state, JoinPlannerAction::ClipboardChanged(Some(String::new())));
        assert_eq!(state.clipboard_suggestion, None);
    }

    #[test]
    fn test_join_without_code_does_nothing() {
        let (_, provider) = provider();
        let reactor = JoinPlanner::new(&provider);
        let state = apply(&reactor, reactor.initial_state(), JoinPlannerAction::TapJoin);
        assert!(!state.is_joining);
    }

    #[tokio::test]
    async fn test_join_records_target() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1", journey_json());

        let store = Store::spawn(JoinPlanner::new(&provider));
        store.send(JoinPlannerAction::ChangeCode("j1".to_string()));
        store.send(JoinPlannerAction::TapJoin);

        let state = store.wait_for(|s| s.join_target.is_some()).await.unwrap();
        assert_eq!(state.join_target.as_deref(), Some("j1"));
    }

    #[tokio::test]
    async fn test_join_failure_shows_server_message() {
        let (transport, provider) = provider();
        transport.respond(
            Method::GET,
            "journeys/nope",
            Envelope::failure("40400", "존재하지 않는 코드입니다"),
        );

        let store = Store::spawn(JoinPlanner::new(&provider));
        store.send(JoinPlannerAction::ChangeCode("nope".to_string()));
        store.send(JoinPlannerAction::TapJoin);

        let state = store
            .wait_for(|s| s.guide.is_some() && !s.is_joining)
            .await
            .unwrap();
        assert_eq!(state.guide.as_deref(), Some("존재하지 않는 코드입니다"));
        assert_eq!(state.join_target, None);
    }

    #[tokio::test]
    async fn test_pasted_code_stays_one_segment() {
        let (transport, provider) = provider();
        transport.respond_ok(Method::GET, "journeys/j1/../x?y#z", journey_json());

        let store = Store::spawn(JoinPlanner::new(&provider));
        store.send(JoinPlannerAction::ChangeCode("j1/../x?y#z".to_string()));
        store.send(JoinPlannerAction::TapJoin);

        store.wait_for(|s| s.join_target.is_some()).await.unwrap();
        assert_eq!(
            transport.requests()[0].segments,
            vec!["journeys".to_string(), "j1/../x?y#z".to_string()]
        );
    }

    #[tokio::test]
    async fn test_dot_code_is_rejected_before_sending() {
        let (transport, provider) = provider();

        let store = Store::spawn(JoinPlanner::new(&provider));
        store.send(JoinPlannerAction::ChangeCode("..".to_string()));
        store.send(JoinPlannerAction::TapJoin);

        let state = store
            .wait_for(|s| s.guide.is_some() && !s.is_joining)
            .await
            .unwrap();
        assert_eq!(state.guide.as_deref(), Some("'..' is not a valid id"));
        assert!(transport.requests().is_empty());
    }
}
