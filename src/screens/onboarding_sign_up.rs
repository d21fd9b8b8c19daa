//! Sign-in step of onboarding.

use std::sync::Arc;

use crate::error::JypError;
use crate::model::AuthVendor;
use crate::provider::ServiceProvider;
use crate::reactor::{Mutations, Reactor};
use crate::remote::{AuthService, UserService};
use crate::storage::{PreferenceKey, Preferences};

/// Where onboarding continues after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextScreen {
    /// The account has no user yet: ask the personality questions
    OnboardingQuestion,
    TabBar,
}

pub struct OnboardingSignUp {
    auth: AuthService,
    users: UserService,
    preferences: Arc<dyn Preferences>,
}

impl OnboardingSignUp {
    pub fn new(provider: &ServiceProvider) -> Self {
        Self {
            auth: provider.auth.clone(),
            users: provider.users.clone(),
            preferences: provider.preferences.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingSignUpAction {
    Login {
        vendor: AuthVendor,
        token: String,
        /// Name offered by the identity provider, if any
        name: Option<String>,
        profile_image_path: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingSignUpMutation {
    SetLoading(bool),
    SetNextScreen(Option<NextScreen>),
    SetGuide(Option<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingSignUpState {
    pub is_loading: bool,
    pub next_screen: Option<NextScreen>,
    pub guide: Option<String>,
}

impl Reactor for OnboardingSignUp {
    type Action = OnboardingSignUpAction;
    type Mutation = OnboardingSignUpMutation;
    type State = OnboardingSignUpState;

    fn initial_state(&self) -> OnboardingSignUpState {
        OnboardingSignUpState::default()
    }

    fn mutate(
        &self,
        _state: &OnboardingSignUpState,
        action: OnboardingSignUpAction,
    ) -> Mutations<OnboardingSignUpMutation> {
        match action {
            OnboardingSignUpAction::Login {
                vendor,
                token,
                name,
                profile_image_path,
            } => {
                let auth = self.auth.clone();
                let users = self.users.clone();
                let preferences = self.preferences.clone();

                Mutations::from(vec![
                    OnboardingSignUpMutation::SetNextScreen(None),
                    OnboardingSignUpMutation::SetGuide(None),
                    OnboardingSignUpMutation::SetLoading(true),
                ])
                .then(Mutations::effect(async move {
                    if let Some(name) = name.filter(|n| !n.is_empty()) {
                        preferences.set(PreferenceKey::Nickname, &name);
                    }
                    if let Some(path) = profile_image_path.filter(|p| !p.is_empty()) {
                        preferences.set(PreferenceKey::ProfileImagePath, &path);
                    }

                    let outcome = match auth.login(vendor, &token).await {
                        Ok(()) => match users.fetch_me().await {
                            Ok(_) => OnboardingSignUpMutation::SetNextScreen(Some(NextScreen::TabBar)),
                            // Signed in, but the user was never created.
                            Err(JypError::Server { .. }) => OnboardingSignUpMutation::SetNextScreen(
                                Some(NextScreen::OnboardingQuestion),
                            ),
                            Err(e) => {
                                tracing::warn!("Failed to fetch current user: {e}");
                                OnboardingSignUpMutation::SetGuide(Some(e.user_message()))
                            }
                        },
                        Err(e) => {
                            tracing::warn!(%vendor, "Sign in failed: {e}");
                            OnboardingSignUpMutation::SetGuide(Some(e.user_message()))
                        }
                    };
                    Mutations::from(vec![outcome, OnboardingSignUpMutation::SetLoading(false)])
                }))
            }
        }
    }

    fn reduce(
        mut state: OnboardingSignUpState,
        mutation: OnboardingSignUpMutation,
    ) -> OnboardingSignUpState {
        match mutation {
            OnboardingSignUpMutation::SetLoading(loading) => state.is_loading = loading,
            OnboardingSignUpMutation::SetNextScreen(next) => state.next_screen = next,
            OnboardingSignUpMutation::SetGuide(guide) => state.guide = guide,
        }
        state
    }
}
