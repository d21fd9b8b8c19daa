//! Profile picker at the end of onboarding. Creates the user.

use std::sync::Arc;

use crate::model::{CreateUserRequest, PersonalityId, User};
use crate::provider::ServiceProvider;
use crate::reactor::{Mutations, Reactor};
use crate::remote::UserService;
use crate::storage::{PreferenceKey, Preferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    /// The personality's illustration
    Default,
    /// The image offered by the identity provider
    My,
}

pub struct CreateProfile {
    users: UserService,
    preferences: Arc<dyn Preferences>,
}

impl CreateProfile {
    pub fn new(provider: &ServiceProvider) -> Self {
        Self {
            users: provider.users.clone(),
            preferences: provider.preferences.clone(),
        }
    }

    fn request(&self, profile_type: Option<ProfileType>) -> CreateUserRequest {
        let personality = self
            .preferences
            .get(PreferenceKey::Personality)
            .map(|title| PersonalityId::from_title(&title))
            .unwrap_or_default();

        let profile_image_path = match profile_type {
            Some(ProfileType::My) => self
                .preferences
                .get(PreferenceKey::ProfileImagePath)
                .unwrap_or_default(),
            Some(ProfileType::Default) | None => personality.default_image_path().to_string(),
        };

        CreateUserRequest {
            name: self.preferences.get(PreferenceKey::Nickname).unwrap_or_default(),
            profile_image_path,
            personality_id: personality,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateProfileAction {
    TapProfileBox,
    TapDefaultProfileBox,
    TapButton,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateProfileMutation {
    SetProfileType(ProfileType),
    SetCreating(bool),
    SetCreatedUser(User),
    SetGuide(Option<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateProfileState {
    pub profile_type: Option<ProfileType>,
    /// The confirm button is enabled once a profile type is picked
    pub is_active: bool,
    pub is_creating: bool,
    pub created_user: Option<User>,
    pub guide: Option<String>,
}

impl Reactor for CreateProfile {
    type Action = CreateProfileAction;
    type Mutation = CreateProfileMutation;
    type State = CreateProfileState;

    fn initial_state(&self) -> CreateProfileState {
        CreateProfileState::default()
    }

    fn mutate(
        &self,
        state: &CreateProfileState,
        action: CreateProfileAction,
    ) -> Mutations<CreateProfileMutation> {
        match action {
            CreateProfileAction::TapProfileBox => {
                Mutations::just(CreateProfileMutation::SetProfileType(ProfileType::My))
            }
            CreateProfileAction::TapDefaultProfileBox => {
                Mutations::just(CreateProfileMutation::SetProfileType(ProfileType::Default))
            }
            CreateProfileAction::TapButton => {
                let request = self.request(state.profile_type);
                let users = self.users.clone();
                tracing::debug!(personality = %request.personality_id.code(), "Creating user");

                Mutations::from(vec![
                    CreateProfileMutation::SetGuide(None),
                    CreateProfileMutation::SetCreating(true),
                ])
                .then(Mutations::effect(async move {
                    let outcome = match users.create_user(&request).await {
                        Ok(user) => CreateProfileMutation::SetCreatedUser(user),
                        Err(e) => {
                            tracing::warn!("Failed to create user: {e}");
                            CreateProfileMutation::SetGuide(Some(e.user_message()))
                        }
                    };
                    Mutations::from(vec![outcome, CreateProfileMutation::SetCreating(false)])
                }))
            }
        }
    }

    fn reduce(mut state: CreateProfileState, mutation: CreateProfileMutation) -> CreateProfileState {
        match mutation {
            CreateProfileMutation::SetProfileType(profile_type) => {
                state.profile_type = Some(profile_type);
                state.is_active = true;
            }
            CreateProfileMutation::SetCreating(creating) => state.is_creating = creating,
            CreateProfileMutation::SetCreatedUser(user) => state.created_user = Some(user),
            CreateProfileMutation::SetGuide(guide) => state.guide = guide,
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::{Store, apply};
    use crate::screens::testing::provider;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_profile_type_activates_button() {
        let (_, provider) = provider();
        let reactor = CreateProfile::new(&provider);
        let state = reactor.initial_state();
        assert!(!state.is_active);

        let state = apply(&reactor, state, CreateProfileAction::TapProfileBox);
        assert_eq!(state.profile_type, Some(ProfileType::My));
        assert!(state.is_active);

        let state = apply(&reactor, state, CreateProfileAction::TapDefaultProfileBox);
        assert_eq!(state.profile_type, Some(ProfileType::Default));
    }

    #[test]
    fn test_request_uses_personality_default_image() {
        let (_, provider) = provider();
        provider.preferences.set(PreferenceKey::Nickname, "여행자");
        provider
            .preferences
            .set(PreferenceKey::Personality, PersonalityId::Pe.title());
        provider
            .preferences
            .set(PreferenceKey::ProfileImagePath, "https://img.example/me.png");
        let reactor = CreateProfile::new(&provider);

        let default = reactor.request(Some(ProfileType::Default));
        assert_eq!(default.personality_id, PersonalityId::Pe);
        assert_eq!(default.profile_image_path, "profile/default_pe.png");
        assert_eq!(default.name, "여행자");

        let mine = reactor.request(Some(ProfileType::My));
        assert_eq!(mine.profile_image_path, "https://img.example/me.png");
    }

    #[test]
    fn test_unknown_personality_falls_back() {
        let (_, provider) = provider();
        provider.preferences.set(PreferenceKey::Personality, "???");
        let reactor = CreateProfile::new(&provider);
        assert_eq!(reactor.request(None).personality_id, PersonalityId::Fw);
    }

    #[tokio::test]
    async fn test_tap_button_creates_user() {
        let (transport, provider) = provider();
        transport.respond_ok(
            Method::POST,
            "users",
            json!({"id": "u5", "nickname": "여행자", "personality": "FW"}),
        );

        let store = Store::spawn(CreateProfile::new(&provider));
        store.send(CreateProfileAction::TapDefaultProfileBox);
        store.send(CreateProfileAction::TapButton);

        let state = store
            .wait_for(|s| s.created_user.is_some() && !s.is_creating)
            .await
            .unwrap();
        assert_eq!(state.created_user.unwrap().id, "u5");
        assert_eq!(
            transport.requests()[0].body.as_ref().unwrap()["profileImagePath"],
            "profile/default_fw.png"
        );
        assert_eq!(
            provider.preferences.get(PreferenceKey::UserId).as_deref(),
            Some("u5")
        );
    }
}
