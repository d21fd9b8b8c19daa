use std::sync::Arc;

use serde_json::Value;

use crate::error::{JypError, Result};
use crate::model::{CreateUserRequest, UpdateUserRequest, User};
use crate::storage::{PreferenceKey, Preferences};

use super::envelope::DUPLICATE_USER_CODE;
use super::{ApiRequest, Envelope, Transport};

/// User endpoints. Remembers the signed-in user's id in preferences.
#[derive(Clone)]
pub struct UserService {
    transport: Arc<dyn Transport>,
    preferences: Arc<dyn Preferences>,
}

impl UserService {
    pub fn new(transport: Arc<dyn Transport>, preferences: Arc<dyn Preferences>) -> Self {
        Self {
            transport,
            preferences,
        }
    }

    /// Fetch the signed-in user and remember its id.
    pub async fn fetch_me(&self) -> Result<User> {
        let user: User = self.transport.send(ApiRequest::get(["users", "me"])).await?.into_data()?;
        self.remember(&user);
        Ok(user)
    }

    pub async fn fetch_user(&self, id: &str) -> Result<User> {
        self.transport
            .send(ApiRequest::get(["users", id]))
            .await?
            .into_data()
    }

    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> Result<User> {
        let request = ApiRequest::patch(["users", id]).json(request)?;
        self.transport.send(request).await?.into_data()
    }

    /// Create the signed-in user.
    ///
    /// When the account already exists the server answers with
    /// [`DUPLICATE_USER_CODE`] and embeds the existing id in its message; the
    /// user is then rebuilt from that id and the request's own fields.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        let envelope = self
            .transport
            .send(ApiRequest::post(["users"]).json(request)?)
            .await?;

        let user = if envelope.code == DUPLICATE_USER_CODE {
            existing_user(envelope, request)?
        } else {
            envelope.into_data()?
        };

        self.remember(&user);
        Ok(user)
    }

    fn remember(&self, user: &User) {
        tracing::debug!(user_id = %user.id, "Remembering current user");
        self.preferences.set(PreferenceKey::UserId, &user.id);
    }
}

fn existing_user(envelope: Envelope<Value>, request: &CreateUserRequest) -> Result<User> {
    match recover_user_id(&envelope.message) {
        Some(id) => {
            tracing::debug!(user_id = %id, "User already exists, reusing id");
            Ok(User {
                id,
                nickname: request.name.clone(),
                profile_image_path: request.profile_image_path.clone(),
                personality: request.personality_id,
            })
        }
        None => {
            tracing::warn!("Duplicate user response without a recoverable id");
            Err(JypError::server(envelope.code, envelope.message))
        }
    }
}

/// Pull the id out of a duplicate-key message such as
/// `E11000 duplicate key error ... dup key: { _id: "abc" }`.
pub fn recover_user_id(message: &str) -> Option<String> {
    let start = message.find("_id:")? + "_id:".len();
    let end = start + message[start..].find('}')?;
    let id: String = message[start..end].chars().filter(|c| *c != '"').collect();
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}
