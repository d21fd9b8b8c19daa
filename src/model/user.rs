use serde::{Deserialize, Serialize};

use super::PersonalityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub profile_image_path: String,
    /// Some payloads (liker lists) omit the personality entirely.
    #[serde(default, alias = "personalityId")]
    pub personality: PersonalityId,
}

impl User {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: String::new(),
            profile_image_path: String::new(),
            personality: PersonalityId::default(),
        }
    }
}

/// Request body for creating the current user after onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub profile_image_path: String,
    pub personality_id: PersonalityId,
}

/// Partial update of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_path: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.profile_image_path.is_none()
    }
}

/// Identity provider used to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthVendor {
    Apple,
    Kakao,
}

impl std::fmt::Display for AuthVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthVendor::Apple => write!(f, "apple"),
            AuthVendor::Kakao => write!(f, "kakao"),
        }
    }
}

impl std::str::FromStr for AuthVendor {
    type Err = crate::error::JypError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apple" => Ok(AuthVendor::Apple),
            "kakao" => Ok(AuthVendor::Kakao),
            _ => Err(crate::error::JypError::InvalidAuthVendor(s.to_string())),
        }
    }
}
