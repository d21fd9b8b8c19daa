use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AuthVendor;
use crate::storage::{CredentialKey, CredentialStore};

use super::{ApiRequest, Transport};

#[derive(Serialize)]
struct AuthRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

/// Exchanges an identity provider token for an API access token.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn apple(&self, token: &str) -> Result<()> {
        self.login(AuthVendor::Apple, token).await
    }

    pub async fn kakao(&self, token: &str) -> Result<()> {
        self.login(AuthVendor::Kakao, token).await
    }

    /// Sign in with `vendor` and store the issued access token.
    pub async fn login(&self, vendor: AuthVendor, token: &str) -> Result<()> {
        let request = ApiRequest::post(["auth".to_string(), vendor.to_string()])
            .json(&AuthRequest { token })?
            .anonymous();
        let response: AuthResponse = self.transport.send(request).await?.into_data()?;

        self.credentials
            .set(CredentialKey::AccessToken, &response.token)
            .inspect_err(|e| tracing::warn!("Failed to store access token: {e}"))?;
        tracing::debug!(%vendor, "Signed in");
        Ok(())
    }

    /// Forget the stored access token.
    pub fn logout(&self) -> Result<()> {
        self.credentials.remove(CredentialKey::AccessToken)?;
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.credentials.get(CredentialKey::AccessToken).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Envelope, MockTransport};
    use crate::storage::MemoryCredentialStore;
    use reqwest::Method;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn service() -> (Arc<MockTransport>, Arc<MemoryCredentialStore>, AuthService) {
        let transport = Arc::new(MockTransport::new());
        let credentials = Arc::new(MemoryCredentialStore::new());
        let service = AuthService::new(transport.clone(), credentials.clone());
        (transport, credentials, service)
    }

    #[tokio::test]
    async fn test_kakao_stores_access_token() {
        let (transport, credentials, service) = service();
        transport.respond_ok(Method::POST, "auth/kakao", json!({"token": "access-1"}));

        service.kakao("vendor-token").await.unwrap();

        let stored = credentials.get(CredentialKey::AccessToken).unwrap();
        assert_eq!(stored.expose_secret(), "access-1");

        let sent = &transport.requests()[0];
        assert!(!sent.authenticated);
        assert_eq!(sent.body, Some(json!({"token": "vendor-token"})));
    }

    #[tokio::test]
    async fn test_failed_login_stores_nothing() {
        let (transport, credentials, service) = service();
        transport.respond(Method::POST, "auth/apple", Envelope::failure("40100", "invalid"));

        assert!(service.apple("bad").await.is_err());
        assert!(credentials.get(CredentialKey::AccessToken).is_none());
        assert!(!service.is_signed_in());
    }

    #[tokio::test]
    async fn test_logout_removes_token() {
        let (transport, _, service) = service();
        transport.respond_ok(Method::POST, "auth/apple", json!({"token": "t"}));

        service.apple("x").await.unwrap();
        assert!(service.is_signed_in());
        service.logout().unwrap();
        assert!(!service.is_signed_in());
    }
}
