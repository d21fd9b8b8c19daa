//! The `{code, message, data}` envelope every API response is wrapped in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JypError, Result};

pub const SUCCESS_CODE: &str = "20000";
/// Returned by user creation when the account already exists.
pub const DUPLICATE_USER_CODE: &str = "50000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Turn a non-success envelope into a server error, keeping the message.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(JypError::server(self.code, self.message))
        }
    }
}

impl Envelope<Value> {
    pub fn success(data: Value) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        }
    }

    /// Decode a successful payload. A success envelope without data is a
    /// server error too: callers asked for an entity and got none.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        let envelope = self.ensure_success()?;
        match envelope.data {
            Some(Value::Null) | None => Err(JypError::server(envelope.code, envelope.message)),
            Some(data) => Ok(serde_json::from_value(data)?),
        }
    }

    /// Check success and discard any payload.
    pub fn into_unit(self) -> Result<()> {
        self.ensure_success().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
    }

    #[test]
    fn test_into_data_success() {
        let env = Envelope::success(json!({"id": "x"}));
        let thing: Thing = env.into_data().unwrap();
        assert_eq!(thing, Thing { id: "x".to_string() });
    }

    #[test]
    fn test_into_data_server_error_keeps_message() {
        let env = Envelope::failure("40000", "잘못된 요청입니다");
        let err = env.into_data::<Thing>().unwrap_err();
        assert!(matches!(&err, JypError::Server { code, .. } if code == "40000"));
        assert_eq!(err.user_message(), "잘못된 요청입니다");
    }

    #[test]
    fn test_into_data_missing_payload() {
        let env: Envelope<Value> =
            serde_json::from_str(r#"{"code": "20000", "message": "OK"}"#).unwrap();
        assert!(env.clone().into_data::<Thing>().is_err());
        assert!(env.into_unit().is_ok());
    }

    #[test]
    fn test_into_data_decode_failure() {
        let env = Envelope::success(json!({"nope": 1}));
        assert!(matches!(env.into_data::<Thing>(), Err(JypError::Json(_))));
    }
}
