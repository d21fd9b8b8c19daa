use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JypError {
    #[error("pikmi '{0}' not found in journey")]
    PikmiNotFound(String),

    #[error("day {0} is out of range for this journey")]
    DayOutOfRange(usize),

    /// The API answered with a non-success envelope. The message is shown to
    /// the user as-is.
    #[error("{message}")]
    Server { code: String, message: String },

    #[error("not signed in: no access token stored")]
    Unauthenticated,

    #[error("'{0}' is not a valid id")]
    InvalidPathSegment(String),

    #[error("invalid auth vendor '{0}', expected 'apple' or 'kakao'")]
    InvalidAuthVendor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(String),
}

impl JypError {
    /// Build a server error from an envelope's code and message.
    pub fn server(code: impl Into<String>, message: impl Into<String>) -> Self {
        JypError::Server {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Text suitable for a guide label. Server errors surface the server's
    /// own message; everything else falls back to the Display form.
    pub fn user_message(&self) -> String {
        match self {
            JypError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JypError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_surfaces_message_only() {
        let err = JypError::server("40400", "존재하지 않는 여행입니다");
        assert_eq!(err.to_string(), "존재하지 않는 여행입니다");
        assert_eq!(err.user_message(), "존재하지 않는 여행입니다");
    }

    #[test]
    fn test_user_message_for_non_server_error() {
        let err = JypError::Unauthenticated;
        assert_eq!(err.user_message(), "not signed in: no access token stored");
    }
}
