//! Error types for the zone record client.
//!
//! # Design
//! Three failure kinds matter to callers of the write path: the record was
//! rejected locally (`Validation`), the service answered with a status other
//! than the operation's single success code (`Remote`), or no answer came
//! back at all (`Transport`). None of them is retried here.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by `ZoneClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status carried by a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A record failed its required-field check before any request was built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Wire names of the failing fields, in `name`, `type`, `ttl`, `rdata` order.
    pub fields: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record validation failed: missing {}", self.fields.join(", "))
    }
}

/// The service answered with a status other than the expected one.
#[derive(Debug, Clone, Error)]
pub struct RemoteError {
    pub status: u16,
    pub body: String,
    pub problem: Option<Problem>,
}

impl RemoteError {
    pub fn new(status: u16, body: String) -> Self {
        let problem = serde_json::from_str::<Problem>(&body).ok();
        Self {
            status,
            body,
            problem,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self
            .problem
            .as_ref()
            .and_then(|p| p.detail.as_deref())
            .unwrap_or(&self.body);
        write!(f, "HTTP {}: {detail}", self.status)
    }
}

/// Problem document returned by the service on failure.
///
/// Every field is optional; bodies that are not JSON objects leave
/// `RemoteError::problem` empty instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Problem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub instance: Option<String>,
}

/// The session could not produce any response.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors produced while loading `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid base path: {0}")]
    InvalidBasePath(String),
    #[error("Invalid gate scope: {0}")]
    InvalidGateScope(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_decodes_problem_body() {
        let err = RemoteError::new(
            409,
            r#"{"type":"https://problems.example/conflict","title":"Conflict","detail":"record set exists","status":409}"#
                .to_string(),
        );
        let problem = err.problem.as_ref().unwrap();
        assert_eq!(problem.title.as_deref(), Some("Conflict"));
        assert_eq!(problem.status, Some(409));
        assert_eq!(err.to_string(), "HTTP 409: record set exists");
    }

    #[test]
    fn remote_error_keeps_raw_body_when_not_json() {
        let err = RemoteError::new(500, "internal error".to_string());
        assert!(err.problem.is_none());
        assert_eq!(err.to_string(), "HTTP 500: internal error");
    }

    #[test]
    fn validation_error_lists_fields() {
        let err = ValidationError {
            fields: vec!["name", "ttl"],
        };
        assert_eq!(err.to_string(), "record validation failed: missing name, ttl");
    }

    #[test]
    fn transport_error_exposes_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::from(TransportError::with_source("connect failed", io));
        assert!(err.source().is_some());
        assert_eq!(err.status(), None);
    }
}
