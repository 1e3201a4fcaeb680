// Error types for the Uptime Robot client.
//
// Remote failures keep only what callers need from the HTTP exchange
// (status, body text and an optional structured reason) so the error type
// does not leak reqwest's response object.

use crate::model::ApiErrorDetail;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A failed exchange with the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub status: u16,
    pub body: String,
    /// Parsed `error` object from a `stat: "fail"` envelope, the full body
    /// when that object is missing, or a decode failure message.
    pub extra: Option<Value>,
}

impl ApiFailure {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiFailure {
            status,
            body: body.into(),
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    /// The structured reason, when `extra` holds the service's error object.
    pub fn detail(&self) -> Option<ApiErrorDetail> {
        self.extra
            .clone()
            .and_then(|e| serde_json::from_value(e).ok())
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(detail) = self.detail() {
            write!(f, "{}: {}", detail.kind, detail.message)?;
            if let Some(param) = &detail.parameter_name {
                write!(f, " (parameter '{}')", param)?;
            }
            return Ok(());
        }
        write!(f, "HTTP {} - {}", self.status, self.body)?;
        if let Some(extra) = &self.extra {
            write!(f, " ({})", extra)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum UptimeError {
    #[error("Rate limited by Uptime Robot: {0}")]
    RateLimited(ApiFailure),

    #[error("Uptime Robot request failed: {0}")]
    Remote(ApiFailure),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UptimeError {
    fn failure(&self) -> Option<&ApiFailure> {
        match self {
            UptimeError::RateLimited(f) | UptimeError::Remote(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, UptimeError::RateLimited(_))
    }

    pub fn status(&self) -> Option<u16> {
        self.failure().map(|f| f.status)
    }

    pub fn body(&self) -> Option<&str> {
        self.failure().map(|f| f.body.as_str())
    }

    pub fn extra(&self) -> Option<&Value> {
        self.failure().and_then(|f| f.extra.as_ref())
    }
}

pub type Result<T> = std::result::Result<T, UptimeError>;
