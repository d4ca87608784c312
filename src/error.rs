//! Error types shared by routing, dispatch and error rendering.
//!
//! Two kinds of failure travel through the crate:
//!
//! - [`ConfigurationError`]: the application was wired up wrongly (a route points at a
//!   controller action nobody registered, an action identifier is malformed). These are
//!   fatal and never retried.
//! - [`RequestError`]: an expected, status-carrying signal that the request should be
//!   answered with an error page. The outer layer hands these to the
//!   [`RequestExceptionHandler`](crate::error_handler::RequestExceptionHandler).

use std::fmt;

use crate::server::status_reason;

/// An error carrying the HTTP status code it should be answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    status: u16,
    message: Option<String>,
}

impl RequestError {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            message: None,
        }
    }

    /// Attach a human readable message. Only shown on error pages in debug mode.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(400)
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(401)
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(403)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404)
    }

    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(405)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(500)
    }

    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(503)
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, status_reason(self.status))?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestError {}

/// The application is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An action identifier is not of the form `Class::method`.
    MalformedTarget {
        /// The identifier as written on the route
        target: String,
    },
    /// A route names a controller action that was never registered.
    UnregisteredAction {
        /// Controller part of the identifier
        controller: String,
        /// Method part of the identifier
        method: String,
    },
    /// The same action identifier was registered twice.
    DuplicateAction {
        /// The identifier registered twice
        target: String,
    },
    /// A route pattern could not be compiled.
    InvalidRoutePattern {
        /// The pattern as written
        pattern: String,
        /// Why compilation failed
        reason: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MalformedTarget { target } => write!(
                f,
                "configuration error: action '{target}' is not of the form Controller::method"
            ),
            ConfigurationError::UnregisteredAction { controller, method } => write!(
                f,
                "configuration error: '{controller}::{method}' is not a registered controller action. \
                All controllers must implement waypoint::controller::Controller and be registered"
            ),
            ConfigurationError::DuplicateAction { target } => {
                write!(f, "configuration error: action '{target}' is registered twice")
            }
            ConfigurationError::InvalidRoutePattern { pattern, reason } => {
                write!(f, "configuration error: invalid route pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Everything that can go wrong while dispatching a route.
#[derive(Debug)]
pub enum DispatchError {
    /// Fatal wiring mistake; answered with a 500.
    Configuration(ConfigurationError),
    /// Status-carrying error raised by a filter or an action.
    Request(RequestError),
    /// The action's return value could not be turned into a response body.
    Serialization(serde_json::Error),
}

impl DispatchError {
    /// The status code the error should be answered with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::Request(err) => err.status(),
            DispatchError::Configuration(_) | DispatchError::Serialization(_) => 500,
        }
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, DispatchError::Configuration(_))
    }

    /// Collapse into the status-carrying form used for rendering error views.
    ///
    /// Internal failures keep their description as the message; it only reaches the
    /// client when the application runs in debug mode.
    #[must_use]
    pub fn into_request_error(self) -> RequestError {
        match self {
            DispatchError::Request(err) => err,
            other => RequestError::internal().with_message(other.to_string()),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Configuration(err) => fmt::Display::fmt(err, f),
            DispatchError::Request(err) => fmt::Display::fmt(err, f),
            DispatchError::Serialization(err) => {
                write!(f, "failed to serialize action result: {err}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Configuration(err) => Some(err),
            DispatchError::Request(err) => Some(err),
            DispatchError::Serialization(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for DispatchError {
    fn from(err: ConfigurationError) -> Self {
        DispatchError::Configuration(err)
    }
}

impl From<RequestError> for DispatchError {
    fn from(err: RequestError) -> Self {
        DispatchError::Request(err)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Serialization(err)
    }
}
