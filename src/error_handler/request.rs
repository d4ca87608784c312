use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::server::{status_reason, Response};
use crate::view::{ViewError, ViewFactory};

/// Fallback view used when there is none for the specific status.
pub const DEFAULT_ERROR_VIEW: &str = "errors.default";

#[derive(Debug, Serialize)]
struct ErrorContext<'a> {
    status: u16,
    reason: &'static str,
    message: Option<&'a str>,
}

/// Renders a [`RequestError`] as an error page.
///
/// ```
/// use std::sync::Arc;
/// use waypoint::error::RequestError;
/// use waypoint::error_handler::RequestExceptionHandler;
/// use waypoint::view::ViewFactory;
///
/// let handler = RequestExceptionHandler::new(RequestError::not_found(), Arc::new(ViewFactory::new()));
/// let mut out = Vec::new();
/// handler.handle(&mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().starts_with("HTTP/1.1 404 Not Found\r\n"));
/// ```
#[derive(Debug)]
pub struct RequestExceptionHandler {
    error: RequestError,
    views: Arc<ViewFactory>,
    debug: bool,
}

impl RequestExceptionHandler {
    #[must_use]
    pub fn new(error: RequestError, views: Arc<ViewFactory>) -> Self {
        Self {
            error,
            views,
            debug: false,
        }
    }

    /// Pass the error message to the view.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn error(&self) -> &RequestError {
        &self.error
    }

    /// Build the error page without sending it.
    #[must_use]
    pub fn response(&self) -> Response {
        let status = self.error.status();
        let reason = status_reason(status);
        let ctx = ErrorContext {
            status,
            reason,
            message: if self.debug { self.error.message() } else { None },
        };

        let view = format!("errors.{status}");
        let rendered = match self.views.render(&view, &ctx) {
            Err(ViewError::NotFound { .. }) => {
                debug!(status, view = %view, "No view for status, using default error view");
                self.views.render(DEFAULT_ERROR_VIEW, &ctx)
            }
            other => other,
        };

        match rendered {
            Ok(html) => Response::html(status, html),
            Err(err) => {
                warn!(status, error = %err, "Error view unavailable, sending plain text");
                Response::text(status, format!("{status} {reason}"))
            }
        }
    }

    /// Render the error page and send it to `out`.
    pub fn handle<W: Write + ?Sized>(self, out: &mut W) -> io::Result<()> {
        self.response().send(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn views() -> Arc<ViewFactory> {
        Arc::new(ViewFactory::new())
    }

    #[test]
    fn test_status_view_is_rendered() {
        let res = RequestExceptionHandler::new(RequestError::not_found(), views()).response();
        assert_eq!(res.status, 404);
        assert_eq!(res.content_type(), "text/html; charset=utf-8");
        assert!(res.body_text().contains("could not be found"));
    }

    #[test]
    fn test_unknown_status_uses_default_view() {
        let res = RequestExceptionHandler::new(RequestError::new(418), views()).response();
        assert_eq!(res.status, 418);
        assert!(res.body_text().contains("<h1>418 "));
        assert!(res.body_text().contains("could not be completed"));
    }

    #[test]
    fn test_message_only_in_debug() {
        let err = RequestError::forbidden().with_message("admins only");
        let quiet = RequestExceptionHandler::new(err.clone(), views()).response();
        assert!(!quiet.body_text().contains("admins only"));

        let loud = RequestExceptionHandler::new(err, views()).debug(true).response();
        assert!(loud.body_text().contains("admins only"));
    }

    #[test]
    fn test_plain_text_when_no_view_renders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("errors")).unwrap();
        fs::write(dir.path().join("errors/default.html"), "{% if %}").unwrap();
        let views = Arc::new(ViewFactory::with_views_dir(dir.path()));

        let res = RequestExceptionHandler::new(RequestError::new(422), views).response();
        assert_eq!(res.status, 422);
        assert_eq!(res.body_text(), "422 Unprocessable Entity");
        assert_eq!(res.content_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_handle_writes_http_response() {
        let mut out = Vec::new();
        RequestExceptionHandler::new(RequestError::service_unavailable(), views())
            .handle(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
        assert!(text.contains("content-type: text/html; charset=utf-8\r\n"));
        assert!(text.contains("temporarily unavailable"));
    }
}
