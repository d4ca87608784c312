use std::sync::Arc;
use tracing::{error, info, warn};

use super::RequestExceptionHandler;
use crate::error::{DispatchError, RequestError};
use crate::ids::RequestId;
use crate::server::Response;
use crate::view::ViewFactory;

/// Outer error layer: every error that escapes dispatch ends up here.
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    views: Arc<ViewFactory>,
    debug: bool,
}

impl ErrorHandler {
    #[must_use]
    pub fn new(views: Arc<ViewFactory>, debug: bool) -> Self {
        Self { views, debug }
    }

    #[must_use]
    pub fn views(&self) -> &Arc<ViewFactory> {
        &self.views
    }

    /// Map a dispatch failure to an error page.
    ///
    /// Configuration and serialization failures become a 500 and are logged at error
    /// level; their description is only shown in debug mode.
    #[must_use]
    pub fn handle(&self, request_id: RequestId, err: DispatchError) -> Response {
        match &err {
            DispatchError::Configuration(cause) => error!(
                request_id = %request_id,
                error = %cause,
                "Configuration error while dispatching - CRITICAL"
            ),
            DispatchError::Serialization(cause) => error!(
                request_id = %request_id,
                error = %cause,
                "Action result could not be serialized"
            ),
            DispatchError::Request(_) => {}
        }
        self.handle_request_error(request_id, err.into_request_error())
    }

    /// Render a status-carrying error.
    #[must_use]
    pub fn handle_request_error(&self, request_id: RequestId, err: RequestError) -> Response {
        if err.status() >= 500 {
            warn!(request_id = %request_id, status = err.status(), error = %err, "Server error");
        } else {
            info!(request_id = %request_id, status = err.status(), error = %err, "Request error");
        }

        RequestExceptionHandler::new(err, Arc::clone(&self.views))
            .debug(self.debug)
            .response()
    }
}
