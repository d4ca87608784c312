use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::ids::REQUEST_ID_HEADER;
use crate::server::{Request, Response};

/// Logs every dispatched request and echoes its id back in `x-request-id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &Request) -> Option<Response> {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            query_params = req.query_params.len(),
            "Request started"
        );
        None
    }

    fn after(&self, req: &Request, res: &mut Response, latency: Duration) {
        res.set_header(REQUEST_ID_HEADER, req.request_id.to_string());
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            "Request finished"
        );
    }
}
