use std::time::Duration;

use crate::server::{Request, Response};

/// Hooks wrapped around every dispatched action.
///
/// `before` may answer the request itself by returning a response, in which case the
/// action is skipped and every middleware sees `on_short_circuit` before its `after`.
/// `after` sees the final response and the time the action took.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &Request) -> Option<Response> {
        None
    }
    fn on_short_circuit(&self, _req: &Request, _res: &Response) {}
    fn after(&self, _req: &Request, _res: &mut Response, _latency: Duration) {}
}
