use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::controller::{ActionContext, ControllerRegistry};
use crate::error::DispatchError;
use crate::middleware::Middleware;
use crate::router::{Action, Route};
use crate::server::{Request, Response};

/// Invokes the action behind a [`Route`] and produces the [`Response`].
///
/// The dispatcher owns the controller registry it resolves `Controller::method`
/// identifiers against and the middleware chain wrapped around every action.
#[derive(Clone, Default)]
pub struct Dispatcher {
    controllers: Arc<ControllerRegistry>,
    /// Ordered list of middleware to apply to requests/responses
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    /// A dispatcher that can run closures and the given controller actions.
    #[must_use]
    pub fn new(controllers: ControllerRegistry) -> Self {
        Self {
            controllers: Arc::new(controllers),
            middlewares: Vec::new(),
        }
    }

    /// A dispatcher sharing an existing registry.
    #[must_use]
    pub fn with_controllers(controllers: Arc<ControllerRegistry>) -> Self {
        Self {
            controllers,
            middlewares: Vec::new(),
        }
    }

    /// Add middleware to the processing pipeline
    ///
    /// `before` hooks run in insertion order, `after` hooks likewise.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Run the route's action and return the response.
    ///
    /// For a closure, the closure receives `(request, response, params)` and its
    /// result becomes the body. For a controller action the controller is built,
    /// then its before filter, the action and its after filter run in that order.
    ///
    /// A middleware `before` hook returning a response skips the action entirely.
    ///
    /// Errors raised by filters or actions propagate unchanged, and no after filter or
    /// after middleware runs here. [`Application::handle`](crate::app::Application::handle)
    /// runs the after middleware on the rendered error page instead.
    pub fn dispatch(&self, request: &Request, route: &Route) -> Result<Response, DispatchError> {
        let (mut response, latency) = match self.run_before(request) {
            Some(response) => (response, Duration::ZERO),
            None => {
                let start = Instant::now();
                let response = self.invoke(request, route)?;
                (response, start.elapsed())
            }
        };

        self.run_after(request, &mut response, latency);
        Ok(response)
    }

    /// Run every `before` hook in order and return the first early response.
    ///
    /// Hooks after the one that answered still run, and each middleware is told about
    /// the short circuit.
    pub(crate) fn run_before(&self, request: &Request) -> Option<Response> {
        let request_id = request.request_id;

        debug!(
            request_id = %request_id,
            middleware_count = self.middlewares.len(),
            "Middleware before execution"
        );

        let mut early_resp: Option<Response> = None;
        for (idx, mw) in self.middlewares.iter().enumerate() {
            if early_resp.is_none() {
                early_resp = mw.before(request);
                if early_resp.is_some() {
                    debug!(
                        request_id = %request_id,
                        middleware_idx = idx,
                        middleware_name = std::any::type_name_of_val(mw.as_ref()),
                        "Middleware returned early response"
                    );
                }
            } else {
                mw.before(request);
            }
        }

        if let Some(response) = &early_resp {
            for mw in &self.middlewares {
                mw.on_short_circuit(request, response);
            }
        }
        early_resp
    }

    /// Run every `after` hook in order on the final response.
    pub(crate) fn run_after(&self, request: &Request, response: &mut Response, latency: Duration) {
        debug!(
            request_id = %request.request_id,
            response_status = response.status,
            latency_ms = latency.as_millis() as u64,
            "Middleware after execution"
        );

        for mw in &self.middlewares {
            mw.after(request, response, latency);
        }
    }

    fn invoke(&self, request: &Request, route: &Route) -> Result<Response, DispatchError> {
        let mut response = Response::new();

        info!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            route_pattern = %route.pattern,
            action = %route.action,
            params = route.parameters.len(),
            "Request dispatched to action"
        );

        let start = Instant::now();
        let result = match &route.action {
            Action::Closure(f) => f(request, &mut response, &route.parameters)
                .map(|body| response.set_body(body)),
            Action::Controller(target) => {
                let mut cx = ActionContext::new(request, &mut response);
                self.controllers.invoke(target, &mut cx, &route.parameters)
            }
        };

        match result {
            Ok(()) => {
                info!(
                    request_id = %request.request_id,
                    action = %route.action,
                    latency_ms = start.elapsed().as_millis() as u64,
                    status = response.status,
                    "Action completed"
                );
                Ok(response)
            }
            Err(err) => {
                if err.is_configuration() {
                    error!(
                        request_id = %request.request_id,
                        action = %route.action,
                        error = %err,
                        "Action could not be dispatched - CRITICAL"
                    );
                } else {
                    warn!(
                        request_id = %request.request_id,
                        action = %route.action,
                        status = err.status(),
                        error = %err,
                        "Action raised an error"
                    );
                }
                Err(err)
            }
        }
    }
}
