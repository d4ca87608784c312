//! # Application
//!
//! The outer layer tying routing, dispatch and error pages together. It is the only
//! place errors are intercepted: a failed lookup becomes a 404/405 page, and anything
//! raised during dispatch is handed to the [`ErrorHandler`]. The middleware `after`
//! hooks run on those pages like on any other response.
//!
//! ```rust
//! use http::Method;
//! use waypoint::app::Application;
//! use waypoint::router::{Action, Router};
//! use waypoint::server::Request;
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/{id}", Action::closure(|_req, _res, p| Ok(format!("user:{}", p.get(0).unwrap_or("")))))
//!     .unwrap();
//!
//! let app = Application::builder().router(router).build().unwrap();
//!
//! assert_eq!(app.handle(&Request::get("/users/42")).body_text(), "user:42");
//! assert_eq!(app.handle(&Request::get("/nowhere")).status, 404);
//! assert_eq!(app.handle(&Request::new(Method::POST, "/users/42")).status, 405);
//! ```

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::controller::ControllerRegistry;
use crate::dispatcher::Dispatcher;
use crate::error::ConfigurationError;
use crate::error_handler::ErrorHandler;
use crate::middleware::Middleware;
use crate::router::{Action, Router};
use crate::runtime_config::AppConfig;
use crate::server::{Request, Response};
use crate::view::ViewFactory;

/// A fully wired application.
#[derive(Clone)]
pub struct Application {
    router: Router,
    dispatcher: Dispatcher,
    errors: ErrorHandler,
    config: AppConfig,
}

impl Application {
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn error_handler(&self) -> &ErrorHandler {
        &self.errors
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Route, dispatch and answer one request. Never fails: errors become error pages.
    ///
    /// Middleware wraps every answer, error pages included. A request no route matches
    /// still runs the `before` hooks, and one of them may answer it instead of the 404/405 page.
    #[must_use]
    pub fn handle(&self, request: &Request) -> Response {
        let start = Instant::now();
        let route = match self.router.route(&request.method, &request.path) {
            Ok(route) => route,
            Err(err) => {
                let (mut response, latency) = match self.dispatcher.run_before(request) {
                    Some(early) => (early, Duration::ZERO),
                    None => (
                        self.errors
                            .handle_request_error(request.request_id, err.into_request_error()),
                        start.elapsed(),
                    ),
                };
                self.dispatcher.run_after(request, &mut response, latency);
                return response;
            }
        };

        match self.dispatcher.dispatch(request, &route) {
            Ok(response) => response,
            Err(err) => {
                let mut response = self.errors.handle(request.request_id, err);
                self.dispatcher
                    .run_after(request, &mut response, start.elapsed());
                response
            }
        }
    }

    /// Handle `request` and send the response to `out`.
    pub fn serve<W: Write + ?Sized>(&self, request: &Request, out: &mut W) -> io::Result<()> {
        self.handle(request).send(out)
    }
}

/// Builder for [`Application`].
#[derive(Default)]
pub struct ApplicationBuilder {
    router: Router,
    controllers: ControllerRegistry,
    middlewares: Vec<Arc<dyn Middleware>>,
    config: AppConfig,
    views: Option<Arc<ViewFactory>>,
}

impl ApplicationBuilder {
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    #[must_use]
    pub fn controllers(mut self, controllers: ControllerRegistry) -> Self {
        self.controllers = controllers;
        self
    }

    #[must_use]
    pub fn middleware(mut self, mw: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(mw);
        self
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `views` instead of building a factory from the configured views directory.
    #[must_use]
    pub fn views(mut self, views: Arc<ViewFactory>) -> Self {
        self.views = Some(views);
        self
    }

    /// Wire everything up.
    ///
    /// Fails if a route points at a controller action that is not registered.
    pub fn build(self) -> Result<Application, ConfigurationError> {
        for action in self.router.actions() {
            if let Action::Controller(target) = action {
                if let Err(err) = self.controllers.resolve(target) {
                    error!(action = %target, error = %err, "Route points at an unknown controller action");
                    return Err(err);
                }
            }
        }

        let views = self.views.unwrap_or_else(|| {
            Arc::new(match &self.config.views_dir {
                Some(dir) => ViewFactory::with_views_dir(dir),
                None => ViewFactory::new(),
            })
        });

        let mut dispatcher = Dispatcher::new(self.controllers);
        for mw in self.middlewares {
            dispatcher.add_middleware(mw);
        }

        info!(
            routes = self.router.len(),
            controller_actions = dispatcher.controllers().len(),
            middleware_count = dispatcher.middlewares.len(),
            views_dir = ?views.views_dir(),
            debug = self.config.debug,
            "Application built"
        );

        Ok(Application {
            router: self.router,
            dispatcher,
            errors: ErrorHandler::new(views, self.config.debug),
            config: self.config,
        })
    }
}
