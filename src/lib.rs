//! # waypoint
//!
//! **waypoint** is a small synchronous MVC dispatcher: it resolves a request to a route,
//! invokes the route's action (a closure or a `Controller::method` pair with before and
//! after filters) and, when something goes wrong, renders a status-specific error page.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern matching from method + path to a [`Route`](router::Route)
//! - **[`controller`]** - The [`Controller`](controller::Controller) trait and the
//!   registry mapping `Controller::method` identifiers to typed actions
//! - **[`dispatcher`]** - Runs an action with its filters and middleware
//! - **[`middleware`]** - Hooks around every action (tracing, metrics)
//! - **[`error_handler`]** - Turns errors into rendered error pages
//! - **[`view`]** - Template rendering with built-in error views
//! - **[`app`]** - The outer layer tying routing, dispatch and error pages together
//! - **[`server`]** - Request and response types, HTTP/1.1 response encoding
//! - **[`runtime_config`]** / **[`telemetry`]** - Configuration and logging setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant App as Application
//!     participant Router
//!     participant Dispatcher
//!     participant MW as Middleware
//!     participant Ctl as Controller / Closure
//!     participant EH as ErrorHandler
//!     participant Views as ViewFactory
//!
//!     Caller->>App: handle(request)
//!     App->>Router: route(method, path)
//!     alt no route
//!         Router-->>App: RouteError (404 / 405)
//!         App->>MW: before(request)
//!         App->>EH: handle_request_error
//!     else matched
//!         Router-->>App: Route { action, params }
//!         App->>Dispatcher: dispatch(request, route)
//!         Dispatcher->>MW: before(request)
//!         alt closure
//!             Dispatcher->>Ctl: f(request, response, params)
//!         else Controller::method
//!             Dispatcher->>Ctl: new, before_filter, action, after_filter
//!         end
//!         Ctl-->>Dispatcher: body or RequestError
//!         Dispatcher->>MW: after(request, response, latency)
//!         Dispatcher-->>App: Response or DispatchError
//!         App->>EH: handle(error) on failure
//!     end
//!     EH->>Views: render("errors.<status>")
//!     Views-->>EH: HTML (or errors.default, or plain text)
//!     App->>MW: after(request, error page, latency)
//!     App-->>Caller: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::app::Application;
//! use waypoint::controller::{ActionContext, Controller, ControllerRegistry};
//! use waypoint::error::RequestError;
//! use waypoint::router::{Params, Router};
//! use waypoint::server::Request;
//!
//! struct UserController;
//!
//! impl Controller for UserController {
//!     fn new(_cx: &mut ActionContext<'_>) -> Self {
//!         UserController
//!     }
//! }
//!
//! impl UserController {
//!     fn show(&mut self, _cx: &mut ActionContext<'_>, p: &Params) -> Result<String, RequestError> {
//!         match p.get(0) {
//!             Some("alice") => Ok("alice".to_string()),
//!             _ => Err(RequestError::not_found()),
//!         }
//!     }
//! }
//!
//! let mut controllers = ControllerRegistry::new();
//! controllers.register("UserController::show", UserController::show).unwrap();
//!
//! let mut router = Router::new();
//! router.get("/users/{name}", "UserController::show").unwrap();
//!
//! let app = Application::builder()
//!     .router(router)
//!     .controllers(controllers)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(app.handle(&Request::get("/users/alice")).body_text(), "alice");
//! assert_eq!(app.handle(&Request::get("/users/bob")).status, 404);
//! ```
//!
//! ## Binary
//!
//! The `waypoint` binary runs requests through a bundled demo application, see
//! [`cli`] and [`demo`].

pub mod app;
pub mod cli;
pub mod controller;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod error_handler;
pub mod ids;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod telemetry;
pub mod view;

pub use app::{Application, ApplicationBuilder};
pub use error::{ConfigurationError, DispatchError, RequestError};
