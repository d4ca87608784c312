//! # Dispatcher Module
//!
//! The dispatcher turns a resolved [`Route`](crate::router::Route) into a
//! [`Response`](crate::server::Response).
//!
//! ## Request Flow
//!
//! 1. Middleware `before` hooks run; the first one returning a response short-circuits
//! 2. The route's action runs:
//!    - a closure is called with `(request, response, params)`
//!    - a `Controller::method` identifier is resolved through the
//!      [`ControllerRegistry`](crate::controller::ControllerRegistry); the controller is
//!      instantiated, its before filter, the action and its after filter run in order
//! 3. The action's return value becomes the response body
//! 4. Middleware `after` hooks run with the measured latency
//!
//! ## Error Handling
//!
//! Dispatch does not catch anything. A [`RequestError`](crate::error::RequestError)
//! raised by a filter or an action travels out of [`Dispatcher::dispatch`] unchanged;
//! turning it into an error page is the job of the
//! [`ErrorHandler`](crate::error_handler::ErrorHandler). A route naming a controller
//! action that was never registered fails with a
//! [`ConfigurationError`](crate::error::ConfigurationError) before anything runs.
//!
//! ## Example
//!
//! ```rust
//! use waypoint::controller::ControllerRegistry;
//! use waypoint::dispatcher::Dispatcher;
//! use waypoint::router::{Action, Params, Route};
//! use waypoint::server::Request;
//!
//! let dispatcher = Dispatcher::new(ControllerRegistry::new());
//! let route = Route::new(Action::closure(|_req, _res, p| {
//!     Ok(format!("user:{}", p.get(0).unwrap_or("?")))
//! }))
//! .with_parameters(Params::positional(["42"]));
//!
//! let response = dispatcher.dispatch(&Request::get("/users/42"), &route).unwrap();
//! assert_eq!(response.body_text(), "user:42");
//! ```

mod core;

pub use core::Dispatcher;
