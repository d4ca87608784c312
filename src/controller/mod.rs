//! # Controller Module
//!
//! Controllers group related actions behind a shared lifecycle:
//!
//! 1. the controller is instantiated with the request and the response being built
//! 2. [`Controller::before_filter`] runs
//! 3. the action runs with the route's positional parameters; its return value
//!    becomes the response body
//! 4. [`Controller::after_filter`] runs
//!
//! Actions are registered in a [`ControllerRegistry`] under `Controller::method`
//! identifiers, which is what routes refer to. Because registration needs a type that
//! implements [`Controller`], only real controllers can ever be dispatched to; a route
//! naming an identifier that was never registered is a configuration error.
//!
//! ```rust
//! use waypoint::controller::{ActionContext, Controller, ControllerRegistry};
//! use waypoint::error::RequestError;
//! use waypoint::router::Params;
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
//!     fn show(&mut self, _cx: &mut ActionContext<'_>, params: &Params) -> Result<String, RequestError> {
//!         Ok(format!("user {}", params.get(0).unwrap_or("?")))
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register("UserController::show", UserController::show).unwrap();
//! assert!(registry.contains("UserController::show"));
//! ```

mod core;
mod registry;

pub use core::{ActionContext, Controller};
pub use registry::{ControllerRegistry, ControllerScope};
