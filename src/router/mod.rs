//! # Router Module
//!
//! Resolves an incoming method + path to a [`Route`]: the [`Action`] to invoke and the
//! positional [`Params`] captured from the URL.
//!
//! ## Patterns
//!
//! Patterns are compiled to anchored regexes at registration time:
//!
//! - `/users/{id}` captures one path segment
//! - `/users/{id:\d+}` constrains the capture with a regex
//! - `/files/{path:.+}` may span several segments
//!
//! A trailing slash on either the pattern or the request path is ignored.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use waypoint::router::{Action, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("/hello/{name}", Action::closure(|_req, _res, p| Ok(format!("hi {}", p.get(0).unwrap_or("")))))
//!     .unwrap()
//!     .get("/users/{id:\\d+}", "UserController::show")
//!     .unwrap();
//!
//! let route = router.route(&Method::GET, "/users/42").unwrap();
//! assert_eq!(route.parameters.get(0), Some("42"));
//! ```
//!
//! Lookups that fail report whether the path is unknown (404) or only served for other
//! methods (405), see [`RouteError`].

mod action;
mod core;
mod params;

pub use action::{Action, ActionTarget, ClosureFn};
pub use core::{Route, RouteError, Router};
pub use params::{ParamVec, Params, MAX_INLINE_PARAMS};
