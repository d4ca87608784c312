//! # Error Handler Module
//!
//! Turns errors that escaped dispatch into error pages.
//!
//! - [`RequestExceptionHandler`] renders one [`RequestError`](crate::error::RequestError)
//!   through the `errors.<status>` view and sends it
//! - [`ErrorHandler`] is the outer layer: it maps any
//!   [`DispatchError`](crate::error::DispatchError) to a response, logging the fatal ones
//!
//! View lookup falls back from `errors.<status>` to `errors.default` and finally to a
//! plain-text `"<status> <reason>"` body, so handling an error never fails.

mod handler;
mod request;

pub use handler::ErrorHandler;
pub use request::RequestExceptionHandler;
