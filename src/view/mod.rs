//! # View Module
//!
//! Renders named views with [`minijinja`]. View names use dots as separators and map
//! to `.html` files: `errors.404` is `errors/404.html`.
//!
//! Templates are looked up in the configured views directory first and then among the
//! built-in error pages, so an application can restyle any error page (or the shared
//! `errors/layout.html`) by dropping a file with the same name into its views directory.
//!
//! ```rust
//! use serde_json::json;
//! use waypoint::view::ViewFactory;
//!
//! let views = ViewFactory::new();
//! let html = views
//!     .render("errors.404", json!({"status": 404, "reason": "Not Found"}))
//!     .unwrap();
//! assert!(html.contains("404 Not Found"));
//! ```

mod factory;

pub use factory::{template_path, ViewError, ViewFactory};
