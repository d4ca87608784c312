use http::Method;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Action, ParamVec, Params};
use crate::error::{ConfigurationError, RequestError};

/// A route resolved for one request: the action plus the URL parameters.
///
/// Created by the [`Router`] (or by hand) and consumed once by the dispatcher.
#[derive(Debug, Clone)]
pub struct Route {
    /// The pattern that matched, for logging
    pub pattern: Arc<str>,
    /// What to invoke
    pub action: Action,
    /// Positional parameters in pattern order
    pub parameters: Params,
}

impl Route {
    /// A route outside any routing table.
    pub fn new(action: impl Into<Action>) -> Self {
        Self {
            pattern: Arc::from("*"),
            action: action.into(),
            parameters: Params::new(),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Params) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Why a lookup produced no route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No pattern matches the path.
    NotFound,
    /// The path matches, but only for other methods.
    MethodNotAllowed {
        /// Methods the path does accept
        allowed: Vec<Method>,
    },
}

impl RouteError {
    /// 404 or 405, as the error page should report it.
    #[must_use]
    pub fn into_request_error(self) -> RequestError {
        match self {
            RouteError::NotFound => RequestError::not_found(),
            RouteError::MethodNotAllowed { allowed } => {
                let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                RequestError::method_not_allowed()
                    .with_message(format!("allowed methods: {}", allowed.join(", ")))
            }
        }
    }
}

struct RouteEntry {
    method: Method,
    pattern: Arc<str>,
    regex: Regex,
    group_names: Vec<(String, Arc<str>)>,
    action: Action,
}

/// Routing table matching method + path to an [`Action`].
///
/// Patterns use `{name}` placeholders, optionally constrained with a regex:
/// `/users/{id:\d+}/posts/{slug}`. Routes are tried in registration order.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Arc<RouteEntry>>,
}

macro_rules! insert_route {
    ($name:ident => Method::$method:ident) => {
        #[doc = concat!("Register a route for the `", stringify!($method), "` method.")]
        pub fn $name(
            &mut self,
            pattern: &str,
            action: impl Into<Action>,
        ) -> Result<&mut Self, ConfigurationError> {
            self.add(Method::$method, pattern, action)
        }
    };
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// Fails with [`ConfigurationError::InvalidRoutePattern`] when the pattern has
    /// unbalanced braces, an empty placeholder name or an invalid constraint.
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<&mut Self, ConfigurationError> {
        let (regex, group_names) = Self::path_to_regex(pattern)?;
        let action = action.into();

        debug!(
            method = %method,
            pattern = %pattern,
            action = %action,
            "Route registered"
        );

        self.routes.push(Arc::new(RouteEntry {
            method,
            pattern: Arc::from(pattern),
            regex,
            group_names,
            action,
        }));
        Ok(self)
    }

    insert_route!(get => Method::GET);
    insert_route!(post => Method::POST);
    insert_route!(put => Method::PUT);
    insert_route!(patch => Method::PATCH);
    insert_route!(delete => Method::DELETE);
    insert_route!(options => Method::OPTIONS);

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Actions of all routes, in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.routes.iter().map(|entry| &entry.action)
    }

    /// One `METHOD pattern -> action` line per route, in registration order.
    #[must_use]
    pub fn dump_routes(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|entry| format!("{} {} -> {}", entry.method, entry.pattern, entry.action))
            .collect()
    }

    /// Resolve a request to a [`Route`].
    pub fn route(&self, method: &Method, path: &str) -> Result<Route, RouteError> {
        debug!(method = %method, path = %path, "Route match attempt");

        let path = normalize(path);
        let mut allowed: Vec<Method> = Vec::new();

        for entry in &self.routes {
            let Some(captures) = entry.regex.captures(path) else {
                continue;
            };

            if entry.method != *method {
                if !allowed.contains(&entry.method) {
                    allowed.push(entry.method.clone());
                }
                continue;
            }

            let params: ParamVec = entry
                .group_names
                .iter()
                .filter_map(|(group, name)| {
                    captures
                        .name(group)
                        .map(|m| (Arc::clone(name), m.as_str().to_string()))
                })
                .collect();

            info!(
                method = %method,
                path = %path,
                route_pattern = %entry.pattern,
                action = %entry.action,
                path_params = ?params,
                "Route matched"
            );

            return Ok(Route {
                pattern: Arc::clone(&entry.pattern),
                action: entry.action.clone(),
                parameters: Params::from(params),
            });
        }

        if allowed.is_empty() {
            warn!(method = %method, path = %path, "No route matched");
            Err(RouteError::NotFound)
        } else {
            warn!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "Path matched with a different method"
            );
            Err(RouteError::MethodNotAllowed { allowed })
        }
    }

    /// Compile a route pattern into an anchored regex.
    ///
    /// Returns the regex and, in placeholder order, pairs of (capture group name,
    /// placeholder name). Capture groups are named `p0`, `p1`, ... so placeholder
    /// names need not be valid regex identifiers and constraints may contain groups
    /// of their own.
    pub(crate) fn path_to_regex(
        pattern: &str,
    ) -> Result<(Regex, Vec<(String, Arc<str>)>), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidRoutePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let normalized = normalize(pattern);
        let mut source = String::with_capacity(normalized.len() + 8);
        source.push('^');
        let mut group_names = Vec::new();
        let mut literal = String::new();
        let mut chars = normalized.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();

                    let mut depth = 1;
                    let mut inner = String::new();
                    for c in chars.by_ref() {
                        match c {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        inner.push(c);
                    }
                    if depth != 0 {
                        return Err(invalid("unclosed '{'"));
                    }

                    let (name, constraint) = match inner.split_once(':') {
                        Some((name, constraint)) => (name.trim(), constraint),
                        None => (inner.trim(), "[^/]+"),
                    };
                    if name.is_empty() {
                        return Err(invalid("empty placeholder name"));
                    }

                    let group = format!("p{}", group_names.len());
                    source.push_str(&format!("(?P<{group}>{constraint})"));
                    group_names.push((group, Arc::from(name)));
                }
                '}' => return Err(invalid("unmatched '}'")),
                other => literal.push(other),
            }
        }

        source.push_str(&regex::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| invalid(&e.to_string()))?;
        Ok((regex, group_names))
    }
}

/// Strip a trailing slash, except from the root path.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else if path.is_empty() {
        "/"
    } else {
        path
    }
}
