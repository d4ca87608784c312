use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::Params;
use crate::error::{ConfigurationError, DispatchError, RequestError};
use crate::server::{Request, Response};

/// Type-erased closure action.
pub type ClosureFn =
    dyn Fn(&Request, &mut Response, &Params) -> Result<Value, DispatchError> + Send + Sync;

/// What a route resolves to.
#[derive(Clone)]
pub enum Action {
    /// A callable invoked with `(request, response, params)`.
    Closure(Arc<ClosureFn>),
    /// A `Controller::method` identifier resolved through the controller registry.
    Controller(Arc<str>),
}

impl Action {
    /// Wrap a closure. Its `Ok` value becomes the response body.
    ///
    /// ```
    /// use waypoint::router::Action;
    ///
    /// let action = Action::closure(|_req, _res, params| Ok(format!("user:{}", params.get(0).unwrap_or("?"))));
    /// assert!(action.is_closure());
    /// ```
    pub fn closure<F, T>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &Params) -> Result<T, RequestError> + Send + Sync + 'static,
        T: Serialize,
    {
        Action::Closure(Arc::new(
            move |req: &Request,
                  res: &mut Response,
                  params: &Params|
                  -> Result<Value, DispatchError> {
                let out = f(req, res, params)?;
                Ok(serde_json::to_value(out)?)
            },
        ))
    }

    /// Refer to a registered controller action such as `"UserController::show"`.
    pub fn controller(target: impl Into<Arc<str>>) -> Self {
        Action::Controller(target.into())
    }

    #[must_use]
    pub fn is_closure(&self) -> bool {
        matches!(self, Action::Closure(_))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Closure(_) => f.write_str("Closure"),
            Action::Controller(target) => write!(f, "Controller({target})"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Closure(_) => f.write_str("<closure>"),
            Action::Controller(target) => f.write_str(target),
        }
    }
}

impl From<&str> for Action {
    fn from(target: &str) -> Self {
        Action::controller(target)
    }
}

impl From<String> for Action {
    fn from(target: String) -> Self {
        Action::controller(target)
    }
}

/// A `Controller::method` identifier split on its first `::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionTarget {
    pub controller: String,
    pub method: String,
}

impl ActionTarget {
    pub fn parse(target: &str) -> Result<Self, ConfigurationError> {
        match target.split_once("::") {
            Some((controller, method))
                if !controller.trim().is_empty() && !method.trim().is_empty() =>
            {
                Ok(Self {
                    controller: controller.trim().to_string(),
                    method: method.trim().to_string(),
                })
            }
            _ => Err(ConfigurationError::MalformedTarget {
                target: target.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.controller, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_splits_on_first_separator() {
        let target = ActionTarget::parse("admin::UserController::show").unwrap();
        assert_eq!(target.controller, "admin");
        assert_eq!(target.method, "UserController::show");

        let target = ActionTarget::parse("UserController::show").unwrap();
        assert_eq!(target.to_string(), "UserController::show");
    }

    #[test]
    fn malformed_targets_are_configuration_errors() {
        for bad in ["UserController", "::show", "UserController::", ""] {
            assert_eq!(
                ActionTarget::parse(bad),
                Err(ConfigurationError::MalformedTarget {
                    target: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn closure_output_is_serialized() {
        let action = Action::closure(|_req, _res, _params| Ok(vec![1, 2, 3]));
        let Action::Closure(f) = action else {
            panic!("expected closure");
        };
        let req = Request::get("/");
        let mut res = Response::new();
        let body = f(&req, &mut res, &Params::new()).unwrap();
        assert_eq!(body, serde_json::json!([1, 2, 3]));
    }
}
