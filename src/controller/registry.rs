use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{ActionContext, Controller};
use crate::error::{ConfigurationError, DispatchError, RequestError};
use crate::router::{ActionTarget, Params};

/// A controller action with its controller type erased.
trait ErasedAction: Send + Sync {
    fn controller_type(&self) -> &'static str;

    fn invoke(&self, cx: &mut ActionContext<'_>, params: &Params) -> Result<(), DispatchError>;
}

struct TypedAction<C, F, T> {
    action: F,
    _marker: PhantomData<fn() -> (C, T)>,
}

impl<C, F, T> ErasedAction for TypedAction<C, F, T>
where
    C: Controller,
    F: Fn(&mut C, &mut ActionContext<'_>, &Params) -> Result<T, RequestError>
        + Send
        + Sync
        + 'static,
    T: Serialize + 'static,
{
    fn controller_type(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn invoke(&self, cx: &mut ActionContext<'_>, params: &Params) -> Result<(), DispatchError> {
        let mut controller = C::new(cx);

        controller.before_filter(cx)?;

        let output = (self.action)(&mut controller, cx, params)?;
        cx.response.set_body(serde_json::to_value(output)?);

        controller.after_filter(cx);
        Ok(())
    }
}

/// Maps `Controller::method` identifiers to typed controller actions.
///
/// Identifiers are validated when they are registered, so a route can only fail to
/// resolve if it names an action that was never registered.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    actions: HashMap<ActionTarget, Arc<dyn ErasedAction>>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `target` (`"UserController::show"`).
    ///
    /// Fails if the identifier is malformed or already taken.
    pub fn register<C, F, T>(&mut self, target: &str, action: F) -> Result<&mut Self, ConfigurationError>
    where
        C: Controller,
        F: Fn(&mut C, &mut ActionContext<'_>, &Params) -> Result<T, RequestError>
            + Send
            + Sync
            + 'static,
        T: Serialize + 'static,
    {
        let target = ActionTarget::parse(target)?;
        if self.actions.contains_key(&target) {
            error!(target = %target, "Controller action registered twice");
            return Err(ConfigurationError::DuplicateAction {
                target: target.to_string(),
            });
        }

        info!(
            target = %target,
            controller_type = std::any::type_name::<C>(),
            total_actions = self.actions.len() + 1,
            "Controller action registered"
        );

        self.actions.insert(
            target,
            Arc::new(TypedAction {
                action,
                _marker: PhantomData,
            }),
        );
        Ok(self)
    }

    /// Register several actions of one controller under a shared name.
    ///
    /// ```
    /// use waypoint::controller::{ActionContext, Controller, ControllerRegistry};
    /// use waypoint::error::RequestError;
    /// use waypoint::router::Params;
    ///
    /// struct Pages;
    ///
    /// impl Controller for Pages {
    ///     fn new(_cx: &mut ActionContext<'_>) -> Self {
    ///         Pages
    ///     }
    /// }
    ///
    /// impl Pages {
    ///     fn home(&mut self, _cx: &mut ActionContext<'_>, _p: &Params) -> Result<&'static str, RequestError> {
    ///         Ok("home")
    ///     }
    ///
    ///     fn about(&mut self, _cx: &mut ActionContext<'_>, _p: &Params) -> Result<&'static str, RequestError> {
    ///         Ok("about")
    ///     }
    /// }
    ///
    /// let mut registry = ControllerRegistry::new();
    /// registry
    ///     .controller::<Pages>("Pages")
    ///     .action("home", Pages::home)
    ///     .unwrap()
    ///     .action("about", Pages::about)
    ///     .unwrap();
    /// assert!(registry.contains("Pages::about"));
    /// ```
    pub fn controller<C: Controller>(&mut self, name: &str) -> ControllerScope<'_, C> {
        ControllerScope {
            registry: self,
            name: name.to_string(),
            _controller: PhantomData,
        }
    }

    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        ActionTarget::parse(target)
            .map(|t| self.actions.contains_key(&t))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.actions.keys().map(ToString::to_string).collect();
        targets.sort();
        targets
    }

    /// Check that `target` resolves without invoking anything.
    pub fn resolve(&self, target: &str) -> Result<ActionTarget, ConfigurationError> {
        let target = ActionTarget::parse(target)?;
        if self.actions.contains_key(&target) {
            Ok(target)
        } else {
            Err(ConfigurationError::UnregisteredAction {
                controller: target.controller,
                method: target.method,
            })
        }
    }

    /// Instantiate the controller behind `target` and run its lifecycle.
    pub(crate) fn invoke(
        &self,
        target: &str,
        cx: &mut ActionContext<'_>,
        params: &Params,
    ) -> Result<(), DispatchError> {
        let parsed = ActionTarget::parse(target)?;
        let Some(action) = self.actions.get(&parsed) else {
            error!(
                target = %parsed,
                available_actions = ?self.targets(),
                "Controller action not registered - CRITICAL"
            );
            return Err(ConfigurationError::UnregisteredAction {
                controller: parsed.controller,
                method: parsed.method,
            }
            .into());
        };

        debug!(
            target = %parsed,
            controller_type = action.controller_type(),
            "Invoking controller action"
        );
        action.invoke(cx, params)
    }
}

/// Registration helper returned by [`ControllerRegistry::controller`].
pub struct ControllerScope<'r, C> {
    registry: &'r mut ControllerRegistry,
    name: String,
    _controller: PhantomData<fn() -> C>,
}

impl<'r, C: Controller> ControllerScope<'r, C> {
    /// Register `name::method`.
    pub fn action<F, T>(self, method: &str, action: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&mut C, &mut ActionContext<'_>, &Params) -> Result<T, RequestError>
            + Send
            + Sync
            + 'static,
        T: Serialize + 'static,
    {
        let target = format!("{}::{}", self.name, method);
        self.registry.register::<C, F, T>(&target, action)?;
        Ok(self)
    }
}
