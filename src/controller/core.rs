use crate::error::RequestError;
use crate::server::{Request, Response};

/// The request being handled and the response being built, lent to a controller for
/// the duration of one action.
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub request: &'a Request,
    pub response: &'a mut Response,
}

impl<'a> ActionContext<'a> {
    pub fn new(request: &'a Request, response: &'a mut Response) -> Self {
        Self { request, response }
    }
}

/// Capability set every controller dispatch target must provide.
///
/// A controller is created per request with the request and the response being built,
/// then the dispatcher calls [`before_filter`](Controller::before_filter), the action
/// and [`after_filter`](Controller::after_filter), in that order.
///
/// ```
/// use waypoint::controller::{ActionContext, Controller};
/// use waypoint::error::RequestError;
///
/// struct Admin;
///
/// impl Controller for Admin {
///     fn new(_cx: &mut ActionContext<'_>) -> Self {
///         Admin
///     }
///
///     fn before_filter(&mut self, cx: &mut ActionContext<'_>) -> Result<(), RequestError> {
///         match cx.request.get_header("authorization") {
///             Some(_) => Ok(()),
///             None => Err(RequestError::unauthorized()),
///         }
///     }
/// }
/// ```
pub trait Controller: Send + 'static {
    /// Instantiate the controller for one request.
    fn new(cx: &mut ActionContext<'_>) -> Self
    where
        Self: Sized;

    /// Runs before the action. An error skips the action and the after filter.
    fn before_filter(&mut self, _cx: &mut ActionContext<'_>) -> Result<(), RequestError> {
        Ok(())
    }

    /// Runs after the action, once its return value is the response body.
    fn after_filter(&mut self, _cx: &mut ActionContext<'_>) {}
}
