use std::sync::{Arc, Mutex};

use serde_json::json;
use waypoint::controller::{ActionContext, Controller, ControllerRegistry};
use waypoint::dispatcher::Dispatcher;
use waypoint::error::{ConfigurationError, DispatchError, RequestError};
use waypoint::router::{Action, Params, Route};
use waypoint::server::Request;

use tracing_util::TestTracing;

type CallLog = Arc<Mutex<Vec<String>>>;

/// Controllers only get the request and response, so the test hands them a call log
/// through a thread-local.
fn with_log<R>(f: impl FnOnce(&CallLog) -> R) -> R {
    thread_local! {
        static LOG: CallLog = Arc::new(Mutex::new(Vec::new()));
    }
    LOG.with(f)
}

fn record(entry: &str) {
    with_log(|log| log.lock().unwrap().push(entry.to_string()));
}

fn take_log() -> Vec<String> {
    with_log(|log| std::mem::take(&mut *log.lock().unwrap()))
}

struct UserController;

impl Controller for UserController {
    fn new(_cx: &mut ActionContext<'_>) -> Self {
        UserController
    }

    fn before_filter(&mut self, _cx: &mut ActionContext<'_>) -> Result<(), RequestError> {
        record("before");
        Ok(())
    }

    fn after_filter(&mut self, cx: &mut ActionContext<'_>) {
        record(&format!("after body={}", cx.response.body_text()));
    }
}

impl UserController {
    fn show(&mut self, _cx: &mut ActionContext<'_>, params: &Params) -> Result<String, RequestError> {
        record(&format!("show {}", params.get(0).unwrap_or_default()));
        Ok(params.get(0).unwrap_or_default().to_string())
    }

    fn destroy(&mut self, _cx: &mut ActionContext<'_>, _params: &Params) -> Result<(), RequestError> {
        record("destroy");
        Err(RequestError::forbidden())
    }
}

fn registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry
        .register("UserController::show", UserController::show)
        .unwrap()
        .register("UserController::destroy", UserController::destroy)
        .unwrap();
    registry
}

#[test]
fn test_closure_receives_request_response_params() {
    let dispatcher = Dispatcher::new(registry());
    let route = Route::new(Action::closure(|req, res, params| {
        res.set_header("x-path", req.path.clone());
        Ok(format!("user:{}", params.get(0).unwrap_or_default()))
    }))
    .with_parameters(Params::positional([42]));

    let res = dispatcher.dispatch(&Request::get("/users/42"), &route).unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!("user:42"));
    assert_eq!(res.get_header("x-path"), Some("/users/42"));
}

#[test]
fn test_controller_filters_wrap_action() {
    take_log();
    let dispatcher = Dispatcher::new(registry());
    let route = Route::new("UserController::show").with_parameters(Params::positional(["alice"]));

    let res = dispatcher.dispatch(&Request::get("/users/alice"), &route).unwrap();
    assert_eq!(res.body, json!("alice"));
    assert_eq!(
        take_log(),
        vec!["before", "show alice", "after body=alice"]
    );
}

#[test]
fn test_action_error_skips_after_filter() {
    take_log();
    let dispatcher = Dispatcher::new(registry());
    let route = Route::new("UserController::destroy");

    let err = dispatcher.dispatch(&Request::get("/"), &route).unwrap_err();
    assert_eq!(err.status(), 403);
    assert_eq!(take_log(), vec!["before", "destroy"]);
}

struct LockedController;

impl Controller for LockedController {
    fn new(_cx: &mut ActionContext<'_>) -> Self {
        LockedController
    }

    fn before_filter(&mut self, _cx: &mut ActionContext<'_>) -> Result<(), RequestError> {
        record("before");
        Err(RequestError::forbidden())
    }

    fn after_filter(&mut self, _cx: &mut ActionContext<'_>) {
        record("after");
    }
}

impl LockedController {
    fn show(&mut self, _cx: &mut ActionContext<'_>, _params: &Params) -> Result<String, RequestError> {
        record("show");
        Ok("secret".to_string())
    }
}

#[test]
fn test_before_filter_error_skips_action_and_after_filter() {
    take_log();
    let mut registry = ControllerRegistry::new();
    registry
        .register("LockedController::show", LockedController::show)
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    let err = dispatcher
        .dispatch(&Request::get("/"), &Route::new("LockedController::show"))
        .unwrap_err();
    assert_eq!(err.status(), 403);
    assert_eq!(take_log(), vec!["before"]);
}

#[test]
fn test_unregistered_controller_never_invokes_anything() {
    take_log();
    let tracing = TestTracing::init();
    let dispatcher = Dispatcher::new(registry());
    let route = Route::new("PostController::show").with_parameters(Params::positional(["1"]));

    let err = dispatcher.dispatch(&Request::get("/posts/1"), &route).unwrap_err();
    match err {
        DispatchError::Configuration(ConfigurationError::UnregisteredAction { controller, method }) => {
            assert_eq!(controller, "PostController");
            assert_eq!(method, "show");
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(take_log().is_empty());

    let logs = tracing.logs.contents();
    assert!(logs.contains("Controller action not registered - CRITICAL"));
    assert!(logs.contains("\"level\":\"ERROR\""));
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let mut registry = registry();
    let err = registry
        .register("UserController::show", UserController::show)
        .err()
        .unwrap();
    assert_eq!(
        err,
        ConfigurationError::DuplicateAction {
            target: "UserController::show".to_string()
        }
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_registry_resolve() {
    let registry = registry();
    assert_eq!(
        registry.targets(),
        vec!["UserController::destroy", "UserController::show"]
    );
    assert!(registry.resolve("UserController::show").is_ok());
    assert!(matches!(
        registry.resolve("UserController"),
        Err(ConfigurationError::MalformedTarget { .. })
    ));
    assert!(matches!(
        registry.resolve("UserController::edit"),
        Err(ConfigurationError::UnregisteredAction { .. })
    ));
}

#[test]
fn test_dispatcher_is_shareable_across_threads() {
    let dispatcher = Arc::new(Dispatcher::new(registry()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                let route = Route::new("UserController::show")
                    .with_parameters(Params::positional([format!("user{i}")]));
                dispatcher
                    .dispatch(&Request::get("/"), &route)
                    .unwrap()
                    .body_text()
            })
        })
        .collect();

    let mut bodies: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    bodies.sort();
    assert_eq!(bodies, vec!["user0", "user1", "user2", "user3"]);
}
