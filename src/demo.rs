//! A small application used by the `waypoint` binary and the integration tests.
//!
//! | Route | Action |
//! |-------|--------|
//! | `GET /` | closure greeting |
//! | `GET /health` | closure returning `{"status": "ok"}` |
//! | `GET /users` | `UserController::index` |
//! | `GET /users/{id:\d+}` | `UserController::show` |
//! | `POST /users` | `UserController::create` |
//! | `GET /admin` | `AdminController::dashboard`, requires an `authorization` header |
//! | `GET /maintenance` | closure answering 503 |

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::app::Application;
use crate::controller::{ActionContext, Controller, ControllerRegistry};
use crate::error::{ConfigurationError, RequestError};
use crate::middleware::{MetricsMiddleware, TracingMiddleware};
use crate::router::{Action, Params, Router};
use crate::runtime_config::AppConfig;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
}

const USERS: &[User] = &[
    User { id: 1, name: "alice" },
    User { id: 2, name: "bob" },
    User { id: 3, name: "carol" },
];

pub struct UserController {
    request_id: String,
}

impl Controller for UserController {
    fn new(cx: &mut ActionContext<'_>) -> Self {
        Self {
            request_id: cx.request.request_id.to_string(),
        }
    }

    fn after_filter(&mut self, cx: &mut ActionContext<'_>) {
        cx.response
            .set_header("x-served-by", format!("UserController/{}", self.request_id));
    }
}

impl UserController {
    pub fn index(&mut self, cx: &mut ActionContext<'_>, _params: &Params) -> Result<Vec<User>, RequestError> {
        let limit = match cx.request.get_query_param("limit") {
            Some(raw) => raw
                .parse()
                .map_err(|_| RequestError::bad_request().with_message(format!("invalid limit '{raw}'")))?,
            None => USERS.len(),
        };
        Ok(USERS.iter().take(limit).cloned().collect())
    }

    pub fn show(&mut self, _cx: &mut ActionContext<'_>, params: &Params) -> Result<User, RequestError> {
        let id: u32 = params.parse(0)?;
        USERS
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RequestError::not_found().with_message(format!("no user with id {id}")))
    }

    pub fn create(&mut self, cx: &mut ActionContext<'_>, _params: &Params) -> Result<Value, RequestError> {
        let name = cx
            .request
            .body
            .as_ref()
            .and_then(|body| body.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| RequestError::bad_request().with_message("body must contain a name"))?;

        debug!(name = %name, "Creating user");
        cx.response.set_status(201);
        cx.response
            .set_header("location", format!("/users/{}", USERS.len() + 1));
        Ok(json!({"id": USERS.len() + 1, "name": name}))
    }
}

pub struct AdminController;

impl Controller for AdminController {
    fn new(_cx: &mut ActionContext<'_>) -> Self {
        AdminController
    }

    fn before_filter(&mut self, cx: &mut ActionContext<'_>) -> Result<(), RequestError> {
        match cx.request.get_header("authorization") {
            Some(_) => Ok(()),
            None => Err(RequestError::unauthorized().with_message("missing authorization header")),
        }
    }
}

impl AdminController {
    pub fn dashboard(&mut self, _cx: &mut ActionContext<'_>, _params: &Params) -> Result<Value, RequestError> {
        Ok(json!({"users": USERS.len()}))
    }
}

/// Controller actions of the demo application.
pub fn controllers() -> Result<ControllerRegistry, ConfigurationError> {
    let mut registry = ControllerRegistry::new();
    registry
        .controller::<UserController>("UserController")
        .action("index", UserController::index)?
        .action("show", UserController::show)?
        .action("create", UserController::create)?;
    registry
        .controller::<AdminController>("AdminController")
        .action("dashboard", AdminController::dashboard)?;
    Ok(registry)
}

/// Routes of the demo application.
pub fn routes() -> Result<Router, ConfigurationError> {
    let mut router = Router::new();
    router
        .get(
            "/",
            Action::closure(|req, _res, _p| {
                let name = req.get_query_param("name").unwrap_or("world");
                Ok(format!("Hello, {name}!"))
            }),
        )?
        .get("/health", Action::closure(|_req, _res, _p| Ok(json!({"status": "ok"}))))?
        .get("/users", "UserController::index")?
        .get(r"/users/{id:\d+}", "UserController::show")?
        .post("/users", "UserController::create")?
        .get("/admin", "AdminController::dashboard")?
        .get(
            "/maintenance",
            Action::closure(|_req, _res, _p| -> Result<(), RequestError> {
                Err(RequestError::service_unavailable().with_message("down for maintenance"))
            }),
        )?;
    Ok(router)
}

/// The demo application with tracing and metrics middleware.
pub fn build_app(config: AppConfig) -> Result<(Application, Arc<MetricsMiddleware>), ConfigurationError> {
    let metrics = Arc::new(MetricsMiddleware::new());
    let collector: Arc<MetricsMiddleware> = Arc::clone(&metrics);
    let app = Application::builder()
        .config(config)
        .router(routes()?)
        .controllers(controllers()?)
        .middleware(Arc::new(TracingMiddleware))
        .middleware(collector)
        .build()?;
    Ok((app, metrics))
}
