use std::fs;

use http::Method;
use serde_json::{json, Value};
use waypoint::app::Application;
use waypoint::controller::ControllerRegistry;
use waypoint::demo;
use waypoint::error::ConfigurationError;
use waypoint::router::Router;
use waypoint::runtime_config::AppConfig;
use waypoint::server::Request;

fn demo_app(config: AppConfig) -> Application {
    demo::build_app(config).unwrap().0
}

fn body_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn test_closure_routes() {
    let app = demo_app(AppConfig::default());

    assert_eq!(app.handle(&Request::get("/")).body_text(), "Hello, world!");
    assert_eq!(app.handle(&Request::get("/?name=ada")).body_text(), "Hello, ada!");

    let res = app.handle(&Request::get("/health"));
    assert_eq!(res.content_type(), "application/json");
    assert_eq!(body_json(&res.body_text()), json!({"status": "ok"}));
}

#[test]
fn test_controller_routes() {
    let app = demo_app(AppConfig::default());

    let res = app.handle(&Request::get("/users?limit=2"));
    assert_eq!(res.status, 200);
    assert_eq!(
        body_json(&res.body_text()),
        json!([{"id": 1, "name": "alice"}, {"id": 2, "name": "bob"}])
    );
    assert!(res
        .get_header("x-served-by")
        .unwrap()
        .starts_with("UserController/"));

    let res = app.handle(&Request::get("/users/3"));
    assert_eq!(body_json(&res.body_text()), json!({"id": 3, "name": "carol"}));
}

#[test]
fn test_post_with_body() {
    let app = demo_app(AppConfig::default());
    let req = Request::new(Method::POST, "/users").with_body(json!({"name": "dave"}));

    let res = app.handle(&req);
    assert_eq!(res.status, 201);
    assert_eq!(res.get_header("location"), Some("/users/4"));
    assert_eq!(body_json(&res.body_text()), json!({"id": 4, "name": "dave"}));

    let res = app.handle(&Request::new(Method::POST, "/users"));
    assert_eq!(res.status, 400);
}

#[test]
fn test_error_pages() {
    let app = demo_app(AppConfig::default());

    let res = app.handle(&Request::get("/users/99"));
    assert_eq!(res.status, 404);
    assert!(res.body_text().contains("could not be found"));
    assert!(!res.body_text().contains("no user with id 99"));

    assert_eq!(app.handle(&Request::get("/users/abc")).status, 404);
    assert_eq!(app.handle(&Request::get("/users?limit=lots")).status, 400);
    assert_eq!(app.handle(&Request::get("/maintenance")).status, 503);

    let res = app.handle(&Request::new(Method::DELETE, "/users"));
    assert_eq!(res.status, 405);
}

#[test]
fn test_before_filter_guards_admin() {
    let app = demo_app(AppConfig::default());

    let res = app.handle(&Request::get("/admin"));
    assert_eq!(res.status, 401);
    assert!(res.body_text().contains("sign in"));

    let res = app.handle(&Request::get("/admin").with_header("Authorization", "Bearer t"));
    assert_eq!(res.status, 200);
    assert_eq!(body_json(&res.body_text()), json!({"users": 3}));
}

#[test]
fn test_debug_mode_shows_messages() {
    let config = AppConfig {
        debug: true,
        ..AppConfig::default()
    };
    let app = demo_app(config);

    let res = app.handle(&Request::get("/users/99"));
    assert!(res.body_text().contains("no user with id 99"));
    let res = app.handle(&Request::new(Method::DELETE, "/users"));
    assert!(res.body_text().contains("allowed methods: GET, POST"));
}

#[test]
fn test_views_dir_from_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("errors")).unwrap();
    fs::write(dir.path().join("errors/404.html"), "nothing at this waypoint").unwrap();
    let config_path = dir.path().join("waypoint.yaml");
    fs::write(&config_path, "views_dir: .\n").unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    let app = demo_app(config);

    assert_eq!(app.handle(&Request::get("/nope")).body_text(), "nothing at this waypoint");
    assert!(app
        .handle(&Request::get("/admin"))
        .body_text()
        .contains("401 Unauthorized"));
}

#[test]
fn test_serve_writes_http() {
    let app = demo_app(AppConfig::default());
    let mut out = Vec::new();
    app.serve(&Request::get("/health"), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("content-type: application/json\r\n"));
    assert!(text.contains("x-request-id: "));
    assert!(text.ends_with("\r\n\r\n{\"status\":\"ok\"}"));
}

#[test]
fn test_build_rejects_unknown_controller_routes() {
    let mut router = Router::new();
    router.get("/posts", "PostController::index").unwrap();

    let err = Application::builder()
        .router(router)
        .controllers(ControllerRegistry::new())
        .build()
        .err()
        .unwrap();
    assert_eq!(
        err,
        ConfigurationError::UnregisteredAction {
            controller: "PostController".into(),
            method: "index".into()
        }
    );
}
