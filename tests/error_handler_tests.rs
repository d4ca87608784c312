use std::fs;
use std::sync::Arc;

use waypoint::error::{DispatchError, RequestError};
use waypoint::error_handler::{ErrorHandler, RequestExceptionHandler};
use waypoint::ids::RequestId;
use waypoint::view::ViewFactory;

use tracing_util::TestTracing;

fn views_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("errors")).unwrap();
    for (name, source) in files {
        fs::write(dir.path().join(name), source).unwrap();
    }
    dir
}

#[test]
fn test_not_found_renders_404_view() {
    let dir = views_dir(&[("errors/404.html", "missing: {{ status }} {{ reason }}")]);
    let views = Arc::new(ViewFactory::with_views_dir(dir.path()));

    let res = RequestExceptionHandler::new(RequestError::not_found(), views).response();
    assert_eq!(res.status, 404);
    assert_eq!(res.body_text(), "missing: 404 Not Found");
    assert_eq!(res.get_header("content-type"), Some("text/html; charset=utf-8"));
}

#[test]
fn test_handle_sends_response() {
    let mut out = Vec::new();
    RequestExceptionHandler::new(RequestError::not_found(), Arc::new(ViewFactory::new()))
        .handle(&mut out)
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(head.contains(&format!("content-length: {}", body.len())));
    assert!(body.contains("<h1>404 Not Found</h1>"));
}

#[test]
fn test_custom_default_view_catches_unknown_status() {
    let dir = views_dir(&[("errors/default.html", "oops {{ status }}")]);
    let views = Arc::new(ViewFactory::with_views_dir(dir.path()));

    let res = RequestExceptionHandler::new(RequestError::new(429), views).response();
    assert_eq!(res.status, 429);
    assert_eq!(res.body_text(), "oops 429");
}

#[test]
fn test_custom_layout_applies_to_builtin_pages() {
    let dir = views_dir(&[(
        "errors/layout.html",
        "[{{ status }}]{% block content %}{% endblock %}",
    )]);
    let views = Arc::new(ViewFactory::with_views_dir(dir.path()));

    let res = RequestExceptionHandler::new(RequestError::forbidden(), views).response();
    assert_eq!(res.body_text(), "[403]<p>You are not allowed to see this page.</p>");
}

#[test]
fn test_broken_views_fall_back_to_plain_text() {
    let tracing = TestTracing::init();
    let dir = views_dir(&[
        ("errors/500.html", "{{ unclosed"),
        ("errors/default.html", "{{ unclosed"),
    ]);
    let views = Arc::new(ViewFactory::with_views_dir(dir.path()));

    let res = RequestExceptionHandler::new(RequestError::internal(), views).response();
    assert_eq!(res.status, 500);
    assert_eq!(res.body_text(), "500 Internal Server Error");
    assert!(tracing
        .logs
        .contents()
        .contains("Error view unavailable, sending plain text"));
}

#[test]
fn test_error_handler_maps_dispatch_errors() {
    let handler = ErrorHandler::new(Arc::new(ViewFactory::new()), true);

    let res = handler.handle(
        RequestId::new(),
        DispatchError::from(RequestError::bad_request().with_message("page must be a number")),
    );
    assert_eq!(res.status, 400);
    assert!(res.body_text().contains("page must be a number"));

    let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let res = handler.handle(RequestId::new(), DispatchError::from(serde_err));
    assert_eq!(res.status, 500);
    assert!(res.body_text().contains("failed to serialize action result"));
}
