use serde_json::Value;
use std::io::{self, Write};
use std::sync::Arc;

use super::HeaderVec;

/// Canonical reason phrase for a status code.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        415 => "Unsupported Media Type",
        418 => "I'm a teapot",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Mutable accumulator for the status, headers and body of one response.
///
/// A fresh one is created for every dispatch. The body is a JSON value: strings are
/// sent verbatim, `Null` means "no body", anything else is sent as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers, names lowercased
    pub headers: HeaderVec,
    /// Response body
    pub body: Value,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// An empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Value::Null,
        }
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut response = Self::new();
        response.status = status;
        response.set_header("content-type", "application/json".to_string());
        response.body = body;
        response
    }

    #[must_use]
    pub fn html(status: u16, body: String) -> Self {
        let mut response = Self::new();
        response.status = status;
        response.set_header("content-type", "text/html; charset=utf-8".to_string());
        response.body = Value::String(body);
        response
    }

    #[must_use]
    pub fn text(status: u16, body: String) -> Self {
        let mut response = Self::new();
        response.status = status;
        response.set_header("content-type", "text/plain; charset=utf-8".to_string());
        response.body = Value::String(body);
        response
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers
            .push((Arc::from(name.to_ascii_lowercase()), value));
    }

    /// Content type the body will be sent with.
    #[must_use]
    pub fn content_type(&self) -> &str {
        if let Some(ct) = self.get_header("content-type") {
            return ct;
        }
        match self.body {
            Value::String(_) => "text/plain; charset=utf-8",
            _ => "application/json",
        }
    }

    /// The body as it goes on the wire.
    #[must_use]
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            Value::Null => Vec::new(),
            Value::String(s) => s.as_bytes().to_vec(),
            other => other.to_string().into_bytes(),
        }
    }

    /// Body as text, for callers that inspect rendered pages.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes()).into_owned()
    }

    /// Transmit the response in HTTP/1.1 form.
    pub fn send<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let body = self.body_bytes();

        write!(out, "HTTP/1.1 {} {}\r\n", self.status, status_reason(self.status))?;
        for (name, value) in &self.headers {
            if name.as_ref() == "content-length" || name.as_ref() == "content-type" {
                continue;
            }
            write!(out, "{name}: {value}\r\n")?;
        }
        if !body.is_empty() {
            write!(out, "content-type: {}\r\n", self.content_type())?;
        }
        write!(out, "content-length: {}\r\n\r\n", body.len())?;
        out.write_all(&body)?;
        out.flush()
    }
}
