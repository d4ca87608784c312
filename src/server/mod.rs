//! HTTP request and response values.
//!
//! Accepting connections and parsing the wire format belongs to whatever embeds the
//! crate; this module only carries the data one request cycle needs and knows how to
//! write a response back out in HTTP/1.1 form.

mod request;
mod response;

pub use request::{parse_cookies, parse_query_params, HeaderVec, Request, MAX_INLINE_HEADERS};
pub use response::{status_reason, Response};
