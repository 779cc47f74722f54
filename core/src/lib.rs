//! Synchronous JSON and multipart request helpers.
//!
//! # Overview
//! Every operation is a straight-line pipeline: encode the body, transmit one
//! HTTP request, decode the response body as JSON. There is no retry, no
//! timeout and no shared state beyond the injected transport and logger.
//!
//! # Design
//! - `build_*` functions produce a plain-data `HttpRequest`; a `Transport`
//!   executes it; `parse_reply` consumes the `HttpResponse`. The verbs on
//!   `Requester` compose the three steps.
//! - The caller picks the result target with `Expect`. `Expect::Json` decodes
//!   into `T`; `Expect::Empty` requires an empty or `null` body. The outcome is
//!   a `Reply<T>`.
//! - Logging is an injected `RequestLog`, defaulting to a no-op.

pub mod client;
pub mod error;
pub mod http;
pub mod log;
pub mod multipart;
pub mod types;

pub use client::{
    build_form_request, build_json_request, delete, delete_form, get, parse_reply, post,
    post_form, post_form_file, put, put_form, put_form_file, Requester,
};
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use log::{NoopLog, RequestLog, TracingLog};
pub use types::{Expect, FormFields, FormFile, Headers, Reply};
