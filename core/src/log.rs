//! Injected request logging.
//!
//! # Design
//! `Requester` reports each stage to a `RequestLog` instead of a process-wide
//! logger. The default is `NoopLog`; `TracingLog` forwards to `tracing` under
//! the `request_core::http` target.

use crate::error::RequestError;
use crate::http::HttpMethod;

/// Observer for the request pipeline. Every hook defaults to doing nothing.
pub trait RequestLog: Send + Sync {
    /// Called once the request is built, before it is sent.
    fn on_request(&self, _method: &HttpMethod, _url: &str) {}

    /// Called with the raw response body, before decoding.
    fn on_response(&self, _url: &str, _status: u16, _body: &[u8]) {}

    /// Called when any stage fails, right before the error is returned.
    fn on_error(&self, _url: &str, _error: &RequestError) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl RequestLog for NoopLog {}

/// Emits `tracing` events for each stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RequestLog for TracingLog {
    fn on_request(&self, method: &HttpMethod, url: &str) {
        tracing::debug!(
            target: "request_core::http",
            method = method.as_str(),
            url,
            "sending request"
        );
    }

    fn on_response(&self, url: &str, status: u16, body: &[u8]) {
        tracing::debug!(
            target: "request_core::http",
            url,
            status,
            body = %String::from_utf8_lossy(body),
            "response received"
        );
    }

    fn on_error(&self, url: &str, error: &RequestError) {
        tracing::error!(target: "request_core::http", url, err = %error, "request failed");
    }
}
