//! HTTP transport types and the ureq-backed transport.
//!
//! # Design
//! Requests and responses are plain data. `client` builds `HttpRequest`
//! values and parses `HttpResponse` values; a `Transport` does the actual
//! round trip in between. Tests swap in a stub transport to exercise the
//! decode rules without a socket.
//!
//! All fields use owned types so a request can be built on one thread and
//! sent on another.

use ureq::{Agent, RequestBuilder};

use crate::error::RequestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set a header, replacing any existing one with the same name
    /// (compared case-insensitively).
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes one `HttpRequest` and returns the full response.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError>;
}

/// Blocking transport over ureq.
///
/// A default-configured agent is created for every call, so nothing is
/// shared between requests. Status codes are returned as data; interpreting
/// them is the caller's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent() -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        let agent = Self::agent();
        let url = request.url.as_str();
        let headers = &request.headers;

        let result = match request.body.as_deref() {
            None => match request.method {
                HttpMethod::Get => with_headers(agent.get(url), headers).call(),
                HttpMethod::Delete => with_headers(agent.delete(url), headers).call(),
                HttpMethod::Post => with_headers(agent.post(url), headers).send_empty(),
                HttpMethod::Put => with_headers(agent.put(url), headers).send_empty(),
            },
            Some(body) => {
                let builder = match request.method {
                    HttpMethod::Get => agent.get(url).force_send_body(),
                    HttpMethod::Delete => agent.delete(url).force_send_body(),
                    HttpMethod::Post => agent.post(url),
                    HttpMethod::Put => agent.put(url),
                };
                with_headers(builder, headers).send(body)
            }
        };

        let mut response = result.map_err(map_send_error)?;
        let status = response.status().as_u16();
        // A 404 fails regardless of its body, even one that breaks off.
        let body = match response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
        {
            Ok(body) => body,
            Err(_) if status == 404 => Vec::new(),
            Err(e) => return Err(RequestError::Read(e.to_string())),
        };

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Malformed URLs and headers surface from ureq at send time; keep them apart
/// from network failures.
fn map_send_error(err: ureq::Error) -> RequestError {
    match err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => {
            RequestError::RequestConstruction(err.to_string())
        }
        other => RequestError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = HttpRequest::new(HttpMethod::Get, "http://localhost");
        req.set_header("Accept", "text/plain");
        req.set_header("accept", "application/json");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
        assert_eq!(req.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn unresolvable_host_is_not_a_construction_error() {
        let req = HttpRequest::new(HttpMethod::Get, "http://nonexistent.invalid/");
        let err = UreqTransport.send(&req).unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn malformed_url_is_a_construction_error() {
        let req = HttpRequest::new(HttpMethod::Get, "http://bad host/");
        let err = UreqTransport.send(&req).unwrap_err();
        assert!(matches!(err, RequestError::RequestConstruction(_)), "got {err:?}");
    }
}
