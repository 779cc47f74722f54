//! Request builders, the reply parser, and the verbs that tie them together.
//!
//! # Design
//! `build_json_request` and `build_form_request` produce an `HttpRequest`
//! without touching the network. `parse_reply` turns an `HttpResponse` into a
//! `Reply<T>`. `Requester` runs build → send → parse for one request and
//! reports every stage to its `RequestLog`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::log::{NoopLog, RequestLog};
use crate::multipart;
use crate::types::{Expect, FormFields, FormFile, Headers, Reply};

const CONTENT_TYPE: &str = "Content-Type";

/// Build a request with an optional JSON body.
///
/// Headers are applied in map order. `Content-Type: application/json` is set
/// only when there is a body and the caller did not supply a content type.
pub fn build_json_request<B: Serialize + ?Sized>(
    method: HttpMethod,
    url: &str,
    headers: &Headers,
    body: Option<&B>,
) -> Result<HttpRequest, RequestError> {
    let mut request = HttpRequest::new(method, url);
    for (name, value) in headers {
        request.set_header(name, value);
    }
    if let Some(body) = body {
        let bytes = serde_json::to_vec(body).map_err(RequestError::Encoding)?;
        if request.header(CONTENT_TYPE).is_none() {
            request.set_header(CONTENT_TYPE, "application/json");
        }
        request.body = Some(bytes);
    }
    Ok(request)
}

/// Build a `multipart/form-data` request.
///
/// The encoder's boundary-bearing `Content-Type` is applied last and replaces
/// any caller-supplied one.
pub fn build_form_request(
    method: HttpMethod,
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    file: Option<&FormFile>,
) -> Result<HttpRequest, RequestError> {
    let form = multipart::encode(fields, file)?;
    let mut request = HttpRequest::new(method, url);
    for (name, value) in headers {
        request.set_header(name, value);
    }
    request.set_header(CONTENT_TYPE, &form.content_type);
    request.body = Some(form.body);
    Ok(request)
}

/// Interpret a response according to `expect`.
///
/// A 404 is always an error. Any other status goes to the decoder.
pub fn parse_reply<T: DeserializeOwned>(
    response: &HttpResponse,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    if response.status == 404 {
        return Err(RequestError::NotFound);
    }
    match expect {
        Expect::Json => serde_json::from_slice(&response.body)
            .map(Reply::Decoded)
            .map_err(RequestError::Decoding),
        Expect::Empty => {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Reply::ExpectedEmpty);
            }
            let value: serde_json::Value =
                serde_json::from_slice(&response.body).map_err(RequestError::Decoding)?;
            if value.is_null() {
                Ok(Reply::ExpectedEmpty)
            } else {
                Err(RequestError::UnexpectedBody(value))
            }
        }
    }
}

/// Runs requests through a `Transport`, reporting to a `RequestLog`.
///
/// Holds no per-request state, so one `Requester` can be cloned and shared
/// across threads freely.
#[derive(Clone)]
pub struct Requester {
    transport: Arc<dyn Transport>,
    log: Arc<dyn RequestLog>,
}

impl Default for Requester {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester").finish_non_exhaustive()
    }
}

impl Requester {
    /// A requester over `UreqTransport` that logs nothing.
    pub fn new() -> Self {
        Self {
            transport: Arc::new(UreqTransport),
            log: Arc::new(NoopLog),
        }
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn with_logger(mut self, log: impl RequestLog + 'static) -> Self {
        self.log = Arc::new(log);
        self
    }

    /// Send a built request and parse the reply.
    pub fn execute<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.log.on_request(&request.method, &request.url);
        let response = self
            .transport
            .send(request)
            .map_err(|e| self.fail(&request.url, e))?;
        self.log
            .on_response(&request.url, response.status, &response.body);
        parse_reply(&response, expect).map_err(|e| self.fail(&request.url, e))
    }

    fn fail(&self, url: &str, error: RequestError) -> RequestError {
        self.log.on_error(url, &error);
        error
    }

    fn json<T, B>(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &Headers,
        body: Option<&B>,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request =
            build_json_request(method, url, headers, body).map_err(|e| self.fail(url, e))?;
        self.execute(&request, expect)
    }

    fn form<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        file: Option<&FormFile>,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        let request = build_form_request(method, url, headers, fields, file)
            .map_err(|e| self.fail(url, e))?;
        self.execute(&request, expect)
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.json::<T, ()>(HttpMethod::Get, url, headers, None, expect)
    }

    pub fn post<T, B>(
        &self,
        url: &str,
        headers: &Headers,
        body: &B,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.json(HttpMethod::Post, url, headers, Some(body), expect)
    }

    pub fn put<T, B>(
        &self,
        url: &str,
        headers: &Headers,
        body: &B,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.json(HttpMethod::Put, url, headers, Some(body), expect)
    }

    pub fn delete<T, B>(
        &self,
        url: &str,
        headers: &Headers,
        body: &B,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.json(HttpMethod::Delete, url, headers, Some(body), expect)
    }

    pub fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.form(HttpMethod::Post, url, headers, fields, None, expect)
    }

    pub fn put_form<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.form(HttpMethod::Put, url, headers, fields, None, expect)
    }

    pub fn delete_form<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.form(HttpMethod::Delete, url, headers, fields, None, expect)
    }

    pub fn post_form_file<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        file: &FormFile,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.form(HttpMethod::Post, url, headers, fields, Some(file), expect)
    }

    pub fn put_form_file<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &Headers,
        fields: &FormFields,
        file: &FormFile,
        expect: Expect,
    ) -> Result<Reply<T>, RequestError> {
        self.form(HttpMethod::Put, url, headers, fields, Some(file), expect)
    }
}

// Free functions over a default `Requester`.

pub fn get<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().get(url, headers, expect)
}

pub fn post<T, B>(
    url: &str,
    headers: &Headers,
    body: &B,
    expect: Expect,
) -> Result<Reply<T>, RequestError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Requester::new().post(url, headers, body, expect)
}

pub fn put<T, B>(
    url: &str,
    headers: &Headers,
    body: &B,
    expect: Expect,
) -> Result<Reply<T>, RequestError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Requester::new().put(url, headers, body, expect)
}

pub fn delete<T, B>(
    url: &str,
    headers: &Headers,
    body: &B,
    expect: Expect,
) -> Result<Reply<T>, RequestError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Requester::new().delete(url, headers, body, expect)
}

pub fn post_form<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().post_form(url, headers, fields, expect)
}

pub fn put_form<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().put_form(url, headers, fields, expect)
}

pub fn delete_form<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().delete_form(url, headers, fields, expect)
}

pub fn post_form_file<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    file: &FormFile,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().post_form_file(url, headers, fields, file, expect)
}

pub fn put_form_file<T: DeserializeOwned>(
    url: &str,
    headers: &Headers,
    fields: &FormFields,
    file: &FormFile,
    expect: Expect,
) -> Result<Reply<T>, RequestError> {
    Requester::new().put_form_file(url, headers, fields, file, expect)
}
