//! Error types for the request helpers.
//!
//! # Design
//! One variant per pipeline stage, so callers can tell an encoding problem
//! from a network failure from a body that did not decode. `NotFound` gets a
//! dedicated variant because a 404 is the only status treated as a failure at
//! this layer; every other status is handed to the decoder.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the request verbs.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request body could not be serialized to JSON.
    #[error("encoding request body failed: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The URL, method or a header could not form a valid request.
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    /// The request could not be delivered or no response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("404 page not found")]
    NotFound,

    /// The response body could not be read to the end.
    #[error("reading response body failed: {0}")]
    Read(String),

    /// The response body is not valid JSON for the requested type.
    #[error("decoding response body failed: {0}")]
    Decoding(#[source] serde_json::Error),

    /// An empty response was expected but the body decoded to a value.
    #[error("expected an empty response, got {0}")]
    UnexpectedBody(serde_json::Value),

    /// The multipart attachment could not be opened.
    #[error("opening {path} failed: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The multipart attachment failed while being copied into the body.
    #[error("reading {path} failed: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
