//! Request inputs and reply shapes shared by every verb.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Header name to value. Names are unique within the map.
pub type Headers = BTreeMap<String, String>;

/// Plain multipart fields, emitted in key order.
pub type FormFields = BTreeMap<String, String>;

/// A file attached to a multipart body under `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    pub field: String,
    pub path: PathBuf,
}

impl FormFile {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }

    /// Base name of `path`, used as the part's `filename`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// What the caller wants out of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expect {
    /// Decode the body as JSON into the requested type.
    #[default]
    Json,
    /// The body must be empty or the JSON literal `null`.
    Empty,
}

/// Outcome of a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Decoded(T),
    ExpectedEmpty,
}

impl<T> Reply<T> {
    pub fn into_decoded(self) -> Option<T> {
        match self {
            Reply::Decoded(value) => Some(value),
            Reply::ExpectedEmpty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::ExpectedEmpty)
    }
}
