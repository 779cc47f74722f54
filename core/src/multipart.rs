//! `multipart/form-data` body encoding over ureq's multipart `Form`.
//!
//! Field parts carry only a `name`; the file part also carries a `filename`
//! and, when the extension is known, a guessed content type. The attachment
//! is opened and read to the end inside `encode`, so no handle outlives the
//! call.

use std::io::Read;

use ureq::unversioned::multipart::{Form, Part};

use crate::error::RequestError;
use crate::types::{FormFields, FormFile};

/// An encoded multipart body and the `Content-Type` that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode `fields`, then `file` if given, with a fresh random boundary.
///
/// A form with no parts encodes to an empty body.
pub fn encode(fields: &FormFields, file: Option<&FormFile>) -> Result<EncodedForm, RequestError> {
    let mut form = fields
        .iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    if let Some(file) = file {
        let part = Part::file(&file.path).map_err(|source| RequestError::FileOpen {
            path: file.path.clone(),
            source,
        })?;
        form = form.part(&file.field, part.file_name(&file.file_name()));
    }

    let content_type = format!("multipart/form-data; boundary={}", form.boundary());
    let mut body = Vec::new();
    // Text parts are in-memory slices; only the attachment can fail to read.
    form.read_to_end(&mut body).map_err(|source| RequestError::FileRead {
        path: file.map(|f| f.path.clone()).unwrap_or_default(),
        source,
    })?;

    Ok(EncodedForm { content_type, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn boundary(form: &EncodedForm) -> &str {
        form.content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
    }

    #[test]
    fn fields_only_layout() {
        let form = encode(&fields(&[("a", "1"), ("b", "two")]), None).unwrap();
        let b = boundary(&form);
        let expected = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\ntwo\r\n\
             --{b}--\r\n"
        );
        assert_eq!(String::from_utf8(form.body.clone()).unwrap(), expected);
    }

    #[test]
    fn empty_form_has_no_body() {
        let form = encode(&FormFields::new(), None).unwrap();
        assert!(form.content_type.starts_with("multipart/form-data; boundary="));
        assert!(form.body.is_empty());
    }

    #[test]
    fn file_part_carries_base_name_type_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello\x00world").unwrap();

        let file = FormFile::new("upload", &path);
        let form = encode(&fields(&[("k", "v")]), Some(&file)).unwrap();
        let b = boundary(&form);

        let mut expected = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"k\"\r\n\r\nv\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        expected.extend_from_slice(b"hello\x00world");
        expected.extend_from_slice(format!("\r\n--{b}--\r\n").as_bytes());
        assert_eq!(form.body, expected);
    }

    #[test]
    fn unknown_extension_has_no_part_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.qqqzz");
        std::fs::write(&path, b"raw").unwrap();

        let form = encode(&FormFields::new(), Some(&FormFile::new("file", &path))).unwrap();
        let text = String::from_utf8(form.body).unwrap();
        assert!(text.contains("filename=\"blob.qqqzz\"\r\n\r\nraw"), "{text}");
        assert!(!text.contains("Content-Type"), "{text}");
    }

    #[test]
    fn missing_file_is_file_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = FormFile::new("file", dir.path().join("absent.bin"));
        let err = encode(&FormFields::new(), Some(&file)).unwrap_err();
        assert!(matches!(err, RequestError::FileOpen { .. }), "got {err:?}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn directory_attachment_fails_while_reading() {
        let dir = tempfile::tempdir().unwrap();
        let file = FormFile::new("file", dir.path());
        let err = encode(&FormFields::new(), Some(&file)).unwrap_err();
        match err {
            RequestError::FileRead { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected FileRead, got {other:?}"),
        }
    }

    #[test]
    fn boundaries_are_random() {
        let a = encode(&FormFields::new(), None).unwrap();
        let b = encode(&FormFields::new(), None).unwrap();
        assert_ne!(a.content_type, b.content_type);
    }
}
