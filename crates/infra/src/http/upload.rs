//! Multipart file uploads

use std::collections::BTreeMap;

use opsdeck_domain::constants::UPLOAD_FIELD_NAME;
use opsdeck_domain::UploadConfig;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api::errors::ApiError;

/// File plus extra form fields, sent as `multipart/form-data`.
///
/// The file goes under the `file` field; extra field values are coerced to
/// strings.
#[derive(Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub fields: BTreeMap<String, Value>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .field("fields", &self.fields)
            .finish()
    }
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reject files over the size limit or with a MIME type not on the list.
    pub fn validate(&self, limits: &UploadConfig) -> Result<(), ApiError> {
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidInput(format!("{} is empty", self.file_name)));
        }

        if self.size() as u64 > limits.max_size_bytes {
            return Err(ApiError::InvalidInput(format!(
                "{} is {} bytes, exceeding the {} byte limit",
                self.file_name,
                self.size(),
                limits.max_size_bytes
            )));
        }

        let mime = self.mime_type.trim().to_ascii_lowercase();
        if !limits.allowed_mime_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(&mime)) {
            return Err(ApiError::InvalidInput(format!(
                "file type {} is not allowed",
                self.mime_type
            )));
        }

        Ok(())
    }

    /// Build a fresh form; reqwest forms are consumed on send.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime_type)
            .map_err(|err| ApiError::Encode(format!("invalid MIME type {}: {err}", self.mime_type)))?;

        let form = self.fields.iter().fold(Form::new(), |form, (name, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form.text(name.clone(), text)
        });

        Ok(form.part(UPLOAD_FIELD_NAME, part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> UploadConfig {
        UploadConfig {
            max_size_bytes: 8,
            allowed_mime_types: vec!["image/png".into(), "image/jpeg".into()],
        }
    }

    #[test]
    fn accepts_allowed_file() {
        let upload = Upload::new("a.png", "image/PNG", vec![1, 2, 3]);
        assert!(upload.validate(&limits()).is_ok());
    }

    #[test]
    fn rejects_oversized_file() {
        let upload = Upload::new("big.png", "image/png", vec![0; 9]);
        let err = upload.validate(&limits()).unwrap_err();
        assert_eq!(err.code(), Some("VALIDATION_ERROR"));
        assert!(err.message().contains("exceeding"));
    }

    #[test]
    fn rejects_disallowed_type() {
        let upload = Upload::new("doc.pdf", "application/pdf", vec![1]);
        assert!(matches!(upload.validate(&limits()), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn invalid_mime_type_fails_form_construction() {
        let upload = Upload::new("a.bin", "not a mime", vec![1]);
        assert!(matches!(upload.to_form(), Err(ApiError::Encode(_))));
    }

    #[test]
    fn debug_omits_file_contents() {
        let upload = Upload::new("a.png", "image/png", vec![42; 4]).with_field("folder", "avatars");
        let rendered = format!("{upload:?}");
        assert!(rendered.contains("size: 4"));
        assert!(!rendered.contains("42"));
    }
}
