//! Collect a `multipart/form-data` body into text fields and file uploads.

use std::collections::HashMap;

use axum::extract::Multipart;
use servdesk_core::error::CoreError;
use servdesk_core::images::ImageUpload;
use servdesk_core::types::DbId;

use crate::error::{AppError, AppResult};

/// A fully read multipart form.
///
/// Parts that carry a file name are files, everything else is text. An empty
/// file input (browsers send one when nothing was chosen) counts as absent.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let upload = ImageUpload {
                        field: name.clone(),
                        bytes: bytes.to_vec(),
                    };
                    form.files.insert(name, upload);
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Text value of `name`, if the field was sent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text value of `name`; a missing field is a validation error.
    pub fn required_text(&self, name: &str) -> AppResult<&str> {
        self.text(name).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("{name}: this field is required")))
        })
    }

    /// Parse an optional id field; an empty value counts as absent.
    pub fn optional_id(&self, name: &str) -> AppResult<Option<DbId>> {
        match self.text(name).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::Core(CoreError::Validation(format!("{name}: expected an id, got '{raw}'")))
            }),
        }
    }

    /// Take the upload sent in `name`, if any.
    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}
