//! Multipart form parsing helpers
//!
//! Provides reusable abstractions for parsing multipart/form-data uploads,
//! reducing code duplication across handlers.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::validation::{validate_content_type, validate_file_size};

/// Represents a file uploaded via multipart form
#[derive(Debug, Clone)]
pub struct FileField {
    /// File data bytes
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
    /// Original filename from the multipart field (if provided)
    pub file_name: Option<String>,
}

/// Parsed multipart form fields
///
/// Provides structured access to the photo field and text fields from a
/// multipart/form-data request. The photo field name differs per endpoint
/// (`face_image` on registration, `selfie_image` on check-in), so it is
/// passed in by the handler.
#[derive(Debug)]
pub struct MultipartFields {
    /// Name of the expected photo field
    file_field: String,
    /// The uploaded photo, if present
    file: Option<FileField>,
    /// Text fields indexed by name
    text_fields: HashMap<String, String>,
}

impl MultipartFields {
    /// Parse all fields from a multipart request
    ///
    /// # Arguments
    /// * `multipart` - The Axum multipart extractor
    /// * `file_field` - Name of the photo field for this endpoint
    /// * `max_file_size` - Maximum allowed file size in bytes
    pub async fn parse(
        multipart: &mut Multipart,
        file_field: &str,
        max_file_size: usize,
    ) -> Result<Self, ApiError> {
        let mut file: Option<FileField> = None;
        let mut text_fields = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == file_field {
                // Extract file metadata
                let content_type = field.content_type().map(|s| s.to_string());
                let file_name = field.file_name().map(|s| s.to_string());

                validate_content_type(content_type.as_deref())?;

                // Read file data
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?
                    .to_vec();

                validate_file_size(data.len(), max_file_size)?;

                file = Some(FileField {
                    data,
                    content_type,
                    file_name,
                });
            } else {
                // Text field
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field '{}': {}", name, e))
                })?;
                text_fields.insert(name, value);
            }
        }

        Ok(Self {
            file_field: file_field.to_string(),
            file,
            text_fields,
        })
    }

    /// Get the photo field (required)
    ///
    /// Returns an error if no file was uploaded.
    pub fn require_file(&self) -> Result<&FileField, ApiError> {
        self.file.as_ref().ok_or_else(|| {
            ApiError::bad_request(format!(
                "No file provided. Use '{}' field in multipart form.",
                self.file_field
            ))
        })
    }

    /// Get a text field value
    ///
    /// Returns `None` if the field is not present.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.text_fields.get(name).map(|s| s.as_str())
    }

    /// Get a non-empty text field value (required)
    pub fn require_text(&self, name: &str, label: &str) -> Result<&str, ApiError> {
        match self.get_text(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ApiError::bad_request(format!("{} is required", label))),
        }
    }
}
