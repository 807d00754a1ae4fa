//! Label assets and their printable content
//!
//! A stored label keeps its payload as a `data:` URI. The payload is decoded
//! once, at ingestion, into a [`LabelContent`] variant that the compositor
//! dispatches on.

use crate::constants::{ALLOWED_LABEL_TYPES, MAX_LABEL_FILE_BYTES};
use crate::types::{Result, ValidationErrors};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_JPG: &str = "image/jpg";
pub const MIME_PDF: &str = "application/pdf";

/// A stored label artifact
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LabelAsset {
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    pub image_data: String,
    /// MIME type of the payload
    pub file_type: String,
}

impl LabelAsset {
    /// Build an asset from raw file bytes, checking type and size limits
    pub fn from_file_bytes(name: &str, bytes: &[u8], file_type: &str) -> Result<Self> {
        let mut errors = ValidationErrors::new();
        if name.trim().is_empty() {
            errors.push("name", "label name is required");
        }
        if !ALLOWED_LABEL_TYPES.contains(&file_type) {
            errors.push(
                "file_type",
                format!("'{}' is not allowed, use JPG or PDF", file_type),
            );
        }
        if bytes.is_empty() {
            errors.push("image_data", "file is empty");
        } else if bytes.len() > MAX_LABEL_FILE_BYTES {
            errors.push(
                "image_data",
                format!("file exceeds {} bytes", MAX_LABEL_FILE_BYTES),
            );
        }
        errors.into_result()?;

        Ok(Self {
            name: name.to_string(),
            image_data: format!("data:{};base64,{}", file_type, BASE64.encode(bytes)),
            file_type: file_type.to_string(),
        })
    }

    /// Check the fields a stored asset must carry
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "label name is required");
        }
        if self.image_data.is_empty() {
            errors.push("image_data", "image data is required");
        }
        if self.file_type.is_empty() {
            errors.push("file_type", "file type is required");
        }
        errors.into_result()
    }

    /// Decode the payload into printable content
    pub fn content(&self) -> std::result::Result<LabelContent, ContentError> {
        LabelContent::from_data_uri(&self.image_data, &self.file_type)
    }
}

/// Printable label content
#[derive(Debug, Clone, PartialEq)]
pub enum LabelContent {
    /// JPEG bytes, placed as an image
    Raster(Vec<u8>),
    /// PDF bytes; the first page is placed as a form
    EmbeddedPage(Vec<u8>),
}

/// Why a stored payload cannot be printed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("image data does not start with 'data:'")]
    MissingDataPrefix,
    #[error("image data has no base64 payload")]
    MalformedDataUri,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
    #[error("unsupported file type '{0}'")]
    UnsupportedType(String),
}

impl LabelContent {
    /// Decode a `data:` URI according to the declared file type.
    ///
    /// The type declared on the asset decides the variant; the MIME type
    /// inside the URI header is not consulted.
    pub fn from_data_uri(
        data: &str,
        file_type: &str,
    ) -> std::result::Result<LabelContent, ContentError> {
        if !data.starts_with("data:") {
            return Err(ContentError::MissingDataPrefix);
        }
        let payload = data
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or(ContentError::MalformedDataUri)?;

        let file_type = file_type.trim().to_ascii_lowercase();
        let kind = match file_type.as_str() {
            MIME_PDF => LabelContent::EmbeddedPage,
            MIME_JPEG | MIME_JPG => LabelContent::Raster,
            _ => return Err(ContentError::UnsupportedType(file_type)),
        };

        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| ContentError::InvalidBase64(e.to_string()))?;
        Ok(kind(bytes))
    }
}

/// A label joined with its print-time parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabel {
    /// Store id, when the label came from a store
    pub id: Option<i64>,
    pub name: String,
    /// Decoded content, or the reason it cannot be printed
    pub content: std::result::Result<LabelContent, ContentError>,
    /// Copies to place
    pub quantity: u32,
    /// Date to stamp on every copy, if any
    pub date: Option<String>,
}

impl ResolvedLabel {
    /// Resolve a stored asset for printing
    pub fn from_asset(
        id: Option<i64>,
        asset: &LabelAsset,
        quantity: u32,
        date: Option<String>,
    ) -> Self {
        Self {
            id,
            name: asset.name.clone(),
            content: asset.content(),
            quantity,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_jpeg_uri() {
        let content = LabelContent::from_data_uri("data:image/jpeg;base64,AQID", MIME_JPEG);
        assert_eq!(content, Ok(LabelContent::Raster(vec![1, 2, 3])));

        let content = LabelContent::from_data_uri("data:image/jpg;base64,AQID", "IMAGE/JPG");
        assert_eq!(content, Ok(LabelContent::Raster(vec![1, 2, 3])));
    }

    #[test]
    fn test_decode_pdf_uri() {
        let content = LabelContent::from_data_uri("data:application/pdf;base64,AQID", MIME_PDF);
        assert_eq!(content, Ok(LabelContent::EmbeddedPage(vec![1, 2, 3])));
    }

    #[test]
    fn test_missing_prefix() {
        let content = LabelContent::from_data_uri("AQID", MIME_JPEG);
        assert_eq!(content, Err(ContentError::MissingDataPrefix));
    }

    #[test]
    fn test_missing_payload() {
        let content = LabelContent::from_data_uri("data:image/jpeg;base64", MIME_JPEG);
        assert_eq!(content, Err(ContentError::MalformedDataUri));
    }

    #[test]
    fn test_bad_base64() {
        let content = LabelContent::from_data_uri("data:image/jpeg;base64,***", MIME_JPEG);
        assert!(matches!(content, Err(ContentError::InvalidBase64(_))));
    }

    #[test]
    fn test_unsupported_type() {
        let content = LabelContent::from_data_uri("data:image/png;base64,AQID", "image/png");
        assert_eq!(
            content,
            Err(ContentError::UnsupportedType("image/png".to_string()))
        );
    }

    #[test]
    fn test_from_file_bytes_builds_data_uri() {
        let asset = LabelAsset::from_file_bytes("Jar", &[1, 2, 3], MIME_PDF).unwrap();
        assert_eq!(asset.image_data, "data:application/pdf;base64,AQID");
        assert_eq!(asset.content(), Ok(LabelContent::EmbeddedPage(vec![1, 2, 3])));
    }

    #[test]
    fn test_from_file_bytes_rejects_png_and_empty() {
        let err = LabelAsset::from_file_bytes("", &[], "image/png").unwrap_err();
        let crate::LabelSheetError::Validation(errors) = err else {
            panic!("Expected Validation error");
        };
        assert!(errors.has_field("name"));
        assert!(errors.has_field("file_type"));
        assert!(errors.has_field("image_data"));
    }
}
