use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ImageError;

/// A photo handed over by the view, kept as decoded bytes plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parses `data:<mime>;base64,<payload>`. A missing MIME type defaults
    /// to JPEG, which is what cameras hand out.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(ImageError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
        let mime_type = header.strip_suffix(";base64").ok_or(ImageError::NotDataUri)?;
        let mime_type = if mime_type.is_empty() { "image/jpeg" } else { mime_type };

        let bytes = STANDARD.decode(payload)?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self::new(mime_type, bytes))
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}
