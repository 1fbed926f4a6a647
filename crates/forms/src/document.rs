use crate::FormError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// A captured document or photo, ready to be sent as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImage {
    mime: &'static str,
    bytes: Vec<u8>,
}

impl DocumentImage {
    pub fn new(mime: &'static str, bytes: Vec<u8>) -> Self {
        Self { mime, bytes }
    }

    /// Build from file contents, choosing the MIME type by extension.
    pub fn from_file_bytes(file_name: &Path, bytes: Vec<u8>) -> Result<Self, FormError> {
        let ext = file_name
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = mime_for_extension(&ext)
            .ok_or_else(|| FormError::UnsupportedDocument(file_name.display().to_string()))?;
        Ok(Self::new(mime, bytes))
    }

    pub fn mime(&self) -> &str {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Split a data URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}
