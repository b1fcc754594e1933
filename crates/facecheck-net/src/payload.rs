use crate::NetError;
use image::ImageFormat;
use std::path::Path;

/// An encoded image ready to be sent to the model host.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub format: ImageFormat,
}

impl ImagePayload {
    /// Wrap encoded image bytes, sniffing the format from the content.
    ///
    /// Files that are not a recognised image format are rejected here
    /// rather than by the model host.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, NetError> {
        let format = image::guess_format(&bytes).map_err(|e| NetError::Image(e.to_string()))?;
        Ok(Self {
            bytes,
            file_name: file_name.into(),
            format,
        })
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self, NetError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self::from_bytes(bytes, file_name)
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Multipart part named `image`, as the model host expects.
    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, NetError> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime_type())
            .map_err(|e| NetError::Image(e.to_string()))
    }
}
