use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::fmt::Display;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// A screenshot picked by the user, kept both as the original file bytes (sent to the model)
/// and decoded (shown as a preview).
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    bytes: Vec<u8>,
    pixels: RgbaImage,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .field("dimensions", &self.pixels.dimensions())
            .finish()
    }
}

#[derive(Debug)]
pub enum UploadError {
    UnsupportedFormat { supported_formats: Vec<String> },
    IoError(std::io::Error),
    DecodeError(image::ImageError),
}

impl Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::UnsupportedFormat { supported_formats } => {
                write!(
                    f,
                    "Unsupported image format. Supported formats: {:?}",
                    supported_formats
                )
            }
            UploadError::IoError(e) => {
                write!(f, "IO error: {}", e)
            }
            UploadError::DecodeError(e) => {
                write!(f, "Could not decode image: {}", e)
            }
        }
    }
}

impl std::error::Error for UploadError {}

impl UploadedImage {
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Check the extension before reading a possibly large unrelated file
        format_for(&file_name)?;
        let bytes = std::fs::read(path).map_err(UploadError::IoError)?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: String, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let (format, mime_type) = format_for(&file_name)?;
        let pixels = image::load_from_memory_with_format(&bytes, format)
            .map_err(UploadError::DecodeError)?
            .to_rgba8();
        log::debug!(
            "Loaded {} ({}x{}, {} bytes)",
            file_name,
            pixels.width(),
            pixels.height(),
            bytes.len()
        );
        Ok(UploadedImage {
            file_name,
            mime_type,
            bytes,
            pixels,
        })
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn base64_data(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

fn format_for(file_name: &str) -> Result<(ImageFormat, &'static str), UploadError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => Ok((ImageFormat::Png, "image/png")),
        Some("jpg") | Some("jpeg") => Ok((ImageFormat::Jpeg, "image/jpeg")),
        _ => Err(UploadError::UnsupportedFormat {
            supported_formats: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }),
    }
}
