use std::fmt;

use imgpress_core::constants::{JPEG_QUALITY, PNG_COMPRESSION_LEVEL, WEBP_QUALITY};

use crate::error::CompressionError;

/// Encoder parameters for one output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingProfile {
    /// Lossy codec, quality 0-100
    Lossy { quality: u8 },
    /// Lossless codec, deflate level 0-9
    Lossless { compression_level: u8 },
}

/// Output format of a re-encode. Always the same as the declared input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Parse the declared MIME type of an upload.
    ///
    /// The subtype is the format tag (`image/jpeg` -> `jpeg`). Parameters are ignored and
    /// the comparison is case-insensitive. Anything other than `jpeg`, `png` or `webp` is
    /// rejected.
    pub fn from_mime_type(mime_type: &str) -> Result<Self, CompressionError> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        let subtype = essence
            .split_once('/')
            .map(|(_, subtype)| subtype.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match subtype.as_str() {
            "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(CompressionError::UnsupportedFormat(mime_type.to_string())),
        }
    }

    /// Format tag, also used as the file extension of generated outputs
    pub fn tag(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn extension(self) -> &'static str {
        self.tag()
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    pub fn profile(self) -> EncodingProfile {
        match self {
            OutputFormat::Jpeg => EncodingProfile::Lossy {
                quality: JPEG_QUALITY,
            },
            OutputFormat::Png => EncodingProfile::Lossless {
                compression_level: PNG_COMPRESSION_LEVEL,
            },
            OutputFormat::WebP => EncodingProfile::Lossy {
                quality: WEBP_QUALITY,
            },
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
