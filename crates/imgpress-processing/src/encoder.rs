//! Image encoders.
//!
//! [`ImageEncoder`] is the seam between the compression decision and the codecs. The
//! compressor only looks at the size of what comes back.

use crate::format::{EncodingProfile, OutputFormat};

/// Re-encodes raw image bytes into `format` using `profile`.
///
/// Encoding is CPU-bound and synchronous; callers run it on a blocking thread.
pub trait ImageEncoder: Send + Sync {
    fn encode(
        &self,
        data: &[u8],
        format: OutputFormat,
        profile: EncodingProfile,
    ) -> anyhow::Result<Vec<u8>>;
}

#[cfg(feature = "native-encoder")]
pub use native::NativeEncoder;

#[cfg(feature = "native-encoder")]
mod native {
    use super::ImageEncoder;
    use crate::format::{EncodingProfile, OutputFormat};
    use anyhow::{anyhow, Context, Result};
    use image::codecs::png::{CompressionType, FilterType, PngEncoder};
    use image::{DynamicImage, GenericImageView, ImageReader};
    use std::io::Cursor;

    /// In-process encoder: decodes with `image`, then re-encodes with mozjpeg, the
    /// `image` PNG encoder or libwebp.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NativeEncoder;

    impl ImageEncoder for NativeEncoder {
        fn encode(
            &self,
            data: &[u8],
            format: OutputFormat,
            profile: EncodingProfile,
        ) -> Result<Vec<u8>> {
            let img = ImageReader::new(Cursor::new(data))
                .with_guessed_format()
                .context("Failed to read image header")?
                .decode()
                .context("Failed to decode image")?;

            match (format, profile) {
                (OutputFormat::Jpeg, EncodingProfile::Lossy { quality }) => {
                    Self::encode_jpeg(&img, quality)
                }
                (OutputFormat::WebP, EncodingProfile::Lossy { quality }) => {
                    Self::encode_webp(&img, quality)
                }
                (OutputFormat::Png, EncodingProfile::Lossless { compression_level }) => {
                    Self::encode_png(&img, compression_level)
                }
                (format, profile) => Err(anyhow!(
                    "Profile {:?} cannot be used for {}",
                    profile,
                    format
                )),
            }
        }
    }

    impl NativeEncoder {
        /// Compress to JPEG using mozjpeg
        ///
        /// mozjpeg reports libjpeg errors by panicking; the compressor runs encoders on a
        /// blocking task, where a panic surfaces as a join error.
        fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
            let rgb_img = img.to_rgb8();
            let (width, height) = rgb_img.dimensions();

            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality as f32);
            comp.set_progressive_mode();
            comp.set_optimize_coding(true);

            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(&rgb_img)?;
            let jpeg_data = comp.finish()?;

            Ok(jpeg_data)
        }

        /// Compress to PNG; levels map onto the deflate presets `image` exposes.
        fn encode_png(img: &DynamicImage, compression_level: u8) -> Result<Vec<u8>> {
            let compression = match compression_level {
                0..=3 => CompressionType::Fast,
                4..=6 => CompressionType::Default,
                _ => CompressionType::Best,
            };

            let mut buffer = Vec::new();
            let encoder =
                PngEncoder::new_with_quality(&mut buffer, compression, FilterType::Adaptive);
            img.write_with_encoder(encoder)?;

            Ok(buffer)
        }

        /// Compress to WebP
        fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
            let (width, height) = img.dimensions();
            let rgba_img = img.to_rgba8();

            let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
            let webp_data = encoder.encode(quality as f32);

            Ok(webp_data.to_vec())
        }
    }

}
