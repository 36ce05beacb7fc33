//! Process-wide constants.
//!
//! Encoding profiles and the retention policy are fixed for the whole process; they are
//! not part of the environment configuration surface.

/// JPEG re-encode quality (0-100)
pub const JPEG_QUALITY: u8 = 55;

/// WebP re-encode quality (0-100)
pub const WEBP_QUALITY: u8 = 55;

/// PNG deflate compression level (0-9, 9 = maximum)
pub const PNG_COMPRESSION_LEVEL: u8 = 9;

/// Prefix of generated output names: `compressed-<unix-millis>.<format>`
pub const COMPRESSED_FILE_PREFIX: &str = "compressed-";

/// Files strictly older than this many days are removed by the retention sweep.
pub const RETENTION_MAX_AGE_DAYS: f64 = 7.0;

/// Hour (UTC) at which the daily retention sweep fires.
pub const RETENTION_SWEEP_HOUR_UTC: u32 = 0;

/// Minute (UTC) at which the daily retention sweep fires.
pub const RETENTION_SWEEP_MINUTE_UTC: u32 = 0;

/// Milliseconds in one day, the unit used for age computation.
pub const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
