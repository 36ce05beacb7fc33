use imgpress_core::models::CompressResponse;

use crate::compressor::CompressionOutcome;

/// Shapes compression outcomes into client responses.
pub struct ResultReporter;

impl ResultReporter {
    /// Build the response for `outcome`.
    ///
    /// `base_url` is the public prefix files are served under, e.g.
    /// `http://localhost:5001/uploads`. A trailing slash is tolerated.
    pub fn build_response(outcome: &CompressionOutcome, base_url: &str) -> CompressResponse {
        let base_url = base_url.trim_end_matches('/');
        let file_name = outcome.file_name().to_string();

        let compression_ratio = if outcome.is_accepted() {
            Self::compression_ratio(outcome.original_size, outcome.compressed_size)
        } else {
            "0.00".to_string()
        };

        CompressResponse {
            url: format!("{}/{}", base_url, file_name),
            original_size: outcome.original_size,
            compressed_size: outcome.compressed_size,
            compression_ratio,
            file_name,
            format: outcome.format.tag().to_string(),
        }
    }

    /// Percentage of bytes saved by an accepted re-encode, rounded half up to two
    /// decimals.
    ///
    /// An accepted output is strictly smaller than a non-empty original, so the value is
    /// kept within `0.01..=99.99`; rounding alone would report `0.00` for a one byte saving
    /// on a large file and `100.00` for a near-empty output.
    pub fn compression_ratio(original_size: u64, compressed_size: u64) -> String {
        if original_size == 0 {
            return "0.00".to_string();
        }

        let saved = original_size as f64 - compressed_size as f64;
        let percent = saved / original_size as f64 * 100.0;
        // `{:.2}` alone rounds exact ties to even
        let rounded = (percent * 100.0).round() / 100.0;
        format!("{:.2}", rounded.clamp(0.01, 99.99))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::Decision;
    use crate::format::OutputFormat;

    fn accepted(original_size: u64, compressed_size: u64) -> CompressionOutcome {
        CompressionOutcome {
            format: OutputFormat::Jpeg,
            original_size,
            compressed_size,
            original_file_name: "photo.jpg".to_string(),
            decision: Decision::Accepted {
                file_name: "compressed-1718000000000.jpeg".to_string(),
            },
        }
    }

    #[test]
    fn test_accepted_response() {
        let response = ResultReporter::build_response(
            &accepted(100_000, 40_000),
            "http://localhost:5001/uploads",
        );

        assert_eq!(
            response.url,
            "http://localhost:5001/uploads/compressed-1718000000000.jpeg"
        );
        assert_eq!(response.original_size, 100_000);
        assert_eq!(response.compressed_size, 40_000);
        assert_eq!(response.compression_ratio, "60.00");
        assert_eq!(response.file_name, "compressed-1718000000000.jpeg");
        assert_eq!(response.format, "jpeg");
    }

    #[test]
    fn test_rejected_response_points_at_original() {
        let outcome = CompressionOutcome {
            format: OutputFormat::Png,
            original_size: 5_000,
            compressed_size: 5_200,
            original_file_name: "diagram.png".to_string(),
            decision: Decision::Rejected,
        };

        let response = ResultReporter::build_response(&outcome, "http://h/uploads/");

        assert_eq!(response.url, "http://h/uploads/diagram.png");
        assert_eq!(response.file_name, "diagram.png");
        assert_eq!(response.compression_ratio, "0.00");
        assert_eq!(response.compressed_size, 5_200);
        assert_eq!(response.format, "png");
    }

    #[test]
    fn test_ratio_has_two_decimals() {
        assert_eq!(ResultReporter::compression_ratio(3, 2), "33.33");
        assert_eq!(ResultReporter::compression_ratio(3, 1), "66.67");
        assert_eq!(ResultReporter::compression_ratio(1_000, 1), "99.90");
        assert_eq!(ResultReporter::compression_ratio(0, 0), "0.00");
    }

    #[test]
    fn test_ratio_rounds_ties_up() {
        // 90.625 and 78.125 are exact in binary
        assert_eq!(ResultReporter::compression_ratio(32, 3), "90.63");
        assert_eq!(ResultReporter::compression_ratio(32, 7), "78.13");
        assert_eq!(ResultReporter::compression_ratio(8, 7), "12.50");
    }

    #[test]
    fn test_accepted_ratio_stays_strictly_between_bounds() {
        assert_eq!(ResultReporter::compression_ratio(1_000_000, 1), "99.99");
        assert_eq!(ResultReporter::compression_ratio(10, 0), "99.99");
        assert_eq!(ResultReporter::compression_ratio(1_000_000, 999_999), "0.01");

        let response = ResultReporter::build_response(&accepted(1_000_000, 1), "http://h");
        assert_eq!(response.compression_ratio, "99.99");
    }

    #[test]
    fn test_build_response_is_deterministic() {
        let outcome = accepted(2_048, 1_024);
        let first = ResultReporter::build_response(&outcome, "https://img.example.com/uploads");
        let second = ResultReporter::build_response(&outcome, "https://img.example.com/uploads");
        assert_eq!(first, second);
        assert_eq!(first.compression_ratio, "50.00");
    }
}
