//! Progress scraping from the bridge tool's console output.
//!
//! `adb push/pull -p` prints lines such as `[ 42%] /sdcard/file.bin`. This is
//! incidental console output rather than a versioned format, so the parsing
//! lives behind [`ProgressParser`] and every value derived from it is an
//! estimate for display only.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PERCENT_RE: Regex = Regex::new(r"\b(\d{1,3})\s*%").unwrap();
}

/// Extracts a percent-complete value from one line of transfer output
pub trait ProgressParser: Send + Sync {
    fn parse(&self, line: &str) -> Option<u8>;
}

/// Permissive matcher for the first `NN%` in a line, clamped to 100
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentParser;

impl ProgressParser for PercentParser {
    fn parse(&self, line: &str) -> Option<u8> {
        let caps = PERCENT_RE.captures(line)?;
        let value: u32 = caps[1].parse().ok()?;
        Some(value.min(100) as u8)
    }
}

/// Approximate bytes moved at `percent` of `total`. Display only.
pub fn approx_bytes(percent: u8, total: u64) -> u64 {
    (total as u128 * percent.min(100) as u128 / 100) as u64
}
