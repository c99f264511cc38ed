//! Capacity string parsing
//!
//! Recognizes the binary suffixes GB, MB and KB (case-insensitive); anything
//! else is taken as a literal byte count.

use anyhow::{Context, Result};

/// Parse a capacity string into bytes.
///
/// Supports:
/// - "5GB"  → 5 × 1024³
/// - "10MB" → 10 × 1024²
/// - "64KB" → 64 × 1024
/// - "2048" → 2048 bytes (no suffix ⇒ bytes)
///
/// Suffixes are case-insensitive ("5gb" == "5GB"). The magnitude must be a
/// whole number; a non-numeric string without a recognized suffix fails with
/// a plain integer-conversion error.
pub fn parse_size(input: &str) -> Result<u64> {
    let upper = input.trim().to_uppercase();

    let (digits, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
        (n, 1024u64.pow(3))
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1024u64.pow(2))
    } else if let Some(n) = upper.strip_suffix("KB") {
        (n, 1024u64)
    } else {
        (upper.as_str(), 1)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .with_context(|| format!("invalid size value: '{}'", input))?;

    value
        .checked_mul(multiplier)
        .with_context(|| format!("size overflows u64: '{}'", input))
}
