//! Common types used throughout parqshard
//!
//! This module contains shared type definitions, type aliases,
//! and small unit-conversion helpers used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Size Units
// ============================================================================

/// Bytes per megabyte
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Convert a megabyte count to bytes
pub fn mb_to_bytes(mb: f64) -> u64 {
    (mb * BYTES_PER_MB) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb() {
        assert!((bytes_to_mb(1024 * 1024) - 1.0).abs() < f64::EPSILON);
        assert!((bytes_to_mb(512 * 1024) - 0.5).abs() < f64::EPSILON);
        assert!((bytes_to_mb(0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mb_to_bytes() {
        assert_eq!(mb_to_bytes(1.0), 1024 * 1024);
        assert_eq!(mb_to_bytes(9.0), 9 * 1024 * 1024);
    }
}
