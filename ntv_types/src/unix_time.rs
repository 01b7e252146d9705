use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. The graph code takes explicit
/// timestamps so tests can drive the clock; this is the production source.
pub fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
