//! Wall-clock time for parkd
//!
//! Session timestamps and tariff banding both use local wall-clock time.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `PARKD_MOCK_TIME` environment variable shifts the
//! service clock so that day and night pricing can be exercised at any hour.
//! Mock time advances at the real rate from the given starting point.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 17:40:00`)
//!
//! ```bash
//! PARKD_MOCK_TIME="2025-12-25 17:40:00" parkd
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "PARKD_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Parse a mock time string into a local timestamp.
pub fn parse_mock_time(value: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value, MOCK_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

fn mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let raw = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            match parse_mock_time(&raw) {
                Some(mock_dt) => {
                    let offset = mock_dt.signed_duration_since(Local::now());
                    tracing::info!(
                        mock_time = %raw,
                        offset_secs = offset.num_seconds(),
                        "Mock time enabled"
                    );
                    Some(offset)
                }
                None => {
                    tracing::warn!(
                        mock_time = %raw,
                        expected_format = MOCK_TIME_FORMAT,
                        "Invalid mock time, using system clock"
                    );
                    None
                }
            }
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    mock_time_offset().is_some()
}

/// Current local time, honouring `PARKD_MOCK_TIME` in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();
    match mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a timestamp with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
