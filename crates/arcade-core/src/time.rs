use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with second precision, e.g. `2026-01-01T00:00:00Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
