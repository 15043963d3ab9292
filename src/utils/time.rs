//! SNAP timestamps. The bank verifies signatures against wall-clock time in
//! UTC+7 (Asia/Jakarta), independent of the server's locale.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt;

pub const VALIDITY_PERIOD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SNAP_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const JAKARTA_OFFSET_SECS: i32 = 7 * 3600;

pub fn jakarta_offset() -> FixedOffset {
    FixedOffset::east_opt(JAKARTA_OFFSET_SECS).expect("UTC+7 is a valid offset")
}

/// A single rendered instant, signed and sent as `X-TIMESTAMP` verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapTimestamp(String);

impl SnapTimestamp {
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(render(&instant.with_timezone(&jakarta_offset())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn render(instant: &DateTime<FixedOffset>) -> String {
    instant.format(SNAP_TIMESTAMP_FORMAT).to_string()
}

/// Strict `yyyy-mm-dd hh:mm:ss` parse: the value must re-render identically,
/// which rejects unpadded fields and out-of-range dates. Leap seconds (`:60`)
/// are rejected as well; chrono would otherwise keep them and re-render them.
pub fn parse_validity_period(raw: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(raw, VALIDITY_PERIOD_FORMAT).ok()?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }
    (parsed.format(VALIDITY_PERIOD_FORMAT).to_string() == raw).then_some(parsed)
}

/// Interprets a wall-clock validity period in UTC+7 and renders it with offset.
pub fn render_validity_period(local: &NaiveDateTime) -> String {
    match jakarta_offset().from_local_datetime(local).single() {
        Some(instant) => render(&instant),
        // Fixed offsets have no gaps or folds; only reachable at the edge of chrono's range.
        None => format!("{}+07:00", local.format("%Y-%m-%dT%H:%M:%S")),
    }
}
