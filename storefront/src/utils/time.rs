//! 时间工具函数: 业务时区转换
//!
//! Opening hours are wall-clock times in the business timezone, so "now"
//! is always resolved through [`Tz`] before it reaches the hours evaluator.

use chrono::{NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

/// 解析营业时间字符串 (HH:MM)
///
/// Blank or malformed values yield `None`; callers treat that boundary as
/// undefined rather than guessing a default.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!("Failed to parse time of day '{}': {}", value, e);
            None
        }
    }
}

/// 解析业务时区，失败时回退到 UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|e| {
        tracing::warn!("Unknown timezone '{}': {}, falling back to UTC", name, e);
        Tz::UTC
    })
}

/// 当前业务时区的本地时间
pub fn local_now(tz: Tz) -> NaiveDateTime {
    chrono::Utc::now().with_timezone(&tz).naive_local()
}

/// Unix millis → 业务时区本地时间
pub fn millis_to_local(millis: i64, tz: Tz) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).naive_local())
}
