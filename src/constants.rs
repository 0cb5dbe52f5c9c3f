use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Pins `START_TIME` to now. Call once at boot, before serving requests.
pub fn record_start_time() -> DateTime<Utc> {
    *Lazy::force(&START_TIME)
}
