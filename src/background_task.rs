use chrono::TimeDelta;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::limiter::rate_limiter::SlidingWindowLimiter;

/// Periodically forgets clients whose whole request log has expired.
pub async fn start_purge_task(limiter: SlidingWindowLimiter, window: TimeDelta, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let purged = limiter.purge_idle(window);
        if purged > 0 {
            tracing::info!("Purged {} idle rate-limit entries", purged);
        }
    }
}
