use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Per-host request scheduler.
///
/// Consecutive requests to one host start at least `delay` apart, including
/// requests issued by different crawls sharing the throttle. The first request
/// to a host is not delayed.
#[derive(Debug)]
pub struct HostThrottle {
    delay: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Reserve the next request slot for `host` and sleep until it opens
    pub async fn wait(&self, host: &str) {
        if self.delay.is_zero() {
            return;
        }

        let slot = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = slots.get(host).map_or(now, |next| (*next).max(now));
            slots.insert(host.to_string(), slot + self.delay);
            slot
        };

        if slot > Instant::now() {
            ::log::trace!("Politeness wait for {} of {:?}", host, slot - Instant::now());
        }
        tokio::time::sleep_until(slot).await;
    }
}
