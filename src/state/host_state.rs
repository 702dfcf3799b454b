use std::time::{Duration, Instant};

/// Tracks request pacing for one host during a crawl
///
/// `next_slot` is the earliest instant the next request may start. Reserving a
/// slot pushes it forward by the effective delay, so concurrent workers hitting
/// the same host are spaced out instead of firing together.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests issued to this host
    pub request_count: u32,

    /// Earliest instant the next request may start
    pub next_slot: Option<Instant>,

    /// Crawl-delay advertised by robots.txt, if any
    pub crawl_delay: Option<Duration>,
}

impl HostState {
    /// Creates a new HostState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the delay to keep between requests: the larger of the
    /// configured politeness delay and the robots.txt crawl-delay
    pub fn effective_delay(&self, base_delay: Duration) -> Duration {
        self.crawl_delay
            .map_or(base_delay, |robots| robots.max(base_delay))
    }

    /// Reserves the next request slot and returns how long the caller must wait
    /// before sending its request
    pub fn reserve_slot(&mut self, base_delay: Duration, now: Instant) -> Duration {
        let start = match self.next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };

        self.request_count += 1;
        self.next_slot = Some(start + self.effective_delay(base_delay));
        start - now
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        match self.next_slot {
            Some(slot) if slot > now => Some(slot - now),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_host_state() {
        let state = HostState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.next_slot.is_none());
        assert!(state.time_until_next_request(Instant::now()).is_none());
    }

    #[test]
    fn test_first_reservation_is_immediate() {
        let mut state = HostState::new();
        let now = Instant::now();

        let wait = state.reserve_slot(Duration::from_millis(1000), now);
        assert_eq!(wait, Duration::ZERO);
        assert_eq!(state.request_count, 1);
        assert_eq!(
            state.time_until_next_request(now),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_back_to_back_reservations_are_spaced() {
        let mut state = HostState::new();
        let now = Instant::now();
        let delay = Duration::from_millis(200);

        assert_eq!(state.reserve_slot(delay, now), Duration::ZERO);
        assert_eq!(state.reserve_slot(delay, now), Duration::from_millis(200));
        assert_eq!(state.reserve_slot(delay, now), Duration::from_millis(400));
        assert_eq!(state.request_count, 3);
    }

    #[test]
    fn test_reservation_after_delay_elapsed() {
        let mut state = HostState::new();
        let now = Instant::now();
        let delay = Duration::from_millis(100);

        state.reserve_slot(delay, now);
        let later = now + Duration::from_millis(150);
        assert_eq!(state.reserve_slot(delay, later), Duration::ZERO);
    }

    #[test]
    fn test_effective_delay_uses_larger_value() {
        let mut state = HostState::new();
        let base = Duration::from_millis(1000);
        assert_eq!(state.effective_delay(base), base);

        state.crawl_delay = Some(Duration::from_secs(5));
        assert_eq!(state.effective_delay(base), Duration::from_secs(5));

        state.crawl_delay = Some(Duration::from_millis(500));
        assert_eq!(state.effective_delay(base), base);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut state = HostState::new();
        let now = Instant::now();
        for _ in 0..5 {
            assert_eq!(state.reserve_slot(Duration::ZERO, now), Duration::ZERO);
        }
    }
}
