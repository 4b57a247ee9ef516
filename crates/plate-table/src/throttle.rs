use std::time::{Duration, Instant};

/// Interval between handled pointer moves.
pub const POINTER_THROTTLE: Duration = Duration::from_millis(150);

/// Rate limiter for high-frequency events.
///
/// The first event of a window is delivered immediately. Later events in the
/// same window replace each other, and the newest one is released by
/// [`Throttle::poll`] once the window has elapsed, so the final position is
/// never lost.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    /// Offers a new event. Returns it when it may be handled right away.
    pub fn offer(&mut self, now: Instant, value: T) -> Option<T> {
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                if self.pending.replace(value).is_some() {
                    tracing::trace!("throttle: coalesced pending event");
                }
                None
            }
            _ => {
                self.last_fired = Some(now);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Releases the trailing event once its window is over.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline().is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        self.last_fired = Some(now);
        self.pending.take()
    }

    /// When the host should call [`Throttle::poll`] next, if anything is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        Some(match self.last_fired {
            Some(last) => last + self.interval,
            None => Instant::now(),
        })
    }
}
