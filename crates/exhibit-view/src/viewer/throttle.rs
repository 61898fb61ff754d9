use std::time::{Duration, Instant};

/// Rate limiter with a leading and a trailing edge. The first event of a
/// burst passes at once; later ones inside the interval collapse into a
/// single pending event that [`Throttle::take_due`] hands out once the
/// interval has run out.
#[derive(Clone, Copy, Debug)]
pub struct Throttle<E> {
    interval: Duration,
    last: Option<Instant>,
    pending: Option<E>,
}

impl<E> Throttle<E> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            pending: None,
        }
    }

    /// Returns the event when it may run now. Otherwise it replaces any
    /// pending event and `None` comes back.
    pub fn offer(&mut self, now: Instant, event: E) -> Option<E> {
        if self.is_open(now) {
            self.last = Some(now);
            self.pending = None;
            Some(event)
        } else {
            self.pending = Some(event);
            None
        }
    }

    /// The pending event, once the interval since the last delivery is over.
    pub fn take_due(&mut self, now: Instant) -> Option<E> {
        if self.pending.is_none() || !self.is_open(now) {
            return None;
        }
        self.last = Some(now);
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}
