use std::time::{Duration, Instant};

/// Bounded image index with a transition lock.
///
/// The index stays in `[0, count - 1]` (it is 0 for an empty carousel).
/// While a transition runs, further navigation is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    index: usize,
    count: usize,
    transition: Duration,
    busy_until: Option<Instant>,
}

impl Carousel {
    /// Open at `requested`, clamped to the last image
    pub fn new(count: usize, requested: usize, transition: Duration) -> Self {
        Self {
            index: requested.min(count.saturating_sub(1)),
            count,
            transition,
            busy_until: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.busy_until.is_some_and(|until| now < until)
    }

    /// Move to `target`. Out of range, same image, or mid-transition is a no-op.
    pub fn go_to(&mut self, target: usize, now: Instant) -> bool {
        if target >= self.count || target == self.index || self.is_transitioning(now) {
            return false;
        }

        self.index = target;
        self.busy_until = Some(now + self.transition);
        true
    }

    pub fn next(&mut self, now: Instant) -> bool {
        self.go_to(self.index + 1, now)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        match self.index.checked_sub(1) {
            Some(target) => self.go_to(target, now),
            None => false,
        }
    }
}
