//! Coalescing bursts of window resize events into one relayout.

use nalgebra::Vector2;
use std::time::{Duration, Instant};

/// Cancel-and-restart timer: every request pushes the deadline back, and only the last requested
/// size comes out once the display has been quiet for the whole delay.
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Vector2<f32>, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn request(&mut self, size: Vector2<f32>, now: Instant) {
        self.pending = Some((size, now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The size to apply, if the deadline passed. Fires at most once per burst.
    pub fn poll(&mut self, now: Instant) -> Option<Vector2<f32>> {
        match self.pending {
            Some((size, deadline)) if now >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bursts_collapse_to_the_last_size() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut debounce = ResizeDebouncer::new(ms(150));

        debounce.request(Vector2::new(800.0, 600.0), t0);
        debounce.request(Vector2::new(900.0, 600.0), t0 + ms(100));
        debounce.request(Vector2::new(1000.0, 600.0), t0 + ms(200));

        // 150ms after the first request, but the later ones restarted the timer
        assert_eq!(debounce.poll(t0 + ms(250)), None);
        assert!(debounce.is_pending());

        assert_eq!(debounce.poll(t0 + ms(350)), Some(Vector2::new(1000.0, 600.0)));
        assert_eq!(debounce.poll(t0 + ms(1000)), None);
    }
}
