pub const DEFAULT_REST_SECONDS: u32 = 90;
pub const EXTRA_REST_SECONDS: u32 = 30;

/// Countdown between two sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestTimer {
    pub remaining: u32,
    pub running: bool,
}

impl RestTimer {
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = seconds > 0;
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `true` if the countdown has elapsed with this tick.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Extend the countdown without restarting it.
    pub fn add(&mut self, seconds: u32) {
        self.remaining = self.remaining.saturating_add(seconds);
        if self.remaining > 0 {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.remaining = 0;
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rest_timer_countdown() {
        let mut timer = RestTimer::default();
        assert!(!timer.tick());

        timer.start(3);
        assert!(timer.is_running());
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert_eq!(timer.remaining, 1);
        assert!(timer.tick());
        assert_eq!(
            timer,
            RestTimer {
                remaining: 0,
                running: false
            }
        );
        assert!(!timer.tick());
        assert_eq!(timer.remaining, 0);
    }

    #[test]
    fn test_rest_timer_add() {
        let mut timer = RestTimer::default();
        timer.start(DEFAULT_REST_SECONDS);
        timer.tick();
        timer.add(EXTRA_REST_SECONDS);
        assert_eq!(timer.remaining, 119);
        assert!(timer.is_running());

        timer.stop();
        timer.add(EXTRA_REST_SECONDS);
        assert_eq!(
            timer,
            RestTimer {
                remaining: 30,
                running: true
            }
        );
    }

    #[test]
    fn test_rest_timer_stop() {
        let mut timer = RestTimer::default();
        timer.start(60);
        timer.stop();
        assert_eq!(timer, RestTimer::default());

        timer.start(0);
        assert!(!timer.is_running());
    }
}
