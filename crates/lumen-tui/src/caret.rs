//! Caret blink phase, derived from the frame clock.

use std::time::Duration;

/// Whether the caret is drawn at clock reading `now`.
///
/// The caret is on for the first half of each `period` and a zero period
/// means a steady caret.
pub fn caret_on(now: Duration, period: Duration) -> bool {
    if period.is_zero() {
        return true;
    }
    let half = period.as_millis().max(2) / 2;
    (now.as_millis() / half) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_blinks_every_half_period() {
        let period = ms(1000);
        assert!(caret_on(ms(0), period));
        assert!(caret_on(ms(499), period));
        assert!(!caret_on(ms(500), period));
        assert!(!caret_on(ms(999), period));
        assert!(caret_on(ms(1000), period));
    }

    #[test]
    fn test_zero_period_is_steady() {
        assert!(caret_on(ms(123), Duration::ZERO));
    }
}
