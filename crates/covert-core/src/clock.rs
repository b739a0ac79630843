//! Simulation clock.
//!
//! The clock counts ticks and the game time they represent. Game time is
//! kept in whole milliseconds so that scheduler deadlines compare exactly;
//! seconds only appear at the edges (configuration, delay arguments).
//!
//! # Design Principles
//!
//! - All temporal arithmetic is checked (no silent overflow).
//! - Elapsed time is derived from the tick counter, never stored apart
//!   from it.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter or elapsed time would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero-length ticks).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Convert a delay in seconds to whole milliseconds.
///
/// Rounds to the nearest millisecond. Negative and non-finite inputs
/// become zero.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let ms = (seconds * 1000.0).round();
    // Float-to-int `as` saturates, which is the behavior we want for
    // absurdly long delays.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let ms = ms as u64;
    ms
}

/// Tick counter plus elapsed game time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    /// Ticks completed so far.
    tick: u64,
    /// Game time per tick, in milliseconds.
    ms_per_tick: u64,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `seconds_per_tick` is
    /// shorter than one millisecond.
    pub fn new(seconds_per_tick: f64) -> Result<Self, ClockError> {
        let ms_per_tick = seconds_to_ms(seconds_per_tick);
        if ms_per_tick == 0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("seconds_per_tick must be at least 0.001, got {seconds_per_tick}"),
            });
        }
        Ok(Self {
            tick: 0,
            ms_per_tick,
        })
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter or the
    /// elapsed time would exceed `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let next = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        if next.checked_mul(self.ms_per_tick).is_none() {
            return Err(ClockError::TickOverflow);
        }
        self.tick = next;
        Ok(self.tick)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Game time per tick, in milliseconds.
    pub const fn ms_per_tick(&self) -> u64 {
        self.ms_per_tick
    }

    /// Elapsed game time in milliseconds.
    pub const fn now_ms(&self) -> u64 {
        self.tick.saturating_mul(self.ms_per_tick)
    }

    /// Elapsed game time in seconds.
    pub fn now_seconds(&self) -> f64 {
        let ms = u32::try_from(self.now_ms()).map_or(f64::from(u32::MAX), f64::from);
        ms / 1000.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn seconds_convert_to_rounded_ms() {
        assert_eq!(seconds_to_ms(0.1), 100);
        assert_eq!(seconds_to_ms(1.25), 1250);
        assert_eq!(seconds_to_ms(0.05), 50);
        assert_eq!(seconds_to_ms(4.9994), 4999);
        assert_eq!(seconds_to_ms(-3.0), 0);
        assert_eq!(seconds_to_ms(f64::NAN), 0);
    }

    #[test]
    fn clock_advances_in_whole_ticks() {
        let mut clock = SimClock::new(0.1).expect("valid tick length");
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..15 {
            assert!(clock.advance().is_ok());
        }
        assert_eq!(clock.tick(), 15);
        assert_eq!(clock.now_ms(), 1500);
        assert!((clock.now_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn zero_length_ticks_rejected() {
        assert!(matches!(
            SimClock::new(0.0),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(SimClock::new(0.0004).is_err());
    }
}
