//! Conversion time measurement
//!
//! # Design
//! Elapsed time is measured with a pair of cascaded hardware counters. The fast counter is loaded
//! with a reload value and counts down once per tick while a measurement window is open. The slow
//! counter counts the underflows of the fast counter.
//!
//! The elapsed tick count is `reload - countdown`. This is only correct for windows shorter than
//! one fast counter period. [`OverflowPolicy::Accumulate`] also adds `overflows * reload` ticks,
//! which extends the range to the width of the slow counter. [`OverflowPolicy::Discard`] ignores
//! the slow counter and reproduces the wrapped readings of the reference firmware.
use fugit::NanosDurationU64;
use serde::{Deserialize, Serialize};

/// A fast countdown counter cascaded with an underflow counter.
pub trait TimerPair {
    /// Stop both counters, load the fast counter with `reload` and clear the underflow count.
    fn reset(&mut self, reload: u16);

    /// Start counting.
    fn start(&mut self);

    /// Stop counting. The counter values are retained.
    fn stop(&mut self);

    /// The current value of the fast counter.
    fn countdown(&mut self) -> u16;

    /// The number of fast counter underflows since the last reset.
    fn overflows(&mut self) -> u16;
}

/// Whether fast counter underflows contribute to the elapsed time.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    #[default]
    Discard,
    Accumulate,
}

/// Measures the duration of start/stop windows on a [`TimerPair`].
pub struct ElapsedMeter<T> {
    timer: T,
    reload: u16,
    tick: NanosDurationU64,
    policy: OverflowPolicy,
}

impl<T: TimerPair> ElapsedMeter<T> {
    /// Construct the meter. The timer is reset.
    ///
    /// # Args
    /// * `timer` - The counter pair.
    /// * `reload` - The fast counter reload value.
    /// * `tick` - The duration of one fast counter tick.
    pub fn new(mut timer: T, reload: u16, tick: NanosDurationU64) -> Self {
        timer.reset(reload);
        Self {
            timer,
            reload,
            tick,
            policy: OverflowPolicy::Discard,
        }
    }

    pub fn with_overflows(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Zero the elapsed time.
    pub fn reset(&mut self) {
        self.timer.reset(self.reload);
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// The number of fast counter ticks since the last reset.
    pub fn elapsed_ticks(&mut self) -> u64 {
        // Note(saturating_sub): A countdown above the reload value is a counter that has not
        // been loaded yet.
        let ticks = u64::from(self.reload.saturating_sub(self.timer.countdown()));
        match self.policy {
            OverflowPolicy::Discard => ticks,
            OverflowPolicy::Accumulate => {
                ticks
                    + u64::from(self.timer.overflows())
                        * u64::from(self.reload)
            }
        }
    }

    /// The time since the last reset.
    pub fn elapsed(&mut self) -> NanosDurationU64 {
        NanosDurationU64::from_ticks(self.elapsed_ticks() * self.tick.ticks())
    }

    pub fn reload(&self) -> u16 {
        self.reload
    }

    pub fn tick(&self) -> NanosDurationU64 {
        self.tick
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design_parameters::{TIMER_RELOAD, TIMER_TICK};
    use crate::hardware::sim::SimulatedTimer;

    fn meter() -> ElapsedMeter<SimulatedTimer> {
        ElapsedMeter::new(SimulatedTimer::new(), TIMER_RELOAD, TIMER_TICK)
    }

    fn window(meter: &mut ElapsedMeter<SimulatedTimer>, ticks: u32) {
        meter.reset();
        meter.start();
        meter.timer_mut().advance(ticks);
        meter.stop();
    }

    #[test]
    fn empty_window() {
        let mut meter = meter();
        meter.reset();
        meter.start();
        meter.stop();
        assert_eq!(meter.elapsed_ticks(), 0);
        assert_eq!(meter.elapsed().ticks(), 0);
    }

    #[test]
    fn single_period() {
        let mut meter = meter();
        for d in [1, 2, 100, 12_345, TIMER_RELOAD as u32 - 1] {
            window(&mut meter, d);
            assert_eq!(meter.elapsed_ticks(), d as u64);
            assert_eq!(meter.elapsed().ticks(), d as u64 * 166);
        }
    }

    #[test]
    fn wrapped_window_discards_overflows() {
        let mut meter = meter();
        window(&mut meter, TIMER_RELOAD as u32 + 10);
        assert_eq!(meter.timer_mut().overflows(), 1);
        assert_eq!(meter.elapsed_ticks(), 10);
    }

    #[test]
    fn wrapped_window_accumulates_overflows() {
        let mut meter = meter().with_overflows(OverflowPolicy::Accumulate);
        for d in [10, TIMER_RELOAD as u32, 3 * TIMER_RELOAD as u32 + 7] {
            window(&mut meter, d);
            assert_eq!(meter.elapsed_ticks(), d as u64);
        }
    }

    #[test]
    fn accumulates_across_windows_without_reset() {
        let mut meter = meter();
        meter.reset();
        for _ in 0..3 {
            meter.start();
            meter.timer_mut().advance(40);
            meter.stop();
        }
        assert_eq!(meter.elapsed_ticks(), 120);
    }

    #[test]
    fn stopped_timer_does_not_count() {
        let mut meter = meter();
        meter.reset();
        meter.timer_mut().advance(500);
        assert_eq!(meter.elapsed_ticks(), 0);
    }

    #[test]
    fn tick_scaling() {
        let mut meter = ElapsedMeter::new(
            SimulatedTimer::new(),
            1_000,
            NanosDurationU64::from_ticks(20),
        );
        window(&mut meter, 999);
        assert_eq!(meter.elapsed().ticks(), 19_980);
        assert_eq!(meter.elapsed().to_micros(), 19);
    }
}
