//! Host models of the measurement peripherals
//!
//! These stand in for the board when replaying the report loop off target, and drive the test
//! suite.
use core::convert::Infallible;

use crate::conversion::Sample;
use crate::meter::TimerPair;
use crate::report::SampleSource;

/// A cascaded countdown/underflow counter pair advanced by hand.
#[derive(Clone, Debug, Default)]
pub struct SimulatedTimer {
    reload: u16,
    countdown: u16,
    overflows: u16,
    running: bool,
    latency: u32,
}

impl SimulatedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge `ticks` to every window for the cost of stopping the counter.
    pub fn with_latency(mut self, ticks: u32) -> Self {
        self.latency = ticks;
        self
    }

    /// Let `ticks` counter ticks pass. A stopped counter ignores them.
    pub fn advance(&mut self, ticks: u32) {
        if !self.running || self.reload == 0 {
            return;
        }

        let reload = u64::from(self.reload);
        let consumed =
            u64::from(self.reload - self.countdown) + u64::from(ticks);

        // Note(wrapping_add): The hardware underflow counter wraps as well.
        self.overflows = self.overflows.wrapping_add((consumed / reload) as u16);
        self.countdown = self.reload - (consumed % reload) as u16;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl TimerPair for SimulatedTimer {
    fn reset(&mut self, reload: u16) {
        self.running = false;
        self.reload = reload;
        self.countdown = reload;
        self.overflows = 0;
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.advance(self.latency);
        self.running = false;
    }

    fn countdown(&mut self) -> u16 {
        self.countdown
    }

    fn overflows(&mut self) -> u16 {
        self.overflows
    }
}

/// Replays a fixed sequence of samples, starting over at the end.
#[derive(Clone, Debug)]
pub struct ScriptedSource<'a> {
    samples: &'a [Sample],
    next: usize,
}

impl<'a> ScriptedSource<'a> {
    pub fn new(samples: &'a [Sample]) -> Self {
        Self { samples, next: 0 }
    }
}

impl SampleSource for ScriptedSource<'_> {
    fn read_sample(&mut self) -> Sample {
        // An empty script reads as a grounded input.
        let Some(&sample) = self.samples.get(self.next) else {
            return 0;
        };
        self.next = (self.next + 1) % self.samples.len();
        sample
    }
}

/// Collects written bytes into a fixed capacity buffer.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink<const N: usize> {
    buffer: heapless::Vec<u8, N>,
}

impl<const N: usize> CaptureSink<N> {
    pub fn new() -> Self {
        Self {
            buffer: heapless::Vec::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The captured output, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.buffer).ok()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<const N: usize> embedded_io::ErrorType for CaptureSink<N> {
    type Error = embedded_io::ErrorKind;
}

impl<const N: usize> embedded_io::Write for CaptureSink<N> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        let len = buf.len().min(N - self.buffer.len());
        if len == 0 {
            return Err(embedded_io::ErrorKind::OutOfMemory);
        }

        self.buffer
            .extend_from_slice(&buf[..len])
            .map_err(|_| embedded_io::ErrorKind::OutOfMemory)?;
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// An indicator output that remembers its level and counts its pulses.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimulatedLed {
    high: bool,
    pulses: u32,
}

impl SimulatedLed {
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// The number of low to high transitions.
    pub fn pulses(&self) -> u32 {
        self.pulses
    }
}

impl embedded_hal_1::digital::ErrorType for SimulatedLed {
    type Error = Infallible;
}

impl embedded_hal_1::digital::OutputPin for SimulatedLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.pulses += 1;
        }
        self.high = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Write;

    #[test]
    fn timer_counts_only_while_running() {
        let mut timer = SimulatedTimer::new();
        timer.reset(100);
        timer.advance(10);
        assert_eq!(timer.countdown(), 100);
        timer.start();
        timer.advance(10);
        timer.stop();
        timer.advance(10);
        assert_eq!(timer.countdown(), 90);
        assert!(!timer.is_running());
    }

    #[test]
    fn timer_underflows() {
        let mut timer = SimulatedTimer::new();
        timer.reset(100);
        timer.start();
        timer.advance(250);
        assert_eq!(timer.countdown(), 50);
        assert_eq!(timer.overflows(), 2);
        timer.reset(100);
        assert_eq!((timer.countdown(), timer.overflows()), (100, 0));
    }

    #[test]
    fn timer_latency() {
        let mut timer = SimulatedTimer::new().with_latency(3);
        timer.reset(100);
        timer.start();
        timer.stop();
        assert_eq!(timer.countdown(), 97);
    }

    #[test]
    fn script_cycles() {
        let mut source = ScriptedSource::new(&[1, 2, 3]);
        let samples: Vec<_> = (0..7).map(|_| source.read_sample()).collect();
        assert_eq!(samples, [1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(ScriptedSource::new(&[]).read_sample(), 0);
    }

    #[test]
    fn sink_capacity() {
        let mut sink = CaptureSink::<4>::new();
        sink.write_all(b"abc").unwrap();
        assert_eq!(sink.write(b"de"), Ok(1));
        assert_eq!(sink.write(b"f"), Err(embedded_io::ErrorKind::OutOfMemory));
        assert_eq!(sink.as_str(), Some("abcd"));
        sink.clear();
        assert!(sink.as_bytes().is_empty());
    }

    #[test]
    fn led_pulses() {
        use embedded_hal_1::digital::OutputPin;
        let mut led = SimulatedLed::default();
        led.set_high().unwrap();
        led.set_high().unwrap();
        led.set_low().unwrap();
        led.set_high().unwrap();
        assert!(led.is_high());
        assert_eq!(led.pulses(), 2);
    }
}
