//! Temperature report loop
//!
//! # Design
//! Every iteration reads one sample, derives its temperature and measures how long the derivation
//! took. The indicator output is driven high for the duration of the timed window so the
//! conversion time can also be observed on a scope. Both numbers are rendered with `decimal-fmt`
//! into one line on the byte sink:
//!
//! ```text
//! Teperature : 200.90\tTime stamp : 0.01ms\n
//! ```
//!
//! The meter is zeroed once at construction. Windows only start and stop it, so the time stamp
//! runs on across iterations and wraps with the fast counter. With
//! [`Settings::reset_each_window`] every line reports its own window only.
use core::convert::Infallible;

use decimal_fmt::Precision;
use embedded_hal_1::digital::OutputPin;
use fugit::NanosDurationU64;

use crate::conversion::{Conversion, Sample, Temperature};
use crate::design_parameters::BANNER;
use crate::meter::{ElapsedMeter, TimerPair};
use crate::settings::Settings;
use crate::Error;

/// The temperature label of the reference firmware.
pub const LEGACY_LABEL: &str = "Teperature";

pub const LABEL: &str = "Temperature";

/// A blocking sample producer.
pub trait SampleSource {
    fn read_sample(&mut self) -> Sample;
}

/// An indicator output for boards without one.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoIndicator;

impl embedded_hal_1::digital::ErrorType for NoIndicator {
    type Error = Infallible;
}

impl OutputPin for NoIndicator {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The devices driven by a [`Reporter`].
pub struct Peripherals<S, T, W, L> {
    pub source: S,
    pub timer: T,
    pub sink: W,
    pub indicator: L,
}

/// The outcome of one iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Report {
    pub sample: Sample,
    pub temperature: Temperature,
    pub elapsed: NanosDurationU64,
}

impl Report {
    /// The conversion time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.ticks() as f64 / 1_000_000.0
    }
}

/// Rendering of a [`Report`] line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineFormat {
    pub temperature_precision: Precision,
    pub time_precision: Precision,
    pub legacy_label: bool,
}

impl Default for LineFormat {
    fn default() -> Self {
        Settings::default().line_format()
    }
}

impl LineFormat {
    pub fn label(&self) -> &'static str {
        if self.legacy_label {
            LEGACY_LABEL
        } else {
            LABEL
        }
    }

    /// Write the report line of `report` to `sink`.
    pub fn write<W: embedded_io::Write>(
        &self,
        report: &Report,
        sink: &mut W,
    ) -> Result<(), W::Error> {
        let temperature = decimal_fmt::format(
            report.temperature.value(),
            self.temperature_precision,
        );
        let time = decimal_fmt::format(report.elapsed_ms(), self.time_precision);

        sink.write_all(self.label().as_bytes())?;
        sink.write_all(b" : ")?;
        sink.write_all(temperature.as_bytes())?;
        sink.write_all(b"\tTime stamp : ")?;
        sink.write_all(time.as_bytes())?;
        sink.write_all(b"ms\n")
    }
}

fn indicator_error<E: embedded_hal_1::digital::Error>(error: E) -> Error {
    Error::Indicator(error.kind())
}

/// Samples, converts, times and reports in a loop.
pub struct Reporter<S, T, W, L, C> {
    source: S,
    meter: ElapsedMeter<T>,
    sink: W,
    indicator: L,
    conversion: C,
    format: LineFormat,
    reset_each_window: bool,
}

impl<S, T, W, L, C> Reporter<S, T, W, L, C>
where
    S: SampleSource,
    T: TimerPair,
    W: embedded_io::Write,
    L: OutputPin,
    C: Conversion,
{
    /// Construct the reporter.
    ///
    /// # Args
    /// * `peripherals` - The sample source, counter pair, byte sink and indicator output.
    /// * `conversion` - The temperature derivation strategy.
    /// * `settings` - Meter and line format configuration. The strategy is taken from
    ///   `conversion` instead.
    pub fn new(
        peripherals: Peripherals<S, T, W, L>,
        conversion: C,
        settings: &Settings,
    ) -> Self {
        let Peripherals {
            source,
            timer,
            sink,
            indicator,
        } = peripherals;

        Self {
            source,
            meter: settings.meter(timer),
            sink,
            indicator,
            conversion,
            format: settings.line_format(),
            reset_each_window: settings.reset_each_window,
        }
    }

    /// Write the program banner.
    pub fn banner(&mut self) -> Result<(), Error> {
        log::info!("{}", BANNER.trim_end());
        self.sink.write_all(BANNER.as_bytes())?;
        self.sink.flush()?;
        Ok(())
    }

    /// Run one iteration and write its report line.
    pub fn poll(&mut self) -> Result<Report, Error> {
        let sample = self.source.read_sample();

        self.indicator.set_high().map_err(indicator_error)?;
        if self.reset_each_window {
            self.meter.reset();
        }
        self.meter.start();
        let temperature = self.conversion.convert(sample);
        self.meter.stop();
        self.indicator.set_low().map_err(indicator_error)?;

        let report = Report {
            sample,
            temperature: temperature?,
            elapsed: self.meter.elapsed(),
        };

        log::debug!(
            "Sample {} -> {:?} in {} ticks",
            sample,
            report.temperature,
            self.meter.elapsed_ticks()
        );

        self.format.write(&report, &mut self.sink)?;
        Ok(report)
    }

    /// Write the banner, then report until an error occurs.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        self.banner()?;
        loop {
            self.poll()?;
        }
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }
}
