//! Run-time configuration
//!
//! # Design
//! All tunables of the report loop live in one serde structure. It is exchanged as JSON using
//! `serde-json-core`, and every key is optional: missing keys take the value of the reference
//! firmware. The firmware embeds its settings document at build time.
use decimal_fmt::{Precision, MAX_PRECISION};
use fugit::NanosDurationU64;
use serde::{Deserialize, Serialize};

use crate::conversion::Strategy;
use crate::design_parameters::{
    TEMPERATURE_PRECISION, TIMER_RELOAD, TIMER_TICK, TIME_PRECISION,
};
use crate::meter::{ElapsedMeter, OverflowPolicy, TimerPair};
use crate::report::LineFormat;
use crate::Error;

/// Capacity of the encoded settings.
pub const JSON_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Temperature derivation strategy, `"linear"` or `"table"`.
    pub strategy: Strategy,

    /// Fast counter reload value.
    pub reload: u16,

    /// Duration of one fast counter tick in nanoseconds.
    pub tick_ns: u32,

    /// Whether fast counter underflows are counted, `"discard"` or `"accumulate"`.
    pub overflows: OverflowPolicy,

    /// Fraction digits of the temperature. Negative selects automatic precision.
    pub temperature_precision: i8,

    /// Fraction digits of the conversion time in milliseconds. Negative selects automatic
    /// precision.
    pub time_precision: i8,

    /// Label the temperature `Teperature` as the reference firmware does.
    pub legacy_label: bool,

    /// Zero the meter before every window so each line reports its own conversion time. By
    /// default the meter is zeroed once and the time stamp runs on across iterations.
    pub reset_each_window: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Linear,
            reload: TIMER_RELOAD,
            tick_ns: TIMER_TICK.ticks() as u32,
            overflows: OverflowPolicy::Discard,
            temperature_precision: TEMPERATURE_PRECISION,
            time_precision: TIME_PRECISION,
            legacy_label: true,
            reset_each_window: false,
        }
    }
}

impl Settings {
    /// Decode and validate a settings document.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        let (settings, _): (Self, _) =
            serde_json_core::from_slice(json).map_err(Error::Settings)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<heapless::String<JSON_CAPACITY>, Error> {
        serde_json_core::to_string(self).map_err(Error::Encode)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.reload == 0 {
            return Err(Error::InvalidSettings("reload must be nonzero"));
        }
        if self.tick_ns == 0 {
            return Err(Error::InvalidSettings("tick_ns must be nonzero"));
        }
        Ok(())
    }

    pub fn tick(&self) -> NanosDurationU64 {
        NanosDurationU64::from_ticks(self.tick_ns as u64)
    }

    /// Construct the configured meter on a counter pair.
    pub fn meter<T: TimerPair>(&self, timer: T) -> ElapsedMeter<T> {
        ElapsedMeter::new(timer, self.reload, self.tick())
            .with_overflows(self.overflows)
    }

    pub fn line_format(&self) -> LineFormat {
        for (name, precision) in [
            ("temperature", self.temperature_precision),
            ("time", self.time_precision),
        ] {
            if precision > MAX_PRECISION as i8 {
                log::warn!(
                    "Clamping {name} precision {precision} to {MAX_PRECISION}"
                );
            }
        }

        LineFormat {
            temperature_precision: Precision::from(self.temperature_precision),
            time_precision: Precision::from(self.time_precision),
            legacy_label: self.legacy_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::sim::SimulatedTimer;

    #[test]
    fn empty_document() {
        assert_eq!(Settings::from_json(b"{}").unwrap(), Settings::default());
    }

    #[test]
    fn partial_document() {
        let settings = Settings::from_json(
            br#"{"strategy":"table","overflows":"accumulate","legacy_label":false}"#,
        )
        .unwrap();
        assert_eq!(settings.strategy, Strategy::Table);
        assert_eq!(settings.overflows, OverflowPolicy::Accumulate);
        assert!(!settings.legacy_label);
        assert!(!settings.reset_each_window);
        assert_eq!(settings.reload, 60_000);
        assert_eq!(settings.tick_ns, 166);
    }

    #[test]
    fn shipped_document() {
        let settings =
            Settings::from_json(include_bytes!("../settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn encode() {
        let settings = Settings {
            time_precision: -1,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains(r#""strategy":"linear""#));
        assert!(json.contains(r#""time_precision":-1"#));
        assert_eq!(Settings::from_json(json.as_bytes()).unwrap(), settings);
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(
            Settings::from_json(br#"{"reload":0}"#),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(br#"{"tick_ns":0}"#),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(br#"{"strategy":"cubic"}"#),
            Err(Error::Settings(_))
        ));
        assert!(matches!(
            Settings::from_json(b"reload=1"),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn line_format() {
        let settings = Settings {
            temperature_precision: 40,
            time_precision: -3,
            ..Default::default()
        };
        let format = settings.line_format();
        assert_eq!(format.temperature_precision, Precision::Fixed(10));
        assert_eq!(format.time_precision, Precision::Auto);
        assert!(format.legacy_label);
    }

    #[test]
    fn meter() {
        let settings = Settings {
            reload: 1_000,
            tick_ns: 10,
            overflows: OverflowPolicy::Accumulate,
            ..Default::default()
        };
        let meter = settings.meter(SimulatedTimer::new());
        assert_eq!(meter.reload(), 1_000);
        assert_eq!(meter.tick().ticks(), 10);
        assert_eq!(meter.policy(), OverflowPolicy::Accumulate);
    }
}
