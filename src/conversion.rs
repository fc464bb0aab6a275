//! Sensor sample to temperature conversion
//!
//! # Design
//! Two interchangeable strategies turn a raw converter sample into a temperature:
//! * [`Linear`] scales the sample onto the converter's millivolt range and applies the sensor
//!   offset and slope.
//! * [`LookupTable`] indexes a precomputed 256 entry response curve in centidegrees. There is no
//!   interpolation.
//!
//! Both keep the integer arithmetic of the reference firmware so that reports are identical.
use serde::{Deserialize, Serialize};

use crate::design_parameters::{
    ADC_FULL_SCALE_MV, ADC_MAX_CODE, SENSOR_MV_PER_DEGREE, SENSOR_OFFSET_MV,
};
use crate::Error;

include!(concat!(env!("OUT_DIR"), "/adc_table.rs"));

/// A raw converter reading.
pub type Sample = u16;

/// A derived temperature.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Temperature {
    /// Degrees Celsius.
    Celsius(f64),
    /// Hundredths of a degree Celsius.
    Centidegrees(i32),
}

impl Temperature {
    /// The temperature in the unit it was derived in.
    ///
    /// This is the number that is reported, the table strategy reports centidegrees.
    pub fn value(&self) -> f64 {
        match *self {
            Self::Celsius(c) => c,
            Self::Centidegrees(c) => c as f64,
        }
    }

    /// The temperature in degrees Celsius.
    pub fn celsius(&self) -> f64 {
        match *self {
            Self::Celsius(c) => c,
            Self::Centidegrees(c) => c as f64 / 100.0,
        }
    }
}

/// Scale a sample onto the converter input range.
///
/// The division truncates.
pub const fn millivolts(sample: Sample) -> u32 {
    sample as u32 * ADC_FULL_SCALE_MV / ADC_MAX_CODE
}

/// Convert a sample to degrees Celsius using the sensor's linear response.
pub fn linear(sample: Sample) -> f64 {
    (millivolts(sample) as f64 - SENSOR_OFFSET_MV) / SENSOR_MV_PER_DEGREE
}

/// Look up the response of an 8-bit sample.
pub fn lookup(table: &[i32; 256], index: u8) -> i32 {
    table[index as usize]
}

/// Look up the response of a sample that may exceed the table.
pub fn try_lookup(table: &[i32; 256], sample: Sample) -> Result<i32, Error> {
    u8::try_from(sample)
        .map(|index| lookup(table, index))
        .map_err(|_| Error::OutOfRange { sample })
}

/// A strategy deriving a temperature from a sample.
pub trait Conversion {
    fn convert(&self, sample: Sample) -> Result<Temperature, Error>;
}

/// The linear formula strategy.
#[derive(Copy, Clone, Debug, Default)]
pub struct Linear;

impl Conversion for Linear {
    fn convert(&self, sample: Sample) -> Result<Temperature, Error> {
        Ok(Temperature::Celsius(linear(sample)))
    }
}

/// The table lookup strategy.
#[derive(Copy, Clone, Debug)]
pub struct LookupTable<'a> {
    table: &'a [i32; 256],
}

impl<'a> LookupTable<'a> {
    pub const fn new(table: &'a [i32; 256]) -> Self {
        Self { table }
    }

    pub fn get(&self, index: u8) -> i32 {
        lookup(self.table, index)
    }
}

impl Default for LookupTable<'static> {
    fn default() -> Self {
        Self::new(&ADC_TABLE)
    }
}

impl Conversion for LookupTable<'_> {
    fn convert(&self, sample: Sample) -> Result<Temperature, Error> {
        let centidegrees = try_lookup(self.table, sample).inspect_err(|_| {
            log::warn!("Sample {sample} exceeds the 8-bit lookup table")
        })?;
        Ok(Temperature::Centidegrees(centidegrees))
    }
}

/// Runtime selection of the conversion strategy.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Linear,
    Table,
}

impl Conversion for Strategy {
    fn convert(&self, sample: Sample) -> Result<Temperature, Error> {
        match self {
            Self::Linear => Linear.convert(sample),
            Self::Table => LookupTable::default().convert(sample),
        }
    }
}
