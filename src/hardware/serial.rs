//! Board I/O adapters
//!
//! The HAL drivers implement the embedded-hal 0.2 traits. These adapters expose them as the byte
//! sink, sample source and indicator of the report loop.
use core::marker::PhantomData;

use embedded_hal_02::{
    adc::OneShot, blocking::serial::Write, digital::v2::OutputPin,
};

use crate::conversion::Sample;
use crate::report::SampleSource;

/// An [`embedded_io::Write`] over a blocking serial transmitter.
pub struct SerialSink<T> {
    tx: T,
}

impl<T> SerialSink<T> {
    pub fn new(tx: T) -> Self {
        Self { tx }
    }
}

impl<T: Write<u8>> embedded_io::ErrorType for SerialSink<T> {
    type Error = embedded_io::ErrorKind;
}

impl<T: Write<u8>> embedded_io::Write for SerialSink<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx
            .bwrite_all(buf)
            .map_err(|_| embedded_io::ErrorKind::Other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.bflush().map_err(|_| embedded_io::ErrorKind::Other)
    }
}

/// A [`SampleSource`] on a one-shot ADC channel.
pub struct AdcSource<A, ADC, PIN> {
    adc: A,
    pin: PIN,
    _adc: PhantomData<ADC>,
}

impl<A, ADC, PIN> AdcSource<A, ADC, PIN>
where
    A: OneShot<ADC, u32, PIN>,
{
    /// # Args
    /// * `adc` - The enabled converter. It should be configured for 8-bit resolution.
    /// * `pin` - The analog input channel.
    pub fn new(adc: A, pin: PIN) -> Self {
        Self {
            adc,
            pin,
            _adc: PhantomData,
        }
    }
}

impl<A, ADC, PIN> SampleSource for AdcSource<A, ADC, PIN>
where
    A: OneShot<ADC, u32, PIN>,
{
    fn read_sample(&mut self) -> Sample {
        loop {
            match self.adc.read(&mut self.pin) {
                Ok(sample) => return sample as Sample,
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(_)) => {
                    log::warn!("ADC conversion failed, retrying");
                }
            }
        }
    }
}

/// An embedded-hal 1.0 [`embedded_hal_1::digital::OutputPin`] over a HAL output pin.
pub struct IndicatorPin<P> {
    pin: P,
}

impl<P: OutputPin> IndicatorPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> embedded_hal_1::digital::ErrorType for IndicatorPin<P> {
    type Error = embedded_hal_1::digital::ErrorKind;
}

impl<P: OutputPin> embedded_hal_1::digital::OutputPin for IndicatorPin<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin
            .set_low()
            .map_err(|_| embedded_hal_1::digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin
            .set_high()
            .map_err(|_| embedded_hal_1::digital::ErrorKind::Other)
    }
}
