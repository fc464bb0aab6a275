use crate::conversion::Sample;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Sample {sample} outside of the lookup table")]
    OutOfRange { sample: Sample },
    #[error("Serial output: {0:?}")]
    Sink(embedded_io::ErrorKind),
    #[error("Indicator pin: {0:?}")]
    Indicator(embedded_hal_1::digital::ErrorKind),
    #[error("Settings: {0:?}")]
    Settings(serde_json_core::de::Error),
    #[error("Settings encoding: {0:?}")]
    Encode(serde_json_core::ser::Error),
    #[error("Invalid settings: {0}")]
    InvalidSettings(&'static str),
}

impl<E: embedded_io::Error> From<E> for Error {
    fn from(value: E) -> Self {
        Self::Sink(value.kind())
    }
}
