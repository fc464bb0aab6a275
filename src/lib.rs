#![cfg_attr(not(test), no_std)]

pub mod conversion;
pub mod design_parameters;
mod error;
pub use error::Error;
pub mod hardware;
pub mod meter;
pub mod report;
pub mod settings;

pub use decimal_fmt;
