//! Float to decimal string conversion for small targets.
//!
//! # Design
//! The value is biased by half a unit at the requested precision, the integer part is taken by
//! truncation and the fraction digits are extracted by repeated multiplication by ten. This is
//! round-half-up on the decimal digits as they exist in binary floating point, which is not the
//! same as correct decimal rounding: `1.005` is stored as `1.00499999999999989...` and renders as
//! `1.00` at two digits.
//!
//! Rendering never allocates and never fails. The output lives in a [`Decimal`] of fixed
//! [`CAPACITY`], large enough for a sign, the full `u64` integer part, the point and
//! [`MAX_PRECISION`] fraction digits.
#![cfg_attr(not(test), no_std)]

use core::{fmt, ops::Deref};

mod precision;
pub use precision::*;

/// Maximum length of a rendered value in bytes.
pub const CAPACITY: usize = 1 + 20 + 1 + MAX_PRECISION as usize;

/// A rendered decimal number.
#[derive(Copy, Clone)]
pub struct Decimal {
    buf: [u8; CAPACITY],
    len: u8,
}

impl Decimal {
    /// Render a value.
    ///
    /// # Args
    /// * `value` - The value to render.
    /// * `precision` - The number of fraction digits. Negative integers select automatic
    ///   precision, integers above [`MAX_PRECISION`] are clamped.
    pub fn new(value: f64, precision: impl Into<Precision>) -> Self {
        let mut out = Self {
            buf: [0; CAPACITY],
            len: 0,
        };

        let mut value = value;
        if value < 0.0 {
            value = -value;
            out.push(b'-');
        }

        let digits = precision.into().resolve(value);
        if digits > 0 {
            value += ROUNDING[digits as usize];
        }

        // Saturates above u64::MAX, NaN becomes zero.
        let integer = value as u64;
        out.push_integer(integer);

        if digits > 0 {
            out.push(b'.');
            let mut fraction = value - integer as f64;
            for _ in 0..digits {
                fraction *= 10.0;
                let digit = (fraction as u8).min(9);
                out.push(b'0' + digit);
                fraction -= digit as f64;
            }
        }

        out
    }

    fn push(&mut self, byte: u8) {
        self.buf[self.len as usize] = byte;
        self.len += 1;
    }

    fn push_integer(&mut self, mut integer: u64) {
        if integer == 0 {
            self.push(b'0');
            return;
        }

        let mut reversed = [0u8; 20];
        let mut count = 0;
        while integer != 0 {
            reversed[count] = b'0' + (integer % 10) as u8;
            integer /= 10;
            count += 1;
        }
        for &digit in reversed[..count].iter().rev() {
            self.push(digit);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn as_str(&self) -> &str {
        // Note(unsafe): Only ASCII sign, digit and point bytes are ever pushed.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for Decimal {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Decimal {}

impl PartialEq<&str> for Decimal {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<str> for Decimal {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// Render a value into a [`Decimal`].
///
/// See [`Decimal::new`].
pub fn format(value: f64, precision: impl Into<Precision>) -> Decimal {
    Decimal::new(value, precision)
}

/// Render a value into a formatter sink.
pub fn write<W: fmt::Write>(
    w: &mut W,
    value: f64,
    precision: impl Into<Precision>,
) -> fmt::Result {
    w.write_str(Decimal::new(value, precision).as_str())
}
