/// The largest number of fraction digits that can be requested.
pub const MAX_PRECISION: u8 = 10;

/// Half a unit in the last place for each precision.
///
/// Adding `ROUNDING[p]` to a non-negative value before truncating it at `p`
/// fraction digits rounds half up at that digit.
pub const ROUNDING: [f64; MAX_PRECISION as usize + 1] = [
    0.5,
    0.05,
    0.005,
    0.0005,
    0.00005,
    0.000005,
    0.0000005,
    0.00000005,
    0.000000005,
    0.0000000005,
    0.00000000005,
];

/// Number of digits rendered after the decimal point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Precision {
    /// Select the precision from the magnitude of the value.
    #[default]
    Auto,
    /// A fixed number of fraction digits, at most [`MAX_PRECISION`].
    Fixed(u8),
}

impl Precision {
    /// Construct a fixed precision, clamped to [`MAX_PRECISION`].
    pub const fn fixed(digits: u8) -> Self {
        if digits > MAX_PRECISION {
            Self::Fixed(MAX_PRECISION)
        } else {
            Self::Fixed(digits)
        }
    }

    /// Resolve the number of fraction digits for a value.
    ///
    /// # Args
    /// * `magnitude` - The absolute value that is about to be rendered.
    ///
    /// # Returns
    /// The fraction digit count in `0..=MAX_PRECISION`.
    pub fn resolve(self, magnitude: f64) -> u8 {
        match self {
            Self::Fixed(digits) => digits.min(MAX_PRECISION),
            Self::Auto => {
                if magnitude < 1.0 {
                    6
                } else if magnitude < 10.0 {
                    5
                } else if magnitude < 100.0 {
                    4
                } else if magnitude < 1_000.0 {
                    3
                } else if magnitude < 10_000.0 {
                    2
                } else if magnitude < 100_000.0 {
                    1
                } else {
                    0
                }
            }
        }
    }
}

macro_rules! precision_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Precision {
                /// Negative requests select [`Precision::Auto`], requests above
                /// [`MAX_PRECISION`] are clamped.
                fn from(digits: $ty) -> Self {
                    if digits < 0 {
                        Self::Auto
                    } else if digits > MAX_PRECISION as $ty {
                        Self::Fixed(MAX_PRECISION)
                    } else {
                        Self::Fixed(digits as u8)
                    }
                }
            }
        )*
    };
}

precision_from_signed!(i8, i16, i32);

impl From<u8> for Precision {
    fn from(digits: u8) -> Self {
        Self::fixed(digits)
    }
}
