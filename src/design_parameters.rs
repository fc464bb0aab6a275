use fugit::NanosDurationU64;

/// The value the fast countdown counter is loaded with at the start of a measurement.
pub const TIMER_RELOAD: u16 = 60_000;

/// The duration of one fast counter tick.
// The reference board clocks the counter from an undivided 6 MHz source, 166.7 ns per tick. The
// fraction is dropped.
pub const TIMER_TICK: NanosDurationU64 = NanosDurationU64::from_ticks(166);

/// The largest code of the converter in 8-bit mode.
pub const ADC_MAX_CODE: u32 = 255;

/// The converter input voltage at `ADC_MAX_CODE`.
pub const ADC_FULL_SCALE_MV: u32 = 5_000;

/// Sensor output at 0 degrees Celsius.
pub const SENSOR_OFFSET_MV: f64 = 500.0;

/// Sensor output slope.
pub const SENSOR_MV_PER_DEGREE: f64 = 10.0;

/// Fraction digits of the reported temperature.
pub const TEMPERATURE_PRECISION: i8 = 2;

/// Fraction digits of the reported conversion time in milliseconds.
pub const TIME_PRECISION: i8 = 2;

/// Serial line rate of the report output, 8N1.
pub const UART_BAUD: u32 = 9_600;

/// Printed once at startup.
pub const BANNER: &str = "01 Temperature Calculation ver 00.01\n";
