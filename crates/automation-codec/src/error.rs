//! Error types for the automation codec

use thiserror::Error;

/// Errors raised when building or validating a structured rule.
///
/// Decoding and encoding themselves never fail; these errors come from
/// constructors and [`crate::AutomationRule::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A numeric parameter is outside its domain
    #[error("{field} out of range: {value} not in {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Trigger code is not one of the environmental sensor codes
    #[error("Code {0} is not an environmental sensor")]
    UnknownSensor(u8),

    /// Threshold kind does not match the sensor
    #[error("Sensor {sensor} expects {expected} thresholds")]
    SensorMismatch { sensor: u8, expected: &'static str },

    /// Named color preset is not offered on the selected RGB target
    #[error("Color preset {preset} is not available on {target}")]
    PresetUnavailable {
        preset: &'static str,
        target: &'static str,
    },

    /// Counter value exceeds the configured maximum for that counter
    #[error("Counter {counter} value {value} exceeds maximum {max}")]
    CounterLimit { counter: u8, value: u8, max: u8 },

    /// Finger is not enabled for the access user
    #[error("Finger {finger} is not enrolled for user {user}")]
    FingerNotEnrolled { user: u8, finger: u8 },

    /// Output target cannot be expressed in the command's address form
    #[error("Output target {0} cannot be addressed by this command")]
    TargetNotAddressable(String),

    /// Malformed `#rrggbb` color string
    #[error("Invalid hex color: {0}")]
    InvalidColor(String),

    /// More action argument bytes than the encoding holds
    #[error("Too many action arguments: {0} (max 6)")]
    TooManyArguments(usize),

    /// Time of day has a seconds component the encoding cannot carry
    #[error("Time of day must be whole minutes: {0}")]
    InvalidTime(String),
}

impl CodecError {
    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl Into<i32>,
        min: impl Into<i32>,
        max: impl Into<i32>,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

/// Check `value` against an inclusive range
pub(crate) fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), CodecError>
where
    T: PartialOrd + Into<i32> + Copy,
{
    if value < min || value > max {
        return Err(CodecError::out_of_range(field, value, min, max));
    }
    Ok(())
}
