//! Numeric conversions shared by the trigger, condition and action codecs

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest raw value that `u7_to_signed` maps to itself
pub const SIGNED7_POSITIVE_MAX: u8 = 60;

/// Light thresholds are stored in units of 10 lux
pub const LUX_PER_STEP: u16 = 10;

/// Analog thresholds are stored in units of 1/25 V (40 mV)
pub const MILLIVOLTS_PER_STEP: u16 = 40;

/// First raw value of the counter-threshold packing (counter slot 0, value 1)
pub const COUNTER_THRESHOLD_BASE: u8 = 96;
/// Values per counter slot in the counter-threshold packing
pub const COUNTER_THRESHOLD_SPAN: u8 = 16;
/// Number of counter slots addressable by the counter-threshold packing
pub const COUNTER_SLOTS: u8 = 10;

/// Offset between action code and argument in the counter-step packing
pub const COUNTER_STEP_OFFSET: u8 = 47;
/// Argument stride per counter in the counter-step packing
pub const COUNTER_STEP_STRIDE: u8 = 8;

/// Convert a compact signed sensor value: 0..=60 are positive, 61..=255 wrap to `v - 128`.
///
/// Not one-to-one: raw 128..=188 give the same values as 0..=60.
#[must_use]
pub fn u7_to_signed(value: u8) -> i8 {
    if value > SIGNED7_POSITIVE_MAX {
        // 61..=255 maps onto -67..=127, always within i8
        (i16::from(value) - 128) as i8
    } else {
        value as i8
    }
}

/// Preferred raw byte for a compact signed value; `None` for -128..=-68.
///
/// Only a right inverse of [`u7_to_signed`]: 0..=60 always come back as
/// themselves, never as their 128..=188 aliases. Use [`CompactCelsius`] to
/// keep the byte a value was read from.
#[must_use]
pub fn signed_to_u7(value: i8) -> Option<u8> {
    match value {
        0..=60 => Some(value as u8),
        -67..=-1 | 61..=127 => u8::try_from(i16::from(value) + 128).ok(),
        _ => None,
    }
}

/// Temperature threshold in the compact signed form, keeping its raw byte.
///
/// Serialized as plain degrees when the byte is the preferred one for its
/// value, otherwise as `{"celsius": .., "raw": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CompactCelsiusRepr", into = "CompactCelsiusRepr")]
pub struct CompactCelsius(u8);

impl CompactCelsius {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Preferred encoding of a temperature in -67..=127 °C
    pub fn from_celsius(celsius: i8) -> Result<Self, CodecError> {
        signed_to_u7(celsius)
            .map(Self)
            .ok_or_else(|| CodecError::out_of_range("temperature", celsius, -67, 127))
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn celsius(self) -> i8 {
        u7_to_signed(self.0)
    }

    /// Whether the byte is one of the 128..=188 aliases of 0..=60
    #[must_use]
    pub fn is_alias(self) -> bool {
        signed_to_u7(self.celsius()) != Some(self.0)
    }
}

impl fmt::Display for CompactCelsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} °C", self.celsius())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CompactCelsiusRepr {
    Celsius(i8),
    Raw { celsius: i8, raw: u8 },
}

impl TryFrom<CompactCelsiusRepr> for CompactCelsius {
    type Error = CodecError;

    fn try_from(repr: CompactCelsiusRepr) -> Result<Self, Self::Error> {
        match repr {
            CompactCelsiusRepr::Celsius(celsius) => Self::from_celsius(celsius),
            CompactCelsiusRepr::Raw { celsius, raw } => {
                let value = Self(raw);
                if value.celsius() == celsius {
                    Ok(value)
                } else {
                    Err(CodecError::out_of_range(
                        "temperature",
                        celsius,
                        value.celsius(),
                        value.celsius(),
                    ))
                }
            }
        }
    }
}

impl From<CompactCelsius> for CompactCelsiusRepr {
    fn from(value: CompactCelsius) -> Self {
        if value.is_alias() {
            Self::Raw {
                celsius: value.celsius(),
                raw: value.0,
            }
        } else {
            Self::Celsius(value.celsius())
        }
    }
}

/// Light threshold in lux from its raw byte
#[must_use]
pub fn lux_from_raw(raw: u8) -> u16 {
    u16::from(raw) * LUX_PER_STEP
}

/// Raw byte for a light threshold; lux must be a multiple of 10 up to 2550
#[must_use]
pub fn lux_to_raw(lux: u16) -> Option<u8> {
    if lux % LUX_PER_STEP != 0 {
        return None;
    }
    u8::try_from(lux / LUX_PER_STEP).ok()
}

/// Analog threshold in millivolts from its raw byte (raw / 25 V)
#[must_use]
pub fn analog_from_raw(raw: u8) -> u16 {
    u16::from(raw) * MILLIVOLTS_PER_STEP
}

/// Raw byte for an analog threshold; millivolts must be a multiple of 40
#[must_use]
pub fn analog_to_raw(millivolts: u16) -> Option<u8> {
    if millivolts % MILLIVOLTS_PER_STEP != 0 {
        return None;
    }
    u8::try_from(millivolts / MILLIVOLTS_PER_STEP).ok()
}

/// Split a counter-threshold byte into `(slot, value)`.
///
/// `slot = floor((raw - 96) / 16)`, `value = raw - 95 - slot * 16`. Slots
/// are zero-based, values run 1..=16. Bytes below 96 have no slot.
#[must_use]
pub fn unpack_counter_threshold(raw: u8) -> Option<(u8, u8)> {
    let offset = raw.checked_sub(COUNTER_THRESHOLD_BASE)?;
    let slot = offset / COUNTER_THRESHOLD_SPAN;
    let value = offset - slot * COUNTER_THRESHOLD_SPAN + 1;
    Some((slot, value))
}

/// Inverse of [`unpack_counter_threshold`]
#[must_use]
pub fn pack_counter_threshold(slot: u8, value: u8) -> Option<u8> {
    if slot >= COUNTER_SLOTS || !(1..=COUNTER_THRESHOLD_SPAN).contains(&value) {
        return None;
    }
    Some(COUNTER_THRESHOLD_BASE + slot * COUNTER_THRESHOLD_SPAN + value - 1)
}

/// Counter number (1-based) from a counter-step action argument.
///
/// `counter = floor((arg - code - 47) / 8) + 1`. Arguments below
/// `code + 47` have no counter. Not interchangeable with the threshold packing.
#[must_use]
pub fn unpack_counter_step(code: u8, arg: u8) -> Option<u8> {
    let base = u16::from(code) + u16::from(COUNTER_STEP_OFFSET);
    let offset = u16::from(arg).checked_sub(base)?;
    u8::try_from(offset / u16::from(COUNTER_STEP_STRIDE) + 1).ok()
}

/// Inverse of [`unpack_counter_step`]
#[must_use]
pub fn pack_counter_step(code: u8, counter: u8) -> Option<u8> {
    let step = u16::from(counter.checked_sub(1)?) * u16::from(COUNTER_STEP_STRIDE);
    u8::try_from(u16::from(code) + u16::from(COUNTER_STEP_OFFSET) + step).ok()
}

/// Address form of a switching target.
///
/// Direct commands address internal flags as `flag + 100`; timed commands
/// address the first eight flags as `flag + 24` and the rest unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputAddressing {
    Direct,
    Timed,
}

impl OutputAddressing {
    /// Form a raw flag address was written in; `None` for outputs and LEDs
    #[must_use]
    pub fn of_raw(raw: u8) -> Option<Self> {
        if raw < OutputTarget::FLAG_BASE {
            None
        } else if raw > 100 {
            Some(Self::Direct)
        } else {
            Some(Self::Timed)
        }
    }
}

/// Switching target bucketed from the shared output address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum OutputTarget {
    /// Physical output, raw index 0..=15
    Output(u8),
    /// LED output, raw index 16..=24 (kept in the shared numbering)
    Led(u8),
    /// Internal flag, after removing the address offset
    Flag(u8),
}

impl OutputTarget {
    /// First raw index of the LED bucket
    pub const LED_BASE: u8 = 16;
    /// First raw index of the flag bucket
    pub const FLAG_BASE: u8 = 25;

    /// Bucket a raw target index
    #[must_use]
    pub fn classify(raw: u8) -> Self {
        if raw < Self::LED_BASE {
            Self::Output(raw)
        } else if raw < Self::FLAG_BASE {
            Self::Led(raw)
        } else if raw > 100 {
            Self::Flag(raw - 100)
        } else if raw < 33 {
            Self::Flag(raw - 24)
        } else {
            Self::Flag(raw)
        }
    }

    /// Raw index in the given address form.
    ///
    /// Wraps for targets that fail [`OutputTarget::is_addressable`].
    #[must_use]
    pub fn to_raw(self, addressing: OutputAddressing) -> u8 {
        match (self, addressing) {
            (Self::Output(index) | Self::Led(index), _) => index,
            (Self::Flag(flag), OutputAddressing::Direct) => flag.wrapping_add(100),
            (Self::Flag(flag), OutputAddressing::Timed) if flag < 33 => flag.wrapping_add(24),
            (Self::Flag(flag), OutputAddressing::Timed) => flag,
        }
    }

    /// Whether `to_raw` followed by `classify` gives this target back
    #[must_use]
    pub fn is_addressable(self, addressing: OutputAddressing) -> bool {
        match (self, addressing) {
            (Self::Output(index), _) => index < Self::LED_BASE,
            (Self::Led(index), _) => (Self::LED_BASE..Self::FLAG_BASE).contains(&index),
            (Self::Flag(flag), OutputAddressing::Direct) => (1..=155).contains(&flag),
            (Self::Flag(flag), OutputAddressing::Timed) => {
                (1..=8).contains(&flag) || (33..=100).contains(&flag)
            }
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output(index) => write!(f, "output {index}"),
            Self::Led(index) => write!(f, "LED {index}"),
            Self::Flag(flag) => write!(f, "flag {flag}"),
        }
    }
}

/// Operating mode byte: high five bits select the family, low three bits qualify it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatingMode {
    /// Family selector (`byte & 0xF8`)
    pub family: u8,
    /// Qualifier bits (`byte & 0x07`): day, night, alarm
    pub sub: u8,
}

impl OperatingMode {
    pub const FAMILY_MASK: u8 = 0xF8;
    pub const SUB_MASK: u8 = 0x07;

    pub const ALWAYS: u8 = 0;
    pub const ABSENT: u8 = 16;
    pub const PRESENT: u8 = 32;
    pub const SLEEP: u8 = 48;
    pub const USER_1: u8 = 80;
    pub const USER_2: u8 = 96;
    pub const HOLIDAY: u8 = 112;

    pub const DAY: u8 = 0x01;
    pub const NIGHT: u8 = 0x02;
    pub const ALARM: u8 = 0x04;

    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            family: byte & Self::FAMILY_MASK,
            sub: byte & Self::SUB_MASK,
        }
    }

    /// Recombine; bits outside each mask are dropped
    #[must_use]
    pub fn to_byte(self) -> u8 {
        (self.family & Self::FAMILY_MASK) | (self.sub & Self::SUB_MASK)
    }

    #[must_use]
    pub fn family_name(self) -> Option<&'static str> {
        match self.family {
            Self::ALWAYS => Some("always"),
            Self::ABSENT => Some("absent"),
            Self::PRESENT => Some("present"),
            Self::SLEEP => Some("sleep"),
            Self::USER_1 => Some("user mode 1"),
            Self::USER_2 => Some("user mode 2"),
            Self::HOLIDAY => Some("holiday"),
            _ => None,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family_name() {
            Some(name) => write!(f, "'{name}'")?,
            None => write!(f, "mode {}", self.family)?,
        }
        for (bit, name) in [(Self::DAY, "day"), (Self::NIGHT, "night"), (Self::ALARM, "alarm")] {
            if self.sub & bit != 0 {
                write!(f, ", {name}")?;
            }
        }
        Ok(())
    }
}
