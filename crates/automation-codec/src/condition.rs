//! Condition byte codec

use crate::error::{check_range, CodecError};
use crate::numeric::OperatingMode;
use serde::{Deserialize, Serialize};
use std::fmt;

const MODE_MAX: u8 = 112;
const TIME_WINDOW_BASE: u8 = 160;
const TIME_WINDOW_END: u8 = 184;
const LOCAL_FLAG_BASE: u8 = 192;
const GLOBAL_FLAG_BASE: u8 = 224;
/// Subtracted from reset-flag codes to give the flag index
const FLAG_RESET_OFFSET: u8 = 191;
/// Subtracted from set-flag codes to give the flag index
const FLAG_SET_OFFSET: u8 = 207;
/// Set-flag codes start this far above the reset codes of the same family
const FLAG_SET_SPAN: u8 = 16;

/// State a flag must have (conditions) or changes to (triggers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagState {
    Set,
    Reset,
}

impl FlagState {
    pub(crate) fn from_set(set: bool) -> Self {
        if set {
            Self::Set
        } else {
            Self::Reset
        }
    }

    fn offset(self) -> u8 {
        match self {
            Self::Set => FLAG_SET_OFFSET,
            Self::Reset => FLAG_RESET_OFFSET,
        }
    }
}

impl fmt::Display for FlagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => f.write_str("set"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Guard evaluated before the action runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionSpec {
    /// No condition (code 0)
    #[default]
    Always,
    /// Operating mode match, codes 1..=112
    Mode { mode: OperatingMode },
    /// Hour of day, codes 160..=183
    TimeWindow { hour: u8 },
    /// Local flag 1..=16, codes 192..=223
    LocalFlag { flag: u8, state: FlagState },
    /// Global flag 33..=48, codes 224..=255.
    ///
    /// Uses the same offsets as [`ConditionSpec::LocalFlag`] on a disjoint
    /// code range; kept as its own family so encoding picks the right range.
    GlobalFlag { flag: u8, state: FlagState },
    /// Code outside every known range, kept verbatim
    Unrecognized { code: u8 },
}

impl ConditionSpec {
    /// Decode a condition byte; total over all 256 values
    #[must_use]
    pub fn decode(code: u8) -> Self {
        match code {
            0 => Self::Always,
            1..=MODE_MAX => Self::Mode {
                mode: OperatingMode::from_byte(code),
            },
            TIME_WINDOW_BASE..=183 => Self::TimeWindow {
                hour: code - TIME_WINDOW_BASE,
            },
            LOCAL_FLAG_BASE..=223 => {
                let (flag, state) = split_flag(code - LOCAL_FLAG_BASE, code);
                Self::LocalFlag { flag, state }
            }
            GLOBAL_FLAG_BASE..=u8::MAX => {
                let (flag, state) = split_flag(code - GLOBAL_FLAG_BASE, code);
                Self::GlobalFlag { flag, state }
            }
            _ => Self::Unrecognized { code },
        }
    }

    /// Encode back into the condition byte
    #[must_use]
    pub fn encode(&self) -> u8 {
        match *self {
            Self::Always => 0,
            Self::Mode { mode } => mode.to_byte(),
            Self::TimeWindow { hour } => TIME_WINDOW_BASE.wrapping_add(hour),
            Self::LocalFlag { flag, state } | Self::GlobalFlag { flag, state } => {
                flag.wrapping_add(state.offset())
            }
            Self::Unrecognized { code } => code,
        }
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        match *self {
            Self::Always => Ok(()),
            Self::Mode { mode } => check_range("mode", mode.to_byte(), 1, MODE_MAX),
            Self::TimeWindow { hour } => {
                check_range("hour", hour, 0, TIME_WINDOW_END - TIME_WINDOW_BASE - 1)
            }
            Self::LocalFlag { flag, .. } => check_range("local flag", flag, 1, 16),
            Self::GlobalFlag { flag, .. } => check_range("global flag", flag, 33, 48),
            Self::Unrecognized { code } => match Self::decode(code) {
                Self::Unrecognized { .. } => Ok(()),
                _ => Err(CodecError::out_of_range("unrecognized condition", code, 113, 191)),
            },
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

/// Split the offset within a flag family into flag index and state
fn split_flag(offset: u8, code: u8) -> (u8, FlagState) {
    let state = FlagState::from_set(offset >= FLAG_SET_SPAN);
    (code - state.offset(), state)
}

impl fmt::Display for ConditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Mode { mode } => write!(f, "in mode {mode}"),
            Self::TimeWindow { hour } => write!(f, "at {hour} h"),
            Self::LocalFlag { flag, state } => write!(f, "local flag {flag} {state}"),
            Self::GlobalFlag { flag, state } => write!(f, "global flag {flag} {state}"),
            Self::Unrecognized { code } => write!(f, "unknown condition {code}"),
        }
    }
}
