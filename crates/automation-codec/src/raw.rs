//! Raw rule tuple exchanged with the device/storage layer
//!
//! ```text
//! (trigger code, arg1, arg2, time, condition code, action code, args[0..6])
//! ```

use crate::error::CodecError;
use serde::{Deserialize, Serialize};

/// Number of argument bytes carried by an action
pub const ACTION_ARG_COUNT: usize = 6;

/// Trigger slice of a raw rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawTrigger {
    pub code: u8,
    #[serde(default)]
    pub arg1: u8,
    #[serde(default)]
    pub arg2: u8,
    /// Time value, only meaningful for calendar triggers
    #[serde(default)]
    pub time: u16,
}

impl RawTrigger {
    /// Trigger bytes without a time value
    #[must_use]
    pub fn new(code: u8, arg1: u8, arg2: u8) -> Self {
        Self {
            code,
            arg1,
            arg2,
            time: 0,
        }
    }
}

/// Trigger bytes a decoded family does not interpret.
///
/// Slots line up with [`RawTrigger`]; a family only reads the spare slots
/// past the argument bytes it uses, and always the time value unless it is
/// a calendar trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpareTrigger {
    #[serde(default)]
    pub arg1: u8,
    #[serde(default)]
    pub arg2: u8,
    #[serde(default)]
    pub time: u16,
}

impl SpareTrigger {
    /// Spare bytes of `raw` once its first `used` argument bytes are taken
    #[must_use]
    pub fn collect(raw: &RawTrigger, used: usize) -> Self {
        Self {
            arg1: if used < 1 { raw.arg1 } else { 0 },
            arg2: if used < 2 { raw.arg2 } else { 0 },
            time: raw.time,
        }
    }

    /// Trigger bytes with the slots past `used` taken from the spare bytes
    #[must_use]
    pub fn fill(self, code: u8, arg1: u8, arg2: u8, used: usize) -> RawTrigger {
        RawTrigger {
            code,
            arg1: if used < 1 { self.arg1 } else { arg1 },
            arg2: if used < 2 { self.arg2 } else { arg2 },
            time: self.time,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Action slice of a raw rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawAction {
    pub code: u8,
    #[serde(default)]
    pub args: [u8; ACTION_ARG_COUNT],
}

impl RawAction {
    #[must_use]
    pub fn new(code: u8, args: [u8; ACTION_ARG_COUNT]) -> Self {
        Self { code, args }
    }

    /// Build from a variable-length argument list, zero-filling unused slots
    pub fn from_slice(code: u8, args: &[u8]) -> Result<Self, CodecError> {
        if args.len() > ACTION_ARG_COUNT {
            return Err(CodecError::TooManyArguments(args.len()));
        }
        let mut padded = [0u8; ACTION_ARG_COUNT];
        padded[..args.len()].copy_from_slice(args);
        Ok(Self { code, args: padded })
    }

    /// Argument bytes with trailing zero slots removed
    #[must_use]
    pub fn used_args(&self) -> &[u8] {
        let used = self
            .args
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        &self.args[..used]
    }
}

/// Action argument bytes a decoded family does not interpret, slot by slot.
///
/// Devices write zero into these slots. Whatever is found there is kept so
/// that encoding gives the original bytes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpareArgs(pub [u8; ACTION_ARG_COUNT]);

impl SpareArgs {
    /// Slots of `args` not listed in `used`
    #[must_use]
    pub fn collect(args: &[u8; ACTION_ARG_COUNT], used: &[usize]) -> Self {
        let mut spare = *args;
        for &slot in used {
            spare[slot] = 0;
        }
        Self(spare)
    }

    /// `args` with every slot not listed in `used` taken from the spare bytes
    #[must_use]
    pub fn fill(self, mut args: [u8; ACTION_ARG_COUNT], used: &[usize]) -> [u8; ACTION_ARG_COUNT] {
        for (slot, byte) in args.iter_mut().enumerate() {
            if !used.contains(&slot) {
                *byte = self.0[slot];
            }
        }
        args
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

/// Complete raw rule as stored on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawRule {
    pub trigger: RawTrigger,
    #[serde(default)]
    pub condition: u8,
    pub action: RawAction,
}

impl RawRule {
    /// Assemble from the flat boundary tuple
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        trigger_code: u8,
        trigger_arg1: u8,
        trigger_arg2: u8,
        trigger_time: u16,
        condition_code: u8,
        action_code: u8,
        action_args: [u8; ACTION_ARG_COUNT],
    ) -> Self {
        Self {
            trigger: RawTrigger {
                code: trigger_code,
                arg1: trigger_arg1,
                arg2: trigger_arg2,
                time: trigger_time,
            },
            condition: condition_code,
            action: RawAction::new(action_code, action_args),
        }
    }

    /// Flatten back into the boundary tuple
    #[must_use]
    pub fn into_parts(self) -> (u8, u8, u8, u16, u8, u8, [u8; ACTION_ARG_COUNT]) {
        (
            self.trigger.code,
            self.trigger.arg1,
            self.trigger.arg2,
            self.trigger.time,
            self.condition,
            self.action.code,
            self.action.args,
        )
    }
}
