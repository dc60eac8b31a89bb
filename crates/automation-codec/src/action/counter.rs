//! Counter actions

use crate::context::CodecContext;
use crate::error::{check_range, CodecError};
use crate::numeric::{
    pack_counter_step, unpack_counter_step, COUNTER_SLOTS, COUNTER_STEP_STRIDE,
};
use crate::raw::{RawAction, SpareArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COMPARE: u8 = 6;
pub const INCREMENT: u8 = 118;
pub const DECREMENT: u8 = 119;

/// Sub-command byte written in `args[1]` of the compare form
const COMPARE_SUBCOMMAND: u8 = 5;

const STEP_SLOTS: &[usize] = &[0];
const COMPARE_SLOTS: &[usize] = &[0, 1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CounterOperation {
    Increment,
    Decrement,
    /// Load the counter with `value` (code 6)
    Compare {
        value: u8,
        /// `args[1]` when it is not the usual sub-command 5
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subcommand: Option<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterAction {
    /// 1-based counter number
    pub counter: u8,
    pub operation: CounterOperation,
    /// Position of a step byte inside its counter's bucket of eight, zero as
    /// written by the configurator
    #[serde(default, skip_serializing_if = "is_zero")]
    pub step_offset: u8,
    #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
    pub spare: SpareArgs,
}

impl CounterAction {
    /// Load `counter` (1-based) with `value`
    #[must_use]
    pub fn compare(counter: u8, value: u8) -> Self {
        Self {
            counter,
            operation: CounterOperation::Compare {
                value,
                subcommand: None,
            },
            step_offset: 0,
            spare: SpareArgs::default(),
        }
    }

    pub(super) fn decode(code: u8, args: &[u8; 6]) -> Option<Self> {
        if code == COMPARE {
            return Some(Self {
                counter: args[0],
                operation: CounterOperation::Compare {
                    value: args[2],
                    subcommand: (args[1] != COMPARE_SUBCOMMAND).then_some(args[1]),
                },
                step_offset: 0,
                spare: SpareArgs::collect(args, COMPARE_SLOTS),
            });
        }
        let counter = unpack_counter_step(code, args[0])?;
        let operation = if code == INCREMENT {
            CounterOperation::Increment
        } else {
            CounterOperation::Decrement
        };
        let base = pack_counter_step(code, counter)?;
        Some(Self {
            counter,
            operation,
            step_offset: (args[0] - base) % COUNTER_STEP_STRIDE,
            spare: SpareArgs::collect(args, STEP_SLOTS),
        })
    }

    pub(super) fn encode(&self) -> RawAction {
        let step = |code: u8| {
            let arg = pack_counter_step(code, self.counter)
                .unwrap_or(0)
                .wrapping_add(self.step_offset);
            RawAction::new(code, self.spare.fill([arg, 0, 0, 0, 0, 0], STEP_SLOTS))
        };
        match self.operation {
            CounterOperation::Increment => step(INCREMENT),
            CounterOperation::Decrement => step(DECREMENT),
            CounterOperation::Compare { value, subcommand } => {
                let args = [
                    self.counter,
                    subcommand.unwrap_or(COMPARE_SUBCOMMAND),
                    value,
                    0,
                    0,
                    0,
                ];
                RawAction::new(COMPARE, self.spare.fill(args, COMPARE_SLOTS))
            }
        }
    }

    pub fn validate(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        check_range("counter", self.counter, 1, COUNTER_SLOTS)?;
        self.check_tables(ctx)
    }

    pub(super) fn check_tables(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        match self.operation {
            CounterOperation::Compare { value, .. } => ctx.check_counter(self.counter, value),
            CounterOperation::Increment | CounterOperation::Decrement => Ok(()),
        }
    }
}

impl fmt::Display for CounterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            CounterOperation::Increment => write!(f, "count counter {} up", self.counter),
            CounterOperation::Decrement => write!(f, "count counter {} down", self.counter),
            CounterOperation::Compare { value, .. } => {
                write!(f, "set counter {} to {value}", self.counter)
            }
        }
    }
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}
