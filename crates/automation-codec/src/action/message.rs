//! Message and alarm actions

use crate::raw::{RawAction, SpareArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RAISE_ALARM: u8 = 55;
pub const SET: u8 = 56;
pub const RESET: u8 = 57;
pub const SET_FOR: u8 = 58;

const MESSAGE_SLOTS: &[usize] = &[0];
const SET_FOR_SLOTS: &[usize] = &[0, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageCommand {
    RaiseAlarm,
    Set,
    Reset,
    SetFor { minutes: u8 },
}

impl MessageCommand {
    fn used_slots(self) -> &'static [usize] {
        match self {
            Self::SetFor { .. } => SET_FOR_SLOTS,
            _ => MESSAGE_SLOTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageAction {
    pub message: u8,
    pub command: MessageCommand,
    #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
    pub spare: SpareArgs,
}

impl MessageAction {
    pub(super) fn decode(code: u8, args: &[u8; 6]) -> Self {
        let command = match code {
            RAISE_ALARM => MessageCommand::RaiseAlarm,
            SET => MessageCommand::Set,
            RESET => MessageCommand::Reset,
            _ => MessageCommand::SetFor { minutes: args[1] },
        };
        Self {
            message: args[0],
            command,
            spare: SpareArgs::collect(args, command.used_slots()),
        }
    }

    pub(super) fn encode(&self) -> RawAction {
        let (code, minutes) = match self.command {
            MessageCommand::RaiseAlarm => (RAISE_ALARM, 0),
            MessageCommand::Set => (SET, 0),
            MessageCommand::Reset => (RESET, 0),
            MessageCommand::SetFor { minutes } => (SET_FOR, minutes),
        };
        let args = [self.message, minutes, 0, 0, 0, 0];
        RawAction::new(code, self.spare.fill(args, self.command.used_slots()))
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            MessageCommand::RaiseAlarm => write!(f, "raise alarm message {}", self.message),
            MessageCommand::Set => write!(f, "set message {}", self.message),
            MessageCommand::Reset => write!(f, "reset message {}", self.message),
            MessageCommand::SetFor { minutes } => {
                write!(f, "set message {} for {minutes} min", self.message)
            }
        }
    }
}
