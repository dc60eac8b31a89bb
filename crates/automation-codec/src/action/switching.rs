//! Switching actions: outputs, LEDs and flags, direct or timed

use crate::error::{check_range, CodecError};
use crate::numeric::{OutputAddressing, OutputTarget};
use crate::raw::{RawAction, SpareArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ON: u8 = 1;
pub const OFF: u8 = 2;
pub const TOGGLE: u8 = 3;
pub const TIMED: u8 = 9;
/// Flag-form codes are the plain codes plus this offset
pub const FLAG_CODE_OFFSET: u8 = 110;
pub const FLAG_ON: u8 = ON + FLAG_CODE_OFFSET;
pub const FLAG_TIMED: u8 = 114;

/// `args[2]` value marking a timer that always switches
const ALWAYS_REPEAT: u8 = 255;
const REVERSE_DECADE: u8 = 10;
const TOGGLE_DECADE: u8 = 20;

const DIRECT_SLOTS: &[usize] = &[0];
const TIMED_SLOTS: &[usize] = &[0, 1, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
}

impl TimeUnit {
    fn base(self) -> u8 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 2,
        }
    }
}

/// Output option of a timed switching action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "option", rename_all = "snake_case")]
pub enum TimerMode {
    /// Switch on for the interval, `repeat` times
    Forward { repeat: u8 },
    /// Inverse operation of forward
    Reverse { repeat: u8 },
    /// Delayed toggle
    Toggle { repeat: u8 },
    /// Switch on after the delay without repetition count
    Always,
}

impl TimerMode {
    fn decade(self) -> u8 {
        match self {
            Self::Forward { .. } | Self::Always => 0,
            Self::Reverse { .. } => REVERSE_DECADE,
            Self::Toggle { .. } => TOGGLE_DECADE,
        }
    }

    fn repeat_byte(self) -> u8 {
        match self {
            Self::Forward { repeat } | Self::Reverse { repeat } | Self::Toggle { repeat } => repeat,
            Self::Always => ALWAYS_REPEAT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwitchCommand {
    On,
    Off,
    Toggle,
    Timed {
        interval: u8,
        unit: TimeUnit,
        mode: TimerMode,
        /// Unit and option byte (`args[0]`) when it is not the one `unit`
        /// and `mode` give, e.g. any byte next to the "always" sentinel
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchingAction {
    pub target: OutputTarget,
    pub command: SwitchCommand,
    /// Written with the flag-form codes 111..=114
    #[serde(default)]
    pub flag_code: bool,
    /// Flag address written in the other command kind's form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_form: Option<OutputAddressing>,
    #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
    pub spare: SpareArgs,
}

impl SwitchingAction {
    /// Validated switching action using the plain codes
    pub fn new(target: OutputTarget, command: SwitchCommand) -> Result<Self, CodecError> {
        let action = Self {
            target,
            command,
            flag_code: false,
            address_form: None,
            spare: SpareArgs::default(),
        };
        action.validate()?;
        Ok(action)
    }

    pub(super) fn decode(code: u8, args: &[u8; 6]) -> Option<Self> {
        let flag_code = code > FLAG_CODE_OFFSET;
        let normalized = if flag_code {
            code - FLAG_CODE_OFFSET
        } else {
            code
        };
        let command = match normalized {
            ON => SwitchCommand::On,
            OFF => SwitchCommand::Off,
            TOGGLE => SwitchCommand::Toggle,
            _ => {
                let unit = if matches!(args[0], 2 | 12 | 22) {
                    TimeUnit::Minutes
                } else {
                    TimeUnit::Seconds
                };
                let mode = if code == TIMED {
                    timer_mode(args[0], args[2])?
                } else {
                    TimerMode::Forward { repeat: args[2] }
                };
                let selector = unit.base().wrapping_add(mode.decade());
                return Some(Self {
                    target: OutputTarget::classify(args[3]),
                    command: SwitchCommand::Timed {
                        interval: args[1],
                        unit,
                        mode,
                        selector: (args[0] != selector).then_some(args[0]),
                    },
                    flag_code,
                    address_form: foreign_form(args[3], OutputAddressing::Timed),
                    spare: SpareArgs::collect(args, TIMED_SLOTS),
                });
            }
        };
        Some(Self {
            target: OutputTarget::classify(args[0]),
            command,
            flag_code,
            address_form: foreign_form(args[0], OutputAddressing::Direct),
            spare: SpareArgs::collect(args, DIRECT_SLOTS),
        })
    }

    pub(super) fn encode(&self) -> RawAction {
        let offset = if self.flag_code { FLAG_CODE_OFFSET } else { 0 };
        let target = self.target.to_raw(self.target_form());
        let direct = |code: u8| {
            RawAction::new(
                code + offset,
                self.spare.fill([target, 0, 0, 0, 0, 0], DIRECT_SLOTS),
            )
        };
        match self.command {
            SwitchCommand::On => direct(ON),
            SwitchCommand::Off => direct(OFF),
            SwitchCommand::Toggle => direct(TOGGLE),
            SwitchCommand::Timed {
                interval,
                unit,
                mode,
                selector,
            } => {
                let (code, mode) = if self.flag_code {
                    (FLAG_TIMED, TimerMode::Forward {
                        repeat: mode.repeat_byte(),
                    })
                } else {
                    (TIMED, mode)
                };
                let selector = selector.unwrap_or(unit.base().wrapping_add(mode.decade()));
                let args = [selector, interval, mode.repeat_byte(), target, 0, 0];
                RawAction::new(code, self.spare.fill(args, TIMED_SLOTS))
            }
        }
    }

    /// Address form the command kind uses for flags
    pub fn addressing(&self) -> OutputAddressing {
        match self.command {
            SwitchCommand::Timed { .. } => OutputAddressing::Timed,
            _ => OutputAddressing::Direct,
        }
    }

    /// Address form the target is written in
    #[must_use]
    pub fn target_form(&self) -> OutputAddressing {
        self.address_form.unwrap_or_else(|| self.addressing())
    }

    /// Output option number as shown in the configurator (1..=7)
    #[must_use]
    pub fn output_option(&self) -> u8 {
        match self.command {
            SwitchCommand::On => 1,
            SwitchCommand::Off => 2,
            SwitchCommand::Toggle => 3,
            SwitchCommand::Timed { mode, .. } => match mode {
                TimerMode::Forward { .. } => 4,
                TimerMode::Reverse { .. } => 5,
                TimerMode::Always => 6,
                TimerMode::Toggle { .. } => 7,
            },
        }
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if !self.target.is_addressable(self.target_form()) {
            return Err(CodecError::TargetNotAddressable(self.target.to_string()));
        }
        if self.flag_code && !matches!(self.target, OutputTarget::Flag(_)) {
            return Err(CodecError::TargetNotAddressable(self.target.to_string()));
        }
        if let SwitchCommand::Timed { mode, .. } = self.command {
            match mode {
                TimerMode::Always if self.flag_code => {
                    return Err(CodecError::out_of_range("timer repeat", 255, 0, 254));
                }
                TimerMode::Forward { repeat }
                | TimerMode::Reverse { repeat }
                | TimerMode::Toggle { repeat } => {
                    check_range("timer repeat", repeat, 0, ALWAYS_REPEAT - 1)?;
                    if self.flag_code && mode.decade() != 0 {
                        return Err(CodecError::out_of_range(
                            "flag timer option",
                            mode.decade(),
                            0,
                            0,
                        ));
                    }
                }
                TimerMode::Always => {}
            }
        }
        Ok(())
    }
}

/// Address form of a raw target byte when it is not `own`
fn foreign_form(raw: u8, own: OutputAddressing) -> Option<OutputAddressing> {
    OutputAddressing::of_raw(raw).filter(|form| *form != own)
}

/// Output option lookup for code 9
fn timer_mode(unit_and_mode: u8, repeat: u8) -> Option<TimerMode> {
    if repeat == ALWAYS_REPEAT {
        return Some(TimerMode::Always);
    }
    match unit_and_mode {
        1 | 2 => Some(TimerMode::Forward { repeat }),
        11 | 12 => Some(TimerMode::Reverse { repeat }),
        21 | 22 => Some(TimerMode::Toggle { repeat }),
        _ => None,
    }
}

impl fmt::Display for SwitchingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            SwitchCommand::On => write!(f, "switch {} on", self.target),
            SwitchCommand::Off => write!(f, "switch {} off", self.target),
            SwitchCommand::Toggle => write!(f, "toggle {}", self.target),
            SwitchCommand::Timed {
                interval,
                unit,
                mode,
                ..
            } => {
                let unit = match unit {
                    TimeUnit::Seconds => "s",
                    TimeUnit::Minutes => "min",
                };
                match mode {
                    TimerMode::Always => {
                        write!(f, "switch {} on after {interval} {unit}", self.target)
                    }
                    TimerMode::Forward { repeat } => {
                        write!(f, "switch {} on for {interval} {unit}, {repeat}x", self.target)
                    }
                    TimerMode::Reverse { repeat } => write!(
                        f,
                        "switch {} on for {interval} {unit} (reverse), {repeat}x",
                        self.target
                    ),
                    TimerMode::Toggle { repeat } => write!(
                        f,
                        "switch {} off after {interval} {unit}, {repeat}x",
                        self.target
                    ),
                }
            }
        }
    }
}
