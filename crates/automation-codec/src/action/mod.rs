//! Action codec
//!
//! Dispatches the action code to one of the action families. Each family
//! decodes the six argument bytes into typed parameters. Bytes a family does
//! not read travel along in its spare slots and are written back on encode.

pub mod climate;
pub mod counter;
pub mod cover;
pub mod light;
pub mod message;
pub mod switching;

pub use climate::{ClimateAction, ClimateMode, ControlSensor, SetPointCircuit};
pub use counter::{CounterAction, CounterOperation};
pub use cover::{CoverAction, CoverPart};
pub use light::{DimmerAction, DimmerCommand, RgbAction};
pub use message::{MessageAction, MessageCommand};
pub use switching::{SwitchCommand, SwitchingAction, TimeUnit, TimerMode};

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::raw::{RawAction, SpareArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BUZZER: u8 = 10;
pub const COLLECTIVE: u8 = 50;
pub const MODE: u8 = 64;
pub const AMBIENT_LIGHT: u8 = 240;

const BUZZER_SLOTS: &[usize] = &[0, 1, 2];
const SINGLE_SLOT: &[usize] = &[0];
const MODE_SLOTS: &[usize] = &[0, 1];

/// Decoded action, one variant per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ActionSpec {
    Switching(SwitchingAction),
    Counter(CounterAction),
    Buzzer {
        frequency: u8,
        duration: u8,
        repeat: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    Cover(CoverAction),
    Dimmer(DimmerAction),
    Rgb(RgbAction),
    CollectiveCommand {
        command: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    /// Operating mode, two independent bytes
    Mode {
        low: u8,
        high: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    Climate(ClimateAction),
    AmbientLight {
        duration: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    Message(MessageAction),
    Unrecognized {
        raw: RawAction,
    },
}

impl ActionSpec {
    /// Decode action bytes, consulting `ctx` only for diagnostics
    #[must_use]
    pub fn decode(raw: &RawAction, ctx: &CodecContext) -> Self {
        let Some(spec) = Self::decode_family(raw) else {
            if is_family_code(raw.code) {
                tracing::debug!(
                    "Action {:?} has no meaning in its family, keeping raw bytes",
                    raw
                );
            }
            return Self::Unrecognized { raw: *raw };
        };
        if let Err(e) = spec.check_tables(ctx) {
            tracing::warn!("Action '{}' contradicts configuration: {}", spec, e);
        }
        spec
    }

    fn decode_family(raw: &RawAction) -> Option<Self> {
        let RawAction { code, ref args } = *raw;
        let spec = match code {
            switching::ON
            | switching::OFF
            | switching::TOGGLE
            | switching::TIMED
            | switching::FLAG_ON..=switching::FLAG_TIMED => {
                Self::Switching(SwitchingAction::decode(code, args)?)
            }
            counter::COMPARE | counter::INCREMENT | counter::DECREMENT => {
                Self::Counter(CounterAction::decode(code, args)?)
            }
            BUZZER => Self::Buzzer {
                frequency: args[0],
                duration: args[1],
                repeat: args[2],
                spare: SpareArgs::collect(args, BUZZER_SLOTS),
            },
            cover::COVER | cover::COVER_TIMED => Self::Cover(CoverAction::decode(code, args)?),
            light::DIM_SET_LEVEL
            | light::DIM_RAMP_START
            | light::DIM_RAMP_STOP
            | light::DIM_FULL_RAMP => Self::Dimmer(DimmerAction::decode(code, args)),
            light::RGB => Self::Rgb(RgbAction::decode(args)),
            COLLECTIVE => Self::CollectiveCommand {
                command: args[0],
                spare: SpareArgs::collect(args, SINGLE_SLOT),
            },
            MODE => Self::Mode {
                low: args[0],
                high: args[1],
                spare: SpareArgs::collect(args, MODE_SLOTS),
            },
            climate::SET_POINT | climate::CONTROL_INTERNAL | climate::CONTROL_EXTERNAL => {
                Self::Climate(ClimateAction::decode(code, args))
            }
            AMBIENT_LIGHT => Self::AmbientLight {
                duration: args[0],
                spare: SpareArgs::collect(args, SINGLE_SLOT),
            },
            message::RAISE_ALARM..=message::SET_FOR => {
                Self::Message(MessageAction::decode(code, args))
            }
            _ => return None,
        };
        Some(spec)
    }

    /// Encode into action bytes
    #[must_use]
    pub fn encode(&self) -> RawAction {
        match self {
            Self::Switching(action) => action.encode(),
            Self::Counter(action) => action.encode(),
            Self::Buzzer {
                frequency,
                duration,
                repeat,
                spare,
            } => RawAction::new(
                BUZZER,
                spare.fill([*frequency, *duration, *repeat, 0, 0, 0], BUZZER_SLOTS),
            ),
            Self::Cover(action) => action.encode(),
            Self::Dimmer(action) => action.encode(),
            Self::Rgb(action) => action.encode(),
            Self::CollectiveCommand { command, spare } => {
                RawAction::new(COLLECTIVE, spare.fill([*command, 0, 0, 0, 0, 0], SINGLE_SLOT))
            }
            Self::Mode { low, high, spare } => {
                RawAction::new(MODE, spare.fill([*low, *high, 0, 0, 0, 0], MODE_SLOTS))
            }
            Self::Climate(action) => action.encode(),
            Self::AmbientLight { duration, spare } => {
                RawAction::new(AMBIENT_LIGHT, spare.fill([*duration, 0, 0, 0, 0, 0], SINGLE_SLOT))
            }
            Self::Message(action) => action.encode(),
            Self::Unrecognized { raw } => *raw,
        }
    }

    /// Check parameter domains and the configuration tables
    pub fn validate(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        match self {
            Self::Switching(action) => action.validate(),
            Self::Counter(action) => action.validate(ctx),
            Self::Cover(action) => action.validate(),
            Self::Dimmer(action) => action.validate(),
            Self::Rgb(action) => action.validate(),
            Self::Climate(action) => action.validate(),
            Self::Buzzer { .. }
            | Self::CollectiveCommand { .. }
            | Self::Mode { .. }
            | Self::AmbientLight { .. }
            | Self::Message(_)
            | Self::Unrecognized { .. } => Ok(()),
        }
    }

    fn check_tables(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        match self {
            Self::Counter(action) => action.check_tables(ctx),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

/// Whether an action code belongs to a known family
#[must_use]
pub fn is_family_code(code: u8) -> bool {
    matches!(
        code,
        switching::ON
            | switching::OFF
            | switching::TOGGLE
            | switching::TIMED
            | switching::FLAG_ON..=switching::FLAG_TIMED
            | counter::COMPARE
            | counter::INCREMENT
            | counter::DECREMENT
            | BUZZER
            | cover::COVER
            | cover::COVER_TIMED
            | light::DIM_SET_LEVEL
            | light::DIM_RAMP_START..=light::DIM_FULL_RAMP
            | light::RGB
            | COLLECTIVE
            | MODE
            | climate::SET_POINT..=climate::CONTROL_EXTERNAL
            | AMBIENT_LIGHT
            | message::RAISE_ALARM..=message::SET_FOR
    )
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switching(action) => write!(f, "{action}"),
            Self::Counter(action) => write!(f, "{action}"),
            Self::Buzzer {
                frequency,
                duration,
                repeat,
                ..
            } => write!(f, "buzzer {repeat}x: pitch {frequency}, duration {duration}"),
            Self::Cover(action) => write!(f, "{action}"),
            Self::Dimmer(action) => write!(f, "{action}"),
            Self::Rgb(action) => write!(f, "{action}"),
            Self::CollectiveCommand { command, .. } => write!(f, "collective command {command}"),
            Self::Mode { low, high, .. } => write!(f, "set mode {high} / {low}"),
            Self::Climate(action) => write!(f, "{action}"),
            Self::AmbientLight { duration, .. } => write!(f, "module lighting for {duration} s"),
            Self::Message(action) => write!(f, "{action}"),
            Self::Unrecognized { raw } => {
                write!(f, "unknown action {} / {:?}", raw.code, raw.used_args())
            }
        }
    }
}
