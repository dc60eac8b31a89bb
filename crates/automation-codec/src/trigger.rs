//! Trigger codec
//!
//! Decodes the trigger code, its two argument bytes and the time value into a
//! [`TriggerSpec`]. Decoding is total and lossless: bytes a family does not
//! read travel along as [`SpareTrigger`], and codes outside every family (or
//! family bytes with no meaning, like a counter index below 96) come back as
//! [`TriggerSpec::Unrecognized`] with the original bytes.

use crate::condition::FlagState;
use crate::context::CodecContext;
use crate::error::{check_range, CodecError};
use crate::numeric::{
    analog_from_raw, analog_to_raw, lux_from_raw, lux_to_raw, unpack_counter_threshold,
    CompactCelsius, OperatingMode, COUNTER_SLOTS, COUNTER_THRESHOLD_BASE, COUNTER_THRESHOLD_SPAN,
};
use crate::raw::{RawTrigger, SpareTrigger};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FLAG: u8 = 6;
pub const LOGIC: u8 = 8;
pub const COUNTER: u8 = 9;
pub const OUTPUT: u8 = 10;
pub const POWER_SUPPLY: u8 = 12;
pub const REMOTE_SHORT: u8 = 23;
pub const REMOTE_LONG: u8 = 24;
pub const REMOTE_LONG_RELEASE: u8 = 25;
pub const VISUALIZATION: u8 = 31;
pub const MOVEMENT_INDOOR: u8 = 40;
pub const MOVEMENT_OUTDOOR: u8 = 41;
pub const COLLECTIVE: u8 = 50;
pub const SYSTEM_ERROR: u8 = 101;
pub const MODE_CHANGE: u8 = 137;
pub const DIMMER_BUTTON: u8 = 149;
pub const BUTTON_SHORT: u8 = 150;
pub const BUTTON_LONG: u8 = 151;
pub const SWITCH_ON: u8 = 152;
pub const SWITCH_OFF: u8 = 153;
pub const BUTTON_LONG_RELEASE: u8 = 154;
pub const ACCESS: u8 = 169;
pub const CALENDAR: u8 = 170;
pub const CLIMATE_ANY: u8 = 220;
pub const CLIMATE_INTERNAL: u8 = 221;
pub const CLIMATE_EXTERNAL: u8 = 222;
pub const SYSTEM_ANY: u8 = 249;
pub const DIRECT_COMMAND: u8 = 253;

/// Environmental sensor trigger codes
pub const SENSOR_CODES: [u8; 12] = [201, 202, 203, 204, 205, 213, 214, 215, 216, 217, 218, 219];

const MINUTES_PER_DAY: u16 = 24 * 60;
/// Buttons 1..=8 are module buttons, higher indices are inputs offset by 8
const BUTTON_COUNT: u8 = 8;
const GLOBAL_FLAG_OFFSET: u8 = 32;
const LOGIC_OUTPUT_OFFSET: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPress {
    Short,
    Long,
    LongRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchState {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateSource {
    Any,
    Internal,
    External,
}

/// Demand reported by a climate sensor event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateDemand {
    Heating,
    Cooling,
}

/// What the combined index of a flag trigger (code 6) refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlagSource {
    /// Local flag, index 1..=16
    Local { flag: u8 },
    /// Global flag 1..=16, index 33..=48
    Global { flag: u8 },
    /// Logic unit output 1..=10, index 81..=90
    LogicOutput { output: u8 },
    /// Counter reached a value, index 96..=255 in the counter-threshold packing
    CounterValue { counter: u8, value: u8 },
    /// Any other index, kept as is
    Other { index: u8 },
}

impl FlagSource {
    #[must_use]
    pub fn classify(index: u8) -> Self {
        match index {
            1..=16 => Self::Local { flag: index },
            33..=48 => Self::Global {
                flag: index - GLOBAL_FLAG_OFFSET,
            },
            81..=90 => Self::LogicOutput {
                output: index - LOGIC_OUTPUT_OFFSET,
            },
            _ => match unpack_counter_threshold(index) {
                Some((slot, value)) => Self::CounterValue {
                    counter: slot + 1,
                    value,
                },
                None => Self::Other { index },
            },
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Local { flag } => flag,
            Self::Global { flag } => flag.wrapping_add(GLOBAL_FLAG_OFFSET),
            Self::LogicOutput { output } => output.wrapping_add(LOGIC_OUTPUT_OFFSET),
            Self::CounterValue { counter, value } => counter_threshold_byte(counter, value),
            Self::Other { index } => index,
        }
    }

    fn validate(self) -> Result<(), CodecError> {
        match self {
            Self::Local { flag } | Self::Global { flag } => check_range("flag", flag, 1, 16),
            Self::LogicOutput { output } => check_range("logic output", output, 1, 10),
            Self::CounterValue { counter, value } => check_counter_value(counter, value),
            Self::Other { index } => {
                if Self::classify(index) == self {
                    Ok(())
                } else {
                    Err(CodecError::out_of_range("flag index", index, 0, 95))
                }
            }
        }
    }
}

/// User selector of an access (fingerprint) trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessUser {
    /// Any enrolled user (id 255)
    Any,
    Id(u8),
}

impl AccessUser {
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        if id == CodecContext::ANY_USER {
            Self::Any
        } else {
            Self::Id(id)
        }
    }

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Any => CodecContext::ANY_USER,
            Self::Id(id) => id,
        }
    }
}

/// Light sensor of a movement trigger, selected by the code (40 indoor, 41 outdoor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightSensor {
    Indoor,
    Outdoor,
}

/// Physical quantity measured by an environmental sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorQuantity {
    Temperature,
    Percentage,
    Light,
    Wind,
    Rain,
    Analog,
    Raw,
}

impl SensorQuantity {
    /// Quantity of an environmental sensor code
    #[must_use]
    pub fn of_sensor(code: u8) -> Option<Self> {
        match code {
            201 | 213 => Some(Self::Temperature),
            202 | 215 | 217 => Some(Self::Percentage),
            203 | 216 => Some(Self::Light),
            204 => Some(Self::Wind),
            205 => Some(Self::Rain),
            218 | 219 => Some(Self::Analog),
            214 => Some(Self::Raw),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Percentage => "percentage",
            Self::Light => "light",
            Self::Wind => "wind",
            Self::Rain => "rain",
            Self::Analog => "analog",
            Self::Raw => "raw",
        }
    }
}

/// Threshold pair of an environmental sensor trigger, in physical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "quantity", rename_all = "snake_case")]
pub enum SensorThresholds {
    /// Degrees Celsius in the compact signed form
    Temperature {
        low: CompactCelsius,
        high: CompactCelsius,
    },
    Percentage { low: u8, high: u8 },
    Light { low_lux: u16, high_lux: u16 },
    Wind { low: u8, high: u8 },
    /// Rain sensor selection; the second byte is unused
    Rain { selection: u8 },
    Analog { low_mv: u16, high_mv: u16 },
    Raw { low: u8, high: u8 },
}

impl SensorThresholds {
    /// Temperature thresholds in -67..=127 °C
    pub fn temperature(low: i8, high: i8) -> Result<Self, CodecError> {
        Ok(Self::Temperature {
            low: CompactCelsius::from_celsius(low)?,
            high: CompactCelsius::from_celsius(high)?,
        })
    }

    #[must_use]
    pub fn quantity(self) -> SensorQuantity {
        match self {
            Self::Temperature { .. } => SensorQuantity::Temperature,
            Self::Percentage { .. } => SensorQuantity::Percentage,
            Self::Light { .. } => SensorQuantity::Light,
            Self::Wind { .. } => SensorQuantity::Wind,
            Self::Rain { .. } => SensorQuantity::Rain,
            Self::Analog { .. } => SensorQuantity::Analog,
            Self::Raw { .. } => SensorQuantity::Raw,
        }
    }

    /// Argument bytes the thresholds occupy
    fn used_args(self) -> usize {
        match self {
            Self::Rain { .. } => 1,
            _ => 2,
        }
    }

    fn decode(quantity: SensorQuantity, arg1: u8, arg2: u8) -> Self {
        match quantity {
            SensorQuantity::Temperature => Self::Temperature {
                low: CompactCelsius::from_raw(arg1),
                high: CompactCelsius::from_raw(arg2),
            },
            SensorQuantity::Percentage => Self::Percentage {
                low: arg1,
                high: arg2,
            },
            SensorQuantity::Light => Self::Light {
                low_lux: lux_from_raw(arg1),
                high_lux: lux_from_raw(arg2),
            },
            SensorQuantity::Wind => Self::Wind {
                low: arg1,
                high: arg2,
            },
            SensorQuantity::Rain => Self::Rain { selection: arg1 },
            SensorQuantity::Analog => Self::Analog {
                low_mv: analog_from_raw(arg1),
                high_mv: analog_from_raw(arg2),
            },
            SensorQuantity::Raw => Self::Raw {
                low: arg1,
                high: arg2,
            },
        }
    }

    fn encode(self) -> (u8, u8) {
        let lux = |value: u16| lux_to_raw(value).unwrap_or((value / 10) as u8);
        let analog = |value: u16| analog_to_raw(value).unwrap_or((value / 40) as u8);
        match self {
            Self::Temperature { low, high } => (low.raw(), high.raw()),
            Self::Percentage { low, high } | Self::Wind { low, high } | Self::Raw { low, high } => {
                (low, high)
            }
            Self::Light { low_lux, high_lux } => (lux(low_lux), lux(high_lux)),
            Self::Rain { selection } => (selection, 0),
            Self::Analog { low_mv, high_mv } => (analog(low_mv), analog(high_mv)),
        }
    }

    fn validate(self) -> Result<(), CodecError> {
        match self {
            Self::Percentage { low, high } => {
                check_range("low percentage", low, 0, 100)?;
                check_range("high percentage", high, 0, 100)
            }
            Self::Light { low_lux, high_lux } => {
                check_scaled("low lux", low_lux, lux_to_raw(low_lux), 10)?;
                check_scaled("high lux", high_lux, lux_to_raw(high_lux), 10)
            }
            Self::Analog { low_mv, high_mv } => {
                check_scaled("low millivolts", low_mv, analog_to_raw(low_mv), 40)?;
                check_scaled("high millivolts", high_mv, analog_to_raw(high_mv), 40)
            }
            Self::Temperature { .. } | Self::Wind { .. } | Self::Rain { .. } | Self::Raw { .. } => {
                Ok(())
            }
        }
    }
}

impl fmt::Display for SensorThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature { low, high } => write!(f, "below {low} or above {high}"),
            Self::Percentage { low, high } => write!(f, "below {low} % or above {high} %"),
            Self::Light { low_lux, high_lux } => {
                write!(f, "below {low_lux} lx or above {high_lux} lx")
            }
            Self::Wind { low, high } => write!(f, "below {low} or above {high}"),
            Self::Rain { selection } => write!(f, "selection {selection}"),
            Self::Analog { low_mv, high_mv } => {
                write!(f, "below {low_mv} mV or above {high_mv} mV")
            }
            Self::Raw { low, high } => write!(f, "raw {low} / {high}"),
        }
    }
}

/// System event triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemEvent {
    PowerSupply { state: u8 },
    Error { code: u16 },
    Any,
}

impl SystemEvent {
    fn used_args(self) -> usize {
        match self {
            Self::PowerSupply { .. } => 1,
            Self::Error { .. } => 2,
            Self::Any => 0,
        }
    }
}

/// Decoded trigger.
///
/// `spare` holds the bytes the family does not read, zero in rules written
/// by the configurator. It is left out of JSON when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerSpec {
    Button {
        input: u8,
        press: ButtonPress,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    Switch {
        input: u8,
        state: SwitchState,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    DimmerButton {
        input: u8,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// IR remote code, `arg1 * 256 + arg2`
    Remote {
        code: u16,
        press: ButtonPress,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Output changed; the index sits in `arg1` when on, `arg2` when off
    OutputChange {
        output: u8,
        state: SwitchState,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    ClimateSensor {
        source: ClimateSource,
        demand: ClimateDemand,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    DirectCommand {
        command: u8,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    CollectiveCommand {
        command: u8,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    VisualizationCommand {
        command: u16,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Flag change (code 6)
    Flag {
        source: FlagSource,
        state: FlagState,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Logic output change (code 8)
    Logic {
        output: u8,
        state: FlagState,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    ModeChange {
        group: u8,
        mode: OperatingMode,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Fingerprint access; "any user" has no finger selection and keeps its
    /// finger byte as spare
    Access {
        user: AccessUser,
        finger: Option<u8>,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Movement, optionally only below a light level
    Movement {
        intensity: u8,
        sensor: LightSensor,
        threshold_lux: Option<u16>,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    Sensor {
        sensor: u8,
        thresholds: SensorThresholds,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Counter (1-based) reached a value
    Counter {
        counter: u8,
        value: u8,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    /// Calendar date and time of day; the time travels as minutes since midnight
    Calendar { day: u8, month: u8, time: NaiveTime },
    System {
        event: SystemEvent,
        #[serde(default, skip_serializing_if = "SpareTrigger::is_empty")]
        spare: SpareTrigger,
    },
    Unrecognized { raw: RawTrigger },
}

impl TriggerSpec {
    /// Decode trigger bytes, consulting `ctx` only for diagnostics
    #[must_use]
    pub fn decode(raw: &RawTrigger, ctx: &CodecContext) -> Self {
        let Some(spec) = Self::decode_family(raw) else {
            if is_family_code(raw.code) {
                tracing::debug!(
                    "Trigger {:?} has no meaning in its family, keeping raw bytes",
                    raw
                );
            }
            return Self::Unrecognized { raw: *raw };
        };
        if let Err(e) = spec.check_tables(ctx) {
            tracing::warn!("Trigger '{}' contradicts configuration: {}", spec, e);
        }
        spec
    }

    fn decode_family(raw: &RawTrigger) -> Option<Self> {
        let RawTrigger {
            code,
            arg1,
            arg2,
            time,
        } = *raw;
        let spare = |used| SpareTrigger::collect(raw, used);
        let wide = u16::from_be_bytes([arg1, arg2]);
        let spec = match code {
            BUTTON_SHORT | BUTTON_LONG | BUTTON_LONG_RELEASE => Self::Button {
                input: arg1,
                press: match code {
                    BUTTON_SHORT => ButtonPress::Short,
                    BUTTON_LONG => ButtonPress::Long,
                    _ => ButtonPress::LongRelease,
                },
                spare: spare(1),
            },
            SWITCH_ON | SWITCH_OFF => Self::Switch {
                input: arg1,
                state: if code == SWITCH_ON {
                    SwitchState::On
                } else {
                    SwitchState::Off
                },
                spare: spare(1),
            },
            DIMMER_BUTTON => Self::DimmerButton {
                input: arg1,
                spare: spare(1),
            },
            REMOTE_SHORT | REMOTE_LONG | REMOTE_LONG_RELEASE => Self::Remote {
                code: wide,
                press: match code {
                    REMOTE_SHORT => ButtonPress::Short,
                    REMOTE_LONG => ButtonPress::Long,
                    _ => ButtonPress::LongRelease,
                },
                spare: spare(2),
            },
            OUTPUT => {
                let (output, on, spare) = split_index(raw);
                Self::OutputChange {
                    output,
                    state: if on { SwitchState::On } else { SwitchState::Off },
                    spare,
                }
            }
            CLIMATE_ANY | CLIMATE_INTERNAL | CLIMATE_EXTERNAL => Self::ClimateSensor {
                source: match code {
                    CLIMATE_ANY => ClimateSource::Any,
                    CLIMATE_INTERNAL => ClimateSource::Internal,
                    _ => ClimateSource::External,
                },
                demand: match arg1 {
                    1 => ClimateDemand::Heating,
                    2 => ClimateDemand::Cooling,
                    _ => return None,
                },
                spare: spare(1),
            },
            DIRECT_COMMAND => Self::DirectCommand {
                command: arg1,
                spare: spare(1),
            },
            COLLECTIVE => Self::CollectiveCommand {
                command: arg1,
                spare: spare(1),
            },
            VISUALIZATION => Self::VisualizationCommand {
                command: wide,
                spare: spare(2),
            },
            FLAG => {
                let (index, set, spare) = split_index(raw);
                Self::Flag {
                    source: FlagSource::classify(index),
                    state: FlagState::from_set(set),
                    spare,
                }
            }
            LOGIC => {
                let (output, set, spare) = split_index(raw);
                Self::Logic {
                    output,
                    state: FlagState::from_set(set),
                    spare,
                }
            }
            MODE_CHANGE => Self::ModeChange {
                group: arg1,
                mode: OperatingMode::from_byte(arg2),
                spare: spare(2),
            },
            ACCESS => match AccessUser::from_id(arg1) {
                AccessUser::Any => Self::Access {
                    user: AccessUser::Any,
                    finger: None,
                    spare: spare(1),
                },
                user => Self::Access {
                    user,
                    finger: (arg2 != 0).then_some(arg2),
                    spare: spare(2),
                },
            },
            MOVEMENT_INDOOR | MOVEMENT_OUTDOOR => Self::Movement {
                intensity: arg1,
                sensor: if code == MOVEMENT_INDOOR {
                    LightSensor::Indoor
                } else {
                    LightSensor::Outdoor
                },
                threshold_lux: (arg2 != 0).then(|| lux_from_raw(arg2)),
                spare: spare(2),
            },
            COUNTER => {
                let (slot, value) = unpack_counter_threshold(arg1)?;
                Self::Counter {
                    counter: slot + 1,
                    value,
                    spare: spare(1),
                }
            }
            CALENDAR => Self::Calendar {
                day: arg1,
                month: arg2,
                time: time_from_minutes(time)?,
            },
            POWER_SUPPLY | SYSTEM_ERROR | SYSTEM_ANY => {
                let event = match code {
                    POWER_SUPPLY => SystemEvent::PowerSupply { state: arg1 },
                    SYSTEM_ERROR => SystemEvent::Error { code: wide },
                    _ => SystemEvent::Any,
                };
                Self::System {
                    event,
                    spare: spare(event.used_args()),
                }
            }
            sensor => {
                let thresholds =
                    SensorThresholds::decode(SensorQuantity::of_sensor(sensor)?, arg1, arg2);
                Self::Sensor {
                    sensor,
                    thresholds,
                    spare: spare(thresholds.used_args()),
                }
            }
        };
        Some(spec)
    }

    /// Encode into trigger bytes
    #[must_use]
    pub fn encode(&self) -> RawTrigger {
        let press_code = |press: ButtonPress, codes: [u8; 3]| match press {
            ButtonPress::Short => codes[0],
            ButtonPress::Long => codes[1],
            ButtonPress::LongRelease => codes[2],
        };
        match *self {
            Self::Button {
                input,
                press,
                spare,
            } => spare.fill(
                press_code(press, [BUTTON_SHORT, BUTTON_LONG, BUTTON_LONG_RELEASE]),
                input,
                0,
                1,
            ),
            Self::Switch {
                input,
                state,
                spare,
            } => {
                let code = match state {
                    SwitchState::On => SWITCH_ON,
                    SwitchState::Off => SWITCH_OFF,
                };
                spare.fill(code, input, 0, 1)
            }
            Self::DimmerButton { input, spare } => spare.fill(DIMMER_BUTTON, input, 0, 1),
            Self::Remote { code, press, spare } => {
                let [high, low] = code.to_be_bytes();
                spare.fill(
                    press_code(press, [REMOTE_SHORT, REMOTE_LONG, REMOTE_LONG_RELEASE]),
                    high,
                    low,
                    2,
                )
            }
            Self::OutputChange {
                output,
                state,
                spare,
            } => join_index(OUTPUT, output, state == SwitchState::On, spare),
            Self::ClimateSensor {
                source,
                demand,
                spare,
            } => {
                let code = match source {
                    ClimateSource::Any => CLIMATE_ANY,
                    ClimateSource::Internal => CLIMATE_INTERNAL,
                    ClimateSource::External => CLIMATE_EXTERNAL,
                };
                let demand = match demand {
                    ClimateDemand::Heating => 1,
                    ClimateDemand::Cooling => 2,
                };
                spare.fill(code, demand, 0, 1)
            }
            Self::DirectCommand { command, spare } => spare.fill(DIRECT_COMMAND, command, 0, 1),
            Self::CollectiveCommand { command, spare } => spare.fill(COLLECTIVE, command, 0, 1),
            Self::VisualizationCommand { command, spare } => {
                let [high, low] = command.to_be_bytes();
                spare.fill(VISUALIZATION, high, low, 2)
            }
            Self::Flag {
                source,
                state,
                spare,
            } => join_index(FLAG, source.index(), state == FlagState::Set, spare),
            Self::Logic {
                output,
                state,
                spare,
            } => join_index(LOGIC, output, state == FlagState::Set, spare),
            Self::ModeChange { group, mode, spare } => {
                spare.fill(MODE_CHANGE, group, mode.to_byte(), 2)
            }
            Self::Access {
                user,
                finger,
                spare,
            } => match finger {
                Some(finger) => spare.fill(ACCESS, user.id(), finger, 2),
                None => spare.fill(ACCESS, user.id(), 0, 1),
            },
            Self::Movement {
                intensity,
                sensor,
                threshold_lux,
                spare,
            } => {
                let code = match sensor {
                    LightSensor::Indoor => MOVEMENT_INDOOR,
                    LightSensor::Outdoor => MOVEMENT_OUTDOOR,
                };
                let threshold = threshold_lux.map_or(0, |lux| (lux / 10) as u8);
                spare.fill(code, intensity, threshold, 2)
            }
            Self::Sensor {
                sensor,
                thresholds,
                spare,
            } => {
                let (low, high) = thresholds.encode();
                spare.fill(sensor, low, high, thresholds.used_args())
            }
            Self::Counter {
                counter,
                value,
                spare,
            } => spare.fill(COUNTER, counter_threshold_byte(counter, value), 0, 1),
            Self::Calendar { day, month, time } => RawTrigger {
                code: CALENDAR,
                arg1: day,
                arg2: month,
                time: minutes_from_time(time),
            },
            Self::System { event, spare } => {
                let (code, arg1, arg2) = match event {
                    SystemEvent::PowerSupply { state } => (POWER_SUPPLY, state, 0),
                    SystemEvent::Error { code } => {
                        let [high, low] = code.to_be_bytes();
                        (SYSTEM_ERROR, high, low)
                    }
                    SystemEvent::Any => (SYSTEM_ANY, 0, 0),
                };
                spare.fill(code, arg1, arg2, event.used_args())
            }
            Self::Unrecognized { raw } => raw,
        }
    }

    /// Environmental sensor trigger with thresholds checked against the sensor
    pub fn sensor(sensor: u8, thresholds: SensorThresholds) -> Result<Self, CodecError> {
        let spec = Self::Sensor {
            sensor,
            thresholds,
            spare: SpareTrigger::default(),
        };
        spec.validate(&CodecContext::default())?;
        Ok(spec)
    }

    /// Counter threshold trigger
    pub fn counter(counter: u8, value: u8) -> Result<Self, CodecError> {
        check_counter_value(counter, value)?;
        Ok(Self::Counter {
            counter,
            value,
            spare: SpareTrigger::default(),
        })
    }

    /// Calendar trigger at a whole minute
    pub fn calendar(day: u8, month: u8, time: NaiveTime) -> Result<Self, CodecError> {
        let spec = Self::Calendar { day, month, time };
        spec.validate(&CodecContext::default())?;
        Ok(spec)
    }

    /// Check parameter domains and the configuration tables
    pub fn validate(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        match *self {
            Self::Flag { source, .. } => source.validate()?,
            Self::Access { user, finger, .. } => {
                if let Some(finger) = finger {
                    check_range("finger", finger, 1, 16)?;
                }
                if let AccessUser::Id(id) = user {
                    check_range("user", id, 0, CodecContext::ANY_USER - 1)?;
                }
            }
            Self::Movement {
                threshold_lux: Some(threshold_lux),
                ..
            } => {
                check_scaled("light threshold", threshold_lux, lux_to_raw(threshold_lux), 10)?;
                check_range("light threshold", threshold_lux, 10, 2550)?;
            }
            Self::Sensor {
                sensor, thresholds, ..
            } => {
                let expected =
                    SensorQuantity::of_sensor(sensor).ok_or(CodecError::UnknownSensor(sensor))?;
                if thresholds.quantity() != expected {
                    return Err(CodecError::SensorMismatch {
                        sensor,
                        expected: expected.name(),
                    });
                }
                thresholds.validate()?;
            }
            Self::Counter { counter, value, .. } => check_counter_value(counter, value)?,
            Self::Calendar { day, month, time } => {
                check_range("day", day, 0, 31)?;
                check_range("month", month, 0, 12)?;
                if time.second() != 0 || time.nanosecond() != 0 {
                    return Err(CodecError::InvalidTime(time.to_string()));
                }
            }
            _ => {}
        }
        self.check_tables(ctx)
    }

    fn check_tables(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        match *self {
            Self::Counter { counter, value, .. }
            | Self::Flag {
                source: FlagSource::CounterValue { counter, value },
                ..
            } => ctx.check_counter(counter, value),
            Self::Access {
                user,
                finger: Some(finger),
                ..
            } => ctx.check_finger(user.id(), finger),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

/// Whether a trigger code belongs to a known family
#[must_use]
pub fn is_family_code(code: u8) -> bool {
    matches!(
        code,
        FLAG | LOGIC
            | COUNTER
            | OUTPUT
            | POWER_SUPPLY
            | REMOTE_SHORT..=REMOTE_LONG_RELEASE
            | VISUALIZATION
            | MOVEMENT_INDOOR
            | MOVEMENT_OUTDOOR
            | COLLECTIVE
            | SYSTEM_ERROR
            | MODE_CHANGE
            | DIMMER_BUTTON..=BUTTON_LONG_RELEASE
            | ACCESS
            | CALENDAR
            | CLIMATE_ANY..=CLIMATE_EXTERNAL
            | SYSTEM_ANY
            | DIRECT_COMMAND
    ) || SENSOR_CODES.contains(&code)
}

/// Index and on-state of the output, flag and logic triggers.
///
/// The index sits in `arg1` when on and in `arg2` when off, the other byte
/// being zero. A non-zero `arg2` next to an on-state still counts into the
/// index and is kept as spare.
fn split_index(raw: &RawTrigger) -> (u8, bool, SpareTrigger) {
    let on = raw.arg1 > 0;
    let spare = SpareTrigger::collect(raw, if on { 1 } else { 2 });
    (raw.arg1.wrapping_add(raw.arg2), on, spare)
}

fn join_index(code: u8, index: u8, on: bool, spare: SpareTrigger) -> RawTrigger {
    if on {
        spare.fill(code, index.wrapping_sub(spare.arg2), 0, 1)
    } else {
        spare.fill(code, 0, index, 2)
    }
}

fn counter_threshold_byte(counter: u8, value: u8) -> u8 {
    COUNTER_THRESHOLD_BASE
        .wrapping_add(counter.wrapping_sub(1).wrapping_mul(COUNTER_THRESHOLD_SPAN))
        .wrapping_add(value.wrapping_sub(1))
}

fn check_counter_value(counter: u8, value: u8) -> Result<(), CodecError> {
    check_range("counter", counter, 1, COUNTER_SLOTS)?;
    check_range("counter value", value, 1, COUNTER_THRESHOLD_SPAN)
}

fn check_scaled(
    field: &'static str,
    value: u16,
    raw: Option<u8>,
    step: u16,
) -> Result<(), CodecError> {
    match raw {
        Some(_) => Ok(()),
        None => Err(CodecError::out_of_range(
            field,
            i32::from(value),
            0,
            i32::from(step) * 255,
        )),
    }
}

fn time_from_minutes(minutes: u16) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
}

fn minutes_from_time(time: NaiveTime) -> u16 {
    // hour < 24 and minute < 60, so the sum stays below 1440
    (time.hour() * 60 + time.minute()) as u16
}

fn describe_input(f: &mut fmt::Formatter<'_>, input: u8) -> fmt::Result {
    if input > BUTTON_COUNT {
        write!(f, "input {}", input - BUTTON_COUNT)
    } else {
        write!(f, "button {input}")
    }
}

impl fmt::Display for ButtonPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("short press"),
            Self::Long => f.write_str("long press"),
            Self::LongRelease => f.write_str("long press released"),
        }
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button { input, press, .. } => {
                describe_input(f, *input)?;
                write!(f, " {press}")
            }
            Self::Switch { input, state, .. } => {
                write!(f, "switch ")?;
                describe_input(f, *input)?;
                match state {
                    SwitchState::On => f.write_str(" on"),
                    SwitchState::Off => f.write_str(" off"),
                }
            }
            Self::DimmerButton { input, .. } => {
                write!(f, "dim command on ")?;
                describe_input(f, *input)
            }
            Self::Remote { code, press, .. } => {
                let [high, low] = code.to_be_bytes();
                write!(f, "IR command '{high} | {low}' {press}")
            }
            Self::OutputChange { output, state, .. } => match state {
                SwitchState::On => write!(f, "output {output} switched on"),
                SwitchState::Off => write!(f, "output {output} switched off"),
            },
            Self::ClimateSensor { source, demand, .. } => {
                let source = match source {
                    ClimateSource::Any => "climate sensor",
                    ClimateSource::Internal => "internal climate sensor",
                    ClimateSource::External => "external climate sensor",
                };
                match demand {
                    ClimateDemand::Heating => write!(f, "{source} heating"),
                    ClimateDemand::Cooling => write!(f, "{source} cooling"),
                }
            }
            Self::DirectCommand { command, .. } => write!(f, "direct command {command}"),
            Self::CollectiveCommand { command, .. } => write!(f, "collective event {command}"),
            Self::VisualizationCommand { command, .. } => {
                write!(f, "visualization command {command}")
            }
            Self::Flag { source, state, .. } => match source {
                FlagSource::Local { flag } => write!(f, "local flag {flag} {state}"),
                FlagSource::Global { flag } => write!(f, "global flag {flag} {state}"),
                FlagSource::LogicOutput { output } => write!(f, "logic output {output} {state}"),
                FlagSource::CounterValue { counter, value } => {
                    write!(f, "counter {counter} reached {value}")
                }
                FlagSource::Other { index } => write!(f, "flag index {index} {state}"),
            },
            Self::Logic { output, state, .. } => write!(f, "logic {output} {state}"),
            Self::ModeChange { group, mode, .. } => {
                write!(f, "group {group} changed mode to {mode}")
            }
            Self::Access { user, finger, .. } => {
                match user {
                    AccessUser::Any => write!(f, "access by any user")?,
                    AccessUser::Id(id) => write!(f, "access by user {id}")?,
                }
                match finger {
                    Some(finger) => write!(f, ", finger {finger}"),
                    None => Ok(()),
                }
            }
            Self::Movement {
                intensity,
                sensor,
                threshold_lux,
                ..
            } => {
                write!(f, "movement, intensity {intensity}")?;
                match (sensor, threshold_lux) {
                    (LightSensor::Indoor, Some(lux)) => write!(f, ", indoor light below {lux} lx"),
                    (LightSensor::Outdoor, Some(lux)) => {
                        write!(f, ", outdoor light below {lux} lx")
                    }
                    (_, None) => Ok(()),
                }
            }
            Self::Sensor {
                sensor, thresholds, ..
            } => write!(f, "sensor {sensor} {thresholds}"),
            Self::Counter { counter, value, .. } => {
                write!(f, "counter {counter} reached {value}")
            }
            Self::Calendar { day, month, time } => {
                write!(f, "calendar {day}.{month}. at {}", time.format("%H:%M"))
            }
            Self::System { event, .. } => match event {
                SystemEvent::PowerSupply { state } => write!(f, "power supply state {state}"),
                SystemEvent::Error { code } => write!(f, "system error {code}"),
                SystemEvent::Any => f.write_str("any system event"),
            },
            Self::Unrecognized { raw } => write!(
                f,
                "unknown trigger {} / {} / {}",
                raw.code, raw.arg1, raw.arg2
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AccessUserEntry;

    fn decode(code: u8, arg1: u8, arg2: u8) -> TriggerSpec {
        TriggerSpec::decode(&RawTrigger::new(code, arg1, arg2), &CodecContext::default())
    }

    fn spare_arg2(arg2: u8) -> SpareTrigger {
        SpareTrigger {
            arg2,
            ..SpareTrigger::default()
        }
    }

    #[test]
    fn test_button_and_switch() {
        assert_eq!(
            decode(151, 3, 0),
            TriggerSpec::Button {
                input: 3,
                press: ButtonPress::Long,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(153, 10, 0),
            TriggerSpec::Switch {
                input: 10,
                state: SwitchState::Off,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(decode(153, 10, 0).to_string(), "switch input 2 off");
    }

    #[test]
    fn test_button_keeps_unused_byte() {
        let spec = decode(BUTTON_SHORT, 2, 7);
        assert_eq!(
            spec,
            TriggerSpec::Button {
                input: 2,
                press: ButtonPress::Short,
                spare: spare_arg2(7),
            }
        );
        assert_eq!(spec.encode(), RawTrigger::new(BUTTON_SHORT, 2, 7));
        assert_eq!(spec.to_string(), "button 2 short press");
    }

    #[test]
    fn test_output_change_index_placement() {
        assert_eq!(
            decode(OUTPUT, 5, 0),
            TriggerSpec::OutputChange {
                output: 5,
                state: SwitchState::On,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(OUTPUT, 0, 5),
            TriggerSpec::OutputChange {
                output: 5,
                state: SwitchState::Off,
                spare: SpareTrigger::default(),
            }
        );
        // both bytes set still add up to the index
        let split = decode(OUTPUT, 2, 3);
        assert_eq!(
            split,
            TriggerSpec::OutputChange {
                output: 5,
                state: SwitchState::On,
                spare: spare_arg2(3),
            }
        );
        assert_eq!(split.encode(), RawTrigger::new(OUTPUT, 2, 3));
    }

    #[test]
    fn test_flag_and_logic_split_index() {
        let flag = decode(FLAG, 1, 2);
        assert!(matches!(
            flag,
            TriggerSpec::Flag {
                source: FlagSource::Local { flag: 3 },
                state: FlagState::Set,
                ..
            }
        ));
        assert_eq!(flag.encode(), RawTrigger::new(FLAG, 1, 2));

        let logic = decode(LOGIC, 200, 100);
        assert!(matches!(
            logic,
            TriggerSpec::Logic {
                output: 44,
                state: FlagState::Set,
                ..
            }
        ));
        assert_eq!(logic.encode(), RawTrigger::new(LOGIC, 200, 100));
    }

    #[test]
    fn test_wide_values() {
        assert_eq!(
            decode(VISUALIZATION, 1, 4),
            TriggerSpec::VisualizationCommand {
                command: 260,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(SYSTEM_ERROR, 2, 1),
            TriggerSpec::System {
                event: SystemEvent::Error { code: 513 },
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(REMOTE_LONG_RELEASE, 0, 7),
            TriggerSpec::Remote {
                code: 7,
                press: ButtonPress::LongRelease,
                spare: SpareTrigger::default(),
            }
        );
    }

    #[test]
    fn test_system_any_keeps_both_bytes() {
        let spec = decode(SYSTEM_ANY, 4, 9);
        assert_eq!(
            spec,
            TriggerSpec::System {
                event: SystemEvent::Any,
                spare: SpareTrigger {
                    arg1: 4,
                    arg2: 9,
                    time: 0
                },
            }
        );
        assert_eq!(spec.encode(), RawTrigger::new(SYSTEM_ANY, 4, 9));
    }

    #[test]
    fn test_movement() {
        assert_eq!(
            decode(MOVEMENT_INDOOR, 50, 0),
            TriggerSpec::Movement {
                intensity: 50,
                sensor: LightSensor::Indoor,
                threshold_lux: None,
                spare: SpareTrigger::default(),
            }
        );
        let outdoor = decode(MOVEMENT_OUTDOOR, 50, 12);
        assert_eq!(
            outdoor,
            TriggerSpec::Movement {
                intensity: 50,
                sensor: LightSensor::Outdoor,
                threshold_lux: Some(120),
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            outdoor.to_string(),
            "movement, intensity 50, outdoor light below 120 lx"
        );
    }

    #[test]
    fn test_plain_movement_keeps_code() {
        let spec = decode(MOVEMENT_OUTDOOR, 50, 0);
        assert_eq!(
            spec,
            TriggerSpec::Movement {
                intensity: 50,
                sensor: LightSensor::Outdoor,
                threshold_lux: None,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(spec.encode(), RawTrigger::new(MOVEMENT_OUTDOOR, 50, 0));
        assert_eq!(spec.to_string(), "movement, intensity 50");
    }

    #[test]
    fn test_sensor_thresholds() {
        assert_eq!(
            decode(201, 61, 20),
            TriggerSpec::Sensor {
                sensor: 201,
                thresholds: SensorThresholds::temperature(-67, 20).unwrap(),
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(216, 3, 40),
            TriggerSpec::Sensor {
                sensor: 216,
                thresholds: SensorThresholds::Light {
                    low_lux: 30,
                    high_lux: 400
                },
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(218, 25, 50),
            TriggerSpec::Sensor {
                sensor: 218,
                thresholds: SensorThresholds::Analog {
                    low_mv: 1000,
                    high_mv: 2000
                },
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(205, 1, 1),
            TriggerSpec::Sensor {
                sensor: 205,
                thresholds: SensorThresholds::Rain { selection: 1 },
                spare: spare_arg2(1),
            }
        );
        assert!(!decode(206, 1, 1).is_recognized());
    }

    #[test]
    fn test_temperature_alias_byte_is_kept() {
        // 130 reads as 2 °C, like 2 itself
        let spec = decode(201, 130, 20);
        let TriggerSpec::Sensor {
            thresholds: SensorThresholds::Temperature { low, high },
            ..
        } = spec
        else {
            panic!("unexpected {spec:?}");
        };
        assert_eq!(low.celsius(), 2);
        assert_eq!(low.raw(), 130);
        assert_eq!(high.celsius(), 20);
        assert_eq!(spec.encode(), RawTrigger::new(201, 130, 20));
        assert_ne!(spec, decode(201, 2, 20));
        assert_eq!(spec.to_string(), "sensor 201 below 2 °C or above 20 °C");
        assert!(spec.validate(&CodecContext::default()).is_ok());
    }

    #[test]
    fn test_counter_trigger() {
        assert_eq!(
            decode(COUNTER, 96, 0),
            TriggerSpec::Counter {
                counter: 1,
                value: 1,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(COUNTER, 112, 0),
            TriggerSpec::Counter {
                counter: 2,
                value: 1,
                spare: SpareTrigger::default(),
            }
        );
        assert!(!decode(COUNTER, 95, 0).is_recognized());
    }

    #[test]
    fn test_flag_sources() {
        let source = |index| match decode(FLAG, index, 0) {
            TriggerSpec::Flag { source, .. } => source,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(source(3), FlagSource::Local { flag: 3 });
        assert_eq!(source(35), FlagSource::Global { flag: 3 });
        assert_eq!(source(90), FlagSource::LogicOutput { output: 10 });
        assert_eq!(
            source(111),
            FlagSource::CounterValue {
                counter: 1,
                value: 16
            }
        );
        assert_eq!(source(20), FlagSource::Other { index: 20 });
        assert_eq!(
            decode(FLAG, 0, 3),
            TriggerSpec::Flag {
                source: FlagSource::Local { flag: 3 },
                state: FlagState::Reset,
                spare: SpareTrigger::default(),
            }
        );
    }

    #[test]
    fn test_access_user() {
        assert_eq!(
            decode(ACCESS, 255, 0),
            TriggerSpec::Access {
                user: AccessUser::Any,
                finger: None,
                spare: SpareTrigger::default(),
            }
        );
        assert_eq!(
            decode(ACCESS, 4, 2),
            TriggerSpec::Access {
                user: AccessUser::Id(4),
                finger: Some(2),
                spare: SpareTrigger::default(),
            }
        );
    }

    #[test]
    fn test_any_user_hides_finger() {
        let ctx = CodecContext::new(vec![], vec![AccessUserEntry::new(4, 0b01)]);
        let raw = RawTrigger::new(ACCESS, CodecContext::ANY_USER, 3);
        let spec = TriggerSpec::decode(&raw, &ctx);
        assert_eq!(
            spec,
            TriggerSpec::Access {
                user: AccessUser::Any,
                finger: None,
                spare: spare_arg2(3),
            }
        );
        assert_eq!(spec.encode(), raw);
        assert_eq!(spec.to_string(), "access by any user");
        assert!(spec.validate(&ctx).is_ok());
    }

    #[test]
    fn test_access_tables() {
        let ctx = CodecContext::new(vec![], vec![AccessUserEntry::new(4, 0b01)]);
        let enrolled = TriggerSpec::Access {
            user: AccessUser::Id(4),
            finger: Some(1),
            spare: SpareTrigger::default(),
        };
        let missing = TriggerSpec::Access {
            user: AccessUser::Id(4),
            finger: Some(2),
            spare: SpareTrigger::default(),
        };
        assert!(enrolled.validate(&ctx).is_ok());
        assert_eq!(
            missing.validate(&ctx),
            Err(CodecError::FingerNotEnrolled { user: 4, finger: 2 })
        );
        // decoding still succeeds, the contradiction is only logged
        assert_eq!(TriggerSpec::decode(&missing.encode(), &ctx), missing);
    }

    #[test]
    fn test_calendar_time() {
        let raw = RawTrigger {
            code: CALENDAR,
            arg1: 24,
            arg2: 12,
            time: 18 * 60 + 30,
        };
        let spec = TriggerSpec::decode(&raw, &CodecContext::default());
        assert_eq!(
            spec,
            TriggerSpec::Calendar {
                day: 24,
                month: 12,
                time: NaiveTime::from_hms_opt(18, 30, 0).unwrap()
            }
        );
        assert_eq!(spec.encode(), raw);
        assert_eq!(spec.to_string(), "calendar 24.12. at 18:30");

        let late = RawTrigger { time: 1440, ..raw };
        assert!(!TriggerSpec::decode(&late, &CodecContext::default()).is_recognized());
    }

    #[test]
    fn test_time_kept_outside_calendar() {
        let raw = RawTrigger {
            code: BUTTON_SHORT,
            arg1: 1,
            arg2: 0,
            time: 5,
        };
        let spec = TriggerSpec::decode(&raw, &CodecContext::default());
        assert_eq!(
            spec,
            TriggerSpec::Button {
                input: 1,
                press: ButtonPress::Short,
                spare: SpareTrigger {
                    time: 5,
                    ..SpareTrigger::default()
                },
            }
        );
        assert_eq!(spec.encode(), raw);
    }

    #[test]
    fn test_unknown_code_is_kept() {
        let raw = RawTrigger::new(77, 1, 2);
        let spec = TriggerSpec::decode(&raw, &CodecContext::default());
        assert_eq!(spec, TriggerSpec::Unrecognized { raw });
        assert_eq!(spec.encode(), raw);
    }

    #[test]
    fn test_constructors_validate() {
        assert!(TriggerSpec::counter(11, 1).is_err());
        assert!(TriggerSpec::counter(10, 16).is_ok());
        assert_eq!(
            TriggerSpec::sensor(203, SensorThresholds::Wind { low: 1, high: 2 }),
            Err(CodecError::SensorMismatch {
                sensor: 203,
                expected: "light"
            })
        );
        assert_eq!(
            TriggerSpec::sensor(230, SensorThresholds::Raw { low: 1, high: 2 }),
            Err(CodecError::UnknownSensor(230))
        );
        assert!(SensorThresholds::temperature(-68, 0).is_err());
        let with_seconds = NaiveTime::from_hms_opt(7, 0, 30).unwrap();
        assert!(matches!(
            TriggerSpec::calendar(1, 1, with_seconds),
            Err(CodecError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_serde_shape() {
        let spec = decode(BUTTON_SHORT, 2, 0);
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            serde_json::json!({"type": "button", "input": 2, "press": "short"})
        );
        let spare = decode(BUTTON_SHORT, 2, 7);
        assert_eq!(
            serde_json::to_value(spare).unwrap(),
            serde_json::json!({
                "type": "button",
                "input": 2,
                "press": "short",
                "spare": {"arg1": 0, "arg2": 7, "time": 0}
            })
        );
        let sensor: TriggerSpec = serde_json::from_value(serde_json::json!({
            "type": "sensor",
            "sensor": 201,
            "thresholds": {"quantity": "temperature", "low": -5, "high": {"celsius": 2, "raw": 130}}
        }))
        .unwrap();
        assert_eq!(sensor.encode(), RawTrigger::new(201, 123, 130));
    }
}
