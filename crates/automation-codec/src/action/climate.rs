//! Climate control actions

use crate::error::{check_range, CodecError};
use crate::raw::{RawAction, SpareArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SET_POINT: u8 = 220;
pub const CONTROL_INTERNAL: u8 = 221;
pub const CONTROL_EXTERNAL: u8 = 222;

/// Control selector of the output variants is the code minus this base
const SELECTOR_BASE: u8 = 200;
/// Cooling set-point selectors are the heating ones plus this offset
const COOLING_OFFSET: u8 = 20;
const MODE_FIRST: u8 = 11;
const MODE_LAST: u8 = 14;

const CONTROL_SLOTS: &[usize] = &[1];
const MODE_SLOTS: &[usize] = &[0];
const SET_POINT_SLOTS: &[usize] = &[0, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSensor {
    Internal,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateMode {
    Heating,
    Cooling,
    HeatingAndCooling,
    Off,
}

impl ClimateMode {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            11 => Some(Self::Heating),
            12 => Some(Self::Cooling),
            13 => Some(Self::HeatingAndCooling),
            14 => Some(Self::Off),
            _ => None,
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::Heating => 11,
            Self::Cooling => 12,
            Self::HeatingAndCooling => 13,
            Self::Off => 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPointCircuit {
    /// Selector 1
    Heating,
    /// Selector 2, offset stored above 20
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClimateAction {
    /// Drive an output from a climate sensor (codes 221, 222)
    ControlOutput {
        sensor: ControlSensor,
        output: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    /// Switch the controller mode
    Mode {
        mode: ClimateMode,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
    /// Set-point operation; `offset` selects set (1), temporary set (2) or reset (3)
    SetPoint {
        circuit: SetPointCircuit,
        offset: u8,
        /// Target temperature in tenths of a degree Celsius
        tenths: u8,
        #[serde(default, skip_serializing_if = "SpareArgs::is_empty")]
        spare: SpareArgs,
    },
}

impl ClimateAction {
    pub(super) fn decode(code: u8, args: &[u8; 6]) -> Self {
        if code > SET_POINT {
            let sensor = if code == CONTROL_INTERNAL {
                ControlSensor::Internal
            } else {
                ControlSensor::External
            };
            return Self::ControlOutput {
                sensor,
                output: args[1],
                spare: SpareArgs::collect(args, CONTROL_SLOTS),
            };
        }
        let value = args[0];
        if let Some(mode) = ClimateMode::from_byte(value) {
            return Self::Mode {
                mode,
                spare: SpareArgs::collect(args, MODE_SLOTS),
            };
        }
        let (circuit, offset) = if value > COOLING_OFFSET {
            (SetPointCircuit::Cooling, value - COOLING_OFFSET)
        } else {
            (SetPointCircuit::Heating, value)
        };
        Self::SetPoint {
            circuit,
            offset,
            tenths: args[1],
            spare: SpareArgs::collect(args, SET_POINT_SLOTS),
        }
    }

    pub(super) fn encode(&self) -> RawAction {
        match *self {
            Self::ControlOutput {
                sensor,
                output,
                spare,
            } => {
                let code = match sensor {
                    ControlSensor::Internal => CONTROL_INTERNAL,
                    ControlSensor::External => CONTROL_EXTERNAL,
                };
                RawAction::new(code, spare.fill([0, output, 0, 0, 0, 0], CONTROL_SLOTS))
            }
            Self::Mode { mode, spare } => RawAction::new(
                SET_POINT,
                spare.fill([mode.to_byte(), 0, 0, 0, 0, 0], MODE_SLOTS),
            ),
            Self::SetPoint {
                circuit,
                offset,
                tenths,
                spare,
            } => {
                let selector = match circuit {
                    SetPointCircuit::Heating => offset,
                    SetPointCircuit::Cooling => offset.wrapping_add(COOLING_OFFSET),
                };
                let args = [selector, tenths, 0, 0, 0, 0];
                RawAction::new(SET_POINT, spare.fill(args, SET_POINT_SLOTS))
            }
        }
    }

    /// Control selector: 21/22 for the output variants, 1/2 for set-points,
    /// the raw mode byte for controller modes
    #[must_use]
    pub fn selector(&self) -> u8 {
        match *self {
            Self::ControlOutput { sensor, .. } => {
                let code = match sensor {
                    ControlSensor::Internal => CONTROL_INTERNAL,
                    ControlSensor::External => CONTROL_EXTERNAL,
                };
                code - SELECTOR_BASE
            }
            Self::Mode { mode, .. } => mode.to_byte(),
            Self::SetPoint { circuit, .. } => match circuit {
                SetPointCircuit::Heating => 1,
                SetPointCircuit::Cooling => 2,
            },
        }
    }

    /// Target temperature of a set-point action
    #[must_use]
    pub fn celsius(&self) -> Option<f32> {
        match *self {
            Self::SetPoint { tenths, .. } => Some(f32::from(tenths) / 10.0),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        match *self {
            Self::SetPoint {
                circuit: SetPointCircuit::Heating,
                offset,
                ..
            } => {
                if (MODE_FIRST..=MODE_LAST).contains(&offset) {
                    return Err(CodecError::out_of_range("heating offset", offset, 0, 10));
                }
                check_range("heating offset", offset, 0, COOLING_OFFSET)
            }
            Self::SetPoint {
                circuit: SetPointCircuit::Cooling,
                offset,
                ..
            } => check_range("cooling offset", offset, 1, u8::MAX - COOLING_OFFSET),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ClimateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ControlOutput { sensor, output, .. } => {
                let sensor = match sensor {
                    ControlSensor::Internal => "internal",
                    ControlSensor::External => "external",
                };
                write!(f, "climate control with {sensor} sensor on output {output}")
            }
            Self::Mode { mode, .. } => match mode {
                ClimateMode::Heating => f.write_str("set heating mode"),
                ClimateMode::Cooling => f.write_str("set cooling mode"),
                ClimateMode::HeatingAndCooling => f.write_str("set heating/cooling mode"),
                ClimateMode::Off => f.write_str("switch climate control off"),
            },
            Self::SetPoint {
                circuit, offset, ..
            } => {
                let index = match circuit {
                    SetPointCircuit::Heating => 1,
                    SetPointCircuit::Cooling => 2,
                };
                let celsius = self.celsius().unwrap_or_default();
                match offset {
                    1 => write!(f, "set temperature set-point {index} to {celsius} °C"),
                    2 => write!(
                        f,
                        "set temperature set-point {index} temporarily to {celsius} °C"
                    ),
                    3 => write!(f, "reset temperature set-point {index}"),
                    other => write!(
                        f,
                        "temperature set-point {index}, offset {other}, {celsius} °C"
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_point_branches() {
        let cooling = ClimateAction::decode(SET_POINT, &[25, 215, 0, 0, 0, 0]);
        assert_eq!(
            cooling,
            ClimateAction::SetPoint {
                circuit: SetPointCircuit::Cooling,
                offset: 5,
                tenths: 215,
                spare: SpareArgs::default()
            }
        );
        assert_eq!(cooling.selector(), 2);
        assert_eq!(cooling.celsius(), Some(21.5));

        let heating = ClimateAction::decode(SET_POINT, &[5, 200, 0, 0, 0, 0]);
        assert_eq!(
            heating,
            ClimateAction::SetPoint {
                circuit: SetPointCircuit::Heating,
                offset: 5,
                tenths: 200,
                spare: SpareArgs::default()
            }
        );
        assert_eq!(heating.encode(), RawAction::new(SET_POINT, [5, 200, 0, 0, 0, 0]));
    }

    #[test]
    fn test_mode_pass_through() {
        for byte in 11..=14 {
            let action = ClimateAction::decode(SET_POINT, &[byte, 0, 0, 0, 0, 0]);
            assert!(matches!(action, ClimateAction::Mode { .. }));
            assert_eq!(action.selector(), byte);
        }
        // 15 is outside the exclusive (10, 15) window
        assert!(matches!(
            ClimateAction::decode(SET_POINT, &[15, 0, 0, 0, 0, 0]),
            ClimateAction::SetPoint { circuit: SetPointCircuit::Heating, offset: 15, .. }
        ));
    }

    #[test]
    fn test_control_output() {
        let action = ClimateAction::decode(CONTROL_EXTERNAL, &[0, 6, 0, 0, 0, 0]);
        assert_eq!(
            action,
            ClimateAction::ControlOutput {
                sensor: ControlSensor::External,
                output: 6,
                spare: SpareArgs::default()
            }
        );
        assert_eq!(action.selector(), 22);

        let raw = RawAction::new(CONTROL_INTERNAL, [3, 6, 0, 0, 0, 0]);
        let action = ClimateAction::decode(CONTROL_INTERNAL, &raw.args);
        assert!(matches!(action, ClimateAction::ControlOutput { output: 6, .. }));
        assert_eq!(action.encode(), raw);
    }

    #[test]
    fn test_set_point_keeps_trailing_bytes() {
        let raw = RawAction::new(SET_POINT, [25, 215, 1, 0, 0, 0]);
        let action = ClimateAction::decode(SET_POINT, &raw.args);
        assert_eq!(
            action,
            ClimateAction::SetPoint {
                circuit: SetPointCircuit::Cooling,
                offset: 5,
                tenths: 215,
                spare: SpareArgs([0, 0, 1, 0, 0, 0])
            }
        );
        assert_eq!(action.celsius(), Some(21.5));
        assert_eq!(action.encode(), raw);
    }

    #[test]
    fn test_validate_offsets() {
        let heating = |offset| ClimateAction::SetPoint {
            circuit: SetPointCircuit::Heating,
            offset,
            tenths: 0,
            spare: SpareArgs::default(),
        };
        assert!(heating(3).validate().is_ok());
        assert!(heating(12).validate().is_err());
        assert!(heating(21).validate().is_err());
        let cooling = ClimateAction::SetPoint {
            circuit: SetPointCircuit::Cooling,
            offset: 0,
            tenths: 0,
            spare: SpareArgs::default(),
        };
        assert!(cooling.validate().is_err());
    }

    #[test]
    fn test_display() {
        let action = ClimateAction::decode(SET_POINT, &[22, 180, 0, 0, 0, 0]);
        assert_eq!(
            action.to_string(),
            "set temperature set-point 2 temporarily to 18 °C"
        );
    }
}
