//! Automation rule codec for Habitron-style building controllers
//!
//! Translates the compact device encoding of an automation rule (trigger
//! byte with two argument bytes and a time value, condition byte, action
//! byte with six argument bytes) to and from strongly typed specs.

pub mod action;
pub mod color;
pub mod condition;
pub mod context;
pub mod error;
pub mod numeric;
pub mod raw;
pub mod rule;
pub mod trigger;

pub use action::ActionSpec;
pub use color::{ColorPreset, Rgb, RgbTarget};
pub use condition::{ConditionSpec, FlagState};
pub use context::{AccessUserEntry, CodecContext};
pub use error::CodecError;
pub use numeric::{CompactCelsius, OperatingMode, OutputAddressing, OutputTarget};
pub use raw::{RawAction, RawRule, RawTrigger, SpareArgs, SpareTrigger};
pub use rule::AutomationRule;
pub use trigger::TriggerSpec;
