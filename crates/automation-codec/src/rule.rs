//! Complete automation rule

use crate::action::ActionSpec;
use crate::condition::ConditionSpec;
use crate::context::CodecContext;
use crate::error::CodecError;
use crate::raw::RawRule;
use crate::trigger::TriggerSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger, condition and action of one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutomationRule {
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub condition: ConditionSpec,
    pub action: ActionSpec,
}

impl AutomationRule {
    /// Build a rule, rejecting parameters outside their domains
    pub fn new(
        trigger: TriggerSpec,
        condition: ConditionSpec,
        action: ActionSpec,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let rule = Self {
            trigger,
            condition,
            action,
        };
        rule.validate(ctx)?;
        Ok(rule)
    }

    /// Decode each slice of the raw rule independently
    #[must_use]
    pub fn decode(raw: &RawRule, ctx: &CodecContext) -> Self {
        Self {
            trigger: TriggerSpec::decode(&raw.trigger, ctx),
            condition: ConditionSpec::decode(raw.condition),
            action: ActionSpec::decode(&raw.action, ctx),
        }
    }

    #[must_use]
    pub fn encode(&self) -> RawRule {
        RawRule {
            trigger: self.trigger.encode(),
            condition: self.condition.encode(),
            action: self.action.encode(),
        }
    }

    pub fn validate(&self, ctx: &CodecContext) -> Result<(), CodecError> {
        self.trigger.validate(ctx)?;
        self.condition.validate()?;
        self.action.validate(ctx)
    }

    /// Whether trigger, condition and action all decoded into a known family
    #[must_use]
    pub fn is_fully_recognized(&self) -> bool {
        self.trigger.is_recognized() && self.condition.is_recognized() && self.action.is_recognized()
    }
}

impl fmt::Display for AutomationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition {
            ConditionSpec::Always => write!(f, "when {}: {}", self.trigger, self.action),
            condition => write!(f, "when {}, {}: {}", self.trigger, condition, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawAction, RawTrigger};

    #[test]
    fn test_decode_composes_slices() {
        let raw = RawRule::from_parts(150, 2, 0, 0, 161, 1, [5, 0, 0, 0, 0, 0]);
        let rule = AutomationRule::decode(&raw, &CodecContext::default());
        assert!(rule.is_fully_recognized());
        assert_eq!(rule.condition, ConditionSpec::TimeWindow { hour: 1 });
        assert_eq!(rule.encode(), raw);
        assert_eq!(
            rule.to_string(),
            "when button 2 short press, at 1 h: switch output 5 on"
        );
    }

    #[test]
    fn test_partially_unrecognized() {
        let raw = RawRule {
            trigger: RawTrigger::new(2, 0, 0),
            condition: 0,
            action: RawAction::new(240, [10, 0, 0, 0, 0, 0]),
        };
        let rule = AutomationRule::decode(&raw, &CodecContext::default());
        assert!(!rule.is_fully_recognized());
        assert!(rule.action.is_recognized());
        assert_eq!(rule.encode(), raw);
    }

    #[test]
    fn test_new_checks_tables() {
        let ctx = CodecContext::new(vec![5], vec![]);
        let trigger = TriggerSpec::Counter {
            counter: 1,
            value: 6,
            spare: Default::default(),
        };
        let action = ActionSpec::AmbientLight {
            duration: 10,
            spare: Default::default(),
        };
        assert_eq!(
            AutomationRule::new(trigger, ConditionSpec::Always, action, &ctx),
            Err(CodecError::CounterLimit {
                counter: 1,
                value: 6,
                max: 5
            })
        );
        assert!(
            AutomationRule::new(trigger, ConditionSpec::Always, action, &CodecContext::default())
                .is_ok()
        );
    }

    #[test]
    fn test_condition_defaults_in_json() {
        let rule: AutomationRule = serde_json::from_value(serde_json::json!({
            "trigger": {"type": "dimmer_button", "input": 1},
            "action": {"family": "ambient_light", "duration": 5}
        }))
        .unwrap();
        assert_eq!(rule.condition, ConditionSpec::Always);
        assert_eq!(
            rule.encode(),
            RawRule::from_parts(149, 1, 0, 0, 0, 240, [5, 0, 0, 0, 0, 0])
        );
    }
}
