use automation_codec::action::{
    self, counter, cover, switching, ClimateAction, CoverAction, SetPointCircuit,
};
use automation_codec::numeric::{
    u7_to_signed, unpack_counter_threshold, COUNTER_STEP_OFFSET, COUNTER_THRESHOLD_BASE,
};
use automation_codec::trigger::{self, SENSOR_CODES};
use automation_codec::{
    ActionSpec, AutomationRule, CodecContext, ColorPreset, ConditionSpec, OutputTarget, RawAction,
    RawRule, RawTrigger, Rgb, SpareArgs, TriggerSpec,
};
use proptest::prelude::*;

const ACTION_CODES: [u8; 29] = [
    1, 2, 3, 6, 9, 10, 17, 18, 20, 22, 23, 24, 35, 50, 55, 56, 57, 58, 64, 111, 112, 113, 114, 118,
    119, 220, 221, 222, 240,
];

/// Unit and option bytes a timed switching action reads
const TIMER_OPTIONS: [u8; 6] = [1, 2, 11, 12, 21, 22];

fn trigger_codes() -> Vec<u8> {
    let mut codes = vec![
        6, 8, 9, 10, 12, 23, 24, 25, 31, 40, 41, 50, 101, 137, 149, 150, 151, 152, 153, 154, 169,
        170, 220, 221, 222, 249, 253,
    ];
    codes.extend_from_slice(&SENSOR_CODES);
    codes
}

fn raw_rule() -> impl Strategy<Value = RawRule> {
    (
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
        any::<u16>(),
        any::<u8>(),
        any::<u8>(),
        any::<[u8; 6]>(),
    )
        .prop_map(|(code, arg1, arg2, time, condition, action, args)| {
            RawRule::from_parts(code, arg1, arg2, time, condition, action, args)
        })
}

/// Raw rules drawn from the known family codes with small argument values
fn family_rule() -> impl Strategy<Value = RawRule> {
    (
        prop::sample::select(trigger_codes()),
        0u8..=120,
        prop_oneof![Just(0u8), any::<u8>()],
        prop_oneof![Just(0u16), 0u16..1440],
        any::<u8>(),
        prop::sample::select(ACTION_CODES.to_vec()),
        any::<[u8; 3]>(),
    )
        .prop_map(|(code, arg1, arg2, time, condition, action, head)| {
            let args = [head[0], head[1], head[2], 0, 0, 0];
            RawRule::from_parts(code, arg1, arg2, time, condition, action, args)
        })
}

/// Trigger bytes of a known family whose interpreted bytes carry a meaning,
/// all other bytes arbitrary
fn known_trigger() -> impl Strategy<Value = RawTrigger> {
    (
        prop::sample::select(trigger_codes()),
        any::<u8>(),
        any::<u8>(),
        any::<u16>(),
    )
        .prop_map(|(code, mut arg1, arg2, mut time)| {
            match code {
                trigger::COUNTER => arg1 = arg1.max(COUNTER_THRESHOLD_BASE),
                trigger::CLIMATE_ANY..=trigger::CLIMATE_EXTERNAL => arg1 = 1 + arg1 % 2,
                trigger::CALENDAR => time %= 1440,
                _ => {}
            }
            RawTrigger {
                code,
                arg1,
                arg2,
                time,
            }
        })
}

/// Action bytes of a known family whose interpreted bytes carry a meaning,
/// all other bytes arbitrary
fn known_action() -> impl Strategy<Value = RawAction> {
    (
        prop::sample::select(ACTION_CODES.to_vec()),
        any::<[u8; 6]>(),
        prop::sample::select(TIMER_OPTIONS.to_vec()),
    )
        .prop_map(|(code, mut args, option)| {
            match code {
                switching::TIMED => args[0] = option,
                counter::INCREMENT | counter::DECREMENT => {
                    args[0] = args[0].max(code + COUNTER_STEP_OFFSET);
                }
                cover::COVER | cover::COVER_TIMED => args[0] = args[0].min(245),
                _ => {}
            }
            RawAction::new(code, args)
        })
}

proptest! {
    #[test]
    fn known_families_keep_unread_bytes(raw in known_trigger(), action in known_action()) {
        let ctx = CodecContext::default();
        let trigger = TriggerSpec::decode(&raw, &ctx);
        prop_assert!(trigger.is_recognized(), "{:?}", raw);
        prop_assert_eq!(trigger.encode(), raw);

        let spec = ActionSpec::decode(&action, &ctx);
        prop_assert!(spec.is_recognized(), "{:?}", action);
        prop_assert_eq!(spec.encode(), action);
    }

    #[test]
    fn known_families_survive_json(raw in known_trigger(), action in known_action()) {
        let ctx = CodecContext::default();
        let rule = AutomationRule {
            trigger: TriggerSpec::decode(&raw, &ctx),
            condition: ConditionSpec::Always,
            action: ActionSpec::decode(&action, &ctx),
        };
        let json = serde_json::to_string(&rule).unwrap();
        let back: AutomationRule = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, rule);
    }

    #[test]
    fn encode_inverts_decode_for_any_tuple(raw in raw_rule()) {
        let rule = AutomationRule::decode(&raw, &CodecContext::default());
        prop_assert_eq!(rule.encode(), raw);
    }

    #[test]
    fn encode_inverts_decode_for_family_codes(raw in family_rule()) {
        let ctx = CodecContext::default();
        let rule = AutomationRule::decode(&raw, &ctx);
        prop_assert_eq!(rule.encode(), raw);
        // decoding the re-encoded bytes yields the same spec
        prop_assert_eq!(AutomationRule::decode(&rule.encode(), &ctx), rule);
    }

    #[test]
    fn unknown_trigger_codes_are_kept(
        code in any::<u8>().prop_filter("known family", |c| !trigger::is_family_code(*c)),
        arg1 in any::<u8>(),
        arg2 in any::<u8>(),
        time in any::<u16>(),
    ) {
        let raw = RawTrigger { code, arg1, arg2, time };
        let spec = TriggerSpec::decode(&raw, &CodecContext::default());
        prop_assert_eq!(spec, TriggerSpec::Unrecognized { raw });
        prop_assert_eq!(spec.encode(), raw);
    }

    #[test]
    fn unknown_action_codes_are_kept(
        code in any::<u8>().prop_filter("known family", |c| !action::is_family_code(*c)),
        args in any::<[u8; 6]>(),
    ) {
        let raw = RawAction::new(code, args);
        let spec = ActionSpec::decode(&raw, &CodecContext::default());
        prop_assert_eq!(spec, ActionSpec::Unrecognized { raw });
        prop_assert_eq!(spec.encode(), raw);
    }

    #[test]
    fn decoded_rules_survive_json(raw in family_rule()) {
        let rule = AutomationRule::decode(&raw, &CodecContext::default());
        let json = serde_json::to_string(&rule).unwrap();
        let back: AutomationRule = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, rule);
    }

    #[test]
    fn recognized_conditions_validate(code in any::<u8>()) {
        let condition = ConditionSpec::decode(code);
        if condition.is_recognized() {
            prop_assert!(condition.validate().is_ok());
        }
    }
}

#[test]
fn signed_conversion_examples() {
    assert_eq!(u7_to_signed(0), 0);
    assert_eq!(u7_to_signed(60), 60);
    assert_eq!(u7_to_signed(61), -67);
    assert_eq!(u7_to_signed(255), 127);
}

#[test]
fn counter_packing_examples() {
    assert_eq!(unpack_counter_threshold(96), Some((0, 1)));
    assert_eq!(unpack_counter_threshold(111), Some((0, 16)));
    assert_eq!(unpack_counter_threshold(112), Some((1, 1)));
}

#[test]
fn switching_target_buckets() {
    let target = |raw: u8| match ActionSpec::decode(
        &RawAction::new(9, [1, 5, 1, raw, 0, 0]),
        &CodecContext::default(),
    ) {
        ActionSpec::Switching(action) => Some(action.target),
        _ => None,
    };
    for raw in 0..16 {
        assert_eq!(target(raw), Some(OutputTarget::Output(raw)));
    }
    for raw in 16..25 {
        assert_eq!(target(raw), Some(OutputTarget::Led(raw)));
    }
    for raw in 25..33 {
        assert_eq!(target(raw), Some(OutputTarget::Flag(raw - 24)));
    }
    assert_eq!(target(40), Some(OutputTarget::Flag(40)));
}

#[test]
fn rgb_preset_depends_on_target() {
    let decode = |selector| {
        ActionSpec::decode(
            &RawAction::new(35, [1, 0, selector, 255, 0, 0]),
            &CodecContext::default(),
        )
    };
    match decode(1) {
        ActionSpec::Rgb(action) => assert_eq!(action.preset, ColorPreset::Red),
        other => panic!("unexpected {other:?}"),
    }
    match decode(100) {
        ActionSpec::Rgb(action) => assert_eq!(
            action.preset,
            ColorPreset::Custom {
                color: Rgb::new(255, 0, 0)
            }
        ),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn climate_set_point_branches() {
    let decode = |selector| {
        ActionSpec::decode(
            &RawAction::new(220, [selector, 215, 0, 0, 0, 0]),
            &CodecContext::default(),
        )
    };
    assert_eq!(
        decode(25),
        ActionSpec::Climate(ClimateAction::SetPoint {
            circuit: SetPointCircuit::Cooling,
            offset: 5,
            tenths: 215,
            spare: SpareArgs::default()
        })
    );
    assert_eq!(
        decode(5),
        ActionSpec::Climate(ClimateAction::SetPoint {
            circuit: SetPointCircuit::Heating,
            offset: 5,
            tenths: 215,
            spare: SpareArgs::default()
        })
    );
}

#[test]
fn cover_bare_command_sentinel() {
    let raw = RawAction::new(17, [3, 2, 255, 0, 0, 0]);
    let spec = ActionSpec::decode(&raw, &CodecContext::default());
    assert_eq!(
        spec,
        ActionSpec::Cover(CoverAction {
            cover: 2,
            command: 13,
            position: None,
            timed: false,
            spare: SpareArgs::default()
        })
    );
    assert_eq!(spec.encode(), raw);
}

#[test]
fn stray_bytes_in_known_families() {
    let ctx = CodecContext::default();
    let triggers = [
        RawTrigger::new(10, 2, 3),
        RawTrigger::new(41, 50, 0),
        RawTrigger::new(150, 2, 7),
    ];
    for raw in triggers {
        let spec = TriggerSpec::decode(&raw, &ctx);
        assert!(spec.is_recognized(), "{raw:?}");
        assert_eq!(spec.encode(), raw);
    }
    let actions = [
        RawAction::new(35, [2, 0, 1, 255, 0, 0]),
        RawAction::new(22, [3, 50, 0, 0, 0, 0]),
        RawAction::new(6, [3, 0, 7, 0, 0, 0]),
        RawAction::new(1, [27, 0, 0, 0, 0, 0]),
        RawAction::new(17, [3, 2, 255, 0, 0, 9]),
        RawAction::new(220, [25, 215, 1, 0, 0, 0]),
    ];
    for raw in actions {
        let spec = ActionSpec::decode(&raw, &ctx);
        assert!(spec.is_recognized(), "{raw:?}");
        assert_eq!(spec.encode(), raw);
    }
}
