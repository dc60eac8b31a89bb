//! Rule decode/encode handlers

use crate::{ApiResponse, AppState};
use automation_codec::{AutomationRule, RawRule};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// System info response
#[derive(Serialize)]
struct SystemInfo {
    name: String,
    version: String,
}

/// Decoded rule with its human-readable summary
#[derive(Serialize)]
struct DecodedRule {
    rule: AutomationRule,
    description: String,
    recognized: bool,
}

/// Get system info
pub(crate) async fn system_info() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(SystemInfo {
            name: "Configurator API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })),
    )
}

/// Get the loaded counter and access user tables
pub(crate) async fn get_context(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::OK, Json(ApiResponse::success(&*state.ctx)))
}

/// Decode a raw tuple read from a device
pub(crate) async fn decode_rule(
    State(state): State<AppState>,
    Json(raw): Json<RawRule>,
) -> (StatusCode, Json<ApiResponse>) {
    let rule = AutomationRule::decode(&raw, &state.ctx);
    let recognized = rule.is_fully_recognized();
    if !recognized {
        tracing::debug!("Rule {:?} decoded with unrecognized parts", raw);
    }
    (
        StatusCode::OK,
        Json(ApiResponse::success(DecodedRule {
            rule,
            description: rule.to_string(),
            recognized,
        })),
    )
}

/// Validate an edited rule and encode it for the device
pub(crate) async fn encode_rule(
    State(state): State<AppState>,
    Json(rule): Json<AutomationRule>,
) -> (StatusCode, Json<ApiResponse>) {
    match rule.validate(&state.ctx) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(rule.encode()))),
        Err(e) => {
            tracing::warn!("Rejected rule \"{}\": {}", rule, e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automation_codec::{ActionSpec, CodecContext, ConditionSpec, TriggerSpec};
    use std::sync::Arc;

    fn state(ctx: CodecContext) -> State<AppState> {
        State(AppState { ctx: Arc::new(ctx) })
    }

    #[tokio::test]
    async fn test_system_info() {
        let (status, Json(body)) = system_info().await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        let data = body.data.unwrap();
        assert_eq!(data["name"], "Configurator API");
        assert_eq!(data["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_get_context() {
        let (status, Json(body)) = get_context(state(CodecContext::new(vec![7], vec![]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.unwrap()["counter_limits"], serde_json::json!([7]));
    }

    #[tokio::test]
    async fn test_decode_rule() {
        let raw = RawRule::from_parts(150, 2, 0, 0, 161, 1, [5, 0, 0, 0, 0, 0]);
        let (status, Json(body)) = decode_rule(state(CodecContext::default()), Json(raw)).await;
        assert_eq!(status, StatusCode::OK);
        let data = body.data.unwrap();
        assert_eq!(data["recognized"], true);
        assert_eq!(
            data["description"],
            "when button 2 short press, at 1 h: switch output 5 on"
        );
        assert_eq!(data["rule"]["trigger"]["type"], "button");
    }

    #[tokio::test]
    async fn test_decode_keeps_unknown_codes() {
        let raw = RawRule::from_parts(2, 9, 9, 0, 0, 250, [1, 2, 3, 4, 5, 6]);
        let (_, Json(body)) = decode_rule(state(CodecContext::default()), Json(raw)).await;
        let data = body.data.unwrap();
        assert_eq!(data["recognized"], false);
        let rule: AutomationRule = serde_json::from_value(data["rule"].clone()).unwrap();
        assert_eq!(rule.encode(), raw);
    }

    #[tokio::test]
    async fn test_encode_rule() {
        let rule = AutomationRule::decode(
            &RawRule::from_parts(149, 1, 0, 0, 0, 240, [5, 0, 0, 0, 0, 0]),
            &CodecContext::default(),
        );
        let (status, Json(body)) = encode_rule(state(CodecContext::default()), Json(rule)).await;
        assert_eq!(status, StatusCode::OK);
        let raw: RawRule = serde_json::from_value(body.data.unwrap()).unwrap();
        assert_eq!(raw, rule.encode());
    }

    #[tokio::test]
    async fn test_encode_rejects_counter_above_limit() {
        let rule = AutomationRule {
            trigger: TriggerSpec::Counter {
                counter: 1,
                value: 9,
                spare: Default::default(),
            },
            condition: ConditionSpec::Always,
            action: ActionSpec::AmbientLight {
                duration: 1,
                spare: Default::default(),
            },
        };
        let (status, Json(body)) =
            encode_rule(state(CodecContext::new(vec![5], vec![])), Json(rule)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.success);
        assert_eq!(
            body.error.as_deref(),
            Some("Counter 1 value 9 exceeds maximum 5")
        );
    }
}
