use serde::Deserialize;
use serde_json::Value;

/// Outcome asserted by a gateway notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    Success,
    Failure,
}

/// Gateway-neutral form every webhook payload is normalized into before the
/// shared confirmation logic runs.
#[derive(Debug, Clone)]
pub struct ChargeNotification {
    pub reference: String,
    pub outcome: ChargeOutcome,
    pub gateway_tx_id: Option<String>,
}

/// Current-scheme webhook body.
#[derive(Debug, Deserialize)]
pub struct GatewayEvent {
    pub event: Option<String>,
    #[serde(default)]
    pub data: GatewayEventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct GatewayEventData {
    pub reference: Option<String>,
    pub status: Option<String>,
    pub id: Option<Value>,
    pub transaction: Option<Value>,
}

/// Legacy-scheme webhook body. The reference key appears as either
/// `tx_ref` or `txRef` in the wild, and the status may sit on the event
/// root rather than inside `data`.
#[derive(Debug, Deserialize)]
pub struct LegacyEvent {
    pub status: Option<String>,
    #[serde(default)]
    pub data: LegacyEventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyEventData {
    #[serde(alias = "txRef")]
    pub tx_ref: Option<String>,
    pub status: Option<String>,
    pub id: Option<Value>,
}

/// Tagged union over the gateway payload shapes, so the state-transition
/// logic is written once.
#[derive(Debug)]
pub enum GatewayNotification {
    LegacyV1(LegacyEvent),
    CurrentV2(GatewayEvent),
}

impl GatewayNotification {
    /// Normalizes either payload shape. Returns `None` when the payload
    /// carries no merchant reference; such notifications are acknowledged
    /// and discarded upstream.
    pub fn normalize(self) -> Option<ChargeNotification> {
        match self {
            GatewayNotification::CurrentV2(event) => {
                let reference = event.data.reference?;
                let success = event.event.as_deref() == Some("charge.success")
                    || event.data.status.as_deref() == Some("success");
                let gateway_tx_id = event
                    .data
                    .id
                    .as_ref()
                    .and_then(value_to_string)
                    .or_else(|| event.data.transaction.as_ref().and_then(value_to_string));
                Some(ChargeNotification {
                    reference,
                    outcome: outcome_from(success),
                    gateway_tx_id,
                })
            }
            GatewayNotification::LegacyV1(event) => {
                let reference = event.data.tx_ref?;
                let status = event.data.status.or(event.status);
                let success = matches!(status.as_deref(), Some("successful") | Some("success"));
                let gateway_tx_id = event.data.id.as_ref().and_then(value_to_string);
                Some(ChargeNotification {
                    reference,
                    outcome: outcome_from(success),
                    gateway_tx_id,
                })
            }
        }
    }
}

fn outcome_from(success: bool) -> ChargeOutcome {
    if success {
        ChargeOutcome::Success
    } else {
        ChargeOutcome::Failure
    }
}

/// Gateway transaction ids arrive as JSON numbers or strings.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_success_by_event_name() {
        let event: GatewayEvent = serde_json::from_str(
            r#"{"event":"charge.success","data":{"reference":"TL-1","id":12345}}"#,
        )
        .unwrap();
        let charge = GatewayNotification::CurrentV2(event).normalize().unwrap();
        assert_eq!(charge.reference, "TL-1");
        assert_eq!(charge.outcome, ChargeOutcome::Success);
        assert_eq!(charge.gateway_tx_id.as_deref(), Some("12345"));
    }

    #[test]
    fn current_success_by_data_status() {
        let event: GatewayEvent = serde_json::from_str(
            r#"{"event":"charge.updated","data":{"reference":"TL-1","status":"success","transaction":"tx-9"}}"#,
        )
        .unwrap();
        let charge = GatewayNotification::CurrentV2(event).normalize().unwrap();
        assert_eq!(charge.outcome, ChargeOutcome::Success);
        assert_eq!(charge.gateway_tx_id.as_deref(), Some("tx-9"));
    }

    #[test]
    fn current_non_success_is_failure() {
        let event: GatewayEvent = serde_json::from_str(
            r#"{"event":"charge.failed","data":{"reference":"TL-1","status":"abandoned"}}"#,
        )
        .unwrap();
        let charge = GatewayNotification::CurrentV2(event).normalize().unwrap();
        assert_eq!(charge.outcome, ChargeOutcome::Failure);
    }

    #[test]
    fn current_without_reference_is_discarded() {
        let event: GatewayEvent =
            serde_json::from_str(r#"{"event":"charge.success","data":{}}"#).unwrap();
        assert!(GatewayNotification::CurrentV2(event).normalize().is_none());
    }

    #[test]
    fn legacy_accepts_both_reference_spellings() {
        let snake: LegacyEvent =
            serde_json::from_str(r#"{"data":{"tx_ref":"TL-2","status":"successful"}}"#).unwrap();
        let camel: LegacyEvent =
            serde_json::from_str(r#"{"data":{"txRef":"TL-2","status":"successful"}}"#).unwrap();
        for event in [snake, camel] {
            let charge = GatewayNotification::LegacyV1(event).normalize().unwrap();
            assert_eq!(charge.reference, "TL-2");
            assert_eq!(charge.outcome, ChargeOutcome::Success);
        }
    }

    #[test]
    fn legacy_root_status_is_a_fallback() {
        let event: LegacyEvent =
            serde_json::from_str(r#"{"status":"failed","data":{"tx_ref":"TL-3","id":"77"}}"#)
                .unwrap();
        let charge = GatewayNotification::LegacyV1(event).normalize().unwrap();
        assert_eq!(charge.outcome, ChargeOutcome::Failure);
        assert_eq!(charge.gateway_tx_id.as_deref(), Some("77"));
    }
}
