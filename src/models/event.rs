//! Gateway event and reply models.
//!
//! These types define the structure of events delivered by the API Gateway
//! (or an ELB-style load balancer) and the reply shape it expects back. The
//! single-value/multi-value duality of headers and query parameters is
//! modeled as paired `Option` fields; which header field is present decides
//! the reply shape for the whole invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::headers::Headers;
use crate::models::error::AdapterError;

/// Request event delivered by the gateway.
///
/// `httpMethod`, `path` and `requestContext` are required; everything else is
/// optional and defaults to absent. `pathParameters` and `stageVariables`
/// are carried untouched for pass-through consumers.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub headers: Option<Headers>,
    #[serde(default)]
    pub multi_value_headers: Option<Headers>,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    /// The Tencent event shape carries the single-value query map under this
    /// spelling, sometimes alongside `queryStringParameters`; when both are
    /// present this one wins.
    #[serde(default)]
    pub query_string: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: RequestContext,
    #[serde(default)]
    pub path_parameters: Option<Value>,
    #[serde(default)]
    pub stage_variables: Option<Value>,
}

impl GatewayEvent {
    /// Parses a raw JSON payload into a typed event.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MalformedEvent`] when a required field is
    /// absent or mistyped.
    pub fn from_value(value: &Value) -> Result<Self, AdapterError> {
        Self::deserialize(value).map_err(|e| AdapterError::MalformedEvent(e.to_string()))
    }

    /// Collects the event's headers into one ordered collection, preferring
    /// `multiValueHeaders` when present (even when empty).
    #[must_use]
    pub fn wire_headers(&self) -> Headers {
        match (&self.multi_value_headers, &self.headers) {
            (Some(multi), _) => multi.clone(),
            (None, Some(single)) => single.clone(),
            (None, None) => Headers::default(),
        }
    }

    /// Whether the event used the multi-value header schema. The reply must
    /// mirror this shape.
    #[must_use]
    pub const fn uses_multi_value_headers(&self) -> bool {
        self.multi_value_headers.is_some()
    }
}

/// Request context attached to every gateway event.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub authorizer: Option<Value>,
    #[serde(default)]
    pub elb: Option<Value>,
}

impl RequestContext {
    /// Whether the event came through an ELB-style load balancer, which
    /// requires a `statusDescription` in the reply. Presence alone is not
    /// enough; the marker must be truthy.
    #[must_use]
    pub fn elb_enabled(&self) -> bool {
        self.elb.as_ref().is_some_and(is_truthy)
    }
}

/// Caller identity from the request context.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

/// Reply object returned to the gateway.
///
/// Exactly one of `headers`/`multiValueHeaders` is set, mirroring the event.
/// `body` and `isBase64Encoded` are emitted together and only when the
/// application produced non-empty data.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReply {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_base64_encoded: Option<bool>,
}

/// Loose truthiness: null, false, zero and empty strings/containers do not
/// count as present.
#[allow(clippy::float_cmp)]
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_minimal_event() {
        let event = GatewayEvent::from_value(&json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {}
        }))
        .unwrap();

        assert_eq!(event.http_method, "GET");
        assert_eq!(event.path, "/");
        assert!(!event.is_base64_encoded);
        assert!(!event.uses_multi_value_headers());
    }

    #[test]
    fn test_from_value_missing_path() {
        let result = GatewayEvent::from_value(&json!({
            "httpMethod": "GET",
            "requestContext": {}
        }));

        assert!(matches!(result, Err(AdapterError::MalformedEvent(_))));
    }

    #[test]
    fn test_from_value_missing_request_context() {
        let result = GatewayEvent::from_value(&json!({
            "httpMethod": "GET",
            "path": "/"
        }));

        assert!(matches!(result, Err(AdapterError::MalformedEvent(_))));
    }

    #[test]
    fn test_legacy_query_string_field() {
        let event = GatewayEvent::from_value(&json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {},
            "queryString": {"foo": "bar"}
        }))
        .unwrap();

        let params = event.query_string.unwrap();
        assert_eq!(params.get("foo").map(String::as_str), Some("bar"));
        assert!(event.query_string_parameters.is_none());
    }

    #[test]
    fn test_both_query_field_spellings_accepted() {
        let event = GatewayEvent::from_value(&json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {},
            "queryStringParameters": {"foo": "bar"},
            "queryString": {"foo": "bar", "bob": "alice"}
        }))
        .unwrap();

        assert_eq!(event.query_string_parameters.unwrap().len(), 1);
        assert_eq!(event.query_string.unwrap().len(), 2);
    }

    #[test]
    fn test_elb_truthiness() {
        let truthy = [json!({"x": 1}), json!(true), json!(1), json!("yes")];
        for marker in truthy {
            let ctx = RequestContext {
                elb: Some(marker),
                ..RequestContext::default()
            };
            assert!(ctx.elb_enabled());
        }

        let falsy = [json!(null), json!(false), json!(0), json!(""), json!({})];
        for marker in falsy {
            let ctx = RequestContext {
                elb: Some(marker),
                ..RequestContext::default()
            };
            assert!(!ctx.elb_enabled());
        }

        assert!(!RequestContext::default().elb_enabled());
    }

    #[test]
    fn test_reply_skips_absent_fields() {
        let reply = GatewayReply {
            status_code: 204,
            headers: Some(BTreeMap::new()),
            multi_value_headers: None,
            status_description: None,
            body: None,
            is_base64_encoded: None,
        };

        let serialized = serde_json::to_value(&reply).unwrap();
        assert_eq!(serialized, json!({"statusCode": 204, "headers": {}}));
    }
}
