//! Request translation: gateway event in, invocation environment out.
//!
//! A pure function of the event, the invocation context and the
//! per-invocation configuration. The input event is never mutated and no
//! state survives the call.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use lambda_runtime::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::config::AdapterConfig;
use crate::environ::Environ;
use crate::headers::Headers;
use crate::models::{AdapterError, GatewayEvent};

/// Host substring identifying requests routed through the gateway's staged
/// domain, which prepends the stage name to the path.
const GATEWAY_HOST_MARKER: &str = "apigw.tencentcs.com";
const DEFAULT_SERVER_NAME: &str = "lambda";

/// Builds the invocation environment for one gateway event.
///
/// `raw_event` is the unparsed payload `event` was read from; it rides along
/// untouched for pass-through consumers.
///
/// # Errors
///
/// Returns [`AdapterError::MalformedEvent`] when the body is flagged as
/// base64 but does not decode, or when the path percent-decodes to invalid
/// UTF-8.
pub fn build_environ(
    event: &GatewayEvent,
    raw_event: Value,
    context: Context,
    config: &AdapterConfig,
) -> Result<Environ, AdapterError> {
    let headers = event.wire_headers();
    let host = headers.get("Host").unwrap_or_default();

    let mut script_name = if host.contains(GATEWAY_HOST_MARKER) && !config.strip_stage_path {
        format!("/{}", event.request_context.stage.as_deref().unwrap_or(""))
    } else {
        String::new()
    };

    let mut path_info = event.path.clone();
    if let Some(base_path) = &config.base_path {
        script_name = format!("/{base_path}");

        if let Some(stripped) = path_info.strip_prefix(&script_name) {
            path_info = if stripped.is_empty() {
                "/".to_string()
            } else {
                stripped.to_string()
            };
        }
    }

    let path_info = urlencoding::decode(&path_info)
        .map_err(|e| AdapterError::MalformedEvent(format!("undecodable path: {e}")))?
        .into_owned();

    let body = decode_body(event)?;

    let authorizer = event.request_context.authorizer.clone();
    let remote_user = authorizer
        .as_ref()
        .and_then(|a| a.get("principalId"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let remote_addr = event
        .request_context
        .identity
        .as_ref()
        .and_then(|identity| identity.source_ip.clone())
        .unwrap_or_default();

    Ok(Environ {
        request_method: event.http_method.clone(),
        script_name,
        path_info,
        query_string: encode_query_string(event),
        content_length: body.len().to_string(),
        content_type: headers.get("Content-Type").unwrap_or_default().to_string(),
        remote_addr,
        remote_user,
        server_name: headers.get("Host").unwrap_or(DEFAULT_SERVER_NAME).to_string(),
        server_port: headers.get("X-Forwarded-Port").unwrap_or("80").to_string(),
        server_protocol: "HTTP/1.1".to_string(),
        url_scheme: headers.get("X-Forwarded-Proto").unwrap_or("http").to_string(),
        body: Cursor::new(body),
        http: http_header_vars(&headers),
        event: raw_event,
        context,
        authorizer,
    })
}

/// Decodes the event body to bytes, honoring the base64 flag.
fn decode_body(event: &GatewayEvent) -> Result<Vec<u8>, AdapterError> {
    let text = event.body.as_deref().unwrap_or_default();
    if event.is_base64_encoded {
        STANDARD
            .decode(text)
            .map_err(|e| AdapterError::MalformedEvent(format!("undecodable base64 body: {e}")))
    } else {
        Ok(text.as_bytes().to_vec())
    }
}

/// Flattens the event's query parameters into one encoded query string.
/// Multi-value parameters win when present and non-empty, then the legacy
/// `queryString` map, then `queryStringParameters`; the order of a key's
/// repeated values is preserved.
fn encode_query_string(event: &GatewayEvent) -> String {
    let mut pairs = Vec::new();
    match &event.multi_value_query_string_parameters {
        Some(multi) if !multi.is_empty() => {
            for (key, values) in multi {
                for value in values {
                    pairs.push(encode_pair(key, value));
                }
            }
        }
        _ => {
            let single = event
                .query_string
                .as_ref()
                .or(event.query_string_parameters.as_ref());
            if let Some(params) = single {
                for (key, value) in params {
                    pairs.push(encode_pair(key, value));
                }
            }
        }
    }
    pairs.join("&")
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Exposes every header as an `HTTP_`-prefixed upper-underscore variable.
/// Content type and length are carried by their own fields instead; a later
/// duplicate value overwrites an earlier one.
fn http_header_vars(headers: &Headers) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for (name, value) in headers {
        let key = format!("HTTP_{}", name.to_uppercase().replace('-', "_"));
        if key != "HTTP_CONTENT_TYPE" && key != "HTTP_CONTENT_LENGTH" {
            vars.insert(key, value.to_string());
        }
    }
    vars
}
