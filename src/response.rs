//! Response translation: application response in, gateway reply out.
//!
//! The reply's header shape mirrors whichever shape the event arrived with,
//! and load-balancer events additionally get a `statusDescription`. Body
//! text-vs-binary is decided by mimetype and compression.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::headers::{Headers, group_headers, split_headers};
use crate::models::{AdapterError, GatewayEvent, GatewayReply};

/// Mimetypes delivered as literal text besides `text/*`.
const TEXT_MIME_TYPES: [&str; 5] = [
    "application/json",
    "application/javascript",
    "application/xml",
    "application/vnd.api+json",
    "image/svg+xml",
];

const DEFAULT_MIMETYPE: &str = "text/plain";

/// Response produced by the application for one invocation. Immutable once
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Media type sans parameters, lowercased; drives the reply's
    /// text-vs-binary body encoding.
    pub mimetype: String,
}

impl AppResponse {
    /// Builds a response, deriving the mimetype from the `Content-Type`
    /// header (parameters dropped, `text/plain` when absent).
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: Vec<u8>) -> Self {
        let mimetype = headers
            .get("Content-Type")
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIMETYPE)
            .to_ascii_lowercase();
        Self {
            status,
            headers,
            body,
            mimetype,
        }
    }
}

/// Which header schema the event used, and therefore which one the reply
/// must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    Single,
    Multi,
}

/// Reply-shape decisions resolved once from the event and carried through
/// the whole invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyShape {
    pub header_mode: HeaderMode,
    /// Load-balancer events require a status description.
    pub load_balancer: bool,
}

impl ReplyShape {
    #[must_use]
    pub fn from_event(event: &GatewayEvent) -> Self {
        Self {
            header_mode: if event.uses_multi_value_headers() {
                HeaderMode::Multi
            } else {
                HeaderMode::Single
            },
            load_balancer: event.request_context.elb_enabled(),
        }
    }
}

/// Translates an application response into the gateway's reply schema.
///
/// # Errors
///
/// Returns [`AdapterError::UnknownStatusCode`] when a status description is
/// required but the status code has no canonical reason phrase.
pub fn build_reply(response: &AppResponse, shape: ReplyShape) -> Result<GatewayReply, AdapterError> {
    let mut reply = GatewayReply {
        status_code: response.status,
        headers: None,
        multi_value_headers: None,
        status_description: None,
        body: None,
        is_base64_encoded: None,
    };

    match shape.header_mode {
        HeaderMode::Multi => reply.multi_value_headers = Some(group_headers(&response.headers)),
        HeaderMode::Single => reply.headers = Some(split_headers(&response.headers)),
    }

    if shape.load_balancer {
        let status = response.status;
        let reason = reason_phrase(status)?;
        reply.status_description = Some(format!("{status} {reason}"));
    }

    if !response.body.is_empty() {
        let compressed = response
            .headers
            .get("Content-Encoding")
            .is_some_and(|encoding| !encoding.is_empty());

        if is_text_mimetype(&response.mimetype) && !compressed {
            match String::from_utf8(response.body.clone()) {
                Ok(text) => {
                    reply.body = Some(text);
                    reply.is_base64_encoded = Some(false);
                }
                // A text mimetype over non-UTF-8 bytes still needs a
                // faithful isBase64Encoded flag
                Err(_) => {
                    reply.body = Some(STANDARD.encode(&response.body));
                    reply.is_base64_encoded = Some(true);
                }
            }
        } else {
            reply.body = Some(STANDARD.encode(&response.body));
            reply.is_base64_encoded = Some(true);
        }
    }

    Ok(reply)
}

fn is_text_mimetype(mimetype: &str) -> bool {
    mimetype.starts_with("text/") || TEXT_MIME_TYPES.contains(&mimetype)
}

fn reason_phrase(status: u16) -> Result<&'static str, AdapterError> {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .ok_or(AdapterError::UnknownStatusCode(status))
}
