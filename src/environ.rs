//! The invocation environment handed to the application.
//!
//! Built fresh by the request translator for every event, consumed exactly
//! once by the invoker, then discarded. Nothing here outlives the call.

use lambda_runtime::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Per-invocation request environment.
///
/// String fields follow the CGI naming convention when rendered through
/// [`Environ::vars`]; `http` already holds the `HTTP_`-prefixed header
/// variables. `event`, `context` and `authorizer` are deliberate escape
/// hatches carrying the raw gateway data for applications that need it.
#[derive(Debug)]
pub struct Environ {
    pub request_method: String,
    /// Mount prefix consumed by the gateway's routing layer.
    pub script_name: String,
    /// Percent-decoded request path with the mount prefix removed.
    pub path_info: String,
    pub query_string: String,
    pub content_length: String,
    pub content_type: String,
    pub remote_addr: String,
    /// Principal id from the gateway authorizer, when present.
    pub remote_user: String,
    pub server_name: String,
    pub server_port: String,
    pub server_protocol: String,
    pub url_scheme: String,
    /// Decoded request body, rewindable, positioned at the start.
    pub body: Cursor<Vec<u8>>,
    /// `HTTP_*` header variables (content type and length excluded).
    pub http: BTreeMap<String, String>,
    /// The original gateway event, untouched.
    pub event: Value,
    /// The Lambda invocation context, untouched.
    pub context: Context,
    /// The authorizer mapping from the request context, when present.
    pub authorizer: Option<Value>,
}

impl Environ {
    /// The decoded request body as a byte slice.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.get_ref()
    }

    /// Renders the string-valued environment variables as one map, the way a
    /// CGI-style application would consume them.
    #[must_use]
    pub fn vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("REQUEST_METHOD".to_string(), self.request_method.clone());
        vars.insert("SCRIPT_NAME".to_string(), self.script_name.clone());
        vars.insert("PATH_INFO".to_string(), self.path_info.clone());
        vars.insert("QUERY_STRING".to_string(), self.query_string.clone());
        vars.insert("CONTENT_LENGTH".to_string(), self.content_length.clone());
        vars.insert("CONTENT_TYPE".to_string(), self.content_type.clone());
        vars.insert("REMOTE_ADDR".to_string(), self.remote_addr.clone());
        vars.insert("REMOTE_USER".to_string(), self.remote_user.clone());
        vars.insert("SERVER_NAME".to_string(), self.server_name.clone());
        vars.insert("SERVER_PORT".to_string(), self.server_port.clone());
        vars.insert("SERVER_PROTOCOL".to_string(), self.server_protocol.clone());
        vars.insert("URL_SCHEME".to_string(), self.url_scheme.clone());
        for (key, value) in &self.http {
            vars.insert(key.clone(), value.clone());
        }
        vars
    }
}
