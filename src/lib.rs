//! Protocol adapter for running a synchronous request/response application
//! behind an API Gateway or load-balancer Lambda trigger.
//!
//! The gateway delivers requests as structured JSON events; the application
//! expects a CGI-style request environment and answers with a status, headers
//! and body. [`handler::handle_request`] performs one stateless
//! translate-call-translate cycle per invocation:
//!
//! event → [`request::build_environ`] → [`environ::Environ`] →
//! [`handler::invoke`] → [`response::AppResponse`] →
//! [`response::build_reply`] → reply
//!
//! No state is shared between invocations.

pub mod config;
pub mod environ;
pub mod handler;
pub mod headers;
pub mod models;
pub mod request;
pub mod response;
