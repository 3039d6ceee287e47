use anyhow::Result;
use apigw_adapter::environ::Environ;
use apigw_adapter::handler::handle_request;
use apigw_adapter::headers::Headers;
use apigw_adapter::response::AppResponse;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;

/// Built-in demo application; replace with the real handler when embedding
/// the adapter.
fn echo_app(environ: Environ) -> Result<AppResponse> {
    let mut headers = Headers::new();
    headers.add("Content-Type", "application/json");

    let body = serde_json::to_vec(&serde_json::json!({
        "method": environ.request_method,
        "path": environ.path_info,
        "query": environ.query_string,
    }))?;

    Ok(AppResponse::new(200, headers, body))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| async move {
        let (payload, context) = event.into_parts();
        let reply = handle_request(&echo_app, &payload, &context)?;
        Ok::<Value, Error>(serde_json::to_value(reply)?)
    }))
    .await
}
