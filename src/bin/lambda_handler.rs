//! AWS Lambda handler for savings plans
//!
//! Accepts a plan request as JSON and returns the projection ledger, goal
//! status and enriched recommendations. Supports Lambda Function URLs for
//! direct HTTP access. Configuration comes from the environment (see
//! `PlannerConfig::from_env`).

use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use savings_planner::{PlanReport, PlanRequest, PlanRunner, PlannerConfig, PlannerError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PlanResponse {
    #[serde(flatten)]
    report: PlanReport,
    execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn with_cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    let text = serde_json::to_string(body)?;
    Ok(with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(text))?)
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, &ErrorBody { error: message })
}

fn status_for(error: &PlannerError) -> u16 {
    match error {
        PlannerError::InvalidParameter { .. } => 400,
        PlannerError::ExternalSource { .. } | PlannerError::PriceSourceSetup(_) => 502,
        _ => 500,
    }
}

/// Lambda handler function
async fn handler(runner: Arc<PlanRunner>, event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(with_cors(Response::builder()).status(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: PlanRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {e}")),
    };

    // Price lookups block, keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || runner.run(&request)).await?;

    match outcome {
        Ok(report) => json_response(
            200,
            &PlanResponse {
                report,
                execution_time_ms: start.elapsed().as_millis() as u64,
            },
        ),
        Err(e) => {
            log::warn!("plan request failed: {e}");
            error_response(status_for(&e), &e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = PlannerConfig::from_env();
    // The blocking HTTP client must be built outside the async context
    let runner = tokio::task::spawn_blocking(move || PlanRunner::from_config(&config)).await??;
    let runner = Arc::new(runner);

    run(service_fn(move |event: Request| {
        let runner = Arc::clone(&runner);
        async move { handler(runner, event).await }
    }))
    .await
}
