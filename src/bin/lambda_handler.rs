//! AWS Lambda handler for heat pump incentive calculations
//!
//! Accepts a household profile as JSON and returns the full calculation result.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use heat_pump_incentives::validation::{validate_postal_code, ValidationOutcome};
use heat_pump_incentives::{CalculationResult, CalculatorConfig, HouseholdProfile, RebateCalculator};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Request body: the questionnaire answers plus optional settings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub profile: HouseholdProfile,

    /// Year to measure the mandate deadline from (default: current year)
    #[serde(default)]
    pub as_of_year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub result: CalculationResult,
    /// Advisory zip check; the result is still computed when invalid
    pub postal_code: ValidationOutcome,
    pub execution_time_ms: u64,
}

/// Function URL response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Methods".to_string(), "POST, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers".to_string(), "Content-Type".to_string()),
    ])
}

fn error_response(status: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code: status,
        headers: cors_headers(),
        body: serde_json::json!({ "error": message }).to_string(),
    }
}

fn json_response(body: &CalculateResponse) -> HttpResponse {
    match serde_json::to_string(body) {
        Ok(body) => HttpResponse {
            status_code: 200,
            headers: cors_headers(),
            body,
        },
        Err(e) => error_response(500, &format!("Failed to serialize response: {}", e)),
    }
}

fn handle(request: CalculateRequest) -> CalculateResponse {
    let start = Instant::now();

    let config = match request.as_of_year {
        Some(year) => CalculatorConfig::for_year(year),
        None => CalculatorConfig::default(),
    };
    let calculator = RebateCalculator::builtin(config);

    let postal_code = validate_postal_code(&request.profile.postal_code);
    let result = calculator.compute_rebates(&request.profile);

    CalculateResponse {
        result,
        postal_code,
        execution_time_ms: start.elapsed().as_millis() as u64,
    }
}

/// Route one Function URL request to a response
fn respond(request: LambdaFunctionUrlRequest) -> HttpResponse {
    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return HttpResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        };
    }

    let body = request.body.unwrap_or_default();
    let parsed: CalculateRequest = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Rejected request body: {}", e);
            return error_response(400, &format!("Invalid request: {}", e));
        }
    };

    let response = handle(parsed);
    info!(
        "Calculated {} in {}ms: total incentives {}",
        response.result.location_data.state,
        response.execution_time_ms,
        response.result.total_incentives
    );

    json_response(&response)
}

async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<HttpResponse, Error> {
    Ok(respond(event.payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_questionnaire_json() {
        let body = r#"{
            "zipCode": "21201",
            "homeType": "single-family",
            "currentHeating": "gas-furnace",
            "systemAge": "20+",
            "incomeBracket": "low",
            "asOfYear": 2025
        }"#;
        let request: CalculateRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.as_of_year, Some(2025));

        let response = handle(request);
        assert!(response.postal_code.valid);
        assert_eq!(response.result.total_incentives, 13_000.0);
        assert_eq!(response.result.risk_assessment.years_until_mandate, 4);
    }

    #[test]
    fn test_unsupported_zip_still_computes() {
        let request: CalculateRequest = serde_json::from_str(r#"{"zipCode": "00000"}"#).unwrap();
        let response = handle(request);
        assert!(!response.postal_code.valid);
        assert!(!response.result.location_data.resolved);
    }

    fn url_request(method: &str, body: Option<&str>) -> LambdaFunctionUrlRequest {
        let mut request = LambdaFunctionUrlRequest::default();
        request.request_context.http.method = Some(method.to_string());
        request.body = body.map(str::to_string);
        request
    }

    #[test]
    fn test_preflight_returns_empty_ok() {
        let response = respond(url_request("OPTIONS", Some("not json")));
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[test]
    fn test_post_returns_result() {
        let body = r#"{"zipCode": "21201", "homeType": "single-family", "currentHeating": "gas-furnace",
            "systemAge": "20+", "incomeBracket": "low", "asOfYear": 2025}"#;
        let response = respond(url_request("POST", Some(body)));
        assert_eq!(response.status_code, 200);

        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json["result"]["totalIncentives"], 13000.0);
        assert_eq!(json["postalCode"]["valid"], true);
    }

    #[test]
    fn test_bad_body_is_rejected() {
        let response = respond(url_request("POST", Some("{\"zipCode\": ")));
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("Invalid request"));
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_missing_body_is_rejected() {
        let response = respond(url_request("POST", None));
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn test_error_response_has_cors() {
        let response = error_response(400, "bad");
        assert_eq!(response.status_code, 400);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert!(response.body.contains("bad"));
    }
}
