use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    DEFAULT_ITERATIONS, FinancialSnapshot, LifestyleLevel, RetirementGoals, RetirementProjection,
    RiskTolerance, calculate_retirement_with_snapshot,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<CliRiskTolerance> for RiskTolerance {
    fn from(value: CliRiskTolerance) -> Self {
        match value {
            CliRiskTolerance::Conservative => RiskTolerance::Conservative,
            CliRiskTolerance::Moderate => RiskTolerance::Moderate,
            CliRiskTolerance::Aggressive => RiskTolerance::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLifestyleLevel {
    Basic,
    Comfortable,
    Luxury,
}

impl From<CliLifestyleLevel> for LifestyleLevel {
    fn from(value: CliLifestyleLevel) -> Self {
        match value {
            CliLifestyleLevel::Basic => LifestyleLevel::Basic,
            CliLifestyleLevel::Comfortable => LifestyleLevel::Comfortable,
            CliLifestyleLevel::Luxury => LifestyleLevel::Luxury,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<ApiRiskTolerance> for CliRiskTolerance {
    fn from(value: ApiRiskTolerance) -> Self {
        match value {
            ApiRiskTolerance::Conservative => CliRiskTolerance::Conservative,
            ApiRiskTolerance::Moderate => CliRiskTolerance::Moderate,
            ApiRiskTolerance::Aggressive => CliRiskTolerance::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiLifestyleLevel {
    Basic,
    Comfortable,
    Luxury,
}

impl From<ApiLifestyleLevel> for CliLifestyleLevel {
    fn from(value: ApiLifestyleLevel) -> Self {
        match value {
            ApiLifestyleLevel::Basic => CliLifestyleLevel::Basic,
            ApiLifestyleLevel::Comfortable => CliLifestyleLevel::Comfortable,
            ApiLifestyleLevel::Luxury => CliLifestyleLevel::Luxury,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    current_age: Option<u32>,
    target_retirement_age: Option<u32>,
    desired_monthly_income: Option<f64>,
    inflation_rate: Option<f64>,
    expected_return: Option<f64>,
    risk_tolerance: Option<ApiRiskTolerance>,
    lifestyle_level: Option<ApiLifestyleLevel>,
    region: Option<String>,
    current_savings: Option<f64>,
    iterations: Option<u32>,
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Retirement readiness projection (compounding gap analysis + Monte Carlo risk bands)"
)]
struct Cli {
    #[arg(long, default_value_t = 35)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    target_retirement_age: u32,
    #[arg(
        long,
        default_value_t = 5000.0,
        help = "Desired retirement income per month in today's purchasing power"
    )]
    desired_monthly_income: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual portfolio return in percent, before tax drag"
    )]
    expected_return: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliRiskTolerance::Moderate,
        help = "Sets the simulated return volatility band"
    )]
    risk_tolerance: CliRiskTolerance,
    #[arg(long, value_enum, default_value_t = CliLifestyleLevel::Comfortable)]
    lifestyle_level: CliLifestyleLevel,
    #[arg(
        long,
        default_value = "US",
        help = "Region code for inflation/tax adjustment; unknown codes use US"
    )]
    region: String,
    #[arg(
        long,
        default_value_t = 50_000.0,
        help = "Sum of all retirement-account balances today"
    )]
    current_savings: f64,
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug)]
struct ProjectionRequest {
    goals: RetirementGoals,
    snapshot: FinancialSnapshot,
    iterations: u32,
    seed: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    seed: u64,
    iterations: u32,
    region: String,
    projection: RetirementProjection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_request(cli: Cli) -> Result<ProjectionRequest, String> {
    if cli.target_retirement_age <= cli.current_age {
        return Err("--target-retirement-age must be > --current-age".to_string());
    }

    if !cli.desired_monthly_income.is_finite() || cli.desired_monthly_income <= 0.0 {
        return Err("--desired-monthly-income must be > 0".to_string());
    }

    if !(0.0..100.0).contains(&cli.inflation_rate) {
        return Err("--inflation-rate must be in [0, 100)".to_string());
    }

    if !(0.0..100.0).contains(&cli.expected_return) {
        return Err("--expected-return must be in [0, 100)".to_string());
    }

    if !cli.current_savings.is_finite() || cli.current_savings < 0.0 {
        return Err("--current-savings must be >= 0".to_string());
    }

    if cli.iterations == 0 {
        return Err("--iterations must be > 0".to_string());
    }

    Ok(ProjectionRequest {
        goals: RetirementGoals {
            current_age: cli.current_age,
            target_retirement_age: cli.target_retirement_age,
            desired_monthly_income: cli.desired_monthly_income,
            inflation_rate: cli.inflation_rate,
            expected_return: cli.expected_return,
            risk_tolerance: cli.risk_tolerance.into(),
            lifestyle_level: cli.lifestyle_level.into(),
            region: cli.region,
        },
        snapshot: FinancialSnapshot {
            current_retirement_savings: cli.current_savings,
        },
        iterations: cli.iterations,
        seed: cli.seed,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("nestegg HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/projection");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    let request = match request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let projection = match calculate_retirement_with_snapshot(
        &request.goals,
        request.snapshot,
        request.iterations,
        request.seed,
    ) {
        Ok(projection) => projection,
        Err(e) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };

    let response = ProjectionResponse {
        seed: request.seed,
        iterations: request.iterations,
        region: request.goals.region,
        projection,
    };
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn request_from_json(json: &str) -> Result<ProjectionRequest, String> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    request_from_payload(payload)
}

fn request_from_payload(payload: ProjectionPayload) -> Result<ProjectionRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.target_retirement_age {
        cli.target_retirement_age = v;
    }
    if let Some(v) = payload.desired_monthly_income {
        cli.desired_monthly_income = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.expected_return {
        cli.expected_return = v;
    }
    if let Some(v) = payload.risk_tolerance {
        cli.risk_tolerance = v.into();
    }
    if let Some(v) = payload.lifestyle_level {
        cli.lifestyle_level = v.into();
    }
    if let Some(v) = payload.region {
        cli.region = v;
    }
    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }
    if let Some(v) = payload.iterations {
        cli.iterations = v;
    }
    if let Some(v) = payload.seed {
        cli.seed = v;
    }

    build_request(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: 35,
        target_retirement_age: 65,
        desired_monthly_income: 5_000.0,
        inflation_rate: 3.0,
        expected_return: 7.0,
        risk_tolerance: CliRiskTolerance::Moderate,
        lifestyle_level: CliLifestyleLevel::Comfortable,
        region: "US".to_string(),
        current_savings: 50_000.0,
        iterations: DEFAULT_ITERATIONS,
        seed: 42,
    }
}
