use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    DEFAULT_MAX_CHART_POINTS, SimulationInput, SimulationResult, SimulationSummary, downsample,
    parse_currency, results_to_csv, simulate, simulation_end_age, summarize,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const EXPORT_FILENAME: &str = "dividend-projection.csv";

/// Amount fields arrive either as JSON numbers or as currency-formatted
/// text ("16.000.000"), matching what the web form lets users type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    fn resolve(&self) -> f64 {
        match self {
            AmountField::Number(v) => *v,
            // Plain float text first, so query-string values keep their
            // obvious meaning; grouped IDR text falls through to the
            // currency parser.
            AmountField::Text(s) => s.trim().parse().unwrap_or_else(|_| parse_currency(s)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    start_age: Option<u32>,
    retirement_age: Option<u32>,
    savings_per_year: Option<AmountField>,
    stock_price: Option<AmountField>,
    dividend_yield: Option<AmountField>,
    monthly_expenses: Option<AmountField>,
    reinvest_dividends: Option<bool>,
    start_year: Option<i32>,
    max_chart_points: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(
    name = "divsim",
    about = "Dividend-income retirement projector (yearly share accumulation + expense sufficiency)"
)]
struct Cli {
    #[arg(long, default_value_t = 25, help = "Age when investing starts")]
    start_age: u32,
    #[arg(long, default_value_t = 50, help = "Age when yearly savings stop")]
    retirement_age: u32,
    #[arg(
        long,
        default_value_t = 16_000_000.0,
        help = "Amount invested into shares each pre-retirement year"
    )]
    savings_per_year: f64,
    #[arg(
        long,
        default_value_t = 22_000.0,
        help = "Share price at the start of the projection"
    )]
    stock_price: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Annual dividend as a percent of the share price"
    )]
    dividend_yield: f64,
    #[arg(long, default_value_t = 1_500_000.0, help = "Living expenses per month")]
    monthly_expenses: f64,
    #[arg(
        long,
        default_value_t = false,
        help = "Buy additional shares with pre-retirement dividends instead of counting them as income"
    )]
    reinvest_dividends: bool,
    #[arg(
        long,
        help = "Calendar year of the first projected year; defaults to the current year"
    )]
    start_year: Option<i32>,
}

#[derive(Debug)]
struct SimulateRequest {
    input: SimulationInput,
    max_chart_points: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    start_year: i32,
    retirement_age: u32,
    end_age: u32,
    summary: SimulationSummary,
    results: Vec<SimulationResult>,
    chart: Vec<SimulationResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_input(cli: Cli) -> Result<SimulationInput, String> {
    if cli.start_age < 18 {
        return Err("--start-age must be >= 18".to_string());
    }

    if cli.retirement_age <= cli.start_age {
        return Err("--retirement-age must be > --start-age".to_string());
    }

    if cli.retirement_age > 100 {
        return Err("--retirement-age must be <= 100".to_string());
    }

    if !cli.savings_per_year.is_finite() || cli.savings_per_year < 0.0 {
        return Err("--savings-per-year must be >= 0".to_string());
    }

    if !cli.stock_price.is_finite() || cli.stock_price <= 0.0 {
        return Err("--stock-price must be > 0".to_string());
    }

    if !cli.dividend_yield.is_finite() || !(0.0..=100.0).contains(&cli.dividend_yield) {
        return Err("--dividend-yield must be between 0 and 100".to_string());
    }

    if !cli.monthly_expenses.is_finite() || cli.monthly_expenses < 0.0 {
        return Err("--monthly-expenses must be >= 0".to_string());
    }

    Ok(SimulationInput {
        start_age: cli.start_age,
        retirement_age: cli.retirement_age,
        savings_per_year: cli.savings_per_year,
        stock_price: cli.stock_price,
        dividend_yield: cli.dividend_yield,
        monthly_expenses: cli.monthly_expenses,
        reinvest_dividends: cli.reinvest_dividends,
        start_year: cli.start_year.unwrap_or_else(current_year),
    })
}

fn current_year() -> i32 {
    Utc::now().year()
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/export",
            get(export_get_handler).post(export_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("divsim HTTP API listening on http://{addr}");
    tracing::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match simulate_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    let results = match simulate(&request.input) {
        Ok(results) => results,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    let Some(summary) = summarize(&results) else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "empty projection");
    };
    let chart = downsample(&results, request.max_chart_points);

    json_response(
        StatusCode::OK,
        SimulateResponse {
            start_year: request.input.start_year,
            retirement_age: request.input.retirement_age,
            end_age: simulation_end_age(request.input.retirement_age),
            summary,
            results,
            chart,
        },
    )
}

async fn export_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    export_handler_impl(payload)
}

async fn export_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    export_handler_impl(payload)
}

fn export_handler_impl(payload: SimulatePayload) -> Response {
    let request = match simulate_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected export request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    let results = match simulate(&request.input) {
        Ok(results) => results,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let mut response = (StatusCode::OK, results_to_csv(&results)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        "text/csv; charset=utf-8".parse().expect("valid header"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{EXPORT_FILENAME}\"")
            .parse()
            .expect("valid header"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
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
fn simulate_request_from_json(json: &str) -> Result<SimulateRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    simulate_request_from_payload(payload)
}

fn simulate_request_from_payload(payload: SimulatePayload) -> Result<SimulateRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.start_age {
        cli.start_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = &payload.savings_per_year {
        cli.savings_per_year = v.resolve();
    }
    if let Some(v) = &payload.stock_price {
        cli.stock_price = v.resolve();
    }
    if let Some(v) = &payload.dividend_yield {
        cli.dividend_yield = v.resolve();
    }
    if let Some(v) = &payload.monthly_expenses {
        cli.monthly_expenses = v.resolve();
    }
    if let Some(v) = payload.reinvest_dividends {
        cli.reinvest_dividends = v;
    }
    if let Some(v) = payload.start_year {
        cli.start_year = Some(v);
    }

    let max_chart_points = payload
        .max_chart_points
        .unwrap_or(DEFAULT_MAX_CHART_POINTS)
        .clamp(10, 200);

    let input = build_input(cli)?;
    Ok(SimulateRequest {
        input,
        max_chart_points,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        start_age: 25,
        retirement_age: 50,
        savings_per_year: 16_000_000.0,
        stock_price: 22_000.0,
        dividend_yield: 15.0,
        monthly_expenses: 1_500_000.0,
        reinvest_dividends: false,
        start_year: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_input_accepts_the_form_defaults() {
        let input = build_input(sample_cli()).expect("valid inputs");
        assert_eq!(input.start_age, 25);
        assert_eq!(input.retirement_age, 50);
        assert_approx(input.savings_per_year, 16_000_000.0);
        assert_approx(input.stock_price, 22_000.0);
        assert_approx(input.dividend_yield, 15.0);
        assert_approx(input.monthly_expenses, 1_500_000.0);
        assert!(!input.reinvest_dividends);
    }

    #[test]
    fn build_input_defaults_start_year_to_the_current_year() {
        let input = build_input(sample_cli()).expect("valid inputs");
        assert_eq!(input.start_year, current_year());
    }

    #[test]
    fn build_input_rejects_underage_start() {
        let mut cli = sample_cli();
        cli.start_age = 17;
        let err = build_input(cli).expect_err("must reject start age below 18");
        assert!(err.contains("--start-age"));
    }

    #[test]
    fn build_input_rejects_retirement_before_start() {
        let mut cli = sample_cli();
        cli.start_age = 50;
        cli.retirement_age = 50;
        let err = build_input(cli).expect_err("must reject retirement <= start");
        assert!(err.contains("--retirement-age"));
    }

    #[test]
    fn build_input_rejects_zero_stock_price() {
        let mut cli = sample_cli();
        cli.stock_price = 0.0;
        let err = build_input(cli).expect_err("must reject non-positive price");
        assert!(err.contains("--stock-price"));
    }

    #[test]
    fn build_input_rejects_out_of_range_yield() {
        let mut cli = sample_cli();
        cli.dividend_yield = 120.0;
        let err = build_input(cli).expect_err("must reject yield above 100");
        assert!(err.contains("--dividend-yield"));
    }

    #[test]
    fn api_request_parses_web_keys_and_currency_text() {
        let json = r#"{
          "startAge": 30,
          "retirementAge": 55,
          "savingsPerYear": "Rp 24.000.000",
          "stockPrice": 18500,
          "dividendYield": "12",
          "monthlyExpenses": "2.000.000",
          "reinvestDividends": true,
          "startYear": 2030
        }"#;
        let request = simulate_request_from_json(json).expect("json should parse");
        let input = request.input;

        assert_eq!(input.start_age, 30);
        assert_eq!(input.retirement_age, 55);
        assert_approx(input.savings_per_year, 24_000_000.0);
        assert_approx(input.stock_price, 18_500.0);
        assert_approx(input.dividend_yield, 12.0);
        assert_approx(input.monthly_expenses, 2_000_000.0);
        assert!(input.reinvest_dividends);
        assert_eq!(input.start_year, 2030);
    }

    #[test]
    fn api_request_applies_defaults_for_missing_fields() {
        let request = simulate_request_from_json("{}").expect("empty payload is valid");
        assert_eq!(request.input.start_age, 25);
        assert_eq!(request.input.retirement_age, 50);
        assert_approx(request.input.savings_per_year, 16_000_000.0);
        assert_eq!(request.max_chart_points, DEFAULT_MAX_CHART_POINTS);
    }

    #[test]
    fn api_request_clamps_chart_points() {
        let request =
            simulate_request_from_json(r#"{"maxChartPoints": 5}"#).expect("payload is valid");
        assert_eq!(request.max_chart_points, 10);

        let request =
            simulate_request_from_json(r#"{"maxChartPoints": 900}"#).expect("payload is valid");
        assert_eq!(request.max_chart_points, 200);
    }

    #[test]
    fn api_request_rejects_inverted_ages() {
        let err = simulate_request_from_json(r#"{"startAge": 60, "retirementAge": 40}"#)
            .expect_err("must reject inverted ages");
        assert!(err.contains("--retirement-age"));
    }

    #[test]
    fn plain_decimal_text_is_not_treated_as_grouped_currency() {
        let request = simulate_request_from_json(r#"{"dividendYield": "7.5"}"#)
            .expect("payload is valid");
        assert_approx(request.input.dividend_yield, 7.5);
    }

    #[test]
    fn simulate_response_serializes_expected_fields() {
        let request = simulate_request_from_json("{}").expect("payload is valid");
        let results = simulate(&request.input).expect("valid input");
        let summary = summarize(&results).expect("non-empty projection");
        let chart = downsample(&results, request.max_chart_points);
        let response = SimulateResponse {
            start_year: request.input.start_year,
            retirement_age: request.input.retirement_age,
            end_age: simulation_end_age(request.input.retirement_age),
            summary,
            results,
            chart,
        };

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"results\""));
        assert!(json.contains("\"chart\""));
        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"sufficiencyRate\""));
        assert!(json.contains("\"outlook\""));
        assert!(json.contains("\"cumulativeStocks\""));
        assert!(json.contains("\"isSufficientForLiving\""));
        assert!(json.contains("\"endAge\":60"));
    }

    #[test]
    fn export_serializes_every_projected_year() {
        let request = simulate_request_from_json("{}").expect("payload is valid");
        let results = simulate(&request.input).expect("valid input");
        let csv = results_to_csv(&results);

        assert_eq!(csv.lines().count(), results.len() + 1);
        assert!(csv.starts_with("Year;Age;"));
        assert!(csv.contains("Insufficient"));
    }
}
