use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

mod render;

pub use render::format_currency;

use crate::core::{
    EmploymentStatus, PlanRecommendation, ProjectionResult, RiskTolerance, SavingsInputs,
    UserProfile, build_plan, known_income, run_projection, validate_age, validate_amount,
    validate_annual_return, validate_retirement_age,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliEmploymentStatus {
    Employed,
    SelfEmployed,
    NotWorking,
}

impl From<CliEmploymentStatus> for EmploymentStatus {
    fn from(value: CliEmploymentStatus) -> Self {
        match value {
            CliEmploymentStatus::Employed => EmploymentStatus::Employed,
            CliEmploymentStatus::SelfEmployed => EmploymentStatus::SelfEmployed,
            CliEmploymentStatus::NotWorking => EmploymentStatus::NotWorking,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskTolerance {
    Low,
    Medium,
    High,
}

impl From<CliRiskTolerance> for RiskTolerance {
    fn from(value: CliRiskTolerance) -> Self {
        match value {
            CliRiskTolerance::Low => RiskTolerance::Low,
            CliRiskTolerance::Medium => RiskTolerance::Medium,
            CliRiskTolerance::High => RiskTolerance::High,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiEmploymentStatus {
    #[serde(alias = "Employed")]
    Employed,
    #[serde(
        alias = "selfEmployed",
        alias = "self_employed",
        alias = "Self-Employed"
    )]
    SelfEmployed,
    #[serde(alias = "notWorking", alias = "not_working", alias = "Not Working")]
    NotWorking,
}

impl From<ApiEmploymentStatus> for CliEmploymentStatus {
    fn from(value: ApiEmploymentStatus) -> Self {
        match value {
            ApiEmploymentStatus::Employed => CliEmploymentStatus::Employed,
            ApiEmploymentStatus::SelfEmployed => CliEmploymentStatus::SelfEmployed,
            ApiEmploymentStatus::NotWorking => CliEmploymentStatus::NotWorking,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskTolerance {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl From<ApiRiskTolerance> for CliRiskTolerance {
    fn from(value: ApiRiskTolerance) -> Self {
        match value {
            ApiRiskTolerance::Low => CliRiskTolerance::Low,
            ApiRiskTolerance::Medium => CliRiskTolerance::Medium,
            ApiRiskTolerance::High => CliRiskTolerance::High,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    age: Option<u32>,
    retirement_age: Option<u32>,
    employment_status: Option<ApiEmploymentStatus>,
    #[serde(alias = "has401k")]
    has_401k_access: Option<bool>,
    annual_income: Option<f64>,
    risk_tolerance: Option<ApiRiskTolerance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    age: Option<u32>,
    retirement_age: Option<u32>,
    current_savings: Option<f64>,
    monthly_contribution: Option<f64>,
    expected_return: Option<f64>,
    goal: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "retirement-planner",
    about = "Educational retirement planner: account, allocation and savings projection"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend an account type, stock/bond split and monthly savings range
    Plan(ProfileArgs),
    /// Project savings to retirement and size any gap to the goal
    Project(ProjectArgs),
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
struct ProfileArgs {
    #[arg(long, default_value_t = 30)]
    age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, value_enum, default_value_t = CliEmploymentStatus::Employed)]
    employment_status: CliEmploymentStatus,
    #[arg(
        long = "has-401k",
        default_value_t = true,
        action = ArgAction::Set,
        help = "Access to an employer 401(k); ignored unless employed"
    )]
    has_401k_access: bool,
    #[arg(
        long,
        default_value_t = 80_000.0,
        help = "Annual income; 0 means not provided"
    )]
    annual_income: f64,
    #[arg(long, value_enum, default_value_t = CliRiskTolerance::Medium)]
    risk_tolerance: CliRiskTolerance,
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    #[arg(long, default_value_t = 30)]
    age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 10_000.0)]
    current_savings: f64,
    #[arg(long, default_value_t = 500.0)]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual return in percent, between 0 and 15"
    )]
    expected_return: f64,
    #[arg(long, default_value_t = 1_000_000.0)]
    goal: f64,
}

#[derive(Debug)]
struct ProjectionRequest {
    age: u32,
    retirement_age: u32,
    inputs: SavingsInputs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    #[serde(flatten)]
    plan: PlanRecommendation,
    messages: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    #[serde(flatten)]
    projection: ProjectionResult,
    messages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_profile(args: ProfileArgs) -> Result<UserProfile, String> {
    validate_age(args.age).map_err(|e| e.to_string())?;
    validate_retirement_age(args.retirement_age).map_err(|e| e.to_string())?;
    validate_amount("annual income", args.annual_income).map_err(|e| e.to_string())?;

    let employment_status: EmploymentStatus = args.employment_status.into();
    Ok(UserProfile {
        age: args.age,
        retirement_age: args.retirement_age,
        employment_status,
        has_401k_access: employment_status == EmploymentStatus::Employed
            && args.has_401k_access,
        annual_income: known_income(Some(args.annual_income)),
        risk_tolerance: args.risk_tolerance.into(),
    })
}

fn build_projection_request(args: ProjectArgs) -> Result<ProjectionRequest, String> {
    validate_age(args.age).map_err(|e| e.to_string())?;
    validate_retirement_age(args.retirement_age).map_err(|e| e.to_string())?;
    for (name, value) in [
        ("current savings", args.current_savings),
        ("monthly contribution", args.monthly_contribution),
        ("goal", args.goal),
    ] {
        validate_amount(name, value).map_err(|e| e.to_string())?;
    }
    validate_annual_return(args.expected_return).map_err(|e| e.to_string())?;

    Ok(ProjectionRequest {
        age: args.age,
        retirement_age: args.retirement_age,
        inputs: SavingsInputs {
            current_savings: args.current_savings,
            monthly_contribution: args.monthly_contribution,
            expected_annual_return: args.expected_return,
            goal: args.goal,
        },
    })
}

pub async fn run_cli(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Plan(args) => {
            let profile = build_profile(args)?;
            let plan = build_plan(&profile);
            for line in render::plan_lines(&plan) {
                println!("{line}");
            }
        }
        Command::Project(args) => {
            let request = build_projection_request(args)?;
            let projection = run_projection(request.age, request.retirement_age, &request.inputs)
                .map_err(|e| e.to_string())?;
            for line in render::projection_lines(&projection) {
                println!("{line}");
            }
        }
        Command::Serve { port } => {
            return run_http_server(port)
                .await
                .map_err(|e| format!("Server error: {e}"));
        }
    }
    println!();
    println!("{}", render::DISCLAIMER);
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("Retirement planner API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/plan");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn plan_handler_impl(payload: PlanPayload) -> Response {
    debug!("plan request: {payload:?}");
    match plan_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            warn!("rejected plan request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    debug!("projection request: {payload:?}");
    match project_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            warn!("rejected projection request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn plan_response(payload: PlanPayload) -> Result<PlanResponse, String> {
    let profile = build_profile(profile_args_from_payload(payload))?;
    let plan = build_plan(&profile);
    let messages = render::plan_lines(&plan);
    Ok(PlanResponse { plan, messages })
}

fn project_response(payload: ProjectPayload) -> Result<ProjectResponse, String> {
    let request = build_projection_request(project_args_from_payload(payload))?;
    let projection = run_projection(request.age, request.retirement_age, &request.inputs)
        .map_err(|e| e.to_string())?;
    let messages = render::projection_lines(&projection);
    Ok(ProjectResponse {
        projection,
        messages,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
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

fn profile_args_from_payload(payload: PlanPayload) -> ProfileArgs {
    let mut args = default_profile_args_for_api();
    if let Some(v) = payload.age {
        args.age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.employment_status {
        args.employment_status = v.into();
    }
    if let Some(v) = payload.has_401k_access {
        args.has_401k_access = v;
    }
    if let Some(v) = payload.annual_income {
        args.annual_income = v;
    }
    if let Some(v) = payload.risk_tolerance {
        args.risk_tolerance = v.into();
    }
    args
}

fn project_args_from_payload(payload: ProjectPayload) -> ProjectArgs {
    let mut args = default_project_args_for_api();
    if let Some(v) = payload.age {
        args.age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.current_savings {
        args.current_savings = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    if let Some(v) = payload.goal {
        args.goal = v;
    }
    args
}

fn default_profile_args_for_api() -> ProfileArgs {
    ProfileArgs {
        age: 30,
        retirement_age: 65,
        employment_status: CliEmploymentStatus::Employed,
        has_401k_access: true,
        annual_income: 80_000.0,
        risk_tolerance: CliRiskTolerance::Medium,
    }
}

fn default_project_args_for_api() -> ProjectArgs {
    ProjectArgs {
        age: 30,
        retirement_age: 65,
        current_savings: 10_000.0,
        monthly_contribution: 500.0,
        expected_return: 6.0,
        goal: 1_000_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plan_from_json(json: &str) -> Result<PlanResponse, String> {
        let payload = serde_json::from_str::<PlanPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        plan_response(payload)
    }

    fn project_from_json(json: &str) -> Result<ProjectResponse, String> {
        let payload = serde_json::from_str::<ProjectPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        project_response(payload)
    }

    #[test]
    fn cli_defaults_match_api_defaults() {
        let cli = Cli::try_parse_from(["retirement-planner", "plan"]).expect("parses");
        let Command::Plan(args) = cli.command else {
            panic!("expected plan subcommand");
        };
        let defaults = default_profile_args_for_api();
        assert_eq!(args.age, defaults.age);
        assert_eq!(args.retirement_age, defaults.retirement_age);
        assert_eq!(args.employment_status, defaults.employment_status);
        assert_eq!(args.has_401k_access, defaults.has_401k_access);
        assert_relative_eq!(args.annual_income, defaults.annual_income);
        assert_eq!(args.risk_tolerance, defaults.risk_tolerance);

        let cli = Cli::try_parse_from(["retirement-planner", "project"]).expect("parses");
        let Command::Project(args) = cli.command else {
            panic!("expected project subcommand");
        };
        let defaults = default_project_args_for_api();
        assert_eq!(args.age, defaults.age);
        assert_eq!(args.retirement_age, defaults.retirement_age);
        assert_relative_eq!(args.current_savings, defaults.current_savings);
        assert_relative_eq!(args.monthly_contribution, defaults.monthly_contribution);
        assert_relative_eq!(args.expected_return, defaults.expected_return);
        assert_relative_eq!(args.goal, defaults.goal);
    }

    #[test]
    fn cli_parses_kebab_case_enums_and_explicit_401k_flag() {
        let cli = Cli::try_parse_from([
            "retirement-planner",
            "plan",
            "--employment-status",
            "self-employed",
            "--risk-tolerance",
            "high",
            "--has-401k",
            "false",
            "--annual-income",
            "0",
        ])
        .expect("parses");
        let Command::Plan(args) = cli.command else {
            panic!("expected plan subcommand");
        };
        assert_eq!(args.employment_status, CliEmploymentStatus::SelfEmployed);
        assert_eq!(args.risk_tolerance, CliRiskTolerance::High);
        assert!(!args.has_401k_access);

        let profile = build_profile(args).expect("valid profile");
        assert_eq!(profile.annual_income, None);
    }

    #[test]
    fn cli_serve_takes_port() {
        let cli = Cli::try_parse_from(["retirement-planner", "serve", "--port", "9000"])
            .expect("parses");
        assert!(matches!(cli.command, Command::Serve { port: 9000 }));
    }

    #[test]
    fn build_profile_drops_401k_access_unless_employed() {
        let mut args = default_profile_args_for_api();
        args.employment_status = CliEmploymentStatus::NotWorking;
        args.has_401k_access = true;

        let profile = build_profile(args).expect("valid profile");
        assert!(!profile.has_401k_access);
    }

    #[test]
    fn build_profile_rejects_out_of_range_age() {
        let mut args = default_profile_args_for_api();
        args.age = 17;
        let err = build_profile(args).expect_err("must reject");
        assert!(err.contains("age must be between 18 and 100"));
    }

    #[test]
    fn build_profile_rejects_negative_income() {
        let mut args = default_profile_args_for_api();
        args.annual_income = -1.0;
        let err = build_profile(args).expect_err("must reject");
        assert!(err.contains("annual income"));
    }

    #[test]
    fn build_projection_request_rejects_return_above_slider_range() {
        let mut args = default_project_args_for_api();
        args.expected_return = 16.0;
        let err = build_projection_request(args).expect_err("must reject");
        assert!(err.contains("expected annual return"));
    }

    #[test]
    fn build_projection_request_rejects_negative_goal() {
        let mut args = default_project_args_for_api();
        args.goal = -10.0;
        let err = build_projection_request(args).expect_err("must reject");
        assert!(err.starts_with("goal"));
    }

    #[test]
    fn plan_from_json_parses_web_keys() {
        let json = r#"{
          "age": 52,
          "retirementAge": 67,
          "employmentStatus": "self-employed",
          "annualIncome": 150000,
          "riskTolerance": "low"
        }"#;
        let response = plan_from_json(json).expect("json should parse");

        assert!(response.plan.account_advice.starts_with("SEP IRA"));
        assert_eq!(response.plan.stock_percent, 45);
        assert_eq!(response.plan.bond_percent, 55);
        assert!(response.plan.contribution_advice.ends_with("$1250/mo to $1875/mo"));
        assert_eq!(response.messages.len(), 5);
    }

    #[test]
    fn plan_from_json_accepts_form_labels() {
        let json = r#"{ "employmentStatus": "Not Working", "riskTolerance": "High" }"#;
        let response = plan_from_json(json).expect("json should parse");
        assert!(response.plan.account_advice.starts_with("Roth IRA"));
        assert_eq!(response.plan.stock_percent, 95);
    }

    #[test]
    fn project_from_json_uses_defaults_for_missing_fields() {
        let response = project_from_json("{}").expect("json should parse");
        assert_eq!(response.projection.years_to_retirement, 35);
        assert_relative_eq!(
            response.projection.projected_value,
            797_152.440_064_981_9,
            max_relative = 1e-9
        );
        assert_eq!(
            response.messages[0],
            "Projected Savings at Age 65: $797,152.44"
        );
    }

    #[test]
    fn project_from_json_reports_invalid_horizon() {
        let json = r#"{ "age": 40, "retirementAge": 39 }"#;
        let err = project_from_json(json).expect_err("must reject");
        assert!(err.starts_with("Retirement age must be greater than current age"));
    }

    #[test]
    fn plan_response_serialization_contains_expected_fields() {
        let response = plan_response(PlanPayload::default()).expect("defaults are valid");
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"accountAdvice\""));
        assert!(json.contains("\"stockPercent\":85"));
        assert!(json.contains("\"bondPercent\":15"));
        assert!(json.contains("\"contributionAdvice\""));
        assert!(json.contains("\"riskAdvice\""));
        assert!(json.contains("\"portfolioTip\""));
        assert!(json.contains("\"messages\""));
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let payload = ProjectPayload {
            goal: Some(100_000.0),
            ..ProjectPayload::default()
        };
        let response = project_response(payload).expect("defaults are valid");
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"yearsToRetirement\":35"));
        assert!(json.contains("\"projectedValue\""));
        assert!(json.contains("\"goalMet\":true"));
        assert!(json.contains("\"shortfall\":0.0"));
        assert!(json.contains("\"extraMonthlyNeeded\":0.0"));
    }
}
