use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    NotWorking,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub age: u32,
    pub retirement_age: u32,
    pub employment_status: EmploymentStatus,
    /// Only consulted when `employment_status` is `Employed`.
    pub has_401k_access: bool,
    /// `None` and `Some(0.0)` both mean the income is unknown.
    pub annual_income: Option<f64>,
    pub risk_tolerance: RiskTolerance,
}

#[derive(Debug, Clone)]
pub struct SavingsInputs {
    pub current_savings: f64,
    pub monthly_contribution: f64,
    /// Percent, e.g. 6.0 for 6%.
    pub expected_annual_return: f64,
    pub goal: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub stock_percent: u32,
    pub bond_percent: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecommendation {
    pub account_advice: String,
    pub stock_percent: u32,
    pub bond_percent: u32,
    pub contribution_advice: String,
    pub risk_advice: String,
    pub portfolio_tip: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub shortfall: f64,
    pub extra_monthly_needed: f64,
}

impl Shortfall {
    pub const NONE: Shortfall = Shortfall {
        shortfall: 0.0,
        extra_monthly_needed: 0.0,
    };
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub retirement_age: u32,
    pub years_to_retirement: u32,
    pub goal: f64,
    pub projected_value: f64,
    pub goal_met: bool,
    pub shortfall: f64,
    pub extra_monthly_needed: f64,
}
