use super::types::{
    Allocation, EmploymentStatus, PlanRecommendation, RiskTolerance, UserProfile,
};

/// Income at or above which Roth contributions are assumed to phase out.
pub const ROTH_INCOME_LIMIT: f64 = 145_000.0;

const MAX_STOCK_PERCENT: u32 = 95;
const MIN_STOCK_PERCENT: u32 = 30;
const HIGH_RISK_TILT: u32 = 10;
const LOW_RISK_TILT: u32 = 20;

/// Upper age bound (exclusive) paired with the base stock share for that bracket.
const AGE_BRACKETS: [(u32, u32); 4] = [(30, 90), (40, 85), (50, 75), (60, 65)];
const OLDEST_BRACKET_STOCK: u32 = 50;

const PORTFOLIO_TIP: &str =
    "Consider using a Target Date Fund or a simple 3-fund mix (US Stock, Intl Stock, Bond).";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AccountRule {
    EmployerPlan,
    SelfEmployedPlan,
    Roth,
    TraditionalOrBrokerage,
}

impl AccountRule {
    /// Evaluation order; the first rule that matches wins.
    const ORDERED: [AccountRule; 4] = [
        Self::EmployerPlan,
        Self::SelfEmployedPlan,
        Self::Roth,
        Self::TraditionalOrBrokerage,
    ];

    fn matches(
        self,
        status: EmploymentStatus,
        has_401k_access: bool,
        income: Option<f64>,
    ) -> bool {
        match self {
            Self::EmployerPlan => status == EmploymentStatus::Employed && has_401k_access,
            Self::SelfEmployedPlan => status == EmploymentStatus::SelfEmployed,
            Self::Roth => income.is_none_or(|v| v < ROTH_INCOME_LIMIT),
            Self::TraditionalOrBrokerage => true,
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Self::EmployerPlan => {
                "401(k) — contribute at least enough to get your employer match. Consider a Roth IRA for tax-free withdrawals."
            }
            Self::SelfEmployedPlan => "SEP IRA or Solo 401(k) — great for business owners.",
            Self::Roth => "Roth IRA (if eligible). If not, consider Traditional IRA or brokerage.",
            Self::TraditionalOrBrokerage => "Traditional IRA or taxable brokerage account.",
        }
    }
}

/// Zero income is how the form reports "not provided".
pub fn known_income(annual_income: Option<f64>) -> Option<f64> {
    annual_income.filter(|v| *v > 0.0)
}

pub fn recommend_account(
    status: EmploymentStatus,
    has_401k_access: bool,
    annual_income: Option<f64>,
) -> &'static str {
    let income = known_income(annual_income);
    AccountRule::ORDERED
        .into_iter()
        .find(|rule| rule.matches(status, has_401k_access, income))
        .unwrap_or(AccountRule::TraditionalOrBrokerage)
        .advice()
}

pub fn recommend_allocation(age: u32, risk: RiskTolerance) -> Allocation {
    let base_stock = AGE_BRACKETS
        .iter()
        .find(|(upper, _)| age < *upper)
        .map(|(_, stock)| *stock)
        .unwrap_or(OLDEST_BRACKET_STOCK);

    let stock_percent = match risk {
        RiskTolerance::High => (base_stock + HIGH_RISK_TILT).min(MAX_STOCK_PERCENT),
        RiskTolerance::Low => base_stock
            .saturating_sub(LOW_RISK_TILT)
            .max(MIN_STOCK_PERCENT),
        RiskTolerance::Medium => base_stock,
    };

    Allocation {
        stock_percent,
        bond_percent: 100 - stock_percent,
    }
}

/// Monthly amounts are rounded half-to-even.
pub fn contribution_guidance(annual_income: Option<f64>) -> String {
    let Some(income) = known_income(annual_income) else {
        return "Try to save 10–15% of your income. If unsure, start with what you can and increase over time."
            .to_string();
    };
    let monthly_low = (income * 0.10 / 12.0).round_ties_even();
    let monthly_high = (income * 0.15 / 12.0).round_ties_even();
    format!("Goal: 10–15% of income → about ${monthly_low}/mo to ${monthly_high}/mo")
}

pub fn explain_risk(risk: RiskTolerance) -> &'static str {
    match risk {
        RiskTolerance::Low => "Low risk: more bonds. Smaller swings, slower growth.",
        RiskTolerance::High => "High risk: more stocks. Bigger swings, higher growth potential.",
        RiskTolerance::Medium => "Medium risk: balance of stocks and bonds.",
    }
}

pub fn build_plan(profile: &UserProfile) -> PlanRecommendation {
    let allocation = recommend_allocation(profile.age, profile.risk_tolerance);
    PlanRecommendation {
        account_advice: recommend_account(
            profile.employment_status,
            profile.has_401k_access,
            profile.annual_income,
        )
        .to_string(),
        stock_percent: allocation.stock_percent,
        bond_percent: allocation.bond_percent,
        contribution_advice: contribution_guidance(profile.annual_income),
        risk_advice: explain_risk(profile.risk_tolerance).to_string(),
        portfolio_tip: PORTFOLIO_TIP.to_string(),
    }
}
