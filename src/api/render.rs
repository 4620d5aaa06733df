use crate::core::{PlanRecommendation, ProjectionResult};

pub const DISCLAIMER: &str =
    "This tool is for educational purposes only and not financial advice.";

/// `$1,234,567.89`; negative amounts render as `-$12.50`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn plan_lines(plan: &PlanRecommendation) -> Vec<String> {
    vec![
        format!("Account Recommendation: {}", plan.account_advice),
        format!(
            "Suggested Investment Allocation: {}% Stocks / {}% Bonds",
            plan.stock_percent, plan.bond_percent
        ),
        format!("Contribution Guidance: {}", plan.contribution_advice),
        format!("Risk Explanation: {}", plan.risk_advice),
        format!("Tip: {}", plan.portfolio_tip),
    ]
}

pub fn projection_lines(projection: &ProjectionResult) -> Vec<String> {
    let mut lines = vec![format!(
        "Projected Savings at Age {}: {}",
        projection.retirement_age,
        format_currency(projection.projected_value)
    )];
    if projection.goal_met {
        lines.push("You're on track to meet or exceed your goal!".to_string());
    } else {
        lines.push(format!(
            "Shortfall: You're projected to fall short by {}",
            format_currency(projection.shortfall)
        ));
        lines.push(format!(
            "To hit your goal, save about {} more per month.",
            format_currency(projection.extra_monthly_needed)
        ));
    }
    lines
}
