use super::error::PlanError;
use super::types::{ProjectionResult, SavingsInputs, Shortfall};

const MONTHS_PER_YEAR: u32 = 12;

fn monthly_rate(annual_return_percent: f64) -> f64 {
    annual_return_percent / 100.0 / MONTHS_PER_YEAR as f64
}

pub fn years_to_retirement(age: u32, retirement_age: u32) -> Result<u32, PlanError> {
    if retirement_age <= age {
        return Err(PlanError::InvalidHorizon {
            age,
            retirement_age,
        });
    }
    Ok(retirement_age - age)
}

/// Growth multiplier applied to a level monthly contribution over `years`.
///
/// Each deposit is made at the start of its month and compounds through the
/// end of the horizon, so deposit `m` of `n` grows for `n - m + 1` periods.
/// At a zero rate this is exactly the number of months.
pub fn future_value_factor(years: u32, annual_return_percent: f64) -> f64 {
    let months = years * MONTHS_PER_YEAR;
    let r = monthly_rate(annual_return_percent);
    if r == 0.0 {
        return months as f64;
    }
    (1..=months)
        .map(|m| (1.0 + r).powf((months - m + 1) as f64))
        .sum()
}

pub fn project_savings(
    current_savings: f64,
    monthly_contribution: f64,
    years: u32,
    annual_return_percent: f64,
) -> f64 {
    let months = years * MONTHS_PER_YEAR;
    let r = monthly_rate(annual_return_percent);
    let lump_sum = current_savings * (1.0 + r).powf(months as f64);
    lump_sum + monthly_contribution * future_value_factor(years, annual_return_percent)
}

pub fn solve_shortfall(
    goal: f64,
    projected_value: f64,
    years: u32,
    annual_return_percent: f64,
) -> Result<Shortfall, PlanError> {
    if years == 0 {
        return Err(PlanError::EmptyHorizon);
    }
    if projected_value >= goal {
        return Ok(Shortfall::NONE);
    }

    let shortfall = goal - projected_value;
    let factor = future_value_factor(years, annual_return_percent);
    Ok(Shortfall {
        shortfall,
        extra_monthly_needed: shortfall / factor,
    })
}

/// Projects savings to `retirement_age` and sizes any gap to the goal.
///
/// The horizon is checked before any growth is computed; an invalid one is
/// reported without running the projector or the solver.
pub fn run_projection(
    age: u32,
    retirement_age: u32,
    inputs: &SavingsInputs,
) -> Result<ProjectionResult, PlanError> {
    let years = years_to_retirement(age, retirement_age)?;
    let projected_value = project_savings(
        inputs.current_savings,
        inputs.monthly_contribution,
        years,
        inputs.expected_annual_return,
    );
    let gap = solve_shortfall(
        inputs.goal,
        projected_value,
        years,
        inputs.expected_annual_return,
    )?;

    Ok(ProjectionResult {
        retirement_age,
        years_to_retirement: years,
        goal: inputs.goal,
        projected_value,
        goal_met: projected_value >= inputs.goal,
        shortfall: gap.shortfall,
        extra_monthly_needed: gap.extra_monthly_needed,
    })
}
