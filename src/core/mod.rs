mod error;
mod projection;
mod recommend;
mod types;

pub use error::{
    MAX_AGE, MAX_ANNUAL_RETURN, MIN_AGE, PlanError, validate_age, validate_amount,
    validate_annual_return, validate_retirement_age,
};
pub use projection::{
    future_value_factor, project_savings, run_projection, solve_shortfall, years_to_retirement,
};
pub use recommend::{
    ROTH_INCOME_LIMIT, build_plan, contribution_guidance, explain_risk, known_income,
    recommend_account, recommend_allocation,
};
pub use types::{
    Allocation, EmploymentStatus, PlanRecommendation, ProjectionResult, RiskTolerance,
    SavingsInputs, Shortfall, UserProfile,
};
