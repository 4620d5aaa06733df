use thiserror::Error;

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;
pub const MAX_ANNUAL_RETURN: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Retirement age must be greater than current age (age {age}, retirement age {retirement_age}).")]
    InvalidHorizon { age: u32, retirement_age: u32 },
    #[error("projection horizon must be at least one year")]
    EmptyHorizon,
    #[error("age must be between 18 and 100, got {0}")]
    AgeOutOfRange(u32),
    #[error("retirement age must be at most 100, got {0}")]
    RetirementAgeOutOfRange(u32),
    #[error("expected annual return must be between 0 and 15 percent, got {0}")]
    ReturnOutOfRange(f64),
    #[error("{field} must be a finite number >= 0, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

pub fn validate_age(age: u32) -> Result<(), PlanError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(PlanError::AgeOutOfRange(age));
    }
    Ok(())
}

/// Only the upper cap; the horizon itself is checked when projecting.
pub fn validate_retirement_age(retirement_age: u32) -> Result<(), PlanError> {
    if retirement_age > MAX_AGE {
        return Err(PlanError::RetirementAgeOutOfRange(retirement_age));
    }
    Ok(())
}

pub fn validate_amount(field: &'static str, value: f64) -> Result<(), PlanError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlanError::InvalidAmount { field, value });
    }
    Ok(())
}

pub fn validate_annual_return(percent: f64) -> Result<(), PlanError> {
    if !(0.0..=MAX_ANNUAL_RETURN).contains(&percent) {
        return Err(PlanError::ReturnOutOfRange(percent));
    }
    Ok(())
}
