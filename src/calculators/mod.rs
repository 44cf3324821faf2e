//! Financial calculators: pure arithmetic behind stateless POST endpoints.
//! All money amounts are integer cents.

pub mod handlers;

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct BudgetSplit {
    pub needs_cents: i64,
    pub wants_cents: i64,
    pub savings_cents: i64,
}

/// 50/30/20 budget split. Rounding remainders land in the needs bucket so
/// the three parts always sum to the income.
pub fn budget_split(monthly_income_cents: i64) -> Result<BudgetSplit, AppError> {
    if monthly_income_cents <= 0 {
        return Err(AppError::ValidationError(
            "monthly income must be positive".into(),
        ));
    }

    let wants_cents = monthly_income_cents * 30 / 100;
    let savings_cents = monthly_income_cents * 20 / 100;
    let needs_cents = monthly_income_cents - wants_cents - savings_cents;

    Ok(BudgetSplit {
        needs_cents,
        wants_cents,
        savings_cents,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsPlan {
    pub remaining_cents: i64,
    pub months_to_goal: i64,
}

pub fn savings_goal(
    target_cents: i64,
    saved_cents: i64,
    monthly_contribution_cents: i64,
) -> Result<SavingsPlan, AppError> {
    if target_cents <= 0 {
        return Err(AppError::ValidationError("target must be positive".into()));
    }
    if saved_cents < 0 || monthly_contribution_cents < 0 {
        return Err(AppError::ValidationError("amounts must not be negative".into()));
    }

    let remaining_cents = (target_cents - saved_cents).max(0);
    if remaining_cents == 0 {
        return Ok(SavingsPlan {
            remaining_cents: 0,
            months_to_goal: 0,
        });
    }
    if monthly_contribution_cents == 0 {
        return Err(AppError::ValidationError(
            "monthly contribution must be positive to reach the goal".into(),
        ));
    }

    // Ceiling division
    let months_to_goal =
        (remaining_cents + monthly_contribution_cents - 1) / monthly_contribution_cents;

    Ok(SavingsPlan {
        remaining_cents,
        months_to_goal,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoffPlan {
    pub months: u32,
    pub total_interest_cents: i64,
}

const MAX_PAYOFF_MONTHS: u32 = 600;

/// Month-by-month amortisation of a single debt at a fixed APR.
pub fn debt_payoff(
    principal_cents: i64,
    apr_percent: f64,
    monthly_payment_cents: i64,
) -> Result<PayoffPlan, AppError> {
    if principal_cents <= 0 {
        return Err(AppError::ValidationError("principal must be positive".into()));
    }
    if !(0.0..=100.0).contains(&apr_percent) {
        return Err(AppError::ValidationError("APR must be between 0 and 100".into()));
    }
    if monthly_payment_cents <= 0 {
        return Err(AppError::ValidationError("payment must be positive".into()));
    }

    let monthly_rate = apr_percent / 100.0 / 12.0;
    let first_month_interest = (principal_cents as f64 * monthly_rate) as i64;
    if monthly_payment_cents <= first_month_interest {
        return Err(AppError::ValidationError(
            "payment does not cover monthly interest; the balance would grow".into(),
        ));
    }

    let mut balance = principal_cents as f64;
    let mut total_interest = 0.0;
    let mut months = 0u32;

    while balance > 0.0 && months < MAX_PAYOFF_MONTHS {
        let interest = balance * monthly_rate;
        total_interest += interest;
        balance = balance + interest - monthly_payment_cents as f64;
        months += 1;
    }

    Ok(PayoffPlan {
        months,
        total_interest_cents: total_interest.round() as i64,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthProjection {
    pub future_value_cents: i64,
    pub contributed_cents: i64,
    pub interest_earned_cents: i64,
}

/// Future value with monthly compounding and end-of-month contributions.
pub fn compound_growth(
    principal_cents: i64,
    apr_percent: f64,
    years: u32,
    monthly_contribution_cents: i64,
) -> Result<GrowthProjection, AppError> {
    if principal_cents < 0 || monthly_contribution_cents < 0 {
        return Err(AppError::ValidationError("amounts must not be negative".into()));
    }
    if !(0.0..=100.0).contains(&apr_percent) {
        return Err(AppError::ValidationError("APR must be between 0 and 100".into()));
    }
    if years == 0 || years > 100 {
        return Err(AppError::ValidationError("years must be between 1 and 100".into()));
    }

    let monthly_rate = apr_percent / 100.0 / 12.0;
    let mut balance = principal_cents as f64;
    for _ in 0..(years * 12) {
        balance = balance * (1.0 + monthly_rate) + monthly_contribution_cents as f64;
    }

    let contributed_cents =
        principal_cents + monthly_contribution_cents * (years as i64) * 12;
    let future_value_cents = balance.round() as i64;

    Ok(GrowthProjection {
        future_value_cents,
        contributed_cents,
        interest_earned_cents: future_value_cents - contributed_cents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_split_sums_to_income() {
        let split = budget_split(100_000).unwrap();
        assert_eq!(split.needs_cents, 50_000);
        assert_eq!(split.wants_cents, 30_000);
        assert_eq!(split.savings_cents, 20_000);

        // Remainder from odd amounts lands in needs
        let split = budget_split(100_001).unwrap();
        assert_eq!(
            split.needs_cents + split.wants_cents + split.savings_cents,
            100_001
        );
    }

    #[test]
    fn test_budget_split_rejects_non_positive() {
        assert!(budget_split(0).is_err());
        assert!(budget_split(-5).is_err());
    }

    #[test]
    fn test_savings_goal_ceiling_division() {
        let plan = savings_goal(120_000, 20_000, 25_000).unwrap();
        assert_eq!(plan.remaining_cents, 100_000);
        assert_eq!(plan.months_to_goal, 4);

        let plan = savings_goal(100_000, 0, 30_000).unwrap();
        assert_eq!(plan.months_to_goal, 4);
    }

    #[test]
    fn test_savings_goal_already_reached() {
        let plan = savings_goal(50_000, 60_000, 0).unwrap();
        assert_eq!(plan.remaining_cents, 0);
        assert_eq!(plan.months_to_goal, 0);
    }

    #[test]
    fn test_savings_goal_zero_contribution_rejected() {
        assert!(savings_goal(50_000, 0, 0).is_err());
    }

    #[test]
    fn test_debt_payoff_zero_interest() {
        let plan = debt_payoff(100_000, 0.0, 10_000).unwrap();
        assert_eq!(plan.months, 10);
        assert_eq!(plan.total_interest_cents, 0);
    }

    #[test]
    fn test_debt_payoff_accrues_interest() {
        let plan = debt_payoff(1_000_000, 12.0, 100_000).unwrap();
        assert!(plan.months > 10);
        assert!(plan.total_interest_cents > 0);
    }

    #[test]
    fn test_debt_payoff_rejects_payment_below_interest() {
        // 24% APR on $10,000 is $200/month interest; a $100 payment never closes
        let result = debt_payoff(1_000_000, 24.0, 10_000);
        assert!(result.is_err());
    }

    #[test]
    fn test_compound_growth_zero_rate() {
        let projection = compound_growth(0, 0.0, 1, 10_000).unwrap();
        assert_eq!(projection.future_value_cents, 120_000);
        assert_eq!(projection.interest_earned_cents, 0);

        let projection = compound_growth(50_000, 0.0, 3, 0).unwrap();
        assert_eq!(projection.future_value_cents, 50_000);
    }

    #[test]
    fn test_compound_growth_matches_closed_form() {
        // $1,000 at 12% APR for one year, no contributions: 1000 * 1.01^12
        let projection = compound_growth(100_000, 12.0, 1, 0).unwrap();
        let expected = (100_000.0 * 1.01f64.powi(12)).round() as i64;
        assert_eq!(projection.future_value_cents, expected);
    }
}
