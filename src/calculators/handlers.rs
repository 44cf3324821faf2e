use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub monthly_income_cents: i64,
}

pub async fn budget(req: web::Json<BudgetRequest>) -> Result<HttpResponse, AppError> {
    let split = super::budget_split(req.monthly_income_cents)?;
    Ok(HttpResponse::Ok().json(split))
}

#[derive(Debug, Deserialize)]
pub struct SavingsGoalRequest {
    pub target_cents: i64,
    #[serde(default)]
    pub saved_cents: i64,
    pub monthly_contribution_cents: i64,
}

pub async fn savings_goal(req: web::Json<SavingsGoalRequest>) -> Result<HttpResponse, AppError> {
    let plan = super::savings_goal(req.target_cents, req.saved_cents, req.monthly_contribution_cents)?;
    Ok(HttpResponse::Ok().json(plan))
}

#[derive(Debug, Deserialize)]
pub struct DebtPayoffRequest {
    pub principal_cents: i64,
    pub apr_percent: f64,
    pub monthly_payment_cents: i64,
}

pub async fn debt_payoff(req: web::Json<DebtPayoffRequest>) -> Result<HttpResponse, AppError> {
    let plan = super::debt_payoff(req.principal_cents, req.apr_percent, req.monthly_payment_cents)?;
    Ok(HttpResponse::Ok().json(plan))
}

#[derive(Debug, Deserialize)]
pub struct CompoundGrowthRequest {
    #[serde(default)]
    pub principal_cents: i64,
    pub apr_percent: f64,
    pub years: u32,
    #[serde(default)]
    pub monthly_contribution_cents: i64,
}

pub async fn compound_growth(
    req: web::Json<CompoundGrowthRequest>,
) -> Result<HttpResponse, AppError> {
    let projection = super::compound_growth(
        req.principal_cents,
        req.apr_percent,
        req.years,
        req.monthly_contribution_cents,
    )?;
    Ok(HttpResponse::Ok().json(projection))
}
