use actix_web::{test, web, App};
use finwell_server::calculators;
use serde_json::json;

macro_rules! calculator_app {
    () => {
        test::init_service(
            App::new().service(
                web::scope("/api/calculators")
                    .route("/budget", web::post().to(calculators::handlers::budget))
                    .route(
                        "/savings-goal",
                        web::post().to(calculators::handlers::savings_goal),
                    )
                    .route(
                        "/debt-payoff",
                        web::post().to(calculators::handlers::debt_payoff),
                    )
                    .route(
                        "/compound-growth",
                        web::post().to(calculators::handlers::compound_growth),
                    ),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_budget_split_endpoint() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/budget")
        .set_json(json!({ "monthly_income_cents": 500_000 }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["needs_cents"], 250_000);
    assert_eq!(body["wants_cents"], 150_000);
    assert_eq!(body["savings_cents"], 100_000);
}

#[actix_web::test]
async fn test_budget_split_rejects_zero_income() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/budget")
        .set_json(json!({ "monthly_income_cents": 0 }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_savings_goal_endpoint() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/savings-goal")
        .set_json(json!({
            "target_cents": 120_000,
            "saved_cents": 20_000,
            "monthly_contribution_cents": 25_000
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["months_to_goal"], 4);
    assert_eq!(body["remaining_cents"], 100_000);
}

#[actix_web::test]
async fn test_debt_payoff_endpoint() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/debt-payoff")
        .set_json(json!({
            "principal_cents": 100_000,
            "apr_percent": 0.0,
            "monthly_payment_cents": 10_000
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["months"], 10);
    assert_eq!(body["total_interest_cents"], 0);
}

#[actix_web::test]
async fn test_debt_payoff_rejects_insufficient_payment() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/debt-payoff")
        .set_json(json!({
            "principal_cents": 1_000_000,
            "apr_percent": 24.0,
            "monthly_payment_cents": 10_000
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_compound_growth_endpoint() {
    let app = calculator_app!();

    let resp = test::TestRequest::post()
        .uri("/api/calculators/compound-growth")
        .set_json(json!({
            "principal_cents": 0,
            "apr_percent": 0.0,
            "years": 1,
            "monthly_contribution_cents": 10_000
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["future_value_cents"], 120_000);
    assert_eq!(body["interest_earned_cents"], 0);
}
