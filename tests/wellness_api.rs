use actix_web::{test, web, App};
use finwell_server::{mood, progress};
use serde_json::json;

macro_rules! wellness_app {
    () => {
        test::init_service(
            App::new()
                .route("/api/mood/insights", web::post().to(mood::handlers::insights))
                .route(
                    "/api/progress/engagement-risk",
                    web::post().to(progress::handlers::engagement_risk),
                )
                .route(
                    "/api/progress/optimal-time",
                    web::post().to(progress::handlers::optimal_time),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_stress_insights_calm_history() {
    let app = wellness_app!();

    let samples: Vec<_> = (0..7).map(|_| json!({ "mood": 5, "stress": 1 })).collect();
    let resp = test::TestRequest::post()
        .uri("/api/mood/insights")
        .set_json(json!({ "samples": samples }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["level"], "low");
}

#[actix_web::test]
async fn test_stress_insights_stressed_history() {
    let app = wellness_app!();

    let samples: Vec<_> = (0..7).map(|_| json!({ "mood": 1, "stress": 10 })).collect();
    let resp = test::TestRequest::post()
        .uri("/api/mood/insights")
        .set_json(json!({ "samples": samples }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["level"], "high");
    assert!(body["recommendation"].as_str().unwrap().len() > 0);
}

#[actix_web::test]
async fn test_stress_insights_rejects_out_of_range_mood() {
    let app = wellness_app!();

    let resp = test::TestRequest::post()
        .uri("/api/mood/insights")
        .set_json(json!({ "samples": [{ "mood": 6, "stress": 5 }] }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_stress_insights_rejects_out_of_range_stress() {
    let app = wellness_app!();

    let resp = test::TestRequest::post()
        .uri("/api/mood/insights")
        .set_json(json!({ "samples": [{ "mood": 3, "stress": 11 }] }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_engagement_risk_lapsed_user() {
    let app = wellness_app!();

    let resp = test::TestRequest::post()
        .uri("/api/progress/engagement-risk")
        .set_json(json!({
            "days_since_last_activity": 10,
            "active_days_last_14": 0,
            "avg_session_minutes": 0.0
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["level"], "high");
}

#[actix_web::test]
async fn test_engagement_risk_rejects_impossible_active_days() {
    let app = wellness_app!();

    let resp = test::TestRequest::post()
        .uri("/api/progress/engagement-risk")
        .set_json(json!({
            "days_since_last_activity": 1,
            "active_days_last_14": 20
        }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_optimal_time_endpoint() {
    let app = wellness_app!();

    let mut histogram = vec![0u32; 24];
    histogram[6] = 3;
    histogram[7] = 5;
    let resp = test::TestRequest::post()
        .uri("/api/progress/optimal-time")
        .set_json(json!({ "completions_by_hour": histogram }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["start_hour"], 6);
    assert_eq!(body["end_hour"], 8);
}

#[actix_web::test]
async fn test_optimal_time_rejects_wrong_bin_count() {
    let app = wellness_app!();

    let resp = test::TestRequest::post()
        .uri("/api/progress/optimal-time")
        .set_json(json!({ "completions_by_hour": [1, 2, 3] }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 400);
}
