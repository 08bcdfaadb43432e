// tests/store_failure_tests.rs

mod common;

use common::{TEST_EMAIL, TEST_PASSWORD, spawn_app};
use serde_json::json;

async fn assert_masked_500(response: reqwest::Response) {
    assert_eq!(response.status().as_u16(), 500);
    let text = response.text().await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
    assert!(!text.contains("no such table"), "leaked: {}", text);
}

#[tokio::test]
async fn results_store_failure_is_a_generic_500() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = app.login_token().await;

    sqlx::query("DROP TABLE attempts")
        .execute(&app.pool)
        .await
        .expect("Failed to drop attempts");

    // Act
    let submit = client
        .post(format!("{}/api/results", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "quizId": "exam1",
            "score": 1,
            "totalQuestions": 5,
            "answers": { "0": "Paris" }
        }))
        .send()
        .await
        .expect("Submit failed");

    let latest = client
        .get(format!("{}/api/results?quizId=exam1", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Fetch failed");

    // Assert
    assert_masked_500(submit).await;
    assert_masked_500(latest).await;
}

#[tokio::test]
async fn login_store_failure_is_a_generic_500() {
    // Arrange
    let app = spawn_app().await;

    sqlx::query("DROP TABLE attempts")
        .execute(&app.pool)
        .await
        .expect("Failed to drop attempts");
    sqlx::query("DROP TABLE users")
        .execute(&app.pool)
        .await
        .expect("Failed to drop users");

    // Act
    let response = reqwest::Client::new()
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert!(response.headers().get("set-cookie").is_none());
    assert_masked_500(response).await;
}
