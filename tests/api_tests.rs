use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Days, Utc};
use http_body_util::BodyExt;
use liftlog::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse-battery";

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.frontend_path = String::new();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;
    config
}

async fn spawn_app() -> Router {
    let state = liftlog::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    liftlog::api::router(state).await
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers `username` and returns its API key.
async fn register(app: &Router, username: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["data"]["api_key"].as_str().unwrap().to_string()
}

fn days_ago(days: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_protected_routes_require_credentials() {
    let app = spawn_app().await;

    let (status, _) = call(&app, "GET", "/api/history", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/api/history", Some("wrong-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let key = register(&app, "sam").await;
    let (status, _) = call(&app, "GET", "/api/history", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "sam", "email": "other@example.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "ab", "email": "ab@example.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "SAM@example.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["api_key"], key.as_str());

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "sam", "password": "not-the-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "GET", "/api/auth/me", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "sam");
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_log_sync_resolves_calories_and_replaces() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    let payload = json!({
        "date": "2024-03-01",
        "gym_visited": true,
        "workouts": [{
            "name": "Bench Press",
            "sets": [{"weight": 80.0, "reps": 5}],
            "completed": true
        }],
        "meals": [
            {"name": "Banana", "quantity": 1, "unit": "1 unit", "completed": true},
            {"name": "Mystery stew", "calories": 450, "completed": true}
        ]
    });

    let (status, body) = call(&app, "POST", "/api/log", Some(&key), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["meals"][0]["calories"], 89);
    assert_eq!(body["data"]["meals"][1]["calories"], 450);
    assert_eq!(body["data"]["total_calories"], 539);

    // Sending the same day again replaces rather than appends.
    let (status, _) = call(&app, "POST", "/api/log", Some(&key), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        "GET",
        "/api/history?since=2024-01-01",
        Some(&key),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let day = &body["data"]["2024-03-01"];
    assert_eq!(day["meals"].as_array().unwrap().len(), 2);
    assert_eq!(day["workouts"].as_array().unwrap().len(), 1);
    assert_eq!(day["gym_visited"], true);

    // Outside the default window.
    let (_, body) = call(&app, "GET", "/api/history", Some(&key), None).await;
    assert!(body["data"].get("2024-03-01").is_none());

    let (status, body) = call(&app, "GET", "/api/log/2024-03-01", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["workouts"][0]["exercise_name"], "Bench Press");

    let (status, _) = call(&app, "GET", "/api/log/2024-03-02", Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "POST",
        "/api/log",
        Some(&key),
        Some(json!({"date": "03/01/2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_saving_back_returned_log_keeps_legacy_sets() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/log",
        Some(&key),
        Some(json!({
            "date": "2024-03-01",
            "workouts": [{"name": "Squat", "sets": 3, "reps": 5, "weight": 140.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, first) = call(&app, "GET", "/api/log/2024-03-01", Some(&key), None).await;
    let returned = first["data"].clone();
    assert_eq!(returned["workouts"][0]["legacy"]["weight"], 140.0);

    let (status, _) = call(&app, "POST", "/api/log", Some(&key), Some(returned.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, second) = call(&app, "GET", "/api/log/2024-03-01", Some(&key), None).await;
    assert_eq!(second["data"], returned);
    assert_eq!(second["data"]["workouts"][0]["legacy"]["sets"], 3);
    assert_eq!(second["data"]["workouts"][0]["legacy"]["reps"], 5);

    let (_, prs) = call(&app, "GET", "/api/prs", Some(&key), None).await;
    assert_eq!(prs["data"]["Squat"]["weight"], 140.0);
    assert_eq!(prs["data"]["Squat"]["source"], "history");
}

#[tokio::test]
async fn test_logs_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let sam = register(&app, "sam").await;
    let alex = register(&app, "alex").await;

    call(
        &app,
        "POST",
        "/api/log",
        Some(&sam),
        Some(json!({"date": days_ago(1), "gym_visited": true})),
    )
    .await;

    let (_, body) = call(&app, "GET", "/api/history", Some(&alex), None).await;
    assert!(body["data"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_weight_updates_existing_day() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    for (date, weight) in [("2024-03-02", 80.5), ("2024-03-01", 81.0), ("2024-03-02", 80.0)] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/weight",
            Some(&key),
            Some(json!({"date": date, "weight": weight})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, "GET", "/api/weight", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2024-03-01");
    assert_eq!(entries[1]["date"], "2024-03-02");
    assert_eq!(entries[1]["weight"], 80.0);

    let (status, _) = call(
        &app,
        "POST",
        "/api/weight",
        Some(&key),
        Some(json!({"date": "2024-03-03", "weight": -4.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_personal_records() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    call(
        &app,
        "POST",
        "/api/log",
        Some(&key),
        Some(json!({
            "date": "2024-03-01",
            "workouts": [{"name": "Paused Bench Press", "sets": [{"weight": 80.0, "reps": 5}]}]
        })),
    )
    .await;

    let (status, body) = call(&app, "GET", "/api/prs", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Bench Press"]["weight"], 80.0);

    let (status, body) = call(
        &app,
        "POST",
        "/api/prs",
        Some(&key),
        Some(json!({"exercise": "Bench Press", "weight": 75.0, "reps": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["current"]["weight"], 80.0);

    let (status, body) = call(
        &app,
        "POST",
        "/api/prs",
        Some(&key),
        Some(json!({"exercise": "Bench Press", "weight": 90.0, "reps": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["record"]["weight"], 90.0);
    assert_eq!(body["data"]["previous"]["weight"], 80.0);

    let (_, body) = call(&app, "GET", "/api/prs", Some(&key), None).await;
    assert_eq!(body["data"]["Bench Press"]["weight"], 90.0);

    let (status, _) = call(&app, "DELETE", "/api/prs/Bench%20Press", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "DELETE", "/api/prs/Bench%20Press", Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The mined value is still there once the manual entry is gone.
    let (_, body) = call(&app, "GET", "/api/prs", Some(&key), None).await;
    assert_eq!(body["data"]["Bench Press"]["weight"], 80.0);
}

#[tokio::test]
async fn test_streak_and_consistency() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    for days in [1, 2] {
        call(
            &app,
            "POST",
            "/api/log",
            Some(&key),
            Some(json!({"date": days_ago(days), "gym_visited": true})),
        )
        .await;
    }

    let (status, body) = call(&app, "GET", "/api/stats/streak", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["streak"], 2);
    assert_eq!(body["data"]["visited_today"], false);

    let (status, body) = call(
        &app,
        "GET",
        "/api/stats/consistency?range=week",
        Some(&key),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["buckets"].as_array().unwrap().len(), 7);
    assert_eq!(body["data"]["total_visits"], 2);
}

#[tokio::test]
async fn test_leaderboard_ranks_requester() {
    let app = spawn_app().await;
    let sam = register(&app, "sam").await;
    let alex = register(&app, "alex").await;

    call(
        &app,
        "POST",
        "/api/log",
        Some(&alex),
        Some(json!({"date": days_ago(1), "gym_visited": true})),
    )
    .await;

    let (status, body) = call(&app, "GET", "/api/leaderboard", Some(&sam), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_users"], 2);
    assert_eq!(body["data"]["entries"][0]["username"], "alex");
    assert_eq!(body["data"]["entries"][0]["gym_score"], 1);
    assert_eq!(body["data"]["requester"]["username"], "sam");
    assert_eq!(body["data"]["requester"]["rank"], 2);
}

#[tokio::test]
async fn test_leaderboard_without_credentials() {
    let app = spawn_app().await;
    let sam = register(&app, "sam").await;

    call(
        &app,
        "POST",
        "/api/log",
        Some(&sam),
        Some(json!({"date": days_ago(1), "gym_visited": true})),
    )
    .await;

    let (status, body) = call(&app, "GET", "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_users"], 1);
    assert_eq!(body["data"]["entries"][0]["username"], "sam");
    assert!(body["data"]["requester"].is_null());
}

#[tokio::test]
async fn test_food_lookup_is_public() {
    let app = spawn_app().await;

    let (status, body) = call(&app, "GET", "/api/foods?q=banan", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert!(names.contains(&"Banana"));

    let (status, body) = call(
        &app,
        "GET",
        "/api/foods/resolve?name=banana&quantity=2&unit=unit",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["calories"], 178);
    assert_eq!(body["data"]["matched"], "Banana");

    let (_, body) = call(&app, "GET", "/api/foods/resolve?name=zzzz", None, None).await;
    assert_eq!(body["data"]["calories"], 0);
    assert!(body["data"]["matched"].is_null());
}

#[tokio::test]
async fn test_feedback() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/feedback",
        Some(&key),
        Some(json!({"message": "Love it", "rating": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "POST",
        "/api/feedback",
        Some(&key),
        Some(json!({"message": "Love it", "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["category"], "general");

    let (status, _) = call(&app, "GET", "/api/admin/feedback", Some(&key), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_coach_disabled_by_default() {
    let app = spawn_app().await;
    let key = register(&app, "sam").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/coach/chat",
        Some(&key),
        Some(json!({"message": "How do I squat deeper?"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = call(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_security_headers() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
