use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use candidate_service::{build_app, config::Config, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn setup_app() -> Router {
    build_app(AppState::in_memory(), &Config::default()).expect("app")
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let req = match body {
        Some(b) => builder.body(Body::from(b.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn candidate(name: &str, email: &str, status: &str) -> JsonValue {
    json!({
        "name": name,
        "age": 28,
        "email": email,
        "phone": "+1 (555) 123-4567",
        "skills": "Rust, Kubernetes",
        "experience": 3,
        "applied_position": "Platform Engineer",
        "status": status
    })
}

#[tokio::test]
async fn create_then_fetch_returns_input_plus_id() {
    let app = setup_app();
    let input = candidate("Anna Lee", "anna@example.com", "Applied");

    let (status, body) = call(&app, "POST", "/api/candidates", Some(input.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Candidate created successfully");
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = call(&app, "GET", &format!("/api/candidates/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    for field in ["name", "age", "email", "phone", "skills", "experience", "applied_position", "status"] {
        assert_eq!(data[field], input[field], "{field}");
    }
}

#[tokio::test]
async fn status_defaults_to_applied_and_zero_experience_survives() {
    let app = setup_app();
    let (status, body) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({ "name": "Zed", "age": 18, "email": "zed@example.com", "experience": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Applied");
    assert_eq!(body["data"]["experience"], 0);
    assert!(body["data"]["phone"].is_null());
}

#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively() {
    let app = setup_app();
    let (status, first) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(candidate("Anna Lee", "anna@example.com", "Applied")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(candidate("Other Anna", "ANNA@Example.com", "Applied")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["field"], "email");

    let id = first["data"]["id"].as_i64().unwrap();
    let (status, _) = call(&app, "GET", &format!("/api/candidates/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_keeps_id_and_allows_own_email() {
    let app = setup_app();
    let (_, created) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(candidate("Anna Lee", "anna@example.com", "Applied")),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    call(
        &app,
        "POST",
        "/api/candidates",
        Some(candidate("Bob Stone", "bob@example.com", "Applied")),
    )
    .await;

    let changes = json!({
        "name": "Anna Lee-Smith",
        "age": 29,
        "email": "Anna@example.com",
        "status": "Interviewing"
    });
    let (status, body) = call(&app, "PUT", &format!("/api/candidates/{}", id), Some(changes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Candidate updated successfully");
    assert_eq!(body["data"]["id"], id);

    let (_, fetched) = call(&app, "GET", &format!("/api/candidates/{}", id), None).await;
    assert_eq!(fetched["data"]["name"], "Anna Lee-Smith");
    assert_eq!(fetched["data"]["status"], "Interviewing");
    assert!(fetched["data"]["skills"].is_null());

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/candidates/{}", id),
        Some(candidate("Anna Lee", "bob@example.com", "Applied")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let app = setup_app();
    let (status, body) = call(&app, "GET", "/api/candidates/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Candidate with ID 404 not found");

    let (status, _) = call(
        &app,
        "PUT",
        "/api/candidates/404",
        Some(candidate("Anna Lee", "anna@example.com", "Applied")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_second_is_not_found() {
    let app = setup_app();
    let (_, created) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(candidate("Anna Lee", "anna@example.com", "Applied")),
    )
    .await;
    let uri = format!("/api/candidates/{}", created["data"]["id"]);

    let (status, body) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Candidate deleted successfully");

    let (status, body) = call(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_filters_by_status_and_search() {
    let app = setup_app();
    for (name, email, status) in [
        ("Anna Lee", "lee@example.com", "Hired"),
        ("Bob Stone", "joanna.stone@example.com", "Applied"),
        ("Carl Park", "carl@example.com", "Hired"),
    ] {
        call(&app, "POST", "/api/candidates", Some(candidate(name, email, status))).await;
    }

    let (status, body) = call(&app, "GET", "/api/candidates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    let (_, body) = call(&app, "GET", "/api/candidates?status=Hired", None).await;
    assert_eq!(body["count"], 2);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["status"] == "Hired"));

    let (_, body) = call(&app, "GET", "/api/candidates?search=anna", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anna Lee", "Bob Stone"]);

    let (_, body) = call(&app, "GET", "/api/candidates?search=anna&status=Hired", None).await;
    assert_eq!(body["count"], 1);

    let (status, body) = call(&app, "GET", "/api/candidates?status=Sleeping", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "status");
}

#[tokio::test]
async fn statistics_count_by_status() {
    let app = setup_app();
    for (i, status) in ["Applied", "Applied", "Hired"].into_iter().enumerate() {
        call(
            &app,
            "POST",
            "/api/candidates",
            Some(candidate("Some One", &format!("p{}@example.com", i), status)),
        )
        .await;
    }

    let (status, body) = call(&app, "GET", "/api/candidates/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["applied"], 2);
    assert_eq!(body["data"]["hired"], 1);
    assert_eq!(body["data"]["interviewing"], 0);
}

#[tokio::test]
async fn invalid_payloads_report_every_field() {
    let app = setup_app();
    let (status, body) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({ "name": "A1", "age": 101, "email": "a@b", "experience": -2 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["age", "email", "experience", "name"]);

    let (_, stats) = call(&app, "GET", "/api/candidates/stats", None).await;
    assert_eq!(stats["data"]["total"], 0);
}

#[tokio::test]
async fn malformed_bodies_and_ids_use_the_envelope() {
    let app = setup_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/candidates")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, "DELETE", "/api/candidates/0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "id");
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = setup_app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/candidates/{id}"].is_object());
    assert!(body["paths"]["/api/candidates/stats"].is_object());
}

#[tokio::test]
async fn rejected_query_and_path_use_the_envelope() {
    let app = setup_app();
    let (status, body) = call(&app, "GET", "/api/candidates?status=Hired&status=Applied", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("status"));

    let (status, body) = call(&app, "GET", "/api/candidates/%FF", None).await;
    assert!(status.is_client_error());
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn wrongly_typed_fields_are_reported_with_the_rest() {
    let app = setup_app();
    let (status, body) = call(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({ "name": "A1", "age": "thirty", "email": "a@b" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "age");
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["age", "email", "name"]);
    assert_eq!(errors[0]["message"], "Age must be a number");
}

#[tokio::test]
async fn non_ascii_digits_and_line_breaks_are_rejected() {
    let app = setup_app();
    let mut input = candidate("Ann\nLee", "ann@example.com", "Applied");
    input["phone"] = json!("\u{661}\u{662}\u{663}\u{664}");
    let (status, body) = call(&app, "POST", "/api/candidates", Some(input)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "phone"]);
}

#[tokio::test]
async fn large_experience_is_accepted() {
    let app = setup_app();
    let mut input = candidate("Old Hand", "old@example.com", "Hired");
    input["experience"] = json!(120);
    let (status, body) = call(&app, "POST", "/api/candidates", Some(input)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["experience"], 120);
}
