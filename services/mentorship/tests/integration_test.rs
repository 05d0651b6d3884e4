use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use mentorbridge_api::ai_roadmap::RoadmapGenerator;
use mentorbridge_api::directory::User;
use mentorbridge_api::roadmap::{Roadmap, Task, Week};
use mentorbridge_api::{build_app, AppConfig, AppState};
use mentorbridge_common::AppError;

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.password_hash_cost = 4;
    config.ai.timeout_seconds = 1;
    config
}

fn create_test_server() -> TestServer {
    let state = AppState::new(test_config()).unwrap();
    TestServer::new(build_app(state)).unwrap()
}

fn server_with_generator(generator: Arc<dyn RoadmapGenerator>) -> TestServer {
    let state = AppState::with_generator(test_config(), Some(generator)).unwrap();
    TestServer::new(build_app(state)).unwrap()
}

struct FixedGenerator;

#[async_trait]
impl RoadmapGenerator for FixedGenerator {
    async fn generate(&self, user: &User) -> Result<Roadmap, AppError> {
        Ok(Roadmap {
            weeks: vec![Week {
                week_id: "w1".to_string(),
                title: format!("Plan for {}", user.name),
                description: String::new(),
                tasks: vec![Task {
                    id: "w1t1".to_string(),
                    title: "Pick a project".to_string(),
                    completed: false,
                }],
            }],
        })
    }
}

struct FailingGenerator;

#[async_trait]
impl RoadmapGenerator for FailingGenerator {
    async fn generate(&self, _user: &User) -> Result<Roadmap, AppError> {
        Err(AppError::Unavailable("AI service returned 500".to_string()))
    }
}

struct SlowGenerator;

#[async_trait]
impl RoadmapGenerator for SlowGenerator {
    async fn generate(&self, user: &User) -> Result<Roadmap, AppError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        FixedGenerator.generate(user).await
    }
}

async fn complete_task(server: &TestServer, user_id: &str, task_id: &str, completed: bool) -> Value {
    let response = server
        .put(&format!("/api/roadmap/{user_id}/task"))
        .json(&json!({ "taskId": task_id, "completed": completed }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/api/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = create_test_server();

    let response = server.get("/api/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_login_with_seeded_account() {
    let server = create_test_server();

    let response = server
        .post("/api/login")
        .json(&json!({ "email": "sarah@mentorbridge.com", "password": "mentor123" }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["user"]["id"], "m1");
    assert_eq!(body["user"]["role"], "mentor");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = create_test_server();

    for credentials in [
        json!({ "email": "sarah@mentorbridge.com", "password": "wrong" }),
        json!({ "email": "nobody@mentorbridge.com", "password": "mentor123" }),
        json!({}),
    ] {
        let response = server.post("/api/login").json(&credentials).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_signup_then_login() {
    let server = create_test_server();

    let response = server
        .post("/api/signup")
        .json(&json!({
            "email": "riley@example.com",
            "password": "secret",
            "role": "mentee",
            "name": "Riley",
            "skills": ["Rust", { "name": "Go", "level": 2 }],
            "learningGoals": "Ship a CLI"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let user = response.json::<Value>()["user"].clone();
    assert_eq!(user["id"], "e7");
    assert_eq!(user["learningGoals"], "Ship a CLI");
    assert_eq!(user["skills"][0], json!({ "name": "Rust", "level": 1 }));
    assert_eq!(user["skills"][1], json!({ "name": "Go", "level": 2 }));

    server
        .post("/api/login")
        .json(&json!({ "email": "riley@example.com", "password": "secret" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_signup_validation() {
    let server = create_test_server();

    for request in [
        json!({ "password": "secret", "role": "mentee" }),
        json!({ "email": "x@example.com", "role": "mentee" }),
        json!({ "email": "x@example.com", "password": "secret" }),
        json!({ "email": "x@example.com", "password": "secret", "role": "admin" }),
        json!({ "email": "not-an-email", "password": "secret", "role": "mentee" }),
    ] {
        server
            .post("/api/signup")
            .json(&request)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    server
        .post("/api/signup")
        .json(&json!({ "email": "alex@mentorbridge.com", "password": "x", "role": "mentee" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_users_by_role() {
    let server = create_test_server();

    let response = server.get("/api/users").add_query_param("role", "mentor").await;
    response.assert_status_ok();
    let mentors = response.json::<Vec<Value>>();
    assert_eq!(mentors.len(), 3);
    assert!(mentors.iter().all(|m| m["role"] == "mentor"));

    let grouped = server.get("/api/users").await.json::<Value>();
    assert_eq!(grouped["mentees"].as_array().map(Vec::len), Some(3));

    server
        .get("/api/users")
        .add_query_param("role", "admin")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile() {
    let server = create_test_server();

    let response = server
        .put("/api/users/e2")
        .json(&json!({ "motto": "One model a week", "id": "hijack" }))
        .await;
    response.assert_status_ok();
    let user = response.json::<Value>();
    assert_eq!(user["id"], "e2");
    assert_eq!(user["motto"], "One model a week");
    assert_eq!(user["name"], "Jordan Lee");

    server
        .put("/api/users/nobody")
        .json(&json!({ "motto": "?" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_and_lookup_mentor() {
    let server = create_test_server();

    let seeded = server.get("/api/assignments/e1").await.json::<Value>();
    assert_eq!(seeded["mentorId"], "m1");
    assert_eq!(seeded["mentor"]["name"], "Sarah Chen");

    let response = server
        .post("/api/assign-mentor")
        .json(&json!({ "menteeId": "e1", "mentorId": "m3" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["assignments"]["e1"], "m3");

    let mentees = server.get("/api/mentees/m3").await.json::<Vec<Value>>();
    let ids: Vec<&str> = mentees.iter().filter_map(|m| m["id"].as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2"]);
    assert!(server.get("/api/mentees/m1").await.json::<Vec<Value>>().is_empty());

    let unassigned = server.get("/api/assignments/e9").await.json::<Value>();
    assert_eq!(unassigned["mentorId"], Value::Null);

    server
        .post("/api/assign-mentor")
        .json(&json!({ "menteeId": "e1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mentees_report_roadmap_completion() {
    let server = create_test_server();

    for task in ["w1t1", "w1t2", "w1t3"] {
        complete_task(&server, "e1", task, true).await;
    }

    let mentees = server.get("/api/mentees/m1").await.json::<Vec<Value>>();
    assert_eq!(mentees.len(), 1);
    assert_eq!(mentees[0]["id"], "e1");
    assert_eq!(mentees[0]["roadmapCompletion"], "25%");
}

#[tokio::test]
async fn test_roadmap_starts_from_template() {
    let server = create_test_server();

    let roadmap = server.get("/api/roadmap/e3").await.json::<Value>();
    assert_eq!(roadmap["weeks"].as_array().map(Vec::len), Some(4));
    assert_eq!(roadmap["progress"]["completionPercent"], 0);
    assert_eq!(roadmap["progress"]["allComplete"], false);
    assert_eq!(roadmap["progress"]["weeks"][0]["status"], "in-progress");
    assert_eq!(roadmap["progress"]["weeks"][1]["status"], "upcoming");
}

#[tokio::test]
async fn test_task_toggle_and_completion_edge() {
    let server = create_test_server();

    let tasks: Vec<String> = (1..=4)
        .flat_map(|w| (1..=3).map(move |t| format!("w{w}t{t}")))
        .collect();

    let (last, rest) = tasks.split_last().unwrap();
    for task in rest {
        let body = complete_task(&server, "e2", task, true).await;
        assert_eq!(body["justCompleted"], false);
    }

    let body = complete_task(&server, "e2", last, true).await;
    assert_eq!(body["justCompleted"], true);
    assert_eq!(body["progress"]["completionPercent"], 100);
    assert_eq!(body["progress"]["allComplete"], true);

    // Already complete; no second edge.
    let body = complete_task(&server, "e2", last, true).await;
    assert_eq!(body["justCompleted"], false);

    let body = complete_task(&server, "e2", "w1t1", false).await;
    assert_eq!(body["progress"]["allComplete"], false);
    assert_eq!(body["progress"]["completionPercent"], 92);

    // Other users are untouched.
    let other = server.get("/api/roadmap/e1").await.json::<Value>();
    assert_eq!(other["progress"]["completionPercent"], 0);
}

#[tokio::test]
async fn test_task_update_errors() {
    let server = create_test_server();

    server
        .put("/api/roadmap/e1/task")
        .json(&json!({ "taskId": "w9t9", "completed": true }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .put("/api/roadmap/e1/task")
        .json(&json!({ "taskId": "w1t1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let roadmap = server.get("/api/roadmap/e1").await.json::<Value>();
    assert_eq!(roadmap["progress"]["completionPercent"], 0);
}

#[tokio::test]
async fn test_roadmap_requires_known_user() {
    let server = create_test_server();

    let response = server.get("/api/roadmap/no-such-user").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], false);

    server
        .put("/api/roadmap/no-such-user/task")
        .json(&json!({ "taskId": "w1t1", "completed": true }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mistyped_bodies_are_bad_requests() {
    let server = create_test_server();

    let response = server
        .post("/api/feedback")
        .json(&json!({ "fromUserId": "e1", "toUserId": "m1", "type": 5, "rating": 4 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);

    let response = server
        .put("/api/roadmap/e1/task")
        .json(&json!({ "taskId": "w1t1", "completed": "yes" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let roadmap = server.get("/api/roadmap/e1").await.json::<Value>();
    assert_eq!(roadmap["progress"]["completionPercent"], 0);
    assert!(server
        .get("/api/feedback/received/m1")
        .await
        .json::<Vec<Value>>()
        .is_empty());
}

#[tokio::test]
async fn test_chat_threads_are_shared_by_pair() {
    let server = create_test_server();

    server
        .post("/api/chat")
        .json(&json!({ "senderId": "e1", "receiverId": "m1", "text": "Hi Sarah" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/chat")
        .json(&json!({ "senderId": "m1", "receiverId": "e1", "text": "Hi Alex" }))
        .await
        .assert_status(StatusCode::CREATED);

    let thread = server
        .get("/api/chat")
        .add_query_param("userId", "m1")
        .add_query_param("partnerId", "e1")
        .await
        .json::<Vec<Value>>();
    let texts: Vec<&str> = thread.iter().filter_map(|m| m["text"].as_str()).collect();
    assert_eq!(texts, vec!["Hi Sarah", "Hi Alex"]);

    let empty = server
        .get("/api/chat")
        .add_query_param("userId", "e2")
        .add_query_param("partnerId", "m3")
        .await
        .json::<Vec<Value>>();
    assert!(empty.is_empty());

    server
        .post("/api/chat")
        .json(&json!({ "senderId": "e1", "receiverId": "m1", "text": "  " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/chat")
        .add_query_param("userId", "e1")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_submission_and_queries() {
    let server = create_test_server();

    let response = server
        .post("/api/feedback")
        .json(&json!({
            "fromUserId": "e1",
            "toUserId": "m1",
            "type": "mentee-to-mentor",
            "rating": 9,
            "comment": "  Great sessions  ",
            "trigger": "match"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let entry = response.json::<Value>();
    assert_eq!(entry["rating"], 5);
    assert_eq!(entry["comment"], "Great sessions");
    assert_eq!(entry["trigger"], "match");
    assert!(entry["id"].as_str().is_some_and(|id| id.starts_with("fb_")));

    let response = server
        .post("/api/feedback")
        .json(&json!({
            "fromUserId": "m1",
            "toUserId": "e1",
            "type": "mentor-to-mentee",
            "rating": "0"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["rating"], 1);

    let received = server
        .get("/api/feedback/received/m1")
        .await
        .json::<Vec<Value>>();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["fromUserId"], "e1");

    let check = |from: &'static str, to: &'static str, kind: &'static str| {
        server
            .get("/api/feedback/check")
            .add_query_param("fromUserId", from)
            .add_query_param("toUserId", to)
            .add_query_param("type", kind)
    };
    assert_eq!(check("e1", "m1", "mentee-to-mentor").await.json::<Value>()["exists"], true);
    assert_eq!(check("e1", "m1", "mentor-to-mentee").await.json::<Value>()["exists"], false);
    assert_eq!(check("e2", "m3", "mentee-to-mentor").await.json::<Value>()["exists"], false);
    assert_eq!(check("e1", "m1", "sideways").await.json::<Value>()["exists"], false);
}

#[tokio::test]
async fn test_feedback_requires_fields() {
    let server = create_test_server();

    for submission in [
        json!({ "toUserId": "m1", "type": "mentee-to-mentor", "rating": 4 }),
        json!({ "fromUserId": "e1", "type": "mentee-to-mentor", "rating": 4 }),
        json!({ "fromUserId": "e1", "toUserId": "m1", "rating": 4 }),
        json!({ "fromUserId": "e1", "toUserId": "m1", "type": "sideways", "rating": 4 }),
        json!({ "fromUserId": "e1", "toUserId": "m1", "type": "mentee-to-mentor" }),
    ] {
        server
            .post("/api/feedback")
            .json(&submission)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    assert!(server
        .get("/api/feedback/received/m1")
        .await
        .json::<Vec<Value>>()
        .is_empty());
}

#[tokio::test]
async fn test_ai_roadmap_without_generator_uses_template() {
    let server = create_test_server();

    let body = server.get("/api/ai-roadmap/e1").await.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "template");
    assert_eq!(body["roadmap"]["weeks"].as_array().map(Vec::len), Some(4));

    server
        .get("/api/ai-roadmap/nobody")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ai_roadmap_from_generator() {
    let server = server_with_generator(Arc::new(FixedGenerator));

    let response = server.get("/api/ai-roadmap/e2").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["source"], "ai");
    assert_eq!(body["roadmap"]["weeks"][0]["title"], "Plan for Jordan Lee");

    // Generated roadmaps are not stored.
    let stored = server.get("/api/roadmap/e2").await.json::<Value>();
    assert_eq!(stored["weeks"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_ai_roadmap_falls_back_on_failure() {
    let server = server_with_generator(Arc::new(FailingGenerator));

    complete_task(&server, "e3", "w1t1", true).await;

    let response = server.get("/api/ai-roadmap/e3").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["source"], "template");
    assert_eq!(body["roadmap"]["weeks"][0]["tasks"][0]["completed"], true);
}

#[tokio::test]
async fn test_ai_roadmap_falls_back_on_timeout() {
    let server = server_with_generator(Arc::new(SlowGenerator));

    let response = server.get("/api/ai-roadmap/e1").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["source"], "template");
}

#[tokio::test]
async fn test_skill_gap_against_assigned_mentor() {
    let server = create_test_server();

    server
        .put("/api/users/m1")
        .json(&json!({ "skills": { "React": 4, "TypeScript": 3 } }))
        .await
        .assert_status_ok();

    let response = server.get("/api/skill-gap/e1").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["mentorId"], "m1");
    assert_eq!(
        body["skills"],
        json!([
            { "name": "JavaScript", "menteeLevel": 1, "mentorLevel": 0, "gap": 0 },
            { "name": "React", "menteeLevel": 1, "mentorLevel": 4, "gap": 3 }
        ])
    );

    server
        .get("/api/skill-gap/m1")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .post("/api/signup")
        .json(&json!({ "email": "solo@example.com", "password": "x", "role": "mentee" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .get("/api/skill-gap/e7")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_demo_recommendations() {
    let server = create_test_server();

    // Seeded mentees share at most one skill with any mentor.
    let body = server.get("/api/demo-recommend/e1").await.json::<Value>();
    assert_eq!(body["mentee"]["id"], "e1");
    assert_eq!(body["recommendedMentors"], json!([]));

    server
        .put("/api/users/e1")
        .json(&json!({ "skills": ["React", "TypeScript"] }))
        .await
        .assert_status_ok();

    let body = server.get("/api/demo-recommend/e1").await.json::<Value>();
    let ids: Vec<&str> = body["recommendedMentors"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["m1"]);

    server
        .get("/api/demo-recommend/m1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
