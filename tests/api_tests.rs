mod test_user;

use jobboard_backend::entities::{
    company::Company,
    job::{Job, JobListResponse},
    token::AuthResponse,
    user::Role,
};
use reqwest::{multipart, Method, StatusCode};
use serde_json::{json, Value};
use test_user::*;
use test_utils::*;
use uuid::Uuid;

struct Board {
    app: TestApp,
    admin_token: String,
    company_id: Uuid,
    company_token: String,
}

/// A running server with one platform admin and one registered company.
async fn board() -> Board {
    let app = TestApp::spawn().await;
    let admin = app.ctx.store.seed_user("Platform Admin", "admin@jobboard.test", Role::Admin, None);
    let admin_token = app.ctx.token_for(&admin);

    let response = app
        .send_json(
            Method::POST,
            "/api/v1/auth/register-company",
            None,
            &serde_json::to_value(valid_company("Acme", "hr@acme.test")).unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let company_id: Uuid = body["company_id"].as_str().unwrap().parse().unwrap();

    let auth = login(&app, "hr@acme.test").await;

    Board {
        app,
        admin_token,
        company_id,
        company_token: auth.access_token,
    }
}

async fn login(app: &TestApp, email: &str) -> AuthResponse {
    let response = app
        .send_json(
            Method::POST,
            "/api/v1/auth/login",
            None,
            &serde_json::to_value(login_for(email)).unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

async fn seeker_token(app: &TestApp, email: &str) -> String {
    let response = app
        .send_json(
            Method::POST,
            "/api/v1/auth/register",
            None,
            &serde_json::to_value(valid_seeker(email)).unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    login(app, email).await.access_token
}

async fn approve_company(board: &Board) {
    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/companies/{}/status", board.company_id),
            Some(&board.admin_token),
            &json!({ "status": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn post_job(board: &Board) -> reqwest::Response {
    board
        .app
        .send_json(
            Method::POST,
            "/api/v1/jobs",
            Some(&board.company_token),
            &serde_json::to_value(valid_job("Backend Engineer")).unwrap(),
        )
        .await
}

async fn approved_job(board: &Board) -> Job {
    approve_company(board).await;
    let created: Job = post_job(board).await.json().await.unwrap();

    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/jobs/{}/status", created.id),
            Some(&board.admin_token),
            &json!({ "status": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[actix_rt::test]
async fn home_and_health_are_public() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/", None).await.status(), StatusCode::OK);

    let response = app.get("/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");
}

#[actix_rt::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/api/v1/users/me", None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/v1/users/me", Some("not-a-jwt")).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let response = app
        .send_json(Method::POST, "/api/v1/bookmarks", None, &json!({ "job_id": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn refresh_tokens_are_not_access_tokens() {
    let app = TestApp::spawn().await;
    seeker_token(&app, "seeker@example.com").await;
    let auth = login(&app, "seeker@example.com").await;

    let response = app.get("/api/v1/users/me", Some(&auth.refresh_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send_json(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            &json!({ "refresh_token": auth.refresh_token }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed: AuthResponse = response.json().await.unwrap();

    let response = app.get("/api/v1/users/me", Some(&refreshed.access_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["email"], "seeker@example.com");
    assert_eq!(me["role"], "JOB_SEEKER");
    assert!(me.get("password_hash").is_none());
}

#[actix_rt::test]
async fn admin_routes_reject_other_roles() {
    let board = board().await;

    let response = board.app.get("/api/v1/admin/dashboard", Some(&board.company_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = board.app.get("/api/v1/admin/dashboard", Some(&board.admin_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard: Value = response.json().await.unwrap();
    assert_eq!(dashboard["companies"]["pending"], 1);

    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/companies/{}/status", board.company_id),
            Some(&board.company_token),
            &json!({ "status": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = board.app.get("/api/v1/companies", Some(&board.company_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn company_status_endpoint_validates_input() {
    let board = board().await;

    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/companies/{}/status", board.company_id),
            Some(&board.admin_token),
            &json!({ "status": "ARCHIVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "status");

    let response = board
        .app
        .send_json(
            Method::PATCH,
            "/api/v1/companies/not-a-uuid/status",
            Some(&board.admin_token),
            &json!({ "status": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/companies/{}/status", Uuid::new_v4()),
            Some(&board.admin_token),
            &json!({ "status": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn job_posting_follows_company_approval() {
    let board = board().await;

    let response = post_job(&board).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    approve_company(&board).await;
    let response = board.app.get("/api/v1/companies", Some(&board.admin_token)).await;
    let companies: Vec<Company> = response.json().await.unwrap();
    assert_eq!(companies.len(), 1);

    let response = post_job(&board).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job: Job = response.json().await.unwrap();
    assert_eq!(job.company_id, board.company_id);

    let listing: JobListResponse = board.app.get("/api/v1/jobs", None).await.json().await.unwrap();
    assert!(listing.jobs.is_empty());
    let response = board.app.get(&format!("/api/v1/jobs/{}", job.id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn approved_jobs_are_readable_without_a_token() {
    let board = board().await;
    let job = approved_job(&board).await;

    let listing: JobListResponse = board.app.get("/api/v1/jobs", None).await.json().await.unwrap();
    assert_eq!(listing.jobs.len(), 1);

    let response = board.app.get(&format!("/api/v1/jobs/{}", job.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A stale token on a public route is ignored rather than rejected.
    let response = board.app.get("/api/v1/jobs", Some("expired.token.value")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = board.app.get(&format!("/api/v1/jobs/{}/applications", job.id), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn duplicate_application_returns_conflict() {
    let board = board().await;
    let job = approved_job(&board).await;
    let token = seeker_token(&board.app, "seeker@example.com").await;
    let payload = serde_json::to_value(valid_application(job.id)).unwrap();

    let first = board
        .app
        .send_json(Method::POST, "/api/v1/applications", Some(&token), &payload)
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let created: Value = first.json().await.unwrap();
    let application_id = created["id"].as_str().unwrap().to_string();

    let second = board
        .app
        .send_json(Method::POST, "/api/v1/applications", Some(&token), &payload)
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let response = board
        .app
        .send_json(
            Method::PATCH,
            &format!("/api/v1/applications/{}/status", application_id),
            Some(&board.company_token),
            &json!({ "status": "Reviewed" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mine: Vec<Value> = board
        .app
        .get("/api/v1/applications/me", Some(&token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["status"], "Reviewed");

    let for_job: Vec<Value> = board
        .app
        .get(&format!("/api/v1/jobs/{}/applications", job.id), Some(&board.company_token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(for_job.len(), 1);
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let board = board().await;

    let response = board
        .app
        .client
        .post(board.app.url("/api/v1/jobs"))
        .bearer_auth(&board.company_token)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("JSON payload error"));
}

#[actix_rt::test]
async fn bookmark_toggle_reports_created_then_removed() {
    let board = board().await;
    let job = approved_job(&board).await;
    let token = seeker_token(&board.app, "seeker@example.com").await;
    let payload = json!({ "job_id": job.id });

    let first = board
        .app
        .send_json(Method::POST, "/api/v1/bookmarks", Some(&token), &payload)
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(first.json::<Value>().await.unwrap()["bookmarked"], true);

    let listed: Vec<Job> = board.app.get("/api/v1/bookmarks", Some(&token)).await.json().await.unwrap();
    assert_eq!(listed.len(), 1);

    let second = board
        .app
        .send_json(Method::POST, "/api/v1/bookmarks", Some(&token), &payload)
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.json::<Value>().await.unwrap()["bookmarked"], false);

    let missing = board
        .app
        .send_json(Method::POST, "/api/v1/bookmarks", Some(&token), &json!({}))
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn admin_can_delete_jobs_and_companies() {
    let board = board().await;
    let job = approved_job(&board).await;

    let response = board
        .app
        .client
        .delete(board.app.url(&format!("/api/v1/jobs/{}", job.id)))
        .bearer_auth(&board.admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = board
        .app
        .client
        .delete(board.app.url(&format!("/api/v1/companies/{}", board.company_id)))
        .bearer_auth(&board.admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!board.app.ctx.store.company_exists(&board.company_id));
    assert!(!board.app.ctx.store.job_exists(&job.id));

    let response = board
        .app
        .send_json(
            Method::POST,
            "/api/v1/auth/login",
            None,
            &serde_json::to_value(login_for("hr@acme.test")).unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn logo_upload_is_public_and_sniffs_content() {
    let app = TestApp::spawn().await;
    let png: Vec<u8> = vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    ];

    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(png).file_name("logo.png"),
    );
    let response = app
        .client
        .post(app.url("/api/v1/uploads?kind=logo"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "logo");
    assert!(body["url"].as_str().unwrap().starts_with("https://blobs.test/ipfs/"));

    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(b"%PDF-1.7\n".to_vec()).file_name("cv.pdf"),
    );
    let response = app
        .client
        .post(app.url("/api/v1/uploads?kind=resume"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(b"plain text".to_vec()).file_name("notes.txt"),
    );
    let response = app
        .client
        .post(app.url("/api/v1/uploads?kind=logo"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
