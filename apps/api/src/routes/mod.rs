pub mod candidates;
pub mod health;
pub mod jobs;
pub mod request_id;
pub mod skills;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

pub(crate) fn message(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/jobs", get(jobs::list_jobs).post(jobs::insert_job))
        .route(
            "/jobs/:id",
            get(jobs::find_job)
                .put(jobs::force_insert_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/candidates",
            get(candidates::list_candidates).post(candidates::insert_candidate),
        )
        .route(
            "/candidates/:id",
            get(candidates::find_candidate)
                .put(candidates::force_insert_candidate)
                .delete(candidates::delete_candidate),
        )
        .route(
            "/candidates/:id/apply/jobs/:job_id",
            post(candidates::apply_candidate),
        )
        .route("/skills", get(skills::list_skills));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id::track_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn app() -> Router {
        build_router(AppState::new(Arc::new(MemoryStore::new())))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn engineer() -> Value {
        json!({"title": "Engineer", "salary": 90000, "description": "Build things"})
    }

    #[tokio::test]
    async fn test_job_lifecycle_scenario() {
        let app = app();

        let res = send(&app, Method::POST, "/api/jobs", Some(engineer())).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(json_body(res).await["message"], "Job added successfully");

        let res = send(&app, Method::GET, "/api/jobs", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        let jobs = body["data"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["title"], "Engineer");
        assert_eq!(jobs[0]["salary"], 90000);
        assert_eq!(jobs[0]["description"], "Build things");
        let id = jobs[0]["id"].as_i64().unwrap();

        let res = send(&app, Method::GET, &format!("/api/jobs/{id}"), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["data"]["candidates"], json!([]));

        let res = send(&app, Method::DELETE, &format!("/api/jobs/{id}"), None).await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);

        let res = send(&app, Method::GET, &format!("/api/jobs/{id}"), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_duplicate_job_title_is_bad_request() {
        let app = app();
        send(&app, Method::POST, "/api/jobs", Some(engineer())).await;
        let res = send(&app, Method::POST, "/api/jobs", Some(engineer())).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_invalid_job_body_reports_fields() {
        let app = app();
        let res = send(&app, Method::POST, "/api/jobs", Some(json!({"salary": "lots"}))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["fields"]["title"],
            json!(["Missing data for required field."])
        );
        assert_eq!(body["error"]["fields"]["salary"], json!(["Not a valid integer."]));

        let res = send(&app, Method::GET, "/api/jobs", None).await;
        assert_eq!(json_body(res).await["data"], json!([]));
    }

    #[tokio::test]
    async fn test_put_job_creates_then_overwrites() {
        let app = app();
        let res = send(&app, Method::PUT, "/api/jobs/42", Some(engineer())).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let replacement = json!({"title": "Staff Engineer", "salary": 120000});
        let res = send(&app, Method::PUT, "/api/jobs/42", Some(replacement)).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = json_body(send(&app, Method::GET, "/api/jobs/42", None).await).await;
        assert_eq!(body["data"]["title"], "Staff Engineer");
        assert_eq!(body["data"]["salary"], 120000);
        assert_eq!(body["data"]["description"], Value::Null);

        let body = json_body(send(&app, Method::GET, "/api/jobs", None).await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_candidates_share_skills() {
        let app = app();
        let first = json!({"full_name": "Ada", "expected_salary": 100, "skills": ["Python", "Go"]});
        let second =
            json!({"full_name": "Linus", "expected_salary": 200, "skills": ["Python", "Rust"]});
        assert_eq!(
            send(&app, Method::POST, "/api/candidates", Some(first)).await.status(),
            StatusCode::CREATED
        );
        assert_eq!(
            send(&app, Method::POST, "/api/candidates", Some(second)).await.status(),
            StatusCode::CREATED
        );

        let body = json_body(send(&app, Method::GET, "/api/skills", None).await).await;
        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Python", "Go", "Rust"]);

        let body = json_body(send(&app, Method::GET, "/api/candidates", None).await).await;
        let candidates = body["data"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["full_name"], "Ada");
        assert_eq!(candidates[0]["skills"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_put_candidate_replaces_skills() {
        let app = app();
        let initial = json!({"full_name": "Ada", "expected_salary": 1, "skills": ["Cobol", "Sql"]});
        send(&app, Method::PUT, "/api/candidates/7", Some(initial)).await;
        let replaced = json!({"full_name": "Ada", "expected_salary": 2, "skills": ["Sql", "Zig"]});
        let res = send(&app, Method::PUT, "/api/candidates/7", Some(replaced)).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = json_body(send(&app, Method::GET, "/api/candidates/7", None).await).await;
        let mut titles: Vec<&str> = body["data"]["skills"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["title"].as_str().unwrap())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Sql", "Zig"]);
        assert_eq!(body["data"]["expected_salary"], 2);
    }

    #[tokio::test]
    async fn test_apply_candidate_flow() {
        let app = app();
        send(&app, Method::PUT, "/api/jobs/1", Some(engineer())).await;
        send(
            &app,
            Method::PUT,
            "/api/candidates/5",
            Some(json!({"full_name": "Ada", "expected_salary": 1})),
        )
        .await;

        let res = send(&app, Method::POST, "/api/candidates/5/apply/jobs/1", None).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = send(&app, Method::POST, "/api/candidates/5/apply/jobs/1", None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = send(&app, Method::POST, "/api/candidates/6/apply/jobs/1", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = send(&app, Method::POST, "/api/candidates/5/apply/jobs/2", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body = json_body(send(&app, Method::GET, "/api/jobs/1", None).await).await;
        assert_eq!(body["data"]["candidates"][0]["full_name"], "Ada");

        let res = send(&app, Method::DELETE, "/api/candidates/5", None).await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let res = send(&app, Method::DELETE, "/api/candidates/5", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_integer_path_id_rejected() {
        let app = app();
        let res = send(&app, Method::GET, "/api/jobs/abc", None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed_or_generated() {
        let app = app();
        let request = Request::builder()
            .uri("/health")
            .header("X-Request-ID", "abc-123")
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(request).await.unwrap();
        assert_eq!(res.headers()["x-request-id"], "abc-123");

        let res = send(&app, Method::GET, "/health", None).await;
        let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
        assert_eq!(generated.len(), 36);
        let body = json_body(res).await;
        assert_eq!(body["database"], "ok");
        assert!(body["time"].as_str().unwrap().ends_with('Z'));
    }
}
