pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::{handlers, pages};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser form
        .route("/", get(pages::handle_index))
        .route("/generate", post(pages::handle_generate_form))
        // Downloads
        .route("/resumes/:id/preview", get(handlers::handle_preview))
        .route("/resumes/:id/pdf", get(handlers::handle_download_pdf))
        // Resume API
        .route("/api/v1/resumes", post(handlers::handle_generate))
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::testing::{fenced_resume_reply, StubModel};

    fn app_with(model: StubModel) -> (Router, AppState) {
        let state = AppState::new(Arc::new(model));
        (build_router(state.clone()), state)
    }

    fn jane_json() -> Value {
        json!({
            "target_role": "Backend Engineer",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "education": "B.S. in Computer Science, State University, 2020",
            "skills": "Rust, PostgreSQL, Docker",
            "projects": "ResumeCraft - generates PDF resumes",
            "template": "modern",
            "accent_color": "#336699"
        })
    }

    const JANE_FORM: &str = "target_role=Backend+Engineer&name=Jane+Doe&email=jane%40example.com\
        &education=B.S.+in+Computer+Science%2C+State+University%2C+2020\
        &skills=Rust%2C+PostgreSQL&projects=ResumeCraft&experience=\
        &template=compact&accent_color=%23336699";

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn body_text(response: Response) -> String {
        String::from_utf8(body_bytes(response).await).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(StubModel::replying("unused"));
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "resumecraft");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let (app, _) = app_with(StubModel::replying("unused"));
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("<form method=\"post\" action=\"/generate\">"));
    }

    #[tokio::test]
    async fn test_api_generate_then_download_pdf() {
        let (app, _) = app_with(StubModel::replying(fenced_resume_reply()));

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/resumes", &jane_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["filename"], "Jane_Doe_Resume.pdf");
        assert_eq!(body["resume"]["name"], "Jane Doe");
        assert_eq!(body["template"], "modern");
        assert_eq!(body["accent_color"], "#336699");
        assert!(body["html"].as_str().unwrap().contains("#336699"));

        let pdf_url = body["pdf_url"].as_str().unwrap().to_string();
        let response = app.clone().oneshot(get_request(&pdf_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_Resume.pdf\"; filename*=UTF-8''Jane_Doe_Resume.pdf"
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF"));

        let session_id = body["session_id"].as_str().unwrap();
        let response = app
            .oneshot(get_request(&format!("/api/v1/resumes/{session_id}")))
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["status"], "ready");
        assert_eq!(status["filename"], "Jane_Doe_Resume.pdf");
    }

    #[tokio::test]
    async fn test_api_unparsable_output_returns_raw_text() {
        let reply = "Sorry, I can only chat about resumes in general.";
        let (app, state) = app_with(StubModel::replying(reply));

        let response = app
            .oneshot(post_json("/api/v1/resumes", &jane_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNPARSABLE_OUTPUT");
        assert_eq!(body["error"]["raw_output"], reply);

        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_api_missing_field_is_bad_request() {
        let model = StubModel::replying(fenced_resume_reply());
        let (app, _) = app_with(model);
        let mut request = jane_json();
        request["skills"] = json!("   ");

        let response = app
            .oneshot(post_json("/api/v1/resumes", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]["message"].as_str().unwrap().contains("skills"));
    }

    #[tokio::test]
    async fn test_api_absent_field_is_json_validation_error() {
        let model = Arc::new(StubModel::replying(fenced_resume_reply()));
        let app = build_router(AppState::new(model.clone()));
        let mut request = jane_json();
        request.as_object_mut().unwrap().remove("name");

        let response = app
            .oneshot(post_json("/api/v1/resumes", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("name"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_undecodable_body_is_json_validation_error() {
        let (app, _) = app_with(StubModel::replying(fenced_resume_reply()));
        let mut request = jane_json();
        request["template"] = json!("fancy");

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/resumes", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resumes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_model_failure_is_bad_gateway() {
        let (app, _) = app_with(StubModel::failing(401, "invalid x-api-key"));
        let response = app
            .oneshot(post_json("/api/v1/resumes", &jane_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_form_generate_shows_preview_and_download() {
        let (app, _) = app_with(StubModel::replying(fenced_resume_reply()));
        let response = app.oneshot(post_form("/generate", JANE_FORM)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains("Your resume is ready"));
        assert!(page.contains("download=\"Jane_Doe_Resume.pdf\""));
        assert!(page.contains("<iframe"));
    }

    #[tokio::test]
    async fn test_form_without_json_shows_error_and_raw_output() {
        let reply = "Here are five tips for a great resume.";
        let (app, state) = app_with(StubModel::replying(reply));
        let response = app
            .clone()
            .oneshot(post_form("/generate", JANE_FORM))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains("Could not generate your resume."));
        assert!(page.contains(reply));
        assert!(page.contains("value=\"Jane Doe\""));
        assert!(!page.contains("Your resume is ready"));

        // No PDF is offered for the failed session.
        assert_eq!(state.sessions.len(), 1);
        let action_start = page.find("/generate?session=").unwrap() + "/generate?session=".len();
        let session_id = &page[action_start..action_start + 36];
        let response = app
            .oneshot(get_request(&format!("/resumes/{session_id}/pdf")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_form_undecodable_submission_shows_error_inline() {
        let (app, state) = app_with(StubModel::replying(fenced_resume_reply()));
        let response = app
            .oneshot(post_form("/generate", "name=Jane+Doe&template=fancy"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains("Could not generate your resume."));
        assert!(page.contains("<form method=\"post\" action=\"/generate\">"));
        assert_eq!(state.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_form_absent_fields_listed_inline() {
        let (app, _) = app_with(StubModel::replying(fenced_resume_reply()));
        let response = app
            .oneshot(post_form("/generate", "name=Jane+Doe"))
            .await
            .unwrap();

        let page = body_text(response).await;
        assert!(page.contains("Please fill in: target_role, email, education, skills, projects"));
        assert!(page.contains("value=\"Jane Doe\""));
    }

    #[tokio::test]
    async fn test_form_regenerate_reuses_session() {
        let model = Arc::new(StubModel::replying(fenced_resume_reply()));
        let state = AppState::new(model.clone());
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(post_form("/generate", JANE_FORM))
            .await
            .unwrap();
        let page = body_text(response).await;
        let marker = "action=\"/generate?session=";
        let start = page.find(marker).unwrap() + marker.len();
        let session_id = page[start..start + 36].to_string();

        let response = app
            .clone()
            .oneshot(post_form(
                &format!("/generate?session={session_id}"),
                JANE_FORM,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Your resume is ready"));
        assert!(page.contains(&format!("/resumes/{session_id}/pdf")));

        assert_eq!(model.calls(), 2);
        assert_eq!(state.sessions.len(), 1);
        let response = app
            .oneshot(get_request(&format!("/api/v1/resumes/{session_id}")))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn test_unknown_session_download_is_not_found() {
        let (app, _) = app_with(StubModel::replying("unused"));
        let response = app
            .oneshot(get_request(&format!("/resumes/{}/pdf", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, state) = app_with(StubModel::replying("unused"));
        let id = state.sessions.create();
        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/resumes/{id}"))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = app.oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
