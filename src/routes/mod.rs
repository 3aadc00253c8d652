use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
};
use tower_http::services::ServeDir;

use crate::{error::AppError, state::SharedState};

/// Swagger UI and the OpenAPI document.
pub mod docs;
/// `POST /feedback`.
pub mod feedback;
/// `POST /generate_harmony`.
pub mod harmony;
/// `GET /healthcheck`.
pub mod health;
/// `GET /generate` and `GET /liked_palettes`.
pub mod palettes;
/// `POST /upload`.
pub mod upload;

/// Compose all route trees, wiring in shared state, uploaded files and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(palettes::router())
        .merge(feedback::router())
        .merge(upload::router(state.config().max_upload_bytes))
        .merge(harmony::router());

    let docs_router = docs::router(state.clone());
    let uploads = ServeDir::new(&state.config().upload_dir);

    api_router
        .merge(docs_router)
        .nest_service("/uploads", uploads)
        .with_state(state)
}

/// Unwrap a JSON body, turning extractor rejections into `400 {error}` responses.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig, engine::extractor::tests::split_png,
        services::test_support::memory_state,
    };

    const BOUNDARY: &str = "swatchwise-form-boundary";

    async fn app(config: AppConfig) -> Router {
        router(memory_state(config).await)
    }

    fn json_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn upload_request(field: &str, file: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"dusk.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn malformed_feedback_json_is_bad_request_with_error_body() {
        let response = app(AppConfig::default())
            .await
            .oneshot(json_request("/feedback", r#"{"palette_id": 1, "feedback": "#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn unsupported_feedback_value_is_bad_request() {
        let body = json!({"palette_id": 1, "feedback": "meh"}).to_string();
        let response = app(AppConfig::default())
            .await
            .oneshot(json_request("/feedback", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn feedback_for_unknown_palette_is_not_found() {
        let body = json!({"palette_id": 4242, "feedback": "like"}).to_string();
        let response = app(AppConfig::default())
            .await
            .oneshot(json_request("/feedback", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error = body_json(response).await["error"].as_str().unwrap().to_owned();
        assert!(error.contains("4242"), "{error}");
    }

    #[tokio::test]
    async fn generated_palette_accepts_feedback() {
        let app = app(AppConfig::default()).await;

        let generated = app
            .clone()
            .oneshot(Request::get("/generate").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(generated.status(), StatusCode::OK);
        let generated = body_json(generated).await;
        assert_eq!(generated["colors"].as_array().unwrap().len(), 5);
        assert!(generated["proba"].is_null());

        let vote = json!({"palette_id": generated["palette_id"], "feedback": "dislike"});
        let response = app
            .oneshot(json_request("/feedback", vote.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Feedback received");
    }

    #[tokio::test]
    async fn malformed_harmony_json_is_bad_request() {
        let response = app(AppConfig::default())
            .await
            .oneshot(json_request("/generate_harmony", "base_color=#FF0000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_harmony_scheme_is_bad_request() {
        let body = json!({"base_color": "#FF0000", "scheme": "pentad"}).to_string();
        let response = app(AppConfig::default())
            .await
            .oneshot(json_request("/generate_harmony", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn upload_without_image_field_is_bad_request() {
        let response = app(AppConfig::default())
            .await
            .oneshot(upload_request("photo", &split_png([0, 0, 0], [255, 255, 255])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await["error"].as_str().unwrap().to_owned();
        assert!(error.contains("image"), "{error}");
    }

    #[tokio::test]
    async fn upload_above_body_limit_is_rejected() {
        let config = AppConfig {
            max_upload_bytes: 1024,
            ..AppConfig::default()
        };
        let response = app(config)
            .await
            .oneshot(upload_request("image", &vec![7_u8; 16 * 1024]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn undecodable_upload_is_unprocessable() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            upload_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let response = app(config)
            .await
            .oneshot(upload_request("image", b"plain text, not pixels"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn uploaded_image_is_served_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            upload_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let app = app(config).await;
        let png = split_png([250, 10, 10], [10, 10, 250]);

        let response = app
            .clone()
            .oneshot(upload_request("image", &png))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let uploaded = body_json(response).await;
        assert_eq!(uploaded["colors"].as_array().unwrap().len(), 5);
        assert_eq!(uploaded["proba"], "need_feedback");

        let image_path = uploaded["image"].as_str().unwrap();
        let served = app
            .oneshot(Request::get(image_path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(served.status(), StatusCode::OK);
        let bytes = to_bytes(served.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), png.as_slice());
    }
}
