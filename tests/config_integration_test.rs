use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use rural_edu_backend::utils::validation::Validate;
use rural_edu_backend::{build_router, config};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tower::ServiceExt;

fn write_config(data_dir: &TempDir) -> NamedTempFile {
    let content = format!(
        r#"
[server]
port = 8100

[model]
model_path = "{dir}/missing.onnx"
class_names_path = "{dir}/missing.json"

[genai]
api_key = "${{RURAL_EDU_TEST_NEVER_SET}}"

[storage]
data_dir = "{dir}"

[[auth.tokens]]
token = "teacher-token"
id = 3
email = "ravi@example.org"
username = "ravi"
"#,
        dir = data_dir.path().display()
    );

    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_router_built_from_config_file_serves_with_missing_model() {
    let data_dir = TempDir::new().unwrap();
    let file = write_config(&data_dir);

    let config = config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 8100);
    assert_eq!(config.genai.api_key.as_deref(), Some("${RURAL_EDU_TEST_NEVER_SET}"));
    assert!(config.validate().is_ok());

    let app = build_router(&config);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["classifier"]["ready"], false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/users/me")
                .header(header::AUTHORIZATION, "Bearer teacher-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let me: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["username"], "ravi");
}

#[test]
fn test_missing_config_file_is_an_error() {
    assert!(config::load(Some(std::path::Path::new("/nonexistent/rural-edu.toml"))).is_err());
}

#[test]
fn test_no_config_file_uses_defaults() {
    let config = config::load(None).unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:8000");
}
