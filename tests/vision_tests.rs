use pretty_assertions::assert_eq;
use serde_json::json;
use tunesmith::error::TunesmithError;
use tunesmith::vision::{Description, DescriptionProvider};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> DescriptionProvider {
    DescriptionProvider::new("test-key".to_string(), Some(server.uri()))
}

fn chat_response(content: serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn describe_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("Describe the mood"))
        .and(body_string_contains("https://cdn.example/lake.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response(json!("A calm lake at sunset."))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let description = provider(&server)
        .describe("https://cdn.example/lake.png", "Describe the mood")
        .await
        .expect("describe should succeed");

    assert_eq!(description.as_str(), "A calm lake at sunset.");
}

#[tokio::test]
async fn describe_truncates_long_content_to_200_chars() {
    let server = MockServer::start().await;
    let long = "m".repeat(450);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(json!(long))))
        .mount(&server)
        .await;

    let description = provider(&server)
        .describe("https://cdn.example/img.png", "prompt")
        .await
        .expect("describe should succeed");

    assert_eq!(description.as_str().chars().count(), Description::MAX_CHARS);
    assert_eq!(description.as_str(), "m".repeat(200));
}

#[tokio::test]
async fn describe_fails_on_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .describe("https://cdn.example/img.png", "prompt")
        .await
        .expect_err("empty choices should fail");

    assert!(
        matches!(err, TunesmithError::ImageProcessing { ref message, .. } if message.contains("no choices")),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn describe_fails_on_null_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(json!(null))))
        .mount(&server)
        .await;

    let err = provider(&server)
        .describe("https://cdn.example/img.png", "prompt")
        .await
        .expect_err("null content should fail");

    assert!(matches!(err, TunesmithError::ImageProcessing { .. }));
}

#[tokio::test]
async fn describe_fails_on_server_error_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server)
        .describe("https://cdn.example/img.png", "prompt")
        .await
        .expect_err("server error should fail");

    assert!(
        matches!(err, TunesmithError::ImageProcessing { ref message, .. } if message.contains("500")),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn describe_fails_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("not json at all"),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .describe("https://cdn.example/img.png", "prompt")
        .await
        .expect_err("malformed body should fail");

    assert!(matches!(err, TunesmithError::ImageProcessing { .. }));
}
