//! Request lifecycle through the chat-completions adapter.

use super::helpers::{StubBackend, service_for, settings_from};
use serde_json::{Value, json};
use testsmith::generation::{
    domain::{GenerationStatus, OwnerId},
    ports::{GenerationRepository, ProviderError},
    services::{CreateGenerationRequest, GenerationServiceError},
};

fn request_json(raw_request: &str) -> eyre::Result<Value> {
    let (_, body) = raw_request
        .split_once("\r\n\r\n")
        .ok_or_else(|| eyre::eyre!("request has no body"))?;
    Ok(serde_json::from_str(body)?)
}

#[tokio::test(flavor = "multi_thread")]
async fn deepseek_reply_is_normalized_and_stored() -> eyre::Result<()> {
    let reply = json!({
        "choices": [{"message": {"role": "assistant", "content": "```python\ndef test_add():\n    assert add(1, 2) == 3\n```"}}]
    });
    let backend = StubBackend::start("200 OK", reply.to_string()).await?;
    let settings = settings_from(&[
        ("DEEPSEEK_API_KEY", "sk-deepseek"),
        ("DEEPSEEK_BASE_URL", backend.base_url.as_str()),
    ])?;
    let (repository, service) = service_for(&settings)?;
    let owner = OwnerId::new();

    let created = service
        .create(
            owner,
            CreateGenerationRequest::new("def add(a, b):\n    return a + b\n", "Python"),
        )
        .await?;
    let raw_request = backend.received().await?;

    assert_eq!(created.status(), GenerationStatus::Completed);
    assert_eq!(
        created.generated_tests(),
        Some("def test_add():\n    assert add(1, 2) == 3")
    );
    assert!(raw_request.starts_with("POST /v1/chat/completions "));
    let payload = request_json(&raw_request)?;
    assert_eq!(payload["model"], "deepseek-coder");
    assert_eq!(payload["max_tokens"], 4000);
    assert_eq!(payload["messages"][1]["content"], "def add(a, b):\n    return a + b\n");
    let stored = repository
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("generation was not stored"))?;
    assert_eq!(stored, created);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn openai_backend_is_selected_by_configuration() -> eyre::Result<()> {
    let reply = json!({"choices": [{"message": {"content": "it('works', () => {});"}}]});
    let backend = StubBackend::start("200 OK", reply.to_string()).await?;
    let settings = settings_from(&[
        ("AI_PROVIDER", "OpenAI"),
        ("OPENAI_API_KEY", "sk-openai"),
        ("OPENAI_BASE_URL", backend.base_url.as_str()),
        ("OPENAI_MODEL", "gpt-4o"),
        ("OPENAI_TEMPERATURE", "0.5"),
    ])?;
    let (_, service) = service_for(&settings)?;

    let created = service
        .create(
            OwnerId::new(),
            CreateGenerationRequest::new("const x = 1;", "TypeScript"),
        )
        .await?;
    let raw_request = backend.received().await?;

    assert_eq!(created.generated_tests(), Some("it('works', () => {});"));
    assert!(
        raw_request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-openai")
    );
    let payload = request_json(&raw_request)?;
    assert_eq!(payload["model"], "gpt-4o");
    assert_eq!(payload["temperature"], 0.5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_error_marks_generation_failed() -> eyre::Result<()> {
    let body = json!({"error": {"message": "Insufficient Balance"}}).to_string();
    let backend = StubBackend::start("402 Payment Required", body).await?;
    let settings = settings_from(&[
        ("DEEPSEEK_API_KEY", "sk-deepseek"),
        ("DEEPSEEK_BASE_URL", backend.base_url.as_str()),
    ])?;
    let (repository, service) = service_for(&settings)?;
    let owner = OwnerId::new();

    let result = service
        .create(owner, CreateGenerationRequest::new("x = 1", "python"))
        .await;
    backend.received().await?;

    let Err(GenerationServiceError::Upstream(ProviderError::Upstream(message))) = result else {
        return Err(eyre::eyre!("expected upstream error, got {result:?}"));
    };
    assert!(message.contains("Insufficient Balance"));
    let stored = repository.find_by_owner(owner).await?;
    assert_eq!(stored.len(), 1);
    assert!(
        stored
            .iter()
            .all(|generation| generation.status() == GenerationStatus::Failed
                && generation.generated_tests().is_none())
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn whitespace_reply_is_an_empty_response() -> eyre::Result<()> {
    let reply = json!({"choices": [{"message": {"content": "  \n "}}]});
    let backend = StubBackend::start("200 OK", reply.to_string()).await?;
    let settings = settings_from(&[
        ("DEEPSEEK_API_KEY", "sk-deepseek"),
        ("DEEPSEEK_BASE_URL", backend.base_url.as_str()),
    ])?;
    let (repository, service) = service_for(&settings)?;
    let owner = OwnerId::new();

    let result = service
        .create(owner, CreateGenerationRequest::new("x = 1", "python"))
        .await;
    backend.received().await?;

    assert!(matches!(
        result,
        Err(GenerationServiceError::Upstream(ProviderError::EmptyResponse))
    ));
    let stored = repository.find_by_owner(owner).await?;
    assert!(
        stored
            .iter()
            .all(|generation| generation.status() == GenerationStatus::Failed)
    );
    Ok(())
}

#[test]
fn missing_credential_is_reported_before_any_request() {
    let result = settings_from(&[("AI_PROVIDER", "openai"), ("DEEPSEEK_API_KEY", "sk")]);

    let Err(err) = result else {
        panic!("expected configuration error");
    };
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}
