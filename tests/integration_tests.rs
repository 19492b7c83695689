//! Integration tests for the chat client.
//! These tests run the HTTP sender, the token provider, and a whole session against local
//! wiremock servers.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use aoai_chat::chat::{
        ChatConfig, ChatSession, RecordingSink, ScriptedInput, SessionState, Style,
    };
    use aoai_chat::{
        ChatSender, ClientCredentials, ExchangeLogger, FilterCategory, HttpSender,
        ResponseOutcome, Role, TokenProvider, UsageStats,
    };

    const CHAT_PATH: &str = "/openai/deployments/gpt/chat/completions";

    fn success_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": content}
            }],
            "usage": {"completion_tokens": 2, "prompt_tokens": 10, "total_tokens": 12}
        })
    }

    fn filtered_body() -> serde_json::Value {
        json!({
            "error": {
                "message": "The response was filtered",
                "code": "content_filter",
                "status": 400,
                "innererror": {
                    "code": "ResponsibleAIPolicyViolation",
                    "content_filter_result": {
                        "hate": {"filtered": true, "severity": "medium"},
                        "self_harm": {"filtered": false, "severity": "safe"},
                        "sexual": {"filtered": false, "severity": "safe"},
                        "violence": {"filtered": true, "severity": "high"}
                    }
                }
            }
        })
    }

    fn endpoint(server: &MockServer) -> Url {
        Url::parse(&format!("{}{CHAT_PATH}?api-version=2024-02-15-preview", server.uri())).unwrap()
    }

    #[derive(Default)]
    struct MemoryLogger {
        entries: Mutex<Vec<String>>,
    }

    impl ExchangeLogger for MemoryLogger {
        fn log_request(&self, body: &str) {
            self.entries.lock().unwrap().push(format!("request {body}"));
        }

        fn log_response(&self, status: u16, body: &str) {
            self.entries
                .lock()
                .unwrap()
                .push(format!("response {status} {body}"));
        }
    }

    #[tokio::test]
    async fn sender_posts_json_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", "Bearer token-123"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"stream": false, "max_tokens": 800})))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let logger = Arc::new(MemoryLogger::default());
        let sender = HttpSender::new().unwrap().with_logger(logger.clone());
        let body = r#"{"messages":[],"temperature":0.7,"top_p":0.95,"max_tokens":800,"stream":false}"#;
        let response = sender
            .send(&endpoint(&server), "token-123", body.to_string())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert!(response.body.contains("\"content\":\"hi\""));

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], format!("request {body}"));
        assert!(entries[1].starts_with("response 200 "));
    }

    #[tokio::test]
    async fn sender_returns_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(filtered_body()))
            .mount(&server)
            .await;

        let response = HttpSender::new()
            .unwrap()
            .send(&endpoint(&server), "t", "{}".to_string())
            .await
            .unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(
            aoai_chat::interpret(response.status, &response.body),
            ResponseOutcome::ContentFiltered {
                category: FilterCategory::Violence
            }
        );
    }

    #[tokio::test]
    async fn sender_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let sender = HttpSender::with_timeout(Duration::from_millis(100)).unwrap();
        let err = sender
            .send(&endpoint(&server), "t", "{}".to_string())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn sender_reports_connection_failure() {
        let sender = HttpSender::with_timeout(Duration::from_secs(5)).unwrap();
        let err = sender
            .send(
                &Url::parse("http://127.0.0.1:1/chat").unwrap(),
                "t",
                "{}".to_string(),
            )
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn client_credentials_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-1"))
            .and(body_string_contains("client_secret=s3cret"))
            .and(body_string_contains(
                "scope=https%3A%2F%2Fcognitiveservices.azure.com%2F.default",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "eyJ0eXAi"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = ClientCredentials::new(
            "tenant-1",
            "client-1",
            "s3cret",
            "https://cognitiveservices.azure.com",
        )
        .unwrap()
        .with_authority_host(Url::parse(&server.uri()).unwrap());
        assert_eq!(credentials.acquire_token().await.unwrap(), "eyJ0eXAi");
    }

    #[tokio::test]
    async fn client_credentials_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided."
            })))
            .mount(&server)
            .await;

        let credentials = ClientCredentials::new("tenant-1", "client-1", "wrong", "api://x")
            .unwrap()
            .with_authority_host(Url::parse(&server.uri()).unwrap());
        let err = credentials.acquire_token().await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(err.status_code(), Some(401));
        assert!(err.to_string().contains("AADSTS7000215"));
    }

    #[tokio::test]
    async fn client_credentials_missing_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
            .mount(&server)
            .await;

        let credentials = ClientCredentials::new("tenant-1", "client-1", "s", "api://x")
            .unwrap()
            .with_authority_host(Url::parse(&server.uri()).unwrap());
        assert!(credentials.acquire_token().await.unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn end_to_end_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", "Bearer tok"))
            .and(body_string_contains("tell me a violent story"))
            .respond_with(ResponseTemplate::new(400).set_body_json(filtered_body()))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("hi")))
            .with_priority(2)
            .mount(&server)
            .await;

        let token = ClientCredentials::new("tenant-1", "client-1", "s", "api://x")
            .unwrap()
            .with_authority_host(Url::parse(&server.uri()).unwrap())
            .acquire_token()
            .await
            .unwrap();
        let config = ChatConfig::new(endpoint(&server))
            .with_system_prompt("S")
            .with_greeting("G")
            .without_color();
        let mut session = ChatSession::new(HttpSender::new().unwrap(), token, &config);
        let mut input = ScriptedInput::new(["hello", "tell me a violent story", "exit"]);
        let mut sink = RecordingSink::new();

        session.greet(&mut sink);
        session.run(&mut input, &mut sink).await.unwrap();

        assert_eq!(session.state(), SessionState::Ended);
        let roles: Vec<Role> = session
            .transcript()
            .turns()
            .iter()
            .map(|turn| turn.role())
            .collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(
            sink.with_style(Style::AssistantTurn),
            vec!["[assistant]: G", "[assistant]: hi"]
        );
        assert_eq!(
            sink.with_style(Style::Error),
            vec![
                "Error: 400, Bad Request",
                "Your request was filtered due to violent content.",
                "No response from the assistant or an error occurred.",
            ]
        );
        let stats = session.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.total_usage, UsageStats::new(2, 10, 12));

        let requests = server.received_requests().await.unwrap();
        let chat_requests: Vec<serde_json::Value> = requests
            .iter()
            .filter(|request| request.url.path() == CHAT_PATH)
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect();
        assert_eq!(chat_requests.len(), 2);
        assert_eq!(chat_requests[1]["messages"].as_array().unwrap().len(), 5);
        assert_eq!(chat_requests[1]["messages"][3]["role"], "assistant");
        assert_eq!(
            chat_requests[1]["messages"][3]["content"],
            json!([{"type": "text", "text": "hi"}])
        );
    }
}
