//! Integration tests for the chat endpoint contract.

use chat_client::{ChatClient, ContractVersion, Sender, Session, FETCH_ERROR_TEXT};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> String {
    format!("{}/chat", server.uri())
}

fn turns(session: &Session<ChatClient>) -> Vec<(Sender, String)> {
    session
        .conversation()
        .turns()
        .iter()
        .map(|t| (t.sender(), t.text().to_string()))
        .collect()
}

#[tokio::test]
async fn test_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hi there" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(&endpoint(&mock_server), ContractVersion::V1);
    assert_eq!(client.query("Hello").await.unwrap(), "Hi there");
}

#[tokio::test]
async fn test_hello_scenario() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hi there" })))
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    assert!(session.submit("Hello").await);

    assert!(!session.is_pending());
    assert_eq!(
        turns(&session),
        vec![
            (Sender::User, "Hello".to_string()),
            (Sender::Bot, "Hi there".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_query_is_sent_untrimmed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({ "query": "  spaced out\n" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    session.submit("  spaced out\n").await;

    assert_eq!(session.conversation().turns()[0].text(), "  spaced out\n");
    assert_eq!(session.conversation().turns()[1].text(), "ok");
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "unused" })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    assert!(!session.submit("  ").await);
    assert!(session.conversation().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // Grab a free port, then close the listener so nothing answers there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/chat", listener.local_addr().unwrap());
    drop(listener);

    let mut session = Session::new(ChatClient::new(&url, ContractVersion::V1));
    assert!(session.submit("Ping").await);

    assert!(!session.is_pending());
    assert_eq!(
        turns(&session),
        vec![
            (Sender::User, "Ping".to_string()),
            (Sender::Bot, FETCH_ERROR_TEXT.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_server_error_becomes_error_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "response": "boom" })))
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    session.submit("Ping").await;

    assert_eq!(session.conversation().turns()[1].text(), FETCH_ERROR_TEXT);
}

#[tokio::test]
async fn test_malformed_json_becomes_error_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    session.submit("Ping").await;

    assert_eq!(session.conversation().turns()[1].text(), FETCH_ERROR_TEXT);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn test_missing_field_becomes_error_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_results": ["a"],
            "ai_response": "legacy reply",
        })))
        .mount(&mock_server)
        .await;

    let mut session = Session::new(ChatClient::new(&endpoint(&mock_server), ContractVersion::V1));
    session.submit("Ping").await;

    assert_eq!(session.conversation().turns()[1].text(), FETCH_ERROR_TEXT);
}

#[tokio::test]
async fn test_legacy_contract() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_results": ["msg one", "msg two"],
            "ai_response": "legacy reply",
        })))
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(&endpoint(&mock_server), ContractVersion::LegacyAiResponse);
    assert_eq!(client.query("Ping").await.unwrap(), "legacy reply");
}

#[tokio::test]
async fn test_multiline_reply_kept_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "line one\n\n  line two " })),
        )
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(&endpoint(&mock_server), ContractVersion::V1);
    assert_eq!(client.query("Ping").await.unwrap(), "line one\n\n  line two ");
}
