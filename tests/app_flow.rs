//! Drives the terminal app state through a full round trip without a
//! terminal: key presses in, spawned request out, response event back.

use std::time::Duration;

use chat_client::app::App;
use chat_client::config::Config;
use chat_client::handler::handle_event;
use chat_client::tui::AppEvent;
use chat_client::{Sender, FETCH_ERROR_TEXT};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn press(app: &mut App, code: KeyCode) {
    handle_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

async fn next_response(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for response")
        .expect("channel closed")
}

fn app_for(endpoint: String) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
    let config = Config {
        endpoint,
        ..Config::default()
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(&config, tx);
    app.input.mount();
    (app, rx)
}

#[tokio::test]
async fn test_enter_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "query": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hi there" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (mut app, mut rx) = app_for(format!("{}/chat", mock_server.uri()));

    type_text(&mut app, "Hello");
    press(&mut app, KeyCode::Enter);

    // Draft cleared and user turn shown before the response arrives
    assert_eq!(app.input.draft(), "");
    assert!(app.is_pending());
    assert_eq!(app.conversation.len(), 1);

    let event = next_response(&mut rx).await;
    assert!(matches!(event, AppEvent::ChatResponse { .. }));
    handle_event(&mut app, event).unwrap();

    assert!(!app.is_pending());
    let turns: Vec<(Sender, &str)> = app
        .conversation
        .turns()
        .iter()
        .map(|t| (t.sender(), t.text()))
        .collect();
    assert_eq!(turns, vec![(Sender::User, "Hello"), (Sender::Bot, "Hi there")]);
}

#[tokio::test]
async fn test_enter_while_pending_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "slow" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (mut app, mut rx) = app_for(format!("{}/chat", mock_server.uri()));

    type_text(&mut app, "first");
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "second");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input.draft(), "second");
    assert_eq!(app.conversation.len(), 1);

    let event = next_response(&mut rx).await;
    handle_event(&mut app, event).unwrap();
    assert_eq!(app.conversation.len(), 2);
    assert!(!app.is_pending());
}

#[tokio::test]
async fn test_failure_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (mut app, mut rx) = app_for(format!("{}/chat", mock_server.uri()));

    type_text(&mut app, "Ping");
    press(&mut app, KeyCode::Enter);

    let event = next_response(&mut rx).await;
    handle_event(&mut app, event).unwrap();

    assert!(!app.is_pending());
    assert_eq!(app.conversation.turns()[1].sender(), Sender::Bot);
    assert_eq!(app.conversation.turns()[1].text(), FETCH_ERROR_TEXT);
}
