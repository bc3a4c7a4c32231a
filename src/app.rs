use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::client::ChatClient;
use crate::config::Config;
use crate::coordinator::{Coordinator, PendingRequest, RequestId};
use crate::input::InputSurface;
use crate::scroll::ScrollController;
use crate::state::Conversation;
use crate::tui::AppEvent;

/// Rows moved per mouse wheel tick or arrow key press.
pub const SCROLL_STEP: i32 = 3;

pub struct App {
    // Core state
    pub should_quit: bool,

    // Conversation and request lifecycle
    pub conversation: Conversation,
    pub coordinator: Coordinator,
    pub client: ChatClient,
    responses: UnboundedSender<AppEvent>,

    // View state
    pub scroll: ScrollController,
    pub input: InputSurface,
    pub chat_height: u16, // inner height of the chat pane, updated during render

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub jump_area: Option<Rect>,
    pub send_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config, responses: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,

            conversation: Conversation::new(),
            coordinator: Coordinator::new(),
            client: ChatClient::new(&config.endpoint, config.contract),
            responses,

            scroll: ScrollController::new(config.jump_threshold),
            input: InputSurface::new(),
            chat_height: 0,

            animation_frame: 0,

            chat_area: None,
            jump_area: None,
            send_area: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.coordinator.is_pending()
    }

    /// Submit whatever is in the draft box.
    ///
    /// Refused while a request is outstanding. Blank drafts are left alone.
    /// On success the draft is cleared in the same step the user turn is
    /// appended, and the round trip is spawned in the background.
    pub fn submit_draft(&mut self) -> Option<RequestId> {
        if !self.input.can_submit(self.is_pending()) {
            tracing::debug!("submit ignored while a request is pending");
            return None;
        }

        let raw_text = self.input.draft().to_string();
        let request = self.coordinator.submit(&mut self.conversation, &raw_text)?;
        self.input.clear();

        let id = request.id;
        self.spawn_request(request);
        Some(id)
    }

    fn spawn_request(&self, request: PendingRequest) {
        let client = self.client.clone();
        let responses = self.responses.clone();
        tokio::spawn(async move {
            let result = client.query(&request.query).await;
            // The loop may already be gone on shutdown
            let _ = responses.send(AppEvent::ChatResponse {
                id: request.id,
                result,
            });
        });
    }

    pub fn apply_response(&mut self, id: RequestId, result: anyhow::Result<String>) {
        self.coordinator.complete(&mut self.conversation, id, result);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, rows: i32) {
        self.scroll.scroll_by(-rows);
    }

    pub fn scroll_down(&mut self, rows: i32) {
        self.scroll.scroll_by(rows);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.chat_height / 2).max(1);
        self.scroll_up(i32::from(half));
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.chat_height / 2).max(1);
        self.scroll_down(i32::from(half));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.on_scroll(0);
    }

    pub fn jump_to_latest(&mut self) {
        self.scroll.jump_to_latest();
    }
}
