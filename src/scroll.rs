//! Scroll-follow behavior for the chat pane.
//!
//! Offsets and heights are plain units: rows in the terminal, but nothing
//! here depends on that.

/// Default distance from the bottom before the jump affordance shows up.
pub const JUMP_THRESHOLD: u32 = 100;

/// Whether the "jump to latest" affordance should be visible.
pub fn jump_affordance_visible(
    scroll_top: u32,
    scroll_height: u32,
    client_height: u32,
    threshold: u32,
) -> bool {
    scroll_height.saturating_sub(scroll_top) > client_height.saturating_add(threshold)
}

#[derive(Debug, Clone)]
pub struct ScrollController {
    threshold: u32,
    scroll_top: u32,
    scroll_height: u32,
    client_height: u32,
    show_jump: bool,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(JUMP_THRESHOLD)
    }
}

impl ScrollController {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            scroll_top: 0,
            scroll_height: 0,
            client_height: 0,
            show_jump: false,
        }
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn show_jump(&self) -> bool {
        self.show_jump
    }

    /// Following means the view tracks the newest turn.
    pub fn is_following(&self) -> bool {
        !self.show_jump
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }

    /// Offset to actually render at, clamped to the content.
    pub fn effective_offset(&self) -> u32 {
        self.scroll_top.min(self.max_offset())
    }

    /// The user scrolled the pane to `scroll_top`.
    pub fn on_scroll(&mut self, scroll_top: u32) {
        self.scroll_top = scroll_top.min(self.max_offset());
        self.recompute();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let current = self.effective_offset();
        let target = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.on_scroll(target);
    }

    /// The user invoked the affordance.
    pub fn jump_to_latest(&mut self) {
        self.scroll_top = self.scroll_height;
        self.show_jump = false;
    }

    /// Content or viewport size changed (a turn was appended, the pending
    /// indicator appeared, the terminal was resized).
    ///
    /// While following, the view is pinned to the bottom. Otherwise the
    /// user keeps their position and the affordance stays up.
    pub fn on_content_changed(&mut self, scroll_height: u32, client_height: u32) {
        if scroll_height == self.scroll_height && client_height == self.client_height {
            return;
        }

        let following = self.is_following();
        self.scroll_height = scroll_height;
        self.client_height = client_height;

        if following {
            self.scroll_top = self.scroll_height;
        } else {
            tracing::debug!(scroll_top = self.scroll_top, "content grew while scrolled up");
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.show_jump = jump_affordance_visible(
            self.scroll_top,
            self.scroll_height,
            self.client_height,
            self.threshold,
        );
    }
}
