pub mod app;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod handler;
pub mod input;
pub mod logging;
pub mod scroll;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use client::{ChatBackend, ChatClient, ContractVersion};
pub use config::Config;
pub use coordinator::{Coordinator, PendingRequest, RequestId, Session, FETCH_ERROR_TEXT};
pub use scroll::{jump_affordance_visible, ScrollController, JUMP_THRESHOLD};
pub use state::{Conversation, Sender, Turn};
