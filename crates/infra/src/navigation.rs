//! Session lifecycle events for a UI shell
//!
//! [`SessionEvents`] implements the sign-out [`Navigator`] by broadcasting a
//! [`SessionEvent`] over a `tokio::sync::broadcast` channel. Whatever owns
//! the screen subscribes and performs the full navigation.

use fintrack_core::Navigator;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// Event emitted to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session ended; show the sign-in surface at `redirect_to`
    SignInRequired { redirect_to: String },
}

/// Broadcast [`Navigator`]
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for SessionEvents {
    fn redirect(&self, path: &str) {
        let event = SessionEvent::SignInRequired { redirect_to: path.to_string() };
        // No subscribers is fine: nothing is on screen to navigate.
        if let Ok(receivers) = self.sender.send(event) {
            debug!(receivers, redirect = path, "sign-in required event sent");
        }
    }
}
