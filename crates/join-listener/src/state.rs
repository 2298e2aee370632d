//! Shared state handed to the route handlers.

use std::path::PathBuf;
use std::sync::Arc;

use join_core::{InboundEvent, MessageSender, PlatformGateway};
use join_manager::JoinManager;
use tokio::sync::mpsc;

/// Application state, cloned into every request.
pub struct AppState<G: PlatformGateway, S: MessageSender> {
    /// The manager; shared with the dispatch worker.
    pub manager: Arc<JoinManager<G, S>>,
    /// Queue feeding the dispatch worker.
    pub events: mpsc::Sender<InboundEvent>,
    /// Bearer token required on the admin routes.
    pub access_token: Option<String>,
    /// Secret event posts must be signed with.
    pub event_secret: Option<String>,
    /// Configuration file re-read by `/admin/reload`.
    pub config_path: PathBuf,
}

impl<G: PlatformGateway, S: MessageSender> AppState<G, S> {
    pub fn new(
        manager: Arc<JoinManager<G, S>>,
        events: mpsc::Sender<InboundEvent>,
        config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manager,
            events,
            access_token: None,
            event_secret: None,
            config_path: config_path.into(),
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn with_event_secret(mut self, secret: Option<String>) -> Self {
        self.event_secret = secret;
        self
    }

    /// Platform name events are tagged with.
    pub fn platform(&self) -> &str {
        self.manager.gateway().platform()
    }
}

// Derived Clone would require G: Clone and S: Clone.
impl<G: PlatformGateway, S: MessageSender> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            events: self.events.clone(),
            access_token: self.access_token.clone(),
            event_secret: self.event_secret.clone(),
            config_path: self.config_path.clone(),
        }
    }
}
