//! Notice targets and paced delivery.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use join_core::{MessageChain, MessageSender, SessionId, Sleeper};
use tracing::{debug, warn};

/// Configured target that stands for the session the request came from.
pub const ORIGIN_SENTINEL: &str = "origin";

/// Resolve configured notice targets for one event.
///
/// [`ORIGIN_SENTINEL`] is replaced by `origin`, duplicates collapse, and the
/// origin session (if targeted) is moved to the front.
pub fn resolve_targets(configured: &[String], origin: &SessionId) -> IndexSet<SessionId> {
    let mut targets: IndexSet<SessionId> = configured
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t == ORIGIN_SENTINEL {
                origin.clone()
            } else {
                SessionId::new(t)
            }
        })
        .collect();

    if let Some(idx) = targets.get_index_of(origin) {
        targets.move_index(idx, 0);
    }
    targets
}

/// A message addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub session: SessionId,
    pub chain: MessageChain,
}

/// Delivery counts of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Sends notices one at a time with a pause between sends.
///
/// A failed send is logged and does not stop the remaining ones.
pub struct NoticeDispatcher<S: MessageSender> {
    sender: S,
    sleeper: Arc<dyn Sleeper>,
}

impl<S: MessageSender> NoticeDispatcher<S> {
    pub fn new(sender: S, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { sender, sleeper }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn sleeper(&self) -> &Arc<dyn Sleeper> {
        &self.sleeper
    }

    pub fn set_sleeper(&mut self, sleeper: Arc<dyn Sleeper>) {
        self.sleeper = sleeper;
    }

    /// Deliver every notice in order, pausing `interval` between sends.
    pub async fn dispatch(&self, notices: &[Notice], interval: Duration) -> FanOutReport {
        let mut report = FanOutReport::default();

        for (i, notice) in notices.iter().enumerate() {
            if i > 0 {
                self.sleeper.sleep(interval).await;
            }

            match self.sender.send_message(&notice.session, &notice.chain).await {
                Ok(()) => {
                    debug!("Sent notice to {}", notice.session);
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!("Failed to send notice to {}: {}", notice.session, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
