//! The dispatch worker: one task, one event at a time.

use std::sync::Arc;

use join_core::{InboundEvent, MessageSender, PlatformGateway};
use join_manager::JoinManager;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle queued events in arrival order until every sender is dropped.
///
/// Returns the number of events handled.
pub async fn run<G, S>(
    manager: Arc<JoinManager<G, S>>,
    mut events: mpsc::Receiver<InboundEvent>,
) -> usize
where
    G: PlatformGateway,
    S: MessageSender,
{
    info!("Dispatch worker started");
    let mut handled = 0;

    while let Some(event) = events.recv().await {
        let outcome = manager.handle(&event).await;
        handled += 1;

        match event.as_join_request() {
            Some(request) => info!(
                "Request from {} to group {}: {}",
                request.user_id,
                request.group_id,
                outcome.label()
            ),
            None => debug!("{} event: {}", event.kind(), outcome.label()),
        }
    }

    info!("Dispatch worker stopped after {} events", handled);
    handled
}

/// Spawn [`run`] on the runtime.
pub fn spawn<G, S>(
    manager: Arc<JoinManager<G, S>>,
    events: mpsc::Receiver<InboundEvent>,
) -> JoinHandle<usize>
where
    G: PlatformGateway + 'static,
    S: MessageSender + 'static,
{
    tokio::spawn(run(manager, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use join_core::JoinRequest;
    use join_manager::{JoinManagerConfig, RecordStore};
    use mock_gateway::{RecordingGateway, RecordingSleeper};

    const CONFIG: &str = r#"
        delay = 0.0
        debounce = 0.0

        [divide_group]
        accept_categories = ["粉丝:老粉"]
        reject = ["广告"]
        accept_notice = []
        reject_notice = []
    "#;

    fn request(user: &str, comment: &str) -> InboundEvent {
        JoinRequest::new("aiocqhttp", "1001", user, comment, format!("flag-{}", user)).into()
    }

    #[tokio::test]
    async fn test_handles_in_order_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let config = JoinManagerConfig::from_toml_str(CONFIG).unwrap();
        let records = Arc::new(RecordStore::open(dir.path().join("records.json")));
        let gateway = Arc::new(RecordingGateway::new());
        let manager = Arc::new(
            JoinManager::from_config(&config, records, gateway.clone(), gateway.clone())
                .with_sleeper(Arc::new(RecordingSleeper::new())),
        );

        let (tx, rx) = mpsc::channel(8);
        let worker = spawn(manager.clone(), rx);

        tx.send(request("1", "我是老粉")).await.unwrap();
        tx.send(request("2", "打广告")).await.unwrap();
        tx.send(InboundEvent::Unsupported {
            kind: "notice".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        assert_eq!(worker.await.unwrap(), 3);

        let actions = gateway.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].flag, "flag-1");
        assert!(actions[0].approve);
        assert_eq!(actions[1].flag, "flag-2");
        assert!(!actions[1].approve);
        assert!(manager.records().get("1001", "1").await.is_some());
    }
}
