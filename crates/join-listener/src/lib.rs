//! OneBot webhook listener for the join-request manager.
//!
//! Receives event posts from a OneBot v11 implementation over reverse HTTP,
//! queues group join requests and hands them one at a time to a
//! [`JoinManager`](join_manager::JoinManager).
//!
//! # Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/onebot` | Event post; answers `204` right away |
//! | `GET`  | `/health` | Liveness and record count |
//! | `GET`  | `/admin/groups/:group_id/summary` | Category summary of a group |
//! | `POST` | `/admin/reload` | Re-read the manager configuration |
//!
//! Event posts must carry a valid `X-Signature` when an event secret is
//! configured. The admin routes require `Authorization: Bearer <token>` when
//! an access token is configured.
//!
//! # Example
//!
//! ```rust,ignore
//! use join_listener::{router, worker, AppState};
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let worker = worker::spawn(manager.clone(), rx);
//! let app = router(AppState::new(manager, tx, "join_manager.toml"));
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod signature;
pub mod state;
pub mod worker;

pub use config::ListenerConfig;
pub use error::ListenerError;
pub use routes::router;
pub use state::AppState;

/// Capacity of the event queue between the webhook and the worker.
pub const EVENT_QUEUE_CAPACITY: usize = 64;
