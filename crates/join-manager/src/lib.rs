//! Keyword-driven approval of group join requests.
//!
//! This crate provides the [`JoinManager`] type which decides what happens to
//! a group join request and carries the decision out through the seams
//! defined in `join-core`.
//!
//! # Features
//!
//! - Blacklist/whitelist permission gate per group
//! - Reject keywords checked before categorized accept keywords
//! - Per-group reject reason and welcome templates
//! - Persistent record of approved members with a source chart
//! - Paced notice fan-out to the originating and observer sessions
//!
//! # Architecture
//!
//! ```text
//! Join request (from join-listener)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       JOIN MANAGER                          │
//! │                                                             │
//! │  1. Permission gate (blacklist / whitelist)                 │
//! │         ↓                                                   │
//! │  2. Classify comment (reject → accept categories)           │
//! │         ↓                                                   │
//! │  3. Reject: resolve reason, reject on the platform          │
//! │     Accept: approve, record, render chart                   │
//! │         ↓                                                   │
//! │  4. Debounce (accept only), fan out notices with pacing     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use join_manager::{JoinManager, JoinManagerConfig, PieChartRenderer};
//! use join_records::RecordStore;
//!
//! let config = JoinManagerConfig::load_or_init("join_manager.toml".as_ref())?;
//! let records = Arc::new(RecordStore::open("data/join_records.json"));
//! let gateway = Arc::new(OneBotGateway::new(client));
//!
//! let manager = JoinManager::from_config(&config, records, gateway.clone(), gateway)
//!     .with_renderer(Arc::new(PieChartRenderer::new("data/charts")));
//!
//! let outcome = manager.handle(&event).await;
//! println!("{}", outcome.label());
//! ```

mod chart;
mod classifier;
mod config;
mod error;
mod formatting;
mod manager;
mod notice;
mod permission;
mod rules;
mod settings;

// Public exports
pub use chart::{NoChart, PieChartRenderer, CHART_HEIGHT, CHART_WIDTH, PALETTE};
pub use classifier::{Classification, Classifier};
pub use config::{ConfigError, DivideGroupConfig, JoinManagerConfig, DEFAULT_CONFIG_TEMPLATE};
pub use error::JoinManagerError;
pub use formatting::{address, AcceptNotice, RejectNotice};
pub use manager::{HandleOutcome, JoinManager};
pub use notice::{resolve_targets, FanOutReport, Notice, NoticeDispatcher, ORIGIN_SENTINEL};
pub use permission::{BlockMethod, PermissionGate};
pub use rules::{
    load_accept_rules, load_reject_reason, load_reject_rules, load_welcome_config, RuleStore,
    DEFAULT_KEY, DEFAULT_WELCOME, FALLBACK_REJECT_REASON,
};
pub use settings::Settings;

// Re-export commonly used types from dependencies
pub use join_core::{InboundEvent, JoinRequest, SessionId};
pub use join_records::RecordStore;
