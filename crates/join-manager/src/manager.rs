//! Decision orchestrator for group join requests.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use join_core::{
    InboundEvent, JoinRequest, MessageSender, PlatformGateway, RenderedChart, ReportRenderer,
    Sleeper, TokioSleeper,
};
use join_records::RecordStore;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::chart::NoChart;
use crate::classifier::Classification;
use crate::config::JoinManagerConfig;
use crate::error::JoinManagerError;
use crate::formatting::{address, AcceptNotice, RejectNotice};
use crate::notice::{FanOutReport, NoticeDispatcher};
use crate::settings::Settings;

/// What [`JoinManager::handle`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Not a join request, or not for the bound platform.
    Skipped { reason: String },
    /// The group is outside the permission gate.
    NotAllowed,
    /// No keyword matched; left for manual review.
    Unmatched,
    /// The platform refused the approve/reject call.
    ActionFailed { error: String },
    /// Rejected on a reject keyword.
    Rejected {
        keyword: String,
        reason: String,
        delivery: FanOutReport,
    },
    /// Approved on an accept keyword.
    Approved {
        category: String,
        keyword: String,
        /// The record was saved to disk.
        recorded: bool,
        /// A chart was attached to the notice.
        chart: bool,
        delivery: FanOutReport,
    },
}

impl HandleOutcome {
    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => "skipped",
            Self::NotAllowed => "not_allowed",
            Self::Unmatched => "unmatched",
            Self::ActionFailed { .. } => "action_failed",
            Self::Rejected { .. } => "rejected",
            Self::Approved { .. } => "approved",
        }
    }
}

/// Handles inbound join requests end to end.
///
/// For each request the manager:
/// - Checks the permission gate
/// - Classifies the verification comment
/// - Approves or rejects through the platform gateway
/// - Records approvals and renders the source chart
/// - Fans notices out to the configured sessions
///
/// Settings can be swapped at runtime with [`JoinManager::reload`].
pub struct JoinManager<G: PlatformGateway, S: MessageSender> {
    settings: RwLock<Arc<Settings>>,
    records: Arc<RecordStore>,
    gateway: G,
    dispatcher: NoticeDispatcher<S>,
    renderer: Arc<dyn ReportRenderer>,
}

impl<G: PlatformGateway, S: MessageSender> JoinManager<G, S> {
    /// Create a manager without a chart renderer, pacing with tokio timers.
    pub fn new(settings: Settings, records: Arc<RecordStore>, gateway: G, sender: S) -> Self {
        Self {
            settings: RwLock::new(Arc::new(settings)),
            records,
            gateway,
            dispatcher: NoticeDispatcher::new(sender, Arc::new(TokioSleeper)),
            renderer: Arc::new(NoChart),
        }
    }

    /// Create a manager from a loaded configuration.
    pub fn from_config(
        config: &JoinManagerConfig,
        records: Arc<RecordStore>,
        gateway: G,
        sender: S,
    ) -> Self {
        Self::new(Settings::from_config(config), records, gateway, sender)
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.dispatcher.set_sleeper(sleeper);
        self
    }

    /// Settings currently in effect.
    pub async fn settings(&self) -> Arc<Settings> {
        self.settings.read().await.clone()
    }

    /// Replace the settings. Requests already in flight finish with the old
    /// ones.
    pub async fn reload(&self, config: &JoinManagerConfig) {
        let settings = Arc::new(Settings::from_config(config));
        *self.settings.write().await = settings;
        info!("Join manager settings reloaded");
    }

    /// Re-read the configuration file at `path` and apply it.
    pub async fn reload_from_path(&self, path: &Path) -> Result<(), JoinManagerError> {
        let config = JoinManagerConfig::load_or_init(path)?;
        self.reload(&config).await;
        Ok(())
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn renderer(&self) -> &Arc<dyn ReportRenderer> {
        &self.renderer
    }

    /// Flush the record store; used on shutdown.
    pub async fn shutdown(&self) -> Result<(), JoinManagerError> {
        self.records.flush().await?;
        info!("Join records flushed to {}", self.records.path().display());
        Ok(())
    }

    /// Handle one inbound event.
    ///
    /// Never fails: every failure is logged and reflected in the returned
    /// outcome.
    pub async fn handle(&self, event: &InboundEvent) -> HandleOutcome {
        let Some(request) = event.as_join_request() else {
            debug!("Ignoring {} event", event.kind());
            return HandleOutcome::Skipped {
                reason: format!("unsupported event: {}", event.kind()),
            };
        };

        let settings = self.settings().await;
        info!(
            "Join request from {} to group {}: {:?}",
            request.user_id, request.group_id, request.comment
        );

        if !settings.gate().is_allowed(&request.group_id) {
            debug!("Group {} is not managed, ignoring", request.group_id);
            return HandleOutcome::NotAllowed;
        }

        let classification = settings.classifier().classify(&request.comment);
        if classification == Classification::Ignore {
            info!(
                "No keyword matched for {} in group {}, leaving for review",
                request.user_id, request.group_id
            );
            return HandleOutcome::Unmatched;
        }

        if request.platform != self.gateway.platform() {
            warn!(
                "Request came from platform {}, gateway is bound to {}",
                request.platform,
                self.gateway.platform()
            );
            return HandleOutcome::Skipped {
                reason: format!("unbound platform: {}", request.platform),
            };
        }

        match classification {
            Classification::Reject { keyword } => self.reject(&settings, request, keyword).await,
            Classification::Accept { category, keyword } => {
                self.approve(&settings, request, category, keyword).await
            }
            Classification::Ignore => HandleOutcome::Unmatched,
        }
    }

    async fn reject(
        &self,
        settings: &Settings,
        request: &JoinRequest,
        keyword: String,
    ) -> HandleOutcome {
        let user_name = if settings.rules().reason_needs_user_name(&request.group_id) {
            self.display_name(&request.user_id).await
        } else {
            request.user_id.clone()
        };
        let reason = settings.rules().resolve_reason(
            &request.group_id,
            &request.user_id,
            &user_name,
            &keyword,
        );

        if let Err(e) = self
            .gateway
            .set_group_add_request(&request.flag, false, Some(&reason))
            .await
        {
            error!(
                "Failed to reject {} in group {}: {}",
                request.user_id, request.group_id, e
            );
            return HandleOutcome::ActionFailed {
                error: e.to_string(),
            };
        }
        info!(
            "Rejected {} in group {} on keyword {:?}",
            request.user_id, request.group_id, keyword
        );

        let notice = RejectNotice {
            group_id: &request.group_id,
            user_id: &request.user_id,
            keyword: &keyword,
        };
        let targets = settings.reject_targets(&request.session);
        let notices = address(
            &targets,
            &request.session,
            &notice.for_origin(),
            &notice.for_observer(),
        );
        let delivery = self
            .dispatcher
            .dispatch(&notices, settings.send_interval())
            .await;

        HandleOutcome::Rejected {
            keyword,
            reason,
            delivery,
        }
    }

    async fn approve(
        &self,
        settings: &Settings,
        request: &JoinRequest,
        category: String,
        keyword: String,
    ) -> HandleOutcome {
        if let Err(e) = self
            .gateway
            .set_group_add_request(&request.flag, true, None)
            .await
        {
            error!(
                "Failed to approve {} in group {}: {}",
                request.user_id, request.group_id, e
            );
            return HandleOutcome::ActionFailed {
                error: e.to_string(),
            };
        }
        info!(
            "Approved {} in group {} as {} (keyword {:?})",
            request.user_id, request.group_id, category, keyword
        );

        let now = chrono::Local::now().naive_local();
        let recorded = match self
            .records
            .record_join(&request.group_id, &request.user_id, &category, &keyword, now)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save join record: {}", e);
                false
            }
        };

        let chart = if settings.statistics_enabled(&request.group_id) {
            self.render_chart(&request.group_id).await
        } else {
            None
        };

        let notice = AcceptNotice {
            group_id: &request.group_id,
            user_id: &request.user_id,
            welcome: settings.rules().welcome_message(&request.group_id),
            comment: &request.comment,
            category: &category,
            chart: chart.as_ref().map(|c| c.path.as_path()),
        };
        let targets = settings.accept_targets(&request.session);
        let notices = address(
            &targets,
            &request.session,
            &notice.for_origin(),
            &notice.for_observer(),
        );

        let delivery = if notices.is_empty() {
            FanOutReport::default()
        } else {
            self.dispatcher.sleeper().sleep(settings.debounce()).await;
            self.dispatcher
                .dispatch(&notices, settings.send_interval())
                .await
        };

        if let Some(chart) = &chart {
            remove_chart(chart).await;
        }

        HandleOutcome::Approved {
            category,
            keyword,
            recorded,
            chart: chart.is_some(),
            delivery,
        }
    }

    /// Best-effort display name; falls back to the user id.
    async fn display_name(&self, user_id: &str) -> String {
        match self.gateway.user_display_name(user_id).await {
            Ok(Some(name)) if !name.is_empty() => name,
            Ok(_) => user_id.to_string(),
            Err(e) => {
                warn!("Failed to look up name of {}: {}", user_id, e);
                user_id.to_string()
            }
        }
    }

    async fn render_chart(&self, group_id: &str) -> Option<RenderedChart> {
        let Some(summary) = self.records.summary(group_id).await else {
            debug!("No records for group {}, skipping chart", group_id);
            return None;
        };

        match self.renderer.render(&summary).await {
            Ok(chart) => Some(chart),
            Err(e) => {
                warn!(
                    "Renderer {} failed for group {}: {}",
                    self.renderer.name(),
                    group_id,
                    e
                );
                None
            }
        }
    }
}

async fn remove_chart(chart: &RenderedChart) {
    match tokio::fs::remove_file(&chart.path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove chart {}: {}", chart.path.display(), e),
    }
}
