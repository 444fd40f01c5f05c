//! Submission controller
//!
//! Drives a draft from editing to a delivered submission. Every state change
//! goes through `SubmissionStateMachine`; user-visible effects leave through
//! the workflow event channel.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use practica_common::{Config, Error, Result, StateError};
use practica_publisher::{
    Publication, PublicationReceipt, PublicationService, PublisherError, SubmissionPayload,
};

use crate::domain::entities::{AssetId, AssetKind, AssetReference, ContentDraft, FileDescriptor};
use crate::domain::messages::Messages;
use crate::domain::schedule::{
    Clock, PublicationMode, PublicationPlan, PublicationScheduler, ScheduleError,
};
use crate::domain::staging::{AssetStagingManager, PreviewHandleRegistry, StagingError};
use crate::domain::state::{SubmissionEvent, SubmissionState, SubmissionStateMachine};
use crate::domain::validation::{SubmissionValidator, ValidationFailure, ValidationResult};

use super::navigation::NavigationTimer;
use super::{NavigationReason, Notification, WorkflowEvent};

impl From<StagingError> for Error {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::UnsupportedKind { .. } => Error::Validation(err.to_string()),
            StagingError::Resource(e) => Error::Resource(e.to_string()),
        }
    }
}

impl From<ScheduleError> for Error {
    fn from(err: ScheduleError) -> Self {
        Error::Validation(err.to_string())
    }
}

/// Why a validated draft could not be turned into a payload
#[derive(Debug, Clone, PartialEq)]
enum PayloadError {
    MissingVideo,
    Schedule(ScheduleError),
}

impl From<PayloadError> for Error {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::MissingVideo => {
                Error::Internal("validated draft has no video".to_string())
            }
            PayloadError::Schedule(e) => e.into(),
        }
    }
}

/// Puts the workflow back into editing when a submit is dropped mid-delivery
///
/// Held across the publish await and disarmed once delivery settles.
struct DeliveryGuard<'a> {
    state: &'a mut SubmissionState,
    armed: bool,
}

impl<'a> DeliveryGuard<'a> {
    fn new(state: &'a mut SubmissionState) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let from = *self.state;
        match SubmissionStateMachine::transition(from, SubmissionEvent::DeliveryFailed) {
            Ok(next) => {
                tracing::warn!(%from, to = %next, "Submission abandoned during delivery, back to editing");
                *self.state = next;
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not restore editing after abandoned submission")
            }
        }
    }
}

/// Result of a submit attempt that ran to completion
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Draft failed a rule; still editing
    Invalid(ValidationFailure),
    /// Draft was valid but delivery failed; still editing
    DeliveryFailed(PublisherError),
    /// Delivered; navigation is pending
    Submitted(PublicationReceipt),
}

/// Orchestrates staging, scheduling and validation into one submit operation
pub struct SubmissionController {
    config: Config,
    state: SubmissionState,
    draft: ContentDraft,
    staging: AssetStagingManager,
    scheduler: PublicationScheduler,
    publisher: Arc<dyn PublicationService>,
    messages: Messages,
    events: UnboundedSender<WorkflowEvent>,
    navigation: Option<NavigationTimer>,
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("plan", self.scheduler.plan())
            .field("publisher", &self.publisher.service_name())
            .field("navigation_pending", &self.has_pending_navigation())
            .finish_non_exhaustive()
    }
}

impl SubmissionController {
    /// Create a controller in the editing state
    ///
    /// The returned receiver carries notifications and navigation signals
    /// for the hosting view.
    pub fn new(
        config: Config,
        publisher: Arc<dyn PublicationService>,
        registry: Arc<dyn PreviewHandleRegistry>,
        clock: Arc<dyn Clock>,
    ) -> (Self, UnboundedReceiver<WorkflowEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let scheduler = PublicationScheduler::new(clock, config.default_publish_time);
        let messages = Messages::new(config.locale);

        tracing::debug!(
            locale = %config.locale,
            publisher = publisher.service_name(),
            "Submission workflow started"
        );

        let controller = Self {
            config,
            state: SubmissionState::default(),
            draft: ContentDraft::new(),
            staging: AssetStagingManager::new(registry),
            scheduler,
            publisher,
            messages,
            events,
            navigation: None,
        };
        (controller, receiver)
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn draft(&self) -> &ContentDraft {
        &self.draft
    }

    pub fn plan(&self) -> &PublicationPlan {
        self.scheduler.plan()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Preview handles currently held for this draft
    pub fn live_handle_count(&self) -> usize {
        self.staging.live_handle_count()
    }

    pub fn has_pending_navigation(&self) -> bool {
        self.navigation
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Label of the primary action for the current mode
    pub fn submit_label(&self) -> &'static str {
        self.messages.submit_label(self.scheduler.mode())
    }

    /// Validate without side effects, for live field feedback
    pub fn current_validation(&self) -> ValidationResult {
        SubmissionValidator::validate(&self.draft, self.scheduler.plan(), self.scheduler.today())
    }

    pub fn publication_summary(&self) -> String {
        self.scheduler.describe(&self.messages)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.ensure_editable("set title")?;
        self.draft.set_title(title);
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.ensure_editable("set description")?;
        self.draft.set_description(description);
        Ok(())
    }

    pub fn stage_preview(&mut self, file: FileDescriptor) -> Result<AssetReference> {
        self.stage(AssetKind::Preview, file)
    }

    pub fn stage_video(&mut self, file: FileDescriptor) -> Result<AssetReference> {
        self.stage(AssetKind::Video, file)
    }

    /// Attach documents in pick order; stops at the first file that fails
    pub fn stage_documents(
        &mut self,
        files: impl IntoIterator<Item = FileDescriptor>,
    ) -> Result<Vec<AssetReference>> {
        self.ensure_editable("stage documents")?;
        match self.staging.stage_documents(&mut self.draft, files) {
            Ok(assets) => Ok(assets),
            Err(e) => Err(self.staging_failed(AssetKind::Document, e)),
        }
    }

    /// Remove any attached asset; unknown ids are ignored
    pub fn remove_asset(&mut self, id: AssetId) -> Result<Option<AssetReference>> {
        self.ensure_editable("remove asset")?;
        Ok(self.staging.unstage(&mut self.draft, id))
    }

    pub fn clear_preview(&mut self) -> Result<Option<AssetReference>> {
        self.ensure_editable("clear preview")?;
        Ok(self.staging.clear(&mut self.draft, AssetKind::Preview))
    }

    pub fn clear_video(&mut self) -> Result<Option<AssetReference>> {
        self.ensure_editable("clear video")?;
        Ok(self.staging.clear(&mut self.draft, AssetKind::Video))
    }

    pub fn set_publication_mode(&mut self, mode: PublicationMode) -> Result<()> {
        self.ensure_editable("set publication mode")?;
        self.scheduler.set_mode(mode);
        Ok(())
    }

    /// Pick a publication date; past days are refused with a notification
    pub fn set_publication_date(&mut self, date: chrono::NaiveDate) -> Result<()> {
        self.ensure_editable("set publication date")?;
        if let Err(e) = self.scheduler.set_date(date) {
            self.notify(Notification::error(
                self.messages.error_title(),
                self.messages.invalid_date(),
            ));
            return Err(e.into());
        }
        Ok(())
    }

    pub fn clear_publication_date(&mut self) -> Result<()> {
        self.ensure_editable("clear publication date")?;
        self.scheduler.clear_date();
        Ok(())
    }

    /// Set the publication time from `HH:MM` input
    pub fn set_publication_time(&mut self, input: &str) -> Result<()> {
        self.ensure_editable("set publication time")?;
        if let Err(e) = self.scheduler.set_time_input(input) {
            self.notify(Notification::error(
                self.messages.error_title(),
                self.messages.invalid_time(),
            ));
            return Err(e.into());
        }
        Ok(())
    }

    /// Validate, deliver, and on success schedule navigation away
    ///
    /// Validation and delivery failures are outcomes, not errors: the
    /// workflow returns to editing and the user is notified. An error means
    /// the submit was not allowed in the current state.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        self.advance(SubmissionEvent::Submit)?;

        let today = self.scheduler.today();
        let validation = SubmissionValidator::validate(&self.draft, self.scheduler.plan(), today);
        if let ValidationResult::Invalid(failure) = validation {
            self.advance(SubmissionEvent::ValidationFailed)?;
            tracing::info!(%failure, "Submission blocked by validation");
            self.notify(Notification::error(
                self.messages.error_title(),
                self.messages.validation_failure(failure),
            ));
            return Ok(SubmitOutcome::Invalid(failure));
        }

        let payload = match self.compose_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.advance(SubmissionEvent::ValidationFailed)?;
                tracing::warn!(error = ?e, "Could not compose submission payload");
                self.notify(Notification::error(
                    self.messages.error_title(),
                    self.payload_failure_text(&e),
                ));
                return Err(e.into());
            }
        };

        self.advance(SubmissionEvent::ValidationPassed)?;
        tracing::info!(
            title = %payload.title,
            mode = %self.scheduler.mode(),
            documents = payload.documents.len(),
            publisher = self.publisher.service_name(),
            "Submitting practice"
        );

        let publisher = Arc::clone(&self.publisher);
        let guard = DeliveryGuard::new(&mut self.state);
        let delivery = publisher.publish(payload).await;
        guard.disarm();

        match delivery {
            Ok(receipt) => {
                self.advance(SubmissionEvent::DeliverySucceeded)?;
                tracing::info!(
                    submission_id = %receipt.submission_id,
                    provider = %receipt.provider,
                    scheduled = receipt.publication.is_scheduled(),
                    "Practice submitted"
                );

                let description = self.success_text();
                self.notify(Notification::success(
                    self.messages.success_title(),
                    description,
                ));

                self.staging.release_all();
                self.navigation = Some(NavigationTimer::schedule(
                    self.config.navigation_delay,
                    self.config.return_route.clone(),
                    self.events.clone(),
                ));
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(e) => {
                self.advance(SubmissionEvent::DeliveryFailed)?;
                tracing::error!(error = %e, "Practice delivery failed, draft kept");
                self.notify(Notification::error(
                    self.messages.delivery_failed_title(),
                    self.messages.delivery_failed(),
                ));
                Ok(SubmitOutcome::DeliveryFailed(e))
            }
        }
    }

    /// Leave the workflow without submitting
    ///
    /// Revokes every handle, drops any pending navigation and signals
    /// navigation back right away.
    pub fn cancel(mut self) {
        tracing::info!(state = %self.state, "Submission workflow cancelled");
        self.teardown();
        let event = WorkflowEvent::Navigate {
            route: self.config.return_route.clone(),
            reason: NavigationReason::Cancelled,
        };
        if self.events.send(event).is_err() {
            tracing::debug!("Workflow events receiver gone, cancel navigation dropped");
        }
    }

    /// Tear down with the hosting view; never navigates
    pub fn dismantle(mut self) {
        tracing::debug!(state = %self.state, "Submission workflow dismantled");
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(timer) = self.navigation.take() {
            timer.cancel();
        }
        self.staging.release_all();
    }

    fn stage(&mut self, kind: AssetKind, file: FileDescriptor) -> Result<AssetReference> {
        self.ensure_editable("stage asset")?;
        match self.staging.stage(&mut self.draft, kind, file) {
            Ok(asset) => Ok(asset),
            Err(e) => Err(self.staging_failed(kind, e)),
        }
    }

    fn staging_failed(&self, kind: AssetKind, err: StagingError) -> Error {
        let description = match &err {
            StagingError::UnsupportedKind { .. } => self.messages.unsupported_file(kind),
            StagingError::Resource(_) => self.messages.staging_failed(),
        };
        self.notify(Notification::error(self.messages.error_title(), description));
        err.into()
    }

    fn compose_payload(&self) -> std::result::Result<SubmissionPayload, PayloadError> {
        let video = self.draft.video().ok_or(PayloadError::MissingVideo)?;
        let publication: Publication = self
            .scheduler
            .plan()
            .resolve(self.config.timezone)
            .map_err(PayloadError::Schedule)?;

        Ok(SubmissionPayload {
            title: self.draft.title().to_string(),
            description: self.draft.description().to_string(),
            preview: self.draft.preview().map(AssetReference::summary),
            video: video.summary(),
            documents: self
                .draft
                .documents()
                .iter()
                .map(AssetReference::summary)
                .collect(),
            publication,
        })
    }

    fn payload_failure_text(&self, err: &PayloadError) -> &'static str {
        match err {
            PayloadError::MissingVideo => {
                self.messages.validation_failure(ValidationFailure::MissingVideo)
            }
            PayloadError::Schedule(ScheduleError::MissingDate) => self
                .messages
                .validation_failure(ValidationFailure::MissingScheduleDate),
            PayloadError::Schedule(ScheduleError::DateInPast { .. }) => {
                self.messages.invalid_date()
            }
            PayloadError::Schedule(ScheduleError::InvalidTime(_)) => self.messages.invalid_time(),
            PayloadError::Schedule(ScheduleError::UnresolvableLocalTime(_)) => {
                self.messages.unresolvable_time()
            }
        }
    }

    fn success_text(&self) -> String {
        match *self.scheduler.plan() {
            PublicationPlan::Scheduled {
                date: Some(date),
                time,
            } => self.messages.practice_scheduled(date, time),
            _ => self.messages.published_now().to_string(),
        }
    }

    fn ensure_editable(&self, action: &str) -> Result<()> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(StateError::GuardFailed(format!(
                "cannot {} while {}",
                action, self.state
            ))
            .into())
        }
    }

    fn advance(&mut self, event: SubmissionEvent) -> Result<()> {
        let next = SubmissionStateMachine::transition(self.state, event)?;
        tracing::debug!(from = %self.state, to = %next, %event, "Submission state changed");
        self.state = next;
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        if self.events.send(WorkflowEvent::Notify(notification)).is_err() {
            tracing::debug!("Workflow events receiver gone, notification dropped");
        }
    }
}
