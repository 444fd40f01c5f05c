//! Mock Publication Service Implementation
//!
//! Provides in-memory payload capture for testing without a delivery
//! backend. Can be switched into a failing mode to exercise the
//! workflow's delivery-failure path.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{PublicationReceipt, PublicationService, PublisherError, SubmissionPayload};

/// Submission captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedSubmission {
    pub payload: SubmissionPayload,
    pub receipt: PublicationReceipt,
    pub captured_at: DateTime<Utc>,
}

/// Mock publication service for testing
#[derive(Debug, Clone)]
pub struct MockPublicationService {
    submissions: Arc<Mutex<Vec<CapturedSubmission>>>,
    failure: Arc<Mutex<Option<PublisherError>>>,
    enabled: bool,
}

impl MockPublicationService {
    /// Create a new mock publication service
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            enabled: true,
        }
    }

    /// Create a disabled mock service that acknowledges without capturing
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Make every following publish fail with `error` until cleared
    pub fn fail_with(&self, error: PublisherError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Stop simulating failures
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Get the most recently captured submission
    pub fn latest_submission(&self) -> Option<CapturedSubmission> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Get count of captured submissions
    pub fn submission_count(&self) -> usize {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if capturing is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockPublicationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PublicationService for MockPublicationService {
    async fn publish(
        &self,
        payload: SubmissionPayload,
    ) -> Result<PublicationReceipt, PublisherError> {
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(error) = failure {
            tracing::warn!(title = %payload.title, error = %error, "Mock publication service failing on purpose");
            return Err(error);
        }

        if !self.enabled {
            tracing::warn!("Mock publication service disabled, skipping capture");
            return Ok(PublicationReceipt {
                submission_id: Uuid::new_v4(),
                accepted_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                publication: payload.publication,
            });
        }

        let receipt = PublicationReceipt {
            submission_id: Uuid::new_v4(),
            accepted_at: Utc::now(),
            provider: "mock".to_string(),
            publication: payload.publication,
        };

        tracing::info!(
            submission_id = %receipt.submission_id,
            title = %payload.title,
            documents = payload.documents.len(),
            "Mock publication service captured submission"
        );

        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedSubmission {
                payload,
                receipt: receipt.clone(),
                captured_at: Utc::now(),
            });

        Ok(receipt)
    }

    fn service_name(&self) -> &'static str {
        "mock"
    }
}
