//! Practica Publication Service
//!
//! Defines the hand-off between the submission workflow and whatever
//! delivers a finished practice:
//! - The submission payload shape and its JSON encoding
//! - The `PublicationService` seam the workflow calls into
//! - A mock service that captures payloads for tests and local runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod mock;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PublisherError {
    #[error("Publisher configuration error: {0}")]
    Configuration(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Publication service unavailable: {0}")]
    Unavailable(String),
}

/// Name and size of an attached file, as delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub name: String,
    pub size_bytes: u64,
}

impl AssetSummary {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// When the practice goes live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Publication {
    Now,
    Scheduled { instant: DateTime<Utc> },
}

impl Publication {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// Everything handed to the publication service for one practice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<AssetSummary>,
    pub video: AssetSummary,
    pub documents: Vec<AssetSummary>,
    pub publication: Publication,
}

impl SubmissionPayload {
    /// Encode the payload as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Acknowledgement returned by a publication service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationReceipt {
    pub submission_id: Uuid,
    pub accepted_at: DateTime<Utc>,
    pub provider: String,
    pub publication: Publication,
}

/// Publication service configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Publication provider (mock)
    pub provider: String,
    /// Enable delivery (can disable for demos)
    pub enabled: bool,
}

impl PublisherConfig {
    /// Create publisher config from environment variables
    pub fn from_env() -> Result<Self, PublisherError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("PUBLISHER_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let enabled = std::env::var("PUBLISHER_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self { provider, enabled })
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            enabled: true,
        }
    }
}

/// Publication service trait for different implementations
#[async_trait::async_trait]
pub trait PublicationService: Send + Sync {
    /// Deliver a validated submission
    async fn publish(&self, payload: SubmissionPayload)
        -> Result<PublicationReceipt, PublisherError>;

    /// Short provider name used in logs
    fn service_name(&self) -> &'static str;
}

/// Publication service factory
pub struct PublicationServiceFactory;

impl PublicationServiceFactory {
    /// Create publication service based on configuration
    pub fn create(config: PublisherConfig) -> Result<Box<dyn PublicationService>, PublisherError> {
        if !config.enabled {
            tracing::info!("Publication disabled, using disabled mock implementation");
            return Ok(Box::new(mock::MockPublicationService::new_disabled()));
        }

        match config.provider.as_str() {
            "mock" => {
                tracing::info!("Creating mock publication service");
                Ok(Box::new(mock::MockPublicationService::new()))
            }
            provider => Err(PublisherError::Configuration(format!(
                "Unknown publication provider: {}. Supported providers: mock",
                provider
            ))),
        }
    }
}
