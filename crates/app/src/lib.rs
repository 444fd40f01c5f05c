//! Practica application composition root
//!
//! Wires configuration, the publication service and the local handle
//! registry into a ready-to-drive submission workflow.

use std::sync::Arc;

use practica_common::Config;
use practica_practices::{LocalHandleRegistry, SubmissionController, SystemClock, WorkflowEvent};
use practica_publisher::{PublicationServiceFactory, PublisherConfig};
use tokio::sync::mpsc::UnboundedReceiver;

/// Build a submission workflow from explicit configuration
pub fn create_workflow(
    config: Config,
    publisher_config: PublisherConfig,
) -> Result<(SubmissionController, UnboundedReceiver<WorkflowEvent>), anyhow::Error> {
    let publisher = PublicationServiceFactory::create(publisher_config)?;
    let clock = SystemClock::new(config.timezone);

    Ok(SubmissionController::new(
        config,
        Arc::from(publisher),
        Arc::new(LocalHandleRegistry::new()),
        Arc::new(clock),
    ))
}
