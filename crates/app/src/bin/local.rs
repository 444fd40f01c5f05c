// Practica - Local submission walkthrough
//
// Usage: local [YYYY-MM-DD [HH:MM]]
// Without a date the practice is published immediately.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use practica_common::Config;
use practica_practices::{FileDescriptor, PublicationMode, SubmitOutcome, WorkflowEvent};
use practica_publisher::PublisherConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_new(&config.rust_log)?)
        .pretty()
        .init();

    info!(
        locale = ?config.locale,
        timezone = %config.timezone,
        "Starting Practica local submission walkthrough"
    );

    let publisher_config = PublisherConfig::from_env()?;
    let (mut workflow, mut events) = practica_app::create_workflow(config, publisher_config)
        .map_err(|e| {
            error!("Failed to create workflow: {}", e);
            e
        })?;

    let mut args = std::env::args().skip(1);
    let date = args
        .next()
        .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
        .transpose()?;
    let time = args.next();

    workflow.set_title("Morning session")?;
    workflow.set_description("<p>Breathing practice</p>")?;
    workflow.stage_preview(FileDescriptor::new("cover.png", 48_213).with_mime_type("image/png"))?;
    workflow.stage_video(FileDescriptor::new("intro.mp4", 2_000_000).with_mime_type("video/mp4"))?;
    workflow.stage_documents(vec![
        FileDescriptor::new("breathing-guide.pdf", 182_044),
        FileDescriptor::new("schedule.xlsx", 9_812),
    ])?;

    if let Some(date) = date {
        workflow.set_publication_mode(PublicationMode::Scheduled)?;
        workflow.set_publication_date(date)?;
        if let Some(time) = time {
            workflow.set_publication_time(&time)?;
        }
    }

    for asset in workflow.draft().documents() {
        let description = asset.describe();
        info!(
            name = %asset.original_name,
            icon = %description.icon,
            size = %description.human_size,
            "Attached document"
        );
    }
    info!(
        plan = %workflow.publication_summary(),
        action = workflow.submit_label(),
        "Draft ready"
    );

    match workflow.submit().await? {
        SubmitOutcome::Submitted(receipt) => {
            info!(submission_id = %receipt.submission_id, "Submission accepted");
        }
        SubmitOutcome::Invalid(failure) => warn!(%failure, "Submission blocked"),
        SubmitOutcome::DeliveryFailed(e) => warn!(error = %e, "Submission not delivered"),
    }

    let navigating = workflow.has_pending_navigation();
    while let Some(event) = events.recv().await {
        match event {
            WorkflowEvent::Notify(notification) => {
                info!(
                    variant = ?notification.variant,
                    title = %notification.title,
                    "{}",
                    notification.description
                );
                if !navigating {
                    break;
                }
            }
            WorkflowEvent::Navigate { route, reason } => {
                info!(%route, ?reason, "Navigation requested");
                break;
            }
        }
    }

    workflow.dismantle();
    info!("Walkthrough complete");
    Ok(())
}
