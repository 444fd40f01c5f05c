//! Submission Workflow Integration Tests
//!
//! Drives the submission controller end to end against the mock
//! publication service: staging, validation, delivery, notification and
//! the deferred navigation that follows a successful submission.

mod common;

use std::time::Duration;

use practica_common::{Config, Error, Locale};
use practica_practices::{
    FileDescriptor, NavigationReason, NotificationVariant, PublicationMode, SubmissionState,
    SubmitOutcome, ValidationFailure, WorkflowEvent,
};
use practica_publisher::{Publication, PublisherError};

use crate::common::{cover_image, intro_video, is_navigation, TestWorkflow};

#[test_log::test(tokio::test(start_paused = true))]
async fn test_immediate_publication_e2e() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    assert!(workflow.controller.current_validation().is_valid());

    let outcome = workflow.controller.submit().await.unwrap();

    let SubmitOutcome::Submitted(receipt) = &outcome else {
        panic!("expected a submitted outcome, got {:?}", outcome);
    };
    assert_eq!(receipt.provider, "mock");
    assert_eq!(workflow.controller.state(), SubmissionState::Submitted);

    // Payload as delivered
    let captured = workflow.publisher.latest_submission().unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&captured.payload.to_json().unwrap()).unwrap();
    assert_eq!(json["title"], "Morning session");
    assert_eq!(json["description"], "Breathing practice");
    assert_eq!(json["video"]["name"], "intro.mp4");
    assert_eq!(json["video"]["sizeBytes"], 2_000_000);
    assert_eq!(json["publication"]["mode"], "now");
    assert!(json.get("preview").is_none());

    // Success notification, nothing else yet
    let events = workflow.drain_events();
    assert_eq!(events.len(), 1);
    let WorkflowEvent::Notify(notification) = &events[0] else {
        panic!("expected a notification, got {:?}", events[0]);
    };
    assert_eq!(notification.variant, NotificationVariant::Default);
    assert_eq!(notification.title, "Success!");
    assert_eq!(notification.description, "Practice published successfully");

    // Navigation only after the grace period
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(workflow.drain_events().is_empty());

    tokio::time::sleep(Duration::from_millis(501)).await;
    assert_eq!(
        workflow.drain_events(),
        vec![WorkflowEvent::Navigate {
            route: "/practices".to_string(),
            reason: NavigationReason::Submitted,
        }]
    );
    assert!(!workflow.controller.has_pending_navigation());
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_scheduled_without_date_never_submits() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();

    let outcome = workflow.controller.submit().await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid(ValidationFailure::MissingScheduleDate)
    );
    assert_eq!(workflow.controller.state(), SubmissionState::Editing);
    assert_eq!(workflow.publisher.submission_count(), 0);

    let notifications = workflow.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_error());
    assert_eq!(
        notifications[0].description,
        "Please choose a publication date"
    );

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!workflow.drain_events().iter().any(is_navigation));
    assert!(!workflow.controller.has_pending_navigation());
}

#[test_log::test(tokio::test)]
async fn test_validation_reports_one_failure_at_a_time() {
    let mut workflow = TestWorkflow::new();

    let expected = [
        ValidationFailure::MissingTitle,
        ValidationFailure::MissingDescription,
        ValidationFailure::MissingVideo,
    ];
    for failure in expected {
        let outcome = workflow.controller.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Invalid(failure));
        assert_eq!(workflow.drain_notifications().len(), 1);

        match failure {
            ValidationFailure::MissingTitle => {
                workflow.controller.set_title("Morning session").unwrap()
            }
            ValidationFailure::MissingDescription => workflow
                .controller
                .set_description("Breathing practice")
                .unwrap(),
            _ => {
                workflow.controller.stage_video(intro_video()).unwrap();
            }
        }
    }

    let outcome = workflow.controller.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_delivery_failure_keeps_draft_and_assets() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow.controller.stage_preview(cover_image()).unwrap();
    workflow
        .publisher
        .fail_with(PublisherError::Rejected("duplicate title".to_string()));

    let outcome = workflow.controller.submit().await.unwrap();

    assert!(matches!(
        outcome,
        SubmitOutcome::DeliveryFailed(PublisherError::Rejected(_))
    ));
    assert_eq!(workflow.controller.state(), SubmissionState::Editing);
    assert_eq!(workflow.controller.draft().title(), "Morning session");
    assert_eq!(workflow.registry.live_count(), 2);

    let notifications = workflow.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_error());
    assert_eq!(notifications[0].title, "Submission failed");
    assert_ne!(notifications[0].title, "Error");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(workflow.drain_events().is_empty());
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_teardown_during_grace_period_cancels_navigation() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow.controller.submit().await.unwrap();
    workflow.drain_events();

    tokio::time::sleep(Duration::from_millis(500)).await;
    let TestWorkflow {
        controller,
        mut events,
        ..
    } = workflow;
    controller.dismantle();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(events.recv().await, None);
}

#[test_log::test(tokio::test)]
async fn test_cancel_revokes_handles_and_navigates_back() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow.controller.stage_preview(cover_image()).unwrap();
    assert_eq!(workflow.registry.live_count(), 2);

    let TestWorkflow {
        controller,
        mut events,
        registry,
        publisher,
        ..
    } = workflow;
    controller.cancel();

    assert_eq!(registry.live_count(), 0);
    assert_eq!(publisher.submission_count(), 0);
    assert_eq!(
        events.recv().await,
        Some(WorkflowEvent::Navigate {
            route: "/practices".to_string(),
            reason: NavigationReason::Cancelled,
        })
    );
}

#[test_log::test(tokio::test)]
async fn test_every_handle_revoked_exactly_once() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();

    let first = workflow.controller.stage_preview(cover_image()).unwrap();
    let second = workflow
        .controller
        .stage_preview(FileDescriptor::new("cover-2.webp", 1_024).with_mime_type("image/webp"))
        .unwrap();
    let video = workflow.controller.draft().video().cloned().unwrap();

    workflow.controller.set_title("Evening session").unwrap();
    assert_eq!(workflow.registry.live_count(), 2);

    workflow.controller.submit().await.unwrap();

    for asset in [&first, &second, &video] {
        let handle = asset.preview_handle.as_ref().unwrap();
        assert_eq!(workflow.registry.revocation_count(handle), 1);
    }
    assert_eq!(workflow.registry.live_count(), 0);

    workflow.controller.dismantle();
    for asset in [&first, &second, &video] {
        let handle = asset.preview_handle.as_ref().unwrap();
        assert_eq!(workflow.registry.revocation_count(handle), 1);
    }
}

#[test_log::test(tokio::test)]
async fn test_documents_keep_pick_order_in_payload() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    let staged = workflow
        .controller
        .stage_documents(vec![
            FileDescriptor::new("plan.pdf", 1_024),
            FileDescriptor::new("worksheet.xlsx", 1_536),
            FileDescriptor::new("slides.pptx", 0),
        ])
        .unwrap();
    workflow.controller.remove_asset(staged[1].id).unwrap();

    workflow.controller.submit().await.unwrap();

    let payload = workflow.publisher.latest_submission().unwrap().payload;
    let names: Vec<&str> = payload.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["plan.pdf", "slides.pptx"]);
    assert_eq!(payload.publication, Publication::Now);

    let sizes: Vec<String> = staged.iter().map(|a| a.describe().human_size).collect();
    assert_eq!(sizes, vec!["1 KB", "1.5 KB", "0 Bytes"]);
}

#[test_log::test(tokio::test)]
async fn test_ukrainian_notifications() {
    let mut workflow = TestWorkflow::with_config(Config {
        locale: Locale::Uk,
        ..Config::default()
    });
    workflow.fill_required();
    assert_eq!(workflow.controller.submit_label(), "Опублікувати");

    workflow.controller.submit().await.unwrap();

    let notifications = workflow.drain_notifications();
    assert_eq!(notifications[0].title, "Успіх!");
    assert_eq!(
        notifications[0].description,
        "Практика успішно опублікована"
    );
}

#[test_log::test(tokio::test)]
async fn test_edits_rejected_after_submission() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow.controller.submit().await.unwrap();

    assert!(matches!(
        workflow.controller.stage_video(intro_video()),
        Err(Error::State(_))
    ));
    assert!(matches!(
        workflow.controller.submit().await,
        Err(Error::State(_))
    ));
    assert_eq!(workflow.publisher.submission_count(), 1);
}
