//! Scheduling Workflow Integration Tests
//!
//! Covers scheduled publication through the controller: date guards,
//! mode switching, instant resolution in the configured zone and the
//! scheduled success message.

mod common;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use practica_common::{Config, Error, Locale};
use practica_practices::{PublicationMode, SubmitOutcome, ValidationFailure};
use practica_publisher::Publication;

use crate::common::{today, TestWorkflow};

fn november_second() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_scheduled_publication_e2e() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();
    workflow
        .controller
        .set_publication_date(november_second())
        .unwrap();
    workflow.controller.set_publication_time("09:30").unwrap();
    assert_eq!(workflow.controller.submit_label(), "Schedule");
    assert_eq!(
        workflow.controller.publication_summary(),
        "Scheduled for November 2, 2026 at 09:30"
    );

    let outcome = workflow.controller.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));

    // Kyiv is UTC+2 in November
    let captured = workflow.publisher.latest_submission().unwrap();
    assert_eq!(
        captured.payload.publication,
        Publication::Scheduled {
            instant: Utc.with_ymd_and_hms(2026, 11, 2, 7, 30, 0).unwrap()
        }
    );
    assert_eq!(captured.receipt.publication, captured.payload.publication);

    let notifications = workflow.drain_notifications();
    assert_eq!(
        notifications[0].description,
        "Practice scheduled for November 2, 2026 at 09:30"
    );
}

#[test_log::test(tokio::test)]
async fn test_mode_round_trip_drops_stale_date() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();
    workflow
        .controller
        .set_publication_date(november_second())
        .unwrap();

    workflow
        .controller
        .set_publication_mode(PublicationMode::Immediate)
        .unwrap();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();

    assert_eq!(workflow.controller.plan().date(), None);
    assert_eq!(
        workflow.controller.plan().time(),
        NaiveTime::from_hms_opt(12, 0, 0)
    );
    assert_eq!(
        workflow.controller.submit().await.unwrap(),
        SubmitOutcome::Invalid(ValidationFailure::MissingScheduleDate)
    );
}

#[test_log::test(tokio::test)]
async fn test_today_is_schedulable_but_yesterday_is_not() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();

    let refused = workflow
        .controller
        .set_publication_date(today().pred_opt().unwrap());
    assert!(matches!(refused, Err(Error::Validation(_))));
    assert_eq!(workflow.controller.plan().date(), None);

    tokio_test::assert_ok!(workflow.controller.set_publication_date(today()));
    // A time earlier than now on the same day still passes
    workflow.controller.set_publication_time("00:00").unwrap();
    assert!(workflow.controller.current_validation().is_valid());
}

#[test_log::test(tokio::test)]
async fn test_date_goes_stale_when_the_day_passes() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();
    workflow.controller.set_publication_date(today()).unwrap();

    workflow.clock.set(today().succ_opt().unwrap());

    assert_eq!(
        workflow.controller.submit().await.unwrap(),
        SubmitOutcome::Invalid(ValidationFailure::MissingScheduleDate)
    );
    assert_eq!(workflow.publisher.submission_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_instant_follows_configured_timezone() {
    let mut workflow = TestWorkflow::with_config(Config {
        locale: Locale::En,
        timezone: chrono_tz::UTC,
        ..Config::default()
    });
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();
    workflow
        .controller
        .set_publication_date(november_second())
        .unwrap();

    workflow.controller.submit().await.unwrap();

    let json: serde_json::Value = serde_json::from_str(
        &workflow
            .publisher
            .latest_submission()
            .unwrap()
            .payload
            .to_json()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(json["publication"]["mode"], "scheduled");
    assert_eq!(json["publication"]["instant"], "2026-11-02T12:00:00Z");
}

#[test_log::test(tokio::test)]
async fn test_date_and_time_are_inert_while_immediate() {
    let mut workflow = TestWorkflow::new();
    workflow.fill_required();

    workflow
        .controller
        .set_publication_date(november_second())
        .unwrap();
    workflow.controller.set_publication_time("18:00").unwrap();

    assert_eq!(workflow.controller.plan().date(), None);
    workflow.controller.submit().await.unwrap();
    assert_eq!(
        workflow.publisher.latest_submission().unwrap().payload.publication,
        Publication::Now
    );
}

#[test_log::test(tokio::test)]
async fn test_ukrainian_scheduled_summary() {
    let mut workflow = TestWorkflow::with_config(Config::default());
    workflow.fill_required();
    workflow
        .controller
        .set_publication_mode(PublicationMode::Scheduled)
        .unwrap();
    workflow
        .controller
        .set_publication_date(november_second())
        .unwrap();

    assert_eq!(workflow.controller.submit_label(), "Запланувати");
    assert_eq!(
        workflow.controller.publication_summary(),
        "Заплановано на 2 листопада 2026 о 12:00"
    );

    workflow.controller.submit().await.unwrap();
    assert_eq!(
        workflow.drain_notifications()[0].description,
        "Практику заплановано на 2 листопада 2026 о 12:00"
    );
}
