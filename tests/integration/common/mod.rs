//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for the workflow tests:
//! - A controller wired to the mock publication service
//! - A shared handle registry to observe preview handle lifecycles
//! - A manual clock pinned to a known date
//! - Draft fixtures and event helpers

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc::UnboundedReceiver;

use practica_common::{Config, Locale};
use practica_practices::{
    FileDescriptor, LocalHandleRegistry, ManualClock, Notification, SubmissionController,
    WorkflowEvent,
};
use practica_publisher::mock::MockPublicationService;

/// Date every test workflow considers "today"
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Controller plus the collaborators a test needs to observe
pub struct TestWorkflow {
    pub controller: SubmissionController,
    pub events: UnboundedReceiver<WorkflowEvent>,
    pub publisher: MockPublicationService,
    pub registry: LocalHandleRegistry,
    pub clock: ManualClock,
}

impl TestWorkflow {
    /// English workflow with default configuration
    pub fn new() -> Self {
        Self::with_config(Config {
            locale: Locale::En,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let publisher = MockPublicationService::new();
        let registry = LocalHandleRegistry::new();
        let clock = ManualClock::new(today());

        let (controller, events) = SubmissionController::new(
            config,
            Arc::new(publisher.clone()),
            Arc::new(registry.clone()),
            Arc::new(clock.clone()),
        );

        Self {
            controller,
            events,
            publisher,
            registry,
            clock,
        }
    }

    /// Title, description and the intro video
    pub fn fill_required(&mut self) {
        self.controller.set_title("Morning session").unwrap();
        self.controller.set_description("Breathing practice").unwrap();
        self.controller.stage_video(intro_video()).unwrap();
    }

    /// Every event delivered so far, without waiting
    pub fn drain_events(&mut self) -> Vec<WorkflowEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Notifications among the events delivered so far
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                WorkflowEvent::Notify(notification) => Some(notification),
                WorkflowEvent::Navigate { .. } => None,
            })
            .collect()
    }
}

pub fn intro_video() -> FileDescriptor {
    FileDescriptor::new("intro.mp4", 2_000_000).with_mime_type("video/mp4")
}

pub fn cover_image() -> FileDescriptor {
    FileDescriptor::new("cover.png", 48_213).with_mime_type("image/png")
}

pub fn is_navigation(event: &WorkflowEvent) -> bool {
    matches!(event, WorkflowEvent::Navigate { .. })
}
