//! Submission workflow: the controller a practice form talks to
//!
//! The controller owns the draft, the staging manager and the scheduler,
//! and reports everything the view must show through `WorkflowEvent`s.

pub mod controller;
pub mod navigation;

use serde::Serialize;

pub use controller::{SubmissionController, SubmitOutcome};
pub use navigation::NavigationTimer;

/// How a notification should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Why the workflow navigated away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationReason {
    Submitted,
    Cancelled,
}

/// Side effects the hosting view must carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    Notify(Notification),
    Navigate {
        route: String,
        reason: NavigationReason,
    },
}
