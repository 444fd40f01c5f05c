//! Practices domain: staging, scheduling and submitting a new practice

pub mod domain;
pub mod workflow;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    human_size, AssetDescription, AssetId, AssetKind, AssetReference, ContentDraft,
    FileDescriptor, IconCategory, PreviewHandle,
};
pub use domain::messages::Messages;
pub use domain::schedule::{
    Clock, ManualClock, PublicationMode, PublicationPlan, PublicationScheduler, ScheduleError,
    SystemClock,
};
pub use domain::staging::{
    AssetStagingManager, LocalHandleRegistry, PreviewHandleRegistry, ResourceError, StagingError,
};
pub use domain::state::{SubmissionEvent, SubmissionState, SubmissionStateMachine};
pub use domain::validation::{SubmissionValidator, ValidationFailure, ValidationResult};

// Re-export workflow types
pub use workflow::{
    NavigationReason, NavigationTimer, Notification, NotificationVariant, SubmissionController,
    SubmitOutcome, WorkflowEvent,
};
