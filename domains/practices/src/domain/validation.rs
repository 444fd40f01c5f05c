//! Required-field rules for submitting a practice
//!
//! Rules run in a fixed order and the first failure is the only one
//! reported: title, description, video, then the schedule date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::ContentDraft;
use super::schedule::PublicationPlan;

/// Why a draft cannot be submitted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationFailure {
    MissingTitle,
    MissingDescription,
    MissingVideo,
    MissingScheduleDate,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "missing_title"),
            Self::MissingDescription => write!(f, "missing_description"),
            Self::MissingVideo => write!(f, "missing_video"),
            Self::MissingScheduleDate => write!(f, "missing_schedule_date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationFailure),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failure(&self) -> Option<ValidationFailure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(*failure),
        }
    }
}

/// Pure draft checks, safe to run on every keystroke
pub struct SubmissionValidator;

impl SubmissionValidator {
    pub fn validate(
        draft: &ContentDraft,
        plan: &PublicationPlan,
        today: NaiveDate,
    ) -> ValidationResult {
        match Self::first_failure(draft, plan, today) {
            Some(failure) => ValidationResult::Invalid(failure),
            None => ValidationResult::Valid,
        }
    }

    fn first_failure(
        draft: &ContentDraft,
        plan: &PublicationPlan,
        today: NaiveDate,
    ) -> Option<ValidationFailure> {
        // Whitespace-only input counts as empty
        if draft.title().trim().is_empty() {
            return Some(ValidationFailure::MissingTitle);
        }
        if draft.description().trim().is_empty() {
            return Some(ValidationFailure::MissingDescription);
        }
        if draft.video().is_none() {
            return Some(ValidationFailure::MissingVideo);
        }
        if let PublicationPlan::Scheduled { date, .. } = plan {
            if date.is_none() || !plan.is_valid_on(today) {
                return Some(ValidationFailure::MissingScheduleDate);
            }
        }
        None
    }
}
