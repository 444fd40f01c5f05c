//! State machine for the submission workflow
//!
//! Submission states: Editing → Validating → Editing | Submitting;
//! Submitting → Submitted | Editing. Submitted is a terminal state.

use serde::{Deserialize, Serialize};

use practica_common::StateError;

/// Submission workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Editing,
    Validating,
    Submitting,
    Submitted,
}

impl SubmissionState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Whether the draft accepts edits in this state
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Editing)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [SubmissionState] {
        match self {
            Self::Editing => &[Self::Validating],
            Self::Validating => &[Self::Editing, Self::Submitting],
            Self::Submitting => &[Self::Submitted, Self::Editing],
            Self::Submitted => &[],
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editing => write!(f, "editing"),
            Self::Validating => write!(f, "validating"),
            Self::Submitting => write!(f, "submitting"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// Events that trigger submission state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmissionEvent {
    /// User asked to publish or schedule
    Submit,
    /// Draft failed a required-field rule
    ValidationFailed,
    /// Draft passed every rule
    ValidationPassed,
    /// Publication service accepted the payload
    DeliverySucceeded,
    /// Publication service refused or was unreachable
    DeliveryFailed,
}

impl std::fmt::Display for SubmissionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ValidationPassed => write!(f, "validation_passed"),
            Self::DeliverySucceeded => write!(f, "delivery_succeeded"),
            Self::DeliveryFailed => write!(f, "delivery_failed"),
        }
    }
}

/// Submission state machine
pub struct SubmissionStateMachine;

impl SubmissionStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: SubmissionState,
        event: SubmissionEvent,
    ) -> Result<SubmissionState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (SubmissionState::Editing, SubmissionEvent::Submit) => SubmissionState::Validating,

            (SubmissionState::Validating, SubmissionEvent::ValidationFailed) => {
                SubmissionState::Editing
            }
            (SubmissionState::Validating, SubmissionEvent::ValidationPassed) => {
                SubmissionState::Submitting
            }

            (SubmissionState::Submitting, SubmissionEvent::DeliverySucceeded) => {
                SubmissionState::Submitted
            }
            (SubmissionState::Submitting, SubmissionEvent::DeliveryFailed) => {
                SubmissionState::Editing
            }

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: SubmissionState, event: &SubmissionEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
