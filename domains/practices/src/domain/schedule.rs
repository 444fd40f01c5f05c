//! Publication scheduling
//!
//! The plan is a tagged variant: an immediate plan has nowhere to keep a
//! date, so leaving scheduled mode always drops the picked date.

use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use practica_publisher::Publication;

use super::messages::Messages;

/// Strict 24-hour `HH:MM`, as produced by a time input
static TIME_INPUT_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time input regex is valid")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Publication date {date} is before {today}")]
    DateInPast { date: NaiveDate, today: NaiveDate },

    #[error("Invalid publication time: {0}")]
    InvalidTime(String),

    #[error("No publication date selected")]
    MissingDate,

    #[error("{0} does not exist in the publication time zone")]
    UnresolvableLocalTime(NaiveDateTime),
}

/// Publication mode as chosen with the radio buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationMode {
    #[serde(rename = "now")]
    Immediate,
    #[serde(rename = "scheduled")]
    Scheduled,
}

impl fmt::Display for PublicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => write!(f, "now"),
            Self::Scheduled => write!(f, "scheduled"),
        }
    }
}

/// When a practice should go live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationPlan {
    Immediate,
    Scheduled {
        date: Option<NaiveDate>,
        time: NaiveTime,
    },
}

impl PublicationPlan {
    pub fn mode(&self) -> PublicationMode {
        match self {
            Self::Immediate => PublicationMode::Immediate,
            Self::Scheduled { .. } => PublicationMode::Scheduled,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Immediate => None,
            Self::Scheduled { date, .. } => *date,
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::Immediate => None,
            Self::Scheduled { time, .. } => Some(*time),
        }
    }

    /// Only the date is compared with `today`; a same-day past time passes.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        match self {
            Self::Immediate => true,
            Self::Scheduled { date, .. } => date.is_some_and(|date| date >= today),
        }
    }

    /// Turn the plan into the publication handed to the publisher
    pub fn resolve(&self, timezone: Tz) -> Result<Publication, ScheduleError> {
        match self {
            Self::Immediate => Ok(Publication::Now),
            Self::Scheduled { date: None, .. } => Err(ScheduleError::MissingDate),
            Self::Scheduled {
                date: Some(date),
                time,
            } => Ok(Publication::Scheduled {
                instant: resolve_local(timezone, date.and_time(*time))?,
            }),
        }
    }
}

/// Wall-clock date in a zone; ambiguous times take the earlier instant and
/// times skipped by a DST gap move forward one hour.
fn resolve_local(timezone: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>, ScheduleError> {
    let resolved = match timezone.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => timezone
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest(),
    };

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ScheduleError::UnresolvableLocalTime(local))
}

/// Source of the current calendar date
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// Today's date in the publication time zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Clock whose date only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: Arc<Mutex<NaiveDate>>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(Mutex::new(today)),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = today;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds and checks the publication mode selection
#[derive(Debug, Clone)]
pub struct PublicationScheduler {
    plan: PublicationPlan,
    default_time: NaiveTime,
    clock: Arc<dyn Clock>,
}

impl PublicationScheduler {
    /// Starts in immediate mode
    pub fn new(clock: Arc<dyn Clock>, default_time: NaiveTime) -> Self {
        Self {
            plan: PublicationPlan::Immediate,
            default_time,
            clock,
        }
    }

    pub fn plan(&self) -> &PublicationPlan {
        &self.plan
    }

    pub fn mode(&self) -> PublicationMode {
        self.plan.mode()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn set_mode(&mut self, mode: PublicationMode) {
        self.plan = match (mode, self.plan) {
            (PublicationMode::Immediate, _) => PublicationPlan::Immediate,
            (PublicationMode::Scheduled, plan @ PublicationPlan::Scheduled { .. }) => plan,
            (PublicationMode::Scheduled, PublicationPlan::Immediate) => {
                PublicationPlan::Scheduled {
                    date: None,
                    time: self.default_time,
                }
            }
        };
        tracing::debug!(%mode, "Publication mode set");
    }

    /// Pick a publication date; days before today are refused like a
    /// calendar with past days disabled. Inert in immediate mode.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), ScheduleError> {
        let PublicationPlan::Scheduled { date: slot, .. } = &mut self.plan else {
            tracing::debug!(%date, "Ignoring publication date while publishing immediately");
            return Ok(());
        };

        let today = self.clock.today();
        if date < today {
            tracing::warn!(%date, %today, "Refusing publication date in the past");
            return Err(ScheduleError::DateInPast { date, today });
        }

        *slot = Some(date);
        Ok(())
    }

    /// Deselect the picked date
    pub fn clear_date(&mut self) {
        if let PublicationPlan::Scheduled { date, .. } = &mut self.plan {
            *date = None;
        }
    }

    /// Set the publication time. Inert in immediate mode.
    pub fn set_time(&mut self, time: NaiveTime) {
        if let PublicationPlan::Scheduled { time: slot, .. } = &mut self.plan {
            *slot = time;
        } else {
            tracing::debug!(%time, "Ignoring publication time while publishing immediately");
        }
    }

    /// Set the publication time from `HH:MM` input
    pub fn set_time_input(&mut self, input: &str) -> Result<(), ScheduleError> {
        let input = input.trim();
        if !TIME_INPUT_REGEX.is_match(input) {
            return Err(ScheduleError::InvalidTime(input.to_string()));
        }
        let time = NaiveTime::parse_from_str(input, "%H:%M")
            .map_err(|_| ScheduleError::InvalidTime(input.to_string()))?;
        self.set_time(time);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.plan.is_valid_on(self.clock.today())
    }

    /// Human-readable summary of the plan
    pub fn describe(&self, messages: &Messages) -> String {
        match self.plan {
            PublicationPlan::Immediate => messages.publishing_now().to_string(),
            PublicationPlan::Scheduled {
                date: Some(date),
                time,
            } => messages.scheduled_for(date, time),
            PublicationPlan::Scheduled { date: None, .. } => messages.date_not_selected().to_string(),
        }
    }
}
