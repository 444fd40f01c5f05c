//! User-facing text for the submission workflow
//!
//! Ukrainian dates use genitive month names ("2 листопада 2026"); English
//! dates read "November 2, 2026".

use chrono::{Datelike, NaiveDate, NaiveTime};

use practica_common::Locale;

use super::entities::AssetKind;
use super::schedule::PublicationMode;
use super::validation::ValidationFailure;

const UK_MONTHS_GENITIVE: [&str; 12] = [
    "січня",
    "лютого",
    "березня",
    "квітня",
    "травня",
    "червня",
    "липня",
    "серпня",
    "вересня",
    "жовтня",
    "листопада",
    "грудня",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Message catalog for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self.locale {
            Locale::Uk => format!("{} {} {}", date.day(), UK_MONTHS_GENITIVE[month], date.year()),
            Locale::En => format!("{} {}, {}", EN_MONTHS[month], date.day(), date.year()),
        }
    }

    pub fn format_time(&self, time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn error_title(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Помилка",
            Locale::En => "Error",
        }
    }

    pub fn success_title(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Успіх!",
            Locale::En => "Success!",
        }
    }

    pub fn delivery_failed_title(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Не вдалося надіслати",
            Locale::En => "Submission failed",
        }
    }

    pub fn validation_failure(&self, failure: ValidationFailure) -> &'static str {
        match (self.locale, failure) {
            (Locale::Uk, ValidationFailure::MissingTitle) => "Будь ласка, введіть назву практики",
            (Locale::Uk, ValidationFailure::MissingDescription) => {
                "Будь ласка, додайте опис практики"
            }
            (Locale::Uk, ValidationFailure::MissingVideo) => "Будь ласка, завантажте відео",
            (Locale::Uk, ValidationFailure::MissingScheduleDate) => {
                "Будь ласка, виберіть дату публікації"
            }
            (Locale::En, ValidationFailure::MissingTitle) => "Please enter a practice title",
            (Locale::En, ValidationFailure::MissingDescription) => {
                "Please add a practice description"
            }
            (Locale::En, ValidationFailure::MissingVideo) => "Please upload a video",
            (Locale::En, ValidationFailure::MissingScheduleDate) => {
                "Please choose a publication date"
            }
        }
    }

    pub fn delivery_failed(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Практику не вдалося надіслати. Чернетку збережено, спробуйте ще раз",
            Locale::En => "The practice could not be delivered. Your draft is kept, please try again",
        }
    }

    pub fn staging_failed(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Не вдалося підготувати файл. Спробуйте завантажити його ще раз",
            Locale::En => "The file could not be prepared. Please try uploading it again",
        }
    }

    pub fn unsupported_file(&self, kind: AssetKind) -> &'static str {
        match (self.locale, kind) {
            (Locale::Uk, AssetKind::Preview) => "Для превью потрібне зображення",
            (Locale::Uk, AssetKind::Video) => "Будь ласка, виберіть відеофайл",
            (Locale::Uk, AssetKind::Document) => "Цей тип документа не підтримується",
            (Locale::En, AssetKind::Preview) => "The preview must be an image",
            (Locale::En, AssetKind::Video) => "Please choose a video file",
            (Locale::En, AssetKind::Document) => "This document type is not supported",
        }
    }

    pub fn invalid_date(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Не можна вибрати дату в минулому",
            Locale::En => "The publication date cannot be in the past",
        }
    }

    pub fn invalid_time(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Вкажіть час у форматі ГГ:ХХ",
            Locale::En => "Enter the time as HH:MM",
        }
    }

    /// A scheduled wall-clock time the zone skips entirely
    pub fn unresolvable_time(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Цей час не існує в часовому поясі публікації, виберіть інший",
            Locale::En => "This time does not exist in the publication time zone, please pick another",
        }
    }

    /// Success text after an immediate publication
    pub fn published_now(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Практика успішно опублікована",
            Locale::En => "Practice published successfully",
        }
    }

    /// Success text after scheduling
    pub fn practice_scheduled(&self, date: NaiveDate, time: NaiveTime) -> String {
        let (date, time) = (self.format_date(date), self.format_time(time));
        match self.locale {
            Locale::Uk => format!("Практику заплановано на {} о {}", date, time),
            Locale::En => format!("Practice scheduled for {} at {}", date, time),
        }
    }

    pub fn publishing_now(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Публікація одразу",
            Locale::En => "Publishing now",
        }
    }

    pub fn scheduled_for(&self, date: NaiveDate, time: NaiveTime) -> String {
        let (date, time) = (self.format_date(date), self.format_time(time));
        match self.locale {
            Locale::Uk => format!("Заплановано на {} о {}", date, time),
            Locale::En => format!("Scheduled for {} at {}", date, time),
        }
    }

    pub fn date_not_selected(&self) -> &'static str {
        match self.locale {
            Locale::Uk => "Дату публікації не вибрано",
            Locale::En => "No publication date selected",
        }
    }

    /// Label of the primary action button
    pub fn submit_label(&self, mode: PublicationMode) -> &'static str {
        match (self.locale, mode) {
            (Locale::Uk, PublicationMode::Immediate) => "Опублікувати",
            (Locale::Uk, PublicationMode::Scheduled) => "Запланувати",
            (Locale::En, PublicationMode::Immediate) => "Publish",
            (Locale::En, PublicationMode::Scheduled) => "Schedule",
        }
    }

    /// Format hint shown inside a picker
    pub fn upload_hint(&self, kind: AssetKind) -> &'static str {
        match (self.locale, kind) {
            (Locale::Uk, AssetKind::Preview) => "JPG, PNG або WEBP",
            (Locale::Uk, AssetKind::Video) => "MP4, WebM або OGG (макс. 500MB)",
            (Locale::En, AssetKind::Preview) => "JPG, PNG or WEBP",
            (Locale::En, AssetKind::Video) => "MP4, WebM or OGG (max 500MB)",
            (_, AssetKind::Document) => "PDF, Word, Excel, PowerPoint",
        }
    }
}
