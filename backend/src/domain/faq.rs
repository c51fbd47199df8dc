//! Frequently asked questions curated by admins.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned when none is supplied.
pub const FAQ_DEFAULT_CATEGORY: &str = "General";

/// Validation errors raised while building FAQ inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaqValidationError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("search query must not be empty")]
    EmptyQuery,
}

impl FaqValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyQuestion => "question",
            Self::EmptyAnswer => "answer",
            Self::EmptyQuery => "q",
        }
    }
}

/// Stable FAQ identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaqId(Uuid);

impl FaqId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FaqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question/answer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Faq {
    /// Case-insensitive substring match over question or answer.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle) || self.answer.to_lowercase().contains(needle)
    }
}

/// Unvalidated FAQ creation input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqInput {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
}

/// Unvalidated partial FAQ update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
}

/// Column-level FAQ changes. `None` leaves a column as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed non-empty question.
pub fn validate_question(raw: &str) -> Result<String, FaqValidationError> {
    non_blank(raw).ok_or(FaqValidationError::EmptyQuestion)
}

/// Trimmed non-empty answer.
pub fn validate_answer(raw: &str) -> Result<String, FaqValidationError> {
    non_blank(raw).ok_or(FaqValidationError::EmptyAnswer)
}

/// Trimmed category, falling back to [`FAQ_DEFAULT_CATEGORY`] when blank.
#[must_use]
pub fn normalise_category(raw: Option<&str>) -> String {
    raw.and_then(non_blank)
        .unwrap_or_else(|| FAQ_DEFAULT_CATEGORY.to_owned())
}

/// Lower-cased search needle.
pub fn search_needle(raw: &str) -> Result<String, FaqValidationError> {
    non_blank(raw)
        .map(|needle| needle.to_lowercase())
        .ok_or(FaqValidationError::EmptyQuery)
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
