//! Content section enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three content sections of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_section", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Grade-leveled lesson documents.
    Lessons,
    /// Exercise sheets.
    Exercises,
    /// Revision summaries.
    Summaries,
}

impl Section {
    /// All sections, in display order.
    pub const ALL: [Section; 3] = [Self::Lessons, Self::Exercises, Self::Summaries];

    /// Return the section as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lessons => "lessons",
            Self::Exercises => "exercises",
            Self::Summaries => "summaries",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Section {
    type Err = lessonhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lessons" => Ok(Self::Lessons),
            "exercises" => Ok(Self::Exercises),
            "summaries" => Ok(Self::Summaries),
            _ => Err(lessonhub_core::AppError::validation(format!(
                "Invalid section: '{s}'. Expected one of: lessons, exercises, summaries"
            ))),
        }
    }
}
