//! Grade level newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

use lessonhub_core::AppError;

/// A school grade level, 1 through 6.
///
/// Constructed only through [`Grade::new`] so out-of-range values are
/// rejected at the data-model boundary. The database carries a matching
/// CHECK constraint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct Grade(i16);

impl Grade {
    /// Lowest grade level.
    pub const MIN: i16 = 1;
    /// Highest grade level.
    pub const MAX: i16 = 6;

    /// Create a grade, validating the 1-6 range.
    pub fn new(value: i16) -> Result<Self, AppError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::validation(format!(
                "Invalid grade level: {value}. Expected {} through {}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Return the numeric grade level.
    pub fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i16> for Grade {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bounds() {
        assert!(Grade::new(1).is_ok());
        assert!(Grade::new(6).is_ok());
        assert!(Grade::new(0).is_err());
        assert!(Grade::new(7).is_err());
    }

    #[test]
    fn test_grade_value() {
        assert_eq!(Grade::new(4).unwrap().value(), 4);
    }
}
