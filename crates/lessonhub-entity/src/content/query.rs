//! Content query parameters for catalog browsing.

use serde::{Deserialize, Serialize};

use super::grade::Grade;
use super::section::Section;

/// Section filter for a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionFilter {
    /// All three sections.
    All,
    /// A single section.
    One(Section),
}

impl SectionFilter {
    /// Check whether a section matches this filter.
    pub fn matches(&self, section: Section) -> bool {
        match self {
            Self::All => true,
            Self::One(s) => *s == section,
        }
    }
}

/// A student catalog query: section filter plus optional grade filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Which sections to include.
    pub section: SectionFilter,
    /// Restrict to a single grade level, if set.
    pub grade: Option<Grade>,
}

impl ContentQuery {
    /// Query a single section.
    pub fn section(section: Section, grade: Option<Grade>) -> Self {
        Self {
            section: SectionFilter::One(section),
            grade,
        }
    }

    /// Query all sections.
    pub fn all_sections(grade: Option<Grade>) -> Self {
        Self {
            section: SectionFilter::All,
            grade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_filter_matches() {
        assert!(SectionFilter::All.matches(Section::Exercises));
        assert!(SectionFilter::One(Section::Lessons).matches(Section::Lessons));
        assert!(!SectionFilter::One(Section::Lessons).matches(Section::Summaries));
    }
}
