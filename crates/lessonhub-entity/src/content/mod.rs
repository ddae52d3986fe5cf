//! Content item entity: PDF lessons, exercises, and summaries.

pub mod grade;
pub mod model;
pub mod query;
pub mod section;
pub mod status;

pub use grade::Grade;
pub use model::{ContentItem, CreateContentItem, UpdateContentItem};
pub use query::{ContentQuery, SectionFilter};
pub use section::Section;
pub use status::ModerationStatus;
