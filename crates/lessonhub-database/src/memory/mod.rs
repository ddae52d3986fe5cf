//! In-memory store implementations.
//!
//! Suitable for single-node development and deterministic tests. Each
//! store keeps its rows in insertion order behind a Tokio mutex, so
//! creation-time ordering (and therefore free-tier cap truncation) is
//! stable without a database.

pub mod contact;
pub mod content;
pub mod payment;
pub mod profile;
pub mod subscription;

pub use contact::MemoryContactStore;
pub use content::MemoryContentStore;
pub use payment::MemoryPaymentStore;
pub use profile::MemoryProfileStore;
pub use subscription::MemorySubscriptionStore;

use lessonhub_core::types::pagination::{PageRequest, PageResponse};

/// Paginate a fully materialized, already ordered row set.
pub(crate) fn paginate<T: serde::Serialize + Clone>(
    rows: &[T],
    page: &PageRequest,
) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}
