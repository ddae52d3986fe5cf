//! Session resolution: the authoritative state machine and its tracker.

pub mod state;
pub mod tracker;

pub use state::SessionState;
pub use tracker::SessionTracker;
