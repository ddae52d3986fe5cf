//! Route access gate.

pub mod category;
pub mod checker;
pub mod decision;

pub use category::RouteCategory;
pub use checker::AccessGate;
pub use decision::AccessDecision;
