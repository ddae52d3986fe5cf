//! PostgreSQL store implementations.

pub mod contact;
pub mod content;
pub mod payment;
pub mod profile;
pub mod subscription;

pub use contact::ContactRepository;
pub use content::ContentRepository;
pub use payment::PaymentRepository;
pub use profile::ProfileRepository;
pub use subscription::SubscriptionRepository;
