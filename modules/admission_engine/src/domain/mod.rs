//! Domain layer - business logic and rules
//!
//! Pure resolvers for pricing, seats, donations, registration, referrals and
//! seating, plus the service that runs them against the repositories.

pub mod donation;
pub mod locks;
pub mod notifications;
pub mod pricing;
pub mod qr;
pub mod referral;
pub mod registration;
pub mod repository;
pub mod seating;
pub mod seats;
pub mod service;

pub use notifications::{NoOpDispatcher, Notification, NotificationDispatcher, NotificationError};
pub use repository::{AttendeeRepository, SeatingRepository, TicketFormRepository};
pub use service::Service;
