//! Admission Engine Module
//!
//! Ticket pricing, seat expansion, donations, guest registration through
//! referral links, and table seating for event registration forms.

// Public exports
pub mod contract;
pub use contract::{
    client::AdmissionApi, error::AdmissionError, Attendee, Cart, DonationChoice, GuestDetails,
    GuestSlot, PriceBreakdown, ReferralStatus, RegistrationOutcome, RegistrationRequest,
    SeatingConfiguration, SeatingPlan, SeatingTable, TicketForm, TicketItem,
};

pub mod module;
pub use module::AdmissionEngineModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
