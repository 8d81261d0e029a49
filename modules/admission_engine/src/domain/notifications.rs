//! Outbound confirmation messages
//!
//! Registration success never depends on delivery: dispatch errors are logged
//! by the service and dropped.
//! - The purchaser receives every ticket of the order
//! - Each named guest with a different email receives its own ticket
//! - Placeholder guests receive nothing; they are reached through the referral link

use crate::contract::Attendee;
use async_trait::async_trait;
use uuid::Uuid;

/// Error type for notification delivery
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Delivery to {to} failed: {reason}")]
    Delivery { to: String, reason: String },

    #[error("Notification service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Attendee details rendered into the message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeContext {
    pub attendee_id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub ticket_type_summary: String,
    /// Link guests can use to claim a seat (purchaser messages only)
    pub referral_link: Option<String>,
}

/// One ticket attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketAttachment {
    pub attendee_id: Uuid,
    pub holder_name: String,
    pub qr_payload: String,
}

/// A message handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub context: AttendeeContext,
    pub attachments: Vec<TicketAttachment>,
}

/// Trait for delivering confirmation messages
///
/// Implementations render and send; the engine only builds the envelope.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one message
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// No-op dispatcher for testing or when messaging is disabled
#[derive(Clone, Default)]
pub struct NoOpDispatcher;

#[async_trait]
impl NotificationDispatcher for NoOpDispatcher {
    async fn send(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn attachment(attendee: &Attendee) -> TicketAttachment {
    TicketAttachment {
        attendee_id: attendee.id,
        holder_name: attendee.name.clone(),
        qr_payload: attendee.qr_payload.clone(),
    }
}

fn context(attendee: &Attendee, referral_link: Option<String>) -> AttendeeContext {
    AttendeeContext {
        attendee_id: attendee.id,
        form_id: attendee.form_id,
        name: attendee.name.clone(),
        ticket_type_summary: attendee.ticket_type_summary.clone(),
        referral_link,
    }
}

/// Messages for a freshly finalized registration
pub fn registration_messages(
    primary: &Attendee,
    guests: &[Attendee],
    purchaser_subject: &str,
    guest_subject: &str,
    referral_link: Option<String>,
) -> Vec<Notification> {
    let mut messages = vec![Notification {
        to: primary.email.clone(),
        subject: purchaser_subject.to_string(),
        context: context(primary, referral_link),
        attachments: std::iter::once(primary)
            .chain(guests.iter())
            .map(attachment)
            .collect(),
    }];

    messages.extend(
        guests
            .iter()
            .filter(|guest| !super::referral::is_placeholder(guest))
            .filter(|guest| !guest.email.eq_ignore_ascii_case(&primary.email))
            .map(|guest| guest_message(guest, guest_subject)),
    );

    messages
}

/// Message for a single guest ticket
pub fn guest_message(guest: &Attendee, subject: &str) -> Notification {
    Notification {
        to: guest.email.clone(),
        subject: subject.to_string(),
        context: context(guest, None),
        attachments: vec![attachment(guest)],
    }
}
