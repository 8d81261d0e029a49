//! Referral resolution for guest self-registration
//!
//! A referral link is `{base}?ref={attendee_id}`. The id may name the primary
//! itself or one of its guests; guests are followed exactly one hop.

use crate::contract::{AdmissionError, Attendee, ReferralStatus, TicketItem};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use uuid::Uuid;

#[allow(clippy::expect_used)]
static PLACEHOLDER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.* - Guest Ticket #\d+$").expect("valid placeholder pattern"));

#[allow(clippy::expect_used)]
static SUMMARY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) x(\d+)$").expect("valid summary pattern"));

/// Where a referral token points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// The purchaser's own id, or a guest whose slot is already claimed
    Primary(Attendee),
    /// An unclaimed guest record; claiming it updates it in place
    PlaceholderOf {
        placeholder: Attendee,
        primary: Attendee,
    },
}

impl RefTarget {
    /// Classify `referred` given the record its `primary_attendee_id` points to.
    ///
    /// A guest whose parent is not a primary is a broken chain: placeholders
    /// never point at other placeholders.
    pub fn resolve(
        referred: Attendee,
        parent: Option<Attendee>,
        form_id: Uuid,
    ) -> Result<Self, AdmissionError> {
        if referred.form_id != form_id {
            return Err(AdmissionError::invalid_referral(format!(
                "attendee {} does not belong to form {}",
                referred.id, form_id
            )));
        }

        if referred.is_primary {
            return Ok(Self::Primary(referred));
        }

        let primary = match parent {
            Some(parent) if parent.is_primary => parent,
            _ => {
                return Err(AdmissionError::BrokenReferral {
                    attendee_id: referred.id,
                })
            }
        };

        if primary.form_id != form_id {
            return Err(AdmissionError::invalid_referral(format!(
                "primary {} does not belong to form {}",
                primary.id, form_id
            )));
        }

        if is_placeholder(&referred) {
            Ok(Self::PlaceholderOf {
                placeholder: referred,
                primary,
            })
        } else {
            Ok(Self::Primary(primary))
        }
    }

    /// The true primary behind the token
    pub fn primary(&self) -> &Attendee {
        match self {
            Self::Primary(primary) => primary,
            Self::PlaceholderOf { primary, .. } => primary,
        }
    }
}

/// Extract the attendee id from a bare id or a `?ref=` link
pub fn parse_referral_token(token: &str) -> Result<Uuid, AdmissionError> {
    let token = token.trim();
    if let Ok(id) = Uuid::parse_str(token) {
        return Ok(id);
    }

    let url = Url::parse(token)
        .map_err(|_| AdmissionError::invalid_referral(format!("malformed referral token '{token}'")))?;
    let reference = url
        .query_pairs()
        .find(|(key, _)| key == "ref")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| AdmissionError::invalid_referral("referral link has no 'ref' parameter"))?;

    Uuid::parse_str(&reference)
        .map_err(|_| AdmissionError::invalid_referral(format!("malformed attendee id '{reference}'")))
}

/// Shareable link for `attendee_id`
pub fn referral_link(base_url: &str, attendee_id: Uuid) -> String {
    match Url::parse(base_url) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("ref", &attendee_id.to_string());
            url.to_string()
        }
        Err(_) => format!("{base_url}?ref={attendee_id}"),
    }
}

/// Guest record still carrying its generated placeholder name
pub fn is_placeholder(attendee: &Attendee) -> bool {
    !attendee.is_primary && PLACEHOLDER_NAME.is_match(&attendee.name)
}

/// Split `"{name} x{qty}, ..."` back into (name, qty) pairs
pub fn parse_ticket_summary(summary: &str) -> Vec<(String, u32)> {
    summary
        .split(", ")
        .filter_map(|token| {
            let captures = SUMMARY_TOKEN.captures(token.trim())?;
            let quantity = captures[2].parse().ok()?;
            Some((captures[1].to_string(), quantity))
        })
        .collect()
}

/// Seats implied by a stored summary, matched by name against current items
pub fn seats_from_summary(summary: &str, items: &[TicketItem]) -> u32 {
    parse_ticket_summary(summary)
        .into_iter()
        .filter_map(|(name, quantity)| {
            items
                .iter()
                .find(|item| item.name == name)
                .map(|item| quantity * item.seats_per_unit.max(1))
        })
        .sum()
}

/// Seats the primary is entitled to fill, purchaser included (at least 1)
pub fn entitled_seats(primary: &Attendee, items: &[TicketItem]) -> u32 {
    let total = primary
        .total_seats
        .unwrap_or_else(|| seats_from_summary(&primary.ticket_type_summary, items));
    total.saturating_sub(primary.donated_seats).max(1)
}

/// Remaining capacity behind a primary given its current guests
pub fn referral_status(primary: Attendee, guests: &[Attendee], items: &[TicketItem]) -> ReferralStatus {
    let total_seats = entitled_seats(&primary, items);
    let filled = 1 + guests.iter().filter(|guest| !is_placeholder(guest)).count() as i64;
    let remaining_seats = i64::from(total_seats) - filled;

    ReferralStatus {
        primary,
        total_seats,
        remaining_seats,
        is_full: remaining_seats <= 0,
    }
}
