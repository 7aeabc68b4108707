//! Composes the notification emails: owner calendar invites and low balance alerts.
use chrono::{DateTime, Utc};
use ycm_engine::{
    db_types::{Booking, CharterBooking, YachtOwner},
    events::LowBalanceEvent,
};

use crate::{
    config::{InviteConfig, MailConfig},
    notifications::{
        calendar::CalendarInvite,
        mailer::{EmailAttachment, OutgoingEmail},
    },
};

const ORGANIZER_NAME: &str = "Kokomo Crew";

/// What the yacht owners are told about a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteDetails {
    pub yacht_name: String,
    pub tour: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub guest_name: Option<String>,
    pub party_size: Option<i64>,
    pub pickup_point: Option<String>,
    pub add_ons: Option<String>,
}

impl From<&Booking> for InviteDetails {
    fn from(booking: &Booking) -> Self {
        Self {
            yacht_name: booking.vessel_name.clone(),
            tour: booking.tour_type.clone(),
            start_at: booking.start_at,
            end_at: booking.end_at,
            guest_name: booking.contact_name.clone(),
            party_size: Some(booking.number_of_adults),
            pickup_point: Some(booking.pickup_point.clone()).filter(|s| !s.trim().is_empty()),
            add_ons: Some(booking.other_add_ons.clone()).filter(|s| !s.trim().is_empty()),
        }
    }
}

impl From<&CharterBooking> for InviteDetails {
    fn from(booking: &CharterBooking) -> Self {
        Self {
            yacht_name: booking.yacht_name.clone(),
            tour: booking.tour_type.clone(),
            start_at: booking.start_at,
            end_at: booking.end_at,
            guest_name: booking.contact_name.clone(),
            party_size: None,
            pickup_point: None,
            add_ons: None,
        }
    }
}

/// Every distinct address across the owners. An owner record may list several addresses separated by commas or
/// semicolons.
pub fn owner_addresses(owners: &[YachtOwner]) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();
    for owner in owners {
        for address in owner.owner_email.split([',', ';']).map(str::trim).filter(|a| !a.is_empty()) {
            if !result.iter().any(|(a, _)| a.eq_ignore_ascii_case(address)) {
                result.push((address.to_string(), owner.owner_name.clone()));
            }
        }
    }
    result
}

/// Builds the invite email for one owner address. If a recipient override is configured, the email goes there
/// instead.
pub fn owner_invite_email(
    details: &InviteDetails,
    owner_name: &str,
    owner_email: &str,
    invites: &InviteConfig,
    mail: &MailConfig,
) -> OutgoingEmail {
    let tz = invites.timezone;
    let local = |t: &DateTime<Utc>| t.with_timezone(&tz).format("%d %b %Y, %I:%M %p %Z").to_string();
    let (start, end) = (local(&details.start_at), local(&details.end_at));
    let subject = format!("{}: {} Booked", invites.organization_name, details.yacht_name);

    let mut description = vec![
        format!("Hello {owner_name},"),
        String::new(),
        format!("Your yacht '{}' was just booked.", details.yacht_name),
        format!("Start: {start}"),
        format!("End: {end}"),
        format!("Tour Type: {}", Some(details.tour.as_str()).filter(|t| !t.is_empty()).unwrap_or("N/A")),
    ];
    if let Some(guest) = &details.guest_name {
        description.push(format!("Guest: {guest}"));
    }
    if let Some(size) = details.party_size.filter(|n| *n > 0) {
        description.push(format!("Party size: {size}"));
    }
    if let Some(pickup) = &details.pickup_point {
        description.push(format!("Pickup point: {pickup}"));
    }
    if let Some(add_ons) = &details.add_ons {
        description.push(format!("Add-ons: {add_ons}"));
    }
    description.push(String::new());
    description.push(format!("Thank you for partnering with {}!", invites.organization_name));
    let invite = CalendarInvite::new(&invites.domain, details.start_at, details.end_at, tz)
        .with_summary(subject.as_str())
        .with_description(description.join("\n").as_str())
        .with_organizer(ORGANIZER_NAME, mail.from.as_str());

    let text = format!(
        "Hi {owner_name},\n\nYour yacht was just booked! Please open the attached .ics to add it to your \
         calendar.\n\nStart: {start}\nEnd: {end}\n\nBest Regards,\n{ORGANIZER_NAME}\n"
    );
    let to = invites.recipient_override.clone().unwrap_or_else(|| owner_email.to_string());
    let filename = format!("Yacht_{}_Booked.ics", details.yacht_name.replace(['/', '\\'], "-"));
    OutgoingEmail::new(to, subject, text).with_attachment(EmailAttachment {
        filename,
        content_type: "text/calendar".into(),
        content: invite.to_ics().into_bytes(),
    })
}

pub fn low_balance_email(event: &LowBalanceEvent, mail: &MailConfig) -> OutgoingEmail {
    let member = &event.member;
    let subject = format!("Low Points for Member: {} {}", member.first_name, member.last_name);
    let shortfall = event.point_cost - member.points;
    let text = format!(
        "{} ({}, {}) has booked a tour costing {} with a balance of {}.\n\nThe booking has been recorded. The \
         member's balance is now short by {}.\n",
        member.full_name(),
        member.username,
        member.email,
        event.point_cost,
        member.points,
        shortfall.floor_at_zero(),
    );
    OutgoingEmail::new(mail.admin_email.as_str(), subject.as_str(), text.as_str())
}
