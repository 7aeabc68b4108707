//! Wires the settlement events to email and live notifications.
//!
//! Handlers run on their own tasks after the webhook has responded. Failures are logged per recipient and never
//! retried.
use std::sync::Arc;

use log::*;
use serde_json::json;
use ycm_engine::{
    db_types::YachtOwner,
    events::{BookingSettledEvent, CharterBookingEvent, EventHooks, LowBalanceEvent},
};

use crate::{
    config::{InviteConfig, MailConfig},
    live::LiveConnections,
    notifications::{
        emails::{low_balance_email, owner_addresses, owner_invite_email, InviteDetails},
        mailer::Mailer,
    },
};

pub const NOTIFICATION_BUFFER_SIZE: usize = 25;

#[derive(Clone)]
struct NotificationContext<M> {
    mailer: M,
    mail: MailConfig,
    invites: InviteConfig,
}

/// Builds the hooks for all settlement notifications:
/// * owner invites for club and charter bookings,
/// * the low balance alert to the club admin,
/// * a live balance push to the member who made the booking.
pub fn notification_hooks<M: Mailer>(
    mailer: M,
    mail: MailConfig,
    invites: InviteConfig,
    live: LiveConnections,
) -> EventHooks {
    let ctx = Arc::new(NotificationContext { mailer, mail, invites });
    let mut hooks = EventHooks::default();

    let invite_ctx = Arc::clone(&ctx);
    hooks.on_booking_settled(move |ev: BookingSettledEvent| {
        let ctx = Arc::clone(&invite_ctx);
        Box::pin(async move {
            let details = InviteDetails::from(&ev.booking);
            send_owner_invites(ctx.as_ref(), &details, &ev.owners).await;
        })
    });

    hooks.on_booking_settled(move |ev: BookingSettledEvent| {
        let live = live.clone();
        Box::pin(async move {
            push_booking_settled(&live, &ev).await;
        })
    });

    let alert_ctx = Arc::clone(&ctx);
    hooks.on_low_balance(move |ev: LowBalanceEvent| {
        let ctx = Arc::clone(&alert_ctx);
        Box::pin(async move {
            let email = low_balance_email(&ev, &ctx.mail);
            match ctx.mailer.send(email).await {
                Ok(()) => info!("📧️ Low balance alert sent for {}", ev.member.username),
                Err(e) => error!("📧️ Could not send the low balance alert for {}. {e}", ev.member.username),
            }
        })
    });

    let charter_ctx = Arc::clone(&ctx);
    hooks.on_charter_booking(move |ev: CharterBookingEvent| {
        let ctx = Arc::clone(&charter_ctx);
        Box::pin(async move {
            let details = InviteDetails::from(&ev.booking);
            send_owner_invites(ctx.as_ref(), &details, &ev.owners).await;
        })
    });

    hooks
}

async fn send_owner_invites<M: Mailer>(ctx: &NotificationContext<M>, details: &InviteDetails, owners: &[YachtOwner]) {
    let addresses = owner_addresses(owners);
    if addresses.is_empty() {
        info!("📧️ {} has no owner addresses. No invites sent.", details.yacht_name);
        return;
    }
    for (address, owner_name) in addresses {
        let email = owner_invite_email(details, &owner_name, &address, &ctx.invites, &ctx.mail);
        let to = email.to.clone();
        match ctx.mailer.send(email).await {
            Ok(()) => info!("📧️ Booking invite for {} sent to {to}", details.yacht_name),
            Err(e) => error!("📧️ Could not send the booking invite for {} to {to}. {e}", details.yacht_name),
        }
    }
}

async fn push_booking_settled(live: &LiveConnections, ev: &BookingSettledEvent) {
    let Some(member) = &ev.member else {
        return;
    };
    let payload = json!({
        "event": "booking_settled",
        "booking_id": ev.booking.id,
        "vendor_booking_id": ev.booking.vendor_booking_id,
        "yacht": ev.yacht.name,
        "points_cost": ev.booking.points_cost,
        "balance": member.points,
    });
    if live.push(member.id, payload.to_string()).await {
        debug!("🔌️ Booking {} pushed to member #{}", ev.booking.vendor_booking_id, member.id);
    }
}
