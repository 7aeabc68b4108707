#![allow(dead_code)]
use chrono::DateTime;
use ycm_engine::{
    db_types::VendorBookingId,
    settlement::{BookingAmounts, BookingContactDetails, BookingExtras},
    BookingRequest,
};

pub const JANE: &str = "jane.member@example.com";

/// A booking request for `listing` starting at the given local time. Contact email is Jane's.
pub fn booking_request(id: &str, listing: &str, headline: &str, start: &str) -> BookingRequest {
    let start_at = DateTime::parse_from_rfc3339(start).expect("Invalid start time");
    BookingRequest {
        vendor_booking_id: VendorBookingId::from(id),
        vendor_uuid: Some(format!("uuid-{id}")),
        dashboard_url: None,
        listing_name: listing.to_string(),
        headline: headline.to_string(),
        start_at,
        end_at: start_at + chrono::Duration::hours(4),
        vendor_created_at: None,
        contact: BookingContactDetails {
            name: Some("Jane Member".into()),
            email: Some(JANE.into()),
            phone: Some("555-0199".into()),
        },
        amounts: BookingAmounts {
            invoice_price: 125_000,
            amount_paid: 25_000,
            receipt_subtotal: 115_000,
            receipt_taxes: 10_000,
            receipt_total: 125_000,
        },
        extras: BookingExtras { party_size: 4, pickup_point: "Osprey".into(), ..Default::default() },
    }
}

pub fn full_day_on_wanderlust(id: &str) -> BookingRequest {
    booking_request(id, "KYC - Wanderlust", "Full Day", "2024-06-01T09:00:00-04:00")
}
