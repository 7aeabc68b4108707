//! Converts FareHarbor webhook bookings into vendor-neutral [`BookingRequest`]s.
use std::path::Path;

use fareharbor_tools::{
    custom_field_text,
    find_custom_field,
    helpers::{extract_int, is_affirmative, parse_amount_cents, parse_timestamp},
    CustomFieldNames,
    FareharborBooking,
};
use log::*;
use serde::Deserialize;
use ycm_engine::{
    db_types::VendorBookingId,
    settlement::{BookingAmounts, BookingContactDetails, BookingExtras},
    BookingRequest,
};

use crate::errors::{BookingConversionError, ServerError};

/// The parts of the name mappings file that only concern the FareHarbor integration.
///
/// The yacht and tour tables in the same file are read by the settlement engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationMappings {
    #[serde(default)]
    pub custom_fields: CustomFieldNames,
}

impl IntegrationMappings {
    pub fn from_toml_str(s: &str) -> Result<Self, ServerError> {
        toml::from_str(s).map_err(|e| ServerError::ConfigurationError(format!("Invalid name mappings file. {e}")))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ServerError::ConfigurationError(format!("Could not read name mappings file {}. {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }
}

pub fn booking_request_from_fareharbor(
    booking: FareharborBooking,
    fields: &CustomFieldNames,
) -> Result<BookingRequest, BookingConversionError> {
    trace!("🎣️ Converting FareHarbor booking {}", booking.pk);
    let pk = booking.pk.trim();
    if pk.is_empty() {
        return Err(BookingConversionError::InvalidField { field: "pk", reason: "Booking id is empty".into() });
    }
    let availability = &booking.availability;
    let start_at = parse_timestamp(&availability.start_at)?;
    let end_at = parse_timestamp(&availability.end_at)?;
    let vendor_created_at = match booking.created_at.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(ts) => Some(parse_timestamp(ts)?),
        None => None,
    };
    let amounts = BookingAmounts {
        invoice_price: parse_amount_cents(booking.invoice_price_display.as_ref())?,
        amount_paid: parse_amount_cents(booking.amount_paid_display.as_ref())?,
        receipt_subtotal: parse_amount_cents(booking.receipt_subtotal_display.as_ref())?,
        receipt_taxes: parse_amount_cents(booking.receipt_taxes_display.as_ref())?,
        receipt_total: parse_amount_cents(booking.receipt_total_display.as_ref())?,
    };
    if amounts.amount_due().is_none() {
        return Err(BookingConversionError::InvalidField {
            field: "receipt_total_display",
            reason: "The amount due on the receipt is out of range".into(),
        });
    }
    let values = &booking.custom_field_values;
    let extras = BookingExtras {
        party_size: extract_int(find_custom_field(values, &fields.party_size), 0),
        kids_under_six: extract_int(find_custom_field(values, &fields.kids_under_six), 0),
        e_foil_count: extract_int(find_custom_field(values, &fields.e_foil), 0),
        sea_bob_count: extract_int(find_custom_field(values, &fields.sea_bob), 0),
        tubing: is_affirmative(find_custom_field(values, &fields.tubing)),
        catering: is_affirmative(find_custom_field(values, &fields.catering)),
        adult_beverages: is_affirmative(find_custom_field(values, &fields.adult_beverages)),
        pickup_point: custom_field_text(values, &fields.pickup_location, ""),
        other_add_ons: custom_field_text(values, &fields.add_ons, "No"),
    };
    let contact = BookingContactDetails {
        name: booking.contact.name.clone(),
        email: booking.contact.email().map(String::from),
        phone: booking.contact.phone.clone(),
    };
    Ok(BookingRequest {
        vendor_booking_id: VendorBookingId::from(pk),
        vendor_uuid: booking.uuid.clone(),
        dashboard_url: booking.dashboard_url.clone(),
        listing_name: availability.item.name.clone(),
        headline: availability.headline.clone().unwrap_or_default(),
        start_at,
        end_at,
        vendor_created_at,
        contact,
        amounts,
        extras,
    })
}
