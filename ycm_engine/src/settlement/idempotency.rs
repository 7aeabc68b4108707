//! Booking source classification and duplicate detection.
//!
//! Club bookings and charter bookings are tracked in separate tables, so a vendor booking id is only a duplicate with
//! respect to the table for its source.
use crate::{
    db_types::VendorBookingId,
    settlement::name_mappings::{NameMappings, YachtNameMatch},
    traits::{BookingDatabase, BookingDatabaseError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingSource {
    /// A member booking on a club yacht. Points are deducted.
    Club,
    /// A booking on a charter yacht. Owners are notified; no points change hands.
    Charter { yacht_name: String },
}

impl BookingSource {
    /// Listings that are not in the charter table are treated as club bookings, including unmapped ones.
    pub fn classify(mappings: &NameMappings, listing_name: &str) -> Self {
        match mappings.match_yacht(listing_name) {
            YachtNameMatch::Charter(yacht_name) => BookingSource::Charter { yacht_name },
            _ => BookingSource::Club,
        }
    }

    pub fn is_charter(&self) -> bool {
        matches!(self, BookingSource::Charter { .. })
    }
}

/// Returns true if the booking has already been recorded for the given source.
pub async fn already_recorded<B: BookingDatabase>(
    db: &B,
    source: &BookingSource,
    vendor_booking_id: &VendorBookingId,
) -> Result<bool, BookingDatabaseError> {
    match source {
        BookingSource::Club => db.booking_exists(vendor_booking_id).await,
        BookingSource::Charter { .. } => db.charter_booking_exists(vendor_booking_id).await,
    }
}
