use thiserror::Error;

use crate::{
    db_types::VendorBookingId,
    traits::{BookingDatabaseError, MemberApiError, ReferenceDataError},
};

/// Reasons a booking could not be settled.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Booking {0} has already been processed")]
    DuplicateBooking(VendorBookingId),
    #[error("No yacht named '{0}' exists")]
    YachtNotFound(String),
    #[error("No point cost is configured for {yacht} ({})", .tour_type.as_deref().unwrap_or("an unrecognised tour"))]
    NoPriceFound { yacht: String, tour_type: Option<String> },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<BookingDatabaseError> for SettlementError {
    fn from(e: BookingDatabaseError) -> Self {
        match e {
            BookingDatabaseError::BookingAlreadyExists(id) => SettlementError::DuplicateBooking(id),
            BookingDatabaseError::CharterBookingAlreadyExists(id) => SettlementError::DuplicateBooking(id),
            e => SettlementError::DatabaseError(e.to_string()),
        }
    }
}

impl From<ReferenceDataError> for SettlementError {
    fn from(e: ReferenceDataError) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}

impl From<MemberApiError> for SettlementError {
    fn from(e: MemberApiError) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}
