use thiserror::Error;

use crate::{
    db_types::{Booking, CharterBooking, NewBooking, NewCharterBooking, VendorBookingId},
    traits::{data_objects::SettledBooking, MemberApiError, MemberManagement, ReferenceData, ReferenceDataError},
};

#[derive(Debug, Clone, Error)]
pub enum BookingDatabaseError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A booking with vendor id {0} has already been settled")]
    BookingAlreadyExists(VendorBookingId),
    #[error("A charter booking with vendor id {0} has already been recorded")]
    CharterBookingAlreadyExists(VendorBookingId),
    #[error("Member #{0} does not exist")]
    MemberNotFound(i64),
}

impl From<sqlx::Error> for BookingDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        BookingDatabaseError::DatabaseError(e.to_string())
    }
}

impl From<MemberApiError> for BookingDatabaseError {
    fn from(e: MemberApiError) -> Self {
        BookingDatabaseError::DatabaseError(e.to_string())
    }
}

impl From<ReferenceDataError> for BookingDatabaseError {
    fn from(e: ReferenceDataError) -> Self {
        BookingDatabaseError::DatabaseError(e.to_string())
    }
}

/// This trait defines the highest level of behaviour for backends supporting the settlement engine.
#[allow(async_fn_in_trait)]
pub trait BookingDatabase: Clone + MemberManagement + ReferenceData {
    /// The URL of the database
    fn url(&self) -> &str;

    async fn booking_exists(&self, vendor_booking_id: &VendorBookingId) -> Result<bool, BookingDatabaseError>;

    async fn fetch_booking_by_vendor_id(
        &self,
        vendor_booking_id: &VendorBookingId,
    ) -> Result<Option<Booking>, BookingDatabaseError>;

    /// Takes a normalized club booking, and in a single atomic transaction,
    /// * inserts the booking. The vendor booking id is unique, so a redelivered booking fails with
    ///   [`BookingDatabaseError::BookingAlreadyExists`] and nothing else happens.
    /// * if the booking has a member, debits `points_cost` from their balance (the balance may go negative),
    ///   writes a ledger entry that references the booking, and stores the new balance on the booking.
    ///
    /// If any step fails, nothing is committed.
    async fn settle_booking(&self, booking: NewBooking) -> Result<SettledBooking, BookingDatabaseError>;

    async fn charter_booking_exists(&self, vendor_booking_id: &VendorBookingId) -> Result<bool, BookingDatabaseError>;

    /// Records a charter booking. Fails with [`BookingDatabaseError::CharterBookingAlreadyExists`] if the vendor id
    /// has been seen before.
    async fn insert_charter_booking(&self, booking: NewCharterBooking) -> Result<CharterBooking, BookingDatabaseError>;
}
