//! Yacht Club Membership Engine
//!
//! The engine holds the club's point ledger and the logic that turns booking vendor events into point deductions.
//! It is vendor-agnostic: integrations convert their payloads into a [`BookingRequest`] and hand it to the
//! [`SettlementApi`].
//!
//! The library is divided into these sections:
//! 1. Database management ([`traits`] and the SQLite backend). You should never need to access the database directly;
//!    use the public API instead. The data types stored in the database are defined in [`db_types`] and are public.
//! 2. The settlement building blocks ([`settlement`]): name mapping, identifier resolution, pricing, duplicate
//!    detection and booking normalization.
//! 3. The public API ([`SettlementApi`] and [`MemberApi`]).
//!
//! The engine also emits events when bookings are settled, when a member's balance runs low, and when a charter yacht
//! is booked. Subscribe to them with [`events::EventHooks`] to send emails, calendar invites or live updates.
pub mod db_types;
pub mod events;
pub mod settlement;
pub mod traits;
mod ycm_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use settlement::{BookingRequest, NameMappings};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};
pub use traits::{
    BookingDatabase,
    BookingDatabaseError,
    MemberApiError,
    MemberManagement,
    ReferenceData,
    ReferenceDataError,
    SettledBooking,
};
pub use ycm_api::{
    errors::SettlementError,
    member_api::MemberApi,
    settlement_api::{SettlementApi, SettlementOutcome, SettlementReceipt},
};
