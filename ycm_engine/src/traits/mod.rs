//! # Database backend contracts
//!
//! The settlement engine is storage-agnostic. A backend has to provide three groups of behaviour:
//!
//! * [`MemberManagement`] covers member lookups, point adjustments through the ledger and booking history queries.
//! * [`ReferenceData`] covers the admin-maintained yacht, tour type, pricing and owner tables, as well as the audit log
//!   of vendor names that could not be mapped.
//! * [`BookingDatabase`] is the highest level contract. It adds the atomic settlement of club bookings and the
//!   recording of charter bookings.
mod booking_database;
mod data_objects;
mod member_management;
mod reference_data;

pub use booking_database::{BookingDatabase, BookingDatabaseError};
pub use data_objects::SettledBooking;
pub use member_management::{MemberApiError, MemberManagement};
pub use reference_data::{ReferenceData, ReferenceDataError};
