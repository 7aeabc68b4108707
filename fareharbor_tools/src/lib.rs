//! Types and helpers for consuming FareHarbor booking webhooks.
//!
//! FareHarbor posts a JSON envelope with a single `booking` object. Most of the interesting data is loosely typed:
//! money arrives as display strings, party sizes as free text inside custom fields, and yes/no answers as strings or
//! booleans. The helpers in this crate coerce those values into something the settlement engine can use.
mod booking;
mod custom_fields;
mod error;
pub mod helpers;

pub use booking::{Availability, BookingContact, CustomFieldValue, FareharborBooking, ListingItem, WebhookEnvelope};
pub use custom_fields::{custom_field_text, find_custom_field, CustomFieldNames};
pub use error::FareharborError;
