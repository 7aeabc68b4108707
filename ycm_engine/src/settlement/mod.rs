//! # Booking settlement building blocks
//!
//! The pieces the [`crate::SettlementApi`] sequences for every incoming booking:
//!
//! * [`name_mappings`] holds the editable tables that translate vendor listing titles and headlines into canonical
//!   names.
//! * [`resolver`] turns those canonical names into yacht and tour type records, auditing anything it cannot map.
//! * [`pricing`] computes the discounted point cost.
//! * [`idempotency`] decides whether a booking belongs to the club or the charter fleet, and whether it has been seen
//!   before.
//! * [`normalizer`] builds the booking row from the vendor-neutral [`BookingRequest`].
//! * [`stage`] is the tagged outcome each pipeline stage reports.
pub mod idempotency;
pub mod name_mappings;
pub mod normalizer;
pub mod pricing;
pub mod resolver;
pub mod stage;

pub use idempotency::BookingSource;
pub use name_mappings::{NameMappingError, NameMappings, TourRule, YachtNameMatch};
pub use normalizer::{BookingAmounts, BookingContactDetails, BookingExtras, BookingRequest};
pub use stage::StageOutcome;
