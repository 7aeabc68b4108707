use serde::{Deserialize, Serialize};

use crate::db_types::{Booking, Member, PointAdjustment};

/// The result of atomically inserting a club booking and debiting the member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledBooking {
    pub booking: Booking,
    /// The member as it stands after the debit. `None` for bookings by unregistered visitors.
    pub member: Option<Member>,
    /// The ledger entry for the debit. `None` when no member was charged.
    pub ledger_entry: Option<PointAdjustment>,
}
