use serde::{Deserialize, Serialize};

use crate::db_types::{Booking, CharterBooking, Member, Points, Yacht, YachtOwner};

/// A club booking was recorded. `member` carries the post-debit balance when the booking belongs to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSettledEvent {
    pub booking: Booking,
    pub member: Option<Member>,
    pub yacht: Yacht,
    pub owners: Vec<YachtOwner>,
}

impl BookingSettledEvent {
    pub fn new(booking: Booking, member: Option<Member>, yacht: Yacht, owners: Vec<YachtOwner>) -> Self {
        Self { booking, member, yacht, owners }
    }
}

/// A member booked a tour that costs at least as much as their balance (before the booking was deducted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowBalanceEvent {
    pub member: Member,
    pub point_cost: Points,
}

impl LowBalanceEvent {
    pub fn new(member: Member, point_cost: Points) -> Self {
        Self { member, point_cost }
    }
}

/// A charter yacht was booked. `yacht` is `None` when the charter yacht is not in the yachts table, in which case
/// there are no owners to notify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharterBookingEvent {
    pub booking: CharterBooking,
    pub yacht: Option<Yacht>,
    pub owners: Vec<YachtOwner>,
}

impl CharterBookingEvent {
    pub fn new(booking: CharterBooking, yacht: Option<Yacht>, owners: Vec<YachtOwner>) -> Self {
        Self { booking, yacht, owners }
    }
}
