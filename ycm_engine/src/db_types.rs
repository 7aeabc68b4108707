use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
pub use ycm_common::Points;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------   MembershipTier    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum MembershipTier {
    Silver,
    Gold,
    Platinum,
    Premium,
}

impl Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipTier::Silver => write!(f, "Silver"),
            MembershipTier::Gold => write!(f, "Gold"),
            MembershipTier::Platinum => write!(f, "Platinum"),
            MembershipTier::Premium => write!(f, "Premium"),
        }
    }
}

impl FromStr for MembershipTier {
    type Err = ConversionError;

    /// Tier names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            "premium" => Ok(Self::Premium),
            _ => Err(ConversionError(format!(
                "Invalid membership tier: {s}. Allowed values are Silver, Gold, Platinum and Premium"
            ))),
        }
    }
}

//--------------------------------------       Member        ---------------------------------------------------------
/// A club member and their point balance.
///
/// Secondary members (family accounts and the like) always reference a primary member; primary members never do. The
/// database enforces this with a check constraint.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub points: Points,
    pub membership_tier: MembershipTier,
    pub is_primary: bool,
    pub primary_member_id: Option<i64>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// The id of the member that owns this member's booking history: the member itself for primary members, otherwise
    /// the linked primary member.
    pub fn account_holder_id(&self) -> i64 {
        self.primary_member_id.unwrap_or(self.id)
    }
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub points: Points,
    pub membership_tier: MembershipTier,
    pub primary_member_id: Option<i64>,
}

impl NewMember {
    pub fn new<S: Into<String>>(username: S, email: S, first_name: S, last_name: S) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            points: Points::default(),
            membership_tier: MembershipTier::Silver,
            primary_member_id: None,
        }
    }

    pub fn with_points(mut self, points: Points) -> Self {
        self.points = points;
        self
    }

    pub fn with_tier(mut self, tier: MembershipTier) -> Self {
        self.membership_tier = tier;
        self
    }

    /// Makes this a secondary member of `primary_member_id`.
    pub fn secondary_of(mut self, primary_member_id: i64) -> Self {
        self.primary_member_id = Some(primary_member_id);
        self
    }
}

//--------------------------------------   Reference data    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Yacht {
    pub id: i64,
    pub name: String,
    /// Percentage discount (0-100) applied to every tour on this yacht
    pub discount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TourType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: i64,
    pub yacht_id: i64,
    pub tour_type_id: i64,
    pub point_cost: Points,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct YachtOwner {
    pub id: i64,
    pub yacht_id: i64,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

//--------------------------------------   VendorBookingId   ---------------------------------------------------------
/// The booking vendor's primary key for a booking. This is the idempotency key for settlement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct VendorBookingId(pub String);

impl VendorBookingId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for VendorBookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VendorBookingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for VendorBookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//--------------------------------------        YesNo        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YesNo::Yes => write!(f, "yes"),
            YesNo::No => write!(f, "no"),
        }
    }
}

//--------------------------------------    BookingStatus    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Every settled booking starts out in this state
    Scheduled,
    Completed,
    Cancelled,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

//--------------------------------------       Booking       ---------------------------------------------------------
/// A normalized booking, ready to be inserted. Monetary amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub vendor_booking_id: VendorBookingId,
    pub vendor_uuid: Option<String>,
    pub dashboard_url: Option<String>,
    pub member_id: Option<i64>,
    pub yacht_id: i64,
    pub tour_type_id: Option<i64>,
    pub vessel_name: String,
    pub tour_type: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub vendor_created_at: DateTime<Utc>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub invoice_price: i64,
    pub amount_paid: i64,
    pub receipt_subtotal: i64,
    pub receipt_taxes: i64,
    pub receipt_total: i64,
    pub amount_due: i64,
    pub booking_fee: i64,
    pub e_foil_count: i64,
    pub sea_bob_count: i64,
    pub tubing: YesNo,
    pub catering_option: YesNo,
    pub adult_beverages: YesNo,
    pub other_add_ons: String,
    pub other_cost: i64,
    pub other_cost_desc: String,
    pub staff_gratuity: i64,
    pub number_of_adults: i64,
    pub number_of_kids: i64,
    pub pickup_point: String,
    pub points_cost: Points,
    pub booking_status: BookingStatus,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub vendor_booking_id: VendorBookingId,
    pub vendor_uuid: Option<String>,
    pub dashboard_url: Option<String>,
    pub member_id: Option<i64>,
    pub yacht_id: i64,
    pub tour_type_id: Option<i64>,
    pub vessel_name: String,
    pub tour_type: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub vendor_created_at: DateTime<Utc>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub invoice_price: i64,
    pub amount_paid: i64,
    pub receipt_subtotal: i64,
    pub receipt_taxes: i64,
    pub receipt_total: i64,
    pub amount_due: i64,
    pub booking_fee: i64,
    pub e_foil_count: i64,
    pub sea_bob_count: i64,
    pub tubing: YesNo,
    pub catering_option: YesNo,
    pub adult_beverages: YesNo,
    pub other_add_ons: String,
    pub other_cost: i64,
    pub other_cost_desc: String,
    pub staff_gratuity: i64,
    pub number_of_adults: i64,
    pub number_of_kids: i64,
    pub pickup_point: String,
    pub points_cost: Points,
    pub balance_after_booking: Option<Points>,
    pub booking_status: BookingStatus,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   CharterBooking    ---------------------------------------------------------
/// Bookings on the charter fleet only notify the yacht owners. They are tracked separately so that webhook redelivery
/// can be detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharterBooking {
    pub vendor_booking_id: VendorBookingId,
    pub yacht_name: String,
    pub tour_type: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CharterBooking {
    pub id: i64,
    pub vendor_booking_id: VendorBookingId,
    pub yacht_name: String,
    pub tour_type: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   PointAdjustment   ---------------------------------------------------------
/// A single entry in the points ledger. Every change to a member's balance, whether from a booking or a manual
/// adjustment, writes exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PointAdjustment {
    pub id: i64,
    pub member_id: i64,
    pub points_added: Points,
    pub points_removed: Points,
    /// The member's balance after this adjustment was applied
    pub balance: Points,
    pub description: String,
    pub booking_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   UnmappedName      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnmappedNameKind {
    /// A listing title that is in neither the club nor charter mapping table
    YachtListing,
    /// A headline that matched no tour category
    TourHeadline,
    /// A canonical yacht name with no row in the yachts table
    YachtName,
    /// A canonical tour type name with no row in the tour_types table
    TourTypeName,
}

impl Display for UnmappedNameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmappedNameKind::YachtListing => write!(f, "yacht listing"),
            UnmappedNameKind::TourHeadline => write!(f, "tour headline"),
            UnmappedNameKind::YachtName => write!(f, "yacht name"),
            UnmappedNameKind::TourTypeName => write!(f, "tour type name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UnmappedName {
    pub id: i64,
    pub kind: UnmappedNameKind,
    pub vendor_name: String,
    pub occurrences: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}
