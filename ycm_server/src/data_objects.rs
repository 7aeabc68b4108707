use serde::{Deserialize, Serialize};
use ycm_engine::db_types::{MembershipTier, Points};

/// The body returned to FareHarbor when a booking has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub booking_status: String,
}

impl WebhookResponse {
    pub fn successful() -> Self {
        Self { booking_status: "successful".into() }
    }

    pub fn charter_notification_sent() -> Self {
        Self { booking_status: "charter_notification_sent".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointAdjustmentRequest {
    pub delta: Points,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPoints {
    pub username: String,
    pub points: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipUpdateRequest {
    pub membership_tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberMembership {
    pub username: String,
    pub membership_tier: MembershipTier,
}
