use thiserror::Error;

use crate::db_types::{Booking, Member, MembershipTier, NewMember, PointAdjustment, Points};

#[derive(Debug, Clone, Error)]
pub enum MemberApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("A member with that username or email already exists: {0}")]
    MemberAlreadyExists(String),
    #[error("Invalid point adjustment: {0}")]
    InvalidAdjustment(String),
}

impl From<sqlx::Error> for MemberApiError {
    fn from(e: sqlx::Error) -> Self {
        MemberApiError::DatabaseError(e.to_string())
    }
}

/// The `MemberManagement` trait defines behaviour for looking up members and moving points in and out of their
/// balances.
///
/// Every balance change goes through the points ledger, so the sum of a member's ledger entries always explains their
/// current balance.
#[allow(async_fn_in_trait)]
pub trait MemberManagement {
    async fn fetch_member(&self, member_id: i64) -> Result<Option<Member>, MemberApiError>;

    /// Case-insensitive lookup. Soft-deleted members are never returned.
    async fn fetch_member_by_email(&self, email: &str) -> Result<Option<Member>, MemberApiError>;

    async fn fetch_member_by_username(&self, username: &str) -> Result<Option<Member>, MemberApiError>;

    async fn create_member(&self, member: NewMember) -> Result<Member, MemberApiError>;

    /// Applies a manual adjustment of `delta` points (positive to credit, negative to debit) and writes the ledger
    /// entry in the same transaction. Returns the ledger entry.
    async fn adjust_points(
        &self,
        member_id: i64,
        delta: Points,
        description: &str,
    ) -> Result<PointAdjustment, MemberApiError>;

    async fn set_membership_tier(&self, member_id: i64, tier: MembershipTier) -> Result<Member, MemberApiError>;

    /// Ledger entries for the member, newest first.
    async fn fetch_point_history(&self, member_id: i64) -> Result<Vec<PointAdjustment>, MemberApiError>;

    /// Bookings made by the account holder or any of its secondary members, newest first.
    async fn fetch_bookings_for_account(&self, account_holder_id: i64) -> Result<Vec<Booking>, MemberApiError>;

    /// All bookings, newest first.
    async fn fetch_all_bookings(&self) -> Result<Vec<Booking>, MemberApiError>;
}
