//! Administrative access to members, their point balances and booking history.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Booking, Member, MembershipTier, NewMember, PointAdjustment, Points},
    traits::{MemberApiError, MemberManagement},
};

/// The `MemberApi` is used by the admin routes. It does not take part in booking settlement.
pub struct MemberApi<B> {
    db: B,
}

impl<B: Debug> Debug for MemberApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemberApi ({:?})", self.db)
    }
}

impl<B> MemberApi<B>
where B: MemberManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create_member(&self, member: NewMember) -> Result<Member, MemberApiError> {
        let member = self.db.create_member(member).await?;
        info!("👤️ Member #{} ({}) created with {}", member.id, member.username, member.points);
        Ok(member)
    }

    pub async fn member_by_id(&self, member_id: i64) -> Result<Member, MemberApiError> {
        self.db.fetch_member(member_id).await?.ok_or_else(|| MemberApiError::MemberNotFound(format!("#{member_id}")))
    }

    pub async fn member_by_username(&self, username: &str) -> Result<Member, MemberApiError> {
        self.db.fetch_member_by_username(username).await?.ok_or_else(|| MemberApiError::MemberNotFound(username.into()))
    }

    /// Credits (positive `delta`) or debits (negative `delta`) a member's balance. The balance may go negative.
    ///
    /// A zero adjustment is rejected, since it would only add noise to the ledger.
    pub async fn adjust_points(
        &self,
        username: &str,
        delta: Points,
        description: Option<&str>,
    ) -> Result<PointAdjustment, MemberApiError> {
        if delta == Points::default() {
            return Err(MemberApiError::InvalidAdjustment("The adjustment must be non-zero".into()));
        }
        let member = self.member_by_username(username).await?;
        let description = description.map(str::trim).filter(|d| !d.is_empty()).unwrap_or("Manual adjustment");
        let entry = self.db.adjust_points(member.id, delta, description).await?;
        info!("👤️ {delta} applied to {username}. New balance: {}", entry.balance);
        Ok(entry)
    }

    pub async fn set_membership_tier(&self, username: &str, tier: MembershipTier) -> Result<Member, MemberApiError> {
        let member = self.member_by_username(username).await?;
        let updated = self.db.set_membership_tier(member.id, tier).await?;
        info!("👤️ {username} moved from {} to {tier}", member.membership_tier);
        Ok(updated)
    }

    pub async fn point_history(&self, member_id: i64) -> Result<Vec<PointAdjustment>, MemberApiError> {
        let member = self.member_by_id(member_id).await?;
        self.db.fetch_point_history(member.id).await
    }

    /// Bookings made on the member's account: the account holder's own bookings and those of every secondary member.
    /// Secondary members see their whole account's history too.
    pub async fn bookings_for_member(&self, member_id: i64) -> Result<Vec<Booking>, MemberApiError> {
        let member = self.member_by_id(member_id).await?;
        let holder = member.account_holder_id();
        trace!("👤️ Fetching bookings for account #{holder}");
        self.db.fetch_bookings_for_account(holder).await
    }

    pub async fn all_bookings(&self) -> Result<Vec<Booking>, MemberApiError> {
        self.db.fetch_all_bookings().await
    }
}
