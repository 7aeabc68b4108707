use mockall::mock;
use ycm_engine::{
    db_types::{Booking, Member, MembershipTier, NewMember, PointAdjustment, Points},
    traits::{MemberApiError, MemberManagement},
};

mock! {
    pub MemberManager {}
    impl MemberManagement for MemberManager {
        async fn fetch_member(&self, member_id: i64) -> Result<Option<Member>, MemberApiError>;
        async fn fetch_member_by_email(&self, email: &str) -> Result<Option<Member>, MemberApiError>;
        async fn fetch_member_by_username(&self, username: &str) -> Result<Option<Member>, MemberApiError>;
        async fn create_member(&self, member: NewMember) -> Result<Member, MemberApiError>;
        async fn adjust_points(&self, member_id: i64, delta: Points, description: &str) -> Result<PointAdjustment, MemberApiError>;
        async fn set_membership_tier(&self, member_id: i64, tier: MembershipTier) -> Result<Member, MemberApiError>;
        async fn fetch_point_history(&self, member_id: i64) -> Result<Vec<PointAdjustment>, MemberApiError>;
        async fn fetch_bookings_for_account(&self, account_holder_id: i64) -> Result<Vec<Booking>, MemberApiError>;
        async fn fetch_all_bookings(&self) -> Result<Vec<Booking>, MemberApiError>;
    }
}
