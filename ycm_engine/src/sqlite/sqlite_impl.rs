//! `SqliteDatabase` is a concrete implementation of a settlement engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{bookings, charters, db_url, ledger, members, new_pool, reference};
use crate::{
    db_types::{
        Booking,
        CharterBooking,
        Member,
        MembershipTier,
        NewBooking,
        NewCharterBooking,
        NewMember,
        PointAdjustment,
        Points,
        TourType,
        UnmappedName,
        UnmappedNameKind,
        VendorBookingId,
        Yacht,
        YachtOwner,
    },
    traits::{
        BookingDatabase,
        BookingDatabaseError,
        MemberApiError,
        MemberManagement,
        ReferenceData,
        ReferenceDataError,
        SettledBooking,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl BookingDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn booking_exists(&self, vendor_booking_id: &VendorBookingId) -> Result<bool, BookingDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let exists = bookings::booking_exists(vendor_booking_id, &mut conn).await?;
        Ok(exists)
    }

    async fn fetch_booking_by_vendor_id(
        &self,
        vendor_booking_id: &VendorBookingId,
    ) -> Result<Option<Booking>, BookingDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let booking = bookings::fetch_booking_by_vendor_id(vendor_booking_id, &mut conn).await?;
        Ok(booking)
    }

    async fn settle_booking(&self, booking: NewBooking) -> Result<SettledBooking, BookingDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let member_id = booking.member_id;
        let cost = booking.points_cost;
        let booking = bookings::insert_booking(booking, &mut tx).await?;
        let result = match member_id {
            Some(member_id) => {
                let description =
                    format!("Booking {}: {} {}", booking.vendor_booking_id, booking.vessel_name, booking.tour_type);
                let (member, entry) =
                    ledger::apply_adjustment(member_id, -cost, description.trim(), Some(booking.id), &mut tx)
                        .await?
                        .ok_or(BookingDatabaseError::MemberNotFound(member_id))?;
                let booking = bookings::set_balance_after_booking(booking.id, member.points, &mut tx).await?;
                debug!(
                    "🗃️ Member #{member_id} debited {cost} for booking [{}]. New balance: {}",
                    booking.vendor_booking_id, member.points
                );
                SettledBooking { booking, member: Some(member), ledger_entry: Some(entry) }
            },
            None => SettledBooking { booking, member: None, ledger_entry: None },
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn charter_booking_exists(&self, vendor_booking_id: &VendorBookingId) -> Result<bool, BookingDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let exists = charters::charter_booking_exists(vendor_booking_id, &mut conn).await?;
        Ok(exists)
    }

    async fn insert_charter_booking(&self, booking: NewCharterBooking) -> Result<CharterBooking, BookingDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        charters::insert_charter_booking(booking, &mut conn).await
    }
}

impl MemberManagement for SqliteDatabase {
    async fn fetch_member(&self, member_id: i64) -> Result<Option<Member>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let member = members::fetch_member(member_id, &mut conn).await?;
        Ok(member)
    }

    async fn fetch_member_by_email(&self, email: &str) -> Result<Option<Member>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let member = members::fetch_member_by_email(email, &mut conn).await?;
        Ok(member)
    }

    async fn fetch_member_by_username(&self, username: &str) -> Result<Option<Member>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let member = members::fetch_member_by_username(username, &mut conn).await?;
        Ok(member)
    }

    async fn create_member(&self, member: NewMember) -> Result<Member, MemberApiError> {
        let mut tx = self.pool.begin().await?;
        let opening_balance = member.points;
        let mut new_member = members::insert_member(member.with_points(Points::default()), &mut tx).await?;
        if opening_balance != Points::default() {
            let (member, _) =
                ledger::apply_adjustment(new_member.id, opening_balance, "Opening balance", None, &mut tx)
                    .await?
                    .ok_or_else(|| MemberApiError::MemberNotFound(new_member.username.clone()))?;
            new_member = member;
        }
        tx.commit().await?;
        Ok(new_member)
    }

    async fn adjust_points(
        &self,
        member_id: i64,
        delta: Points,
        description: &str,
    ) -> Result<PointAdjustment, MemberApiError> {
        let mut tx = self.pool.begin().await?;
        let (_, entry) = ledger::apply_adjustment(member_id, delta, description, None, &mut tx)
            .await?
            .ok_or_else(|| MemberApiError::MemberNotFound(format!("#{member_id}")))?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn set_membership_tier(&self, member_id: i64, tier: MembershipTier) -> Result<Member, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        members::set_membership_tier(member_id, tier, &mut conn)
            .await?
            .ok_or_else(|| MemberApiError::MemberNotFound(format!("#{member_id}")))
    }

    async fn fetch_point_history(&self, member_id: i64) -> Result<Vec<PointAdjustment>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let history = ledger::fetch_point_history(member_id, &mut conn).await?;
        Ok(history)
    }

    async fn fetch_bookings_for_account(&self, account_holder_id: i64) -> Result<Vec<Booking>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = bookings::fetch_bookings_for_account(account_holder_id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_all_bookings(&self) -> Result<Vec<Booking>, MemberApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = bookings::fetch_all_bookings(&mut conn).await?;
        Ok(result)
    }
}

impl ReferenceData for SqliteDatabase {
    async fn fetch_yacht_by_name(&self, name: &str) -> Result<Option<Yacht>, ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        let yacht = reference::fetch_yacht_by_name(name, &mut conn).await?;
        Ok(yacht)
    }

    async fn fetch_tour_type_by_name(&self, name: &str) -> Result<Option<TourType>, ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        let tour = reference::fetch_tour_type_by_name(name, &mut conn).await?;
        Ok(tour)
    }

    async fn fetch_point_cost(&self, yacht_id: i64, tour_type_id: i64) -> Result<Option<Points>, ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        let cost = reference::fetch_point_cost(yacht_id, tour_type_id, &mut conn).await?;
        Ok(cost)
    }

    async fn fetch_owners_for_yacht(&self, yacht_id: i64) -> Result<Vec<YachtOwner>, ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        let owners = reference::fetch_owners_for_yacht(yacht_id, &mut conn).await?;
        Ok(owners)
    }

    async fn record_unmapped_name(&self, kind: UnmappedNameKind, vendor_name: &str) -> Result<(), ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        reference::record_unmapped_name(kind, vendor_name, &mut conn).await?;
        Ok(())
    }

    async fn fetch_unmapped_names(&self) -> Result<Vec<UnmappedName>, ReferenceDataError> {
        let mut conn = self.pool.acquire().await?;
        let names = reference::fetch_unmapped_names(&mut conn).await?;
        Ok(names)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies the embedded migrations. Migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}
