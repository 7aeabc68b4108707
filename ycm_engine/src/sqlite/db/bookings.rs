use log::debug;
use sqlx::{Error as SqlxError, SqliteConnection};

use crate::{
    db_types::{Booking, NewBooking, Points, VendorBookingId},
    traits::BookingDatabaseError,
};

/// Inserts a booking. The unique constraint on `vendor_booking_id` is the duplicate-settlement backstop, so a unique
/// violation is reported as [`BookingDatabaseError::BookingAlreadyExists`].
pub async fn insert_booking(booking: NewBooking, conn: &mut SqliteConnection) -> Result<Booking, BookingDatabaseError> {
    let vendor_id = booking.vendor_booking_id.clone();
    let result: Booking = sqlx::query_as(
        r#"INSERT INTO bookings (
            vendor_booking_id, vendor_uuid, dashboard_url, member_id, yacht_id, tour_type_id, vessel_name, tour_type,
            start_at, end_at, vendor_created_at, contact_name, contact_email, contact_phone,
            invoice_price, amount_paid, receipt_subtotal, receipt_taxes, receipt_total, amount_due, booking_fee,
            e_foil_count, sea_bob_count, tubing, catering_option, adult_beverages,
            other_add_ons, other_cost, other_cost_desc, staff_gratuity,
            number_of_adults, number_of_kids, pickup_point, points_cost, booking_status, created_by
        ) VALUES (
            ?, ?, ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?
        )
        RETURNING *;
        "#,
    )
    .bind(booking.vendor_booking_id)
    .bind(booking.vendor_uuid)
    .bind(booking.dashboard_url)
    .bind(booking.member_id)
    .bind(booking.yacht_id)
    .bind(booking.tour_type_id)
    .bind(booking.vessel_name)
    .bind(booking.tour_type)
    .bind(booking.start_at)
    .bind(booking.end_at)
    .bind(booking.vendor_created_at)
    .bind(booking.contact_name)
    .bind(booking.contact_email)
    .bind(booking.contact_phone)
    .bind(booking.invoice_price)
    .bind(booking.amount_paid)
    .bind(booking.receipt_subtotal)
    .bind(booking.receipt_taxes)
    .bind(booking.receipt_total)
    .bind(booking.amount_due)
    .bind(booking.booking_fee)
    .bind(booking.e_foil_count)
    .bind(booking.sea_bob_count)
    .bind(booking.tubing)
    .bind(booking.catering_option)
    .bind(booking.adult_beverages)
    .bind(booking.other_add_ons)
    .bind(booking.other_cost)
    .bind(booking.other_cost_desc)
    .bind(booking.staff_gratuity)
    .bind(booking.number_of_adults)
    .bind(booking.number_of_kids)
    .bind(booking.pickup_point)
    .bind(booking.points_cost)
    .bind(booking.booking_status)
    .bind(booking.created_by)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        SqlxError::Database(e) if e.is_unique_violation() => BookingDatabaseError::BookingAlreadyExists(vendor_id),
        e => BookingDatabaseError::DatabaseError(e.to_string()),
    })?;
    debug!("🗃️ Booking [{}] saved with id {}", result.vendor_booking_id, result.id);
    Ok(result)
}

pub async fn set_balance_after_booking(
    booking_id: i64,
    balance: Points,
    conn: &mut SqliteConnection,
) -> Result<Booking, SqlxError> {
    let booking = sqlx::query_as("UPDATE bookings SET balance_after_booking = ? WHERE id = ? RETURNING *")
        .bind(balance)
        .bind(booking_id)
        .fetch_one(conn)
        .await?;
    Ok(booking)
}

pub async fn fetch_booking_by_vendor_id(
    vendor_booking_id: &VendorBookingId,
    conn: &mut SqliteConnection,
) -> Result<Option<Booking>, SqlxError> {
    let booking = sqlx::query_as("SELECT * FROM bookings WHERE vendor_booking_id = ?")
        .bind(vendor_booking_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(booking)
}

pub async fn booking_exists(vendor_booking_id: &VendorBookingId, conn: &mut SqliteConnection) -> Result<bool, SqlxError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE vendor_booking_id = ?")
        .bind(vendor_booking_id.as_str())
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

/// Bookings for the account holder and all of its secondary members.
pub async fn fetch_bookings_for_account(
    account_holder_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Booking>, SqlxError> {
    let bookings = sqlx::query_as(
        r#"SELECT * FROM bookings
        WHERE member_id IN (SELECT id FROM members WHERE id = $1 OR primary_member_id = $1)
        ORDER BY id DESC"#,
    )
    .bind(account_holder_id)
    .fetch_all(conn)
    .await?;
    Ok(bookings)
}

pub async fn fetch_all_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, SqlxError> {
    let bookings = sqlx::query_as("SELECT * FROM bookings ORDER BY id DESC").fetch_all(conn).await?;
    Ok(bookings)
}
