use log::debug;
use sqlx::{Error as SqlxError, SqliteConnection};

use crate::{
    db_types::{CharterBooking, NewCharterBooking, VendorBookingId},
    traits::BookingDatabaseError,
};

pub async fn insert_charter_booking(
    booking: NewCharterBooking,
    conn: &mut SqliteConnection,
) -> Result<CharterBooking, BookingDatabaseError> {
    let vendor_id = booking.vendor_booking_id.clone();
    let result: CharterBooking = sqlx::query_as(
        r#"INSERT INTO charter_bookings
        (vendor_booking_id, yacht_name, tour_type, start_at, end_at, contact_name, contact_email)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *;
        "#,
    )
    .bind(booking.vendor_booking_id)
    .bind(booking.yacht_name)
    .bind(booking.tour_type)
    .bind(booking.start_at)
    .bind(booking.end_at)
    .bind(booking.contact_name)
    .bind(booking.contact_email)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        SqlxError::Database(e) if e.is_unique_violation() => {
            BookingDatabaseError::CharterBookingAlreadyExists(vendor_id)
        },
        e => BookingDatabaseError::DatabaseError(e.to_string()),
    })?;
    debug!("🗃️ Charter booking [{}] for {} recorded", result.vendor_booking_id, result.yacht_name);
    Ok(result)
}

pub async fn charter_booking_exists(
    vendor_booking_id: &VendorBookingId,
    conn: &mut SqliteConnection,
) -> Result<bool, SqlxError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM charter_bookings WHERE vendor_booking_id = ?")
        .bind(vendor_booking_id.as_str())
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}
