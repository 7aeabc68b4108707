//! The points ledger.
//!
//! [`apply_adjustment`] is the only code path that changes a member's balance. It must be called inside a transaction
//! so that the balance update and the ledger entry are committed together.
use log::{debug, warn};
use sqlx::{Error as SqlxError, SqliteConnection};

use crate::{
    db_types::{Member, PointAdjustment, Points},
    sqlite::db::members,
    traits::MemberApiError,
};

/// Adds `delta` to the member's balance and writes a ledger entry. Negative deltas are recorded as points removed.
///
/// Returns `None` if the member does not exist. The resulting balance may be negative, but an adjustment that would
/// take the balance outside the range of [`Points`] fails with [`MemberApiError::InvalidAdjustment`].
pub async fn apply_adjustment(
    member_id: i64,
    delta: Points,
    description: &str,
    booking_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Option<(Member, PointAdjustment)>, MemberApiError> {
    let Some(member) = members::fetch_member(member_id, conn).await? else {
        return Ok(None);
    };
    let out_of_range = || {
        warn!("🗃️ Adjustment of {} for member #{member_id} is out of range", delta.value());
        MemberApiError::InvalidAdjustment(format!(
            "Adjusting a balance of {} by {} is out of range",
            member.points.value(),
            delta.value()
        ))
    };
    let balance = member.points.checked_add(delta).ok_or_else(out_of_range)?;
    let (added, removed) = if delta.is_negative() {
        (Points::default(), delta.checked_neg().ok_or_else(out_of_range)?)
    } else {
        (delta, Points::default())
    };
    let Some(member) = members::set_points_balance(member_id, balance, conn).await? else {
        return Ok(None);
    };
    let entry: PointAdjustment = sqlx::query_as(
        r#"INSERT INTO point_adjustments
        (member_id, points_added, points_removed, balance, description, booking_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *;
        "#,
    )
    .bind(member_id)
    .bind(added)
    .bind(removed)
    .bind(balance)
    .bind(description)
    .bind(booking_id)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Ledger entry #{} for member #{member_id}: {delta}. New balance: {balance}", entry.id);
    Ok(Some((member, entry)))
}

pub async fn fetch_point_history(
    member_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<PointAdjustment>, SqlxError> {
    let history = sqlx::query_as("SELECT * FROM point_adjustments WHERE member_id = ? ORDER BY id DESC")
        .bind(member_id)
        .fetch_all(conn)
        .await?;
    Ok(history)
}
