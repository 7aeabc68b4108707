use log::{debug, trace};
use sqlx::{Error as SqlxError, SqliteConnection};

use crate::{
    db_types::{Member, MembershipTier, NewMember, Points},
    traits::MemberApiError,
};

pub async fn insert_member(member: NewMember, conn: &mut SqliteConnection) -> Result<Member, MemberApiError> {
    let username = member.username.clone();
    let result: Member = sqlx::query_as(
        r#"INSERT INTO members
        (username, email, first_name, last_name, points, membership_tier, is_primary, primary_member_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *;
        "#,
    )
    .bind(member.username)
    .bind(member.email.trim())
    .bind(member.first_name)
    .bind(member.last_name)
    .bind(member.points)
    .bind(member.membership_tier)
    .bind(member.primary_member_id.is_none())
    .bind(member.primary_member_id)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        SqlxError::Database(e) if e.is_unique_violation() => MemberApiError::MemberAlreadyExists(username),
        e => MemberApiError::DatabaseError(e.to_string()),
    })?;
    debug!("🗃️ Member #{} ({}) created", result.id, result.username);
    Ok(result)
}

pub async fn fetch_member(member_id: i64, conn: &mut SqliteConnection) -> Result<Option<Member>, SqlxError> {
    let member = sqlx::query_as("SELECT * FROM members WHERE id = ?").bind(member_id).fetch_optional(conn).await?;
    Ok(member)
}

/// Active members only. The email column is declared `COLLATE NOCASE`, so the match ignores case.
pub async fn fetch_member_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Member>, SqlxError> {
    trace!("🗃️ Looking up member by email");
    let member = sqlx::query_as("SELECT * FROM members WHERE email = ? AND is_deleted = 0 LIMIT 1")
        .bind(email.trim())
        .fetch_optional(conn)
        .await?;
    Ok(member)
}

pub async fn fetch_member_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Member>, SqlxError> {
    let member = sqlx::query_as("SELECT * FROM members WHERE username = ? AND is_deleted = 0 LIMIT 1")
        .bind(username.trim())
        .fetch_optional(conn)
        .await?;
    Ok(member)
}

/// Sets the balance directly. Callers must write the matching ledger entry in the same transaction.
pub(crate) async fn set_points_balance(
    member_id: i64,
    balance: Points,
    conn: &mut SqliteConnection,
) -> Result<Option<Member>, SqlxError> {
    let member = sqlx::query_as(
        "UPDATE members SET points = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *",
    )
    .bind(balance)
    .bind(member_id)
    .fetch_optional(conn)
    .await?;
    Ok(member)
}

pub async fn set_membership_tier(
    member_id: i64,
    tier: MembershipTier,
    conn: &mut SqliteConnection,
) -> Result<Option<Member>, SqlxError> {
    let member = sqlx::query_as(
        "UPDATE members SET membership_tier = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *",
    )
    .bind(tier)
    .bind(member_id)
    .fetch_optional(conn)
    .await?;
    debug!("🗃️ Membership tier for member #{member_id} set to {tier}");
    Ok(member)
}
