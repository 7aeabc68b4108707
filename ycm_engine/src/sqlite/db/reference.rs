//! Yacht, tour type, pricing and owner tables, and the unmapped vendor name audit log.
//!
//! The insert functions are used by admin tooling and test fixtures. Settlement only reads from these tables (apart
//! from the audit log).
use log::{debug, warn};
use sqlx::{Error as SqlxError, SqliteConnection};

use crate::db_types::{Points, TourType, UnmappedName, UnmappedNameKind, Yacht, YachtOwner};

pub async fn fetch_yacht_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Yacht>, SqlxError> {
    let yacht = sqlx::query_as("SELECT * FROM yachts WHERE name = ?").bind(name).fetch_optional(conn).await?;
    Ok(yacht)
}

pub async fn fetch_tour_type_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<TourType>, SqlxError> {
    let tour = sqlx::query_as("SELECT * FROM tour_types WHERE name = ?").bind(name).fetch_optional(conn).await?;
    Ok(tour)
}

pub async fn fetch_point_cost(
    yacht_id: i64,
    tour_type_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Points>, SqlxError> {
    let cost = sqlx::query_scalar("SELECT point_cost FROM yacht_tour_pricing WHERE yacht_id = ? AND tour_type_id = ?")
        .bind(yacht_id)
        .bind(tour_type_id)
        .fetch_optional(conn)
        .await?;
    Ok(cost)
}

pub async fn fetch_owners_for_yacht(yacht_id: i64, conn: &mut SqliteConnection) -> Result<Vec<YachtOwner>, SqlxError> {
    let owners = sqlx::query_as("SELECT * FROM yacht_owners WHERE yacht_id = ? ORDER BY id")
        .bind(yacht_id)
        .fetch_all(conn)
        .await?;
    Ok(owners)
}

pub async fn record_unmapped_name(
    kind: UnmappedNameKind,
    vendor_name: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqlxError> {
    warn!("🧭️ Unmapped {kind}: '{vendor_name}'. Update the name mappings or the reference data.");
    sqlx::query(
        r#"INSERT INTO unmapped_vendor_names (kind, vendor_name) VALUES (?, ?)
        ON CONFLICT (kind, vendor_name) DO UPDATE SET
            occurrences = occurrences + 1,
            last_seen = CURRENT_TIMESTAMP"#,
    )
    .bind(kind)
    .bind(vendor_name)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_unmapped_names(conn: &mut SqliteConnection) -> Result<Vec<UnmappedName>, SqlxError> {
    let names = sqlx::query_as("SELECT * FROM unmapped_vendor_names ORDER BY occurrences DESC, id")
        .fetch_all(conn)
        .await?;
    Ok(names)
}

pub async fn insert_yacht(name: &str, discount: i64, conn: &mut SqliteConnection) -> Result<Yacht, SqlxError> {
    let yacht: Yacht = sqlx::query_as("INSERT INTO yachts (name, discount) VALUES (?, ?) RETURNING *")
        .bind(name)
        .bind(discount)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Yacht #{} '{}' created with a {}% discount", yacht.id, yacht.name, yacht.discount);
    Ok(yacht)
}

pub async fn insert_tour_type(name: &str, conn: &mut SqliteConnection) -> Result<TourType, SqlxError> {
    let tour = sqlx::query_as("INSERT INTO tour_types (name) VALUES (?) RETURNING *").bind(name).fetch_one(conn).await?;
    Ok(tour)
}

pub async fn insert_point_cost(
    yacht_id: i64,
    tour_type_id: i64,
    point_cost: Points,
    conn: &mut SqliteConnection,
) -> Result<(), SqlxError> {
    sqlx::query("INSERT INTO yacht_tour_pricing (yacht_id, tour_type_id, point_cost) VALUES (?, ?, ?)")
        .bind(yacht_id)
        .bind(tour_type_id)
        .bind(point_cost)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_yacht_owner(
    yacht_id: i64,
    owner_name: &str,
    owner_email: &str,
    owner_phone: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<YachtOwner, SqlxError> {
    let owner = sqlx::query_as(
        "INSERT INTO yacht_owners (yacht_id, owner_name, owner_email, owner_phone) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(yacht_id)
    .bind(owner_name)
    .bind(owner_email)
    .bind(owner_phone)
    .fetch_one(conn)
    .await?;
    Ok(owner)
}
