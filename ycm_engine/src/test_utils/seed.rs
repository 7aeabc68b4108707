//! A small fleet for tests.
//!
//! | Yacht       | Discount | Tour type               | Base cost |
//! |-------------|----------|-------------------------|-----------|
//! | Wanderlust  | 10%      | 1 Full Day              | 100       |
//! | Wanderlust  | 10%      | Half Day Morning Tour   | 60        |
//! | Wanderlust  | 10%      | Half Day Afternoon Tour | 60        |
//! | Thirst Trap | 0%       | Half Day Morning Tour   | 40        |
//! | Top Shelf   | 0%       | (no pricing)            |           |
//! | Sea Breeze  | 0%       | (no pricing)            |           |
//!
//! Sunset Tour exists as a tour type, but is not priced on any yacht.
use crate::{
    db_types::{Member, MembershipTier, NewMember, Points, TourType, Yacht},
    sqlite_db::reference,
    MemberManagement,
    SqliteDatabase,
};

pub const WANDERLUST_OWNER: &str = "owner.wanderlust@example.com";
pub const SEA_BREEZE_OWNER: &str = "captain@seabreeze.example.com";

#[derive(Debug, Clone)]
pub struct Fleet {
    pub wanderlust: Yacht,
    pub thirst_trap: Yacht,
    pub top_shelf: Yacht,
    pub sea_breeze: Yacht,
    pub full_day: TourType,
    pub half_day_morning: TourType,
    pub half_day_afternoon: TourType,
    pub sunset: TourType,
}

pub async fn seed_fleet(db: &SqliteDatabase) -> Fleet {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    let conn = &mut *conn;
    let wanderlust = reference::insert_yacht("Wanderlust", 10, conn).await.expect("Error seeding yacht");
    let thirst_trap = reference::insert_yacht("Thirst Trap", 0, conn).await.expect("Error seeding yacht");
    let top_shelf = reference::insert_yacht("Top Shelf", 0, conn).await.expect("Error seeding yacht");
    let sea_breeze = reference::insert_yacht("Sea Breeze", 0, conn).await.expect("Error seeding yacht");
    let full_day = reference::insert_tour_type("1 Full Day", conn).await.expect("Error seeding tour type");
    let half_day_morning =
        reference::insert_tour_type("Half Day Morning Tour", conn).await.expect("Error seeding tour type");
    let half_day_afternoon =
        reference::insert_tour_type("Half Day Afternoon Tour", conn).await.expect("Error seeding tour type");
    let sunset = reference::insert_tour_type("Sunset Tour", conn).await.expect("Error seeding tour type");
    let prices = [
        (wanderlust.id, full_day.id, 100),
        (wanderlust.id, half_day_morning.id, 60),
        (wanderlust.id, half_day_afternoon.id, 60),
        (thirst_trap.id, half_day_morning.id, 40),
    ];
    for (yacht_id, tour_type_id, cost) in prices {
        reference::insert_point_cost(yacht_id, tour_type_id, Points::from(cost), conn)
            .await
            .expect("Error seeding point cost");
    }
    reference::insert_yacht_owner(wanderlust.id, "Wanda Owner", WANDERLUST_OWNER, Some("555-0100"), conn)
        .await
        .expect("Error seeding owner");
    reference::insert_yacht_owner(sea_breeze.id, "Sam Skipper", SEA_BREEZE_OWNER, None, conn)
        .await
        .expect("Error seeding owner");
    Fleet { wanderlust, thirst_trap, top_shelf, sea_breeze, full_day, half_day_morning, half_day_afternoon, sunset }
}

/// Creates a primary member with the given opening balance.
pub async fn seed_member(db: &SqliteDatabase, username: &str, email: &str, points: i64) -> Member {
    let member = NewMember::new(username, email, "Test", username)
        .with_points(Points::from(points))
        .with_tier(MembershipTier::Gold);
    db.create_member(member).await.expect("Error seeding member")
}
