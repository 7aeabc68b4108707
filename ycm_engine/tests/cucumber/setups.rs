use cucumber::given;
use ycm_engine::test_utils::seed::{seed_fleet, seed_member};

use crate::cucumber::{settlement_world::SettlementSystem, SettlementWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut SettlementWorld) {
    let system = SettlementSystem::new(world.mappings.clone()).await;
    world.system = Some(system);
}

#[given(expr = "the charter listing {string} for the yacht {string}")]
async fn charter_listing(world: &mut SettlementWorld, listing: String, yacht: String) {
    assert!(world.system.is_none(), "Charter listings must be configured before the install");
    world.mappings.charter_yachts.insert(listing, yacht);
}

#[given("the standard fleet")]
async fn standard_fleet(world: &mut SettlementWorld) {
    seed_fleet(world.db()).await;
}

#[given(expr = "a member {word} with email {word} and {int} points")]
async fn member_with_points(world: &mut SettlementWorld, username: String, email: String, points: i64) {
    seed_member(world.db(), &username, &email, points).await;
}
