use cucumber::{then, when};
use ycm_engine::{
    db_types::{Points, VendorBookingId},
    BookingDatabase,
    MemberManagement,
    SettlementError,
    SettlementOutcome,
};

use crate::{cucumber::SettlementWorld, support::booking_request};

#[when(expr = "booking {word} arrives for {string} with headline {string} starting at {word} from {word}")]
async fn booking_arrives(
    world: &mut SettlementWorld,
    id: String,
    listing: String,
    headline: String,
    start: String,
    email: String,
) {
    let mut request = booking_request(&id, &listing, &headline, &start);
    request.contact.email = Some(email);
    let result = world.api().settle(request).await;
    world.last_result = Some(result);
}

#[then("the booking is settled")]
async fn booking_settled(world: &mut SettlementWorld) {
    assert!(
        matches!(world.last_result(), Ok(SettlementOutcome::Settled(_))),
        "Expected a settled booking, got {:?}",
        world.last_result()
    );
}

#[then("the booking is recorded as a charter booking")]
async fn charter_recorded(world: &mut SettlementWorld) {
    assert!(
        matches!(world.last_result(), Ok(SettlementOutcome::CharterRecorded(_))),
        "Expected a charter booking, got {:?}",
        world.last_result()
    );
}

#[then(expr = "the booking is rejected as {word}")]
async fn booking_rejected(world: &mut SettlementWorld, reason: String) {
    let err = world.last_result().as_ref().expect_err("Expected the booking to be rejected");
    let matched = match reason.as_str() {
        "duplicate" => matches!(err, SettlementError::DuplicateBooking(_)),
        "unknown_yacht" => matches!(err, SettlementError::YachtNotFound(_)),
        "unpriced" => matches!(err, SettlementError::NoPriceFound { .. }),
        other => panic!("Unknown rejection reason {other}"),
    };
    assert!(matched, "Expected {reason}, got {err:?}");
}

#[then(expr = "booking {word} cost {int} points")]
async fn booking_cost(world: &mut SettlementWorld, id: String, points: i64) {
    let booking = world
        .db()
        .fetch_booking_by_vendor_id(&VendorBookingId::from(id))
        .await
        .expect("Error fetching booking")
        .expect("Booking does not exist");
    assert_eq!(booking.points_cost, Points::from(points));
}

#[then(expr = "booking {word} is filed as {string}")]
async fn booking_tour(world: &mut SettlementWorld, id: String, tour: String) {
    let booking = world
        .db()
        .fetch_booking_by_vendor_id(&VendorBookingId::from(id))
        .await
        .expect("Error fetching booking")
        .expect("Booking does not exist");
    assert_eq!(booking.tour_type, tour);
}

#[then(expr = "member {word} has {int} points")]
async fn member_points(world: &mut SettlementWorld, username: String, points: i64) {
    let member = world.system().members.member_by_username(&username).await.expect("Member does not exist");
    assert_eq!(member.points, Points::from(points));
}

#[then(expr = "member {word} has {int} ledger entries")]
async fn member_ledger(world: &mut SettlementWorld, username: String, count: usize) {
    let member = world.db().fetch_member_by_username(&username).await.expect("Error fetching member");
    let member = member.expect("Member does not exist");
    let history = world.db().fetch_point_history(member.id).await.expect("Error fetching history");
    assert_eq!(history.len(), count);
}

#[then(expr = "there are {int} club bookings")]
async fn club_bookings(world: &mut SettlementWorld, count: usize) {
    let bookings = world.db().fetch_all_bookings().await.expect("Error fetching bookings");
    assert_eq!(bookings.len(), count);
}
