use std::sync::Arc;

use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use fareharbor_tools::CustomFieldNames;
use serde_json::Value;
use ycm_common::Secret;
use ycm_engine::{
    db_types::Points,
    events::EventProducers,
    test_utils::{
        prepare_env::{new_test_database, remove_test_database},
        seed::{seed_fleet, seed_member},
    },
    traits::MemberManagement,
    NameMappings,
    SettlementApi,
    SqliteDatabase,
};

use super::helpers::{send_request, ADMIN_KEY};
use crate::{
    helpers::calculate_hmac,
    middleware::{AdminKeyMiddlewareFactory, HmacMiddlewareFactory, ADMIN_KEY_HEADER},
    routes::{FareharborWebhookRoute, UnmappedNamesRoute},
};

const WANDERLUST: &str = include_str!("../../../fareharbor_tools/src/test_assets/booking_wanderlust.json");
const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

fn webhook_secret() -> String {
    hex::encode("kokomo-webhooks")
}

fn webhook_routes(db: SqliteDatabase, hmac_checks: bool) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = SettlementApi::new(db, Arc::new(NameMappings::default()), EventProducers::default());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(CustomFieldNames::default()))
            .service(
                web::scope("/webhook")
                    .wrap(HmacMiddlewareFactory::new(SIGNATURE_HEADER, Secret::new(webhook_secret()), hmac_checks))
                    .service(FareharborWebhookRoute::<SqliteDatabase>::new()),
            )
            .service(
                web::scope("/api")
                    .wrap(AdminKeyMiddlewareFactory::new(Secret::new(ADMIN_KEY.to_string())))
                    .service(UnmappedNamesRoute::<SqliteDatabase>::new()),
            );
    }
}

fn booking_with(edit: impl FnOnce(&mut Value)) -> String {
    let mut booking: Value = serde_json::from_str(WANDERLUST).unwrap();
    edit(&mut booking["booking"]);
    booking.to_string()
}

fn post_booking(body: &str) -> TestRequest {
    TestRequest::post().uri("/webhook").insert_header(ContentType::json()).set_payload(body.to_string())
}

async fn balance_of(db: &SqliteDatabase, username: &str) -> Points {
    db.fetch_member_by_username(username).await.unwrap().expect("Member should exist").points
}

#[actix_web::test]
async fn booking_is_settled_against_member_balance() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    let jane = seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let (status, body) = send_request(post_booking(WANDERLUST), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"booking_status":"successful"}"#);
    // 1 Full Day on Wanderlust is 100 points, less the yacht's 10% discount
    assert_eq!(balance_of(&db, "jane").await, Points::from(410));

    let history = db.fetch_point_history(jane.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].points_removed, Points::from(90));
    assert_eq!(history[0].balance, Points::from(410));
    assert!(history[0].booking_id.is_some());

    let bookings = db.fetch_bookings_for_account(jane.id).await.unwrap();
    assert_eq!(bookings.len(), 1);
    let booking = &bookings[0];
    assert_eq!(booking.vendor_booking_id.as_str(), "221843110");
    assert_eq!(booking.vessel_name, "Wanderlust");
    assert_eq!(booking.tour_type, "1 Full Day");
    assert_eq!(booking.points_cost, Points::from(90));
    assert_eq!(booking.balance_after_booking, Some(Points::from(410)));
    assert_eq!(booking.receipt_total, 125_000);
    assert_eq!(booking.number_of_adults, 6);
    assert_eq!(booking.e_foil_count, 2);
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn redelivered_booking_is_a_conflict() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let (status, _) = send_request(post_booking(WANDERLUST), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send_request(post_booking(WANDERLUST), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("221843110"));
    assert_eq!(balance_of(&db, "jane").await, Points::from(410));
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn booking_may_overdraw_the_balance() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 50).await;

    let (status, _) = send_request(post_booking(WANDERLUST), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_of(&db, "jane").await, Points::from(-40));
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn booking_by_non_member_is_recorded_without_a_deduction() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let body = booking_with(|b| b["contact"]["email"] = "guest@example.com".into());
    let (status, _) = send_request(post_booking(&body), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_of(&db, "jane").await, Points::from(500));
    let bookings = db.fetch_all_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].member_id, None);
    assert_eq!(bookings[0].balance_after_booking, None);
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn unknown_yacht_is_not_found() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let body = booking_with(|b| b["availability"]["item"]["name"] = "KYC - Mystery Boat".into());
    let (status, body) = send_request(post_booking(&body), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("KYC - Mystery Boat"));
    assert_eq!(balance_of(&db, "jane").await, Points::from(500));
    assert!(db.fetch_all_bookings().await.unwrap().is_empty());

    let req = TestRequest::get().uri("/api/unmapped_names").insert_header((ADMIN_KEY_HEADER, ADMIN_KEY));
    let (status, body) = send_request(req, webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Value = serde_json::from_str(&body).unwrap();
    let names = names.as_array().expect("Expected a list of unmapped names");
    assert!(names.iter().any(|n| n["vendor_name"] == "KYC - Mystery Boat" && n["kind"] == "yacht_listing"));
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn unpriced_yacht_is_unprocessable() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let body = booking_with(|b| b["availability"]["item"]["name"] = "KYC - Top Shelf".into());
    let (status, body) = send_request(post_booking(&body), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Top Shelf"));
    assert_eq!(balance_of(&db, "jane").await, Points::from(500));
    assert!(db.fetch_all_bookings().await.unwrap().is_empty());
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn malformed_payloads_are_bad_requests() {
    let (url, db) = new_test_database().await;
    for body in ["{not json", r#"{"event": "booking.updated"}"#, r#"{"booking": {"pk": "abc"}}"#] {
        let (status, body) = send_request(post_booking(body), webhook_routes(db.clone(), false)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(body.starts_with(r#"{"error":"Malformed booking payload."#), "{body}");
    }
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn oversized_money_is_a_bad_request() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;
    let body = booking_with(|b| b["receipt_total_display"] = Value::from("$99999999999999999"));
    let (status, body) = send_request(post_booking(&body), webhook_routes(db.clone(), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body.contains("Invalid currency amount"), "{body}");
    assert!(db.fetch_all_bookings().await.unwrap().is_empty());
    assert_eq!(balance_of(&db, "jane").await, Points::from(500));
    remove_test_database(&url, db).await;
}

#[actix_web::test]
async fn webhook_signature_is_checked() {
    let (url, db) = new_test_database().await;
    seed_fleet(&db).await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;

    let (status, _) = send_request(post_booking(WANDERLUST), webhook_routes(db.clone(), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let forged = calculate_hmac(&hex::encode("someone-else"), WANDERLUST.as_bytes()).unwrap();
    let req = post_booking(WANDERLUST).insert_header((SIGNATURE_HEADER, forged));
    let (status, _) = send_request(req, webhook_routes(db.clone(), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(balance_of(&db, "jane").await, Points::from(500));

    let signature = calculate_hmac(&webhook_secret(), WANDERLUST.as_bytes()).unwrap();
    let req = post_booking(WANDERLUST).insert_header((SIGNATURE_HEADER, signature));
    let (status, body) = send_request(req, webhook_routes(db.clone(), true)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(balance_of(&db, "jane").await, Points::from(410));
    remove_test_database(&url, db).await;
}
