use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use mockall::predicate::{always, eq};
use serde_json::{json, Value};
use ycm_common::Secret;
use ycm_engine::{
    db_types::{MembershipTier, PointAdjustment, Points},
    test_utils::{
        prepare_env::{new_test_database, remove_test_database},
        seed::seed_member,
    },
    traits::MemberManagement,
    MemberApi,
    SqliteDatabase,
};

use super::{
    helpers::{member, send_request, ADMIN_KEY},
    mocks::MockMemberManager,
};
use crate::{
    middleware::{AdminKeyMiddlewareFactory, ADMIN_KEY_HEADER},
    routes::{
        AdjustMemberPointsRoute,
        AllBookingsRoute,
        MemberBookingsRoute,
        MemberLedgerRoute,
        MemberMembershipRoute,
        MemberPointsRoute,
        UpdateMembershipRoute,
    },
};

fn admin_routes(manager: MockMemberManager, key: &str) -> impl FnOnce(&mut ServiceConfig) {
    let key = Secret::new(key.to_string());
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(MemberApi::new(manager))).service(
            web::scope("/api")
                .wrap(AdminKeyMiddlewareFactory::new(key))
                .service(MemberPointsRoute::<MockMemberManager>::new())
                .service(AdjustMemberPointsRoute::<MockMemberManager>::new())
                .service(MemberMembershipRoute::<MockMemberManager>::new())
                .service(UpdateMembershipRoute::<MockMemberManager>::new())
                .service(MemberBookingsRoute::<MockMemberManager>::new())
                .service(MemberLedgerRoute::<MockMemberManager>::new())
                .service(AllBookingsRoute::<MockMemberManager>::new()),
        );
    }
}

fn with_alice(points: i64) -> MockMemberManager {
    let mut manager = MockMemberManager::new();
    let alice = member(7, "alice", points);
    manager.expect_fetch_member_by_username().returning(move |_| Ok(Some(alice.clone())));
    manager
}

fn admin_get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
}

#[actix_web::test]
async fn admin_key_is_required() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/members/alice/points");
    let (status, body) = send_request(req, admin_routes(MockMemberManager::new(), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"A valid admin key is required"}"#);

    let req = TestRequest::get().uri("/api/members/alice/points").insert_header((ADMIN_KEY_HEADER, "guess"));
    let (status, _) = send_request(req, admin_routes(MockMemberManager::new(), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unconfigured_admin_key_refuses_everything() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/members/alice/points").insert_header((ADMIN_KEY_HEADER, ""));
    let (status, _) = send_request(req, admin_routes(MockMemberManager::new(), "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn fetch_member_points() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        send_request(admin_get("/api/members/alice/points"), admin_routes(with_alice(120), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"username": "alice", "points": 120}));
}

#[actix_web::test]
async fn fetch_points_for_unknown_member() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockMemberManager::new();
    manager.expect_fetch_member_by_username().returning(|_| Ok(None));
    let (status, body) = send_request(admin_get("/api/members/nobody/points"), admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Member not found: nobody"));
}

#[actix_web::test]
async fn zero_adjustment_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/members/alice/points")
        .insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
        .set_json(json!({"delta": 0}));
    let (status, body) = send_request(req, admin_routes(MockMemberManager::new(), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("The adjustment must be non-zero"));
}

#[actix_web::test]
async fn credit_member_points() {
    let _ = env_logger::try_init().ok();
    let mut manager = with_alice(120);
    manager
        .expect_adjust_points()
        .with(eq(7), eq(Points::from(30)), always())
        .times(1)
        .returning(|member_id, delta, description| {
            Ok(PointAdjustment {
                id: 3,
                member_id,
                points_added: delta,
                points_removed: Points::default(),
                balance: Points::from(150),
                description: description.to_string(),
                booking_id: None,
                created_at: Utc::now(),
            })
        });
    let req = TestRequest::post()
        .uri("/api/members/alice/points")
        .insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
        .set_json(json!({"delta": 30, "description": " Referral bonus "}));
    let (status, body) = send_request(req, admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    let entry: PointAdjustment = serde_json::from_str(&body).unwrap();
    assert_eq!(entry.points_added, Points::from(30));
    assert_eq!(entry.balance, Points::from(150));
    assert_eq!(entry.description, "Referral bonus");
}

#[actix_web::test]
async fn fetch_membership() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        send_request(admin_get("/api/members/alice/membership"), admin_routes(with_alice(10), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"username": "alice", "membership_tier": "Gold"}));
}

#[actix_web::test]
async fn update_membership_tier() {
    let _ = env_logger::try_init().ok();
    let mut manager = with_alice(10);
    manager.expect_set_membership_tier().with(eq(7), eq(MembershipTier::Platinum)).times(1).returning(|_, tier| {
        let mut alice = member(7, "alice", 10);
        alice.membership_tier = tier;
        Ok(alice)
    });
    let req = TestRequest::put()
        .uri("/api/members/alice/membership")
        .insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
        .set_json(json!({"membership_tier": "platinum"}));
    let (status, body) = send_request(req, admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["membership_tier"], "Platinum");
}

#[actix_web::test]
async fn update_membership_with_unknown_tier() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::put()
        .uri("/api/members/alice/membership")
        .insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
        .set_json(json!({"membership_tier": "Diamond"}));
    let (status, body) = send_request(req, admin_routes(MockMemberManager::new(), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid membership tier: Diamond"));
}

#[actix_web::test]
async fn secondary_member_sees_account_bookings() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockMemberManager::new();
    manager.expect_fetch_member().with(eq(9)).returning(|id| {
        let mut secondary = member(id, "junior", 0);
        secondary.is_primary = false;
        secondary.primary_member_id = Some(7);
        Ok(Some(secondary))
    });
    manager.expect_fetch_bookings_for_account().with(eq(7)).times(1).returning(|_| Ok(Vec::new()));
    let (status, body) = send_request(admin_get("/api/members/9/bookings"), admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn ledger_for_unknown_member() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockMemberManager::new();
    manager.expect_fetch_member().returning(|_| Ok(None));
    let (status, _) = send_request(admin_get("/api/members/404/ledger"), admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_member_id_in_path() {
    let _ = env_logger::try_init().ok();
    let (status, _) =
        send_request(admin_get("/api/members/alice/ledger"), admin_routes(MockMemberManager::new(), ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn backend_failures_are_server_errors() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockMemberManager::new();
    manager
        .expect_fetch_all_bookings()
        .returning(|| Err(ycm_engine::MemberApiError::DatabaseError("disk I/O error".into())));
    let (status, body) = send_request(admin_get("/api/bookings"), admin_routes(manager, ADMIN_KEY)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk I/O error"));
}

#[actix_web::test]
async fn out_of_range_adjustments_are_rejected() {
    let _ = env_logger::try_init().ok();
    let (url, db) = new_test_database().await;
    seed_member(&db, "jane", "jane.member@example.com", 500).await;
    let routes = |db: SqliteDatabase| {
        move |cfg: &mut ServiceConfig| {
            cfg.app_data(web::Data::new(MemberApi::new(db))).service(
                web::scope("/api")
                    .wrap(AdminKeyMiddlewareFactory::new(Secret::new(ADMIN_KEY.to_string())))
                    .service(AdjustMemberPointsRoute::<SqliteDatabase>::new()),
            );
        }
    };
    for delta in [i64::MAX, i64::MIN] {
        let req = TestRequest::post()
            .uri("/api/members/jane/points")
            .insert_header((ADMIN_KEY_HEADER, ADMIN_KEY))
            .set_json(json!({ "delta": delta }));
        let (status, body) = send_request(req, routes(db.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(body.contains("out of range"), "{body}");
    }
    let jane = db.fetch_member_by_username("jane").await.unwrap().unwrap();
    assert_eq!(jane.points, Points::from(500));
    assert_eq!(db.fetch_point_history(jane.id).await.unwrap().len(), 1);
    remove_test_database(&url, db).await;
}
