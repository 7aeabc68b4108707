use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use chrono::Utc;
use log::debug;
use ycm_engine::db_types::{Member, MembershipTier, Points};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Sends the request to an app built by `configure` and returns the status and body. Errors raised by middleware are
/// rendered the same way the server would render them.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn member(id: i64, username: &str, points: i64) -> Member {
    Member {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        points: Points::from(points),
        membership_tier: MembershipTier::Gold,
        is_primary: true,
        primary_member_id: None,
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
