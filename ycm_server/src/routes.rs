//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! etc.) must be expressed as futures or asynchronous functions.
use actix_web::{get, web, HttpResponse, Responder};
use fareharbor_tools::{CustomFieldNames, WebhookEnvelope};
use log::*;
use ycm_engine::{
    db_types::MembershipTier,
    traits::{BookingDatabase, MemberManagement},
    MemberApi,
    SettlementApi,
    SettlementOutcome,
};

use crate::{
    data_objects::{MemberMembership, MemberPoints, MembershipUpdateRequest, PointAdjustmentRequest, WebhookResponse},
    errors::{BookingConversionError, ServerError},
    integrations::fareharbor::booking_request_from_fareharbor,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(fareharbor_webhook => Post "" impl BookingDatabase);
/// Route handler for FareHarbor booking webhooks.
///
/// The raw body is parsed here rather than with `web::Json`, so that malformed payloads get the same JSON error body
/// as every other failure. FareHarbor redelivers webhooks; a booking that has already been recorded returns 409.
pub async fn fareharbor_webhook<B: BookingDatabase>(
    body: web::Bytes,
    api: web::Data<SettlementApi<B>>,
    fields: web::Data<CustomFieldNames>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received FareHarbor webhook ({} bytes)", body.len());
    let booking = WebhookEnvelope::parse_booking(&body).map_err(BookingConversionError::from)?;
    let request = booking_request_from_fareharbor(booking, fields.get_ref()).map_err(|e| {
        warn!("💻️ Could not convert the FareHarbor booking. {e}");
        e
    })?;
    let id = request.vendor_booking_id.clone();
    match api.settle(request).await {
        Ok(SettlementOutcome::Settled(receipt)) => {
            debug!("💻️ Booking [{id}] settled as booking #{}", receipt.booking.id);
            Ok(HttpResponse::Ok().json(WebhookResponse::successful()))
        },
        Ok(SettlementOutcome::CharterRecorded(_)) => {
            debug!("💻️ Charter booking [{id}] recorded");
            Ok(HttpResponse::Ok().json(WebhookResponse::charter_notification_sent()))
        },
        Err(e) => {
            info!("💻️ Booking [{id}] was not settled. {e}");
            Err(e.into())
        },
    }
}

//----------------------------------------------   Members  ----------------------------------------------------
route!(member_points => Get "/members/{username}/points" impl MemberManagement);
pub async fn member_points<B: MemberManagement>(
    path: web::Path<String>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = path.into_inner();
    debug!("💻️ GET points for {username}");
    let member = api.member_by_username(&username).await?;
    Ok(HttpResponse::Ok().json(MemberPoints { username: member.username, points: member.points }))
}

route!(adjust_member_points => Post "/members/{username}/points" impl MemberManagement);
/// Applies a manual credit (positive `delta`) or debit (negative `delta`) and returns the ledger entry.
pub async fn adjust_member_points<B: MemberManagement>(
    path: web::Path<String>,
    body: web::Json<PointAdjustmentRequest>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = path.into_inner();
    let PointAdjustmentRequest { delta, description } = body.into_inner();
    debug!("💻️ POST points adjustment of {delta} for {username}");
    let entry = api.adjust_points(&username, delta, description.as_deref()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

route!(member_membership => Get "/members/{username}/membership" impl MemberManagement);
pub async fn member_membership<B: MemberManagement>(
    path: web::Path<String>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = path.into_inner();
    debug!("💻️ GET membership for {username}");
    let member = api.member_by_username(&username).await?;
    Ok(HttpResponse::Ok().json(MemberMembership { username: member.username, membership_tier: member.membership_tier }))
}

route!(update_membership => Put "/members/{username}/membership" impl MemberManagement);
pub async fn update_membership<B: MemberManagement>(
    path: web::Path<String>,
    body: web::Json<MembershipUpdateRequest>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = path.into_inner();
    let tier = body
        .membership_tier
        .parse::<MembershipTier>()
        .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    debug!("💻️ PUT membership {tier} for {username}");
    let member = api.set_membership_tier(&username, tier).await?;
    Ok(HttpResponse::Ok().json(MemberMembership { username: member.username, membership_tier: member.membership_tier }))
}

route!(member_bookings => Get "/members/{member_id}/bookings" impl MemberManagement);
pub async fn member_bookings<B: MemberManagement>(
    path: web::Path<i64>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let member_id = path.into_inner();
    debug!("💻️ GET bookings for member #{member_id}");
    let bookings = api.bookings_for_member(member_id).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

route!(member_ledger => Get "/members/{member_id}/ledger" impl MemberManagement);
pub async fn member_ledger<B: MemberManagement>(
    path: web::Path<i64>,
    api: web::Data<MemberApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let member_id = path.into_inner();
    debug!("💻️ GET ledger for member #{member_id}");
    let history = api.point_history(member_id).await?;
    Ok(HttpResponse::Ok().json(history))
}

//----------------------------------------------   Bookings  ----------------------------------------------------
route!(all_bookings => Get "/bookings" impl MemberManagement);
pub async fn all_bookings<B: MemberManagement>(api: web::Data<MemberApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all bookings");
    let bookings = api.all_bookings().await?;
    Ok(HttpResponse::Ok().json(bookings))
}

route!(unmapped_names => Get "/unmapped_names" impl BookingDatabase);
pub async fn unmapped_names<B: BookingDatabase>(
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET unmapped vendor names");
    let names = api.unmapped_names().await?;
    Ok(HttpResponse::Ok().json(names))
}
