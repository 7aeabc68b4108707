use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::{Server, Service},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use fareharbor_tools::CustomFieldNames;
use futures::{future::ok, FutureExt};
use log::info;
use ycm_engine::{
    events::{EventHandlers, EventProducers},
    MemberApi,
    NameMappings,
    SettlementApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    helpers::{get_remote_ip, peer_is_whitelisted},
    integrations::fareharbor::IntegrationMappings,
    live::{live_updates, LiveConnections},
    middleware::{AdminKeyMiddlewareFactory, HmacMiddlewareFactory},
    notifications::{notification_hooks, AnyMailer, NOTIFICATION_BUFFER_SIZE},
    routes::{
        health,
        AdjustMemberPointsRoute,
        AllBookingsRoute,
        FareharborWebhookRoute,
        MemberBookingsRoute,
        MemberLedgerRoute,
        MemberMembershipRoute,
        MemberPointsRoute,
        UnmappedNamesRoute,
        UpdateMembershipRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let (mappings, custom_fields) = load_mappings(&config)?;
    let live = LiveConnections::new();
    let mailer = AnyMailer::from_config(&config.mail).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let hooks = notification_hooks(mailer, config.mail.clone(), config.invites.clone(), live.clone());
    let handlers = EventHandlers::new(NOTIFICATION_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, mappings, custom_fields, producers, live)?;
    srv.await.map_err(ServerError::from)
}

/// Loads the vendor name mappings. Without a mappings file, the built-in tables are used.
pub fn load_mappings(config: &ServerConfig) -> Result<(NameMappings, CustomFieldNames), ServerError> {
    let Some(path) = &config.name_mappings_file else {
        return Ok((NameMappings::default(), CustomFieldNames::default()));
    };
    let mappings = NameMappings::from_file(path).map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let integration = IntegrationMappings::from_file(path)?;
    info!(
        "🪛️ Loaded name mappings version {} ({} club listings, {} charter listings, {} tour rules)",
        mappings.version,
        mappings.yachts.len(),
        mappings.charter_yachts.len(),
        mappings.tour_types.len()
    );
    Ok((mappings, integration.custom_fields))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    mappings: NameMappings,
    custom_fields: CustomFieldNames,
    producers: EventProducers,
    live: LiveConnections,
) -> Result<Server, ServerError> {
    let mappings = Arc::new(mappings);
    let settlement_api = web::Data::new(SettlementApi::new(db.clone(), mappings, producers));
    let member_api = web::Data::new(MemberApi::new(db));
    let custom_fields = web::Data::new(custom_fields);
    let live = web::Data::new(live);
    let srv = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ycm::access_log"))
            .app_data(settlement_api.clone())
            .app_data(member_api.clone())
            .app_data(custom_fields.clone())
            .app_data(live.clone());
        let admin_scope = web::scope("/api")
            .wrap(AdminKeyMiddlewareFactory::new(config.admin_api_key.clone()))
            .service(MemberPointsRoute::<SqliteDatabase>::new())
            .service(AdjustMemberPointsRoute::<SqliteDatabase>::new())
            .service(MemberMembershipRoute::<SqliteDatabase>::new())
            .service(UpdateMembershipRoute::<SqliteDatabase>::new())
            .service(MemberBookingsRoute::<SqliteDatabase>::new())
            .service(MemberLedgerRoute::<SqliteDatabase>::new())
            .service(AllBookingsRoute::<SqliteDatabase>::new())
            .service(UnmappedNamesRoute::<SqliteDatabase>::new());
        let use_x_forwarded_for = config.use_x_forwarded_for;
        let use_forwarded = config.use_forwarded;
        let whitelist = config.webhook.whitelist.clone();
        let hmac = &config.webhook;
        // Middleware registered last runs first, so the IP check happens before the body is read for the HMAC
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(&hmac.hmac_header, hmac.hmac_secret.clone(), hmac.hmac_checks))
            .wrap_fn(move |req, srv| {
                let peer_ip = get_remote_ip(req.request(), use_x_forwarded_for, use_forwarded);
                let whitelisted = peer_is_whitelisted(peer_ip, whitelist.as_deref());
                if whitelisted {
                    srv.call(req).boxed_local()
                } else {
                    ok(req.error_response(ServerError::ForbiddenPeer)).boxed_local()
                }
            })
            .service(FareharborWebhookRoute::<SqliteDatabase>::new());
        app.service(health).service(live_updates).service(webhook_scope).service(admin_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
