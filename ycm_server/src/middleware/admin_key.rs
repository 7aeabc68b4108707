//! Admin key middleware.
//!
//! Every request must carry the configured key in the `X-Admin-Key` header. If no key has been configured, all requests
//! are refused. Failures return 401 Unauthorized.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use ycm_common::Secret;

use crate::errors::ServerError;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

pub struct AdminKeyMiddlewareFactory {
    key: Secret<String>,
}

impl AdminKeyMiddlewareFactory {
    pub fn new(key: Secret<String>) -> Self {
        AdminKeyMiddlewareFactory { key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminKeyMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AdminKeyMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminKeyMiddlewareService { key: self.key.clone(), service: Rc::new(service) }))
    }
}

pub struct AdminKeyMiddlewareService<S> {
    key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authorized = match req.headers().get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok()) {
            _ if self.key.is_empty() => {
                warn!("🔐️ Admin API call to {} refused. No admin key has been configured.", req.path());
                false
            },
            Some(candidate) => self.key.matches(candidate),
            None => false,
        };
        Box::pin(async move {
            if authorized {
                trace!("🔐️ Admin key accepted for {}", req.path());
                service.call(req).await
            } else {
                warn!("🔐️ Missing or invalid admin key for {}. Denying access.", req.path());
                Err(ServerError::MissingAdminKey.into())
            }
        })
    }
}
