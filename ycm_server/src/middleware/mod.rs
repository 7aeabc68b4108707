mod admin_key;
mod hmac;

pub use admin_key::{AdminKeyMiddlewareFactory, AdminKeyMiddlewareService, ADMIN_KEY_HEADER};
pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService};
