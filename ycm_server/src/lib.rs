//! # Yacht Club Membership server
//! The HTTP face of the membership backend. It is responsible for:
//! * Receiving booking webhooks from FareHarbor, converting them into booking requests and handing them to the
//!   settlement engine.
//! * Sending owner calendar invites and low-balance alerts when the engine reports settled bookings.
//! * Pushing settled bookings to connected member dashboards over websockets.
//! * Serving the admin API for point balances, memberships and booking history.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook`: The FareHarbor booking webhook. Guarded by the IP whitelist and the HMAC signature check.
//! * `/ws/{member_id}`: Live booking updates for a member.
//! * `/api/...`: The admin API. Every call needs the `X-Admin-Key` header.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod live;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
