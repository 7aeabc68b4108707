//! # Yacht club engine public API
//!
//! * [`settlement_api`] settles incoming vendor bookings: it resolves the member, yacht and tour type, prices the
//!   booking, records it and deducts the points, then notifies subscribers.
//! * [`member_api`] provides the administrative view of members: balances, manual adjustments, membership tiers and
//!   booking history.
//!
//! # API usage
//!
//! Both APIs are created by supplying a database backend that implements the backend traits they need.
//!
//! ```rust,ignore
//! use ycm_engine::{MemberApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = MemberApi::new(db);
//! let history = api.point_history(member_id).await?;
//! ```
pub mod errors;
pub mod member_api;
pub mod settlement_api;
