use thiserror::Error;

use crate::db_types::{Points, TourType, UnmappedName, UnmappedNameKind, Yacht, YachtOwner};

#[derive(Debug, Clone, Error)]
pub enum ReferenceDataError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for ReferenceDataError {
    fn from(e: sqlx::Error) -> Self {
        ReferenceDataError::DatabaseError(e.to_string())
    }
}

/// Read access to the yacht, tour type, pricing and owner tables, plus the unmapped vendor name audit log.
#[allow(async_fn_in_trait)]
pub trait ReferenceData {
    /// Exact match on the canonical yacht name.
    async fn fetch_yacht_by_name(&self, name: &str) -> Result<Option<Yacht>, ReferenceDataError>;

    /// Exact match on the canonical tour type name.
    async fn fetch_tour_type_by_name(&self, name: &str) -> Result<Option<TourType>, ReferenceDataError>;

    /// The base point cost for exactly this (yacht, tour type) pair.
    async fn fetch_point_cost(&self, yacht_id: i64, tour_type_id: i64) -> Result<Option<Points>, ReferenceDataError>;

    async fn fetch_owners_for_yacht(&self, yacht_id: i64) -> Result<Vec<YachtOwner>, ReferenceDataError>;

    /// Records (or bumps the counter on) a vendor name that could not be mapped.
    async fn record_unmapped_name(&self, kind: UnmappedNameKind, vendor_name: &str) -> Result<(), ReferenceDataError>;

    async fn fetch_unmapped_names(&self) -> Result<Vec<UnmappedName>, ReferenceDataError>;
}
