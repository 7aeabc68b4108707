//! Resolves vendor-facing names to yacht and tour type records.
//!
//! Names that cannot be mapped are written to the unmapped names audit table so that an operator can extend the
//! name mappings. Audit failures are logged, but never stop a booking from being settled.
use chrono::{DateTime, FixedOffset};
use log::*;

use crate::{
    db_types::{TourType, UnmappedNameKind, Yacht},
    settlement::name_mappings::{NameMappings, YachtNameMatch},
    traits::{ReferenceData, ReferenceDataError},
};

pub struct IdentifierResolver<'a, B> {
    db: &'a B,
    mappings: &'a NameMappings,
}

impl<'a, B: ReferenceData> IdentifierResolver<'a, B> {
    pub fn new(db: &'a B, mappings: &'a NameMappings) -> Self {
        Self { db, mappings }
    }

    /// Finds the yacht for a vendor listing title.
    ///
    /// Unmapped listings are looked up by their trimmed title, in case the listing is named exactly after the yacht.
    pub async fn resolve_yacht(&self, listing_name: &str) -> Result<Option<Yacht>, ReferenceDataError> {
        let matched = self.mappings.match_yacht(listing_name);
        if let YachtNameMatch::Unmapped(name) = &matched {
            self.audit(UnmappedNameKind::YachtListing, name).await;
        }
        let name = matched.canonical_name();
        let yacht = self.db.fetch_yacht_by_name(name).await?;
        if yacht.is_none() {
            self.audit(UnmappedNameKind::YachtName, name).await;
        }
        Ok(yacht)
    }

    /// Finds the tour type for a vendor headline. Returns `None` if the headline does not match any rule, or the
    /// canonical name is not in the tour type table.
    pub async fn resolve_tour_type(
        &self,
        headline: &str,
        start_at: &DateTime<FixedOffset>,
    ) -> Result<Option<TourType>, ReferenceDataError> {
        let Some(name) = self.mappings.match_tour_type(headline, start_at) else {
            if !headline.trim().is_empty() {
                self.audit(UnmappedNameKind::TourHeadline, headline.trim()).await;
            }
            return Ok(None);
        };
        let tour_type = self.db.fetch_tour_type_by_name(&name).await?;
        if tour_type.is_none() {
            self.audit(UnmappedNameKind::TourTypeName, &name).await;
        }
        Ok(tour_type)
    }

    async fn audit(&self, kind: UnmappedNameKind, name: &str) {
        if let Err(e) = self.db.record_unmapped_name(kind, name).await {
            error!("🧭️ Could not record unmapped {kind} '{name}'. {e}");
        }
    }
}
