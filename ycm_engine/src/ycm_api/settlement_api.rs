use std::{fmt::Debug, sync::Arc};

use chrono::Utc;
use log::*;

use crate::{
    db_types::{
        Booking,
        CharterBooking,
        Member,
        PointAdjustment,
        Points,
        TourType,
        UnmappedName,
        VendorBookingId,
        Yacht,
        YachtOwner,
    },
    events::{BookingSettledEvent, CharterBookingEvent, EventProducers, LowBalanceEvent},
    settlement::{
        idempotency::already_recorded,
        normalizer::{normalize_booking, normalize_charter_booking},
        pricing::price_booking,
        resolver::IdentifierResolver,
        BookingRequest,
        BookingSource,
        NameMappings,
        StageOutcome,
    },
    traits::{BookingDatabase, ReferenceDataError},
    ycm_api::errors::SettlementError,
};

/// The result of settling a club booking.
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    pub booking: Booking,
    /// The member the booking was attributed to, with their post-booking balance
    pub member: Option<Member>,
    pub ledger_entry: Option<PointAdjustment>,
    pub yacht: Yacht,
    pub tour_type: Option<TourType>,
    /// True if the point cost was at least the member's balance before the booking
    pub low_balance: bool,
}

#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    Settled(Box<SettlementReceipt>),
    CharterRecorded(CharterBooking),
}

/// `SettlementApi` turns incoming vendor bookings into booking records and point deductions.
///
/// Every call to [`SettlementApi::settle`] is a single pass through these stages:
///
/// 1. The listing is classified as a club or a charter booking.
/// 2. Bookings that have already been recorded are rejected.
/// 3. Club bookings resolve the member (by contact email), the yacht, and the tour type, and are priced.
/// 4. The booking row, the point debit and the ledger entry are written in one transaction.
/// 5. Subscribers are notified.
///
/// Any failure before step 4 leaves the database untouched. Notification failures never affect the outcome.
pub struct SettlementApi<B> {
    db: B,
    mappings: Arc<NameMappings>,
    producers: EventProducers,
}

impl<B> Debug for SettlementApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi (mappings {})", self.mappings.version)
    }
}

impl<B> SettlementApi<B> {
    pub fn new(db: B, mappings: Arc<NameMappings>, producers: EventProducers) -> Self {
        Self { db, mappings, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn mappings(&self) -> &NameMappings {
        &self.mappings
    }
}

impl<B> SettlementApi<B>
where B: BookingDatabase
{
    pub async fn settle(&self, request: BookingRequest) -> Result<SettlementOutcome, SettlementError> {
        let id = &request.vendor_booking_id;
        let source = BookingSource::classify(&self.mappings, &request.listing_name);
        debug!("⚓️ Booking [{id}] for '{}' classified as {source:?}", request.listing_name);
        self.check_not_recorded(&source, id).await.proceed("duplicate check")?;
        match source {
            BookingSource::Charter { yacht_name } => self.record_charter_booking(&request, &yacht_name).await,
            BookingSource::Club => self.settle_club_booking(&request).await,
        }
    }

    /// The vendor names that could not be mapped, most recently seen first.
    pub async fn unmapped_names(&self) -> Result<Vec<UnmappedName>, ReferenceDataError> {
        self.db.fetch_unmapped_names().await
    }

    async fn settle_club_booking(&self, request: &BookingRequest) -> Result<SettlementOutcome, SettlementError> {
        let member = self.resolve_member(request).await.proceed("member resolution")?;
        let yacht = self.resolve_yacht(request).await.proceed("yacht resolution")?;
        let tour_type = self.resolve_tour_type(request).await.proceed("tour type resolution")?;
        let point_cost = self.price(&yacht, tour_type.as_ref()).await.proceed("pricing")?;
        let low_balance = member.as_ref().map(|m| point_cost >= m.points).unwrap_or(false);
        if low_balance {
            info!("⚓️ Booking [{}] costs {point_cost}, which will exhaust the member's balance", request.vendor_booking_id);
        }

        let new_booking = normalize_booking(
            request,
            member.as_ref().map(|m| m.id),
            &yacht,
            tour_type.as_ref(),
            point_cost,
            Utc::now(),
        );
        let settled = self.db.settle_booking(new_booking).await.map_err(|e| {
            error!("⚓️ Booking [{}] could not be saved. {e}", request.vendor_booking_id);
            SettlementError::from(e)
        })?;
        info!(
            "⚓️ Booking [{}] settled: {} on {} for {point_cost}",
            settled.booking.vendor_booking_id,
            settled.booking.tour_type,
            yacht.name
        );

        if low_balance {
            if let Some(m) = &member {
                self.producers.publish_low_balance(LowBalanceEvent::new(m.clone(), point_cost)).await;
            }
        }
        let owners = self.owners_for(Some(&yacht)).await;
        let event = BookingSettledEvent::new(settled.booking.clone(), settled.member.clone(), yacht.clone(), owners);
        self.producers.publish_booking_settled(event).await;

        let receipt = SettlementReceipt {
            booking: settled.booking,
            member: settled.member,
            ledger_entry: settled.ledger_entry,
            yacht,
            tour_type,
            low_balance,
        };
        Ok(SettlementOutcome::Settled(Box::new(receipt)))
    }

    async fn record_charter_booking(
        &self,
        request: &BookingRequest,
        yacht_name: &str,
    ) -> Result<SettlementOutcome, SettlementError> {
        let charter = normalize_charter_booking(request, yacht_name);
        let booking = StageOutcome::from(self.db.insert_charter_booking(charter).await).proceed("charter booking")?;
        info!("⚓️ Charter booking [{}] on {yacht_name} recorded", booking.vendor_booking_id);
        let yacht = match self.db.fetch_yacht_by_name(yacht_name).await {
            Ok(Some(y)) => Some(y),
            Ok(None) => {
                warn!("⚓️ Charter yacht {yacht_name} is not in the yachts table. No owners will be notified.");
                None
            },
            Err(e) => {
                error!("⚓️ Could not look up charter yacht {yacht_name}. No owners will be notified. {e}");
                None
            },
        };
        let owners = self.owners_for(yacht.as_ref()).await;
        self.producers.publish_charter_booking(CharterBookingEvent::new(booking.clone(), yacht, owners)).await;
        Ok(SettlementOutcome::CharterRecorded(booking))
    }

    async fn check_not_recorded(&self, source: &BookingSource, id: &VendorBookingId) -> StageOutcome<()> {
        match already_recorded(&self.db, source, id).await {
            Ok(false) => StageOutcome::Proceed(()),
            Ok(true) => StageOutcome::Fatal(SettlementError::DuplicateBooking(id.clone())),
            Err(e) => StageOutcome::Fatal(e.into()),
        }
    }

    async fn resolve_member(&self, request: &BookingRequest) -> StageOutcome<Option<Member>> {
        let Some(email) = request.contact_email() else {
            return StageOutcome::degraded(None, "The booking has no contact email. No points will be deducted.");
        };
        match self.db.fetch_member_by_email(email).await {
            Ok(Some(member)) => StageOutcome::Proceed(Some(member)),
            Ok(None) => StageOutcome::degraded(
                None,
                format!("{email} is not a registered member. The booking is recorded without a member."),
            ),
            Err(e) => StageOutcome::Fatal(e.into()),
        }
    }

    async fn resolve_yacht(&self, request: &BookingRequest) -> StageOutcome<Yacht> {
        let resolver = IdentifierResolver::new(&self.db, &self.mappings);
        match resolver.resolve_yacht(&request.listing_name).await {
            Ok(Some(yacht)) => StageOutcome::Proceed(yacht),
            Ok(None) => {
                let name = self.mappings.match_yacht(&request.listing_name).canonical_name().to_string();
                StageOutcome::Fatal(SettlementError::YachtNotFound(name))
            },
            Err(e) => StageOutcome::Fatal(e.into()),
        }
    }

    async fn resolve_tour_type(&self, request: &BookingRequest) -> StageOutcome<Option<TourType>> {
        let resolver = IdentifierResolver::new(&self.db, &self.mappings);
        match resolver.resolve_tour_type(&request.headline, &request.start_at).await {
            Ok(Some(tour_type)) => StageOutcome::Proceed(Some(tour_type)),
            Ok(None) => StageOutcome::degraded(
                None,
                format!("Tour '{}' is not recognised, so it cannot be priced.", request.headline.trim()),
            ),
            Err(e) => StageOutcome::Fatal(e.into()),
        }
    }

    async fn price(&self, yacht: &Yacht, tour_type: Option<&TourType>) -> StageOutcome<Points> {
        match price_booking(&self.db, yacht, tour_type).await {
            Ok(Some(cost)) => StageOutcome::Proceed(cost),
            Ok(None) => StageOutcome::Fatal(SettlementError::NoPriceFound {
                yacht: yacht.name.clone(),
                tour_type: tour_type.map(|t| t.name.clone()),
            }),
            Err(e) => StageOutcome::Fatal(e.into()),
        }
    }

    /// Owners are only needed for notifications, so a lookup failure is logged and treated as "no owners".
    async fn owners_for(&self, yacht: Option<&Yacht>) -> Vec<YachtOwner> {
        let Some(yacht) = yacht else {
            return Vec::new();
        };
        match self.db.fetch_owners_for_yacht(yacht.id).await {
            Ok(owners) => {
                if owners.is_empty() {
                    warn!("⚓️ {} has no registered owners", yacht.name);
                }
                owners
            },
            Err(e) => {
                error!("⚓️ Could not fetch the owners of {}. {e}", yacht.name);
                Vec::new()
            },
        }
    }
}
