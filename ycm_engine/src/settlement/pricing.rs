//! Point pricing.
//!
//! The base price for a booking is looked up for the exact (yacht, tour type) pair, and the yacht's discount
//! percentage is then applied. There is no default price: a booking whose tour type could not be resolved has no
//! price.
use crate::{
    db_types::{Points, TourType, Yacht},
    traits::{ReferenceData, ReferenceDataError},
};

/// Applies a percentage discount to a base point cost.
///
/// The discount is clamped to `0..=100`, so a negative discount never increases the cost and a discount over 100%
/// results in a free booking. Fractional points are rounded down. A negative base cost is treated as zero.
pub fn final_cost(base: Points, discount_percent: i64) -> Points {
    let discount = discount_percent.clamp(0, 100);
    let base = base.floor_at_zero().value() as i128;
    let cost = base * (100 - discount as i128) / 100;
    Points::from(cost as i64)
}

/// Looks up the base cost for the yacht and tour type and applies the yacht discount.
///
/// Returns `None` when the tour type is unknown or there is no pricing row for the combination.
pub async fn price_booking<B: ReferenceData>(
    db: &B,
    yacht: &Yacht,
    tour_type: Option<&TourType>,
) -> Result<Option<Points>, ReferenceDataError> {
    let Some(tour_type) = tour_type else {
        return Ok(None);
    };
    let base = db.fetch_point_cost(yacht.id, tour_type.id).await?;
    Ok(base.map(|b| final_cost(b, yacht.discount)))
}
