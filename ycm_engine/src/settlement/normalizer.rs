//! Vendor-neutral booking requests, and their conversion into booking records.
//!
//! Integrations (e.g. the FareHarbor webhook) are responsible for turning their payloads into a [`BookingRequest`].
//! Everything downstream of that works only with this type.
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{
    BookingStatus,
    NewBooking,
    NewCharterBooking,
    Points,
    TourType,
    VendorBookingId,
    Yacht,
    YesNo,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Monetary amounts from the vendor receipt, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAmounts {
    pub invoice_price: i64,
    pub amount_paid: i64,
    pub receipt_subtotal: i64,
    pub receipt_taxes: i64,
    pub receipt_total: i64,
}

impl BookingAmounts {
    /// What is still owed on the receipt. Overpayment shows up as a negative amount. `None` if the difference does
    /// not fit in an `i64`.
    pub fn amount_due(&self) -> Option<i64> {
        self.receipt_total.checked_sub(self.amount_paid)
    }
}

/// Add-ons and logistics captured from the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingExtras {
    pub party_size: i64,
    pub kids_under_six: i64,
    pub e_foil_count: i64,
    pub sea_bob_count: i64,
    pub tubing: bool,
    pub catering: bool,
    pub adult_beverages: bool,
    pub pickup_point: String,
    pub other_add_ons: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub vendor_booking_id: VendorBookingId,
    pub vendor_uuid: Option<String>,
    pub dashboard_url: Option<String>,
    /// The vendor's listing title for the yacht, as received
    pub listing_name: String,
    /// Free text describing the tour, e.g. "Half Day Outing"
    pub headline: String,
    pub start_at: DateTime<FixedOffset>,
    pub end_at: DateTime<FixedOffset>,
    pub vendor_created_at: Option<DateTime<FixedOffset>>,
    pub contact: BookingContactDetails,
    pub amounts: BookingAmounts,
    pub extras: BookingExtras,
}

impl BookingRequest {
    /// The contact email, trimmed. Blank emails are treated as missing.
    pub fn contact_email(&self) -> Option<&str> {
        self.contact.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// The name the booking is filed under: the canonical tour type if it is known, otherwise the vendor headline.
    pub fn tour_label<'a>(&'a self, tour_type: Option<&'a TourType>) -> &'a str {
        tour_type.map(|t| t.name.as_str()).unwrap_or_else(|| self.headline.trim())
    }
}

/// Builds the booking row for a club booking.
///
/// The booking is attributed to `member_id` (if any), starts out as scheduled and carries the computed point cost.
/// `received_at` stands in for the vendor creation time when the vendor did not supply one.
pub fn normalize_booking(
    request: &BookingRequest,
    member_id: Option<i64>,
    yacht: &Yacht,
    tour_type: Option<&TourType>,
    points_cost: Points,
    received_at: DateTime<Utc>,
) -> NewBooking {
    let extras = &request.extras;
    let amounts = &request.amounts;
    NewBooking {
        vendor_booking_id: request.vendor_booking_id.clone(),
        vendor_uuid: request.vendor_uuid.clone(),
        dashboard_url: request.dashboard_url.clone(),
        member_id,
        yacht_id: yacht.id,
        tour_type_id: tour_type.map(|t| t.id),
        vessel_name: yacht.name.clone(),
        tour_type: request.tour_label(tour_type).to_string(),
        start_at: request.start_at.with_timezone(&Utc),
        end_at: request.end_at.with_timezone(&Utc),
        vendor_created_at: request.vendor_created_at.map(|t| t.with_timezone(&Utc)).unwrap_or(received_at),
        contact_name: request.contact.name.clone(),
        contact_email: request.contact_email().map(String::from),
        contact_phone: request.contact.phone.clone(),
        invoice_price: amounts.invoice_price,
        amount_paid: amounts.amount_paid,
        receipt_subtotal: amounts.receipt_subtotal,
        receipt_taxes: amounts.receipt_taxes,
        receipt_total: amounts.receipt_total,
        // Integrations reject receipts whose amount due is out of range before they get here
        amount_due: amounts.amount_due().unwrap_or_default(),
        booking_fee: 0,
        e_foil_count: extras.e_foil_count,
        sea_bob_count: extras.sea_bob_count,
        tubing: YesNo::from(extras.tubing),
        catering_option: YesNo::from(extras.catering),
        adult_beverages: YesNo::from(extras.adult_beverages),
        other_add_ons: extras.other_add_ons.clone(),
        other_cost: 0,
        other_cost_desc: String::new(),
        staff_gratuity: 0,
        number_of_adults: extras.party_size,
        number_of_kids: extras.kids_under_six,
        pickup_point: extras.pickup_point.clone(),
        points_cost,
        booking_status: BookingStatus::Scheduled,
        created_by: member_id,
    }
}

/// Builds the record for a booking on a charter yacht.
pub fn normalize_charter_booking(request: &BookingRequest, yacht_name: &str) -> NewCharterBooking {
    NewCharterBooking {
        vendor_booking_id: request.vendor_booking_id.clone(),
        yacht_name: yacht_name.to_string(),
        tour_type: request.headline.trim().to_string(),
        start_at: request.start_at.with_timezone(&Utc),
        end_at: request.end_at.with_timezone(&Utc),
        contact_name: request.contact.name.clone(),
        contact_email: request.contact_email().map(String::from),
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn request() -> BookingRequest {
        BookingRequest {
            vendor_booking_id: VendorBookingId::from("221843110"),
            vendor_uuid: Some("uuid-1".into()),
            dashboard_url: None,
            listing_name: "KYC - Wanderlust".into(),
            headline: " Full Day ".into(),
            start_at: DateTime::parse_from_rfc3339("2024-06-01T09:00:00-04:00").unwrap(),
            end_at: DateTime::parse_from_rfc3339("2024-06-01T17:00:00-04:00").unwrap(),
            vendor_created_at: None,
            contact: BookingContactDetails {
                name: Some("Jane Member".into()),
                email: Some(" jane.member@example.com ".into()),
                phone: None,
            },
            amounts: BookingAmounts {
                invoice_price: 125_000,
                amount_paid: 25_000,
                receipt_subtotal: 115_000,
                receipt_taxes: 10_000,
                receipt_total: 125_000,
            },
            extras: BookingExtras {
                party_size: 6,
                kids_under_six: 1,
                tubing: true,
                pickup_point: "Osprey".into(),
                ..Default::default()
            },
        }
    }

    fn wanderlust() -> Yacht {
        Yacht { id: 3, name: "Wanderlust".into(), discount: 10 }
    }

    #[test]
    fn normalizes_member_booking() {
        let received = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let tour = TourType { id: 2, name: "1 Full Day".into() };
        let b = normalize_booking(&request(), Some(7), &wanderlust(), Some(&tour), Points::from(90), received);
        assert_eq!(b.member_id, Some(7));
        assert_eq!(b.created_by, Some(7));
        assert_eq!(b.vessel_name, "Wanderlust");
        assert_eq!(b.tour_type, "1 Full Day");
        assert_eq!(b.tour_type_id, Some(2));
        assert_eq!(b.start_at, Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap());
        assert_eq!(b.vendor_created_at, received);
        assert_eq!(b.contact_email.as_deref(), Some("jane.member@example.com"));
        assert_eq!(b.amount_due, 100_000);
        assert_eq!(b.booking_status, BookingStatus::Scheduled);
        assert_eq!(b.tubing, YesNo::Yes);
        assert_eq!(b.catering_option, YesNo::No);
        assert_eq!(b.other_cost, 0);
        assert_eq!(b.other_cost_desc, "");
        assert_eq!(b.staff_gratuity, 0);
        assert_eq!(b.number_of_adults, 6);
        assert_eq!(b.number_of_kids, 1);
        assert_eq!(b.points_cost, Points::from(90));
    }

    #[test]
    fn unknown_tour_type_falls_back_to_headline() {
        let b = normalize_booking(&request(), None, &wanderlust(), None, Points::from(0), Utc::now());
        assert_eq!(b.tour_type, "Full Day");
        assert_eq!(b.tour_type_id, None);
        assert_eq!(b.created_by, None);
    }

    #[test]
    fn blank_email_is_missing() {
        let mut r = request();
        r.contact.email = Some("   ".into());
        assert_eq!(r.contact_email(), None);
        let c = normalize_charter_booking(&r, "Sea Breeze");
        assert_eq!(c.contact_email, None);
        assert_eq!(c.yacht_name, "Sea Breeze");
        assert_eq!(c.tour_type, "Full Day");
    }
}
