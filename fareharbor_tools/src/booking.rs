use log::debug;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::FareharborError;

/// The body of a FareHarbor booking webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub booking: Option<FareharborBooking>,
}

impl WebhookEnvelope {
    /// Parses a raw webhook body and returns the booking it carries.
    ///
    /// Malformed JSON and a missing `booking` object are both errors.
    pub fn parse_booking(body: &[u8]) -> Result<FareharborBooking, FareharborError> {
        let envelope = serde_json::from_slice::<WebhookEnvelope>(body).map_err(|e| {
            debug!("🎣️ Could not deserialize webhook body. {e}");
            FareharborError::from(e)
        })?;
        envelope.booking.ok_or_else(|| {
            debug!("🎣️ Webhook body did not contain a booking object");
            FareharborError::MissingBooking
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareharborBooking {
    /// FareHarbor's primary key for the booking. It is numeric in practice, but is kept as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub contact: BookingContact,
    pub availability: Availability,
    #[serde(default)]
    pub custom_field_values: Vec<CustomFieldValue>,
    #[serde(default)]
    pub invoice_price_display: Option<Value>,
    #[serde(default)]
    pub amount_paid_display: Option<Value>,
    #[serde(default)]
    pub receipt_subtotal_display: Option<Value>,
    #[serde(default)]
    pub receipt_taxes_display: Option<Value>,
    #[serde(default)]
    pub receipt_total_display: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl BookingContact {
    /// The contact email, trimmed, or `None` if it is absent or blank.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub item: ListingItem,
    #[serde(default)]
    pub headline: Option<String>,
    pub start_at: String,
    pub end_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingItem {
    #[serde(default)]
    pub pk: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub name: String,
    #[serde(default)]
    pub display_value: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a string or number, got {other}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_wanderlust_booking() {
        let json = include_str!("./test_assets/booking_wanderlust.json");
        let booking = WebhookEnvelope::parse_booking(json.as_bytes()).unwrap();
        assert_eq!(booking.pk, "221843110");
        assert_eq!(booking.availability.item.name, "KYC - Wanderlust");
        assert_eq!(booking.availability.headline.as_deref(), Some("Full Day"));
        assert_eq!(booking.contact.email(), Some("jane.member@example.com"));
        assert_eq!(booking.custom_field_values.len(), 7);
        assert_eq!(booking.receipt_total_display, Some(Value::String("$1,250.00".into())));
    }

    #[test]
    fn string_primary_keys_are_accepted() {
        let json = r#"{"booking": {"pk": " 42 ", "availability": {"item": {"name": "X"}, "start_at": "a", "end_at": "b"}}}"#;
        let booking = WebhookEnvelope::parse_booking(json.as_bytes()).unwrap();
        assert_eq!(booking.pk, "42");
        assert!(booking.contact.email().is_none());
        assert!(booking.custom_field_values.is_empty());
    }

    #[test]
    fn missing_booking_is_an_error() {
        let err = WebhookEnvelope::parse_booking(br#"{"event": "ping"}"#).unwrap_err();
        assert!(matches!(err, FareharborError::MissingBooking));
        let err = WebhookEnvelope::parse_booking(b"{not json").unwrap_err();
        assert!(matches!(err, FareharborError::JsonError(_)));
        let err = WebhookEnvelope::parse_booking(br#"{"booking": {"pk": null}}"#).unwrap_err();
        assert!(matches!(err, FareharborError::JsonError(_)));
    }

    #[test]
    fn blank_contact_email_is_treated_as_missing() {
        let contact = BookingContact { email: Some("   ".into()), ..Default::default() };
        assert!(contact.email().is_none());
    }
}
