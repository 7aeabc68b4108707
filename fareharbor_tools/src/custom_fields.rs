use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{helpers::is_filled, CustomFieldValue};

/// The custom field titles configured on the FareHarbor listings.
///
/// These are matched byte-for-byte against `custom_field_values[].name`, so any edit to a question title in the
/// FareHarbor dashboard must be mirrored here (or in the `[custom_fields]` table of the name mappings file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldNames {
    pub pickup_location: String,
    pub add_ons: String,
    pub adult_beverages: String,
    pub catering: String,
    pub tubing: String,
    pub party_size: String,
    pub kids_under_six: String,
    pub e_foil: String,
    pub sea_bob: String,
}

impl Default for CustomFieldNames {
    fn default() -> Self {
        Self {
            pickup_location: "Pick Up Locations - KYC".into(),
            add_ons: "Add ons".into(),
            adult_beverages: "Adult Beverages".into(),
            catering: "Catering Option?".into(),
            tubing: "Tubing".into(),
            party_size: "How many people are in your party? (no pricing)".into(),
            kids_under_six: "How many kids in your party are under 6?".into(),
            e_foil: "E-foil".into(),
            sea_bob: "Sea Bob".into(),
        }
    }
}

impl CustomFieldValue {
    /// The display value if it is filled in, otherwise the raw value if that is filled in.
    pub fn effective_value(&self) -> Option<&Value> {
        self.display_value.as_ref().filter(|v| is_filled(v)).or_else(|| self.value.as_ref().filter(|v| is_filled(v)))
    }
}

/// Finds the custom field with exactly the given name and returns its effective value.
pub fn find_custom_field<'a>(fields: &'a [CustomFieldValue], name: &str) -> Option<&'a Value> {
    fields.iter().find(|f| f.name == name).and_then(CustomFieldValue::effective_value)
}

/// Like [`find_custom_field`], but renders the value as text, or returns `default` when the field is absent or empty.
pub fn custom_field_text(fields: &[CustomFieldValue], name: &str, default: &str) -> String {
    match find_custom_field(fields, name) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(v) => v.to_string(),
        None => default.to_string(),
    }
}
