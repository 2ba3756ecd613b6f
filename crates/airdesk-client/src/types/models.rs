/*
[INPUT]:  Payloads returned by the flight, user and payment services
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{BookingStatus, UserRole};

// Backends disagree on whether ids and prices are numbers or strings, so those
// fields stay as raw JSON and are rendered through `scalar_text`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_date: String,
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub company_id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy_seats: Option<u32>,
}

impl Flight {
    /// Public flight number, falling back to the storage id
    pub fn reference(&self) -> Option<String> {
        self.flight_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.id.as_ref().and_then(scalar_text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub company_id: Value,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub user_id: Value,
    pub flight_id: String,
    #[serde(default)]
    pub flight_name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_date: String,
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub company_id: Value,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl Booking {
    /// Key used to identify a booking on the client: `"{user_id}-{flight_id}"`
    pub fn key(&self) -> String {
        format!(
            "{}-{}",
            scalar_text(&self.user_id).unwrap_or_default(),
            self.flight_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: Value,
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// `Null` when the payment service does not report one
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Render a JSON string or number as plain text; other shapes yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_key_accepts_numeric_user_id() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 7,
            "user_id": 42,
            "flight_id": "F1234567",
            "status": "pending"
        }))
        .expect("booking");
        assert_eq!(booking.key(), "42-F1234567");
    }

    #[test]
    fn test_flight_reference_prefers_flight_id() {
        let flight: Flight = serde_json::from_value(json!({
            "id": 3,
            "flight_id": "F0000001",
            "name": "Morning hop"
        }))
        .expect("flight");
        assert_eq!(flight.reference().as_deref(), Some("F0000001"));

        let flight: Flight = serde_json::from_value(json!({"id": 3})).expect("flight");
        assert_eq!(flight.reference().as_deref(), Some("3"));
    }

    #[test]
    fn test_cancelled_accepts_american_spelling() {
        let status: BookingStatus = serde_json::from_str("\"canceled\"").expect("status");
        assert_eq!(status, BookingStatus::Cancelled);
    }
}
