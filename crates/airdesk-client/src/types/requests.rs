/*
[INPUT]:  Logical operation requests from callers
[OUTPUT]: Serializable request bodies for the task service
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{HttpMethod, UserRole};

/// Body of `POST <base>/create-task`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub service: String,
    pub route: String,
    pub params: Value,
    pub method: HttpMethod,
}

impl TaskSubmission {
    pub fn new(
        service: impl Into<String>,
        route: impl Into<String>,
        params: Value,
        method: HttpMethod,
    ) -> Self {
        Self {
            service: service.into(),
            route: route.into(),
            params,
            method,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Admin form for creating or editing a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDraft {
    pub flight_id: String,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub price: String,
    pub company_id: i64,
    #[serde(default)]
    pub business_seats: u32,
    #[serde(default)]
    pub economy_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub code: String,
    pub name: String,
    pub country: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRegistration {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub number: String,
    #[serde(default)]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: rust_decimal::Decimal,
    pub currency: String,
    pub description: String,
    pub order_id: String,
    pub provider: String,
    pub user_id: Value,
}
