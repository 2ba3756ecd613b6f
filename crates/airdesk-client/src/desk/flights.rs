/*
[INPUT]:  Flight queries, flight/company drafts from admin forms
[OUTPUT]: Flight and company lists; created/updated records
[POS]:    Service layer - flight catalog and airline company management
[UPDATE]: When catalog routes or validation rules change
*/

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use super::{BookingDesk, FLIGHT_SERVICE, empty_params};
use crate::http::{Result, TaskError};
use crate::task::TaskBackend;
use crate::types::{Company, CompanyDraft, Flight, FlightDraft, FlightQuery, HttpMethod};

impl<B: TaskBackend + ?Sized> BookingDesk<B> {
    /// GET api/flights with optional origin/destination filters
    pub async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Flight>> {
        self.call_list(FLIGHT_SERVICE, "api/flights", query).await
    }

    /// POST api/flights
    pub async fn create_flight(&self, draft: &FlightDraft) -> Result<Value> {
        validate_flight_draft(draft)?;
        self.call_value(FLIGHT_SERVICE, "api/flights", draft, HttpMethod::Post)
            .await
    }

    /// PUT api/flights/{id}
    pub async fn update_flight(&self, id: &str, draft: &FlightDraft) -> Result<Value> {
        validate_flight_draft(draft)?;
        let route = format!("api/flights/{id}");
        self.call_value(FLIGHT_SERVICE, &route, draft, HttpMethod::Put)
            .await
    }

    /// DELETE api/flights/{id}
    pub async fn delete_flight(&self, id: &str) -> Result<Value> {
        let route = format!("api/flights/{id}");
        self.call_value(FLIGHT_SERVICE, &route, &empty_params(), HttpMethod::Delete)
            .await
    }

    /// GET api/companies
    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        self.call_list(FLIGHT_SERVICE, "api/companies", &empty_params())
            .await
    }

    /// POST api/companies
    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Value> {
        self.call_value(FLIGHT_SERVICE, "api/companies", draft, HttpMethod::Post)
            .await
    }

    /// PUT api/companies/{company_id}
    pub async fn update_company(&self, company_id: &str, draft: &CompanyDraft) -> Result<Value> {
        let route = format!("api/companies/{company_id}");
        self.call_value(FLIGHT_SERVICE, &route, draft, HttpMethod::Put)
            .await
    }

    /// DELETE api/companies/{company_id}
    pub async fn delete_company(&self, company_id: &str) -> Result<Value> {
        let route = format!("api/companies/{company_id}");
        self.call_value(FLIGHT_SERVICE, &route, &empty_params(), HttpMethod::Delete)
            .await
    }
}

/// Reject drafts the flight service would refuse anyway
pub fn validate_flight_draft(draft: &FlightDraft) -> Result<()> {
    if !is_flight_number(&draft.flight_id) {
        return Err(TaskError::Validation(
            "Flight ID must be in format F1234567 (F followed by 7 digits)".to_string(),
        ));
    }

    for time in [&draft.departure_time, &draft.arrival_time] {
        if !has_shape(time, "dd:dd") || NaiveTime::parse_from_str(time, "%H:%M").is_err() {
            return Err(TaskError::Validation(
                "Time must be in format HH:MM (e.g., 14:30)".to_string(),
            ));
        }
    }

    for date in [&draft.departure_date, &draft.arrival_date] {
        if !has_shape(date, "dd/dd/dddd") || NaiveDate::parse_from_str(date, "%d/%m/%Y").is_err()
        {
            return Err(TaskError::Validation(
                "Date must be in format DD/MM/YYYY (e.g., 25/12/2024)".to_string(),
            ));
        }
    }

    Ok(())
}

fn is_flight_number(id: &str) -> bool {
    id.len() == 8 && id.starts_with('F') && id[1..].bytes().all(|b| b.is_ascii_digit())
}

/// `d` matches one ASCII digit, anything else matches itself
fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'd' => v.is_ascii_digit(),
            other => v == other,
        })
}
