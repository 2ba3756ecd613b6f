/*
[INPUT]:  Flights, existing bookings, user identity
[OUTPUT]: Created/cancelled/paid bookings and status partitions
[POS]:    Service layer - booking lifecycle (pending -> paid | cancelled)
[UPDATE]: When booking routes, payment payloads or duplicate rules change
*/

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use std::str::FromStr;
use tracing::info;

use super::{BookingDesk, FLIGHT_SERVICE, PAYMENT_SERVICE, id_segment};
use crate::http::{Result, TaskError};
use crate::task::TaskBackend;
use crate::types::{Booking, BookingStatus, Flight, HttpMethod, Payment, PaymentRequest, scalar_text};

const PAYMENT_CURRENCY: &str = "EUR";
const PAYMENT_PROVIDER: &str = "internal";

#[derive(Debug, Serialize)]
struct NewBooking<'a> {
    user_id: &'a Value,
    flight_id: String,
    flight_name: &'a str,
    origin: &'a str,
    destination: &'a str,
    departure_time: &'a str,
    arrival_time: &'a str,
    departure_date: &'a str,
    arrival_date: &'a str,
    price: &'a Value,
    company_id: &'a Value,
    status: BookingStatus,
}

impl<B: TaskBackend + ?Sized> BookingDesk<B> {
    /// POST api/bookings, refusing a second active booking of the same flight
    pub async fn book_flight(
        &self,
        user_id: &Value,
        flight: &Flight,
        existing: &[Booking],
    ) -> Result<Booking> {
        let flight_id = flight
            .reference()
            .ok_or_else(|| TaskError::Validation("flight has no id".to_string()))?;

        let duplicate = existing.iter().any(|booking| {
            booking.flight_id == flight_id
                && matches!(booking.status, BookingStatus::Pending | BookingStatus::Paid)
        });
        if duplicate {
            return Err(TaskError::Validation(
                "This flight is already in your bookings".to_string(),
            ));
        }

        let body = NewBooking {
            user_id,
            flight_id,
            flight_name: &flight.name,
            origin: &flight.origin,
            destination: &flight.destination,
            departure_time: &flight.departure_time,
            arrival_time: &flight.arrival_time,
            departure_date: &flight.departure_date,
            arrival_date: &flight.arrival_date,
            price: &flight.price,
            company_id: &flight.company_id,
            status: BookingStatus::Pending,
        };
        self.call(FLIGHT_SERVICE, "api/bookings", &body, HttpMethod::Post)
            .await
    }

    /// PUT api/bookings/{id} with `{status: "cancelled"}`
    pub async fn cancel_booking(&self, booking: &Booking) -> Result<Booking> {
        let route = format!("api/bookings/{}", id_segment(&booking.id, "booking")?);
        self.call_value(
            FLIGHT_SERVICE,
            &route,
            &json!({"status": BookingStatus::Cancelled}),
            HttpMethod::Put,
        )
        .await?;

        Ok(Booking {
            status: BookingStatus::Cancelled,
            ..booking.clone()
        })
    }

    /// Create a payment for the booking, then mark the booking paid
    pub async fn pay_booking(&self, user_id: &Value, booking: &Booking) -> Result<Booking> {
        let route = format!("api/bookings/{}", id_segment(&booking.id, "booking")?);
        let amount = parse_price(&booking.price)?;

        let request = PaymentRequest {
            amount,
            currency: PAYMENT_CURRENCY.to_string(),
            description: format!(
                "Payment for flight {} ({}) from {} to {}",
                booking.flight_name, booking.flight_id, booking.origin, booking.destination
            ),
            order_id: booking.flight_id.clone(),
            provider: PAYMENT_PROVIDER.to_string(),
            user_id: user_id.clone(),
        };
        let payment: Payment = self
            .call(PAYMENT_SERVICE, "payments", &request, HttpMethod::Post)
            .await?;

        let paid_at = Utc::now().to_rfc3339();
        let payment_id = (!payment.id.is_null()).then_some(payment.id);
        let mut update = json!({
            "status": BookingStatus::Paid,
            "paid_at": paid_at,
        });
        if let Some(id) = &payment_id {
            update["payment_id"] = id.clone();
        }
        self.call_value(FLIGHT_SERVICE, &route, &update, HttpMethod::Put)
            .await?;

        info!(booking = %route, amount = %amount, "booking paid");
        Ok(Booking {
            status: BookingStatus::Paid,
            payment_id,
            paid_at: Some(paid_at),
            ..booking.clone()
        })
    }
}

/// Parse a displayed price such as `"€120.50"` or `89` into a positive amount
pub fn parse_price(price: &Value) -> Result<Decimal> {
    let invalid = || TaskError::Validation("Invalid flight price".to_string());

    let text = scalar_text(price).ok_or_else(invalid)?;
    let cleaned = text.replace('€', "");
    let amount = Decimal::from_str(cleaned.trim()).map_err(|_| invalid())?;
    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

/// Bookings partitioned by status, in their original order.
///
/// Bookings with an unrecognised status are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingLedger {
    pub pending: Vec<Booking>,
    pub paid: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

impl BookingLedger {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut ledger = Self::default();
        for booking in bookings {
            if let Some(bucket) = ledger.bucket(booking.status) {
                bucket.push(booking.clone());
            }
        }
        ledger
    }

    fn bucket(&mut self, status: BookingStatus) -> Option<&mut Vec<Booking>> {
        match status {
            BookingStatus::Pending => Some(&mut self.pending),
            BookingStatus::Paid => Some(&mut self.paid),
            BookingStatus::Cancelled => Some(&mut self.cancelled),
            BookingStatus::Unknown => None,
        }
    }

    pub fn find(&self, key: &str) -> Option<&Booking> {
        self.pending
            .iter()
            .chain(&self.paid)
            .chain(&self.cancelled)
            .find(|booking| booking.key() == key)
    }

    /// Replace the booking with the same key, wherever it now belongs
    pub fn apply(&mut self, updated: Booking) {
        let key = updated.key();
        for bucket in [&mut self.pending, &mut self.paid, &mut self.cancelled] {
            bucket.retain(|booking| booking.key() != key);
        }
        if let Some(bucket) = self.bucket(updated.status) {
            bucket.push(updated);
        }
    }
}
