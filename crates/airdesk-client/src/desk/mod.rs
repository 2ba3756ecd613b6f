/*
[INPUT]:  TaskHook plus typed booking-desk requests
[OUTPUT]: Typed flight, company, booking, payment and user operations
[POS]:    Service layer - domain calls routed through the task service
[UPDATE]: When backend routes or payload shapes change
*/

pub mod bookings;
pub mod flights;
pub mod users;

pub use bookings::{BookingLedger, parse_price};
pub use flights::validate_flight_draft;
pub use users::validate_registration;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;

use crate::http::{Result, TaskClient, TaskError};
use crate::task::{TaskBackend, TaskHook};
use crate::types::{HttpMethod, scalar_text};

pub const FLIGHT_SERVICE: &str = "flight";
pub const USER_SERVICE: &str = "user";
pub const PAYMENT_SERVICE: &str = "payment";

/// Booking-desk operations over one shared [`TaskHook`].
///
/// Every call goes through the hook, so its `loading`/`error` state reflects
/// the most recent operation.
pub struct BookingDesk<B: TaskBackend + ?Sized = TaskClient> {
    hook: TaskHook<B>,
}

impl<B: TaskBackend + ?Sized> Clone for BookingDesk<B> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.clone(),
        }
    }
}

impl<B: TaskBackend + ?Sized> BookingDesk<B> {
    pub fn new(hook: TaskHook<B>) -> Self {
        Self { hook }
    }

    pub fn hook(&self) -> &TaskHook<B> {
        &self.hook
    }

    async fn call_value<P: Serialize>(
        &self,
        service: &str,
        route: &str,
        params: &P,
        method: HttpMethod,
    ) -> Result<Value> {
        let params = serde_json::to_value(params)?;
        self.hook.execute(service, route, params, method).await
    }

    /// Decoding happens inside the hook, so a payload of the wrong shape
    /// leaves the hook failed rather than succeeded.
    async fn call<T: DeserializeOwned, P: Serialize>(
        &self,
        service: &str,
        route: &str,
        params: &P,
        method: HttpMethod,
    ) -> Result<T> {
        let params = serde_json::to_value(params)?;
        self.hook.execute_as(service, route, params, method).await
    }

    /// List endpoints: anything other than a JSON array counts as empty
    async fn call_list<T: DeserializeOwned, P: Serialize>(
        &self,
        service: &str,
        route: &str,
        params: &P,
    ) -> Result<Vec<T>> {
        let params = serde_json::to_value(params)?;
        self.hook
            .execute_with(service, route, params, HttpMethod::Get, |value| match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| T::deserialize(item).map_err(TaskError::from))
                    .collect(),
                _ => Ok(Vec::new()),
            })
            .await
    }
}

/// Path segment for an id that may be a string or a number
pub(crate) fn id_segment(id: &Value, what: &str) -> Result<String> {
    scalar_text(id).ok_or_else(|| TaskError::Validation(format!("{what} has no id")))
}

pub(crate) fn empty_params() -> Value {
    Value::Object(Default::default())
}
