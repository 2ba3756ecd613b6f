/*
[INPUT]:  Registration forms, role changes
[OUTPUT]: User lists and user-service acknowledgements
[POS]:    Service layer - account registration and role administration
[UPDATE]: When user routes or registration rules change
*/

use serde_json::Value;

use super::{BookingDesk, USER_SERVICE, empty_params};
use crate::http::{Result, TaskError};
use crate::task::TaskBackend;
use crate::types::{HttpMethod, RoleUpdate, User, UserRegistration, UserRole};

const DEFAULT_AGE: u32 = 18;
const PHONE_DIGITS: usize = 10;

impl<B: TaskBackend + ?Sized> BookingDesk<B> {
    /// POST api/users
    pub async fn register_user(&self, registration: &UserRegistration) -> Result<Value> {
        validate_registration(registration)?;
        let body = UserRegistration {
            age: Some(registration.age.unwrap_or(DEFAULT_AGE)),
            ..registration.clone()
        };
        self.call_value(USER_SERVICE, "api/users", &body, HttpMethod::Post)
            .await
    }

    /// GET api/users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.call_list(USER_SERVICE, "api/users", &empty_params())
            .await
    }

    /// PATCH api/users/{username}/role
    pub async fn update_user_role(&self, username: &str, role: UserRole) -> Result<Value> {
        if username.is_empty() {
            return Err(TaskError::Validation("username must not be empty".to_string()));
        }
        let route = format!("api/users/{username}/role");
        self.call_value(USER_SERVICE, &route, &RoleUpdate { role }, HttpMethod::Patch)
            .await
    }
}

pub fn validate_registration(registration: &UserRegistration) -> Result<()> {
    let number = &registration.number;
    if number.len() != PHONE_DIGITS || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TaskError::Validation(
            "Phone number must be exactly 10 digits".to_string(),
        ));
    }
    Ok(())
}
