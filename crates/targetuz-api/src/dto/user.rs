//! User DTOs
//!
//! Registration only mirrors identity already validated upstream; the
//! platform never handles credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use targetuz_types::Role;

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let name_len = self.name.chars().count();
        if !(2..=80).contains(&name_len) {
            return Err(ApiError::bad_request("Name must be 2-80 characters"));
        }
        if !self.email.contains('@') || self.email.chars().count() > 254 {
            return Err(ApiError::bad_request("Email address is not valid"));
        }
        // the administrator account is provisioned by the platform itself
        if self.role == Role::Admin {
            return Err(ApiError::bad_request("Choose a client or specialist role"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_bounds() {
        let good = RegisterUserRequest {
            name: "Aziza Karimova".to_string(),
            email: "aziza@example.uz".to_string(),
            role: Role::Specialist,
        };
        assert!(good.validate().is_ok());

        let mut bad_email = good.clone();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut admin = good.clone();
        admin.role = Role::Admin;
        assert!(admin.validate().is_err());

        let mut short_name = good;
        short_name.name = "A".to_string();
        assert!(short_name.validate().is_err());
    }
}
