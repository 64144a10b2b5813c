//! V1 API handlers.

mod categories;
mod system;
mod tasks;
mod users;

#[cfg(test)]
mod system_test;

pub use categories::*;
pub use system::*;
pub use tasks::*;
pub use users::*;

use axum::http::{HeaderName, StatusCode, header};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// Status, `Location` header, and body of a successful create.
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], T);

pub fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(header::LOCATION, location)], body)
}

/// `?userId=` filter shared by the task and category listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserIdQuery {
    /// Owning user
    #[serde(rename = "userId")]
    #[param(example = "6f1c1c2e-4b7e-4a8e-9d8e-2f1f5b0c9a11")]
    pub user_id: Option<String>,
}

impl UserIdQuery {
    pub(crate) fn require(self) -> AppResult<String> {
        non_empty(self.user_id).ok_or_else(|| {
            AppError::bad_request("User ID parameter is required").with_details("userId")
        })
    }
}

/// Reject blank required body fields.
pub(crate) fn required(field: &'static str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")).with_details(field));
    }
    Ok(())
}

/// Parse an enum carried as a string, reporting the bad value.
pub(crate) fn parse_field<T>(field: &'static str, value: &str) -> AppResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| AppError::bad_request(e).with_details(field))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
