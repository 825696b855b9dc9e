//! Response helpers.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use classifieds_core::forms::FormErrors;
use serde::Serialize;

/// `302 Found` redirect to `location`.
#[must_use]
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `200 OK` with an empty body, for callers that ignore the content.
#[must_use]
pub fn empty_ok() -> Response {
    StatusCode::OK.into_response()
}

/// A form as shown to the user: submitted values and their errors.
#[derive(Debug, Serialize)]
pub struct FormView<T: Serialize> {
    pub fields: T,
    pub errors: FormErrors,
}

impl<T: Serialize> FormView<T> {
    /// A form without errors.
    pub fn new(fields: T) -> Self {
        Self {
            fields,
            errors: FormErrors::new(),
        }
    }

    /// A form re-shown after failed validation.
    pub const fn invalid(fields: T, errors: FormErrors) -> Self {
        Self { fields, errors }
    }
}
