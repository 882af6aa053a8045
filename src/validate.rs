// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Identity validation predicates.
//!
//! Pure functions, invoked before any persistence. Each check returns the
//! first violated rule as a 400-class [`ApiError`] naming the field.

use chrono::{NaiveDate, Utc};

use crate::error::ApiError;
use crate::models::{Address, RegisterNomineeRequest, RegisterUserRequest};

/// Exactly 12 decimal digits.
pub fn is_valid_aadhar(value: &str) -> bool {
    value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 10 digits, first digit in 6..=9 (regional mobile pattern).
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == 10
        && value.bytes().all(|b| b.is_ascii_digit())
        && matches!(value.as_bytes()[0], b'6'..=b'9')
}

/// Exactly 6 decimal digits.
pub fn is_valid_pincode(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Minimum 6 characters. Confirmation equality is a client concern; the
/// server only stores the primary value.
pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= 6
}

/// Date of birth must precede the current date.
pub fn is_valid_date_of_birth(value: NaiveDate) -> bool {
    value < Utc::now().date_naive()
}

fn require(value: &str, message: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(message));
    }
    Ok(())
}

fn validate_address(address: &Address) -> Result<(), ApiError> {
    if address.street.trim().is_empty()
        || address.city.trim().is_empty()
        || address.state.trim().is_empty()
        || address.pincode.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            "Complete address information is required",
        ));
    }
    if !is_valid_pincode(&address.pincode) {
        return Err(ApiError::bad_request("Pincode must be exactly 6 digits"));
    }
    Ok(())
}

fn validate_identity(
    name: &str,
    email: &str,
    password: &str,
    address: &Address,
    aadhar_number: &str,
    phone_number: &str,
    date_of_birth: NaiveDate,
) -> Result<(), ApiError> {
    require(name, "All fields are required")?;
    require(email, "All fields are required")?;
    require(password, "All fields are required")?;
    validate_address(address)?;
    if !is_valid_aadhar(aadhar_number) {
        return Err(ApiError::bad_request(
            "Aadhar number must be exactly 12 digits",
        ));
    }
    if !is_valid_phone(phone_number) {
        return Err(ApiError::bad_request(
            "Phone number must be a valid 10-digit mobile number",
        ));
    }
    if !is_valid_password(password) {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    if !is_valid_date_of_birth(date_of_birth) {
        return Err(ApiError::bad_request("Date of birth must be in the past"));
    }
    Ok(())
}

/// Validate a principal registration payload.
pub fn validate_user_registration(request: &RegisterUserRequest) -> Result<(), ApiError> {
    validate_identity(
        &request.name,
        &request.email,
        &request.password,
        &request.address,
        &request.aadhar_number,
        &request.phone_number,
        request.date_of_birth,
    )
}

/// Validate a nominee registration payload.
pub fn validate_nominee_registration(request: &RegisterNomineeRequest) -> Result<(), ApiError> {
    validate_identity(
        &request.name,
        &request.email,
        &request.password,
        &request.address,
        &request.aadhar_number,
        &request.phone_number,
        request.date_of_birth,
    )?;
    if !is_valid_aadhar(&request.user_aadhar_number) {
        return Err(ApiError::bad_request(
            "Aadhar number must be exactly 12 digits",
        ));
    }
    Ok(())
}
