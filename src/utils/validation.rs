use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::candidate_dto::{CandidateListQuery, CandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{CandidateFilter, CandidateStatus, NewCandidate};

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z '-]+$").expect("name pattern compiles"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 +\-()]+$").expect("phone pattern compiles"));

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), ValidationErrors> {
    val.validate()
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn single_violation(field: &'static str, message: &'static str) -> Error {
    let mut errors = ValidationErrors::new();
    errors.add(field, violation("invalid", message));
    Error::Validation(errors)
}

pub fn validate_name_chars(name: &str) -> std::result::Result<(), ValidationError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(violation(
            "name_chars",
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        ))
    }
}

pub fn validate_email_format(email: &str) -> std::result::Result<(), ValidationError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(violation("email", "Please enter a valid email address"))
    }
}

pub fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        Err(violation("phone", "Please enter a valid phone number"))
    }
}

pub fn validate_status(status: &str) -> std::result::Result<(), ValidationError> {
    status
        .parse::<CandidateStatus>()
        .map(|_| ())
        .map_err(|_| violation("status", "Status must be one of Applied, Interviewing, Hired, Rejected"))
}

/// Parses an `:id` path segment. Only positive decimal integers are accepted.
pub fn parse_id(raw: &str) -> Result<i32> {
    let invalid = || single_violation("id", "ID must be a positive integer");
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

/// Normalizes and validates a create/update body, reporting every broken field
/// at once.
pub fn validate_payload(payload: CandidatePayload) -> Result<NewCandidate> {
    let payload = payload.normalized();
    let mut errors = validate(&payload).err().unwrap_or_else(ValidationErrors::new);
    for &(field, message) in &payload.malformed {
        // Replaces the "required" error left behind by the dropped value.
        errors.errors_mut().remove(field);
        errors.add(field, violation("type", message));
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let missing = |field: &'static str| single_violation(field, "Field is required");
    let status = match payload.status.as_deref() {
        Some(raw) => raw
            .parse()
            .map_err(|_| single_violation("status", "Status must be one of Applied, Interviewing, Hired, Rejected"))?,
        None => CandidateStatus::default(),
    };

    Ok(NewCandidate {
        name: payload.name.ok_or_else(|| missing("name"))?,
        age: payload.age.ok_or_else(|| missing("age"))?,
        email: payload.email.ok_or_else(|| missing("email"))?,
        phone: payload.phone,
        skills: payload.skills,
        experience: payload.experience,
        applied_position: payload.applied_position,
        status,
    })
}

/// Turns list query parameters into a repository filter. Blank values and the
/// UI's `All` option mean "no filter".
pub fn validate_list_query(query: CandidateListQuery) -> Result<CandidateFilter> {
    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("All") => None,
        Some(raw) => Some(raw.parse::<CandidateStatus>().map_err(|_| {
            single_violation("status", "Status must be one of Applied, Interviewing, Hired, Rejected")
        })?),
    };

    Ok(CandidateFilter { search, status })
}
