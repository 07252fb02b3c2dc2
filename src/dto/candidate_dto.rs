use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::candidate::NewCandidate;
use crate::utils::validation::{
    validate_email_format, validate_name_chars, validate_phone, validate_status,
};

/// Body of `POST /api/candidates` and `PUT /api/candidates/{id}`.
///
/// Every field is optional at the type level so that a missing required field
/// is reported as a field violation rather than a deserialization failure.
/// Values of the wrong JSON type are recorded in `malformed` for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(from = "RawCandidatePayload")]
pub struct CandidatePayload {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_name_chars")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Age is required"),
        range(min = 18, max = 100, message = "Age must be between 18 and 100")
    )]
    pub age: Option<i32>,

    #[validate(
        required(message = "Email is required"),
        length(max = 255, message = "Email must be at most 255 characters"),
        custom(function = "validate_email_format")
    )]
    pub email: Option<String>,

    #[validate(
        length(max = 20, message = "Phone must be at most 20 characters"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,

    pub skills: Option<String>,

    #[validate(range(min = 0, message = "Experience cannot be negative"))]
    pub experience: Option<i32>,

    #[validate(length(max = 100, message = "Applied position must be at most 100 characters"))]
    pub applied_position: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    /// `(field, message)` for every value that arrived with the wrong JSON type.
    #[serde(skip)]
    pub malformed: Vec<(&'static str, &'static str)>,
}

/// Wire shape of [`CandidatePayload`]: any JSON value is accepted per field and
/// checked for type afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCandidatePayload {
    name: Option<JsonValue>,
    age: Option<JsonValue>,
    email: Option<JsonValue>,
    phone: Option<JsonValue>,
    skills: Option<JsonValue>,
    experience: Option<JsonValue>,
    applied_position: Option<JsonValue>,
    status: Option<JsonValue>,
}

struct TypeCheck(Vec<(&'static str, &'static str)>);

impl TypeCheck {
    fn text(&mut self, field: &'static str, value: Option<JsonValue>, message: &'static str) -> Option<String> {
        match value {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(s),
            Some(_) => {
                self.0.push((field, message));
                None
            }
        }
    }

    /// Whole numbers, given either as JSON numbers or as numeric strings.
    fn integer(&mut self, field: &'static str, value: Option<JsonValue>, message: &'static str) -> Option<i32> {
        let parsed = match value {
            None | Some(JsonValue::Null) => return None,
            Some(JsonValue::String(s)) if s.trim().is_empty() => return None,
            Some(JsonValue::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Some(JsonValue::String(s)) => s.trim().parse::<i32>().ok(),
            Some(_) => None,
        };
        if parsed.is_none() {
            self.0.push((field, message));
        }
        parsed
    }
}

impl From<RawCandidatePayload> for CandidatePayload {
    fn from(raw: RawCandidatePayload) -> Self {
        let mut check = TypeCheck(Vec::new());
        let payload = Self {
            name: check.text("name", raw.name, "Name must be a string"),
            age: check.integer("age", raw.age, "Age must be a number"),
            email: check.text("email", raw.email, "Email must be a string"),
            phone: check.text("phone", raw.phone, "Phone must be a string"),
            skills: check.text("skills", raw.skills, "Skills must be a string"),
            experience: check.integer("experience", raw.experience, "Experience must be a number"),
            applied_position: check.text(
                "applied_position",
                raw.applied_position,
                "Applied position must be a string",
            ),
            status: check.text("status", raw.status, "Status must be a string"),
            malformed: Vec::new(),
        };
        Self {
            malformed: check.0,
            ..payload
        }
    }
}

impl CandidatePayload {
    /// Trims every text field and drops the ones left empty.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: clean(self.name),
            age: self.age,
            email: clean(self.email),
            phone: clean(self.phone),
            skills: clean(self.skills),
            experience: self.experience,
            applied_position: clean(self.applied_position),
            status: clean(self.status),
            malformed: self.malformed,
        }
    }
}

impl From<NewCandidate> for CandidatePayload {
    fn from(value: NewCandidate) -> Self {
        Self {
            name: Some(value.name),
            age: Some(value.age),
            email: Some(value.email),
            phone: value.phone,
            skills: value.skills,
            experience: value.experience,
            applied_position: value.applied_position,
            status: Some(value.status.to_string()),
            malformed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct CandidateListQuery {
    /// Case-insensitive substring matched against name, email and skills.
    pub search: Option<String>,
    /// Exact status: Applied, Interviewing, Hired or Rejected.
    pub status: Option<String>,
}
