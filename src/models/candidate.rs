use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum CandidateStatus {
    #[default]
    Applied,
    Interviewing,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::Applied,
        CandidateStatus::Interviewing,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "Applied",
            CandidateStatus::Interviewing => "Interviewing",
            CandidateStatus::Hired => "Hired",
            CandidateStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown candidate status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CandidateStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for CandidateStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<i32>,
    pub applied_position: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized field set written by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<i32>,
    pub applied_position: Option<String>,
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub search: Option<String>,
    pub status: Option<CandidateStatus>,
}

impl CandidateFilter {
    /// In-process equivalent of the SQL filter: case-insensitive substring on
    /// name, email and skills, exact status match, combined with AND.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(status) = self.status {
            if candidate.status != status {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                candidate.name.to_lowercase().contains(&needle)
                    || candidate.email.to_lowercase().contains(&needle)
                    || candidate
                        .skills
                        .as_deref()
                        .is_some_and(|skills| skills.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CandidateStatistics {
    pub total: i64,
    pub applied: i64,
    pub interviewing: i64,
    pub hired: i64,
    pub rejected: i64,
}

impl CandidateStatistics {
    pub fn record(&mut self, status: CandidateStatus) {
        self.total += 1;
        match status {
            CandidateStatus::Applied => self.applied += 1,
            CandidateStatus::Interviewing => self.interviewing += 1,
            CandidateStatus::Hired => self.hired += 1,
            CandidateStatus::Rejected => self.rejected += 1,
        }
    }
}
