//! Typed HTTP client for the candidate API.
//!
//! Mirrors what the browser UI does: payloads are checked with the same rules
//! the server applies before any request is sent, and failure envelopes are
//! surfaced with their `message` and `field` intact.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::dto::api_response::{ApiResponse, FieldViolation};
use crate::dto::candidate_dto::CandidatePayload;
use crate::error::{Error, EMAIL_EXISTS};
use crate::models::candidate::{Candidate, CandidateStatistics, CandidateStatus};
use crate::utils::validation::validate_payload;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldViolation>),

    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        field: Option<String>,
        errors: Vec<FieldViolation>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// True when the server refused the write because the email is taken.
    pub fn is_email_conflict(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status, field, message, .. }
                if *status == StatusCode::CONFLICT
                    && field.as_deref() == Some("email")
                    && message.contains(EMAIL_EXISTS)
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            ClientError::Validation(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateClient {
    http: Client,
    base_url: String,
}

impl CandidateClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/candidates{}", self.base_url, path)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<CandidateStatus>,
    ) -> Result<Vec<Candidate>, ClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(status) = status {
            params.push(("status", status.to_string()));
        }
        let response: ApiResponse<Vec<Candidate>> =
            self.send(self.http.get(self.url("")).query(&params)).await?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn get(&self, id: i32) -> Result<Candidate, ClientError> {
        let response = self.send(self.http.get(self.url(&format!("/{}", id)))).await?;
        Self::data(response)
    }

    pub async fn create(&self, payload: &CandidatePayload) -> Result<Candidate, ClientError> {
        Self::check(payload)?;
        let response = self
            .send(self.http.post(self.url("")).json(payload))
            .await?;
        Self::data(response)
    }

    pub async fn update(&self, id: i32, payload: &CandidatePayload) -> Result<Candidate, ClientError> {
        Self::check(payload)?;
        let response = self
            .send(self.http.put(self.url(&format!("/{}", id))).json(payload))
            .await?;
        Self::data(response)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        let _: ApiResponse<serde_json::Value> = self
            .send(self.http.delete(self.url(&format!("/{}", id))))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<CandidateStatistics, ClientError> {
        let response = self.send(self.http.get(self.url("/stats"))).await?;
        Self::data(response)
    }

    fn check(payload: &CandidatePayload) -> Result<(), ClientError> {
        match validate_payload(payload.clone()) {
            Ok(_) => Ok(()),
            Err(Error::Validation(errors)) => {
                Err(ClientError::Validation(FieldViolation::from_errors(&errors)))
            }
            Err(other) => Err(ClientError::Validation(vec![FieldViolation {
                field: "payload".to_string(),
                message: other.to_string(),
            }])),
        }
    }

    fn data<T>(response: ApiResponse<T>) -> Result<T, ClientError> {
        response.data.ok_or_else(|| ClientError::Api {
            status: StatusCode::OK,
            message: "Response did not contain data".to_string(),
            field: None,
            errors: Vec::new(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body: ApiResponse<T> = response.json().await?;

        if !status.is_success() || !body.success {
            tracing::debug!(%status, message = ?body.message, "Candidate API request failed");
            return Err(ClientError::Api {
                status,
                message: body
                    .message
                    .unwrap_or_else(|| "API request failed".to_string()),
                field: body.field,
                errors: body.errors.unwrap_or_default(),
            });
        }
        Ok(body)
    }
}
