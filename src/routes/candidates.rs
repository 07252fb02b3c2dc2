use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use crate::{
    dto::{
        api_response::ApiResponse,
        candidate_dto::{CandidateListQuery, CandidatePayload},
    },
    error::{Error, Result, ResultExt},
    models::candidate::{Candidate, CandidateStatistics},
    utils::{
        extract::{JsonBody, PathParam, QueryParams},
        validation::{parse_id, validate_list_query, validate_payload},
    },
    AppState,
};

/// Routes mounted under `/api/candidates`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_statistics))
        .route("/", get(list_candidates).post(create_candidate))
        .route(
            "/:id",
            get(get_candidate)
                .put(update_candidate)
                .delete(delete_candidate),
        )
}

#[utoipa::path(
    get,
    path = "/api/candidates/stats",
    responses(
        (status = 200, description = "Counts by status plus total", body = CandidateStatistics),
        (status = 500, description = "Storage unavailable")
    )
)]
#[axum::debug_handler]
pub async fn get_statistics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state
        .candidates
        .statistics()
        .await
        .context("Error retrieving statistics")?;
    Ok(Json(ApiResponse::ok(stats)))
}

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(CandidateListQuery),
    responses(
        (status = 200, description = "Matching candidates ordered by id", body = [Candidate]),
        (status = 422, description = "Unknown status filter")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let filter = validate_list_query(query)?;
    let candidates = state
        .candidates
        .list(&filter)
        .await
        .context("Error retrieving candidates")?;
    let count = candidates.len();
    Ok(Json(ApiResponse::ok(candidates).with_count(count)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = Candidate),
        (status = 404, description = "Candidate not found"),
        (status = 422, description = "Malformed id")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&raw_id)?;
    let candidate = state
        .candidates
        .get_by_id(id)
        .await
        .context("Error retrieving candidate")?
        .ok_or_else(|| Error::candidate_not_found(id))?;
    Ok(Json(ApiResponse::ok(candidate)))
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CandidatePayload,
    responses(
        (status = 201, description = "Candidate created successfully", body = Candidate),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CandidatePayload>,
) -> Result<impl IntoResponse> {
    let data = validate_payload(payload)?;

    if state
        .candidates
        .email_exists(&data.email, None)
        .await
        .context("Error creating candidate")?
    {
        return Err(Error::email_conflict());
    }

    let candidate = state
        .candidates
        .create(&data)
        .await
        .context("Error creating candidate")?;
    tracing::info!(id = candidate.id, "Candidate created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(candidate).with_message("Candidate created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{id}",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    request_body = CandidatePayload,
    responses(
        (status = 200, description = "Candidate updated successfully", body = Candidate),
        (status = 404, description = "Candidate not found"),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
    JsonBody(payload): JsonBody<CandidatePayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&raw_id)?;
    let data = validate_payload(payload)?;

    if state
        .candidates
        .get_by_id(id)
        .await
        .context("Error updating candidate")?
        .is_none()
    {
        return Err(Error::candidate_not_found(id));
    }

    if state
        .candidates
        .email_exists(&data.email, Some(id))
        .await
        .context("Error updating candidate")?
    {
        return Err(Error::email_conflict());
    }

    let candidate = state
        .candidates
        .update(id, &data)
        .await
        .context("Error updating candidate")?;
    tracing::info!(id, "Candidate updated");

    Ok(Json(
        ApiResponse::ok(candidate).with_message("Candidate updated successfully"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate deleted successfully"),
        (status = 404, description = "Candidate not found"),
        (status = 422, description = "Malformed id")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&raw_id)?;
    let deleted = state
        .candidates
        .delete(id)
        .await
        .context("Error deleting candidate")?;
    if !deleted {
        return Err(Error::candidate_not_found(id));
    }
    tracing::info!(id, "Candidate deleted");
    Ok(Json(ApiResponse::done("Candidate deleted successfully")))
}
