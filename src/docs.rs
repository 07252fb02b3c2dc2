use axum::Json;
use utoipa::OpenApi;

use crate::dto::{api_response::FieldViolation, candidate_dto::CandidatePayload};
use crate::models::candidate::{Candidate, CandidateStatistics, CandidateStatus};
use crate::routes::candidates;

#[derive(OpenApi)]
#[openapi(
    paths(
        candidates::get_statistics,
        candidates::list_candidates,
        candidates::get_candidate,
        candidates::create_candidate,
        candidates::update_candidate,
        candidates::delete_candidate,
    ),
    components(schemas(
        Candidate,
        CandidateStatus,
        CandidateStatistics,
        CandidatePayload,
        FieldViolation
    )),
    tags((name = "candidates", description = "Candidate management"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
