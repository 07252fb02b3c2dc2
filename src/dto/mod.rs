pub mod api_response;
pub mod candidate_dto;
