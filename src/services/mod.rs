pub mod candidate_service;
pub mod memory_store;
