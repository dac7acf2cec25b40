//! Input processing module
//! Handles record file detection, decoding and conversion into scoring inputs

pub mod decoder;
pub mod file_detector;
pub mod manager;
pub mod records;

pub use manager::InputManager;
pub use records::{ApplicationRecord, CandidateRecord, JobRecord, ParsedResume, RequirementEntry};
