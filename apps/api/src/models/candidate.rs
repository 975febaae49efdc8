use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Skill;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub full_name: String,
    pub expected_salary: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateWithSkills {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub skills: Vec<Skill>,
}

/// Validated candidate body. `skills` holds distinct skill titles in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePayload {
    pub full_name: String,
    pub expected_salary: i32,
    pub skills: Vec<String>,
}
