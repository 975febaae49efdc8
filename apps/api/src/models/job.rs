use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Candidate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: i32,
    pub description: Option<String>,
}

/// A job together with every candidate that applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobWithCandidates {
    #[serde(flatten)]
    pub job: Job,
    pub candidates: Vec<Candidate>,
}

/// Validated job body. Every write overwrites all three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPayload {
    pub title: String,
    pub salary: i32,
    pub description: Option<String>,
}

#[cfg(test)]
impl JobPayload {
    pub fn into_job(self, id: i32) -> Job {
        Job {
            id,
            title: self.title,
            salary: self.salary,
            description: self.description,
        }
    }
}
