// Record Store: typed CRUD over jobs, candidates and skills.
// Every operation owns exactly one transaction; selectors and mutators take a
// `&mut PgConnection` so they compose inside it.

mod mutators;
mod selectors;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    CandidatePayload, CandidateWithSkills, Job, JobPayload, JobWithCandidates, Skill,
};

pub const UNIQUE_VIOLATION: &str = "Unique data already exists";
pub const FOREIGN_KEY_VIOLATION: &str = "Referenced data does not exist";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn job_not_found(id: i32) -> Self {
        StoreError::NotFound(format!("Job {id} does not exist"))
    }

    pub fn candidate_not_found(id: i32) -> Self {
        StoreError::NotFound(format!("Candidate {id} does not exist"))
    }
}

/// Classifies driver failures: unique violations become `Conflict`, foreign-key
/// violations `NotFound`, anything else stays a `Database` error.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            debug!(constraint = ?db.constraint(), "Database rejected statement: {db}");
            if db.is_unique_violation() {
                return StoreError::Conflict(UNIQUE_VIOLATION.to_string());
            }
            if db.is_foreign_key_violation() {
                return StoreError::NotFound(FOREIGN_KEY_VIOLATION.to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Data-access contract consumed by the HTTP handlers.
/// Implementations hand out plain records only, never live handles.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn find_job(&self, id: i32) -> Result<JobWithCandidates, StoreError>;
    /// Returns the id assigned to the new job.
    async fn insert_job(&self, payload: &JobPayload) -> Result<i32, StoreError>;
    /// Inserts under `id` when absent, otherwise overwrites every field.
    async fn force_insert_job(&self, id: i32, payload: &JobPayload) -> Result<i32, StoreError>;
    async fn delete_job(&self, id: i32) -> Result<(), StoreError>;

    async fn list_candidates(&self) -> Result<Vec<CandidateWithSkills>, StoreError>;
    async fn find_candidate(&self, id: i32) -> Result<CandidateWithSkills, StoreError>;
    async fn insert_candidate(&self, payload: &CandidatePayload) -> Result<i32, StoreError>;
    /// Upsert that also replaces the candidate's skill links wholesale.
    async fn force_insert_candidate(
        &self,
        id: i32,
        payload: &CandidatePayload,
    ) -> Result<i32, StoreError>;
    async fn delete_candidate(&self, id: i32) -> Result<(), StoreError>;

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError>;

    async fn apply_candidate(&self, candidate_id: i32, job_id: i32) -> Result<(), StoreError>;

    async fn ping(&self) -> bool;
    /// Closes every pooled connection. Called once on shutdown.
    async fn close(&self);
}

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }
}

/// Commits on success; on failure rolls back and hands the error back unchanged.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    operation: &str,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!("{operation} error - {err}");
            if let Err(rollback_err) = tx.rollback().await {
                warn!("{operation} rollback failed - {rollback_err}");
            }
            Err(err)
        }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let mut tx = self.begin().await?;
        let result = selectors::list_jobs(&mut tx).await.map_err(StoreError::from);
        finish(tx, "List jobs", result).await
    }

    async fn find_job(&self, id: i32) -> Result<JobWithCandidates, StoreError> {
        let mut tx = self.begin().await?;
        let result = find_job_in(&mut tx, id).await;
        finish(tx, "Find job", result).await
    }

    async fn insert_job(&self, payload: &JobPayload) -> Result<i32, StoreError> {
        let mut tx = self.begin().await?;
        let result = mutators::insert_job(&mut tx, payload)
            .await
            .map_err(StoreError::from);
        let id = finish(tx, "Insert job", result).await?;
        info!("Inserted job {id}");
        Ok(id)
    }

    async fn force_insert_job(&self, id: i32, payload: &JobPayload) -> Result<i32, StoreError> {
        let mut tx = self.begin().await?;
        let result = force_insert_job_in(&mut tx, id, payload).await;
        finish(tx, "Force insert job", result).await?;
        info!("Saved job {id}");
        Ok(id)
    }

    async fn delete_job(&self, id: i32) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        let result = delete_job_in(&mut tx, id).await;
        finish(tx, "Delete job", result).await?;
        info!("Deleted job {id}");
        Ok(())
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateWithSkills>, StoreError> {
        let mut tx = self.begin().await?;
        let result = list_candidates_in(&mut tx).await;
        finish(tx, "List candidates", result).await
    }

    async fn find_candidate(&self, id: i32) -> Result<CandidateWithSkills, StoreError> {
        let mut tx = self.begin().await?;
        let result = find_candidate_in(&mut tx, id).await;
        finish(tx, "Find candidate", result).await
    }

    async fn insert_candidate(&self, payload: &CandidatePayload) -> Result<i32, StoreError> {
        let mut tx = self.begin().await?;
        let result = insert_candidate_in(&mut tx, payload).await;
        let id = finish(tx, "Insert candidate", result).await?;
        info!("Inserted candidate {id} with {} skills", payload.skills.len());
        Ok(id)
    }

    async fn force_insert_candidate(
        &self,
        id: i32,
        payload: &CandidatePayload,
    ) -> Result<i32, StoreError> {
        let mut tx = self.begin().await?;
        let result = force_insert_candidate_in(&mut tx, id, payload).await;
        finish(tx, "Force insert candidate", result).await?;
        info!("Saved candidate {id} with {} skills", payload.skills.len());
        Ok(id)
    }

    async fn delete_candidate(&self, id: i32) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        let result = delete_candidate_in(&mut tx, id).await;
        finish(tx, "Delete candidate", result).await?;
        info!("Deleted candidate {id}");
        Ok(())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
        let mut tx = self.begin().await?;
        let result = selectors::list_skills(&mut tx).await.map_err(StoreError::from);
        finish(tx, "List skills", result).await
    }

    async fn apply_candidate(&self, candidate_id: i32, job_id: i32) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        let result = apply_candidate_in(&mut tx, candidate_id, job_id).await;
        finish(tx, "Apply candidate", result).await?;
        info!("Candidate {candidate_id} applied to job {job_id}");
        Ok(())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

async fn find_job_in(conn: &mut PgConnection, id: i32) -> Result<JobWithCandidates, StoreError> {
    let job = selectors::job_by_id(conn, id)
        .await?
        .ok_or_else(|| StoreError::job_not_found(id))?;
    let candidates = selectors::job_candidates(conn, id).await?;
    Ok(JobWithCandidates { job, candidates })
}

async fn force_insert_job_in(
    conn: &mut PgConnection,
    id: i32,
    payload: &JobPayload,
) -> Result<i32, StoreError> {
    if selectors::job_by_id(conn, id).await?.is_some() {
        mutators::update_job(conn, id, payload).await?;
    } else {
        mutators::insert_job_with_id(conn, id, payload).await?;
    }
    Ok(id)
}

/// Application links go first; the job row's affected count decides NotFound.
async fn delete_job_in(conn: &mut PgConnection, id: i32) -> Result<(), StoreError> {
    mutators::delete_job_applications(conn, id).await?;
    if mutators::delete_job(conn, id).await? < 1 {
        return Err(StoreError::job_not_found(id));
    }
    Ok(())
}

async fn list_candidates_in(
    conn: &mut PgConnection,
) -> Result<Vec<CandidateWithSkills>, StoreError> {
    let candidates = selectors::list_candidates(conn).await?;
    let mut annotated = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let skills = selectors::candidate_skills(conn, candidate.id).await?;
        annotated.push(CandidateWithSkills { candidate, skills });
    }
    Ok(annotated)
}

async fn find_candidate_in(
    conn: &mut PgConnection,
    id: i32,
) -> Result<CandidateWithSkills, StoreError> {
    let candidate = selectors::candidate_by_id(conn, id)
        .await?
        .ok_or_else(|| StoreError::candidate_not_found(id))?;
    let skills = selectors::candidate_skills(conn, id).await?;
    Ok(CandidateWithSkills { candidate, skills })
}

/// Find-or-create by unique title. A concurrent creator of the same title
/// surfaces as a Conflict from the unique constraint.
async fn resolve_skills(conn: &mut PgConnection, titles: &[String]) -> Result<Vec<i32>, StoreError> {
    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        let id = match selectors::skill_id_by_title(conn, title).await? {
            Some(id) => id,
            None => mutators::insert_skill(conn, title).await?,
        };
        ids.push(id);
    }
    Ok(ids)
}

async fn insert_candidate_in(
    conn: &mut PgConnection,
    payload: &CandidatePayload,
) -> Result<i32, StoreError> {
    let id = mutators::insert_candidate(conn, payload).await?;
    let skill_ids = resolve_skills(conn, &payload.skills).await?;
    mutators::link_skills(conn, id, &skill_ids).await?;
    Ok(id)
}

async fn force_insert_candidate_in(
    conn: &mut PgConnection,
    id: i32,
    payload: &CandidatePayload,
) -> Result<i32, StoreError> {
    if selectors::candidate_by_id(conn, id).await?.is_some() {
        mutators::update_candidate(conn, id, payload).await?;
    } else {
        mutators::insert_candidate_with_id(conn, id, payload).await?;
    }
    let skill_ids = resolve_skills(conn, &payload.skills).await?;
    mutators::unlink_skills(conn, id).await?;
    mutators::link_skills(conn, id, &skill_ids).await?;
    Ok(id)
}

/// Manual cascade: skill links, then application links, then the candidate.
async fn delete_candidate_in(conn: &mut PgConnection, id: i32) -> Result<(), StoreError> {
    if selectors::candidate_by_id(conn, id).await?.is_none() {
        return Err(StoreError::candidate_not_found(id));
    }
    mutators::unlink_skills(conn, id).await?;
    mutators::delete_candidate_applications(conn, id).await?;
    mutators::delete_candidate(conn, id).await?;
    Ok(())
}

async fn apply_candidate_in(
    conn: &mut PgConnection,
    candidate_id: i32,
    job_id: i32,
) -> Result<(), StoreError> {
    if selectors::candidate_by_id(conn, candidate_id).await?.is_none() {
        return Err(StoreError::candidate_not_found(candidate_id));
    }
    if selectors::job_by_id(conn, job_id).await?.is_none() {
        return Err(StoreError::job_not_found(job_id));
    }
    mutators::insert_application(conn, job_id, candidate_id).await?;
    Ok(())
}
