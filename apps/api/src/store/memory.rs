//! In-memory `RecordStore` with the same observable semantics as `PgStore`.
//! Used by handler tests that run without a database.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{
    Candidate, CandidatePayload, CandidateWithSkills, Job, JobPayload, JobWithCandidates, Skill,
};
use crate::store::{RecordStore, StoreError, UNIQUE_VIOLATION};

#[derive(Default)]
struct Tables {
    jobs: BTreeMap<i32, Job>,
    candidates: BTreeMap<i32, Candidate>,
    skills: BTreeMap<i32, Skill>,
    /// (candidate_id, skill_id)
    candidate_skills: BTreeSet<(i32, i32)>,
    /// (job_id, candidate_id)
    applications: BTreeSet<(i32, i32)>,
    next_job: i32,
    next_candidate: i32,
    next_skill: i32,
}

impl Tables {
    fn conflict() -> StoreError {
        StoreError::Conflict(UNIQUE_VIOLATION.to_string())
    }

    fn check_job_title(&self, title: &str, except: Option<i32>) -> Result<(), StoreError> {
        let taken = self
            .jobs
            .values()
            .any(|j| j.title == title && Some(j.id) != except);
        if taken {
            Err(Self::conflict())
        } else {
            Ok(())
        }
    }

    fn skills_of(&self, candidate_id: i32) -> Vec<Skill> {
        self.candidate_skills
            .iter()
            .filter(|(c, _)| *c == candidate_id)
            .filter_map(|(_, s)| self.skills.get(s).cloned())
            .collect()
    }

    fn resolve_skills(&mut self, titles: &[String]) -> Vec<i32> {
        titles
            .iter()
            .map(|title| {
                if let Some(skill) = self.skills.values().find(|s| &s.title == title) {
                    return skill.id;
                }
                self.next_skill += 1;
                let id = self.next_skill;
                self.skills.insert(
                    id,
                    Skill {
                        id,
                        title: title.clone(),
                    },
                );
                id
            })
            .collect()
    }

    fn relink(&mut self, candidate_id: i32, titles: &[String]) {
        let skill_ids = self.resolve_skills(titles);
        self.candidate_skills.retain(|(c, _)| *c != candidate_id);
        for skill_id in skill_ids {
            self.candidate_skills.insert((candidate_id, skill_id));
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.tables().jobs.values().cloned().collect())
    }

    async fn find_job(&self, id: i32) -> Result<JobWithCandidates, StoreError> {
        let t = self.tables();
        let job = t
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::job_not_found(id))?;
        let candidates = t
            .applications
            .iter()
            .filter(|(j, _)| *j == id)
            .filter_map(|(_, c)| t.candidates.get(c).cloned())
            .collect();
        Ok(JobWithCandidates { job, candidates })
    }

    async fn insert_job(&self, payload: &JobPayload) -> Result<i32, StoreError> {
        let mut t = self.tables();
        t.check_job_title(&payload.title, None)?;
        t.next_job += 1;
        let id = t.next_job;
        t.jobs.insert(id, payload.clone().into_job(id));
        Ok(id)
    }

    async fn force_insert_job(&self, id: i32, payload: &JobPayload) -> Result<i32, StoreError> {
        let mut t = self.tables();
        t.check_job_title(&payload.title, Some(id))?;
        t.jobs.insert(id, payload.clone().into_job(id));
        t.next_job = t.next_job.max(id);
        Ok(id)
    }

    async fn delete_job(&self, id: i32) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.jobs.remove(&id).is_none() {
            return Err(StoreError::job_not_found(id));
        }
        t.applications.retain(|(j, _)| *j != id);
        Ok(())
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateWithSkills>, StoreError> {
        let t = self.tables();
        Ok(t.candidates
            .values()
            .map(|c| CandidateWithSkills {
                candidate: c.clone(),
                skills: t.skills_of(c.id),
            })
            .collect())
    }

    async fn find_candidate(&self, id: i32) -> Result<CandidateWithSkills, StoreError> {
        let t = self.tables();
        let candidate = t
            .candidates
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::candidate_not_found(id))?;
        Ok(CandidateWithSkills {
            skills: t.skills_of(id),
            candidate,
        })
    }

    async fn insert_candidate(&self, payload: &CandidatePayload) -> Result<i32, StoreError> {
        let mut t = self.tables();
        t.next_candidate += 1;
        let id = t.next_candidate;
        t.candidates.insert(
            id,
            Candidate {
                id,
                full_name: payload.full_name.clone(),
                expected_salary: payload.expected_salary,
            },
        );
        t.relink(id, &payload.skills);
        Ok(id)
    }

    async fn force_insert_candidate(
        &self,
        id: i32,
        payload: &CandidatePayload,
    ) -> Result<i32, StoreError> {
        let mut t = self.tables();
        t.candidates.insert(
            id,
            Candidate {
                id,
                full_name: payload.full_name.clone(),
                expected_salary: payload.expected_salary,
            },
        );
        t.next_candidate = t.next_candidate.max(id);
        t.relink(id, &payload.skills);
        Ok(id)
    }

    async fn delete_candidate(&self, id: i32) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.candidates.remove(&id).is_none() {
            return Err(StoreError::candidate_not_found(id));
        }
        t.candidate_skills.retain(|(c, _)| *c != id);
        t.applications.retain(|(_, c)| *c != id);
        Ok(())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
        Ok(self.tables().skills.values().cloned().collect())
    }

    async fn apply_candidate(&self, candidate_id: i32, job_id: i32) -> Result<(), StoreError> {
        let mut t = self.tables();
        if !t.candidates.contains_key(&candidate_id) {
            return Err(StoreError::candidate_not_found(candidate_id));
        }
        if !t.jobs.contains_key(&job_id) {
            return Err(StoreError::job_not_found(job_id));
        }
        if !t.applications.insert((job_id, candidate_id)) {
            return Err(Tables::conflict());
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }

    async fn close(&self) {}
}
