pub mod candidate;
pub mod job;
pub mod skill;

pub use candidate::{Candidate, CandidatePayload, CandidateWithSkills};
pub use job::{Job, JobPayload, JobWithCandidates};
pub use skill::Skill;
