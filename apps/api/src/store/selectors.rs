use sqlx::PgConnection;

use crate::models::{Candidate, Job, Skill};

pub async fn list_jobs(conn: &mut PgConnection) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>("SELECT id, title, salary, description FROM jobs ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}

pub async fn job_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>("SELECT id, title, salary, description FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Candidates that applied to the given job.
pub async fn job_candidates(
    conn: &mut PgConnection,
    job_id: i32,
) -> Result<Vec<Candidate>, sqlx::Error> {
    sqlx::query_as::<_, Candidate>(
        r#"
        SELECT c.id, c.full_name, c.expected_salary
        FROM jobs_candidates jc
        JOIN candidates c ON c.id = jc.candidate_id
        WHERE jc.job_id = $1
        ORDER BY c.id
        "#,
    )
    .bind(job_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_candidates(conn: &mut PgConnection) -> Result<Vec<Candidate>, sqlx::Error> {
    sqlx::query_as::<_, Candidate>(
        "SELECT id, full_name, expected_salary FROM candidates ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await
}

pub async fn candidate_by_id(
    conn: &mut PgConnection,
    id: i32,
) -> Result<Option<Candidate>, sqlx::Error> {
    sqlx::query_as::<_, Candidate>(
        "SELECT id, full_name, expected_salary FROM candidates WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn candidate_skills(
    conn: &mut PgConnection,
    candidate_id: i32,
) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        r#"
        SELECT s.id, s.title
        FROM candidates_skills cs
        JOIN skills s ON s.id = cs.skill_id
        WHERE cs.candidate_id = $1
        ORDER BY s.id
        "#,
    )
    .bind(candidate_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_skills(conn: &mut PgConnection) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>("SELECT id, title FROM skills ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}

pub async fn skill_id_by_title(
    conn: &mut PgConnection,
    title: &str,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM skills WHERE title = $1")
        .bind(title)
        .fetch_optional(&mut *conn)
        .await
}
