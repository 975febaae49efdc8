use sqlx::PgConnection;

use crate::models::{CandidatePayload, JobPayload};
use crate::schema::{CANDIDATES, JOBS};

/// Moves the table's serial sequence up to a caller-chosen id so later plain
/// inserts cannot collide with it. The sequence only ever moves forward: ids at or
/// below its current value (including zero and negatives) leave it untouched.
async fn advance_sequence(
    conn: &mut PgConnection,
    table: &str,
    id: i32,
) -> Result<(), sqlx::Error> {
    let sequence: String = sqlx::query_scalar("SELECT pg_get_serial_sequence($1, 'id')")
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;
    // setval is not transactional, so the guard reads the live sequence state
    // rather than MAX(id) from this transaction's snapshot.
    let sql = format!("SELECT setval($1::regclass, $2) FROM {sequence} WHERE $2 >= last_value");
    sqlx::query(&sql)
        .bind(&sequence)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert_job(conn: &mut PgConnection, job: &JobPayload) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO jobs (title, salary, description) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&job.title)
    .bind(job.salary)
    .bind(&job.description)
    .fetch_one(&mut *conn)
    .await
}

pub async fn insert_job_with_id(
    conn: &mut PgConnection,
    id: i32,
    job: &JobPayload,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO jobs (id, title, salary, description) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.description)
        .execute(&mut *conn)
        .await?;
    advance_sequence(conn, JOBS.name, id).await
}

pub async fn update_job(
    conn: &mut PgConnection,
    id: i32,
    job: &JobPayload,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE jobs SET title = $2, salary = $3, description = $4 WHERE id = $1")
            .bind(id)
            .bind(&job.title)
            .bind(job.salary)
            .bind(&job.description)
            .execute(&mut *conn)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete_job(conn: &mut PgConnection, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_job_applications(
    conn: &mut PgConnection,
    job_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs_candidates WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_candidate(
    conn: &mut PgConnection,
    candidate: &CandidatePayload,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO candidates (full_name, expected_salary) VALUES ($1, $2) RETURNING id",
    )
    .bind(&candidate.full_name)
    .bind(candidate.expected_salary)
    .fetch_one(&mut *conn)
    .await
}

pub async fn insert_candidate_with_id(
    conn: &mut PgConnection,
    id: i32,
    candidate: &CandidatePayload,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO candidates (id, full_name, expected_salary) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(&candidate.full_name)
        .bind(candidate.expected_salary)
        .execute(&mut *conn)
        .await?;
    advance_sequence(conn, CANDIDATES.name, id).await
}

pub async fn update_candidate(
    conn: &mut PgConnection,
    id: i32,
    candidate: &CandidatePayload,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE candidates SET full_name = $2, expected_salary = $3 WHERE id = $1")
            .bind(id)
            .bind(&candidate.full_name)
            .bind(candidate.expected_salary)
            .execute(&mut *conn)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete_candidate(conn: &mut PgConnection, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_candidate_applications(
    conn: &mut PgConnection,
    candidate_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs_candidates WHERE candidate_id = $1")
        .bind(candidate_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_skill(conn: &mut PgConnection, title: &str) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar("INSERT INTO skills (title) VALUES ($1) RETURNING id")
        .bind(title)
        .fetch_one(&mut *conn)
        .await
}

/// One link row per skill id. An empty slice writes nothing.
pub async fn link_skills(
    conn: &mut PgConnection,
    candidate_id: i32,
    skill_ids: &[i32],
) -> Result<(), sqlx::Error> {
    if skill_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO candidates_skills (candidate_id, skill_id) SELECT $1, UNNEST($2::int4[])",
    )
    .bind(candidate_id)
    .bind(skill_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn unlink_skills(conn: &mut PgConnection, candidate_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM candidates_skills WHERE candidate_id = $1")
        .bind(candidate_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_application(
    conn: &mut PgConnection,
    job_id: i32,
    candidate_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO jobs_candidates (job_id, candidate_id) VALUES ($1, $2)")
        .bind(job_id)
        .bind(candidate_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
