// Schema Definer: the five tables backing the record store, declared as static data
// and rendered to idempotent DDL. Constraint names come from `naming`.

pub mod naming;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    /// Referenced table; the referenced column is always its `id`.
    pub references: Option<&'static str>,
}

pub enum Constraint {
    /// Unique over the listed columns; named after the first one.
    Unique(&'static [&'static str]),
    Check {
        name: &'static str,
        expr: &'static str,
    },
}

pub struct Table {
    pub name: &'static str,
    /// Surrogate key column, if the table has one.
    pub primary_key: Option<&'static str>,
    pub columns: &'static [Column],
    pub constraints: &'static [Constraint],
    pub indexes: &'static [&'static str],
}

const fn column(name: &'static str, sql_type: &'static str, nullable: bool) -> Column {
    Column {
        name,
        sql_type,
        nullable,
        references: None,
    }
}

const fn foreign(name: &'static str, table: &'static str) -> Column {
    Column {
        name,
        sql_type: "INTEGER",
        nullable: false,
        references: Some(table),
    }
}

pub const CANDIDATES: Table = Table {
    name: "candidates",
    primary_key: Some("id"),
    columns: &[
        column("id", "SERIAL", false),
        column("full_name", "VARCHAR", false),
        column("expected_salary", "INTEGER", false),
    ],
    constraints: &[Constraint::Check {
        name: "expected_salary_non_negative",
        expr: "expected_salary >= 0",
    }],
    indexes: &[],
};

pub const SKILLS: Table = Table {
    name: "skills",
    primary_key: Some("id"),
    columns: &[column("id", "SERIAL", false), column("title", "VARCHAR", false)],
    constraints: &[Constraint::Unique(&["title"])],
    indexes: &[],
};

pub const CANDIDATES_SKILLS: Table = Table {
    name: "candidates_skills",
    primary_key: None,
    columns: &[
        foreign("candidate_id", "candidates"),
        foreign("skill_id", "skills"),
    ],
    constraints: &[Constraint::Unique(&["candidate_id", "skill_id"])],
    indexes: &["skill_id"],
};

pub const JOBS: Table = Table {
    name: "jobs",
    primary_key: Some("id"),
    columns: &[
        column("id", "SERIAL", false),
        column("title", "VARCHAR", false),
        column("salary", "INTEGER", false),
        column("description", "VARCHAR", true),
    ],
    constraints: &[
        Constraint::Unique(&["title"]),
        Constraint::Check {
            name: "salary_non_negative",
            expr: "salary >= 0",
        },
    ],
    indexes: &[],
};

pub const JOBS_CANDIDATES: Table = Table {
    name: "jobs_candidates",
    primary_key: None,
    columns: &[foreign("job_id", "jobs"), foreign("candidate_id", "candidates")],
    constraints: &[Constraint::Unique(&["job_id", "candidate_id"])],
    indexes: &["candidate_id"],
};

/// All tables, ordered so every referenced table precedes its referrers.
pub const TABLES: [&Table; 5] = [
    &CANDIDATES,
    &SKILLS,
    &CANDIDATES_SKILLS,
    &JOBS,
    &JOBS_CANDIDATES,
];

impl Table {
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let null = if c.nullable { "" } else { " NOT NULL" };
                format!("{} {}{}", c.name, c.sql_type, null)
            })
            .collect();

        if let Some(pk) = self.primary_key {
            parts.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({pk})",
                naming::primary_key(self.name)
            ));
        }

        for c in self.columns {
            if let Some(referred) = c.references {
                parts.push(format!(
                    "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {referred} (id)",
                    naming::foreign_key(self.name, c.name, referred),
                    c.name
                ));
            }
        }

        for constraint in self.constraints {
            parts.push(match constraint {
                Constraint::Unique(cols) => format!(
                    "CONSTRAINT {} UNIQUE ({})",
                    naming::unique(self.name, cols[0]),
                    cols.join(", ")
                ),
                Constraint::Check { name, expr } => format!(
                    "CONSTRAINT {} CHECK ({expr})",
                    naming::check(self.name, name)
                ),
            });
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            parts.join(",\n    ")
        )
    }

    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|col| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({col})",
                    naming::index(self.name, col),
                    self.name
                )
            })
            .collect()
    }
}

/// Creates every missing table and index. Safe to run on each startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for table in TABLES {
        sqlx::query(&table.create_table_sql())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create table '{}'", table.name))?;
        for ddl in table.create_index_sql() {
            sqlx::query(&ddl)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to create index on '{}'", table.name))?;
        }
    }
    tx.commit().await?;

    info!("Schema ensured ({} tables)", TABLES.len());
    Ok(())
}
