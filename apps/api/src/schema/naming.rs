//! Deterministic constraint and index names.
//!
//! | kind        | pattern                              |
//! |-------------|--------------------------------------|
//! | index       | `ix_<table>_<col>` (column label)    |
//! | unique      | `uq_<table>_<first col>`             |
//! | check       | `ck_<table>_<constraint>`            |
//! | foreign key | `fk_<table>_<col>_<referred table>`  |
//! | primary key | `pk_<table>`                         |

pub fn index(table: &str, column: &str) -> String {
    format!("ix_{table}_{column}")
}

pub fn unique(table: &str, first_column: &str) -> String {
    format!("uq_{table}_{first_column}")
}

pub fn check(table: &str, constraint: &str) -> String {
    format!("ck_{table}_{constraint}")
}

pub fn foreign_key(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{table}_{column}_{referred_table}")
}

pub fn primary_key(table: &str) -> String {
    format!("pk_{table}")
}
