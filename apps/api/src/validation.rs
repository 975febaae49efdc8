use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::{CandidatePayload, JobPayload};

/// Per-field validation messages, keyed by field name.
/// Body-level problems are reported under `_schema`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_INTEGER: &str = "Not a valid integer.";
const NOT_LIST: &str = "Not a valid list.";
const NEGATIVE: &str = "Must be greater than or equal to 0.";
const EMPTY: &str = "Shorter than minimum length 1.";
const UNKNOWN: &str = "Unknown field.";
const INVALID_BODY: &str = "Invalid input type.";

const JOB_FIELDS: &[&str] = &["title", "salary", "description"];
const CANDIDATE_FIELDS: &[&str] = &["full_name", "expected_salary", "skills"];

pub fn parse_job(body: &[u8]) -> Result<JobPayload, FieldErrors> {
    let object = parse_object(body)?;
    let mut v = Validator::new(&object, JOB_FIELDS);

    let title = v.required_string("title");
    let salary = v.required_non_negative_int("salary");
    let description = v.optional_string("description");

    v.finish()?;
    match (title, salary) {
        (Some(title), Some(salary)) => Ok(JobPayload {
            title,
            salary,
            description,
        }),
        _ => Err(schema_error(INVALID_BODY)),
    }
}

pub fn parse_candidate(body: &[u8]) -> Result<CandidatePayload, FieldErrors> {
    let object = parse_object(body)?;
    let mut v = Validator::new(&object, CANDIDATE_FIELDS);

    let full_name = v.required_string("full_name");
    let expected_salary = v.required_non_negative_int("expected_salary");
    let skills = v.string_list("skills");

    v.finish()?;
    match (full_name, expected_salary) {
        (Some(full_name), Some(expected_salary)) => Ok(CandidatePayload {
            full_name,
            expected_salary,
            skills,
        }),
        _ => Err(schema_error(INVALID_BODY)),
    }
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, FieldErrors> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(schema_error(INVALID_BODY)),
    }
}

fn schema_error(message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert("_schema".to_string(), vec![message.to_string()]);
    errors
}

struct Validator<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    fn new(object: &'a Map<String, Value>, known: &[&str]) -> Self {
        let mut errors = FieldErrors::new();
        for key in object.keys().filter(|k| !known.contains(&k.as_str())) {
            errors.insert(key.clone(), vec![UNKNOWN.to_string()]);
        }
        Validator { object, errors }
    }

    fn fail(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Returns the non-null value of a required field, recording an error otherwise.
    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let object = self.object;
        match object.get(field) {
            None => {
                self.fail(field, MISSING);
                None
            }
            Some(Value::Null) => {
                self.fail(field, NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    fn required_string(&mut self, field: &str) -> Option<String> {
        match self.required(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(field, NOT_STRING);
                None
            }
        }
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        let object = self.object;
        match object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.fail(field, NOT_STRING);
                None
            }
        }
    }

    fn required_non_negative_int(&mut self, field: &str) -> Option<i32> {
        let value = self.required(field)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n >= 0 => Some(n),
            Some(_) => {
                self.fail(field, NEGATIVE);
                None
            }
            None => {
                self.fail(field, NOT_INTEGER);
                None
            }
        }
    }

    /// Missing or null yields an empty list. Duplicates collapse to their first occurrence.
    fn string_list(&mut self, field: &str) -> Vec<String> {
        let object = self.object;
        let items = match object.get(field) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.fail(field, NOT_LIST);
                return Vec::new();
            }
        };

        let mut titles: Vec<String> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) if s.is_empty() => self.fail(&format!("{field}.{i}"), EMPTY),
                Value::String(s) => {
                    if !titles.contains(s) {
                        titles.push(s.clone());
                    }
                }
                _ => self.fail(&format!("{field}.{i}"), NOT_STRING),
            }
        }
        titles
    }

    fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
