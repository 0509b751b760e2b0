//! Flattens REST payloads into typed records.
//!
//! The API wraps most fields as `attributes.<field>.value`. This is the one
//! place where absent fields are defaulted: dates become
//! [`RecordDate::Missing`], optional text becomes `None`, a missing title
//! becomes `"N/A"`, and an assignee of `0` becomes `None`.

use crate::dates::{RecordDate, SENTINEL};
use crate::errors::{AppError, AppResult};
use crate::models::{AssetRecord, ChecklistItem, ListRecord, TaskKind, TaskRecord};
use serde_json::Value;
use std::collections::HashSet;

pub fn normalize_task(item: &Value) -> AppResult<TaskRecord> {
    let id = record_id(item)?;
    Ok(TaskRecord {
        id,
        title: title(item, &["title", "name"]),
        description: text(item, "description"),
        status: text(item, "status"),
        priority: text(item, "priority"),
        assignee_id: assignee(item, "assigneeId"),
        start_date: date(item, "startDate"),
        end_date: date(item, "endDate"),
        kind: text(item, "type").as_deref().and_then(TaskKind::parse),
    })
}

pub fn normalize_asset(item: &Value) -> AppResult<AssetRecord> {
    let id = record_id(item)?;
    Ok(AssetRecord {
        id,
        name: title(item, &["name", "title"]),
        status: text(item, "status"),
        owner_id: assignee(item, "ownerId"),
        acquired_on: date(item, "acquiredOn"),
        review_on: date(item, "reviewOn"),
        category: text(item, "category"),
        location: text(item, "location"),
    })
}

pub fn normalize_checklist_item(item: &Value) -> AppResult<ChecklistItem> {
    let id = record_id(item)?;
    Ok(ChecklistItem {
        id,
        title: title(item, &["title", "name"]),
        status: text(item, "status"),
        priority: text(item, "priority"),
        assignee_id: assignee(item, "assigneeId"),
        due_on: date(item, "dueDate"),
        clause: text(item, "clause"),
        notes: text(item, "notes"),
    })
}

/// Normalizes every item of a collection payload, either a bare array or an
/// object with a `data` array. Items that fail to normalize, and repeats of
/// an id already seen, are skipped with a warning.
pub fn normalize_collection<R, F>(payload: &Value, normalize: F) -> AppResult<Vec<R>>
where
    R: ListRecord,
    F: Fn(&Value) -> AppResult<R>,
{
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::Malformed(
                    "collection object has no `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(AppError::Malformed(format!(
                "expected a collection, got {}",
                json_kind(other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match normalize(item) {
            Ok(record) => {
                if !seen.insert(record.id().to_string()) {
                    tracing::warn!(index, id = record.id(), "skipping duplicate record id");
                    continue;
                }
                records.push(record);
            }
            Err(error) => {
                tracing::warn!(index, error = %error, "skipping malformed record");
            }
        }
    }
    Ok(records)
}

/// Parses a raw JSON body and normalizes it as a collection.
pub fn parse_collection<R, F>(body: &str, normalize: F) -> AppResult<Vec<R>>
where
    R: ListRecord,
    F: Fn(&Value) -> AppResult<R>,
{
    let payload: Value = serde_json::from_str(body)?;
    normalize_collection(&payload, normalize)
}

fn record_id(item: &Value) -> AppResult<String> {
    if !item.is_object() {
        return Err(AppError::Malformed(format!(
            "expected a record object, got {}",
            json_kind(item)
        )));
    }
    match item.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(AppError::Malformed("record has no usable `id`".to_string())),
    }
}

/// `attributes.<field>` (or a top-level `<field>` when there is no
/// `attributes` object), unwrapping a `{ "value": ... }` envelope. Null is
/// treated as absent.
fn attribute<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    let fields = item.get("attributes").filter(|value| value.is_object()).unwrap_or(item);
    let raw = fields.get(field)?;
    let value = match raw {
        Value::Object(envelope) if envelope.contains_key("value") => &envelope["value"],
        other => other,
    };
    (!value.is_null()).then_some(value)
}

fn text(item: &Value, field: &str) -> Option<String> {
    let value = match attribute(item, field)? {
        Value::String(value) => value.trim().to_string(),
        Value::Number(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        _ => return None,
    };
    (!value.is_empty() && value != SENTINEL).then_some(value)
}

fn title(item: &Value, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|field| text(item, field))
        .unwrap_or_else(|| SENTINEL.to_string())
}

fn date(item: &Value, field: &str) -> RecordDate {
    match attribute(item, field) {
        Some(Value::String(raw)) => RecordDate::parse(raw),
        _ => RecordDate::Missing,
    }
}

fn assignee(item: &Value, field: &str) -> Option<u64> {
    let id = match attribute(item, field)? {
        Value::Number(value) => value.as_u64()?,
        Value::String(value) => value.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (id != 0).then_some(id)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
