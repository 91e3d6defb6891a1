//! Inbound payload validation.
//!
//! Bodies are decoded field by field against [`crate::schema::COURSE_FIELDS`];
//! the first failure wins. Date filters on the name lookup come from the
//! query string and never fail: anything unusable falls back to a default.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use chrono::{Datelike, Months, NaiveDateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;
use crate::models::{CoursePatch, NewCourse};
use crate::schema::{COURSE_FIELDS, END_DATE, FieldKind, LESSONS, NAME, START_DATE, TIMESTAMP_FORMAT, field_kind};

/// A request body that declared itself as JSON and parsed as a JSON object.
#[derive(Debug, Clone)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            debug!("rejecting body without json content type");
            return Err(AppError::NotJson);
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::MalformedRequest)?;
        parse_object(&body).map(JsonObject)
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match mime.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Err(AppError::MalformedRequest),
    }
}

/// Years are plain digits in 1..=9999 so stored text sorts chronologically.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if !raw.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .filter(|parsed| (1..=9999).contains(&parsed.year()))
}

/// Every schema field must be present and well typed.
pub fn validate_new_course(body: &Map<String, Value>) -> Result<NewCourse, AppError> {
    let mut fields = CoursePatch::default();
    for (field, _) in COURSE_FIELDS {
        let value = body
            .get(field)
            .ok_or_else(|| AppError::MissingField(field.to_string()))?;
        decode_into(&mut fields, field, value)?;
    }

    fields.into_new_course().ok_or(AppError::MalformedRequest)
}

/// Any subset of the schema fields, each type-checked in submission order.
/// Keys outside the schema are ignored.
pub fn validate_course_patch(body: &Map<String, Value>) -> Result<CoursePatch, AppError> {
    let mut fields = CoursePatch::default();
    for (field, value) in body {
        decode_into(&mut fields, field, value)?;
    }
    Ok(fields)
}

enum FieldValue {
    Text(String),
    Timestamp(NaiveDateTime),
    Integer(i64),
}

fn decode(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => value.as_str().map(|s| FieldValue::Text(s.to_string())),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(parse_timestamp)
            .map(FieldValue::Timestamp),
        FieldKind::Integer => value.as_i64().map(FieldValue::Integer),
    }
}

fn decode_into(fields: &mut CoursePatch, field: &str, value: &Value) -> Result<(), AppError> {
    let Some(kind) = field_kind(field) else {
        return Ok(());
    };
    let mismatch = || AppError::TypeMismatch(field.to_string());
    let decoded = decode(kind, value).ok_or_else(mismatch)?;

    match (field, decoded) {
        (NAME, FieldValue::Text(name)) => fields.name = Some(name),
        (START_DATE, FieldValue::Timestamp(date)) => fields.start_date = Some(date),
        (END_DATE, FieldValue::Timestamp(date)) => fields.end_date = Some(date),
        (LESSONS, FieldValue::Integer(lessons)) => fields.lessons = Some(lessons),
        _ => return Err(mismatch()),
    }
    Ok(())
}

pub const BOTTOM_DATE: &str = "bottom_date";
pub const TOP_DATE: &str = "top_date";

/// Inclusive `start_date` window for the name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub bottom: NaiveDateTime,
    pub top: NaiveDateTime,
}

impl DateRange {
    /// `[now, now + 1 year]`, in whole UTC seconds.
    pub fn default_at(now: NaiveDateTime) -> Self {
        let now = now.trunc_subsecs(0);
        Self {
            bottom: now,
            top: now.checked_add_months(Months::new(12)).unwrap_or(NaiveDateTime::MAX),
        }
    }

    pub fn from_query(params: &HashMap<String, String>, now: NaiveDateTime) -> Self {
        let defaults = Self::default_at(now);
        let pick = |key: &str, fallback: NaiveDateTime| {
            params
                .get(key)
                .and_then(|raw| parse_timestamp(raw))
                .unwrap_or(fallback)
        };

        Self {
            bottom: pick(BOTTOM_DATE, defaults.bottom),
            top: pick(TOP_DATE, defaults.top),
        }
    }

    pub fn from_query_now(params: &HashMap<String, String>) -> Self {
        Self::from_query(params, Utc::now().naive_utc())
    }
}
