use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::repository;
use crate::error::AppError;
use crate::models::CourseView;
use crate::state::AppState;
use crate::validation::{DateRange, JsonObject, validate_course_patch, validate_new_course};

pub const COURSE_ADDED: &str = "Course added!";
pub const COURSE_NOT_FOUND: &str = "Course not found..";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn new(status: &str) -> Self {
        Self { status: status.to_string() }
    }
}

/// What a `/courses/{key}` path segment addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseKey<'a> {
    Id(i64),
    /// All digits but past `i64::MAX`; no stored course can carry it.
    UnknownId,
    Name(&'a str),
}

impl<'a> CourseKey<'a> {
    /// Keys made only of ASCII digits address a course by id.
    pub fn parse(key: &'a str) -> Self {
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
            return CourseKey::Name(key);
        }
        key.parse().map_or(CourseKey::UnknownId, CourseKey::Id)
    }
}

/// Path segment of the add route; a GET there is a name lookup.
pub const ADD_SEGMENT: &str = "add";

pub async fn add_course(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    let new_course = validate_new_course(&body).inspect_err(|e| debug!("add rejected: {}", e))?;

    let course = repository::insert_course(&state.db, new_course)
        .await
        .map_err(AppError::InsertFailed)?;
    info!("added {}", course);

    Ok((StatusCode::CREATED, Json(StatusResponse::new(COURSE_ADDED))))
}

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseView>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    debug!("listing {} courses", courses.len());
    Ok(Json(courses.iter().map(|c| c.view()).collect()))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(key): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, AppError> {
    match CourseKey::parse(&key) {
        CourseKey::Id(id) => get_course_by_id(&state, id).await,
        CourseKey::UnknownId => {
            debug!("course {} not found", key);
            Ok(Json(StatusResponse::new(COURSE_NOT_FOUND)).into_response())
        }
        CourseKey::Name(name) => get_courses_by_name(&state, name, date_range(query)).await,
    }
}

/// `GET /courses/add`: the add route only claims POST, so GET filters by the name "add".
pub async fn get_courses_named_add(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, AppError> {
    get_courses_by_name(&state, ADD_SEGMENT, date_range(query)).await
}

fn date_range(query: Result<Query<HashMap<String, String>>, QueryRejection>) -> DateRange {
    let params = query.map(|Query(params)| params).unwrap_or_default();
    DateRange::from_query_now(&params)
}

async fn get_course_by_id(state: &AppState, id: i64) -> Result<Response, AppError> {
    match repository::find_course_by_id(&state.db, id).await? {
        Some(course) => Ok(Json(course.view()).into_response()),
        None => {
            debug!("course {} not found", id);
            Ok(Json(StatusResponse::new(COURSE_NOT_FOUND)).into_response())
        }
    }
}

async fn get_courses_by_name(
    state: &AppState,
    name: &str,
    range: DateRange,
) -> Result<Response, AppError> {
    debug!("filtering '{}' between {} and {}", name, range.bottom, range.top);
    let courses =
        repository::find_courses_by_name_between(&state.db, name, &range.bottom, &range.top).await?;
    let views: Vec<CourseView> = courses.iter().map(|c| c.view()).collect();
    Ok(Json(views).into_response())
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<JsonObject, AppError>,
) -> Result<StatusCode, AppError> {
    let id = match CourseKey::parse(&key) {
        CourseKey::Id(id) => Some(id),
        CourseKey::UnknownId => None,
        CourseKey::Name(_) => return Err(AppError::RouteNotFound),
    };
    let JsonObject(body) = body?;
    let patch = validate_course_patch(&body).inspect_err(|e| debug!("update rejected: {}", e))?;

    let Some(id) = id else {
        debug!("update skipped, course {} not found", key);
        return Ok(StatusCode::NO_CONTENT);
    };

    match repository::update_course(&state.db, id, patch)
        .await
        .map_err(AppError::WriteFailed)?
    {
        Some(course) => info!("updated {}", course),
        None => debug!("update skipped, course {} not found", id),
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = match CourseKey::parse(&key) {
        CourseKey::Id(id) => id,
        CourseKey::UnknownId => return Ok(StatusCode::NO_CONTENT),
        CourseKey::Name(_) => return Err(AppError::RouteNotFound),
    };

    let removed = repository::delete_course(&state.db, id)
        .await
        .map_err(AppError::WriteFailed)?;
    if removed {
        info!("deleted course {}", id);
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
