use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::models::course::format_timestamp;
use crate::models::{Course, CoursePatch, CourseRow, NewCourse};

const SELECT_COURSE: &str = "SELECT id, name, start_date, end_date, lessons FROM courses";

fn into_courses(rows: Vec<CourseRow>) -> Result<Vec<Course>, sqlx::Error> {
    rows.into_iter().map(Course::try_from).collect()
}

pub async fn insert_course(db: &SqlitePool, req: NewCourse) -> Result<Course, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO courses (name, start_date, end_date, lessons) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&req.name)
    .bind(format_timestamp(&req.start_date))
    .bind(format_timestamp(&req.end_date))
    .bind(req.lessons)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Course {
        id,
        name: req.name,
        start_date: req.start_date,
        end_date: req.end_date,
        lessons: req.lessons,
    })
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CourseRow>(&format!("{SELECT_COURSE} ORDER BY id"))
        .fetch_all(db)
        .await?;
    into_courses(rows)
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, CourseRow>(&format!("{SELECT_COURSE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(Course::try_from)
        .transpose()
}

/// Courses called `name` whose `start_date` lies in `[bottom, top]`.
pub async fn find_courses_by_name_between(
    db: &SqlitePool,
    name: &str,
    bottom: &NaiveDateTime,
    top: &NaiveDateTime,
) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CourseRow>(&format!(
        "{SELECT_COURSE} WHERE name = ?1 AND start_date >= ?2 AND start_date <= ?3 ORDER BY id"
    ))
    .bind(name)
    .bind(format_timestamp(bottom))
    .bind(format_timestamp(top))
    .fetch_all(db)
    .await?;
    into_courses(rows)
}

/// Merges `patch` into the stored course. `Ok(None)` when no such course exists.
pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    patch: CoursePatch,
) -> Result<Option<Course>, sqlx::Error> {
    let mut tx = db.begin().await?;

    let mut current = match sqlx::query_as::<_, CourseRow>(&format!("{SELECT_COURSE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
    {
        Some(row) => Course::try_from(row)?,
        None => return Ok(None),
    };

    if patch.is_empty() {
        return Ok(Some(current));
    }
    patch.apply(&mut current);

    sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            start_date = ?2,
            end_date = ?3,
            lessons = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&current.name)
    .bind(format_timestamp(&current.start_date))
    .bind(format_timestamp(&current.end_date))
    .bind(current.lessons)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(current))
}

/// Returns whether a row was removed.
pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
