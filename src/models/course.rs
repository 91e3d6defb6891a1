use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::schema::TIMESTAMP_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub lessons: i64,
}

impl Course {
    /// API-facing representation; the id never leaves the store.
    pub fn view(&self) -> CourseView {
        CourseView {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            lessons: self.lessons,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<course {}>", self.id)
    }
}

/// Raw `courses` row. Timestamps are kept as text in the table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub lessons: i64,
}

impl TryFrom<CourseRow> for Course {
    type Error = sqlx::Error;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: row.id,
            name: row.name,
            start_date: parse_stored_timestamp("start_date", &row.start_date)?,
            end_date: parse_stored_timestamp("end_date", &row.end_date)?,
            lessons: row.lessons,
        })
    }
}

fn parse_stored_timestamp(column: &str, value: &str) -> Result<NaiveDateTime, sqlx::Error> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Fully validated creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub lessons: i64,
}

/// Merge-patch: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub lessons: Option<i64>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.lessons.is_none()
    }

    /// Some only when every field was supplied.
    pub fn into_new_course(self) -> Option<NewCourse> {
        Some(NewCourse {
            name: self.name?,
            start_date: self.start_date?,
            end_date: self.end_date?,
            lessons: self.lessons?,
        })
    }

    pub fn apply(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(start_date) = self.start_date {
            course.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            course.end_date = end_date;
        }
        if let Some(lessons) = self.lessons {
            course.lessons = lessons;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    pub name: String,
    #[serde(serialize_with = "timestamp::serialize")]
    pub start_date: NaiveDateTime,
    #[serde(serialize_with = "timestamp::serialize")]
    pub end_date: NaiveDateTime,
    pub lessons: i64,
}

/// Serializes timestamps as `YYYY-MM-DD HH:MM:SS`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    use crate::schema::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }
}
