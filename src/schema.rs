/// Semantic type a course field must carry on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD HH:MM:SS` string.
    Timestamp,
    Integer,
}

/// Wire format shared by every timestamp the API reads or writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NAME: &str = "name";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const LESSONS: &str = "lessons";

/// Client-writable course fields, in the order creation payloads are checked.
pub const COURSE_FIELDS: [(&str, FieldKind); 4] = [
    (NAME, FieldKind::Text),
    (START_DATE, FieldKind::Timestamp),
    (END_DATE, FieldKind::Timestamp),
    (LESSONS, FieldKind::Integer),
];

pub fn field_kind(field: &str) -> Option<FieldKind> {
    COURSE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, kind)| *kind)
}
