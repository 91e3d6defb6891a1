pub mod course;

pub use course::{Course, CoursePatch, CourseRow, CourseView, NewCourse};
