//! Flat list pages: people, feedback, and the shared list machinery.

mod feedback;
mod page;
mod parents;
mod students;
mod teachers;

pub use feedback::{FeedbackBoard, FeedbackForm};
pub use page::{Crud, ListItem, ListPage, Mutation};
pub use parents::{ParentForm, ParentsPage};
pub use students::{GradeFilter, StudentForm, class_names, filter_students, top_performers};
pub use teachers::{AssignmentOptions, AssignmentRow, TeacherForm};
